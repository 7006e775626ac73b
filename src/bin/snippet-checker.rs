use anyhow::Result;
use env_logger::Env;
use snippet_checker::config::{Config, Mode};
use snippet_checker::{http, lsp};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_args_and_env()?;

    // Logs go to stderr; stdout belongs to the LSP transport
    env_logger::Builder::from_env(Env::default().default_filter_or(config.log_level.as_str()))
        .init();

    match config.mode {
        Mode::Http => http::serve(config).await,
        Mode::Lsp => lsp::serve(config).await,
    }
}
