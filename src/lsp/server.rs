use std::sync::Arc;

use anyhow::Result;
use tokio::io::{stdin, stdout};
use tower_lsp::{LspService, Server};

use crate::Config;
use crate::lsp::backend::Backend;
use crate::validator::Validator;

/// Start the LSP server on stdio
pub async fn serve(config: Config) -> Result<()> {
    let validator = Arc::new(Validator::from_config(&config)?);

    let (service, socket) =
        LspService::build(move |client| Backend::new(client, validator.clone())).finish();

    Server::new(stdin(), stdout(), socket).serve(service).await;

    Ok(())
}
