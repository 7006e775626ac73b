use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;

use crate::Config;
use crate::http::handlers::{AppState, router};
use crate::validator::Validator;

/// Start the HTTP server
pub async fn serve(config: Config) -> Result<()> {
    let validator = Validator::from_config(&config)?;
    let app = router(AppState {
        validator: Arc::new(validator),
    });

    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    log::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
