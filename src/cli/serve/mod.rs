//! Serve command - runs the webhook and API server

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tracing::info;

use crate::api::create_router;
use crate::config::AppConfig;
use crate::infrastructure::logging;
use crate::infrastructure::prompt::{spawn_template_watcher, FilePromptLoader};

/// Run the server until shutdown.
pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    logging::init_logging(&config.logging);

    let state = crate::create_app_state(&config).await?;

    if config.prompt.watch {
        // Runs for the life of the process; aborted implicitly on shutdown.
        let _watcher = spawn_template_watcher(
            FilePromptLoader::new(&config.prompt.template_path),
            Arc::clone(&state.prompts),
            Duration::from_secs(config.prompt.watch_interval_secs.max(1)),
        );
    }

    let app = create_router(state);

    let addr = build_socket_addr(&config)?;
    info!("Starting bot server on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_socket_addr(config: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    )))
}
