mod backend_client;
mod config;
mod errors;
mod export;
mod layout;
mod routes;
mod state;
mod workflow;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::backend_client::BackendClient;
use crate::config::Config;
use crate::export::{Clipboard, CommandClipboard, FileDocumentExporter, MemoryClipboard};
use crate::layout::default_page_config;
use crate::routes::build_router;
use crate::state::AppState;
use crate::workflow::{Workflow, WorkflowServices};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Coverdraft v{}", env!("CARGO_PKG_VERSION"));

    // One client serves both the CV reference lookup and generation
    let backend = Arc::new(BackendClient::new(
        &config.backend_api_url,
        Duration::from_secs(config.request_timeout_secs),
    )?);
    info!("Backend client initialized ({})", config.backend_api_url);

    let (clipboard, clipboard_buffer): (Arc<dyn Clipboard>, Option<Arc<MemoryClipboard>>) =
        match &config.clipboard_command {
            Some(command_line) => {
                let command = CommandClipboard::from_command_line(command_line)?;
                info!("Clipboard: piping to '{command_line}'");
                let clipboard: Arc<dyn Clipboard> = Arc::new(command);
                (clipboard, None)
            }
            None => {
                let buffer = Arc::new(MemoryClipboard::default());
                info!("Clipboard: in-memory buffer");
                let clipboard: Arc<dyn Clipboard> = buffer.clone();
                (clipboard, Some(buffer))
            }
        };

    // 11pt on US letter, 1" margins
    let page_config = default_page_config(config.export_font);
    info!(
        "Document export to {} ({:?} {}pt)",
        config.export_dir.display(),
        page_config.font,
        page_config.font_size_pt
    );
    let exporter = Arc::new(FileDocumentExporter::new(
        config.export_dir.clone(),
        page_config,
    ));

    let workflow = Workflow::new(
        WorkflowServices {
            reference: backend.clone(),
            generator: backend,
            clipboard,
            exporter,
        },
        Duration::from_millis(config.notification_ttl_ms),
    );
    // The loader runs in the background; requests are served while it resolves.
    let _reference_load = workflow.activate().await;

    let state = AppState {
        workflow,
        clipboard_buffer,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
