use std::sync::Arc;

use crate::export::MemoryClipboard;
use crate::workflow::Workflow;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub workflow: Workflow,
    /// Set when copied text is held in memory instead of piped to a clipboard tool.
    /// Backs `GET /api/v1/workflow/clipboard`.
    pub clipboard_buffer: Option<Arc<MemoryClipboard>>,
}
