//! Export Adapters: side effects triggered from the editable output.
//!
//! Adapters are fire-and-forget from the workflow's point of view: they return
//! nothing, log their own failures, and keep no state between invocations.

use async_trait::async_trait;
use serde::Serialize;

pub mod clipboard;
pub mod document;

pub use clipboard::{CommandClipboard, MemoryClipboard};
pub use document::FileDocumentExporter;

/// Input to a document export. `position` and `company_name` drive naming and the page header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentFields {
    pub position: String,
    pub company_name: String,
    pub content: String,
}

#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn copy_to_clipboard(&self, text: &str);
}

#[async_trait]
pub trait DocumentExporter: Send + Sync {
    async fn export_document(&self, fields: &DocumentFields);
}
