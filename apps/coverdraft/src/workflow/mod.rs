// Generation workflow: reference loading, form validation, the generation
// state machine, the editable output buffer, and export orchestration.
// All remote calls go through backend_client; all side effects through export.

pub mod coordinator;
pub mod form;
pub mod handlers;
pub mod notifications;
pub mod reference;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use session::{Workflow, WorkflowServices};
