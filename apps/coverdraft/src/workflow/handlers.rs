use axum::{
    extract::{Path, State},
    Json,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::errors::AppError;
use crate::state::AppState;
use crate::workflow::coordinator::{ErrorDomain, WorkflowSnapshot};
use crate::workflow::form::FormUpdate;
use crate::workflow::notifications::ExportKind;

#[derive(Deserialize)]
pub struct EditOutputRequest {
    pub text: String,
}

#[derive(Serialize)]
pub struct ExportResponse {
    /// False when there was no exportable text and the request was a no-op.
    pub performed: bool,
    pub snapshot: WorkflowSnapshot,
}

#[derive(Serialize)]
pub struct ClipboardResponse {
    pub text: Option<String>,
}

/// GET /api/v1/workflow
pub async fn handle_get_workflow(State(state): State<AppState>) -> Json<WorkflowSnapshot> {
    Json(state.workflow.snapshot().await)
}

/// POST /api/v1/workflow/activate
///
/// Responds immediately with the fresh session; the CV status resolves in the
/// background and shows up on the next read.
pub async fn handle_activate(State(state): State<AppState>) -> Json<WorkflowSnapshot> {
    let _loader = state.workflow.activate().await;
    Json(state.workflow.snapshot().await)
}

/// PATCH /api/v1/workflow/form
pub async fn handle_update_form(
    State(state): State<AppState>,
    Json(update): Json<FormUpdate>,
) -> Json<WorkflowSnapshot> {
    Json(state.workflow.update_form(update).await)
}

/// POST /api/v1/workflow/submit
///
/// Validation and backend failures are part of the workflow state, not HTTP
/// errors, so this always answers 200 with the resulting snapshot.
pub async fn handle_submit(State(state): State<AppState>) -> Json<WorkflowSnapshot> {
    Json(state.workflow.submit().await)
}

/// PUT /api/v1/workflow/output
pub async fn handle_edit_output(
    State(state): State<AppState>,
    Json(req): Json<EditOutputRequest>,
) -> Result<Json<WorkflowSnapshot>, AppError> {
    state
        .workflow
        .edit_output(req.text)
        .await
        .map(Json)
        .ok_or_else(|| {
            AppError::UnprocessableEntity("There is no generated letter to edit yet".to_string())
        })
}

/// POST /api/v1/workflow/export/:kind
pub async fn handle_export(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> Result<Json<ExportResponse>, AppError> {
    let kind: ExportKind = parse_path_segment(&kind, "export kind")?;
    let performed = state.workflow.request_export(kind).await;
    Ok(Json(ExportResponse {
        performed,
        snapshot: state.workflow.snapshot().await,
    }))
}

/// GET /api/v1/workflow/clipboard
pub async fn handle_get_clipboard(
    State(state): State<AppState>,
) -> Result<Json<ClipboardResponse>, AppError> {
    let buffer = state.clipboard_buffer.as_ref().ok_or_else(|| {
        AppError::NotFound("Clipboard is handled by an external command".to_string())
    })?;
    Ok(Json(ClipboardResponse {
        text: buffer.contents().await,
    }))
}

/// DELETE /api/v1/workflow/errors/:domain
pub async fn handle_dismiss_error(
    State(state): State<AppState>,
    Path(domain): Path<String>,
) -> Result<Json<WorkflowSnapshot>, AppError> {
    let domain: ErrorDomain = parse_path_segment(&domain, "error domain")?;
    Ok(Json(state.workflow.dismiss_error(domain).await))
}

/// Parses a snake_case path segment into one of the workflow enums.
fn parse_path_segment<T: DeserializeOwned>(raw: &str, what: &str) -> Result<T, AppError> {
    serde_json::from_value(serde_json::Value::String(raw.to_string()))
        .map_err(|_| AppError::Validation(format!("Unknown {what}: {raw}")))
}
