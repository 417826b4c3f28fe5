//! Reference-Data Loader: resolves whether the user's CV is usable, once per activation.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::backend_client::{BackendError, ReferenceResponse, ReferenceSource};

const NO_REFERENCE_MESSAGE: &str = "No CV found for this account";

/// Availability of the reference document.
///
/// Starts as `Loading`; once resolved it never goes back to `Loading` within the
/// same activation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum ReferenceStatus {
    Loading,
    Available,
    Unavailable(String),
}

impl ReferenceStatus {
    pub fn is_available(&self) -> bool {
        matches!(self, ReferenceStatus::Available)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ReferenceStatus::Loading)
    }

    /// Maps the outcome of the single reference fetch onto a resolved status.
    pub fn from_fetch(result: Result<ReferenceResponse, BackendError>) -> Self {
        match result {
            Ok(response) if response.available => ReferenceStatus::Available,
            Ok(response) => {
                let reason = if response.message.trim().is_empty() {
                    NO_REFERENCE_MESSAGE.to_string()
                } else {
                    response.message
                };
                ReferenceStatus::Unavailable(reason)
            }
            Err(e) => ReferenceStatus::Unavailable(e.user_message()),
        }
    }
}

/// Issues exactly one reference request per call to `load`. Never retries.
pub struct ReferenceLoader {
    source: Arc<dyn ReferenceSource>,
}

impl ReferenceLoader {
    pub fn new(source: Arc<dyn ReferenceSource>) -> Self {
        Self { source }
    }

    pub async fn load(&self) -> ReferenceStatus {
        let result = self.source.fetch_reference().await;
        let status = ReferenceStatus::from_fetch(result);

        match &status {
            ReferenceStatus::Available => info!("Reference document available"),
            ReferenceStatus::Unavailable(reason) => {
                warn!("Reference document unavailable: {reason}")
            }
            ReferenceStatus::Loading => {}
        }

        status
    }
}
