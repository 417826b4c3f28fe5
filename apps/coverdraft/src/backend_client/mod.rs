/// Backend Client: the single point of entry for calls to the cover-letter backend.
///
/// ARCHITECTURAL RULE: the workflow never talks HTTP directly. It sees the backend
/// only through the `ReferenceSource` and `GenerationService` traits below.
///
/// Every call is a single best-effort request. There is no retry loop here.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Default backend location used when `BACKEND_API_URL` is not set.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5001/api";

const REFERENCE_PATH: &str = "get-cv";
const HEALTH_PATH: &str = "health";
const GENERATE_PATH: &str = "cover-letter";

const BACKEND_NOT_ACCESSIBLE: &str =
    "Backend API is not accessible. Please check if the server is running.";
const BACKEND_CONNECT_FAILED: &str =
    "Failed to connect to the backend. Please check if the server is running and accessible.";

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Backend unreachable: {0}")]
    Unreachable(String),

    #[error("Backend returned an empty response")]
    EmptyResponse,
}

impl BackendError {
    /// Normalizes the failure into the single message string shown to the user.
    /// Server-supplied messages win over generic ones.
    pub fn user_message(&self) -> String {
        match self {
            BackendError::Api { message, .. } => message.clone(),
            BackendError::Unreachable(message) => message.clone(),
            BackendError::Http(e) => e.to_string(),
            BackendError::Parse(e) => format!("Malformed response from backend: {e}"),
            BackendError::EmptyResponse => {
                "The backend returned an empty cover letter. Please try again.".to_string()
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

/// Reference-document status as reported by the backend.
///
/// Older backends report `embedded` instead of `available`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReferenceResponse {
    #[serde(alias = "embedded")]
    pub available: bool,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
struct GenerateBody<'a> {
    message: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Collaborator traits
// ────────────────────────────────────────────────────────────────────────────

/// Reports whether the user's reference document (the CV) is usable.
#[async_trait]
pub trait ReferenceSource: Send + Sync {
    async fn fetch_reference(&self) -> Result<ReferenceResponse, BackendError>;
}

/// Liveness probe plus the generation call itself.
#[async_trait]
pub trait GenerationService: Send + Sync {
    async fn check_health(&self) -> Result<(), BackendError>;

    /// Sends the composed payload and returns the generated text.
    async fn generate(&self, message: &str) -> Result<String, BackendError>;
}

// ────────────────────────────────────────────────────────────────────────────
// HTTP implementation
// ────────────────────────────────────────────────────────────────────────────

/// reqwest-backed client for the cover-letter backend.
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

#[async_trait]
impl ReferenceSource for BackendClient {
    async fn fetch_reference(&self) -> Result<ReferenceResponse, BackendError> {
        debug!("Fetching reference status from {}", self.url(REFERENCE_PATH));

        let response = self.client.get(self.url(REFERENCE_PATH)).send().await?;
        read_json(response).await
    }
}

#[async_trait]
impl GenerationService for BackendClient {
    async fn check_health(&self) -> Result<(), BackendError> {
        let response = self
            .client
            .get(self.url(HEALTH_PATH))
            .send()
            .await
            .map_err(|e| {
                warn!("Health check error: {e}");
                BackendError::Unreachable(BACKEND_CONNECT_FAILED.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Health check failed with {status}: {body}");
            return Err(BackendError::Unreachable(BACKEND_NOT_ACCESSIBLE.to_string()));
        }

        Ok(())
    }

    async fn generate(&self, message: &str) -> Result<String, BackendError> {
        debug!("Requesting generation ({} chars of payload)", message.len());

        let response = self
            .client
            .post(self.url(GENERATE_PATH))
            .json(&GenerateBody { message })
            .send()
            .await?;

        let body: GenerateResponse = read_json(response).await?;

        body.response
            .filter(|text| !text.trim().is_empty())
            .ok_or(BackendError::EmptyResponse)
    }
}

/// Reads the body, mapping non-2xx statuses to `BackendError::Api`.
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, BackendError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        warn!("Backend returned {status}: {body}");
        return Err(api_error(status, &body));
    }

    serde_json::from_str(&body).map_err(BackendError::Parse)
}

/// Prefers the server's `{ "error": ... }` message; falls back to the status code.
fn api_error(status: StatusCode, body: &str) -> BackendError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .map(|e| e.error)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("Error: {}", status.as_u16()));

    BackendError::Api {
        status: status.as_u16(),
        message,
    }
}
