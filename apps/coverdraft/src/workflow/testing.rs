//! In-process collaborators for workflow and router tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::backend_client::{BackendError, GenerationService, ReferenceResponse, ReferenceSource};
use crate::export::{Clipboard, DocumentExporter, DocumentFields};
use crate::workflow::form::FormUpdate;
use crate::workflow::session::{Workflow, WorkflowServices};

pub struct FakeReference {
    response: Mutex<Option<Result<ReferenceResponse, BackendError>>>,
    delay: Duration,
    calls: AtomicUsize,
}

impl FakeReference {
    pub fn available() -> Self {
        Self::with(Ok(ReferenceResponse {
            available: true,
            message: "1 document(s) found in Chroma DB".to_string(),
        }))
    }

    pub fn failing(message: &str) -> Self {
        Self::with(Err(BackendError::Api {
            status: 500,
            message: message.to_string(),
        }))
    }

    pub fn with(response: Result<ReferenceResponse, BackendError>) -> Self {
        Self {
            response: Mutex::new(Some(response)),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReferenceSource for FakeReference {
    async fn fetch_reference(&self) -> Result<ReferenceResponse, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        // Calls after the scripted one behave like an available CV.
        let response = self
            .response
            .lock()
            .unwrap()
            .take()
            .unwrap_or(Ok(ReferenceResponse {
                available: true,
                message: String::new(),
            }));
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        response
    }
}

/// Scripted generation backend. Each `generate` call pops the next reply;
/// an empty script answers with a fixed letter.
pub struct FakeGenerator {
    healthy: bool,
    replies: Mutex<VecDeque<(Duration, Result<String, BackendError>)>>,
    payloads: Mutex<Vec<String>>,
    health_calls: AtomicUsize,
}

impl FakeGenerator {
    pub fn replying(text: &str) -> Self {
        let generator = Self::healthy();
        generator.push(Duration::ZERO, Ok(text.to_string()));
        generator
    }

    pub fn healthy() -> Self {
        Self {
            healthy: true,
            replies: Mutex::new(VecDeque::new()),
            payloads: Mutex::new(Vec::new()),
            health_calls: AtomicUsize::new(0),
        }
    }

    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            ..Self::healthy()
        }
    }

    pub fn push(&self, delay: Duration, reply: Result<String, BackendError>) {
        self.replies.lock().unwrap().push_back((delay, reply));
    }

    pub fn generate_calls(&self) -> usize {
        self.payloads.lock().unwrap().len()
    }

    pub fn health_calls(&self) -> usize {
        self.health_calls.load(Ordering::SeqCst)
    }

    pub fn payloads(&self) -> Vec<String> {
        self.payloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationService for FakeGenerator {
    async fn check_health(&self) -> Result<(), BackendError> {
        self.health_calls.fetch_add(1, Ordering::SeqCst);
        if self.healthy {
            Ok(())
        } else {
            Err(BackendError::Unreachable(
                "Backend API is not accessible. Please check if the server is running."
                    .to_string(),
            ))
        }
    }

    async fn generate(&self, message: &str) -> Result<String, BackendError> {
        self.payloads.lock().unwrap().push(message.to_string());
        let next = self.replies.lock().unwrap().pop_front();
        let (delay, reply) = next.unwrap_or((Duration::ZERO, Ok("Dear Hiring Manager,".to_string())));
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        reply
    }
}

#[derive(Default)]
pub struct RecordingClipboard {
    copies: Mutex<Vec<String>>,
    delay: Duration,
}

impl RecordingClipboard {
    /// Records each copy only after `delay` has passed.
    pub fn delayed(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    pub fn copies(&self) -> Vec<String> {
        self.copies.lock().unwrap().clone()
    }
}

#[async_trait]
impl Clipboard for RecordingClipboard {
    async fn copy_to_clipboard(&self, text: &str) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.copies.lock().unwrap().push(text.to_string());
    }
}

#[derive(Default)]
pub struct RecordingExporter {
    exports: Mutex<Vec<DocumentFields>>,
}

impl RecordingExporter {
    pub fn exports(&self) -> Vec<DocumentFields> {
        self.exports.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentExporter for RecordingExporter {
    async fn export_document(&self, fields: &DocumentFields) {
        self.exports.lock().unwrap().push(fields.clone());
    }
}

/// A workflow wired to fakes, with handles kept for assertions.
pub struct Harness {
    pub workflow: Workflow,
    pub reference: Arc<FakeReference>,
    pub generator: Arc<FakeGenerator>,
    pub clipboard: Arc<RecordingClipboard>,
    pub exporter: Arc<RecordingExporter>,
}

pub const TEST_NOTIFICATION_TTL: Duration = Duration::from_millis(2000);

impl Harness {
    pub fn new(reference: FakeReference, generator: FakeGenerator) -> Self {
        Self::with_clipboard(reference, generator, RecordingClipboard::default())
    }

    pub fn with_clipboard(
        reference: FakeReference,
        generator: FakeGenerator,
        clipboard: RecordingClipboard,
    ) -> Self {
        let reference = Arc::new(reference);
        let generator = Arc::new(generator);
        let clipboard = Arc::new(clipboard);
        let exporter = Arc::new(RecordingExporter::default());

        let workflow = Workflow::new(
            WorkflowServices {
                reference: reference.clone(),
                generator: generator.clone(),
                clipboard: clipboard.clone(),
                exporter: exporter.clone(),
            },
            TEST_NOTIFICATION_TTL,
        );

        Self {
            workflow,
            reference,
            generator,
            clipboard,
            exporter,
        }
    }

    /// Activates and waits for the reference load to resolve.
    pub async fn activated(reference: FakeReference, generator: FakeGenerator) -> Self {
        let harness = Self::new(reference, generator);
        harness.workflow.activate().await.await.unwrap();
        harness
    }
}

pub fn acme_form() -> FormUpdate {
    FormUpdate {
        position: Some("Engineer".to_string()),
        company_name: Some("Acme".to_string()),
        about_company: None,
        job_description: Some("Build things".to_string()),
    }
}
