//! Workflow driver: runs coordinator transitions against the real collaborators.
//!
//! The coordinator lives behind one async mutex. Each event takes the lock,
//! applies a transition, and releases it before any network call or adapter
//! call, so edits and form changes keep flowing while a request is in flight.
//!
//! Every activation bumps an epoch. Completions and timers from an older
//! activation find a different epoch and are dropped.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::backend_client::{GenerationService, ReferenceSource};
use crate::export::{Clipboard, DocumentExporter};
use crate::workflow::coordinator::{Coordinator, ErrorDomain, ExportJob, WorkflowSnapshot};
use crate::workflow::form::{FormUpdate, GenerationRequest};
use crate::workflow::notifications::ExportKind;
use crate::workflow::reference::ReferenceLoader;

/// External collaborators consumed by the workflow.
pub struct WorkflowServices {
    pub reference: Arc<dyn ReferenceSource>,
    pub generator: Arc<dyn GenerationService>,
    pub clipboard: Arc<dyn Clipboard>,
    pub exporter: Arc<dyn DocumentExporter>,
}

struct Session {
    epoch: u64,
    coordinator: Coordinator,
}

/// Cloneable handle to the single workflow session.
#[derive(Clone)]
pub struct Workflow {
    session: Arc<Mutex<Session>>,
    services: Arc<WorkflowServices>,
    notification_ttl: Duration,
}

impl Workflow {
    /// Builds an inactive workflow. Call `activate` to start loading the CV status.
    pub fn new(services: WorkflowServices, notification_ttl: Duration) -> Self {
        Self {
            session: Arc::new(Mutex::new(Session {
                epoch: 0,
                coordinator: Coordinator::new(),
            })),
            services: Arc::new(services),
            notification_ttl,
        }
    }

    /// Starts a fresh session and issues its single reference request.
    ///
    /// The returned handle resolves once the reference status is recorded.
    pub async fn activate(&self) -> JoinHandle<()> {
        let epoch = {
            let mut session = self.session.lock().await;
            session.epoch += 1;
            session.coordinator = Coordinator::new();
            session.epoch
        };
        info!("Workflow activated (epoch {epoch})");

        let this = self.clone();
        tokio::spawn(async move { this.load_reference(epoch).await })
    }

    async fn load_reference(&self, epoch: u64) {
        let status = ReferenceLoader::new(self.services.reference.clone())
            .load()
            .await;

        let mut session = self.session.lock().await;
        if session.epoch != epoch {
            debug!("Discarding reference status from superseded activation {epoch}");
            return;
        }
        session.coordinator.resolve_reference(status);
    }

    pub async fn snapshot(&self) -> WorkflowSnapshot {
        self.session.lock().await.coordinator.snapshot()
    }

    pub async fn update_form(&self, update: FormUpdate) -> WorkflowSnapshot {
        let mut session = self.session.lock().await;
        session.coordinator.update_form(update);
        session.coordinator.snapshot()
    }

    /// Runs one Submit to completion: guard, liveness probe, generate, apply.
    ///
    /// Everything after the guard runs on its own task, so dropping the caller
    /// (a disconnected HTTP client) never strands the workflow in `Submitting`.
    pub async fn submit(&self) -> WorkflowSnapshot {
        let (epoch, request) = {
            let mut session = self.session.lock().await;
            match session.coordinator.begin_submit() {
                Ok(request) => (session.epoch, request),
                Err(e) => {
                    warn!("Submission rejected: {e}");
                    return session.coordinator.snapshot();
                }
            }
        };

        let this = self.clone();
        let sequence = request.sequence();
        let run = tokio::spawn(async move { this.run_submission(epoch, request).await });
        match run.await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("Generation task for request {sequence} did not finish: {e}");
                self.snapshot().await
            }
        }
    }

    async fn run_submission(&self, epoch: u64, request: GenerationRequest) -> WorkflowSnapshot {
        info!("Generating cover letter (request {})", request.sequence());
        let outcome = self.run_generation(request.payload()).await;

        let mut session = self.session.lock().await;
        if session.epoch != epoch {
            debug!("Discarding generation result from superseded activation {epoch}");
        } else if !session
            .coordinator
            .complete_submit(request.sequence(), outcome)
        {
            debug!(
                "Discarding result of superseded request {}",
                request.sequence()
            );
        }
        session.coordinator.snapshot()
    }

    async fn run_generation(&self, payload: &str) -> Result<String, String> {
        let generator = &self.services.generator;

        if let Err(e) = generator.check_health().await {
            warn!("Liveness probe failed: {e}");
            return Err(e.user_message());
        }

        match generator.generate(payload).await {
            Ok(text) => {
                info!(
                    "Cover letter generated ({} chars): {:?}",
                    text.len(),
                    text.chars().take(60).collect::<String>()
                );
                Ok(text)
            }
            Err(e) => {
                warn!("Generation failed: {e}");
                Err(e.user_message())
            }
        }
    }

    /// Replaces the editable output. `None` when nothing has been generated yet.
    pub async fn edit_output(&self, text: String) -> Option<WorkflowSnapshot> {
        let mut session = self.session.lock().await;
        if session.coordinator.edit_output(text) {
            Some(session.coordinator.snapshot())
        } else {
            None
        }
    }

    /// Runs an export adapter on the current editable output and raises its
    /// banner. Returns false (and calls nothing) when there is nothing to export.
    ///
    /// The adapter call and the banner raise run on their own task and always
    /// finish together, even if the caller goes away.
    pub async fn request_export(&self, kind: ExportKind) -> bool {
        let job = {
            let session = self.session.lock().await;
            session
                .coordinator
                .export_job(kind)
                .map(|job| (session.epoch, job))
        };
        let Some((epoch, job)) = job else {
            debug!("Export {kind:?} skipped: no output to export");
            return false;
        };

        let this = self.clone();
        if let Err(e) = tokio::spawn(async move { this.run_export(epoch, job).await }).await {
            warn!("Export {kind:?} task did not finish: {e}");
        }
        true
    }

    async fn run_export(&self, epoch: u64, job: ExportJob) {
        match &job {
            ExportJob::Copy(text) => self.services.clipboard.copy_to_clipboard(text).await,
            ExportJob::Document(fields) => self.services.exporter.export_document(fields).await,
        }

        let ticket = {
            let mut session = self.session.lock().await;
            if session.epoch != epoch {
                return;
            }
            session.coordinator.raise_notification(job.kind())
        };
        self.schedule_notification_reset(epoch, job.kind(), ticket);
    }

    fn schedule_notification_reset(&self, epoch: u64, kind: ExportKind, ticket: u64) {
        let session = Arc::clone(&self.session);
        let ttl = self.notification_ttl;

        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            let mut session = session.lock().await;
            if session.epoch == epoch {
                session.coordinator.expire_notification(kind, ticket);
            }
        });
    }

    pub async fn dismiss_error(&self, domain: ErrorDomain) -> WorkflowSnapshot {
        let mut session = self.session.lock().await;
        session.coordinator.dismiss_error(domain);
        session.coordinator.snapshot()
    }
}
