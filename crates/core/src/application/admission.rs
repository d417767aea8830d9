// Admission Controller / Scheduler
// The control core: decides when a queued job may begin executing, owns every
// store mutation, and keeps the pipeline flowing as capacity frees up.
//
// All bookkeeping happens synchronously inside the store lock; the only
// suspension points while a job is outstanding are the backend call itself
// and the fixed delay before re-entering scheduling.

use crate::application::constants::RESCHEDULE_DELAY;
use crate::application::dispatcher::JobDispatcher;
use crate::application::estimator::ProcessingTimeEstimator;
use crate::application::store::QueueStore;
use crate::domain::{Endpoint, Job, JobId, JobPayload, QueueConfig};
use crate::error::{AppError, Result};
use crate::port::{IdProvider, TimeProvider};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::{error, info, warn};

/// Sweep outcome, for the sweeper's log line.
#[derive(Debug, Clone, Copy)]
pub struct SweepStats {
    pub pending_removed: usize,
    pub archived_removed: usize,
}

/// Process-wide admission queue. Constructed once by the composition root;
/// tests construct fresh instances.
pub struct QueueManager {
    store: Mutex<QueueStore>,
    estimator: Mutex<ProcessingTimeEstimator>,
    dispatcher: Arc<JobDispatcher>,
    time_provider: Arc<dyn TimeProvider>,
    id_provider: Arc<dyn IdProvider>,
    config: QueueConfig,
}

impl QueueManager {
    pub fn new(
        dispatcher: Arc<JobDispatcher>,
        time_provider: Arc<dyn TimeProvider>,
        id_provider: Arc<dyn IdProvider>,
        config: QueueConfig,
    ) -> Self {
        Self {
            store: Mutex::new(QueueStore::new(config.max_archived_items)),
            estimator: Mutex::new(ProcessingTimeEstimator::new(config.max_processing_history)),
            dispatcher,
            time_provider,
            id_provider,
            config,
        }
    }

    pub fn config(&self) -> &QueueConfig {
        &self.config
    }

    /// Validate and enqueue a submission, then trigger scheduling without
    /// blocking the caller. Returns the job id immediately.
    ///
    /// Fails with a validation error when the endpoint is not allow-listed or
    /// the payload is absent; nothing enters the queue in that case.
    pub async fn submit(
        self: &Arc<Self>,
        user_id: impl Into<String>,
        endpoint: &str,
        payload: Option<serde_json::Value>,
    ) -> Result<JobId> {
        let endpoint: Endpoint = endpoint.parse()?;

        let payload = match payload {
            Some(value) if !value.is_null() => value,
            _ => return Err(AppError::Validation("payload is required".to_string())),
        };

        let job = Job::new(
            self.id_provider.generate_id(),
            self.time_provider.now_millis(),
            user_id,
            endpoint,
            JobPayload::new(payload),
        );
        let job_id = job.id.clone();

        info!(job_id = %job_id, endpoint = %endpoint, "Job submitted");

        self.store.lock().await.append(job);

        // Fire-and-forget: admission happens on the scheduler's own task.
        self.spawn_schedule();

        Ok(job_id)
    }

    /// Post a scheduling pass onto its own task. Both submission and
    /// settlement re-enter scheduling this way; neither blocks on it.
    fn spawn_schedule(self: &Arc<Self>) {
        let manager = Arc::clone(self);
        tokio::spawn(async move {
            manager.schedule_next().await;
        });
    }

    /// Pull pending jobs into the active set until the concurrency limit or
    /// queue exhaustion. Idempotent: at capacity or with nothing pending this
    /// is a no-op.
    pub async fn schedule_next(self: &Arc<Self>) {
        loop {
            let (job_id, endpoint, payload) = {
                let mut store = self.store.lock().await;

                if store.active_len() >= self.config.concurrency_limit {
                    return;
                }
                let mut job = match store.pop_next_pending() {
                    Some(job) => job,
                    None => return,
                };

                let now = self.time_provider.now_millis();
                if let Err(e) = job.start(now) {
                    // Pending jobs are Queued by construction; a violation
                    // here is a bookkeeping bug, not a job failure.
                    error!(job_id = %job.id, error = %e, "Refusing to schedule job");
                    continue;
                }

                let dispatch = (job.id.clone(), job.endpoint, job.payload.clone());
                store.mark_active(job);
                dispatch
            };

            info!(job_id = %job_id, endpoint = %endpoint, "Job admitted into processing");

            let manager = Arc::clone(self);
            tokio::spawn(async move {
                manager.run_job(job_id, endpoint, payload).await;
            });
        }
    }

    /// Drive one active job to settlement: invoke the dispatcher, record the
    /// observed duration, apply the terminal transition, archive, and
    /// re-enter scheduling. A failure here is contained to this job.
    async fn run_job(self: Arc<Self>, job_id: JobId, endpoint: Endpoint, payload: JobPayload) {
        let started = self.time_provider.now_millis();
        let outcome = self.dispatcher.invoke(endpoint, &payload).await;
        let now = self.time_provider.now_millis();

        self.estimator.lock().await.record(now - started);

        {
            let mut store = self.store.lock().await;
            match store.take_active(&job_id) {
                Some(mut job) => {
                    let transition = match outcome {
                        Ok(result) => {
                            info!(job_id = %job_id, duration_ms = now - started, "Job completed");
                            job.complete(now, result)
                        }
                        Err(e) => {
                            warn!(job_id = %job_id, error = %e, "Job failed");
                            job.fail(now, e.to_string())
                        }
                    };
                    if let Err(e) = transition {
                        error!(job_id = %job_id, error = %e, "Terminal transition rejected");
                    }
                    store.archive(job);
                }
                None => {
                    // Settlement raced a sweep only if the job were swept
                    // mid-flight, which the store forbids.
                    error!(job_id = %job_id, "Settled job missing from active set");
                }
            }
        }

        sleep(RESCHEDULE_DELAY).await;
        self.spawn_schedule();
    }

    /// Drop pending and archived entries older than the retention window.
    pub async fn sweep_expired(&self) -> SweepStats {
        let now = self.time_provider.now_millis();
        let (pending_removed, archived_removed) = self
            .store
            .lock()
            .await
            .sweep_expired(now, self.config.retention_window_ms);
        SweepStats {
            pending_removed,
            archived_removed,
        }
    }

    pub(crate) async fn with_store<T>(&self, f: impl FnOnce(&QueueStore) -> T) -> T {
        let store = self.store.lock().await;
        f(&store)
    }

    pub(crate) async fn current_estimate_ms(&self) -> i64 {
        self.estimator.lock().await.estimate()
    }
}
