// Status/Reporting API
// Read-only projections over the queue store. No side effects; callers poll
// these while their jobs drain.

use crate::application::admission::QueueManager;
use crate::domain::{Job, JobState};
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Point-in-time view of a single job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobView {
    pub job_id: String,
    pub status: JobState,
    pub submitted_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&Job> for JobView {
    fn from(job: &Job) -> Self {
        Self {
            job_id: job.id.clone(),
            status: job.state,
            submitted_at: job.submitted_at,
            result: job.result.clone(),
            error: job.error.clone(),
        }
    }
}

/// Per-user queue visibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueStatusView {
    /// 1-based FIFO index among pending jobs, 0 if the user has none pending.
    pub position: usize,
    pub estimated_wait_ms: i64,
    pub total_pending: usize,
    pub total_active: usize,
}

/// Global aggregate counts, no per-user breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalStatusView {
    pub total_pending: usize,
    pub total_active: usize,
}

/// Operational stats for the admin surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueStats {
    pub total_pending: usize,
    pub total_active: usize,
    pub total_archived: usize,
    pub avg_processing_ms: i64,
}

/// Batch projection. Unknown job ids map to `None`; a bad entry never aborts
/// the batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchStatusView {
    pub items: HashMap<String, Option<JobView>>,
    pub user_statuses: HashMap<String, QueueStatusView>,
}

impl QueueManager {
    /// Job view by id, NotFound when no collection holds it.
    pub async fn job_view(&self, job_id: &str) -> Result<JobView> {
        self.with_store(|store| store.find_by_id(job_id).map(JobView::from))
            .await
            .ok_or_else(|| AppError::NotFound(format!("Job {} not found", job_id)))
    }

    /// Queue position and wait estimate for one user.
    ///
    /// `estimated_wait_ms = ceil(position * estimate / concurrency_limit)`:
    /// `concurrency_limit` jobs drain in parallel, so a position deep in the
    /// queue is discounted accordingly.
    pub async fn user_status(&self, user_id: &str) -> QueueStatusView {
        let (position, total_pending, total_active) = self
            .with_store(|store| {
                (
                    store.position_of(user_id),
                    store.pending_len(),
                    store.active_len(),
                )
            })
            .await;

        let estimate = self.current_estimate_ms().await;
        let limit = self.config().concurrency_limit as i64;
        let estimated_wait_ms = (position as i64 * estimate + limit - 1) / limit;

        QueueStatusView {
            position,
            estimated_wait_ms,
            total_pending,
            total_active,
        }
    }

    /// Global counts.
    pub async fn global_status(&self) -> GlobalStatusView {
        self.with_store(|store| GlobalStatusView {
            total_pending: store.pending_len(),
            total_active: store.active_len(),
        })
        .await
    }

    /// Operational stats (admin surface).
    pub async fn stats(&self) -> QueueStats {
        let (total_pending, total_active, total_archived) = self
            .with_store(|store| {
                (
                    store.pending_len(),
                    store.active_len(),
                    store.archived_len(),
                )
            })
            .await;
        QueueStats {
            total_pending,
            total_active,
            total_archived,
            avg_processing_ms: self.current_estimate_ms().await,
        }
    }

    /// Batch lookup over job ids and user ids. Partial failures are reported
    /// per entry.
    pub async fn batch_status(
        &self,
        job_ids: &[String],
        user_ids: &[String],
    ) -> BatchStatusView {
        let items = self
            .with_store(|store| {
                job_ids
                    .iter()
                    .map(|id| (id.clone(), store.find_by_id(id).map(JobView::from)))
                    .collect::<HashMap<_, _>>()
            })
            .await;

        let mut user_statuses = HashMap::new();
        for user_id in user_ids {
            user_statuses.insert(user_id.clone(), self.user_status(user_id).await);
        }

        BatchStatusView {
            items,
            user_statuses,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::constants::DEFAULT_ESTIMATE_MS;
    use crate::application::dispatcher::JobDispatcher;
    use crate::domain::{Endpoint, QueueConfig};
    use crate::port::backend::mocks::{MockGenerationBackend, MockSubtitleBackend};
    use crate::port::id_provider::mocks::SequentialIdProvider;
    use crate::port::time_provider::SystemTimeProvider;
    use crate::port::SubtitleTaskState;
    use std::sync::Arc;

    fn manager(concurrency_limit: usize) -> Arc<QueueManager> {
        // Slow backend keeps submitted jobs pending/active during assertions.
        let backend = Arc::new(MockGenerationBackend::new_delay(
            5_000,
            serde_json::json!({}),
        ));
        let subtitle = Arc::new(MockSubtitleBackend::new(
            1,
            SubtitleTaskState::Succeeded(serde_json::json!({})),
        ));
        let dispatcher =
            Arc::new(JobDispatcher::new(subtitle).register(Endpoint::GenerateText, backend));
        Arc::new(QueueManager::new(
            dispatcher,
            Arc::new(SystemTimeProvider),
            Arc::new(SequentialIdProvider::new()),
            QueueConfig {
                concurrency_limit,
                ..Default::default()
            },
        ))
    }

    #[tokio::test]
    async fn unknown_job_id_is_not_found() {
        let manager = manager(2);
        let err = manager.job_view("no-such-id").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn user_with_nothing_pending_has_position_zero() {
        let manager = manager(2);
        let status = manager.user_status("user-1").await;
        assert_eq!(status.position, 0);
        assert_eq!(status.estimated_wait_ms, 0);
    }

    #[tokio::test]
    async fn wait_estimate_divides_by_concurrency_limit() {
        let manager = manager(2);

        // Fill both active slots, then queue two more.
        for _ in 0..3 {
            manager
                .submit("user-1", "generate-text", Some(serde_json::json!({})))
                .await
                .unwrap();
        }
        manager
            .submit("user-2", "generate-text", Some(serde_json::json!({})))
            .await
            .unwrap();

        // Let the spawned scheduling passes run.
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;

        let u1 = manager.user_status("user-1").await;
        let u2 = manager.user_status("user-2").await;

        assert_eq!(u1.position, 1);
        assert_eq!(u2.position, 2);
        assert_eq!(u1.estimated_wait_ms, DEFAULT_ESTIMATE_MS / 2);
        assert_eq!(u2.estimated_wait_ms, DEFAULT_ESTIMATE_MS);
        // Wait-time is monotonic in position.
        assert!(u1.estimated_wait_ms <= u2.estimated_wait_ms);
    }

    #[tokio::test]
    async fn batch_reports_unknown_ids_per_entry() {
        let manager = manager(1);
        let id = manager
            .submit("user-1", "generate-text", Some(serde_json::json!({})))
            .await
            .unwrap();

        let batch = manager
            .batch_status(
                &[id.clone(), "missing".to_string()],
                &["user-1".to_string()],
            )
            .await;

        assert!(batch.items.get(&id).unwrap().is_some());
        assert!(batch.items.get("missing").unwrap().is_none());
        assert!(batch.user_statuses.contains_key("user-1"));
    }
}
