// Queue Store
// The authoritative in-memory state: pending (FIFO), active (capped by the
// concurrency limit), archived (bounded cache). A job is in exactly one
// collection at any time. Mutated only by the admission controller, inside
// its lock.

use crate::domain::{Job, JobId, JobState};
use std::collections::{HashMap, VecDeque};
use tracing::debug;

pub struct QueueStore {
    pending: VecDeque<Job>,
    active: HashMap<JobId, Job>,
    archived: Vec<Job>,
    max_archived: usize,
}

impl QueueStore {
    pub fn new(max_archived: usize) -> Self {
        Self {
            pending: VecDeque::new(),
            active: HashMap::new(),
            archived: Vec::new(),
            max_archived,
        }
    }

    /// Append a freshly submitted job to the tail of pending.
    pub fn append(&mut self, job: Job) {
        debug_assert_eq!(job.state, JobState::Queued);
        self.pending.push_back(job);
    }

    /// Remove and return the head of pending (FIFO).
    pub fn pop_next_pending(&mut self) -> Option<Job> {
        self.pending.pop_front()
    }

    /// Track a job as processing.
    pub fn mark_active(&mut self, job: Job) {
        debug_assert_eq!(job.state, JobState::Processing);
        self.active.insert(job.id.clone(), job);
    }

    /// Remove a job from the active set, handing it back for settlement.
    pub fn take_active(&mut self, id: &str) -> Option<Job> {
        self.active.remove(id)
    }

    /// Insert a settled job into the archive. If the archive exceeds its cap,
    /// the entries with the oldest `submitted_at` are evicted first.
    pub fn archive(&mut self, job: Job) {
        debug_assert!(job.is_terminal());
        self.archived.push(job);
        while self.archived.len() > self.max_archived {
            let oldest = self
                .archived
                .iter()
                .enumerate()
                .min_by_key(|(_, j)| j.submitted_at)
                .map(|(i, _)| i);
            if let Some(i) = oldest {
                let evicted = self.archived.swap_remove(i);
                debug!(job_id = %evicted.id, "Evicted archived job over capacity");
            }
        }
    }

    /// Look a job up across all three collections, pending first. Pending and
    /// active are disjoint by construction.
    pub fn find_by_id(&self, id: &str) -> Option<&Job> {
        self.pending
            .iter()
            .find(|j| j.id == id)
            .or_else(|| self.active.get(id))
            .or_else(|| self.archived.iter().find(|j| j.id == id))
    }

    /// 1-based FIFO index of the user's first pending job, 0 if none.
    pub fn position_of(&self, user_id: &str) -> usize {
        self.pending
            .iter()
            .position(|j| j.user_id == user_id)
            .map(|i| i + 1)
            .unwrap_or(0)
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    pub fn archived_len(&self) -> usize {
        self.archived.len()
    }

    /// Drop pending and archived entries older than the retention window.
    /// Active jobs are never swept mid-flight. Returns (pending, archived)
    /// removal counts.
    pub fn sweep_expired(&mut self, now_millis: i64, retention_window_ms: i64) -> (usize, usize) {
        let cutoff = now_millis - retention_window_ms;

        let pending_before = self.pending.len();
        self.pending.retain(|j| j.submitted_at >= cutoff);
        let pending_removed = pending_before - self.pending.len();

        let archived_before = self.archived.len();
        self.archived.retain(|j| j.submitted_at >= cutoff);
        let archived_removed = archived_before - self.archived.len();

        (pending_removed, archived_removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Endpoint, JobPayload};

    fn queued_job(id: &str, submitted_at: i64, user: &str) -> Job {
        Job::new(
            id,
            submitted_at,
            user,
            Endpoint::GenerateText,
            JobPayload::new(serde_json::json!({})),
        )
    }

    fn archived_job(id: &str, submitted_at: i64) -> Job {
        let mut job = queued_job(id, submitted_at, "u1");
        job.start(submitted_at + 1).unwrap();
        job.complete(submitted_at + 2, serde_json::json!({"ok": true}))
            .unwrap();
        job
    }

    #[test]
    fn pending_is_fifo() {
        let mut store = QueueStore::new(10);
        store.append(queued_job("a", 1, "u1"));
        store.append(queued_job("b", 2, "u1"));
        store.append(queued_job("c", 3, "u2"));

        assert_eq!(store.pop_next_pending().unwrap().id, "a");
        assert_eq!(store.pop_next_pending().unwrap().id, "b");
        assert_eq!(store.pop_next_pending().unwrap().id, "c");
        assert!(store.pop_next_pending().is_none());
    }

    #[test]
    fn archive_evicts_oldest_submitted() {
        let mut store = QueueStore::new(2);
        store.archive(archived_job("a", 100));
        store.archive(archived_job("b", 200));
        store.archive(archived_job("c", 300)); // evicts a

        assert_eq!(store.archived_len(), 2);
        assert!(store.find_by_id("a").is_none());
        assert!(store.find_by_id("b").is_some());
        assert!(store.find_by_id("c").is_some());
    }

    #[test]
    fn find_checks_pending_then_active_then_archived() {
        let mut store = QueueStore::new(10);
        store.append(queued_job("p", 1, "u1"));

        let mut active = queued_job("x", 2, "u1");
        active.start(3).unwrap();
        store.mark_active(active);

        store.archive(archived_job("z", 4));

        assert_eq!(store.find_by_id("p").unwrap().state, JobState::Queued);
        assert_eq!(store.find_by_id("x").unwrap().state, JobState::Processing);
        assert_eq!(store.find_by_id("z").unwrap().state, JobState::Completed);
        assert!(store.find_by_id("missing").is_none());
    }

    #[test]
    fn position_is_one_based_first_match() {
        let mut store = QueueStore::new(10);
        store.append(queued_job("a", 1, "u1"));
        store.append(queued_job("b", 2, "u2"));
        store.append(queued_job("c", 3, "u2"));

        assert_eq!(store.position_of("u1"), 1);
        assert_eq!(store.position_of("u2"), 2);
        assert_eq!(store.position_of("u3"), 0);
    }

    #[test]
    fn sweep_removes_expired_pending_and_archived_only() {
        let mut store = QueueStore::new(10);
        store.append(queued_job("old-pending", 1000, "u1"));
        store.append(queued_job("new-pending", 9000, "u1"));
        store.archive(archived_job("old-done", 500));

        let mut active = queued_job("old-active", 100, "u2");
        active.start(200).unwrap();
        store.mark_active(active);

        // Retention window 5000ms at t=10_000: cutoff is 5000.
        let (pending_removed, archived_removed) = store.sweep_expired(10_000, 5000);

        assert_eq!(pending_removed, 1);
        assert_eq!(archived_removed, 1);
        assert!(store.find_by_id("old-pending").is_none());
        assert!(store.find_by_id("new-pending").is_some());
        // Active entries are never swept mid-flight.
        assert!(store.find_by_id("old-active").is_some());
    }
}
