// Queue Configuration

/// Admission queue configuration, consumed at construction time.
#[derive(Debug, Clone)]
pub struct QueueConfig {
    /// Maximum number of jobs processing at once.
    pub concurrency_limit: usize,
    /// Rolling window size for the processing-time estimator.
    pub max_processing_history: usize,
    /// Archived (completed/failed) job cache cap.
    pub max_archived_items: usize,
    /// Age after which pending and archived entries are swept (ms).
    pub retention_window_ms: i64,
    /// Interval between retention sweeps (ms).
    pub sweep_interval_ms: u64,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            concurrency_limit: 2,
            max_processing_history: 50,
            max_archived_items: 1000,
            retention_window_ms: 10 * 60 * 1000, // 10 minutes
            sweep_interval_ms: 5 * 60 * 1000,    // 5 minutes
        }
    }
}
