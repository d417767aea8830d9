// Scheduling constants (no magic values in control flow)
use std::time::Duration;

/// Delay before re-entering scheduling after a job settles (100ms).
/// Keeps the settle path from starving the runtime; not a correctness
/// requirement.
pub const RESCHEDULE_DELAY: Duration = Duration::from_millis(100);

/// Wait-time estimate when the rolling window is empty (30s)
pub const DEFAULT_ESTIMATE_MS: i64 = 30_000;

/// Fixed delay between subtitle task status polls (3s)
pub const SUBTITLE_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Maximum subtitle status polls before the flow is abandoned
pub const SUBTITLE_POLL_MAX_ATTEMPTS: u32 = 60;
