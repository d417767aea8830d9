// Application Layer - Queue control logic

pub mod admission;
pub mod constants;
pub mod dispatcher;
pub mod estimator;
pub mod shutdown;
pub mod status;
pub mod store;
pub mod sweeper;

// Re-exports
pub use admission::{QueueManager, SweepStats};
pub use dispatcher::{DispatchError, JobDispatcher};
pub use estimator::ProcessingTimeEstimator;
pub use shutdown::{shutdown_channel, ShutdownSender, ShutdownToken};
pub use status::{BatchStatusView, GlobalStatusView, JobView, QueueStats, QueueStatusView};
pub use store::QueueStore;
pub use sweeper::SweepScheduler;
