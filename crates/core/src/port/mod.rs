// Port Layer - Interfaces for external dependencies

pub mod backend;
pub mod id_provider; // For deterministic testing
pub mod time_provider;

// Re-exports
pub use backend::{BackendError, GenerationBackend, SubtitleBackend, SubtitleTaskState};
pub use id_provider::IdProvider;
pub use time_provider::TimeProvider;
