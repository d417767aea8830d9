//! JSON-RPC API Layer
//!
//! Exposes the admission queue's public surface over JSON-RPC 2.0.

pub mod error;
pub mod handler;
pub mod rate_limiter;
pub mod server;
pub mod types;

pub use server::RpcServer;
