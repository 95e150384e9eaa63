//! SR-IOV Server - Scheduler extender webhook
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - The extender filter endpoint
//! - Health probes
//! - Operator endpoints for the ledger and promise state

pub mod error;
pub mod server;
pub mod handlers;
pub mod state;
pub mod validation;

// Re-export commonly used types
pub use error::{ApiError, Result};
pub use server::{ApiServer, Config};
pub use state::AppState;
