//! SR-IOV Extender - VF-aware node filtering for the scheduler extender protocol
//!
//! This crate provides:
//! - Capability selectors deciding which pods need VFs
//! - The per-node allocation ledger
//! - The cluster-wide promise tracker for in-flight reservations
//! - The filter engine tying them together under one lock
//! - A periodic reaper purging expired promises

pub mod error;
pub mod types;
pub mod selector;
pub mod ledger;
pub mod promises;
pub mod extender;
pub mod reaper;

// Re-export commonly used types
pub use error::{ExtenderError, Result};
pub use extender::{Extender, ExtenderConfig};
pub use ledger::Ledger;
pub use promises::PromiseTracker;
pub use reaper::{PromiseReaper, ReaperConfig};
pub use selector::{NetworkSelector, ResourceRequestSelector, Selector};
pub use types::{ExtenderSnapshot, FilterOutcome};
