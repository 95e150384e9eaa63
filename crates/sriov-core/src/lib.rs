//! SR-IOV Core - Shared types for the SR-IOV scheduler extender
//!
//! This crate provides:
//! - Scheduler extender wire types (filter arguments and results)
//! - Slot quantity parsing for advertised node capacity
//! - Error types with miette diagnostics

pub mod error;
pub mod resources;
pub mod types;

// Re-export commonly used types
pub use error::{Result, SriovError};
pub use resources::{
    advertised_total, is_valid_name, node_name, pod_display_name, Capacity, SlotCount, TOTAL_VFS_RESOURCE,
};
pub use types::{ExtenderArgs, ExtenderFilterResult, FailedNodesMap, NodeList};

// Re-export k8s-openapi types for convenience
pub use k8s_openapi;
pub use k8s_openapi::api::core::v1::{Node, Pod};
pub use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
pub use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
