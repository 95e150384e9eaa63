pub mod quantities;

pub use quantities::{parse_slot_quantity, SlotCount};

use crate::Result;
use k8s_openapi::api::core::v1::{Node, Pod};

/// Allocatable resource under which node discovery publishes the VF total
pub const TOTAL_VFS_RESOURCE: &str = "totalvfs";

/// Advertised capacity of a node for a named resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capacity {
    /// The node advertises the resource with this many slots
    Present(SlotCount),
    /// The node has no entry for the resource
    Absent,
}

/// Node name, or "unknown" for nameless nodes
pub fn node_name(node: &Node) -> String {
    node.metadata
        .name
        .as_ref()
        .unwrap_or(&"unknown".to_string())
        .clone()
}

/// "namespace/name" of a pod for log lines
pub fn pod_display_name(pod: &Pod) -> String {
    format!(
        "{}/{}",
        pod.metadata.namespace.as_deref().unwrap_or("default"),
        pod.metadata.name.as_deref().unwrap_or("unknown")
    )
}

/// Validate a Kubernetes object name (DNS-1123 subdomain)
pub fn is_valid_name(name: &str) -> bool {
    if name.is_empty() || name.len() > 253 {
        return false;
    }

    let bytes = name.as_bytes();
    let alnum = |c: &u8| c.is_ascii_lowercase() || c.is_ascii_digit();

    if !alnum(&bytes[0]) || !alnum(&bytes[bytes.len() - 1]) {
        return false;
    }

    bytes.iter().all(|c| alnum(c) || *c == b'-' || *c == b'.')
}

/// Look up the advertised total of `resource` in the node's allocatable table.
///
/// Absence is not an error: it means discovery has not run on the node yet.
/// A present but unparseable value is.
pub fn advertised_total(node: &Node, resource: &str) -> Result<Capacity> {
    let quantity = node
        .status
        .as_ref()
        .and_then(|s| s.allocatable.as_ref())
        .and_then(|a| a.get(resource));

    match quantity {
        Some(q) => parse_slot_quantity(&q.0).map(Capacity::Present),
        None => Ok(Capacity::Absent),
    }
}
