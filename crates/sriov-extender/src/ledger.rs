use sriov_core::SlotCount;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Slots already allocated to placed workloads, per node.
///
/// Entries are created at zero on first reference and never removed. The
/// ledger lives inside the extender's locked state; `&mut self` on every
/// accessor keeps it that way.
#[derive(Debug, Default)]
pub struct Ledger {
    allocated: HashMap<String, SlotCount>,
}

impl Ledger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocated slots on a node, zero for a node never seen before
    pub fn allocated_for(&mut self, node_name: &str) -> SlotCount {
        *self
            .allocated
            .entry(node_name.to_string())
            .or_insert_with(|| {
                debug!("Tracking allocations for new node {}", node_name);
                0
            })
    }

    /// Overwrite the allocated count of a node, returning the previous value
    pub fn set_allocated(&mut self, node_name: &str, allocated: SlotCount) -> SlotCount {
        self.allocated
            .insert(node_name.to_string(), allocated)
            .unwrap_or(0)
    }

    /// Number of tracked nodes
    pub fn len(&self) -> usize {
        self.allocated.len()
    }

    /// Whether no node has been tracked yet
    pub fn is_empty(&self) -> bool {
        self.allocated.is_empty()
    }

    /// Sorted copy of the ledger
    pub fn snapshot(&self) -> BTreeMap<String, SlotCount> {
        self.allocated
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect()
    }
}
