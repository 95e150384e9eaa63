use crate::ledger::Ledger;
use crate::promises::PromiseTracker;
use crate::selector::{default_selector, Selector};
use crate::types::{ExtenderSnapshot, FilterOutcome};
use crate::Result;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use sriov_core::{
    advertised_total, node_name, pod_display_name, Capacity, ExtenderArgs, ExtenderFilterResult,
    FailedNodesMap, NodeList, Pod, SlotCount, SriovError, TOTAL_VFS_RESOURCE,
};
use tracing::{debug, info, warn};

/// Advisory returned when no candidate node was accepted
pub const NO_CAPACITY_MESSAGE: &str = "No nodes have available VFs.";

/// Configuration for the extender
#[derive(Debug, Clone)]
pub struct ExtenderConfig {
    /// Allocatable resource holding the advertised VF total of a node
    pub resource_name: String,
}

impl Default for ExtenderConfig {
    fn default() -> Self {
        Self {
            resource_name: TOTAL_VFS_RESOURCE.to_string(),
        }
    }
}

/// Ledger and promise tracker, always locked together
#[derive(Debug, Default)]
struct ExtenderState {
    ledger: Ledger,
    promises: PromiseTracker,
}

/// VF-aware filter engine.
///
/// One instance is built at startup and shared by every request handler.
/// All bookkeeping sits behind a single mutex, and a whole filter evaluation
/// runs under one acquisition, so decisions are serialized process-wide.
pub struct Extender {
    config: ExtenderConfig,
    selector: Box<dyn Selector>,
    state: Mutex<ExtenderState>,
}

impl Extender {
    /// Create an extender using the default network selector
    pub fn new(config: ExtenderConfig) -> Self {
        Self::with_selector(config, default_selector())
    }

    /// Create an extender with a custom selector
    pub fn with_selector(config: ExtenderConfig, selector: Box<dyn Selector>) -> Self {
        info!(
            "Creating extender (resource: {}, selector: {})",
            config.resource_name,
            selector.name()
        );
        Self {
            config,
            selector,
            state: Mutex::new(ExtenderState::default()),
        }
    }

    /// Extender configuration
    pub fn config(&self) -> &ExtenderConfig {
        &self.config
    }

    /// Whether the configured selector says the pod needs VFs
    pub fn selects(&self, pod: &Pod) -> bool {
        self.selector.needs_constrained_resource(pod)
    }

    /// Evaluate one filter request
    pub fn filter(&self, args: &ExtenderArgs) -> FilterOutcome {
        let pod = &args.pod;
        let pod_name = pod_display_name(pod);

        if !self.selects(pod) {
            debug!(
                "Pod {} not selected by {}, skipping VF filtering",
                pod_name,
                self.selector.name()
            );
            return FilterOutcome::NotApplicable;
        }

        let mut state = self.state.lock();
        let ExtenderState { ledger, promises } = &mut *state;

        // Promises recorded during this evaluation are not charged against
        // the remaining candidates of the same pod
        let promised = promises.global_promised_count();

        let mut accepted = Vec::new();
        let mut failed_nodes = FailedNodesMap::new();

        for node in args.candidate_nodes() {
            let name = node_name(node);

            let total = match advertised_total(node, &self.config.resource_name) {
                Ok(Capacity::Present(total)) => total,
                Ok(Capacity::Absent) => {
                    info!("No allocatable VFs on node {}", name);
                    continue;
                }
                Err(e) => {
                    warn!("Node {} advertises an unusable VF total: {}", name, e);
                    failed_nodes.insert(name, e.to_string());
                    continue;
                }
            };

            let allocated = ledger.allocated_for(&name);
            let free = i128::from(total) - i128::from(allocated) - i128::from(promised);

            debug!(
                "Node {} has {} VFs in total, {} allocated, {} promised cluster-wide",
                name, total, allocated, promised
            );

            if free > 0 {
                info!("Promising a VF on node {} to pod {}", name, pod_name);
                accepted.push(node.clone());
                promises.record_promise();
            } else {
                info!("Node {} has no VFs left for pod {}", name, pod_name);
                failed_nodes.insert(name, insufficient_vfs_message(allocated, promised, total));
            }
        }

        let error = if accepted.is_empty() {
            Some(NO_CAPACITY_MESSAGE.to_string())
        } else {
            None
        };

        info!(
            "Pod {}: {} nodes accepted, {} rejected, {} VFs promised",
            pod_name,
            accepted.len(),
            failed_nodes.len(),
            promises.global_promised_count()
        );

        FilterOutcome::Evaluated(ExtenderFilterResult {
            nodes: Some(NodeList::new(accepted)),
            node_names: None,
            failed_nodes,
            error,
        })
    }

    /// Aggregate number of outstanding promises
    pub fn global_promised_count(&self) -> SlotCount {
        self.state.lock().promises.global_promised_count()
    }

    /// Number of recorded promises
    pub fn promise_count(&self) -> usize {
        self.state.lock().promises.len()
    }

    /// Allocated slots on a node, zero for a node never seen before
    pub fn allocated_for(&self, node_name: &str) -> SlotCount {
        self.state.lock().ledger.allocated_for(node_name)
    }

    /// Publish the number of VFs actually allocated on a node.
    ///
    /// The filter path only ever reads the ledger; an external reconciler that
    /// watches bound pods is expected to keep it current through this call.
    pub fn set_allocated(&self, node_name: &str, allocated: SlotCount) -> Result<SlotCount> {
        if node_name.trim().is_empty() {
            return Err(SriovError::invalid_request(
                "node name is empty",
                "Pass the name of a cluster node",
            )
            .into());
        }

        let previous = self.state.lock().ledger.set_allocated(node_name, allocated);
        info!(
            "Ledger for node {} set to {} VFs (was {})",
            node_name, allocated, previous
        );
        Ok(previous)
    }

    /// Drop promises created before `older_than`, returning how many were removed
    pub fn purge_expired(&self, older_than: DateTime<Utc>) -> usize {
        self.state.lock().promises.purge_expired(older_than)
    }

    /// Copy of the current bookkeeping
    pub fn snapshot(&self) -> ExtenderSnapshot {
        let state = self.state.lock();
        ExtenderSnapshot {
            promised: state.promises.global_promised_count(),
            promises: state.promises.len(),
            oldest_promise: state.promises.oldest(),
            ledger: state.ledger.snapshot(),
        }
    }
}

impl Default for Extender {
    fn default() -> Self {
        Self::new(ExtenderConfig::default())
    }
}

fn insufficient_vfs_message(allocated: SlotCount, promised: SlotCount, total: SlotCount) -> String {
    format!(
        "Not sufficient number of VFs. Allocated: {}. Promised: {}. Total: {}",
        allocated, promised, total
    )
}
