use k8s_openapi::api::core::v1::Pod;
use tracing::debug;

/// Pod annotation listing the networks a pod attaches to
pub const NETWORKS_ANNOTATION: &str = "networks";

/// Network name that requires a VF
pub const SRIOV_NETWORK: &str = "sriov";

/// Capability selector trait
///
/// Decides whether a pod needs the constrained resource at all. Must be a pure
/// function of the pod; it is called before the extender takes its lock.
pub trait Selector: Send + Sync {
    /// Whether the pod needs VF-aware filtering
    fn needs_constrained_resource(&self, pod: &Pod) -> bool;

    /// Name of the selector
    fn name(&self) -> &str;
}

/// Selects pods whose networks annotation names the SR-IOV network.
///
/// The annotation is either a comma-separated list (`"calico,sriov"`) or a
/// JSON list of names or `{"name": ...}` objects.
#[derive(Debug, Clone)]
pub struct NetworkSelector {
    annotation: String,
    network: String,
}

impl NetworkSelector {
    /// Create a selector for a custom annotation and network name
    pub fn new(annotation: impl Into<String>, network: impl Into<String>) -> Self {
        Self {
            annotation: annotation.into(),
            network: network.into(),
        }
    }

    fn listed_networks(value: &str) -> Vec<String> {
        let trimmed = value.trim();
        if trimmed.starts_with('[') {
            if let Ok(entries) = serde_json::from_str::<Vec<serde_json::Value>>(trimmed) {
                return entries
                    .iter()
                    .filter_map(|entry| match entry {
                        serde_json::Value::String(name) => Some(name.clone()),
                        serde_json::Value::Object(obj) => obj
                            .get("name")
                            .and_then(|n| n.as_str())
                            .map(str::to_string),
                        _ => None,
                    })
                    .collect();
            }
        }

        trimmed
            .split(',')
            .map(|entry| entry.trim().to_string())
            .filter(|entry| !entry.is_empty())
            .collect()
    }
}

impl Default for NetworkSelector {
    fn default() -> Self {
        Self::new(NETWORKS_ANNOTATION, SRIOV_NETWORK)
    }
}

impl Selector for NetworkSelector {
    fn needs_constrained_resource(&self, pod: &Pod) -> bool {
        let value = match pod
            .metadata
            .annotations
            .as_ref()
            .and_then(|a| a.get(&self.annotation))
        {
            Some(v) => v,
            None => return false,
        };

        let wanted = Self::listed_networks(value)
            .iter()
            .any(|n| n.eq_ignore_ascii_case(&self.network));

        debug!(
            "Pod annotation {}={} selects network {}: {}",
            self.annotation, value, self.network, wanted
        );
        wanted
    }

    fn name(&self) -> &str {
        "NetworkSelector"
    }
}

/// Selects pods where any container requests or limits a named resource
#[derive(Debug, Clone)]
pub struct ResourceRequestSelector {
    resource: String,
}

impl ResourceRequestSelector {
    /// Create a selector for the given extended resource name
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
        }
    }
}

impl Selector for ResourceRequestSelector {
    fn needs_constrained_resource(&self, pod: &Pod) -> bool {
        let pod_spec = match &pod.spec {
            Some(spec) => spec,
            None => return false,
        };

        let init_containers = pod_spec.init_containers.as_deref().unwrap_or_default();

        pod_spec
            .containers
            .iter()
            .chain(init_containers)
            .filter_map(|c| c.resources.as_ref())
            .any(|resources| {
                let requested = resources
                    .requests
                    .as_ref()
                    .is_some_and(|r| r.contains_key(&self.resource));
                let limited = resources
                    .limits
                    .as_ref()
                    .is_some_and(|l| l.contains_key(&self.resource));
                requested || limited
            })
    }

    fn name(&self) -> &str {
        "ResourceRequestSelector"
    }
}

/// Get the default selector
pub fn default_selector() -> Box<dyn Selector> {
    Box::new(NetworkSelector::default())
}
