use k8s_openapi::api::core::v1::{Node, Pod};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Rejected node name to human-readable reason
pub type FailedNodesMap = BTreeMap<String, String>;

/// Node list as carried by the scheduler extender protocol
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeList {
    /// Candidate nodes
    #[serde(default)]
    pub items: Vec<Node>,
}

impl NodeList {
    /// Create a node list from nodes
    pub fn new(items: Vec<Node>) -> Self {
        Self { items }
    }
}

/// Arguments of a filter call sent by the scheduler
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtenderArgs {
    /// Pod being scheduled
    #[serde(default)]
    pub pod: Pod,
    /// Candidate nodes (full objects)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodes: Option<NodeList>,
    /// Candidate node names, sent instead of `nodes` by node-cache-capable extenders
    #[serde(
        default,
        rename = "nodenames",
        skip_serializing_if = "Option::is_none"
    )]
    pub node_names: Option<Vec<String>>,
}

impl ExtenderArgs {
    /// Create filter arguments for a pod and its candidate nodes
    pub fn new(pod: Pod, nodes: Vec<Node>) -> Self {
        Self {
            pod,
            nodes: Some(NodeList::new(nodes)),
            node_names: None,
        }
    }

    /// Candidate nodes, empty when the scheduler only sent names
    pub fn candidate_nodes(&self) -> &[Node] {
        self.nodes.as_ref().map(|n| n.items.as_slice()).unwrap_or(&[])
    }
}

/// Result of a filter call returned to the scheduler
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtenderFilterResult {
    /// Nodes that may host the pod
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodes: Option<NodeList>,
    /// Names of nodes that may host the pod
    #[serde(
        default,
        rename = "nodenames",
        skip_serializing_if = "Option::is_none"
    )]
    pub node_names: Option<Vec<String>>,
    /// Nodes that cannot host the pod, with the reason
    #[serde(
        default,
        rename = "failedNodes",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub failed_nodes: FailedNodesMap,
    /// Advisory message, set when no node was accepted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExtenderFilterResult {
    /// A result accepting every candidate of the request without comment,
    /// echoing node objects or node names in whichever form they were sent
    pub fn pass_through(args: ExtenderArgs) -> Self {
        Self {
            nodes: args.nodes,
            node_names: args.node_names,
            ..Default::default()
        }
    }

    /// Accepted nodes
    pub fn accepted(&self) -> &[Node] {
        self.nodes.as_ref().map(|n| n.items.as_slice()).unwrap_or(&[])
    }

    /// Names of accepted nodes in list order
    pub fn accepted_names(&self) -> Vec<String> {
        self.accepted().iter().map(crate::node_name).collect()
    }
}
