use crate::{ApiError, Result};
use sriov_core::{is_valid_name, ExtenderArgs, SriovError};

/// Reject filter requests the extender cannot evaluate
pub fn validate_args(args: &ExtenderArgs) -> Result<()> {
    let pod_name = args.pod.metadata.name.as_deref().unwrap_or_default();
    if pod_name.is_empty() {
        return Err(SriovError::invalid_request(
            "pod has no metadata.name",
            "The scheduler must send the full pod object",
        )
        .into());
    }

    if args.nodes.is_none() && args.node_names.is_some() {
        return Err(SriovError::invalid_request(
            "request carries node names only",
            "Configure the extender with nodeCacheCapable: false so full nodes are sent",
        )
        .into());
    }

    Ok(())
}

/// Validate a node name (DNS-1123 subdomain)
pub fn validate_name(name: &str) -> Result<()> {
    if !is_valid_name(name) {
        return Err(ApiError::BadRequest(format!(
            "Invalid node name: {}. Must be a valid DNS-1123 subdomain (lowercase alphanumeric, '-', or '.')",
            name
        )));
    }
    Ok(())
}
