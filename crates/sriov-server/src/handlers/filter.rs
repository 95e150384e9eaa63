use crate::validation::validate_args;
use crate::{AppState, Result};
use axum::extract::State;
use axum::Json;
use sriov_core::{pod_display_name, ExtenderArgs, ExtenderFilterResult};
use std::sync::Arc;
use tracing::{debug, info};

/// POST /filter
///
/// Pods that do not need VFs are passed through with every candidate and no
/// failures, before any validation. Only pods the selector picks must carry a
/// name and full node objects.
pub async fn filter_nodes(
    State(state): State<Arc<AppState>>,
    Json(args): Json<ExtenderArgs>,
) -> Result<Json<ExtenderFilterResult>> {
    let pod_name = pod_display_name(&args.pod);

    if !state.extender.selects(&args.pod) {
        debug!("Pod {} does not need VFs, passing nodes through", pod_name);
        return Ok(Json(ExtenderFilterResult::pass_through(args)));
    }

    validate_args(&args)?;

    info!(
        "Filtering {} candidate nodes for pod {}",
        args.candidate_nodes().len(),
        pod_name
    );

    let result = state
        .extender
        .filter(&args)
        .into_result()
        .unwrap_or_else(|| ExtenderFilterResult::pass_through(args));

    debug!("Pod {} may run on {:?}", pod_name, result.accepted_names());

    Ok(Json(result))
}
