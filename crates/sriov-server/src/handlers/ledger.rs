use crate::validation::validate_name;
use crate::{AppState, Result};
use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use sriov_core::SlotCount;
use sriov_extender::ExtenderSnapshot;
use std::sync::Arc;
use tracing::info;

/// Body of a ledger update
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerUpdate {
    /// VFs currently allocated on the node
    pub allocated: SlotCount,
}

/// Ledger entry after an update
#[derive(Debug, Clone, Serialize)]
pub struct LedgerEntry {
    pub node: String,
    pub allocated: SlotCount,
    pub previous: SlotCount,
}

/// GET /api/v1/state
pub async fn get_state(State(state): State<Arc<AppState>>) -> Json<ExtenderSnapshot> {
    Json(state.extender.snapshot())
}

/// PUT /api/v1/ledger/{node}
pub async fn set_ledger_entry(
    State(state): State<Arc<AppState>>,
    Path(node): Path<String>,
    Json(update): Json<LedgerUpdate>,
) -> Result<Json<LedgerEntry>> {
    validate_name(&node)?;

    info!("Updating ledger for node {}: {} VFs allocated", node, update.allocated);

    let previous = state.extender.set_allocated(&node, update.allocated)?;

    Ok(Json(LedgerEntry {
        node,
        allocated: update.allocated,
        previous,
    }))
}
