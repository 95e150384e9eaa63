use chrono::{DateTime, Utc};
use serde::Serialize;
use sriov_core::{ExtenderFilterResult, SlotCount};
use std::collections::BTreeMap;

/// Outcome of evaluating one filter request
#[derive(Debug, Clone)]
pub enum FilterOutcome {
    /// The pod does not need VFs; no verdict was made and no state changed
    NotApplicable,
    /// Per-node verdicts for a pod that needs VFs
    Evaluated(ExtenderFilterResult),
}

impl FilterOutcome {
    /// Whether the selector gated the request out
    pub fn is_not_applicable(&self) -> bool {
        matches!(self, FilterOutcome::NotApplicable)
    }

    /// Consume into the evaluated result, if any
    pub fn into_result(self) -> Option<ExtenderFilterResult> {
        match self {
            FilterOutcome::NotApplicable => None,
            FilterOutcome::Evaluated(result) => Some(result),
        }
    }
}

/// Point-in-time copy of the extender bookkeeping, for operators
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtenderSnapshot {
    /// Aggregate promised count
    pub promised: SlotCount,
    /// Number of recorded promises
    pub promises: usize,
    /// Timestamp of the oldest outstanding promise
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oldest_promise: Option<DateTime<Utc>>,
    /// Allocated slots per node
    pub ledger: BTreeMap<String, SlotCount>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_outcome_accessors() {
        let na = FilterOutcome::NotApplicable;
        assert!(na.is_not_applicable());
        assert!(na.into_result().is_none());

        let evaluated = FilterOutcome::Evaluated(ExtenderFilterResult::default());
        assert!(!evaluated.is_not_applicable());
        assert!(evaluated.into_result().is_some());
    }

    #[test]
    fn test_snapshot_serialization() {
        let snapshot = ExtenderSnapshot {
            promised: 2,
            promises: 2,
            oldest_promise: None,
            ledger: BTreeMap::from([("node1".to_string(), 1)]),
        };

        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["promised"], 2);
        assert_eq!(value["ledger"]["node1"], 1);
        assert!(value.get("oldestPromise").is_none());
    }
}
