use sriov_extender::Extender;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Filter engine shared by all requests
    pub extender: Arc<Extender>,
}

impl AppState {
    /// Create a new AppState around an extender
    pub fn new(extender: Arc<Extender>) -> Self {
        Self { extender }
    }
}
