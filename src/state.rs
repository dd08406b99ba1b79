use std::sync::Arc;

use crate::service::LicenseService;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<LicenseService>,
    /// Resolve client addresses from forwarding headers
    pub trust_proxy: bool,
}

impl AppState {
    pub fn new(service: LicenseService) -> Self {
        Self {
            service: Arc::new(service),
            trust_proxy: false,
        }
    }

    pub fn with_trust_proxy(mut self, trust_proxy: bool) -> Self {
        self.trust_proxy = trust_proxy;
        self
    }
}
