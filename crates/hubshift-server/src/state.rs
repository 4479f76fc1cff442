use hubshift_core::routing::RouteTable;
use hubshift_engine::IdentityVerifier;
use hubshift_store::Repository;
use std::sync::Arc;

use crate::config::Settings;

/// Shared by every handler
pub struct AppState {
    pub repo: Arc<dyn Repository>,
    pub verifier: Arc<dyn IdentityVerifier>,
    pub settings: Settings,
    pub routes: RouteTable,
}

impl AppState {
    pub fn new(
        repo: Arc<dyn Repository>,
        verifier: Arc<dyn IdentityVerifier>,
        settings: Settings,
    ) -> Arc<Self> {
        Arc::new(Self {
            repo,
            verifier,
            settings,
            routes: RouteTable::standard(),
        })
    }
}
