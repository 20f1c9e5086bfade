//! Service wiring: one shared set per process, injected into handlers.

use std::sync::Arc;

use hivewatch_auth::{AccountService, Authenticator};
use hivewatch_store::DirectoryStore;

pub struct AppServices {
    pub accounts: AccountService,
    pub authenticator: Authenticator,
    /// Direct store handle for the read-only plumbing routes (roles,
    /// hives, telemetry) that have no decision logic of their own.
    pub store: Arc<dyn DirectoryStore>,
}

impl AppServices {
    pub fn new(store: Arc<dyn DirectoryStore>) -> Self {
        Self {
            accounts: AccountService::new(store.clone()),
            authenticator: Authenticator::new(store.clone()),
            store,
        }
    }
}
