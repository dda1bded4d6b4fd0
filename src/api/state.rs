// Shared state handed to every route handler

use crate::store::CertificateStore;
use crate::upsert::UpsertCoordinator;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CertificateStore>,
    pub coordinator: Arc<UpsertCoordinator>,
    /// Base URL for links in slash-command output
    pub public_url: String,
}

impl AppState {
    pub fn new(
        store: Arc<dyn CertificateStore>,
        coordinator: Arc<UpsertCoordinator>,
        public_url: String,
    ) -> Self {
        Self {
            store,
            coordinator,
            public_url,
        }
    }
}
