use async_trait::async_trait;
use estate_hub::config::StoreConfig;
use estate_hub::error::AppError;
use estate_hub::workflows::import::{
    CanonicalProperty, PropertyStore, RestPropertyStore, StoreError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Stand-in for the hosted table when no `STORE_URL` is configured.
#[derive(Default, Clone)]
pub(crate) struct InMemoryPropertyStore {
    records: Arc<Mutex<Vec<CanonicalProperty>>>,
}

#[async_trait]
impl PropertyStore for InMemoryPropertyStore {
    async fn insert_many(&self, records: &[CanonicalProperty]) -> Result<(), StoreError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| StoreError::Unavailable("in-memory store poisoned".to_string()))?;
        guard.extend_from_slice(records);
        Ok(())
    }
}

impl InMemoryPropertyStore {
    #[cfg(test)]
    pub(crate) fn records(&self) -> Vec<CanonicalProperty> {
        self.records.lock().expect("store mutex poisoned").clone()
    }
}

/// Picks the REST store when a URL is configured, otherwise memory.
pub(crate) fn build_store(config: &StoreConfig) -> Result<Arc<dyn PropertyStore>, AppError> {
    match RestPropertyStore::from_config(config)? {
        Some(store) => {
            info!(endpoint = store.endpoint(), "writing imports to hosted listings store");
            Ok(Arc::new(store))
        }
        None => {
            warn!("STORE_URL not set; imported listings are kept in memory only");
            Ok(Arc::new(InMemoryPropertyStore::default()))
        }
    }
}
