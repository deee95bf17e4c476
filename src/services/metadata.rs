use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::models::EndpointMetadata;

/// Source of per-endpoint parameter and response descriptors
pub trait MetadataSource: Send + Sync {
    fn metadata(&self, endpoint_id: &str) -> Option<Arc<EndpointMetadata>>;
}

/// In-memory descriptor catalog fed by the flow layer
#[derive(Default)]
pub struct MetadataCatalog {
    entries: RwLock<HashMap<String, Arc<EndpointMetadata>>>,
}

impl MetadataCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, endpoint_id: impl Into<String>, metadata: EndpointMetadata) {
        let endpoint_id = endpoint_id.into();
        tracing::debug!(endpoint_id = %endpoint_id, "Endpoint metadata updated");
        self.entries.write().insert(endpoint_id, Arc::new(metadata));
    }

    pub fn remove(&self, endpoint_id: &str) -> bool {
        self.entries.write().remove(endpoint_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl MetadataSource for MetadataCatalog {
    fn metadata(&self, endpoint_id: &str) -> Option<Arc<EndpointMetadata>> {
        self.entries.read().get(endpoint_id).cloned()
    }
}
