use std::sync::Arc;

use crate::config::Config;
use crate::registry::EndpointRegistry;
use crate::services::{ContractBuilder, ContractSettings, MetadataCatalog};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<EndpointRegistry>,
    /// Documentation fed by the endpoint owners, keyed by endpoint id
    pub metadata: Arc<MetadataCatalog>,
    pub contract: Arc<ContractBuilder>,
    pub config: Config,
}

impl AppState {
    /// State around a fresh registry with no listener
    pub fn new(config: Config) -> Self {
        Self::with_registry(config, Arc::new(EndpointRegistry::new()))
    }

    /// State around an existing registry, e.g. one wired to the publisher
    pub fn with_registry(config: Config, registry: Arc<EndpointRegistry>) -> Self {
        let metadata = Arc::new(MetadataCatalog::new());
        let contract = Arc::new(ContractBuilder::new(
            ContractSettings::from_config(&config),
            metadata.clone(),
        ));

        Self {
            registry,
            metadata,
            contract,
            config,
        }
    }
}
