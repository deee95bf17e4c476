use std::sync::Arc;

use crate::models::{EndpointRecord, HttpMethod};

/// Point-in-time, immutable view of the registry.
///
/// Records keep registration order. A re-registered id moves to the end.
#[derive(Debug, Default)]
pub struct RegistrySnapshot {
    pub(super) records: Vec<Arc<EndpointRecord>>,
}

impl RegistrySnapshot {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EndpointRecord> + '_ {
        self.records.iter().map(|r| r.as_ref())
    }

    pub fn get(&self, id: &str) -> Option<&EndpointRecord> {
        self.iter().find(|r| r.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn by_group<'a>(&'a self, group_id: &'a str) -> impl Iterator<Item = &'a EndpointRecord> {
        self.iter().filter(move |r| r.group_id == group_id)
    }

    pub fn running(&self) -> impl Iterator<Item = &EndpointRecord> + '_ {
        self.iter().filter(|r| r.is_running())
    }

    /// Resolve an inbound request to the running endpoint serving it
    pub fn route(&self, path: &str, method: HttpMethod) -> Option<&EndpointRecord> {
        self.running()
            .filter(|r| r.path == path && r.allows(method))
            .last()
    }

    /// Copies safe to hand to other nodes and API consumers
    pub fn exchange_copies(&self) -> Vec<EndpointRecord> {
        self.iter().map(EndpointRecord::exchange_copy).collect()
    }

    pub(super) fn position(&self, id: &str) -> Option<usize> {
        self.records.iter().position(|r| r.id == id)
    }
}
