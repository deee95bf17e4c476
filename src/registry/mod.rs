pub mod listener;
pub mod snapshot;

pub use listener::{ChangeOrigin, RegistryChange, RegistryListener, RemoteChange};
pub use snapshot::RegistrySnapshot;

use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::Mutex;

use crate::error::AppResult;
use crate::models::{EndpointRecord, FieldPatch, PatchValue};

/// Process-local store of published endpoints, keyed by id.
///
/// Writers are serialized by `write_lock` and publish a freshly built
/// snapshot with a single pointer swap. Readers load the current snapshot
/// and never wait for writers.
pub struct EndpointRegistry {
    write_lock: Mutex<()>,
    snapshot: ArcSwap<RegistrySnapshot>,
    listener: Option<Arc<dyn RegistryListener>>,
}

impl EndpointRegistry {
    pub fn new() -> Self {
        Self {
            write_lock: Mutex::new(()),
            snapshot: ArcSwap::from_pointee(RegistrySnapshot::default()),
            listener: None,
        }
    }

    /// Registry that reports every committed mutation to `listener`
    pub fn with_listener(listener: Arc<dyn RegistryListener>) -> Self {
        Self {
            listener: Some(listener),
            ..Self::new()
        }
    }

    /// Insert or replace the record with the same id
    pub fn register(&self, record: EndpointRecord) -> AppResult<()> {
        record.validate()?;
        self.upsert(record, ChangeOrigin::Local);
        Ok(())
    }

    /// Remove a record. Unknown ids are ignored; returns whether one was removed.
    pub fn unregister(&self, id: &str) -> bool {
        self.remove(id, ChangeOrigin::Local)
    }

    /// Best-effort update of one field by name.
    ///
    /// Unknown fields, `id`, mismatched value types and unknown endpoints are
    /// silently ignored. Returns whether the record changed.
    pub fn patch(&self, id: &str, field: &str, value: impl Into<PatchValue>) -> bool {
        match FieldPatch::parse(field, value.into()) {
            Some(patch) => self.apply(id, &patch),
            None => {
                tracing::debug!(endpoint_id = %id, field = %field, "Ignoring unsupported field patch");
                false
            }
        }
    }

    /// Apply a typed field update; returns whether the record changed
    pub fn apply(&self, id: &str, patch: &FieldPatch) -> bool {
        self.update(id, patch, ChangeOrigin::Local)
    }

    /// Mirror a change replicated from another node.
    ///
    /// Remote changes are reported to the listener with `ChangeOrigin::Remote`
    /// so the sync layer does not echo them back.
    pub fn apply_remote(&self, change: RemoteChange) -> bool {
        match change {
            RemoteChange::Upsert(record) => match record.validate() {
                Ok(()) => {
                    self.upsert(record, ChangeOrigin::Remote);
                    true
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Ignoring invalid replicated endpoint");
                    false
                }
            },
            RemoteChange::Remove(id) => self.remove(&id, ChangeOrigin::Remote),
        }
    }

    /// Immutable point-in-time view
    pub fn list(&self) -> Arc<RegistrySnapshot> {
        self.snapshot.load_full()
    }

    pub fn get(&self, id: &str) -> Option<EndpointRecord> {
        self.snapshot.load().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.snapshot.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.load().is_empty()
    }

    fn upsert(&self, record: EndpointRecord, origin: ChangeOrigin) {
        let _guard = self.write_lock.lock();
        let current = self.snapshot.load();

        let mut records: Vec<Arc<EndpointRecord>> = current
            .records
            .iter()
            .filter(|r| r.id != record.id)
            .cloned()
            .collect();
        let replaced = records.len() != current.records.len();
        let record = Arc::new(record);
        records.push(Arc::clone(&record));
        self.snapshot.store(Arc::new(RegistrySnapshot { records }));

        tracing::debug!(
            endpoint_id = %record.id,
            origin = origin.as_str(),
            replaced,
            "Endpoint registered"
        );
        self.notify(|| RegistryChange::Registered(record.as_ref().clone()), origin);
    }

    fn remove(&self, id: &str, origin: ChangeOrigin) -> bool {
        let _guard = self.write_lock.lock();
        let current = self.snapshot.load();
        let Some(index) = current.position(id) else {
            return false;
        };
        let removed = Arc::clone(&current.records[index]);

        let records = current
            .records
            .iter()
            .filter(|r| r.id != id)
            .cloned()
            .collect();
        self.snapshot.store(Arc::new(RegistrySnapshot { records }));

        tracing::debug!(endpoint_id = %id, origin = origin.as_str(), "Endpoint unregistered");
        self.notify(|| RegistryChange::Unregistered(removed.as_ref().clone()), origin);
        true
    }

    fn update(&self, id: &str, patch: &FieldPatch, origin: ChangeOrigin) -> bool {
        let _guard = self.write_lock.lock();
        let current = self.snapshot.load();
        let Some(index) = current.position(id) else {
            tracing::debug!(endpoint_id = %id, "Ignoring patch for unknown endpoint");
            return false;
        };

        let mut record = current.records[index].as_ref().clone();
        if !patch.apply(&mut record) {
            return false;
        }

        let record = Arc::new(record);
        let mut records = current.records.clone();
        records[index] = Arc::clone(&record);
        self.snapshot.store(Arc::new(RegistrySnapshot { records }));

        tracing::debug!(endpoint_id = %id, origin = origin.as_str(), ?patch, "Endpoint patched");
        self.notify(|| RegistryChange::Patched(record.as_ref().clone()), origin);
        true
    }

    fn notify(&self, change: impl FnOnce() -> RegistryChange, origin: ChangeOrigin) {
        if let Some(listener) = &self.listener {
            listener.on_change(&change(), origin);
        }
    }
}

impl Default for EndpointRegistry {
    fn default() -> Self {
        Self::new()
    }
}
