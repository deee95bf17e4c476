use crate::models::EndpointRecord;

/// Where a registry mutation came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOrigin {
    /// Local endpoint activation logic or a management call
    Local,
    /// Replicated from another node through the coordination store
    Remote,
}

impl ChangeOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Remote => "remote",
        }
    }
}

/// A committed registry mutation
#[derive(Debug, Clone, PartialEq)]
pub enum RegistryChange {
    Registered(EndpointRecord),
    /// Carries the record as it was when removed
    Unregistered(EndpointRecord),
    Patched(EndpointRecord),
}

impl RegistryChange {
    pub fn record(&self) -> &EndpointRecord {
        match self {
            Self::Registered(record) | Self::Unregistered(record) | Self::Patched(record) => record,
        }
    }

    pub fn endpoint_id(&self) -> &str {
        match self {
            Self::Registered(record) | Self::Unregistered(record) | Self::Patched(record) => {
                &record.id
            }
        }
    }
}

/// A change observed in the coordination store, to be mirrored locally
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteChange {
    Upsert(EndpointRecord),
    Remove(String),
}

/// Observer of committed mutations.
///
/// Called while the registry write lock is held, so calls for one endpoint
/// arrive in commit order. Implementations must return quickly and never
/// block on I/O.
pub trait RegistryListener: Send + Sync {
    fn on_change(&self, change: &RegistryChange, origin: ChangeOrigin);
}
