//! Replication of the registry through a shared coordination store

pub mod paths;
pub mod publisher;
pub mod remote;
pub mod store;

pub use publisher::{ApplicationSummary, ChannelNotifier, ClusterInfo, Publisher};
pub use remote::{apply_store_event, bootstrap, decode_remote};
pub use store::{CoordinationStore, MemoryStore};
