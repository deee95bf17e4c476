use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::AppResult;

/// Hierarchical key-value store shared by the cluster nodes
#[async_trait]
pub trait CoordinationStore: Send + Sync {
    /// Create or overwrite a node, creating parents as needed
    async fn put(&self, path: &str, data: Vec<u8>) -> AppResult<()>;

    /// Read a node's data
    async fn get(&self, path: &str) -> AppResult<Option<Vec<u8>>>;

    /// Delete a node; deleting a missing node is not an error
    async fn delete(&self, path: &str) -> AppResult<()>;

    /// Names of the direct children of a node
    async fn children(&self, path: &str) -> AppResult<Vec<String>>;
}

/// In-memory store for tests and single-node runs
#[derive(Clone, Default)]
pub struct MemoryStore {
    nodes: Arc<Mutex<BTreeMap<String, Vec<u8>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CoordinationStore for MemoryStore {
    async fn put(&self, path: &str, data: Vec<u8>) -> AppResult<()> {
        self.nodes.lock().await.insert(path.to_string(), data);
        Ok(())
    }

    async fn get(&self, path: &str) -> AppResult<Option<Vec<u8>>> {
        Ok(self.nodes.lock().await.get(path).cloned())
    }

    async fn delete(&self, path: &str) -> AppResult<()> {
        self.nodes.lock().await.remove(path);
        Ok(())
    }

    async fn children(&self, path: &str) -> AppResult<Vec<String>> {
        let prefix = format!("{}/", path.trim_end_matches('/'));
        let nodes = self.nodes.lock().await;
        let children: BTreeSet<String> = nodes
            .keys()
            .filter_map(|key| key.strip_prefix(&prefix))
            .filter_map(|rest| rest.split('/').next())
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();
        Ok(children.into_iter().collect())
    }
}
