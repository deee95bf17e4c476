use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, watch};

use crate::error::AppResult;
use crate::models::EndpointRecord;
use crate::registry::{ChangeOrigin, EndpointRegistry, RegistryChange, RegistryListener};
use crate::sync::paths::{application_path, cluster_info_path, endpoint_path};
use crate::sync::store::CoordinationStore;

/// Registry listener that hands local changes to the publisher task.
///
/// Records are stripped to their exchange form before they leave the
/// registry. Remote-origin changes are dropped.
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<RegistryChange>,
}

impl ChannelNotifier {
    pub fn new(tx: mpsc::UnboundedSender<RegistryChange>) -> Self {
        Self { tx }
    }

    /// Notifier plus the receiving end for `Publisher::run`
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<RegistryChange>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl RegistryListener for ChannelNotifier {
    fn on_change(&self, change: &RegistryChange, origin: ChangeOrigin) {
        if origin == ChangeOrigin::Remote {
            return;
        }

        let change = match change {
            RegistryChange::Registered(record) => RegistryChange::Registered(record.exchange_copy()),
            RegistryChange::Unregistered(record) => {
                RegistryChange::Unregistered(record.exchange_copy())
            }
            RegistryChange::Patched(record) => RegistryChange::Patched(record.exchange_copy()),
        };

        if self.tx.send(change).is_err() {
            tracing::debug!("Publisher stopped, dropping registry change");
        }
    }
}

/// Per-group node under `/runtime/apps`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSummary {
    pub group_id: String,
    pub endpoints: Vec<String>,
    pub running: usize,
}

/// Node written at `/runtime/cluster/{flag}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterInfo {
    pub node: String,
    pub endpoints: usize,
    pub running: usize,
}

/// Mirrors local registry changes into the coordination store
pub struct Publisher {
    store: Arc<dyn CoordinationStore>,
    registry: Arc<EndpointRegistry>,
    cluster_flag: String,
    node: String,
}

impl Publisher {
    pub fn new(
        store: Arc<dyn CoordinationStore>,
        registry: Arc<EndpointRegistry>,
        cluster_flag: impl Into<String>,
        node: impl Into<String>,
    ) -> Self {
        Self {
            store,
            registry,
            cluster_flag: cluster_flag.into(),
            node: node.into(),
        }
    }

    /// Write one change through to the store
    pub async fn publish(&self, change: &RegistryChange) -> AppResult<()> {
        let record = change.record();
        let path = endpoint_path(&self.cluster_flag, &record.id);

        match change {
            RegistryChange::Registered(_) | RegistryChange::Patched(_) => {
                let previous_group = self.stored_group(&path).await;
                self.store.put(&path, serde_json::to_vec(record)?).await?;

                if let Some(previous) = previous_group.filter(|g| *g != record.group_id) {
                    self.publish_application(&previous).await?;
                }
            }
            RegistryChange::Unregistered(_) => {
                self.store.delete(&path).await?;
            }
        }

        self.publish_application(&record.group_id).await?;
        tracing::debug!(endpoint_id = %record.id, path = %path, "Published registry change");
        Ok(())
    }

    /// Rewrite the cluster info node from the current registry contents
    pub async fn publish_cluster_info(&self) -> AppResult<()> {
        let snapshot = self.registry.list();
        let info = ClusterInfo {
            node: self.node.clone(),
            endpoints: snapshot.len(),
            running: snapshot.running().count(),
        };
        self.store
            .put(
                &cluster_info_path(&self.cluster_flag),
                serde_json::to_vec(&info)?,
            )
            .await
    }

    /// Consume changes until shutdown is signalled or every sender is gone.
    /// The cluster info node is rewritten after every change. Failed writes
    /// are logged and skipped.
    pub async fn run(
        self,
        mut changes: mpsc::UnboundedReceiver<RegistryChange>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        tracing::info!(cluster_flag = %self.cluster_flag, node = %self.node, "Publisher started");
        if let Err(e) = self.publish_cluster_info().await {
            tracing::error!(error = %e, "Failed to publish cluster info");
        }

        loop {
            if *shutdown.borrow() {
                break;
            }

            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                change = changes.recv() => match change {
                    Some(change) => {
                        if let Err(e) = self.publish(&change).await {
                            tracing::error!(
                                endpoint_id = %change.endpoint_id(),
                                error = %e,
                                "Failed to publish registry change"
                            );
                        }
                        if let Err(e) = self.publish_cluster_info().await {
                            tracing::error!(error = %e, "Failed to publish cluster info");
                        }
                    }
                    None => {
                        tracing::info!("Registry change channel closed");
                        break;
                    }
                },
            }
        }

        tracing::info!("Publisher stopped");
    }

    async fn publish_application(&self, group_id: &str) -> AppResult<()> {
        if group_id.is_empty() {
            return Ok(());
        }

        let path = application_path(&self.cluster_flag, group_id);
        let snapshot = self.registry.list();
        let members: Vec<&EndpointRecord> = snapshot.by_group(group_id).collect();
        if members.is_empty() {
            return self.store.delete(&path).await;
        }

        let summary = ApplicationSummary {
            group_id: group_id.to_string(),
            endpoints: members.iter().map(|r| r.id.clone()).collect(),
            running: members.iter().filter(|r| r.is_running()).count(),
        };
        self.store.put(&path, serde_json::to_vec(&summary)?).await
    }

    /// Group of the record currently stored at `path`, if readable
    async fn stored_group(&self, path: &str) -> Option<String> {
        let bytes = self.store.get(path).await.ok()??;
        serde_json::from_slice::<EndpointRecord>(&bytes)
            .ok()
            .map(|r| r.group_id)
    }
}
