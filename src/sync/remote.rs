use crate::error::AppResult;
use crate::models::EndpointRecord;
use crate::registry::{EndpointRegistry, RemoteChange};
use crate::sync::paths::endpoints_root;
use crate::sync::store::CoordinationStore;

/// Translate a store event on an endpoint node into a registry change.
///
/// `payload` is `None` when the node was deleted. Paths outside this
/// cluster's endpoint root yield `Ok(None)`. The id in the path wins over
/// the id in the payload.
pub fn decode_remote(
    cluster_flag: &str,
    path: &str,
    payload: Option<&[u8]>,
) -> AppResult<Option<RemoteChange>> {
    let root = endpoints_root(cluster_flag);
    let Some(id) = path
        .strip_prefix(root.as_str())
        .and_then(|rest| rest.strip_prefix('/'))
        .filter(|id| !id.is_empty() && !id.contains('/'))
    else {
        return Ok(None);
    };

    let change = match payload {
        None => RemoteChange::Remove(id.to_string()),
        Some(bytes) => {
            let mut record: EndpointRecord = serde_json::from_slice(bytes)?;
            if record.id != id {
                tracing::debug!(
                    endpoint_id = %id,
                    payload_id = %record.id,
                    "Replicated endpoint id differs from its node name"
                );
                record.id = id.to_string();
            }
            RemoteChange::Upsert(record)
        }
    };
    Ok(Some(change))
}

/// Decode a store event and mirror it into the registry.
/// Returns whether the registry changed.
pub fn apply_store_event(
    registry: &EndpointRegistry,
    cluster_flag: &str,
    path: &str,
    payload: Option<&[u8]>,
) -> AppResult<bool> {
    Ok(decode_remote(cluster_flag, path, payload)?
        .map(|change| registry.apply_remote(change))
        .unwrap_or(false))
}

/// Load every endpoint node of the cluster into the registry.
///
/// Nodes that fail to decode are skipped with a warning. Returns the number
/// of endpoints loaded.
pub async fn bootstrap(
    store: &dyn CoordinationStore,
    cluster_flag: &str,
    registry: &EndpointRegistry,
) -> AppResult<usize> {
    let root = endpoints_root(cluster_flag);
    let mut loaded = 0;

    for child in store.children(&root).await? {
        let path = format!("{}/{}", root, child);
        let Some(bytes) = store.get(&path).await? else {
            continue;
        };

        match apply_store_event(registry, cluster_flag, &path, Some(&bytes)) {
            Ok(true) => loaded += 1,
            Ok(false) => {}
            Err(e) => tracing::warn!(path = %path, error = %e, "Skipping unreadable endpoint node"),
        }
    }

    tracing::info!(cluster_flag = %cluster_flag, loaded, "Loaded replicated endpoints");
    Ok(loaded)
}
