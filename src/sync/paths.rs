//! Coordination store key layout:
//! - /runtime/cluster/{flag}         - cluster info node
//! - /runtime/apis/{flag}/{id}       - one node per published endpoint
//! - /runtime/apps/{flag}/{groupId}  - one node per owning flow group
//!
//! Each function strips at most one slash at either end of `cluster_flag`
//! before adding its own, so flags must be passed as configured, not
//! pre-normalized.

const RUNTIME_PREFIX: &str = "/runtime";
const CLUSTER_PREFIX: &str = "/cluster";
const APIS_PREFIX: &str = "/apis";
const APPS_PREFIX: &str = "/apps";

/// Leading slash, no trailing slash
fn bare_flag(cluster_flag: &str) -> String {
    let flag = cluster_flag.strip_suffix('/').unwrap_or(cluster_flag);
    if flag.starts_with('/') {
        flag.to_string()
    } else {
        format!("/{}", flag)
    }
}

/// Leading and trailing slash
fn enclosed_flag(cluster_flag: &str) -> String {
    let flag = if cluster_flag.ends_with('/') {
        cluster_flag.to_string()
    } else {
        format!("{}/", cluster_flag)
    };
    if flag.starts_with('/') {
        flag
    } else {
        format!("/{}", flag)
    }
}

pub fn cluster_info_path(cluster_flag: &str) -> String {
    format!("{}{}{}", RUNTIME_PREFIX, CLUSTER_PREFIX, bare_flag(cluster_flag))
}

pub fn endpoint_path(cluster_flag: &str, endpoint_id: &str) -> String {
    format!(
        "{}{}{}{}",
        RUNTIME_PREFIX,
        APIS_PREFIX,
        enclosed_flag(cluster_flag),
        endpoint_id
    )
}

pub fn application_path(cluster_flag: &str, group_id: &str) -> String {
    format!(
        "{}{}{}{}",
        RUNTIME_PREFIX,
        APPS_PREFIX,
        enclosed_flag(cluster_flag),
        group_id
    )
}

/// Parent node of every `endpoint_path` for this cluster
pub fn endpoints_root(cluster_flag: &str) -> String {
    let path = endpoint_path(cluster_flag, "");
    match path.strip_suffix('/') {
        Some(root) if !root.is_empty() => root.to_string(),
        _ => path,
    }
}
