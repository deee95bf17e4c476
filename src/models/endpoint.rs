use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

pub const DEFAULT_PORT: u16 = 80;
pub const DEFAULT_CHARSET: &str = "UTF-8";
pub const DEFAULT_SCHEME: &str = "http";
/// Same as the request expiration of the HTTP context map (1 min)
pub const DEFAULT_REQUEST_TIMEOUT_MILLIS: u64 = 60_000;

/// HTTP methods an endpoint may accept
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Head,
    Options,
}

impl HttpMethod {
    /// Every method, in contract rendering order
    pub const ALL: [HttpMethod; 6] = [
        Self::Get,
        Self::Post,
        Self::Put,
        Self::Delete,
        Self::Head,
        Self::Options,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Post => "post",
            Self::Put => "put",
            Self::Delete => "delete",
            Self::Head => "head",
            Self::Options => "options",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| AppError::Validation(format!("Unknown HTTP method: {}", s)))
    }
}

/// Endpoint lifecycle state
///
/// Transitions are not validated: any state may be set from any state.
/// An endpoint that was never activated can go straight from `Init` to
/// `Stopped`, and callers rely on that.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EndpointState {
    /// Registered but not activated yet
    #[default]
    Init,
    /// Serving requests
    Running,
    /// Deactivated
    Stopped,
}

impl EndpointState {
    pub const ALL: [EndpointState; 3] = [Self::Init, Self::Running, Self::Stopped];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Running => "running",
            Self::Stopped => "stopped",
        }
    }
}

impl FromStr for EndpointState {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|state| state.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| AppError::Validation(format!("Unknown endpoint state: {}", s)))
    }
}

/// Per-method enable flags, flattened into the record as `allowGet`, `allowPost`, ...
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct AllowedMethods {
    #[serde(rename = "allowGet")]
    pub get: bool,
    #[serde(rename = "allowPost")]
    pub post: bool,
    #[serde(rename = "allowPut")]
    pub put: bool,
    #[serde(rename = "allowDelete")]
    pub delete: bool,
    #[serde(rename = "allowHead")]
    pub head: bool,
    #[serde(rename = "allowOptions")]
    pub options: bool,
}

impl AllowedMethods {
    pub fn of(methods: &[HttpMethod]) -> Self {
        let mut allowed = Self::default();
        for method in methods {
            allowed.set(*method, true);
        }
        allowed
    }

    pub fn allows(&self, method: HttpMethod) -> bool {
        match method {
            HttpMethod::Get => self.get,
            HttpMethod::Post => self.post,
            HttpMethod::Put => self.put,
            HttpMethod::Delete => self.delete,
            HttpMethod::Head => self.head,
            HttpMethod::Options => self.options,
        }
    }

    pub fn set(&mut self, method: HttpMethod, enabled: bool) {
        let flag = match method {
            HttpMethod::Get => &mut self.get,
            HttpMethod::Post => &mut self.post,
            HttpMethod::Put => &mut self.put,
            HttpMethod::Delete => &mut self.delete,
            HttpMethod::Head => &mut self.head,
            HttpMethod::Options => &mut self.options,
        };
        *flag = enabled;
    }

    /// Enabled methods in rendering order
    pub fn enabled(&self) -> impl Iterator<Item = HttpMethod> + '_ {
        HttpMethod::ALL.into_iter().filter(|m| self.allows(*m))
    }
}

/// Node-local handle of the execution context that owns an endpoint
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OwnerRef(pub String);

/// One dynamically published HTTP endpoint
///
/// The serde form is the exchange encoding shared with other cluster nodes
/// and API consumers. `owner_ref` is never part of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct EndpointRecord {
    pub id: String,
    pub name: String,
    #[serde(rename = "groupID")]
    pub group_id: String,
    pub path: String,
    pub host: String,
    pub charset: String,
    pub scheme: String,
    pub port: u16,
    #[serde(rename = "requestTimeout")]
    pub request_timeout_millis: u64,
    #[serde(flatten)]
    pub allowed_methods: AllowedMethods,
    pub state: EndpointState,
    #[serde(skip)]
    pub owner_ref: Option<OwnerRef>,
}

impl Default for EndpointRecord {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            group_id: String::new(),
            path: String::new(),
            host: String::new(),
            charset: DEFAULT_CHARSET.to_string(),
            scheme: DEFAULT_SCHEME.to_string(),
            port: DEFAULT_PORT,
            request_timeout_millis: DEFAULT_REQUEST_TIMEOUT_MILLIS,
            allowed_methods: AllowedMethods::default(),
            state: EndpointState::Init,
            owner_ref: None,
        }
    }
}

impl EndpointRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_group(mut self, group_id: impl Into<String>) -> Self {
        self.group_id = group_id.into();
        self
    }

    pub fn with_address(mut self, host: impl Into<String>, port: u16) -> Self {
        self.host = host.into();
        self.port = port;
        self
    }

    pub fn with_methods(mut self, methods: &[HttpMethod]) -> Self {
        self.allowed_methods = AllowedMethods::of(methods);
        self
    }

    pub fn with_state(mut self, state: EndpointState) -> Self {
        self.state = state;
        self
    }

    pub fn with_owner(mut self, owner: OwnerRef) -> Self {
        self.owner_ref = Some(owner);
        self
    }

    /// Reject records the registry must never store
    pub fn validate(&self) -> AppResult<()> {
        if self.id.trim().is_empty() {
            return Err(AppError::Validation(
                "Endpoint id must not be empty".to_string(),
            ));
        }
        if self.port == 0 {
            return Err(AppError::Validation(format!(
                "Endpoint {} has invalid port 0",
                self.id
            )));
        }
        Ok(())
    }

    /// Copy suitable for other nodes and API consumers (owner reference removed)
    pub fn exchange_copy(&self) -> Self {
        Self {
            owner_ref: None,
            ..self.clone()
        }
    }

    pub fn is_running(&self) -> bool {
        self.state == EndpointState::Running
    }

    pub fn allows(&self, method: HttpMethod) -> bool {
        self.allowed_methods.allows(method)
    }

    /// "host:port", or `None` when no host is set
    pub fn address(&self) -> Option<String> {
        if self.host.is_empty() {
            None
        } else {
            Some(format!("{}:{}", self.host, self.port))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_defaults() {
        let record = EndpointRecord::new("ep1", "Orders", "/orders");

        assert_eq!(record.port, 80);
        assert_eq!(record.charset, "UTF-8");
        assert_eq!(record.scheme, "http");
        assert_eq!(record.request_timeout_millis, 60_000);
        assert_eq!(record.state, EndpointState::Init);
        assert_eq!(record.group_id, "");
        assert_eq!(record.allowed_methods.enabled().count(), 0);
    }

    #[test]
    fn test_validate_rejects_empty_id_and_port_zero() {
        assert!(EndpointRecord::new("", "x", "/x").validate().is_err());
        assert!(EndpointRecord::new("  ", "x", "/x").validate().is_err());
        assert!(EndpointRecord::new("ep", "x", "/x")
            .with_address("localhost", 0)
            .validate()
            .is_err());
        assert!(EndpointRecord::new("ep", "x", "/x").validate().is_ok());
    }

    #[test]
    fn test_exchange_encoding_uses_cluster_field_names() {
        let record = EndpointRecord::new("ep1", "Orders", "/orders")
            .with_group("g1")
            .with_methods(&[HttpMethod::Get, HttpMethod::Post])
            .with_state(EndpointState::Running)
            .with_owner(OwnerRef("svc-42".to_string()));

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["groupID"], "g1");
        assert_eq!(json["requestTimeout"], 60_000);
        assert_eq!(json["allowGet"], true);
        assert_eq!(json["allowPost"], true);
        assert_eq!(json["allowDelete"], false);
        assert_eq!(json["state"], "running");
        assert!(json.get("owner_ref").is_none());
        assert!(json.get("ownerRef").is_none());
    }

    #[test]
    fn test_decode_fills_defaults() {
        let record: EndpointRecord =
            serde_json::from_str(r#"{"id":"ep9","path":"/p","allowPut":true}"#).unwrap();

        assert_eq!(record.id, "ep9");
        assert_eq!(record.port, 80);
        assert_eq!(record.charset, "UTF-8");
        assert!(record.allows(HttpMethod::Put));
        assert!(!record.allows(HttpMethod::Get));
        assert_eq!(record.state, EndpointState::Init);
        assert!(record.owner_ref.is_none());
    }

    #[test]
    fn test_exchange_copy_strips_owner() {
        let record =
            EndpointRecord::new("ep1", "a", "/a").with_owner(OwnerRef("svc".to_string()));
        let copy = record.exchange_copy();

        assert!(copy.owner_ref.is_none());
        assert_eq!(copy.id, record.id);
        assert!(record.owner_ref.is_some());
    }

    #[test]
    fn test_parse_method_and_state() {
        assert_eq!("POST".parse::<HttpMethod>().unwrap(), HttpMethod::Post);
        assert!("PATCH".parse::<HttpMethod>().is_err());
        assert_eq!(
            "Stopped".parse::<EndpointState>().unwrap(),
            EndpointState::Stopped
        );
        assert!("paused".parse::<EndpointState>().is_err());
    }
}
