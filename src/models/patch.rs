use std::str::FromStr;

use serde::Deserialize;

use crate::models::{EndpointRecord, EndpointState, HttpMethod};

/// Record fields that may be changed after registration (`id` is not one of them)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchField {
    Name,
    GroupId,
    Path,
    Host,
    Scheme,
    Port,
    Charset,
    RequestTimeout,
    Allow(HttpMethod),
    State,
}

impl PatchField {
    /// Resolve a field name as sent by cluster peers or local callers.
    /// Unknown names resolve to `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        let field = match name {
            "name" => Self::Name,
            "groupID" | "groupId" | "group_id" => Self::GroupId,
            "path" => Self::Path,
            "host" => Self::Host,
            "scheme" => Self::Scheme,
            "port" => Self::Port,
            "charset" => Self::Charset,
            "requestTimeout" | "requestTimeoutMillis" | "request_timeout_millis" => {
                Self::RequestTimeout
            }
            "state" => Self::State,
            // allowGet, allowPost, ...
            _ => Self::Allow(name.strip_prefix("allow")?.parse::<HttpMethod>().ok()?),
        };
        Some(field)
    }
}

/// Untyped patch payload
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PatchValue {
    Flag(bool),
    Integer(i64),
    Text(String),
    #[serde(skip)]
    State(EndpointState),
}

impl From<bool> for PatchValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<i64> for PatchValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<&str> for PatchValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for PatchValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<EndpointState> for PatchValue {
    fn from(value: EndpointState) -> Self {
        Self::State(value)
    }
}

/// A single typed field update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldPatch {
    Name(String),
    GroupId(String),
    Path(String),
    Host(String),
    Scheme(String),
    Port(u16),
    Charset(String),
    RequestTimeout(u64),
    Allow(HttpMethod, bool),
    State(EndpointState),
}

impl FieldPatch {
    /// Build a patch from a field name and value.
    ///
    /// Returns `None` for unknown fields, mismatched value types, and values
    /// that would break a record invariant (port outside 1..=65535,
    /// negative timeout).
    pub fn parse(field: &str, value: PatchValue) -> Option<Self> {
        Self::typed(PatchField::from_name(field)?, value)
    }

    pub fn typed(field: PatchField, value: PatchValue) -> Option<Self> {
        let patch = match (field, value) {
            (PatchField::Name, PatchValue::Text(v)) => Self::Name(v),
            (PatchField::GroupId, PatchValue::Text(v)) => Self::GroupId(v),
            (PatchField::Path, PatchValue::Text(v)) => Self::Path(v),
            (PatchField::Host, PatchValue::Text(v)) => Self::Host(v),
            (PatchField::Scheme, PatchValue::Text(v)) => Self::Scheme(v),
            (PatchField::Charset, PatchValue::Text(v)) => Self::Charset(v),
            (PatchField::Port, PatchValue::Integer(v)) => match u16::try_from(v) {
                Ok(port) if port != 0 => Self::Port(port),
                _ => return None,
            },
            (PatchField::RequestTimeout, PatchValue::Integer(v)) => {
                Self::RequestTimeout(u64::try_from(v).ok()?)
            }
            (PatchField::Allow(method), PatchValue::Flag(v)) => Self::Allow(method, v),
            (PatchField::State, PatchValue::State(v)) => Self::State(v),
            // Peers send the state as its lowercase name
            (PatchField::State, PatchValue::Text(v)) => {
                Self::State(EndpointState::from_str(&v).ok()?)
            }
            _ => return None,
        };
        Some(patch)
    }

    /// Apply to a record, returning whether the record changed
    pub fn apply(&self, record: &mut EndpointRecord) -> bool {
        fn replace<T: PartialEq + Clone>(slot: &mut T, value: &T) -> bool {
            if slot == value {
                return false;
            }
            *slot = value.clone();
            true
        }

        match self {
            Self::Name(v) => replace(&mut record.name, v),
            Self::GroupId(v) => replace(&mut record.group_id, v),
            Self::Path(v) => replace(&mut record.path, v),
            Self::Host(v) => replace(&mut record.host, v),
            Self::Scheme(v) => replace(&mut record.scheme, v),
            Self::Port(v) => replace(&mut record.port, v),
            Self::Charset(v) => replace(&mut record.charset, v),
            Self::RequestTimeout(v) => replace(&mut record.request_timeout_millis, v),
            Self::Allow(method, enabled) => {
                if record.allowed_methods.allows(*method) == *enabled {
                    return false;
                }
                record.allowed_methods.set(*method, *enabled);
                true
            }
            Self::State(v) => replace(&mut record.state, v),
        }
    }
}
