//! Contract document model (OpenAPI 2.0 shape)
//!
//! Maps are ordered so that the rendered document is stable for a given
//! registry snapshot.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::HttpMethod;

pub const CONTRACT_FORMAT: &str = "2.0";
pub const DEFAULT_MEDIA_TYPE: &str = "application/json";

/// Prefix of schema pointers into `definitions`
pub const DEFINITIONS_REF_PREFIX: &str = "#/definitions/";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractDocument {
    pub swagger: String,
    pub info: InfoSpec,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    pub schemes: Vec<String>,
    pub base_path: String,
    pub produces: Vec<String>,
    /// uri -> method -> operation
    pub paths: BTreeMap<String, BTreeMap<HttpMethod, PathItem>>,
    /// model name -> model
    pub definitions: BTreeMap<String, ModelSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfoSpec {
    pub title: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One operation on a path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathItem {
    pub summary: String,
    pub description: String,
    pub parameters: Vec<ParamSpec>,
    pub produces: Vec<String>,
    pub consumes: Vec<String>,
    /// status code -> response
    pub responses: BTreeMap<String, RespSpec>,
}

/// Where a parameter is carried
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParamLocation {
    #[serde(rename = "query")]
    Query,
    #[serde(rename = "header")]
    Header,
    #[serde(rename = "path")]
    Path,
    #[serde(rename = "cookie")]
    Cookie,
    #[serde(rename = "formData")]
    FormData,
    #[serde(rename = "body")]
    Body,
}

impl ParamLocation {
    /// Map a flow-layer position name; `form` becomes `formData`
    pub fn from_position(position: &str) -> Option<Self> {
        match position {
            "query" => Some(Self::Query),
            "header" => Some(Self::Header),
            "path" => Some(Self::Path),
            "cookie" => Some(Self::Cookie),
            "form" | "formData" => Some(Self::FormData),
            "body" => Some(Self::Body),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamSpec {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParamLocation,
    pub description: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RespSpec {
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaRef>,
}

/// Pointer to a named model, either directly or as the element type of an array
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaRef {
    Array {
        #[serde(rename = "type")]
        kind: ArrayKind,
        items: ModelRef,
    },
    Model(ModelRef),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrayKind {
    Array,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelRef {
    #[serde(rename = "$ref")]
    pub reference: String,
}

impl SchemaRef {
    pub fn model(name: &str) -> Self {
        Self::Model(ModelRef::to(name))
    }

    pub fn array_of(name: &str) -> Self {
        Self::Array {
            kind: ArrayKind::Array,
            items: ModelRef::to(name),
        }
    }
}

impl ModelRef {
    pub fn to(name: &str) -> Self {
        Self {
            reference: format!("{}{}", DEFINITIONS_REF_PREFIX, name),
        }
    }
}

/// Reusable named model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSpec {
    #[serde(rename = "type")]
    pub kind: String,
    pub properties: BTreeMap<String, PropertySpec>,
}

impl ModelSpec {
    pub fn object(properties: BTreeMap<String, PropertySpec>) -> Self {
        Self {
            kind: "object".to_string(),
            properties,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertySpec {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Nested properties of object-typed properties
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, PropertySpec>>,
}
