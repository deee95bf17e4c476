use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::models::HttpMethod;

/// Parameter and response descriptors the flow layer declares for an endpoint.
///
/// The JSON shape is the one the flow layer emits for its HTTP request
/// components, so every section is keyed by lowercase method name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointMetadata {
    pub description: HashMap<HttpMethod, String>,
    pub parameters: HashMap<HttpMethod, Vec<ParamDescriptor>>,
    #[serde(rename = "contentType")]
    pub content_types: HashMap<HttpMethod, Vec<String>>,
    #[serde(rename = "respInfos")]
    pub responses: HashMap<HttpMethod, Vec<RespDescriptor>>,
    #[serde(rename = "respModels")]
    pub models: Vec<ModelDescriptor>,
}

impl EndpointMetadata {
    pub fn model(&self, name: &str) -> Option<&ModelDescriptor> {
        self.models.iter().find(|m| m.name == name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParamDescriptor {
    pub name: String,
    pub description: String,
    pub required: bool,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// query, header, path, cookie, form or body
    pub position: String,
    /// Body encoding for form/body parameters: `form-data` or `x-www-form-urlencoded`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumes: Option<String>,
    /// Name of the request model
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    pub model_ref: Option<String>,
}

impl ParamDescriptor {
    /// Media type implied by `consumes`, only meaningful for form and body parameters
    pub fn consumed_media_type(&self) -> Option<&'static str> {
        if self.position != "form" && self.position != "body" {
            return None;
        }
        match self.consumes.as_deref()? {
            "form-data" => Some("multipart/form-data"),
            "x-www-form-urlencoded" => Some("application/x-www-form-urlencoded"),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RespDescriptor {
    pub code: String,
    pub description: String,
    /// `array` renders the response as a list of `ref`
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    pub model_ref: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelDescriptor {
    pub name: String,
    #[serde(rename = "contentType")]
    pub content_types: Vec<String>,
    pub properties: BTreeMap<String, PropertyDescriptor>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyDescriptor {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, PropertyDescriptor>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_flow_layer_shape() {
        let metadata: EndpointMetadata = serde_json::from_value(serde_json::json!({
            "description": { "get": "Find orders" },
            "parameters": {
                "get": [
                    { "name": "status", "description": "Order status", "required": false,
                      "type": "string", "position": "query" }
                ]
            },
            "contentType": { "get": ["application/xml"] },
            "respInfos": {
                "get": [ { "code": "200", "description": "ok", "type": "array", "ref": "Order" } ]
            },
            "respModels": [
                { "name": "Order", "contentType": ["application/json"],
                  "properties": { "id": { "type": "integer", "format": "int64" } } }
            ]
        }))
        .unwrap();

        assert_eq!(metadata.description[&HttpMethod::Get], "Find orders");
        assert_eq!(metadata.parameters[&HttpMethod::Get][0].position, "query");
        assert_eq!(
            metadata.responses[&HttpMethod::Get][0].model_ref.as_deref(),
            Some("Order")
        );
        let model = metadata.model("Order").unwrap();
        assert_eq!(model.properties["id"].format.as_deref(), Some("int64"));
    }

    #[test]
    fn test_consumed_media_type() {
        let mut param = ParamDescriptor {
            position: "form".to_string(),
            consumes: Some("form-data".to_string()),
            ..Default::default()
        };
        assert_eq!(param.consumed_media_type(), Some("multipart/form-data"));

        param.consumes = Some("x-www-form-urlencoded".to_string());
        assert_eq!(
            param.consumed_media_type(),
            Some("application/x-www-form-urlencoded")
        );

        param.position = "query".to_string();
        assert_eq!(param.consumed_media_type(), None);
    }
}
