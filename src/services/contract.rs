use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::config::Config;
use crate::models::{
    ContractDocument, EndpointMetadata, EndpointRecord, HttpMethod, InfoSpec, ModelSpec,
    ParamLocation, ParamSpec, PathItem, PropertyDescriptor, PropertySpec, RespSpec, SchemaRef,
    CONTRACT_FORMAT, DEFAULT_MEDIA_TYPE,
};
use crate::registry::{EndpointRegistry, RegistrySnapshot};
use crate::services::MetadataSource;

/// Document-level values that do not come from the registry
#[derive(Debug, Clone)]
pub struct ContractSettings {
    pub title: String,
    pub version: String,
    pub description: Option<String>,
    /// Fixed host; when unset the first rendered endpoint's address is used
    pub host: Option<String>,
    pub base_path: String,
    pub default_scheme: String,
}

impl ContractSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            title: config.contract_title.clone(),
            version: config.contract_version.clone(),
            description: None,
            host: config.contract_host.clone(),
            base_path: config.contract_base_path.clone(),
            default_scheme: config.default_scheme.clone(),
        }
    }
}

impl Default for ContractSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Which running endpoints a document covers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ContractScope {
    #[default]
    All,
    Endpoint(String),
    Group(String),
}

impl ContractScope {
    fn includes(&self, record: &EndpointRecord) -> bool {
        match self {
            Self::All => true,
            Self::Endpoint(id) => record.id == *id,
            Self::Group(group_id) => record.group_id == *group_id,
        }
    }
}

/// Renders the registry as a contract document
pub struct ContractBuilder {
    settings: ContractSettings,
    metadata: Arc<dyn MetadataSource>,
}

impl ContractBuilder {
    pub fn new(settings: ContractSettings, metadata: Arc<dyn MetadataSource>) -> Self {
        Self { settings, metadata }
    }

    /// Render from a single snapshot taken now
    pub fn render(&self, registry: &EndpointRegistry, scope: &ContractScope) -> ContractDocument {
        let snapshot = registry.list();
        self.build(&snapshot, scope)
    }

    pub fn build(&self, snapshot: &RegistrySnapshot, scope: &ContractScope) -> ContractDocument {
        let mut paths: BTreeMap<String, BTreeMap<HttpMethod, PathItem>> = BTreeMap::new();
        let mut definitions = BTreeMap::new();
        let mut schemes = BTreeSet::new();
        let mut host = self.settings.host.clone();

        for record in snapshot.running().filter(|r| scope.includes(r)) {
            // Contributes nothing: no operations, models, scheme or host
            if record.allowed_methods.enabled().next().is_none() {
                tracing::debug!(endpoint_id = %record.id, "Skipping running endpoint with no enabled methods");
                continue;
            }

            let metadata = self.metadata.metadata(&record.id);
            let metadata = metadata.as_deref();

            let operations = paths.entry(record.path.clone()).or_default();
            for method in record.allowed_methods.enabled() {
                let item = Self::path_item(record, method, metadata);
                if operations.insert(method, item).is_some() {
                    tracing::warn!(
                        endpoint_id = %record.id,
                        path = %record.path,
                        method = %method,
                        "Several running endpoints share a path and method; the later one is documented"
                    );
                }
            }

            if let Some(metadata) = metadata {
                Self::merge_models(&mut definitions, metadata);
            }
            if !record.scheme.is_empty() {
                schemes.insert(record.scheme.clone());
            }
            if host.is_none() {
                host = record.address();
            }
        }

        if schemes.is_empty() {
            schemes.insert(self.settings.default_scheme.clone());
        }

        ContractDocument {
            swagger: CONTRACT_FORMAT.to_string(),
            info: InfoSpec {
                title: self.settings.title.clone(),
                version: self.settings.version.clone(),
                description: self.settings.description.clone(),
            },
            host,
            schemes: schemes.into_iter().collect(),
            base_path: self.settings.base_path.clone(),
            produces: vec![DEFAULT_MEDIA_TYPE.to_string()],
            paths,
            definitions,
        }
    }

    fn path_item(
        record: &EndpointRecord,
        method: HttpMethod,
        metadata: Option<&EndpointMetadata>,
    ) -> PathItem {
        let mut item = PathItem {
            summary: record.name.clone(),
            description: String::new(),
            parameters: Vec::new(),
            produces: Vec::new(),
            consumes: Vec::new(),
            responses: BTreeMap::new(),
        };

        if let Some(metadata) = metadata {
            Self::describe(&mut item, method, metadata);
        }

        if item.produces.is_empty() {
            item.produces.push(DEFAULT_MEDIA_TYPE.to_string());
        }
        if item.consumes.is_empty() {
            item.consumes.push(DEFAULT_MEDIA_TYPE.to_string());
        }
        if item.responses.is_empty() {
            item.responses.insert(
                "200".to_string(),
                RespSpec {
                    description: "OK".to_string(),
                    schema: None,
                },
            );
        }
        item
    }

    fn describe(item: &mut PathItem, method: HttpMethod, metadata: &EndpointMetadata) {
        if let Some(description) = metadata.description.get(&method) {
            item.description = description.clone();
        }

        // Parameters, and what the request body is encoded as
        let mut request_model = None;
        for param in metadata.parameters.get(&method).into_iter().flatten() {
            let Some(location) = ParamLocation::from_position(&param.position) else {
                tracing::debug!(
                    parameter = %param.name,
                    position = %param.position,
                    "Skipping parameter with unknown position"
                );
                continue;
            };
            if let Some(media_type) = param.consumed_media_type() {
                push_unique(&mut item.consumes, media_type);
            }
            if let Some(model) = &param.model_ref {
                request_model = Some(model.as_str());
            }
            item.parameters.push(ParamSpec {
                name: param.name.clone(),
                location,
                description: param.description.clone(),
                kind: param.kind.clone(),
                format: param.format.clone(),
                required: param.required,
                schema: param.model_ref.as_deref().map(SchemaRef::model),
            });
        }

        for media_type in metadata.content_types.get(&method).into_iter().flatten() {
            push_unique(&mut item.produces, media_type);
        }

        for resp in metadata.responses.get(&method).into_iter().flatten() {
            let schema = resp.model_ref.as_deref().map(|model| {
                if resp.kind.as_deref() == Some("array") {
                    SchemaRef::array_of(model)
                } else {
                    SchemaRef::model(model)
                }
            });
            if let Some(model) = resp.model_ref.as_deref().and_then(|m| metadata.model(m)) {
                for media_type in &model.content_types {
                    push_unique(&mut item.produces, media_type);
                }
            }
            item.responses.insert(
                resp.code.clone(),
                RespSpec {
                    description: resp.description.clone(),
                    schema,
                },
            );
        }

        if let Some(model) = request_model.and_then(|m| metadata.model(m)) {
            for media_type in &model.content_types {
                push_unique(&mut item.consumes, media_type);
            }
        }
    }

    fn merge_models(definitions: &mut BTreeMap<String, ModelSpec>, metadata: &EndpointMetadata) {
        for model in &metadata.models {
            let spec = ModelSpec::object(
                model
                    .properties
                    .iter()
                    .map(|(name, property)| (name.clone(), property_spec(property)))
                    .collect(),
            );
            match definitions.get(&model.name) {
                Some(existing) if *existing == spec => {}
                Some(_) => {
                    tracing::warn!(
                        model = %model.name,
                        "Conflicting definitions for model; the later one is documented"
                    );
                    definitions.insert(model.name.clone(), spec);
                }
                None => {
                    definitions.insert(model.name.clone(), spec);
                }
            }
        }
    }
}

fn property_spec(property: &PropertyDescriptor) -> PropertySpec {
    PropertySpec {
        kind: property.kind.clone(),
        format: property.format.clone(),
        description: property.description.clone(),
        properties: property.properties.as_ref().map(|nested| {
            nested
                .iter()
                .map(|(name, p)| (name.clone(), property_spec(p)))
                .collect()
        }),
    }
}

fn push_unique(values: &mut Vec<String>, value: &str) {
    if !values.iter().any(|v| v == value) {
        values.push(value.to_string());
    }
}
