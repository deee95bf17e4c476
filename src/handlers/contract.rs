use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::AppResult;
use crate::models::ContractDocument;
use crate::services::ContractScope;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ContractQuery {
    /// Document a single endpoint; takes precedence over `groupid`
    pub id: Option<String>,
    /// Document every endpoint of a flow group
    pub groupid: Option<String>,
}

impl ContractQuery {
    pub fn scope(&self) -> ContractScope {
        let non_blank = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        match (non_blank(&self.id), non_blank(&self.groupid)) {
            (Some(id), _) => ContractScope::Endpoint(id),
            (None, Some(group_id)) => ContractScope::Group(group_id),
            (None, None) => ContractScope::All,
        }
    }
}

/// Render the Swagger 2.0 contract of the running endpoints
#[utoipa::path(
    get,
    path = "/apis/swagger",
    params(ContractQuery),
    responses(
        (status = 200, description = "Swagger 2.0 document", body = Object)
    ),
    tag = "Contract"
)]
pub async fn get_contract(
    State(state): State<AppState>,
    Query(query): Query<ContractQuery>,
) -> AppResult<Json<ContractDocument>> {
    let scope = query.scope();
    let document = state.contract.render(&state.registry, &scope);

    tracing::debug!(?scope, paths = document.paths.len(), "Contract rendered");
    Ok(Json(document))
}
