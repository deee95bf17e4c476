use axum::{
    extract::{rejection::JsonRejection, Path, Query, RawQuery, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};
use crate::handlers::{validate_required, GroupQuery};
use crate::models::{EndpointRecord, PatchValue};
use crate::state::AppState;

// ============ Request/Response DTOs ============

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiListResponse {
    pub apis: Vec<EndpointRecord>,
}

/// Single-field update, e.g. `{"field": "allowPost", "value": true}`
#[derive(Debug, Deserialize, ToSchema)]
pub struct PatchApiRequest {
    pub field: String,
    /// Boolean, integer or string, depending on the field
    #[schema(value_type = Object)]
    pub value: PatchValue,
}

// ============ Handlers ============

/// List published endpoints.
///
/// Without a query string every endpoint is listed. With one, only the
/// endpoints of a non-empty `groupid` are listed, so `/apis?groupid=` is empty.
#[utoipa::path(
    get,
    path = "/apis",
    params(GroupQuery),
    responses(
        (status = 200, description = "Published endpoints", body = ApiListResponse)
    ),
    tag = "APIs"
)]
pub async fn list_apis(
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
    Query(query): Query<GroupQuery>,
) -> AppResult<Json<ApiListResponse>> {
    let snapshot = state.registry.list();
    let apis = match (raw_query, query.group()) {
        (None, _) => snapshot.exchange_copies(),
        (Some(_), Some(group_id)) => snapshot
            .by_group(group_id)
            .map(EndpointRecord::exchange_copy)
            .collect(),
        (Some(_), None) => Vec::new(),
    };

    Ok(Json(ApiListResponse { apis }))
}

/// Get one endpoint by id
#[utoipa::path(
    get,
    path = "/apis/{id}",
    params(
        ("id" = String, Path, description = "Endpoint ID")
    ),
    responses(
        (status = 200, description = "Endpoint details", body = EndpointRecord),
        (status = 404, description = "Endpoint not found")
    ),
    tag = "APIs"
)]
pub async fn get_api(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<EndpointRecord>> {
    let record = state
        .registry
        .get(&id)
        .ok_or_else(|| AppError::NotFound("Endpoint".to_string()))?;
    Ok(Json(record.exchange_copy()))
}

/// Register or replace an endpoint
#[utoipa::path(
    post,
    path = "/apis",
    request_body = EndpointRecord,
    responses(
        (status = 201, description = "Endpoint registered", body = EndpointRecord),
        (status = 400, description = "Validation error")
    ),
    tag = "APIs"
)]
pub async fn register_api(
    State(state): State<AppState>,
    payload: Result<Json<EndpointRecord>, JsonRejection>,
) -> AppResult<(StatusCode, Json<EndpointRecord>)> {
    let Json(payload) = payload?;
    let response = payload.exchange_copy();
    state.registry.register(payload)?;

    tracing::info!(endpoint_id = %response.id, path = %response.path, "Endpoint registered via management API");
    Ok((StatusCode::CREATED, Json(response)))
}

/// Unregister an endpoint; unknown ids are accepted
#[utoipa::path(
    delete,
    path = "/apis/{id}",
    params(
        ("id" = String, Path, description = "Endpoint ID")
    ),
    responses(
        (status = 204, description = "Endpoint unregistered")
    ),
    tag = "APIs"
)]
pub async fn unregister_api(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    if state.registry.unregister(&id) {
        tracing::info!(endpoint_id = %id, "Endpoint unregistered via management API");
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Update one field of an endpoint.
///
/// Unknown fields and mismatched values leave the record unchanged.
#[utoipa::path(
    patch,
    path = "/apis/{id}",
    params(
        ("id" = String, Path, description = "Endpoint ID")
    ),
    request_body = PatchApiRequest,
    responses(
        (status = 200, description = "Current endpoint state", body = EndpointRecord),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Endpoint not found")
    ),
    tag = "APIs"
)]
pub async fn patch_api(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<PatchApiRequest>, JsonRejection>,
) -> AppResult<Json<EndpointRecord>> {
    let Json(payload) = payload?;
    validate_required(&payload.field, "Field")?;
    if !state.registry.list().contains(&id) {
        return Err(AppError::NotFound("Endpoint".to_string()));
    }

    let changed = state.registry.patch(&id, &payload.field, payload.value);
    tracing::debug!(endpoint_id = %id, field = %payload.field, changed, "Patch requested");

    // The endpoint may have been removed concurrently
    let record = state
        .registry
        .get(&id)
        .ok_or_else(|| AppError::NotFound("Endpoint".to_string()))?;
    Ok(Json(record.exchange_copy()))
}
