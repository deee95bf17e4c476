use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

use crate::error::AppResult;
use crate::models::EndpointMetadata;
use crate::state::AppState;

/// Replace the documentation attached to an endpoint.
/// The endpoint does not need to be registered yet.
#[utoipa::path(
    put,
    path = "/apis/{id}/metadata",
    params(
        ("id" = String, Path, description = "Endpoint ID")
    ),
    request_body(content = Object, description = "Descriptions, parameters, responses and models per method"),
    responses(
        (status = 204, description = "Metadata stored"),
        (status = 400, description = "Validation error")
    ),
    tag = "Contract"
)]
pub async fn put_metadata(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<EndpointMetadata>, JsonRejection>,
) -> AppResult<StatusCode> {
    let Json(payload) = payload?;
    state.metadata.set(id, payload);
    Ok(StatusCode::NO_CONTENT)
}

/// Drop the documentation attached to an endpoint
#[utoipa::path(
    delete,
    path = "/apis/{id}/metadata",
    params(
        ("id" = String, Path, description = "Endpoint ID")
    ),
    responses(
        (status = 204, description = "Metadata removed")
    ),
    tag = "Contract"
)]
pub async fn delete_metadata(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.metadata.remove(&id);
    Ok(StatusCode::NO_CONTENT)
}
