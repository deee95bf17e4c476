// Library crate for the endpoint registry service
// Exports modules for use by the server binary and tests

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod registry;
pub mod services;
pub mod state;
pub mod sync;

use axum::{
    routing::{get, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{
    delete_metadata, get_api, get_contract, list_apis, patch_api, put_metadata, register_api,
    unregister_api,
};
use crate::state::AppState;

/// Build the application router with the given state
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "Endpoint registry is running" }))
        // Registry management
        .route("/apis", get(list_apis).post(register_api))
        .route("/apis/swagger", get(get_contract))
        .route(
            "/apis/{id}",
            get(get_api).delete(unregister_api).patch(patch_api),
        )
        // Contract metadata feed
        .route(
            "/apis/{id}/metadata",
            put(put_metadata).delete(delete_metadata),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
