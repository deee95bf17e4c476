use std::sync::Arc;

use tokio::signal;
use tokio::sync::watch;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api_registry::config::Config;
use api_registry::handlers::{ApiListResponse, PatchApiRequest};
use api_registry::models::{AllowedMethods, EndpointRecord, EndpointState, HttpMethod};
use api_registry::registry::EndpointRegistry;
use api_registry::state::AppState;
use api_registry::sync::{self, ChannelNotifier, CoordinationStore, MemoryStore, Publisher};
use api_registry::{build_router, handlers};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::endpoint::list_apis,
        handlers::endpoint::get_api,
        handlers::endpoint::register_api,
        handlers::endpoint::unregister_api,
        handlers::endpoint::patch_api,
        handlers::contract::get_contract,
        handlers::metadata::put_metadata,
        handlers::metadata::delete_metadata,
    ),
    components(schemas(
        ApiListResponse,
        PatchApiRequest,
        EndpointRecord,
        EndpointState,
        AllowedMethods,
        HttpMethod,
    )),
    tags(
        (name = "APIs", description = "Published endpoint management"),
        (name = "Contract", description = "Swagger contract of the running endpoints")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Load configuration
    let config = Config::from_env().expect("Failed to load configuration");
    let addr = config.server_addr();

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Wire the registry to the coordination store when replication is on
    let (state, publisher) = if config.sync_enabled {
        tracing::warn!("Using the in-memory coordination store; replication is process-local");
        let store: Arc<dyn CoordinationStore> = Arc::new(MemoryStore::new());
        let (notifier, changes) = ChannelNotifier::channel();
        let registry = Arc::new(EndpointRegistry::with_listener(Arc::new(notifier)));

        sync::bootstrap(store.as_ref(), &config.cluster_flag, &registry)
            .await
            .expect("Failed to load replicated endpoints");

        let publisher = Publisher::new(
            store,
            registry.clone(),
            config.cluster_flag.clone(),
            addr.clone(),
        );
        let handle = tokio::spawn(publisher.run(changes, shutdown_rx));
        (AppState::with_registry(config, registry), Some(handle))
    } else {
        (AppState::new(config), None)
    };

    // Build the main application router
    let app = build_router(state)
        // Add Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();

    tracing::info!("Server started on http://{}", addr);
    tracing::info!("Swagger UI: http://{}/swagger-ui/", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, stopping server...");
            let _ = shutdown_tx.send(true);
        })
        .await
        .unwrap();

    if let Some(handle) = publisher {
        if let Err(e) = handle.await {
            tracing::error!(error = %e, "Publisher task failed");
        }
    }

    tracing::info!("Server shutdown complete");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
