use std::sync::Arc;

use axum_test::TestServer;
use api_registry::build_router;
use api_registry::config::Config;
use api_registry::registry::EndpointRegistry;
use api_registry::state::AppState;

/// Test configuration
pub fn test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        cluster_flag: "/test".to_string(),
        contract_title: "Test APIs".to_string(),
        ..Config::default()
    }
}

/// Test application wrapper
pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
}

#[allow(dead_code)]
impl TestApp {
    /// Create a new test application
    pub async fn new() -> Self {
        Self::with_state(AppState::new(test_config()))
    }

    /// Test application around an existing registry
    pub async fn with_registry(registry: Arc<EndpointRegistry>) -> Self {
        Self::with_state(AppState::with_registry(test_config(), registry))
    }

    fn with_state(state: AppState) -> Self {
        let router = build_router(state.clone());
        let server = TestServer::new(router).expect("Failed to create test server");

        Self { server, state }
    }
}
