use uuid::Uuid;

use api_registry::models::{EndpointRecord, EndpointState, HttpMethod};
use api_registry::state::AppState;

/// Factory for creating test data
pub struct Factory<'a> {
    state: &'a AppState,
}

#[allow(dead_code)]
impl<'a> Factory<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Unregistered running record with a unique id and path
    pub fn record(&self) -> EndpointRecord {
        let id = Uuid::new_v4().to_string();
        EndpointRecord::new(id.clone(), format!("Endpoint {}", id), format!("/{}", id))
            .with_address("localhost", 8080)
            .with_methods(&[HttpMethod::Get])
            .with_state(EndpointState::Running)
    }

    /// Register a running record in the given group
    pub fn register_in_group(&self, group_id: &str) -> EndpointRecord {
        let record = self.record().with_group(group_id);
        self.state.registry.register(record.clone()).unwrap();
        record
    }

    /// Register a running record
    pub fn register(&self) -> EndpointRecord {
        let record = self.record();
        self.state.registry.register(record.clone()).unwrap();
        record
    }
}
