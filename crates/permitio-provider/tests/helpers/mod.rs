//! Shared fixtures for provider tests.

#![allow(dead_code)]

pub mod mock_permit_server;

pub use mock_permit_server::{API_KEY, MockPermitServer};

use permitio_client::{PermitClient, PermitConfig};
use permitio_framework::{Lifecycle, Registry};
use permitio_provider::PermitProvider;
use std::sync::Arc;

/// Registry whose client points at the mock server.
pub fn test_registry(server: &MockPermitServer) -> Registry {
    let client = PermitClient::with_http_client(
        PermitConfig::new(API_KEY).with_api_url(server.uri()),
        reqwest::Client::new(),
    )
    .unwrap();
    PermitProvider::registry(Arc::new(client))
}

pub fn lifecycle(registry: &Registry, type_name: &str) -> Lifecycle {
    let resource = registry
        .resource(type_name)
        .unwrap_or_else(|| panic!("{type_name} is not registered"));
    Lifecycle::new(type_name, resource)
}
