//! Common test utilities for ferrypay integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use axum_test::TestServer;
use serde_json::Value;
use wiremock::MockServer;

use ferrypay_core::{Payload, SharedSecret, Signer};
use ferrypay_service::{create_router, AppState, ServiceConfig};

/// Secret shared between the gateway and the mock processor.
pub const SECRET: &str = "test_secret_key";

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// Mock mPAY ONE processor.
    pub upstream: MockServer,
}

impl TestHarness {
    /// Create a new test harness pointed at a fresh mock processor.
    pub async fn new() -> Self {
        let upstream = MockServer::start().await;

        let mut config = ServiceConfig::with_secret(SECRET);
        config.listen_addr = "127.0.0.1:0".into();
        config.mpay_base_url = format!("{}/api/v1", upstream.uri());
        config.upstream_timeout_seconds = 5;

        let state = AppState::new(config).expect("Failed to build app state");
        let server = TestServer::new(create_router(state)).expect("Failed to create test server");

        Self { server, upstream }
    }

    /// Bodies the mock processor has received, in order.
    pub async fn upstream_bodies(&self) -> Vec<Payload> {
        self.upstream
            .received_requests()
            .await
            .expect("request recording enabled")
            .iter()
            .map(|r| serde_json::from_slice(&r.body).expect("JSON body"))
            .collect()
    }
}

/// Sign `payload` the way the processor does and return the JSON body.
pub fn signed_with(secret: &str, payload: Payload) -> Value {
    Signer::new(SharedSecret::new(secret))
        .sign_into(payload)
        .expect("signable payload")
        .into_json()
}
