/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for cryptea-connect tests

use std::sync::Arc;

use cryptea_connect::{
    AuthGateway, AuthProvider, ChallengeSigner, ClientConfig, CrypteaClient, Identity,
    IdentityCache, MemoryStorage, ProviderOptions, SessionStore,
};
use wiremock::MockServer;

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// A verified identity fixture
#[allow(dead_code)]
pub fn verified_identity() -> Identity {
    Identity {
        id: "9".to_string(),
        email: Some("ada@example.com".to_string()),
        username: "ada".to_string(),
        accounts: vec!["0xabc".to_string()],
        avatar_url: None,
        email_verified_at: Some(chrono::Utc::now()),
    }
}

/// An identity with an email but no verification timestamp
#[allow(dead_code)]
pub fn unverified_identity() -> Identity {
    Identity {
        email_verified_at: None,
        ..verified_identity()
    }
}

/// Success body as the backend sends it
#[allow(dead_code)]
pub fn wallet_auth_success_body() -> serde_json::Value {
    serde_json::json!({
        "error": false,
        "data": {"data": {
            "id": 9,
            "username": "ada",
            "img": "avatar.png",
            "email": "ada@example.com",
            "accounts": ["0xabc"],
            "email_verified_at": "2024-05-01T12:00:00Z"
        }},
        "token": "bearer-token"
    })
}

/// Provider wired against a mock backend with in-memory storage
#[allow(dead_code)]
pub fn provider_for(
    server: &MockServer,
    storage: Arc<MemoryStorage>,
    cache: Arc<dyn IdentityCache>,
    user_agent: &str,
) -> (AuthProvider, Arc<SessionStore>) {
    let client =
        CrypteaClient::with_config_and_base_url(ClientConfig::default(), &server.uri()).unwrap();
    let session = Arc::new(SessionStore::init(storage).unwrap());
    let gateway = AuthGateway::new(client, Arc::clone(&session));

    let provider = AuthProvider::new(
        gateway,
        ChallengeSigner::new(),
        Arc::clone(&session),
        cache,
        ProviderOptions {
            timezone: "Europe/London".to_string(),
            user_agent: user_agent.to_string(),
        },
    );

    (provider, session)
}
