use std::sync::Arc;

use allowance_service::domain::user::service::UserService;
use allowance_service::inbound::http::router::create_router;
use allowance_service::outbound::repositories::InMemoryUserRepository;
use auth::AuthenticationService;
use auth::EncryptionKey;
use auth::LockoutPolicy;
use auth::LockoutTracker;
use auth::TokenManager;
use serde_json::json;

pub const TEST_TOKEN_SECRET: &[u8] = b"test-secret-key-for-token-signing-at-least-32-bytes";

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub tokens: TokenManager,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let repository = Arc::new(InMemoryUserRepository::new());
        let authentication = Arc::new(AuthenticationService::new(
            Arc::clone(&repository),
            EncryptionKey::generate(),
            Arc::new(
                TokenManager::new(TEST_TOKEN_SECRET).expect("Failed to create token manager"),
            ),
            Arc::new(LockoutTracker::new(LockoutPolicy::default())),
        ));
        let user_service = Arc::new(UserService::new(
            Arc::clone(&repository),
            Arc::clone(&authentication),
        ));

        let router = create_router(user_service, authentication);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            tokens: TokenManager::new(TEST_TOKEN_SECRET).expect("Failed to create token manager"),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Register a user and return the response body
    pub async fn register(&self, email: &str, password: &str) -> serde_json::Value {
        let response = self
            .post("/api/register")
            .json(&json!({
                "firstName": "Alex",
                "lastName": "Doe",
                "email": email,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
        response.json().await.expect("Failed to parse response")
    }

    /// Attempt a login and return the raw response
    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/api/login")
            .json(&json!({
                "email": email,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }
}
