//! Test server harness for E2E testing
//!
//! Provides `TestMenuServer` for spawning real menu service instances
//! in tests, backed by a mocked JWKS endpoint.

use crate::signing_keys::primary_keypair;
use crate::token_builders::TokenClaimsBuilder;
use menu_service::config::Config;
use menu_service::routes::{self, AppState};
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Audience configured for test servers.
pub const TEST_AUDIENCE: &str = "menu";

/// Path the service fetches verification keys from.
pub const JWKS_PATH: &str = "/.well-known/jwks.json";

/// Test harness for spawning the menu service in E2E tests.
///
/// # Example
/// ```rust,ignore
/// #[sqlx::test(migrations = "../../migrations")]
/// async fn test_menu_flow_e2e(pool: SqlitePool) -> Result<()> {
///     let server = TestMenuServer::spawn(pool).await?;
///     let client = reqwest::Client::new();
///
///     let response = client
///         .get(format!("{}/drinks", server.url()))
///         .send()
///         .await?;
///
///     assert_eq!(response.status(), 200);
///     Ok(())
/// }
/// ```
pub struct TestMenuServer {
    addr: SocketAddr,
    mock_server: MockServer,
    issuer: String,
    _server_handle: JoinHandle<()>,
}

impl TestMenuServer {
    /// Spawn a new test server instance with an isolated database.
    ///
    /// The server will:
    /// - Mount a mock JWKS endpoint publishing the primary test keypair
    /// - Bind to a random available port (127.0.0.1:0)
    /// - Start the HTTP server in the background
    ///
    /// # Arguments
    /// * `pool` - Database connection pool (typically from `#[sqlx::test]`)
    pub async fn spawn(pool: SqlitePool) -> Result<Self, anyhow::Error> {
        // Create mock JWKS server publishing the primary keypair
        let mock_server = MockServer::start().await;
        let jwks_response = serde_json::json!({
            "keys": [primary_keypair().jwk_json()]
        });

        Mock::given(method("GET"))
            .and(path(JWKS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(&jwks_response))
            .mount(&mock_server)
            .await;

        // The issuer is derived from the configured domain and always
        // carries an https scheme; it is only ever compared as a string.
        // JWKS_URL is overridden separately because the mock serves
        // plain HTTP.
        let domain = mock_server
            .uri()
            .trim_start_matches("http://")
            .to_string();
        let issuer = format!("https://{}/", domain);

        // Build configuration pointing at the mock JWKS server
        let vars = HashMap::from([
            ("AUTH_DOMAIN".to_string(), domain),
            ("API_AUDIENCE".to_string(), TEST_AUDIENCE.to_string()),
            (
                "JWKS_URL".to_string(),
                format!("{}{}", mock_server.uri(), JWKS_PATH),
            ),
            ("DATABASE_URL".to_string(), "sqlite::memory:".to_string()),
            ("BIND_ADDRESS".to_string(), "127.0.0.1:0".to_string()),
        ]);

        let config = Config::from_vars(&vars)
            .map_err(|e| anyhow::anyhow!("Failed to create config: {}", e))?;

        // Create application state
        let state = Arc::new(AppState {
            pool: pool.clone(),
            config,
        });

        // Build routes using the service's real route builder
        let app = routes::build_routes(state);

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind test server: {}", e))?;

        let addr = listener
            .local_addr()
            .map_err(|e| anyhow::anyhow!("Failed to get local address: {}", e))?;

        // Spawn server in background
        let server_handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("Test server error: {}", e);
            }
        });

        Ok(Self {
            addr,
            mock_server,
            issuer,
            _server_handle: server_handle,
        })
    }

    /// Get the base URL of the test server.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get the issuer the server expects in tokens.
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Build a signed token carrying the given permissions.
    pub fn token(&self, permissions: &[&str]) -> String {
        let claims = self.claims().with_permissions(permissions).build();
        primary_keypair().sign(&claims)
    }

    /// Start a claims builder preconfigured for this server.
    ///
    /// Sign the result with [`primary_keypair`] to get a token the
    /// server accepts.
    pub fn claims(&self) -> TokenClaimsBuilder {
        TokenClaimsBuilder::new(&self.issuer, TEST_AUDIENCE)
    }

    /// Number of requests the mock JWKS endpoint has served.
    ///
    /// Resets to zero whenever the published key set is replaced.
    pub async fn jwks_request_count(&self) -> usize {
        self.mock_server
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or(0)
    }

    /// Replace the published key set with an arbitrary response body.
    pub async fn replace_jwks(&self, body: serde_json::Value) {
        self.mock_server.reset().await;
        Mock::given(method("GET"))
            .and(path(JWKS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .mount(&self.mock_server)
            .await;
    }

    /// Make the JWKS endpoint answer with the given status and no body.
    pub async fn fail_jwks(&self, status: u16) {
        self.mock_server.reset().await;
        Mock::given(method("GET"))
            .and(path(JWKS_PATH))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.mock_server)
            .await;
    }
}

impl Drop for TestMenuServer {
    fn drop(&mut self) {
        // Explicitly abort the HTTP server task to ensure immediate cleanup
        // when the test completes.
        self._server_handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_server_spawns_successfully(pool: SqlitePool) -> Result<(), anyhow::Error> {
        let server = TestMenuServer::spawn(pool).await?;

        // Verify server is accessible
        assert!(server.url().starts_with("http://127.0.0.1:"));

        // Verify health endpoint works
        let response = reqwest::get(format!("{}/health", server.url())).await?;
        assert_eq!(response.status(), 200);
        assert_eq!(response.text().await?, "OK");

        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_server_issuer_uses_https_scheme(pool: SqlitePool) -> Result<(), anyhow::Error> {
        let server = TestMenuServer::spawn(pool).await?;

        assert!(server.issuer().starts_with("https://127.0.0.1:"));
        assert!(server.issuer().ends_with('/'));

        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_token_carries_requested_permissions(pool: SqlitePool) -> Result<(), anyhow::Error> {
        let server = TestMenuServer::spawn(pool).await?;

        let token = server.token(&["get:drinks-detail"]);
        assert_eq!(token.split('.').count(), 3);

        Ok(())
    }
}
