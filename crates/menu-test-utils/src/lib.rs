//! # Menu Test Utilities
//!
//! Shared test utilities for the menu service.
//!
//! This crate provides:
//! - Deterministic RSA signing keys published as JWKS fixtures
//! - Test data builders (TokenClaimsBuilder)
//! - Server test harness (TestMenuServer for E2E tests)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use menu_test_utils::*;
//!
//! #[sqlx::test(migrations = "../../migrations")]
//! async fn test_example(pool: SqlitePool) -> Result<()> {
//!     let server = TestMenuServer::spawn(pool).await?;
//!
//!     let response = reqwest::Client::new()
//!         .get(format!("{}/drinks-detail", server.url()))
//!         .bearer_auth(server.token(&["get:drinks-detail"]))
//!         .send()
//!         .await?;
//!
//!     assert_eq!(response.status(), 200);
//!     Ok(())
//! }
//! ```

pub mod server_harness;
pub mod signing_keys;
pub mod token_builders;

// Re-export commonly used items
pub use server_harness::*;
pub use signing_keys::*;
pub use token_builders::*;
