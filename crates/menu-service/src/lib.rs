//! Menu Service Library
//!
//! This library provides the core functionality for the Barkeep drinks
//! menu API:
//!
//! - Public short-form menu listing
//! - Full recipe management (create, update, delete) for staff with the
//!   matching permissions
//! - Access token verification against the tenant's JWKS endpoint
//! - Per-route permission enforcement
//!
//! # Architecture
//!
//! Requests flow Router -> Middleware -> Handler -> Repository:
//!
//! ```text
//! routes/mod.rs -> middleware/auth.rs -> handlers/*.rs -> repositories/*.rs
//! ```
//!
//! # Modules
//!
//! - `auth` - Key set fetching, token verification, and claims
//! - `config` - Service configuration from environment
//! - `errors` - Error types mapping onto the JSON error envelope
//! - `handlers` - HTTP request handlers
//! - `middleware` - Per-route authorization middleware
//! - `models` - Data models
//! - `repositories` - Database access
//! - `routes` - Axum router setup

pub mod auth;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
