//! Middleware for the menu service.

pub mod auth;

pub use auth::{require_permission, AuthState};
