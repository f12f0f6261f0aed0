//! Builder patterns for test data construction
//!
//! Provides a fluent API for creating test token claims.

use chrono::{Duration, Utc};
use serde_json::{json, Map, Value};

/// Builder for creating test JWT claims
///
/// # Example
/// ```rust,ignore
/// let claims = TokenClaimsBuilder::new("https://tenant.example/", "menu")
///     .for_subject("auth0|barista")
///     .with_permissions(&["get:drinks-detail"])
///     .build();
/// ```
pub struct TokenClaimsBuilder {
    issuer: String,
    audience: String,
    subject: String,
    expires_in_seconds: i64,
    permissions: Option<Vec<String>>,
    omit_expiry: bool,
}

impl TokenClaimsBuilder {
    /// Create a builder with defaults for the given issuer and audience
    pub fn new(issuer: &str, audience: &str) -> Self {
        Self {
            issuer: issuer.to_string(),
            audience: audience.to_string(),
            subject: "auth0|test-user".to_string(),
            expires_in_seconds: 3600,
            permissions: Some(Vec::new()),
            omit_expiry: false,
        }
    }

    /// Set the subject
    pub fn for_subject(mut self, subject: &str) -> Self {
        self.subject = subject.to_string();
        self
    }

    /// Set the permissions claim
    pub fn with_permissions(mut self, permissions: &[&str]) -> Self {
        self.permissions = Some(permissions.iter().map(|p| p.to_string()).collect());
        self
    }

    /// Leave the permissions claim out entirely
    pub fn without_permissions_claim(mut self) -> Self {
        self.permissions = None;
        self
    }

    /// Set expiration in seconds from now (negative for an expired token)
    pub fn expires_in(mut self, seconds: i64) -> Self {
        self.expires_in_seconds = seconds;
        self
    }

    /// Leave the exp claim out entirely
    pub fn without_expiry(mut self) -> Self {
        self.omit_expiry = true;
        self
    }

    /// Build the claims as a JSON value
    pub fn build(self) -> Value {
        let now = Utc::now();

        let mut claims = Map::new();
        claims.insert("iss".to_string(), json!(self.issuer));
        claims.insert("aud".to_string(), json!(self.audience));
        claims.insert("sub".to_string(), json!(self.subject));
        claims.insert("iat".to_string(), json!(now.timestamp()));
        if !self.omit_expiry {
            let exp = now + Duration::seconds(self.expires_in_seconds);
            claims.insert("exp".to_string(), json!(exp.timestamp()));
        }
        if let Some(permissions) = self.permissions {
            claims.insert("permissions".to_string(), json!(permissions));
        }

        Value::Object(claims)
    }
}
