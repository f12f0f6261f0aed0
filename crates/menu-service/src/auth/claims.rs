//! Access token claims.

use crate::errors::ApiError;
use serde::{Deserialize, Serialize};

/// Claims carried by a verified access token.
///
/// Only the claims the service acts on are modeled. The audience is
/// checked during signature verification and not retained afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Token issuer (the tenant URL).
    pub iss: String,

    /// Expiration timestamp (Unix epoch seconds).
    pub exp: i64,

    /// Permissions granted to this token. `None` when the claim is
    /// absent from the token (or explicitly null), which is distinct
    /// from an empty list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
}

impl Claims {
    /// Check that the token grants a permission.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::PermissionsMissing` when the token carries no
    /// permissions claim at all, and `ApiError::PermissionDenied` when
    /// the claim is present but does not contain `permission`.
    pub fn require_permission(&self, permission: &str) -> Result<(), ApiError> {
        let permissions = self
            .permissions
            .as_ref()
            .ok_or(ApiError::PermissionsMissing)?;

        if permissions.iter().any(|p| p == permission) {
            Ok(())
        } else {
            Err(ApiError::PermissionDenied)
        }
    }
}
