//! Menu service error types.
//!
//! Every error renders as the JSON envelope
//! `{"success": false, "error": <status>, "message": <description>}`
//! via the `IntoResponse` impl. Authorization failures carry a short
//! classification code that is logged server-side, never returned.
//! Database details are likewise logged and replaced with a generic
//! message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Menu service error type.
///
/// Maps to HTTP status codes:
/// - MissingAuthorization, MalformedHeader, TokenExpired, IncorrectClaims: 401 Unauthorized
/// - KeyFetchFailed, KeyNotFound, TokenUnparseable, PermissionsMissing: 400 Bad Request
/// - PermissionDenied: 403 Forbidden
/// - NotFound: 404 Not Found
/// - Unprocessable: 422 Unprocessable Entity
/// - Database, Internal: 500 Internal Server Error
#[derive(Debug, Error)]
pub enum ApiError {
    /// Authorization header absent or not a two-part bearer value.
    #[error("unauthorized")]
    MissingAuthorization,

    /// Key set endpoint unreachable, erroring, or unparseable.
    #[error("Unable to fetch authentication keys.")]
    KeyFetchFailed,

    /// Token header decoded but carries no key ID.
    #[error("Authorization malformed")]
    MalformedHeader,

    /// No published key matches the token's key ID.
    #[error("Unable to find the appropriate key.")]
    KeyNotFound,

    /// Token expiry has passed.
    #[error("Token expired.")]
    TokenExpired,

    /// Audience or issuer claim does not match this service.
    #[error("Incorrect claims. Please, check the audience and issuer.")]
    IncorrectClaims,

    /// Any other verification failure: bad signature, wrong algorithm,
    /// undecodable token.
    #[error("Unable to parse authentication token.")]
    TokenUnparseable,

    /// Verified token has no permissions claim at all.
    #[error("Permissions not included in JWT.")]
    PermissionsMissing,

    /// Verified token lacks the permission this route requires.
    #[error("Permission not found.")]
    PermissionDenied,

    #[error("resource not found")]
    NotFound,

    #[error("unprocessable")]
    Unprocessable,

    #[error("Database error: {0}")]
    Database(String),

    #[error("internal server error")]
    Internal,
}

impl ApiError {
    /// Returns the HTTP status code for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingAuthorization
            | ApiError::MalformedHeader
            | ApiError::TokenExpired
            | ApiError::IncorrectClaims => StatusCode::UNAUTHORIZED,
            ApiError::KeyFetchFailed
            | ApiError::KeyNotFound
            | ApiError::TokenUnparseable
            | ApiError::PermissionsMissing => StatusCode::BAD_REQUEST,
            ApiError::PermissionDenied => StatusCode::FORBIDDEN,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Unprocessable => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Database(_) | ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short classification code for authorization failures.
    ///
    /// Returns `None` for non-authorization errors and for bare bearer
    /// extraction failures, which respond without a code.
    pub fn auth_code(&self) -> Option<&'static str> {
        match self {
            ApiError::KeyFetchFailed
            | ApiError::MalformedHeader
            | ApiError::KeyNotFound
            | ApiError::TokenUnparseable => Some("invalid_header"),
            ApiError::TokenExpired => Some("token_expired"),
            ApiError::IncorrectClaims | ApiError::PermissionsMissing => Some("invalid_claims"),
            ApiError::PermissionDenied => Some("unauthorized"),
            _ => None,
        }
    }
}

/// JSON error envelope returned to clients.
#[derive(Serialize)]
struct ErrorBody {
    /// Always `false` for error responses.
    success: bool,

    /// HTTP status code, mirrored into the body.
    error: u16,

    /// Human-readable description of the failure.
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match &self {
            ApiError::Database(err) => {
                // Log actual error server-side, return generic message to client
                tracing::error!(target: "menu.database", error = %err, "Database operation failed");
                ApiError::Internal.to_string()
            }
            other => other.to_string(),
        };

        if let Some(code) = self.auth_code() {
            tracing::debug!(
                target: "menu.auth",
                code = code,
                status = status.as_u16(),
                "Authorization failed"
            );
        }

        let body = ErrorBody {
            success: false,
            error: status.as_u16(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

/// Convert sqlx errors to ApiError.
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::Database(err.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use axum::body::Body;
    use http_body_util::BodyExt;

    // Helper function to read the response body as JSON
    async fn read_body_json(body: Body) -> serde_json::Value {
        let bytes = body.collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_display_missing_authorization() {
        assert_eq!(format!("{}", ApiError::MissingAuthorization), "unauthorized");
    }

    #[test]
    fn test_display_malformed_header() {
        // No trailing period on this one
        assert_eq!(
            format!("{}", ApiError::MalformedHeader),
            "Authorization malformed"
        );
    }

    #[test]
    fn test_display_key_not_found() {
        assert_eq!(
            format!("{}", ApiError::KeyNotFound),
            "Unable to find the appropriate key."
        );
    }

    #[test]
    fn test_display_token_expired() {
        assert_eq!(format!("{}", ApiError::TokenExpired), "Token expired.");
    }

    #[test]
    fn test_display_incorrect_claims() {
        assert_eq!(
            format!("{}", ApiError::IncorrectClaims),
            "Incorrect claims. Please, check the audience and issuer."
        );
    }

    #[test]
    fn test_display_token_unparseable() {
        assert_eq!(
            format!("{}", ApiError::TokenUnparseable),
            "Unable to parse authentication token."
        );
    }

    #[test]
    fn test_display_permissions_missing() {
        assert_eq!(
            format!("{}", ApiError::PermissionsMissing),
            "Permissions not included in JWT."
        );
    }

    #[test]
    fn test_display_permission_denied() {
        assert_eq!(
            format!("{}", ApiError::PermissionDenied),
            "Permission not found."
        );
    }

    #[test]
    fn test_display_key_fetch_failed() {
        assert_eq!(
            format!("{}", ApiError::KeyFetchFailed),
            "Unable to fetch authentication keys."
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::MissingAuthorization.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::MalformedHeader.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::TokenExpired.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::IncorrectClaims.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::KeyFetchFailed.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::KeyNotFound.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::TokenUnparseable.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::PermissionsMissing.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::PermissionDenied.status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Unprocessable.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            ApiError::Database("test".to_string()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(ApiError::Internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_auth_codes() {
        assert_eq!(ApiError::KeyFetchFailed.auth_code(), Some("invalid_header"));
        assert_eq!(ApiError::MalformedHeader.auth_code(), Some("invalid_header"));
        assert_eq!(ApiError::KeyNotFound.auth_code(), Some("invalid_header"));
        assert_eq!(ApiError::TokenUnparseable.auth_code(), Some("invalid_header"));
        assert_eq!(ApiError::TokenExpired.auth_code(), Some("token_expired"));
        assert_eq!(ApiError::IncorrectClaims.auth_code(), Some("invalid_claims"));
        assert_eq!(ApiError::PermissionsMissing.auth_code(), Some("invalid_claims"));
        assert_eq!(ApiError::PermissionDenied.auth_code(), Some("unauthorized"));
        assert_eq!(ApiError::MissingAuthorization.auth_code(), None);
        assert_eq!(ApiError::NotFound.auth_code(), None);
        assert_eq!(ApiError::Unprocessable.auth_code(), None);
        assert_eq!(ApiError::Internal.auth_code(), None);
    }

    #[tokio::test]
    async fn test_into_response_missing_authorization() {
        let response = ApiError::MissingAuthorization.into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body_json = read_body_json(response.into_body()).await;
        assert_eq!(body_json["success"], false);
        assert_eq!(body_json["error"], 401);
        assert_eq!(body_json["message"], "unauthorized");
    }

    #[tokio::test]
    async fn test_into_response_token_expired() {
        let response = ApiError::TokenExpired.into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body_json = read_body_json(response.into_body()).await;
        assert_eq!(body_json["success"], false);
        assert_eq!(body_json["error"], 401);
        assert_eq!(body_json["message"], "Token expired.");
    }

    #[tokio::test]
    async fn test_into_response_key_not_found() {
        let response = ApiError::KeyNotFound.into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body_json = read_body_json(response.into_body()).await;
        assert_eq!(body_json["success"], false);
        assert_eq!(body_json["error"], 400);
        assert_eq!(body_json["message"], "Unable to find the appropriate key.");
    }

    #[tokio::test]
    async fn test_into_response_permission_denied() {
        let response = ApiError::PermissionDenied.into_response();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let body_json = read_body_json(response.into_body()).await;
        assert_eq!(body_json["success"], false);
        assert_eq!(body_json["error"], 403);
        assert_eq!(body_json["message"], "Permission not found.");
    }

    #[tokio::test]
    async fn test_into_response_not_found() {
        let response = ApiError::NotFound.into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body_json = read_body_json(response.into_body()).await;
        assert_eq!(body_json["success"], false);
        assert_eq!(body_json["error"], 404);
        assert_eq!(body_json["message"], "resource not found");
    }

    #[tokio::test]
    async fn test_into_response_unprocessable() {
        let response = ApiError::Unprocessable.into_response();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body_json = read_body_json(response.into_body()).await;
        assert_eq!(body_json["success"], false);
        assert_eq!(body_json["error"], 422);
        assert_eq!(body_json["message"], "unprocessable");
    }

    #[tokio::test]
    async fn test_into_response_database_error_is_generic() {
        let response = ApiError::Database("connection refused at 10.0.0.5".to_string())
            .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body_json = read_body_json(response.into_body()).await;
        assert_eq!(body_json["success"], false);
        assert_eq!(body_json["error"], 500);
        // Detail stays server-side
        assert_eq!(body_json["message"], "internal server error");
    }

    #[tokio::test]
    async fn test_into_response_internal() {
        let response = ApiError::Internal.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body_json = read_body_json(response.into_body()).await;
        assert_eq!(body_json["success"], false);
        assert_eq!(body_json["error"], 500);
        assert_eq!(body_json["message"], "internal server error");
    }

    #[test]
    fn test_from_sqlx_error() {
        let err = ApiError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, ApiError::Database(_)));
    }
}
