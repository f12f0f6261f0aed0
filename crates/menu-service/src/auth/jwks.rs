//! Key set retrieval for token verification.
//!
//! Verification keys are fetched from the tenant's
//! `/.well-known/jwks.json` endpoint. The client holds no cache: every
//! verification fetches a fresh document, so key rotations and
//! revocations take effect immediately at the cost of one HTTP round
//! trip per verification.

use crate::errors::ApiError;
use serde::Deserialize;
use tracing::instrument;

/// JSON Web Key from the key set endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Jwk {
    /// Key type (always "RSA" for RS256).
    pub kty: String,

    /// Key ID - used to select the correct key for verification.
    pub kid: String,

    /// Algorithm (should be "RS256").
    #[serde(default)]
    pub alg: Option<String>,

    /// Key use (should be "sig" for signing).
    #[serde(default, rename = "use")]
    pub key_use: Option<String>,

    /// RSA modulus (base64url encoded).
    #[serde(default)]
    pub n: Option<String>,

    /// RSA public exponent (base64url encoded).
    #[serde(default)]
    pub e: Option<String>,
}

/// Key set response from the JWKS endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct JwksResponse {
    /// List of JSON Web Keys, in document order.
    pub keys: Vec<Jwk>,
}

impl JwksResponse {
    /// Find the verification key for a key ID.
    ///
    /// The whole list is scanned, so when a document carries duplicate
    /// `kid` entries the one closest to the end wins.
    pub fn find_key(&self, kid: &str) -> Option<&Jwk> {
        self.keys.iter().filter(|key| key.kid == kid).last()
    }
}

/// Client for fetching the key set document.
pub struct JwksClient {
    /// URL to the JWKS endpoint.
    jwks_url: String,

    /// HTTP client for fetching the key set.
    http_client: reqwest::Client,
}

impl JwksClient {
    /// Create a new key set client.
    ///
    /// # Arguments
    ///
    /// * `jwks_url` - URL to the tenant's JWKS endpoint
    pub fn new(jwks_url: String) -> Self {
        Self {
            jwks_url,
            http_client: reqwest::Client::new(),
        }
    }

    /// Fetch the current key set.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::KeyFetchFailed` if the endpoint is
    /// unreachable, responds with a non-success status, or returns a
    /// body that does not parse as a key set.
    #[instrument(skip(self))]
    pub async fn fetch(&self) -> Result<JwksResponse, ApiError> {
        tracing::debug!(target: "menu.auth.jwks", url = %self.jwks_url, "Fetching key set");

        let response = self
            .http_client
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(target: "menu.auth.jwks", error = %e, "Failed to fetch key set");
                ApiError::KeyFetchFailed
            })?;

        if !response.status().is_success() {
            tracing::error!(
                target: "menu.auth.jwks",
                status = %response.status(),
                "Key set endpoint returned error"
            );
            return Err(ApiError::KeyFetchFailed);
        }

        let jwks: JwksResponse = response.json().await.map_err(|e| {
            tracing::error!(target: "menu.auth.jwks", error = %e, "Failed to parse key set response");
            ApiError::KeyFetchFailed
        })?;

        tracing::debug!(
            target: "menu.auth.jwks",
            key_count = jwks.keys.len(),
            "Key set fetched"
        );

        Ok(jwks)
    }
}
