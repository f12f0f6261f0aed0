//! Access token verification.
//!
//! Verifies RS256 bearer tokens against keys published on the tenant's
//! JWKS endpoint. Verification is strict: the token header must carry a
//! `kid` matching a published key, the signature must verify, and the
//! audience, issuer, and expiry claims must all check out with zero
//! expiry leeway.

use crate::auth::claims::Claims;
use crate::auth::jwks::{Jwk, JwksClient};
use crate::errors::ApiError;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use tracing::instrument;

/// Token verifier backed by the tenant's published key set.
pub struct TokenVerifier {
    /// Client for fetching verification keys.
    jwks_client: JwksClient,

    /// Expected `aud` claim.
    audience: String,

    /// Expected `iss` claim (the tenant URL, with trailing slash).
    issuer: String,
}

impl TokenVerifier {
    /// Create a new token verifier.
    ///
    /// # Arguments
    ///
    /// * `jwks_client` - Client for fetching verification keys
    /// * `audience` - Expected `aud` claim
    /// * `issuer` - Expected `iss` claim
    pub fn new(jwks_client: JwksClient, audience: String, issuer: String) -> Self {
        Self {
            jwks_client,
            audience,
            issuer,
        }
    }

    /// Verify a bearer token and return its claims.
    ///
    /// The key set is fetched before the token is examined, so even a
    /// token that fails header parsing costs one fetch. That order keeps
    /// a key set outage surfacing identically for every caller.
    ///
    /// # Errors
    ///
    /// - `ApiError::KeyFetchFailed` when the key set cannot be fetched
    /// - `ApiError::TokenUnparseable` when the header does not decode
    /// - `ApiError::MalformedHeader` when the header carries no `kid`
    /// - `ApiError::KeyNotFound` when no published key matches the `kid`
    /// - `ApiError::TokenExpired` when the expiry has passed
    /// - `ApiError::IncorrectClaims` on audience or issuer mismatch
    /// - `ApiError::TokenUnparseable` for any other verification failure
    #[instrument(skip_all)]
    pub async fn verify(&self, token: &str) -> Result<Claims, ApiError> {
        let jwks = self.jwks_client.fetch().await?;

        let header = decode_header(token).map_err(|e| {
            tracing::debug!(target: "menu.auth.jwt", error = %e, "Token header did not decode");
            ApiError::TokenUnparseable
        })?;

        let kid = header.kid.ok_or_else(|| {
            tracing::debug!(target: "menu.auth.jwt", "Token header missing kid");
            ApiError::MalformedHeader
        })?;

        let jwk = jwks.find_key(&kid).ok_or_else(|| {
            tracing::debug!(target: "menu.auth.jwt", kid = %kid, "No verification key for kid");
            ApiError::KeyNotFound
        })?;

        let claims = verify_signed_claims(token, jwk, &self.audience, &self.issuer)?;

        tracing::debug!(target: "menu.auth.jwt", "Token verified");
        Ok(claims)
    }
}

/// Verify the token signature and claims against a single key.
///
/// Uses RS256 exclusively; the key's RSA components build the decoding
/// key directly from their base64url form.
fn verify_signed_claims(
    token: &str,
    jwk: &Jwk,
    audience: &str,
    issuer: &str,
) -> Result<Claims, ApiError> {
    let n = jwk.n.as_ref().ok_or_else(|| {
        tracing::warn!(target: "menu.auth.jwt", kid = %jwk.kid, "Verification key missing modulus");
        ApiError::TokenUnparseable
    })?;

    let e = jwk.e.as_ref().ok_or_else(|| {
        tracing::warn!(target: "menu.auth.jwt", kid = %jwk.kid, "Verification key missing exponent");
        ApiError::TokenUnparseable
    })?;

    let decoding_key = DecodingKey::from_rsa_components(n, e).map_err(|err| {
        tracing::error!(target: "menu.auth.jwt", kid = %jwk.kid, error = %err, "Invalid RSA key components");
        ApiError::TokenUnparseable
    })?;

    let mut validation = Validation::new(Algorithm::RS256);
    validation.set_audience(&[audience]);
    validation.set_issuer(&[issuer]);
    // Tokens are rejected the moment they expire
    validation.leeway = 0;

    let token_data =
        decode::<Claims>(token, &decoding_key, &validation).map_err(|e| classify_error(&e))?;

    Ok(token_data.claims)
}

/// Map a verification failure onto the error taxonomy.
///
/// Expiry and audience/issuer mismatches get dedicated responses; every
/// other failure collapses into the generic parse error.
fn classify_error(err: &jsonwebtoken::errors::Error) -> ApiError {
    match err.kind() {
        ErrorKind::ExpiredSignature => {
            tracing::debug!(target: "menu.auth.jwt", "Token expired");
            ApiError::TokenExpired
        }
        ErrorKind::InvalidAudience | ErrorKind::InvalidIssuer => {
            tracing::debug!(target: "menu.auth.jwt", error = %err, "Token audience or issuer mismatch");
            ApiError::IncorrectClaims
        }
        // A token with no iss claim fails the same check an issuer
        // mismatch does
        ErrorKind::MissingRequiredClaim(claim) if claim == "iss" => {
            tracing::debug!(target: "menu.auth.jwt", "Token missing iss claim");
            ApiError::IncorrectClaims
        }
        _ => {
            tracing::debug!(target: "menu.auth.jwt", error = %err, "Token verification failed");
            ApiError::TokenUnparseable
        }
    }
}
