//! Access token verification.
//!
//! Implements the bearer token pipeline: key set fetching, key
//! selection by `kid`, RS256 signature verification with audience and
//! issuer checks, and permission lookups on the verified claims.

pub mod claims;
pub mod jwks;
pub mod jwt;

pub use claims::Claims;
pub use jwks::{Jwk, JwksClient, JwksResponse};
pub use jwt::TokenVerifier;
