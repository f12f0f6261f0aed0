//! Deterministic RSA signing keys for testing
//!
//! Provides reproducible RSA keypairs that sign test tokens and publish
//! themselves as JWKS entries. The same seed always produces the same
//! keypair.
//!
//! RSA key generation is slow, so the shared keypairs are created once
//! per test binary and handed out by reference.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rsa::pkcs1::{EncodeRsaPrivateKey, LineEnding};
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use std::sync::OnceLock;

/// Key size for test keypairs.
const TEST_KEY_BITS: usize = 2048;

/// Deterministic RSA keypair for signing test tokens.
pub struct TestKeypair {
    /// Key id published in the JWKS entry and token headers.
    pub kid: String,
    private_pem: String,
    public_key: RsaPublicKey,
}

impl TestKeypair {
    /// Generate a keypair from a seed.
    ///
    /// The same seed always produces the same key, ensuring test
    /// reproducibility.
    pub fn new(seed: u64, kid: &str) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let private_key =
            RsaPrivateKey::new(&mut rng, TEST_KEY_BITS).expect("Failed to generate test keypair");
        let public_key = RsaPublicKey::from(&private_key);

        let private_pem = private_key
            .to_pkcs1_pem(LineEnding::LF)
            .expect("Failed to encode test key")
            .to_string();

        Self {
            kid: kid.to_string(),
            private_pem,
            public_key,
        }
    }

    /// Sign claims into an RS256 token carrying this key's kid.
    pub fn sign(&self, claims: &serde_json::Value) -> String {
        let mut header = Header::new(Algorithm::RS256);
        header.typ = Some("JWT".to_string());
        header.kid = Some(self.kid.clone());
        self.sign_with_header(&header, claims)
    }

    /// Sign claims with a caller-supplied header.
    ///
    /// Used for malformed-header cases such as a missing kid.
    pub fn sign_with_header(&self, header: &Header, claims: &serde_json::Value) -> String {
        let encoding_key =
            EncodingKey::from_rsa_pem(self.private_pem.as_bytes()).expect("Failed to load test key");
        encode(header, claims, &encoding_key).expect("Failed to sign token")
    }

    /// Render this key as a JWKS entry.
    pub fn jwk_json(&self) -> serde_json::Value {
        serde_json::json!({
            "kty": "RSA",
            "kid": self.kid,
            "alg": "RS256",
            "use": "sig",
            "n": URL_SAFE_NO_PAD.encode(self.public_key.n().to_bytes_be()),
            "e": URL_SAFE_NO_PAD.encode(self.public_key.e().to_bytes_be()),
        })
    }
}

/// The keypair published by the test JWKS endpoint.
pub fn primary_keypair() -> &'static TestKeypair {
    static KEYPAIR: OnceLock<TestKeypair> = OnceLock::new();
    KEYPAIR.get_or_init(|| TestKeypair::new(1, "test-key-01"))
}

/// A second keypair that the test JWKS endpoint does not publish.
pub fn secondary_keypair() -> &'static TestKeypair {
    static KEYPAIR: OnceLock<TestKeypair> = OnceLock::new();
    KEYPAIR.get_or_init(|| TestKeypair::new(2, "test-key-02"))
}
