//! `api-secret` header derivation.
//!
//! Nightscout authenticates API calls with the lowercase hex SHA-1 digest
//! of the shared secret, sent in the `api-secret` header.

use sha1::{Digest, Sha1};

/// Header carrying the secret digest.
pub const API_SECRET_HEADER: &str = "api-secret";

/// Returns the lowercase hex SHA-1 digest of `secret`.
pub fn api_secret_digest(secret: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}
