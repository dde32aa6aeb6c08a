//! Cryptographic Utilities

use base64::{Engine, engine::general_purpose};
use sha2::{Digest, Sha256};

/// Compute SHA-256 hash
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Encode bytes as URL-safe base64 without padding
///
/// The output alphabet is `[A-Za-z0-9_-]`, safe inside URL paths,
/// quoted header values and JSON strings.
pub fn to_base64_url(bytes: &[u8]) -> String {
    general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}
