//! Password encoding for the local credential store.
//!
//! This is a placeholder and is NOT a secure password hash: a single unsalted
//! SHA-256 over a fixed domain prefix. It only keeps plaintext out of local
//! storage; there is no server to verify against.

use sha2::{Digest, Sha256};

const DOMAIN: &[u8] = b"telenach.local.v1:";

/// One-way encode `password` as lowercase hex.
pub fn encode_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(DOMAIN);
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Compare `password` against a stored encoding.
pub fn verify_password(password: &str, encoded: &str) -> bool {
    let candidate = encode_password(password);
    // length is fixed, so a byte fold avoids an early exit on first mismatch
    candidate.len() == encoded.len()
        && candidate
            .bytes()
            .zip(encoded.bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}
