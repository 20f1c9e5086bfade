//! Password hashing and verification.
//!
//! Stored password material comes in two shapes: bcrypt hashes written by
//! this service, and plaintext left behind by the platform's first
//! deployment. Verification detects the shape by the bcrypt format tag
//! and dispatches; writes always hash. The plaintext path exists only so
//! pre-existing rows keep authenticating — it is never written back.

use hivewatch_core::CoreError;

/// bcrypt work factor applied to every new or rotated secret.
pub const HASH_COST: u32 = 12;

/// Format tags of the bcrypt variants found in the account table.
const BCRYPT_TAGS: [&str; 3] = ["$2a$", "$2b$", "$2y$"];

/// Whether stored material is in the secure-hash format.
pub fn looks_hashed(stored: &str) -> bool {
    BCRYPT_TAGS.iter().any(|tag| stored.starts_with(tag))
}

/// Check `supplied` against stored material of either shape.
///
/// Policy: a failure inside the bcrypt path (malformed hash, cost out of
/// range) degrades to plaintext equality instead of aborting the login
/// flow, and returns `false` when that also misses. Pure function, no
/// side effects.
pub fn verify(supplied: &str, stored: &str) -> bool {
    if looks_hashed(stored) {
        match bcrypt::verify(supplied, stored) {
            Ok(matched) => matched,
            Err(_) => supplied == stored,
        }
    } else {
        supplied == stored
    }
}

/// Hash a secret for storage.
pub fn hash(secret: &str) -> Result<String, CoreError> {
    bcrypt::hash(secret, HASH_COST)
        .map_err(|e| CoreError::internal(format!("password hashing failed: {e}")))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
