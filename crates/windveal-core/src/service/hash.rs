//! CredentialHasher trait for password storage.
//!
//! Defined in windveal-core so the auth service can hash and verify
//! passwords without coupling to a specific algorithm. The Argon2 adapter
//! lives in windveal-infra.

use windveal_types::error::AuthError;

/// Abstraction over one-way password hashing.
pub trait CredentialHasher: Send + Sync {
    /// Hash a plaintext password into a self-describing string (salt included).
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Check a plaintext password against a stored hash.
    ///
    /// Returns `Ok(false)` on mismatch. Errors are reserved for hashes that
    /// cannot be parsed.
    fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, AuthError>;
}
