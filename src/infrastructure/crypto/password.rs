//! Password hashing utilities

use bcrypt::{hash, verify};

/// Hash a password using bcrypt with the given work factor.
/// Each call salts independently, so hashing the same password twice
/// yields different strings.
pub fn hash_password(password: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    hash(password, cost)
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    verify(password, hash)
}
