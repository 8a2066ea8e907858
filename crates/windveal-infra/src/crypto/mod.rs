//! Cryptographic operations for WindVeal.
//!
//! - `password`: Argon2id password hashing for user accounts

pub mod password;
