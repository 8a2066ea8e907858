//! Infrastructure layer for WindVeal.
//!
//! Contains implementations of the traits defined in `windveal-core`:
//! the upstream provider adapters, SQLite storage, Argon2 password hashing,
//! and the persona file loader.

pub mod config;
pub mod crypto;
pub mod llm;
pub mod persona;
pub mod sqlite;
