//! HTTP layer for WindVeal.
//!
//! Axum routes for the chat proxy and its collaborators (auth, history),
//! a flat `{error}` body for every failure, and CORS support.

pub mod error;
pub mod handlers;
pub mod router;
