//! Shared domain types for WindVeal.
//!
//! Conversation turns, persona, provider configuration, users, and the error
//! enums shared across the workspace.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
pub mod persona;
pub mod user;
