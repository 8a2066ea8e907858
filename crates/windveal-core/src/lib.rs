//! Chat proxy logic and repository trait definitions for WindVeal.
//!
//! This crate defines the provider trait, the history normalizer, the
//! fallback chain, and the "ports" (repository traits) that the
//! infrastructure layer implements. It depends only on `windveal-types` --
//! never on `windveal-infra` or any database/HTTP crate.

pub mod llm;
pub mod repository;
pub mod service;
