//! LLM provider abstractions for WindVeal.
//!
//! - `ChatProvider`: RPITIT trait for concrete provider adapters
//! - `BoxChatProvider`: object-safe wrapper for dynamic dispatch
//! - `normalize`: conversation -> provider message list / flattened prompt
//! - `FallbackChain`: priority-ordered, first-success-wins orchestration

pub mod box_provider;
pub mod fallback;
pub mod normalize;
pub mod provider;
