//! Embedding client.
//!
//! Provider-agnostic embedding generation behind the `EmbeddingProvider`
//! trait.

pub mod provider;
pub mod providers;

pub use provider::{create_provider, EmbeddingProvider};
