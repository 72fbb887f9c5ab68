//! Remote API abstraction.
//!
//! This module provides:
//! - `Backend` trait for the collection endpoints the console talks to
//! - `http` submodule with the reqwest implementation
//!
//! The trait works on raw JSON documents; typing and `_id` normalization
//! happen in the controller via serde.

pub mod http;

use serde_json::Value;

use crate::error::ApiError;

/// Trait for the remote collection API.
#[allow(async_fn_in_trait)]
pub trait Backend {
    /// Read the full remote collection.
    async fn list(&self, collection: &str) -> Result<Vec<Value>, ApiError>;

    /// Create an entity. The server assigns the identifier and returns the
    /// canonical document.
    async fn create(&self, collection: &str, body: &Value) -> Result<Value, ApiError>;

    /// Update the entity keyed by `id` and return the canonical document.
    async fn update(&self, collection: &str, id: &str, body: &Value) -> Result<Value, ApiError>;

    /// Delete the entity keyed by `id`.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), ApiError>;
}
