use std::future::Future;

use serde_json::Value;
use thiserror::Error;

pub mod memory;

pub use memory::MemoryStore;

/// Errors surfaced by a store backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Generic async key-value persistence for game documents
///
/// One whole document per game id, stored as raw JSON so records written by
/// older schema revisions can be migrated above this layer. The store offers
/// atomic get and atomic set of the whole document only, no compare-and-swap;
/// consistency is enforced by the engine via the document's version field.
pub trait GameStore: Send + Sync {
    /// Fetch the raw document for a game id, if one exists
    fn get(
        &self,
        game_id: &str,
    ) -> impl Future<Output = Result<Option<Value>, StoreError>> + Send;

    /// Replace the document stored under a game id
    fn set(
        &self,
        game_id: &str,
        document: &Value,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Remove the document stored under a game id, if any
    fn delete(&self, game_id: &str) -> impl Future<Output = Result<(), StoreError>> + Send;
}
