use std::collections::HashMap;

use serde_json::Value;
use tokio::sync::RwLock;

use super::{GameStore, StoreError};

/// In-process store holding documents in a shared map
///
/// Suits a single-instance deployment; a Redis-style backend would implement
/// the same trait for anything multi-instance.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RwLock<HashMap<String, Value>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl GameStore for MemoryStore {
    async fn get(&self, game_id: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.documents.read().await.get(game_id).cloned())
    }

    async fn set(&self, game_id: &str, document: &Value) -> Result<(), StoreError> {
        self.documents
            .write()
            .await
            .insert(game_id.to_string(), document.clone());
        Ok(())
    }

    async fn delete(&self, game_id: &str) -> Result<(), StoreError> {
        self.documents.write().await.remove(game_id);
        Ok(())
    }
}
