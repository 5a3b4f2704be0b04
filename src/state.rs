use std::sync::Arc;

use crate::services::GameEngine;
use crate::store::MemoryStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<GameEngine<MemoryStore>>,
    /// Board id this instance serves; every engine call is keyed by it
    pub game_id: String,
}

impl AppState {
    pub fn new(game_id: String) -> Self {
        Self {
            engine: Arc::new(GameEngine::new(MemoryStore::new())),
            game_id,
        }
    }
}
