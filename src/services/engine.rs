use std::time::Duration;

use rand::thread_rng;
use serde_json::Value;
use thiserror::Error;

use crate::core::{
    evaluate_reveal,
    migrate::{self, Loaded},
    GameDocument, Quarter, QuarterScore, QuarterWinner, Reveal, BOARD_SQUARES,
    MAX_SQUARES_PER_PLAYER, PICK_RETRY_ATTEMPTS, PICK_RETRY_BACKOFF_MS, ROSTER,
};
use crate::services::retry::{with_retries, Attempt, RetryError, RetryPolicy};
use crate::store::{GameStore, StoreError};

/// Why an action was not applied
///
/// Conflict and taken rejections carry the current document so the caller
/// can reconcile without a second round trip; exhaustion and faults do not,
/// and the caller must re-fetch.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("State changed, please retry")]
    VersionConflict { current: Box<GameDocument> },
    #[error("Board is locked! No changes allowed.")]
    BoardLocked,
    #[error("Square already taken by {taken_by}!")]
    SquareTaken {
        taken_by: String,
        current: Box<GameDocument>,
    },
    #[error("You have already picked 16 squares!")]
    LimitReached,
    #[error("Failed after multiple retries")]
    RetriesExhausted,
    #[error("Square index {0} is out of range")]
    InvalidSquare(usize),
    #[error("Unknown player: {0}")]
    UnknownPlayer(String),
    #[error("Game has not been initialized")]
    NotInitialized,
    #[error("Stored game state is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Outcome of one optimistic pick attempt
enum PickOutcome {
    Applied(GameDocument),
    Contended,
}

/// Applies named actions to a game document held in a store
///
/// All consistency is enforced here: the store only offers atomic get and
/// atomic set of the whole document, so mutations are version-checked
/// read-modify-write sequences, bounded-retried for the pick path.
#[derive(Debug)]
pub struct GameEngine<S> {
    store: S,
}

impl<S: GameStore> GameEngine<S> {
    /// Create an engine over a store backend
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Create the document if absent, otherwise return it as stored
    ///
    /// A document missing fields from an older schema revision is backfilled
    /// and persisted on the way through. Repeated calls on a current-schema
    /// document are a plain read.
    pub async fn initialize(&self, game_id: &str) -> Result<GameDocument, ActionError> {
        if let Some(doc) = self.load(game_id).await? {
            return Ok(doc);
        }

        let doc = GameDocument::new(game_id);
        self.persist(game_id, &doc).await?;
        tracing::info!("🏈 Created fresh game document for {}", game_id);
        Ok(doc)
    }

    /// Read the current document, if the game exists
    ///
    /// Shares the backfill-on-load normalization with `initialize`.
    pub async fn state(&self, game_id: &str) -> Result<Option<GameDocument>, ActionError> {
        self.load(game_id).await
    }

    /// Claim an unclaimed square for a player, or release one they hold
    ///
    /// Runs the whole read-validate-write sequence under a bounded retry:
    /// each attempt re-reads the document fresh, and a version that moved
    /// between the attempt's read and its write counts as contention. A
    /// caller-supplied `expected_version` that no longer matches is a
    /// conflict returned immediately with the current document.
    ///
    /// After a successful claim the numbers-reveal trigger is evaluated.
    pub async fn pick_square(
        &self,
        game_id: &str,
        square_index: usize,
        player: &str,
        expected_version: Option<u64>,
    ) -> Result<GameDocument, ActionError> {
        if square_index >= BOARD_SQUARES {
            return Err(ActionError::InvalidSquare(square_index));
        }
        if !ROSTER.contains(&player) {
            return Err(ActionError::UnknownPlayer(player.to_string()));
        }

        let policy = RetryPolicy::new(
            PICK_RETRY_ATTEMPTS,
            Duration::from_millis(PICK_RETRY_BACKOFF_MS),
        );

        let result = with_retries(policy, |attempt| {
            self.pick_attempt(game_id, square_index, player, expected_version, attempt)
        })
        .await;

        match result {
            Ok(doc) => Ok(doc),
            Err(RetryError::Exhausted { attempts }) => {
                tracing::warn!(
                    "⚠️ Pick of square {} for {} gave up after {} contended attempts",
                    square_index,
                    player,
                    attempts
                );
                Err(ActionError::RetriesExhausted)
            }
            Err(RetryError::Inner(err)) => Err(err),
        }
    }

    async fn pick_attempt(
        &self,
        game_id: &str,
        square_index: usize,
        player: &str,
        expected_version: Option<u64>,
        attempt: u32,
    ) -> Attempt<GameDocument, ActionError> {
        match self
            .try_pick(game_id, square_index, player, expected_version)
            .await
        {
            Ok(PickOutcome::Applied(doc)) => Attempt::Done(doc),
            Ok(PickOutcome::Contended) => {
                tracing::debug!(
                    "Pick attempt {} for square {} lost a version race, retrying",
                    attempt,
                    square_index
                );
                Attempt::Contended
            }
            Err(err) => Attempt::Failed(err),
        }
    }

    async fn try_pick(
        &self,
        game_id: &str,
        square_index: usize,
        player: &str,
        expected_version: Option<u64>,
    ) -> Result<PickOutcome, ActionError> {
        let mut doc = self
            .load(game_id)
            .await?
            .ok_or(ActionError::NotInitialized)?;

        if let Some(expected) = expected_version {
            if doc.version != expected {
                return Err(ActionError::VersionConflict {
                    current: Box::new(doc),
                });
            }
        }

        if doc.locked {
            return Err(ActionError::BoardLocked);
        }

        match doc.squares[square_index].as_deref() {
            // Clicking your own square releases it
            Some(holder) if holder == player => {
                doc.squares[square_index] = None;
                if let Some(count) = doc.players.get_mut(player) {
                    *count = count.saturating_sub(1);
                }
                doc.touch();
                tracing::info!("🔲 {} released square {}", player, square_index);
            }
            Some(holder) => {
                let taken_by = holder.to_string();
                return Err(ActionError::SquareTaken {
                    taken_by,
                    current: Box::new(doc),
                });
            }
            None => {
                if doc.count_for(player) >= MAX_SQUARES_PER_PLAYER {
                    return Err(ActionError::LimitReached);
                }
                doc.squares[square_index] = Some(player.to_string());
                *doc.players.entry(player.to_string()).or_insert(0) += 1;
                doc.touch();
                tracing::info!("✅ {} claimed square {}", player, square_index);

                match evaluate_reveal(&mut doc, &mut thread_rng()) {
                    Reveal::Early => {
                        tracing::info!(
                            "🎲 Axis numbers revealed early for {} ({} reached {} squares)",
                            game_id,
                            player,
                            doc.count_for(player)
                        );
                    }
                    Reveal::FullBoard => {
                        tracing::info!(
                            "🎲 Axis numbers revealed for {} (board reached {} squares)",
                            game_id,
                            doc.claimed_count()
                        );
                    }
                    Reveal::None => {}
                }
            }
        }

        debug_assert!(doc.counts_match_squares());

        // The version we read this attempt must still be the stored one just
        // before the write; movement means a concurrent writer landed and the
        // attempt must restart from fresh state. The window between this
        // check and the set remains, per the documented residual risk.
        let stored_version = self
            .store
            .get(game_id)
            .await?
            .as_ref()
            .and_then(|raw| raw.get("version"))
            .and_then(Value::as_u64);
        if stored_version != Some(doc.version - 1) {
            return Ok(PickOutcome::Contended);
        }

        self.persist(game_id, &doc).await?;
        Ok(PickOutcome::Applied(doc))
    }

    /// Lock or unlock the board
    ///
    /// No precondition and no version check: whether everyone has filled
    /// their 16 squares is an advisory check for the caller, and concurrent
    /// admin actions are last-write-wins by design.
    pub async fn set_locked(
        &self,
        game_id: &str,
        locked: bool,
    ) -> Result<GameDocument, ActionError> {
        let doc = self
            .mutate(game_id, |doc| {
                doc.locked = locked;
                Ok(())
            })
            .await?;
        tracing::info!(
            "🔒 Board {} is now {}",
            game_id,
            if locked { "locked" } else { "unlocked" }
        );
        Ok(doc)
    }

    /// Enter the score for a quarter; an omitted side clears that side
    pub async fn set_score(
        &self,
        game_id: &str,
        quarter: Quarter,
        patriots: Option<u32>,
        seahawks: Option<u32>,
    ) -> Result<GameDocument, ActionError> {
        self.mutate(game_id, |doc| {
            doc.scores.insert(quarter, QuarterScore { patriots, seahawks });
            Ok(())
        })
        .await
    }

    /// Record a quarter's winning square, overwriting any prior winner
    ///
    /// The winner is whoever currently holds the square; an unclaimed square
    /// records an empty player.
    pub async fn set_winner(
        &self,
        game_id: &str,
        quarter: Quarter,
        square_index: usize,
    ) -> Result<GameDocument, ActionError> {
        if square_index >= BOARD_SQUARES {
            return Err(ActionError::InvalidSquare(square_index));
        }

        let doc = self
            .mutate(game_id, |doc| {
                let player = doc.squares[square_index].clone();
                doc.winners.insert(
                    quarter,
                    Some(QuarterWinner {
                        player,
                        square_index,
                    }),
                );
                Ok(())
            })
            .await?;
        tracing::info!(
            "🏆 {} winner set to square {} for {}",
            quarter.as_str(),
            square_index,
            game_id
        );
        Ok(doc)
    }

    /// Clear a quarter's winner
    pub async fn clear_winner(
        &self,
        game_id: &str,
        quarter: Quarter,
    ) -> Result<GameDocument, ActionError> {
        self.mutate(game_id, |doc| {
            doc.winners.insert(quarter, None);
            Ok(())
        })
        .await
    }

    /// Delete the game document entirely
    ///
    /// Afterward the game behaves as never created: `state` finds nothing and
    /// the next `initialize` starts from defaults at version 1.
    pub async fn reset(&self, game_id: &str) -> Result<(), ActionError> {
        self.store.delete(game_id).await?;
        tracing::info!("🗑️ Game {} reset", game_id);
        Ok(())
    }

    /// Load and migrate the stored document, persisting any backfill once
    async fn load(&self, game_id: &str) -> Result<Option<GameDocument>, ActionError> {
        let Some(raw) = self.store.get(game_id).await? else {
            return Ok(None);
        };

        let Loaded {
            document,
            backfilled,
        } = migrate::load_document(raw)?;

        if backfilled {
            self.persist(game_id, &document).await?;
            tracing::info!("📦 Backfilled legacy fields on game document {}", game_id);
        }

        Ok(Some(document))
    }

    /// Shared load-mutate-touch-persist path for the unversioned admin actions
    async fn mutate<F>(&self, game_id: &str, apply: F) -> Result<GameDocument, ActionError>
    where
        F: FnOnce(&mut GameDocument) -> Result<(), ActionError>,
    {
        let mut doc = self
            .load(game_id)
            .await?
            .ok_or(ActionError::NotInitialized)?;

        apply(&mut doc)?;
        doc.touch();
        self.persist(game_id, &doc).await?;
        Ok(doc)
    }

    async fn persist(&self, game_id: &str, doc: &GameDocument) -> Result<(), ActionError> {
        let raw = serde_json::to_value(doc)?;
        self.store.set(game_id, &raw).await?;
        Ok(())
    }
}
