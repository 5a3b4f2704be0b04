//! Concurrency tests for the shared board
//!
//! The store offers no compare-and-swap, so racing clients are reconciled at
//! the application layer via the document version. These tests race real
//! engine calls and assert the invariants that must hold no matter how the
//! races interleave: one owner per square, counts matching squares, and a
//! version that only ever moves forward.

use std::sync::Arc;

use squarepool::{
    core::Quarter,
    services::{ActionError, GameEngine},
    store::MemoryStore,
};

const GAME: &str = "superbowl2026";

fn engine() -> Arc<GameEngine<MemoryStore>> {
    Arc::new(GameEngine::new(MemoryStore::new()))
}

#[tokio::test]
async fn test_racing_claims_leave_one_owner_and_consistent_counts() {
    let engine = engine();
    engine.initialize(GAME).await.unwrap();

    let players = ["Joshua", "AJ", "Sharon", "Jim", "Patia", "Kim"];
    let mut handles = Vec::new();
    for player in players {
        let engine = Arc::clone(&engine);
        handles.push(tokio::spawn(async move {
            engine.pick_square(GAME, 0, player, None).await
        }));
    }

    let mut accepted = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => accepted += 1,
            Err(ActionError::SquareTaken { .. }) => {}
            Err(other) => panic!("unexpected rejection: {:?}", other),
        }
    }

    let doc = engine.state(GAME).await.unwrap().unwrap();
    assert!(accepted >= 1);
    assert!(doc.squares[0].is_some());
    assert!(players.contains(&doc.squares[0].as_deref().unwrap()));
    assert!(doc.counts_match_squares());
}

#[tokio::test]
async fn test_racing_claims_across_distinct_squares_all_land() {
    let engine = engine();
    engine.initialize(GAME).await.unwrap();

    let mut handles = Vec::new();
    for (i, player) in ["Joshua", "AJ", "Sharon", "Jim", "Patia", "Kim"]
        .into_iter()
        .enumerate()
    {
        let engine = Arc::clone(&engine);
        handles.push(tokio::spawn(async move {
            engine.pick_square(GAME, i * 10, player, None).await
        }));
    }

    let mut exhausted = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => {}
            // A pick can still give up under heavy interleaving; what it may
            // not do is land partially
            Err(ActionError::RetriesExhausted) => exhausted += 1,
            Err(other) => panic!("unexpected rejection: {:?}", other),
        }
    }

    let doc = engine.state(GAME).await.unwrap().unwrap();
    assert!(doc.counts_match_squares());
    assert_eq!(doc.claimed_count(), 6 - exhausted);
    assert_eq!(doc.version, 1 + (6 - exhausted) as u64);
}

#[tokio::test]
async fn test_concurrent_admin_actions_keep_the_document_whole() {
    let engine = engine();
    engine.initialize(GAME).await.unwrap();

    let lock = {
        let engine = Arc::clone(&engine);
        tokio::spawn(async move { engine.set_locked(GAME, true).await })
    };
    let score = {
        let engine = Arc::clone(&engine);
        tokio::spawn(
            async move { engine.set_score(GAME, Quarter::Q1, Some(7), Some(0)).await },
        )
    };

    lock.await.unwrap().unwrap();
    score.await.unwrap().unwrap();

    // Admin writes are last-write-wins by design; whichever landed last, the
    // stored document is still a complete, parseable current-schema record
    let doc = engine.state(GAME).await.unwrap().unwrap();
    assert!(doc.version >= 2);
    assert!(doc.counts_match_squares());
}
