use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::OffsetDateTime;

use super::constants::{BOARD_SQUARES, GRID_WIDTH, ROSTER};

/// Quarter tags used for scores and winners
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Quarter {
    Q1,
    Q2,
    Q3,
    Final,
}

impl Quarter {
    /// All quarters in game order
    pub const ALL: [Quarter; 4] = [Quarter::Q1, Quarter::Q2, Quarter::Q3, Quarter::Final];

    /// Get the string representation of the quarter
    pub fn as_str(&self) -> &'static str {
        match self {
            Quarter::Q1 => "Q1",
            Quarter::Q2 => "Q2",
            Quarter::Q3 => "Q3",
            Quarter::Final => "Final",
        }
    }
}

/// Score for one quarter; either side may still be unentered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarterScore {
    pub patriots: Option<u32>,
    pub seahawks: Option<u32>,
}

/// Winner record for one quarter
///
/// `player` is whoever held the square when the winner was set. It may be
/// empty if the square was still unclaimed at that point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuarterWinner {
    pub player: Option<String>,
    pub square_index: usize,
}

/// The single persisted game document
///
/// Serialized camelCase to stay wire-compatible with documents written by
/// earlier revisions of the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameDocument {
    /// Board identifier; also the store key
    pub game_id: String,
    /// Monotonic counter, +1 per accepted mutation; optimistic-concurrency token
    pub version: u64,
    /// 100 slots in row-major order; `None` = unclaimed
    pub squares: Vec<Option<String>>,
    /// Player name -> claimed-square count
    pub players: BTreeMap<String, u32>,
    /// One-way false -> true transition
    pub numbers_assigned: bool,
    /// Set only when the reveal fired on the player-count threshold
    #[serde(default)]
    pub numbers_revealed_early: bool,
    /// Permutation of 0-9 once assigned, empty before
    pub patriots_numbers: Vec<u8>,
    /// Permutation of 0-9 once assigned, empty before
    pub seahawks_numbers: Vec<u8>,
    /// Quarter -> winner record
    pub winners: BTreeMap<Quarter, Option<QuarterWinner>>,
    /// Quarter -> entered scores
    pub scores: BTreeMap<Quarter, QuarterScore>,
    /// While true, claim/release mutations are rejected
    pub locked: bool,
    /// Timestamp of the last accepted mutation
    #[serde(with = "time::serde::rfc3339")]
    pub last_updated: OffsetDateTime,
}

impl GameDocument {
    /// Create a fresh document with every field at its default
    ///
    /// # Arguments
    ///
    /// * `game_id` - Board identifier the document is stored under
    pub fn new(game_id: impl Into<String>) -> Self {
        Self {
            game_id: game_id.into(),
            version: 1,
            squares: vec![None; BOARD_SQUARES],
            players: ROSTER.iter().map(|p| (p.to_string(), 0)).collect(),
            numbers_assigned: false,
            numbers_revealed_early: false,
            patriots_numbers: Vec::new(),
            seahawks_numbers: Vec::new(),
            winners: Quarter::ALL.iter().map(|&q| (q, None)).collect(),
            scores: Quarter::ALL
                .iter()
                .map(|&q| (q, QuarterScore::default()))
                .collect(),
            locked: false,
            last_updated: OffsetDateTime::now_utc(),
        }
    }

    /// Number of claimed squares on the board
    pub fn claimed_count(&self) -> usize {
        self.squares.iter().filter(|s| s.is_some()).count()
    }

    /// Claimed-square count for a player (0 if unknown)
    pub fn count_for(&self, player: &str) -> u32 {
        self.players.get(player).copied().unwrap_or(0)
    }

    /// Record an accepted mutation: bump the version, refresh the timestamp
    pub fn touch(&mut self) {
        self.version += 1;
        self.last_updated = OffsetDateTime::now_utc();
    }

    /// Check the count invariant: `players[p]` equals the number of squares
    /// held by `p`, and every square holder has a count entry.
    pub fn counts_match_squares(&self) -> bool {
        let tally = |name: &str| {
            self.squares
                .iter()
                .filter(|s| s.as_deref() == Some(name))
                .count() as u32
        };
        self.players.iter().all(|(name, &count)| tally(name) == count)
            && self
                .squares
                .iter()
                .flatten()
                .all(|name| self.players.contains_key(name.as_str()))
    }
}

/// Map a square index to its (row, column) position on the grid
pub fn square_position(index: usize) -> (usize, usize) {
    (index / GRID_WIDTH, index % GRID_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fresh_document_defaults() {
        let doc = GameDocument::new("superbowl2026");

        assert_eq!(doc.game_id, "superbowl2026");
        assert_eq!(doc.version, 1);
        assert_eq!(doc.squares.len(), 100);
        assert!(doc.squares.iter().all(|s| s.is_none()));
        assert_eq!(doc.players.len(), ROSTER.len());
        assert!(doc.players.values().all(|&c| c == 0));
        assert!(!doc.numbers_assigned);
        assert!(!doc.numbers_revealed_early);
        assert!(doc.patriots_numbers.is_empty());
        assert!(doc.seahawks_numbers.is_empty());
        assert!(doc.winners.values().all(|w| w.is_none()));
        assert_eq!(doc.scores.len(), 4);
        assert!(doc
            .scores
            .values()
            .all(|s| s.patriots.is_none() && s.seahawks.is_none()));
        assert!(!doc.locked);
        assert!(doc.counts_match_squares());
    }

    #[test]
    fn test_touch_bumps_version_by_one() {
        let mut doc = GameDocument::new("g");
        let before = doc.last_updated;

        doc.touch();

        assert_eq!(doc.version, 2);
        assert!(doc.last_updated >= before);
    }

    #[test]
    fn test_counts_match_squares_detects_drift() {
        let mut doc = GameDocument::new("g");

        doc.squares[3] = Some("Jim".to_string());
        assert!(!doc.counts_match_squares());

        doc.players.insert("Jim".to_string(), 1);
        assert!(doc.counts_match_squares());
    }

    #[test]
    fn test_square_position_is_row_major() {
        assert_eq!(square_position(0), (0, 0));
        assert_eq!(square_position(9), (0, 9));
        assert_eq!(square_position(10), (1, 0));
        assert_eq!(square_position(57), (5, 7));
        assert_eq!(square_position(99), (9, 9));
    }

    #[test]
    fn test_serializes_camel_case_wire_fields() {
        let doc = GameDocument::new("superbowl2026");
        let value = serde_json::to_value(&doc).unwrap();

        assert_eq!(value["gameId"], "superbowl2026");
        assert_eq!(value["numbersAssigned"], json!(false));
        assert!(value["patriotsNumbers"].as_array().unwrap().is_empty());
        assert!(value["seahawksNumbers"].as_array().unwrap().is_empty());
        assert!(value["lastUpdated"].is_string());
        assert!(value["winners"].get("Q1").is_some());
        assert!(value["winners"].get("Final").is_some());
        assert_eq!(value["scores"]["Q3"]["patriots"], json!(null));
    }

    #[test]
    fn test_document_round_trips_through_json() {
        let mut doc = GameDocument::new("g");
        doc.squares[7] = Some("Jim".to_string());
        doc.players.insert("Jim".to_string(), 1);
        doc.winners.insert(
            Quarter::Q2,
            Some(QuarterWinner {
                player: Some("Jim".to_string()),
                square_index: 7,
            }),
        );
        doc.scores.insert(
            Quarter::Q2,
            QuarterScore {
                patriots: Some(14),
                seahawks: Some(10),
            },
        );

        let value = serde_json::to_value(&doc).unwrap();
        let back: GameDocument = serde_json::from_value(value).unwrap();

        assert_eq!(back, doc);
    }

    #[test]
    fn test_winner_serializes_square_index_camel_case() {
        let winner = QuarterWinner {
            player: None,
            square_index: 42,
        };

        let value = serde_json::to_value(&winner).unwrap();

        assert_eq!(value["squareIndex"], json!(42));
        assert_eq!(value["player"], json!(null));
    }
}
