use serde::Deserialize;

use crate::core::Quarter;

/// A client action against the board
///
/// The wire format is a JSON object tagged by its `action` field, with
/// camelCase payload fields alongside the tag. Anything that does not parse
/// as one of these is an invalid request.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action")]
pub enum ActionRequest {
    /// Create the document if absent; otherwise a read
    #[serde(rename = "init")]
    Init,
    /// Read-only fetch of the current document
    #[serde(rename = "getState")]
    GetState,
    /// Claim or release a square
    #[serde(rename = "pickSquare", rename_all = "camelCase")]
    PickSquare {
        square_index: usize,
        player: String,
        /// Version the client last saw; a mismatch is a conflict
        #[serde(default)]
        expected_version: Option<u64>,
    },
    /// Stop further claims and releases
    #[serde(rename = "lockBoard")]
    LockBoard,
    /// Allow claims and releases again
    #[serde(rename = "unlockBoard")]
    UnlockBoard,
    /// Enter a quarter's score; an omitted side is cleared
    #[serde(rename = "setScore")]
    SetScore {
        quarter: Quarter,
        #[serde(default)]
        patriots: Option<u32>,
        #[serde(default)]
        seahawks: Option<u32>,
    },
    /// Record a quarter's winning square
    #[serde(rename = "setWinner", rename_all = "camelCase")]
    SetWinner { quarter: Quarter, square_index: usize },
    /// Clear a quarter's winner
    #[serde(rename = "clearWinner")]
    ClearWinner { quarter: Quarter },
    /// Delete the game entirely
    #[serde(rename = "reset")]
    Reset,
}
