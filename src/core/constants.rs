/// Fixed roster of people sharing the board. Identity is self-declared;
/// any pick naming someone outside this set is rejected.
pub const ROSTER: [&str; 6] = ["Joshua", "AJ", "Sharon", "Jim", "Patia", "Kim"];

/// Total squares on the board
pub const BOARD_SQUARES: usize = 100;

/// Squares per row; index `i` maps to row `i / GRID_WIDTH`, column `i % GRID_WIDTH`
pub const GRID_WIDTH: usize = 10;

/// Maximum squares any one player may hold
pub const MAX_SQUARES_PER_PLAYER: u32 = 16;

/// A player reaching this many squares triggers the early numbers reveal
pub const EARLY_REVEAL_THRESHOLD: u32 = 11;

/// Claimed-square count at which the numbers are revealed on a filling board
pub const REVEAL_FILL_TARGET: usize = 96;

/// Board id served when no GAME_ID environment override is present
pub const DEFAULT_GAME_ID: &str = "superbowl2026";

/// Attempts the pick path makes before giving up on a contended write
pub const PICK_RETRY_ATTEMPTS: u32 = 3;

/// Pause between contended pick attempts, in milliseconds
pub const PICK_RETRY_BACKOFF_MS: u64 = 25;
