use rand::seq::SliceRandom;
use rand::Rng;

use super::constants::{EARLY_REVEAL_THRESHOLD, REVEAL_FILL_TARGET};
use super::document::GameDocument;

/// How a reveal-trigger evaluation resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reveal {
    /// Numbers stay hidden
    None,
    /// A player crossed the square-count threshold mid-game
    Early,
    /// The board reached the fill target
    FullBoard,
}

/// Draw an unbiased random permutation of the digits 0-9
pub fn shuffled_digits<R: Rng>(rng: &mut R) -> Vec<u8> {
    let mut digits: Vec<u8> = (0..10).collect();
    digits.shuffle(rng);
    digits
}

/// Evaluate the numbers-reveal trigger after a successful claim
///
/// Checked only while numbers are unassigned. The player-count threshold is
/// evaluated first and short-circuits the fill check, so at most one rule
/// fires per evaluation. Both axis permutations are drawn independently.
/// Once `numbers_assigned` is set it never reverts.
///
/// # Returns
///
/// Which rule fired, if any
pub fn evaluate_reveal<R: Rng>(doc: &mut GameDocument, rng: &mut R) -> Reveal {
    if doc.numbers_assigned {
        return Reveal::None;
    }

    if doc
        .players
        .values()
        .any(|&count| count >= EARLY_REVEAL_THRESHOLD)
    {
        assign_numbers(doc, rng);
        doc.numbers_revealed_early = true;
        return Reveal::Early;
    }

    if doc.claimed_count() == REVEAL_FILL_TARGET {
        assign_numbers(doc, rng);
        return Reveal::FullBoard;
    }

    Reveal::None
}

fn assign_numbers<R: Rng>(doc: &mut GameDocument, rng: &mut R) {
    doc.patriots_numbers = shuffled_digits(rng);
    doc.seahawks_numbers = shuffled_digits(rng);
    doc.numbers_assigned = true;
}
