pub mod constants;
pub mod document;
pub mod migrate;
pub mod numbers;

pub use constants::*;
pub use document::{square_position, GameDocument, Quarter, QuarterScore, QuarterWinner};
pub use numbers::{evaluate_reveal, shuffled_digits, Reveal};
