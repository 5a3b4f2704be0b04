pub mod actions;
pub mod health;

pub use actions::game_action;
pub use health::health_check;
