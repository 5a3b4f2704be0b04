pub mod engine;
pub mod retry;

pub use engine::{ActionError, GameEngine};
pub use retry::{with_retries, Attempt, RetryError, RetryPolicy};
