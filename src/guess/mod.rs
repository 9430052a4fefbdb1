//! Guess-the-emperor trivia game.

pub mod controller;
mod error;
pub mod logic;
pub mod store;
mod types;

pub use controller::{parse_difficulty, GameController};
pub use error::GameError;
pub use store::{MemorySessionStore, SessionStore};
pub use types::*;
