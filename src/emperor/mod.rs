//! Emperor records: the shared data model for the catalog and the guessing game.

pub mod cell;
pub mod era;
mod types;

pub use era::{era_index, era_sort_key, ERA_ORDER};
pub use types::*;
