//! Emperor Rank - ranking catalog and guess-the-emperor game
//!
//! This module exposes the catalog, the game engine and the HTTP layer for
//! testing and for the binary.

pub mod build_info;
pub mod catalog;
pub mod constants;
pub mod emperor;
pub mod guess;
pub mod web;
