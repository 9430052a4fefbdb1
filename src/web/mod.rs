//! HTTP boundary for the catalog and the guessing game.
//!
//! ## Usage
//!
//! ```sh
//! emperor-rank --data data/emperors.json serve --port 5000
//! ```
//!
//! Game state is keyed by the `sid` cookie issued on the first request.

pub mod http;
pub mod routes;
mod server;

pub use routes::{handle, AppState};
pub use server::{dispatch, start_web_server};
