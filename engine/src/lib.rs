pub mod config;
pub mod logger;
pub mod rng;
pub mod tictactoe;

pub use rng::{RandomSource, SessionRng};
pub use tictactoe::*;
