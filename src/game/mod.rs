//! Core Connect Four rules: board, players, and the mutable game state the
//! search explores by cloning.

mod board;
mod player;
mod state;

pub use board::{Board, Cell, COLS, ROWS};
pub use player::Player;
pub use state::{GameState, Outcome};
