//! Ephemeral tic-tac-toe: board state, line analysis, and transition model.

pub mod board;
pub mod engine;
pub mod lines;

pub use board::{Board, Cell, Player, Snapshot};
pub use engine::EphemeralGame;
pub use lines::LineScanner;
