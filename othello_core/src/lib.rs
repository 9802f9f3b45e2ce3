//! Othello move selection: an 8×8 board with its rules, and an alpha-beta
//! search engine that picks a move for one fixed color under a depth and
//! wall-clock budget.

pub mod engine;
pub mod logic;

pub use engine::{Move, Position, SearchResult};
pub use logic::board::{Board, Color};
