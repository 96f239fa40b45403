//! Chess rules engine on a mailbox board.
//!
//! This crate provides:
//! - [`Board`] - 8×8 grid of optional pieces, row 0 being Black's back rank
//! - [`analysis`] - check and pin detection from the king's square
//! - [`MoveGenerator`] - legal move generation under checks and pins,
//!   including castling, en passant and promotion
//! - [`GameState`] - make/undo with exact restoration, checkmate and stalemate
//! - [`chooser`] - opponent move selection on a background worker
//!
//! # Example
//!
//! ```
//! use chess_engine::GameState;
//!
//! let mut game = GameState::new();
//! assert_eq!(game.get_valid_moves().len(), 20);
//!
//! game.make_move_notation("e2e4").unwrap();
//! game.make_move_notation("e7e5").unwrap();
//! game.undo_move();
//! assert_eq!(game.move_log().len(), 1);
//! ```

pub mod analysis;
mod board;
pub mod chooser;
mod game;
pub mod movegen;

pub use analysis::{analyze, Analysis};
pub use board::{Board, DiagramError};
pub use chooser::{
    random_move, Abstain, ChooserError, MoveChooser, RandomChooser, SearchWorker, WorkerPoll,
};
pub use game::{GameError, GameState, GameStatus};
pub use movegen::perft::{perft, perft_divide};
pub use movegen::{MoveGenerator, MoveList};
