//! Core types for chess.
//!
//! This crate provides the fundamental types used across the rules engine:
//! - [`Piece`], [`Color`] and [`ColoredPiece`] for board cell contents
//! - [`Square`] and [`Direction`] for board coordinates and ray vectors
//! - [`Move`] for move representation
//! - [`CastlingRights`] for the four castling flags

mod castling;
mod color;
mod direction;
mod mov;
mod piece;
mod square;

pub use castling::CastlingRights;
pub use color::Color;
pub use direction::Direction;
pub use mov::{Move, MoveFlag};
pub use piece::{ColoredPiece, Piece};
pub use square::{NotationError, Square};
