#![warn(clippy::all, missing_docs)]

//! Core domain logic for the pegsol peg solitaire game.
//!
//! This crate hosts the board model, the jump engine, the game state
//! machine and its session controller, plus configuration and save-file
//! persistence used by the terminal UI and any future frontends.

pub mod board;
pub mod config;
pub mod engine;
pub mod error;
pub mod game;
pub mod layout;
pub mod save;
pub mod session;

pub use board::{Board, Cell, Coord, Direction};
pub use crate::config::AppConfig;
pub use error::{BoardError, GameError, LayoutError};
pub use game::{Action, GameSession, Outcome, Phase, ScoreCategory, Transition};
pub use layout::Layout;
pub use save::{FileStore, SaveManager};
pub use session::{BoardStore, MemoryStore, Notice, SessionController, Step};
