//! # Topologic - Variable-Topology Four-in-a-Row Engine
//!
//! A board-game engine for four-in-a-row on a variable topology: each game
//! is played on a sub-region ("mask") of a fixed N×N grid, generated by a
//! selectable archetype and validated to admit enough potential winning
//! lines to be competitive.
//!
//! ## Architecture
//! - [`mask`] - the playability mask and the potential-path validator
//! - [`archetype`] - the fixed catalog of mask generators, including the
//!   rejection-sampled procedural layout
//! - [`board`] - the mark grid over a mask, with direction-generic win
//!   detection through the last placed cell
//! - [`game_controller`] - the authoritative state machine; validates
//!   moves, tracks the turn and terminal state, returns value snapshots
//! - [`ai`] - the greedy heuristic move selector for the opponent
//! - [`worker`] - the deferred "thinking" worker and the [`Engine`] facade
//!   that wires human moves to scheduled opponent replies
//!
//! ## Quick start
//! ```rust,ignore
//! use topologic::{Archetype, Engine};
//!
//! let engine = Engine::new(Archetype::FractalRandom, 12);
//! let snapshot = engine.apply_move(5, 5);
//! println!("paths validated: {}", snapshot.potential_paths);
//! ```
//!
//! The engine is a pure in-process library boundary: it consumes move and
//! reset requests and exposes grid, mask, turn, and win state for any
//! renderer or controller to display.

pub mod ai;
pub mod archetype;
pub mod board;
pub mod game_controller;
pub mod mask;
pub mod worker;

pub use ai::select_move;
pub use archetype::Archetype;
pub use board::{Board, Player, WinningLine};
pub use game_controller::{
    GameController, GameSnapshot, GameStatus, MoveHistoryEntry, MoveRejection, MoveResult,
};
pub use mask::Mask;
pub use worker::{AiWorker, Engine};
