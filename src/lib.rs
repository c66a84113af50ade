//! Boxes-Rust: a Dots and Boxes move-selection engine.
//!
//! The engine classifies the free edges of a position, decomposes the board into
//! chains and loops, ranks safe moves heuristically, and solves the endgame either
//! with a length-based negamax or with an exact controlled-value solver that
//! understands double-dealing.
//!
//! ## Modules
//!
//! - [`board`] - Dots, edges, boxes, move execution with undo tokens
//! - [`classify`] - Closers and safe edges
//! - [`components`] - Hot and cold chain/loop detection
//! - [`heuristics`] - Safe-edge scoring and one-ply lookahead
//! - [`negamax`] - Length-based endgame solver
//! - [`berlekamp`] - Exact controlled-value endgame solver
//! - [`expert`] - Shallow minimax with sacrifice search
//! - [`strategy`] - Difficulty tiers and the [`strategy::Engine`]
//! - [`config`] - Difficulty names and engine parameters
//! - [`constants`] - Default values and weights
//! - [`pacing`] - Cooperative yield hook for long searches
//! - [`selfplay`] - Engine-vs-engine games
//! - [`shell`] - Text protocol front end
//!
//! ## Example
//!
//! ```
//! use boxes_rust::board::Board;
//! use boxes_rust::strategy::Engine;
//!
//! let mut board = Board::new(3, 3).unwrap();
//! let mut engine = Engine::with_seed(7);
//! engine.set_difficulty("expert");
//!
//! while let Some(edge) = engine.choose_move(&mut board) {
//!     board.play(edge).unwrap();
//! }
//! assert!(board.is_over());
//! assert_eq!(board.scores().iter().sum::<u32>(), 9);
//! ```

pub mod berlekamp;
pub mod board;
pub mod classify;
pub mod components;
pub mod config;
pub mod constants;
pub mod expert;
pub mod heuristics;
pub mod negamax;
pub mod pacing;
pub mod selfplay;
pub mod shell;
pub mod strategy;
