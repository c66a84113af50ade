//! Constants for board defaults, heuristic weights, and search limits.
//!
//! This module contains the tuning knobs of the engine. Runtime overrides live in
//! [`crate::config::EngineConfig`], whose defaults are taken from here.

// =============================================================================
// Board Defaults
// =============================================================================

/// Default number of box rows (a 3x3 box board is drawn on 4x4 dots).
pub const DEFAULT_ROWS: usize = 3;

/// Default number of box columns.
pub const DEFAULT_COLS: usize = 3;

/// Number of edges around every box.
pub const BOX_SIDES: u8 = 4;

// =============================================================================
// Component Values
// =============================================================================

/// Opening-cost baseline for a chain in the length-based solver (value is `4 - L`).
pub const CHAIN_BASE_VALUE: i32 = 4;

/// Value of any loop in the length-based solver.
pub const LOOP_VALUE: i32 = -1;

/// Shortest chain for which the opponent may decline the last two boxes.
pub const CHAIN_CONTROL_THRESHOLD: usize = 4;

/// Shortest loop for which the opponent may decline the last four boxes.
pub const LOOP_CONTROL_THRESHOLD: usize = 6;

/// Boxes given back when keeping control of a chain (two handed over, two declined).
pub const CHAIN_KEEP_COST: i32 = 4;

/// Boxes given back when keeping control of a loop (four handed over, four declined).
pub const LOOP_KEEP_COST: i32 = 8;

// =============================================================================
// Heuristic Weights
// =============================================================================

/// Bonus for a safe edge on the board perimeter.
pub const BORDER_BONUS: i32 = 3;

// =============================================================================
// Strategy Parameters
// =============================================================================

/// Probability that the Easy tier plays a uniformly random free edge.
pub const BLUNDER_PROB: f64 = 0.25;

/// Medium tier picks uniformly among this many best-ranked safe edges.
pub const MEDIUM_TOP_K: usize = 3;

/// Maximum number of closers the Expert tier compares.
pub const EXPERT_CLOSER_CAP: usize = 8;

/// Maximum number of safe edges the Expert tier searches.
pub const EXPERT_SAFE_CAP: usize = 6;

/// Maximum number of opponent replies examined per safe edge.
pub const EXPERT_REPLY_CAP: usize = 6;

/// Sacrifice search only runs once this few safe edges (or fewer) remain.
pub const SACRIFICE_SAFE_LIMIT: usize = 4;

/// A sacrifice must beat the best safe edge by at least this much.
pub const SACRIFICE_MARGIN: i32 = 2;

// =============================================================================
// Pacing
// =============================================================================

/// Default number of search nodes between calls to the host yield hook.
pub const YIELD_INTERVAL: u64 = 256;
