//! Difficulty tiers and the engine entry point.
//!
//! Each tier is a function of the board (plus the engine's random source) that
//! returns an edge to draw. [`Engine`] picks the tier and is what callers hold on to.
//!
//! ## Example
//!
//! ```
//! use boxes_rust::board::Board;
//! use boxes_rust::strategy::Engine;
//!
//! let mut board = Board::new(3, 3).unwrap();
//! let mut engine = Engine::with_seed(42);
//! engine.set_difficulty("hard");
//!
//! let edge = engine.choose_move(&mut board).unwrap();
//! board.play(edge).unwrap();
//! ```

use log::info;

use crate::berlekamp::berlekamp_move;
use crate::board::{Board, EdgeId};
use crate::classify::{EdgeSnapshot, classify};
use crate::config::{Difficulty, EngineConfig};
use crate::expert::{best_closer, best_safe_or_sacrifice};
use crate::heuristics::{best_safe_edge, rank_safe_edges};
use crate::negamax::negamax_move;
use crate::pacing::Pacer;

fn pick(edges: &[EdgeId], rng: &mut fastrand::Rng) -> Option<EdgeId> {
    (!edges.is_empty()).then(|| edges[rng.usize(..edges.len())])
}

/// Blunder sometimes, otherwise grab any box, otherwise play any safe edge.
pub fn easy_move(snap: &EdgeSnapshot, rng: &mut fastrand::Rng, config: &EngineConfig) -> Option<EdgeId> {
    if rng.f64() < config.blunder_prob {
        return pick(&snap.free, rng);
    }
    pick(&snap.closers, rng)
        .or_else(|| pick(&snap.safes, rng))
        .or_else(|| pick(&snap.free, rng))
}

/// First closer, then one of the top-ranked safe edges, then the length-based solver.
pub fn medium_move(
    board: &Board,
    snap: &EdgeSnapshot,
    rng: &mut fastrand::Rng,
    config: &EngineConfig,
    pacer: &mut Pacer,
) -> Option<EdgeId> {
    if let Some(&e) = snap.closers.first() {
        return Some(e);
    }
    if !snap.safes.is_empty() {
        let ranked = rank_safe_edges(board, &snap.safes);
        let k = config.medium_top_k.clamp(1, ranked.len());
        return pick(&ranked[..k], rng);
    }
    negamax_move(board, rng, pacer)
}

/// First closer, then the one-ply safe-edge lookahead, then the length-based solver.
pub fn hard_move(
    board: &mut Board,
    snap: &EdgeSnapshot,
    rng: &mut fastrand::Rng,
    pacer: &mut Pacer,
) -> Option<EdgeId> {
    if let Some(&e) = snap.closers.first() {
        return Some(e);
    }
    best_safe_edge(board, &snap.safes).or_else(|| negamax_move(board, rng, pacer))
}

/// Searched closers, then the two-ply safe search with sacrifices, then the exact solver.
pub fn expert_move(
    board: &mut Board,
    snap: &EdgeSnapshot,
    rng: &mut fastrand::Rng,
    config: &EngineConfig,
    pacer: &mut Pacer,
) -> Option<EdgeId> {
    if let Some(e) = best_closer(board, &snap.closers, config, pacer) {
        return Some(e);
    }
    if let Some(e) = best_safe_or_sacrifice(board, &snap.safes, config, pacer) {
        return Some(e);
    }
    berlekamp_move(board, rng, pacer)
}

/// Move-selection engine.
pub struct Engine {
    config: EngineConfig,
    rng: fastrand::Rng,
    pacer: Pacer,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Engine at the default tier with an entropy-seeded random source.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default(), fastrand::Rng::new())
    }

    /// Engine with a reproducible random source.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_config(EngineConfig::default(), fastrand::Rng::with_seed(seed))
    }

    pub fn with_config(config: EngineConfig, rng: fastrand::Rng) -> Self {
        Self {
            config,
            rng,
            pacer: Pacer::new(),
        }
    }

    /// Set the tier by name. Unknown names select the default tier.
    pub fn set_difficulty(&mut self, name: &str) -> Difficulty {
        self.config.difficulty = Difficulty::from_name(name);
        self.config.difficulty
    }

    pub fn difficulty(&self) -> Difficulty {
        self.config.difficulty
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Call `hook` every `yield_interval` search nodes, e.g. to keep a UI responsive.
    pub fn set_yield_hook(&mut self, hook: impl FnMut() + 'static) {
        self.pacer = Pacer::with_hook(self.config.yield_interval, hook);
    }

    /// Choose an edge for the player to move, or `None` if every edge is drawn.
    ///
    /// The board may be modified during the search but is restored before returning.
    pub fn choose_move(&mut self, board: &mut Board) -> Option<EdgeId> {
        let snap = classify(board);
        if snap.is_empty() {
            return None;
        }

        self.pacer.reset();
        let difficulty = self.config.difficulty;
        let edge = match difficulty {
            Difficulty::Easy => easy_move(&snap, &mut self.rng, &self.config),
            Difficulty::Medium => {
                medium_move(board, &snap, &mut self.rng, &self.config, &mut self.pacer)
            }
            Difficulty::Hard => hard_move(board, &snap, &mut self.rng, &mut self.pacer),
            Difficulty::Expert => {
                expert_move(board, &snap, &mut self.rng, &self.config, &mut self.pacer)
            }
        };

        if let Some(e) = edge {
            info!(
                "{difficulty}: {} for {} ({} free, {} closers, {} safe, {} nodes)",
                board.edge_name(e),
                board.current_player(),
                snap.free.len(),
                snap.closers.len(),
                snap.safes.len(),
                self.pacer.nodes()
            );
        }
        edge
    }
}
