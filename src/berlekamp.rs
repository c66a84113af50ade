//! Exact controlled-value endgame solver.
//!
//! The endgame is a sum of chains and loops. The player to move must open one of
//! them. The opponent then either takes every box and moves next, or double-deals:
//! takes all but the last two boxes of a chain (four of a loop), hands those back,
//! and forces the opener to move again. That keep option only exists for chains of
//! at least four boxes and loops of at least six.
//!
//! For a component of length `L` and `next` = value of the remaining position for
//! the opener:
//!
//! | kind  | open         | keep (if long enough) |
//! |-------|--------------|-----------------------|
//! | chain | `-L - next`  | `-(L - 4) + next`     |
//! | loop  | `-L - next`  | `-(L - 8) + next`     |
//!
//! The opponent picks the worse of the two for the opener; the opener picks the
//! component with the best result. Positions are [`ComponentState`] multisets, so
//! permutations of equal components share one memo entry.

use std::collections::BTreeMap;

use log::debug;
use rustc_hash::FxHashMap;

use crate::board::{Board, EdgeId};
use crate::components::Component;
use crate::constants::{
    CHAIN_CONTROL_THRESHOLD, CHAIN_KEEP_COST, LOOP_CONTROL_THRESHOLD, LOOP_KEEP_COST,
};
use crate::negamax::{endgame_components, negamax_move};
use crate::pacing::Pacer;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Kind {
    Chain,
    Loop,
}

impl Kind {
    pub fn of(c: &Component) -> Self {
        if c.is_loop { Kind::Loop } else { Kind::Chain }
    }
}

/// Multiset of chain lengths and loop lengths.
///
/// Never mutated in place: [`ComponentState::remove_one`] returns a new state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ComponentState {
    chains: BTreeMap<usize, u32>,
    loops: BTreeMap<usize, u32>,
}

impl ComponentState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_components(components: &[Component]) -> Self {
        components
            .iter()
            .fold(Self::new(), |s, c| s.with(Kind::of(c), c.length))
    }

    /// A copy of this state with one more component of `kind` and `len`.
    pub fn with(mut self, kind: Kind, len: usize) -> Self {
        *self.bucket_mut(kind).entry(len).or_insert(0) += 1;
        self
    }

    /// A copy of this state with one component of `kind` and `len` removed, if present.
    pub fn remove_one(&self, kind: Kind, len: usize) -> Option<Self> {
        if self.count(kind, len) == 0 {
            return None;
        }
        let mut next = self.clone();
        let bucket = next.bucket_mut(kind);
        match bucket.get_mut(&len) {
            Some(n) if *n > 1 => *n -= 1,
            _ => {
                bucket.remove(&len);
            }
        }
        Some(next)
    }

    pub fn count(&self, kind: Kind, len: usize) -> u32 {
        self.bucket(kind).get(&len).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty() && self.loops.is_empty()
    }

    /// Total number of boxes across all components.
    pub fn boxes(&self) -> usize {
        self.chains
            .iter()
            .chain(&self.loops)
            .map(|(&len, &n)| len * n as usize)
            .sum()
    }

    /// Distinct `(kind, length)` pairs present, chains first, shortest first.
    pub fn kinds(&self) -> Vec<(Kind, usize)> {
        let chains = self.chains.keys().map(|&l| (Kind::Chain, l));
        let loops = self.loops.keys().map(|&l| (Kind::Loop, l));
        chains.chain(loops).collect()
    }

    fn bucket(&self, kind: Kind) -> &BTreeMap<usize, u32> {
        match kind {
            Kind::Chain => &self.chains,
            Kind::Loop => &self.loops,
        }
    }

    fn bucket_mut(&mut self, kind: Kind) -> &mut BTreeMap<usize, u32> {
        match kind {
            Kind::Chain => &mut self.chains,
            Kind::Loop => &mut self.loops,
        }
    }
}

/// Memo table for one top-level solve.
pub type Memo = FxHashMap<ComponentState, i32>;

/// The opener's two possible outcomes for one component.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BranchOptions {
    /// Opponent takes every box
    pub open: i32,
    /// Opponent double-deals to keep control
    pub keep: Option<i32>,
}

impl BranchOptions {
    /// The opponent chooses, so the opener gets the worse option.
    pub fn value(&self) -> i32 {
        self.keep.map_or(self.open, |keep| self.open.min(keep))
    }
}

/// Outcomes of opening a component of `kind` and `len`, given the value `next` of the rest.
pub fn branch_options(kind: Kind, len: usize, next: i32) -> BranchOptions {
    let l = len as i32;
    let keep = match kind {
        Kind::Chain if len >= CHAIN_CONTROL_THRESHOLD => Some(-(l - CHAIN_KEEP_COST) + next),
        Kind::Loop if len >= LOOP_CONTROL_THRESHOLD => Some(-(l - LOOP_KEEP_COST) + next),
        _ => None,
    };
    BranchOptions {
        open: -l - next,
        keep,
    }
}

/// Best score differential for the player who must open a component of `state`.
pub fn solve(state: &ComponentState, memo: &mut Memo, pacer: &mut Pacer) -> i32 {
    if state.is_empty() {
        return 0;
    }
    if let Some(&v) = memo.get(state) {
        return v;
    }

    let mut best = i32::MIN;
    for (kind, len) in state.kinds() {
        let Some(rest) = state.remove_one(kind, len) else {
            continue;
        };
        let next = solve(&rest, memo, pacer);
        pacer.tick();
        best = best.max(branch_options(kind, len, next).value());
    }

    memo.insert(state.clone(), best);
    best
}

/// Exact value of `board`'s endgame structure for the player to move.
pub fn exact_value(board: &Board, pacer: &mut Pacer) -> i32 {
    let state = ComponentState::from_components(&endgame_components(board));
    solve(&state, &mut Memo::default(), pacer)
}

/// Branch value of opening each component, in component order.
pub fn branch_scores(components: &[Component], pacer: &mut Pacer) -> Vec<i32> {
    let state = ComponentState::from_components(components);
    let mut memo = Memo::default();

    components
        .iter()
        .map(|c| {
            let kind = Kind::of(c);
            let next = state
                .remove_one(kind, c.length)
                .map_or(0, |rest| solve(&rest, &mut memo, pacer));
            branch_options(kind, c.length, next).value()
        })
        .collect()
}

/// Pick an edge with the exact solver.
///
/// Uses hot components, then cold ones. With no components at all the
/// length-based solver decides (it falls back to any free edge).
pub fn berlekamp_move(board: &Board, rng: &mut fastrand::Rng, pacer: &mut Pacer) -> Option<EdgeId> {
    let components = endgame_components(board);
    if components.is_empty() {
        return negamax_move(board, rng, pacer);
    }

    let scores = branch_scores(&components, pacer);
    let best = scores.iter().copied().max()?;
    let tied: Vec<EdgeId> = components
        .iter()
        .zip(&scores)
        .filter(|&(_, &s)| s == best)
        .map(|(c, _)| c.representative)
        .collect();

    debug!(
        "berlekamp: {} components, best {best}, {} tied, {} nodes",
        components.len(),
        tied.len(),
        pacer.nodes()
    );
    Some(tied[rng.usize(..tied.len())])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(state: &ComponentState) -> i32 {
        solve(state, &mut Memo::default(), &mut Pacer::new())
    }

    #[test]
    fn test_short_chain_is_opened_fully() {
        for len in 1..CHAIN_CONTROL_THRESHOLD {
            let state = ComponentState::new().with(Kind::Chain, len);
            assert_eq!(value(&state), -(len as i32), "chain of {len}");
            assert_eq!(branch_options(Kind::Chain, len, 0).keep, None);
        }
    }

    #[test]
    fn test_short_loop_is_opened_fully() {
        for len in 2..LOOP_CONTROL_THRESHOLD {
            let state = ComponentState::new().with(Kind::Loop, len);
            assert_eq!(value(&state), -(len as i32), "loop of {len}");
        }
    }

    #[test]
    fn test_keep_options() {
        let chain = branch_options(Kind::Chain, 4, 0);
        assert_eq!(chain.open, -4);
        assert_eq!(chain.keep, Some(0));
        assert_eq!(chain.value(), -4);

        let ring = branch_options(Kind::Loop, 6, 0);
        assert_eq!(ring.open, -6);
        assert_eq!(ring.keep, Some(2));
    }

    #[test]
    fn test_two_long_chains() {
        // Opener gives up the first chain's control and then all of the second
        let state = ComponentState::new().with(Kind::Chain, 4).with(Kind::Chain, 4);
        assert_eq!(value(&state), -4);
    }

    #[test]
    fn test_short_chain_then_long_chain() {
        // Opening the 1-chain first forces the opponent to open the 5-chain
        let state = ComponentState::new().with(Kind::Chain, 1).with(Kind::Chain, 5);
        assert_eq!(value(&state), 4);
    }

    #[test]
    fn test_remove_one_is_functional() {
        let state = ComponentState::new()
            .with(Kind::Chain, 3)
            .with(Kind::Chain, 3)
            .with(Kind::Loop, 4);
        let rest = state.remove_one(Kind::Chain, 3).unwrap();
        assert_eq!(state.count(Kind::Chain, 3), 2);
        assert_eq!(rest.count(Kind::Chain, 3), 1);
        assert_eq!(rest.boxes(), 7);
        assert!(state.remove_one(Kind::Loop, 5).is_none());

        let empty = ComponentState::new()
            .with(Kind::Loop, 4)
            .remove_one(Kind::Loop, 4)
            .unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty, ComponentState::new());
    }

    #[test]
    fn test_state_key_ignores_insertion_order() {
        let a = ComponentState::new()
            .with(Kind::Chain, 5)
            .with(Kind::Loop, 4)
            .with(Kind::Chain, 2);
        let b = ComponentState::new()
            .with(Kind::Chain, 2)
            .with(Kind::Chain, 5)
            .with(Kind::Loop, 4);
        assert_eq!(a, b);

        let mut memo = Memo::default();
        solve(&a, &mut memo, &mut Pacer::new());
        assert!(memo.contains_key(&b));
    }

    #[test]
    fn test_value_within_box_count() {
        let state = ComponentState::new()
            .with(Kind::Chain, 1)
            .with(Kind::Chain, 2)
            .with(Kind::Chain, 6)
            .with(Kind::Loop, 4)
            .with(Kind::Loop, 8);
        let total = state.boxes() as i32;
        let v = value(&state);
        assert!((-total..=total).contains(&v), "value {v} outside ±{total}");
    }
}
