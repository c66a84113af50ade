//! Length-based endgame solver.
//!
//! Each component is reduced to a single number, `4 - L` for a chain of `L` boxes
//! and `-1` for a loop, and the endgame is searched as "pick one value, pay it,
//! hand the rest to the opponent". Only the multiset of values matters, so the
//! memo key is the value list sorted in descending order.
//!
//! This is an approximation; [`crate::berlekamp`] is the exact solver.

use log::debug;
use rustc_hash::FxHashMap;

use crate::board::{Board, EdgeId};
use crate::components::{Component, collect_cold, collect_hot};
use crate::constants::{CHAIN_BASE_VALUE, LOOP_VALUE};
use crate::pacing::Pacer;

/// Memo table for one top-level search, keyed by the descending value list.
pub type Memo = FxHashMap<Vec<i32>, i32>;

/// Opening cost of a component under the length model.
pub fn component_value(c: &Component) -> i32 {
    if c.is_loop {
        LOOP_VALUE
    } else {
        CHAIN_BASE_VALUE - c.length as i32
    }
}

/// Best score differential for the player to move over the multiset `values`.
///
/// Stops exploring siblings once a non-negative score has been found.
pub fn negamax(values: &[i32], memo: &mut Memo, pacer: &mut Pacer) -> i32 {
    if values.is_empty() {
        return 0;
    }

    let mut key = values.to_vec();
    key.sort_unstable_by(|a, b| b.cmp(a));
    if let Some(&v) = memo.get(&key) {
        return v;
    }

    let mut best = i32::MIN;
    let mut rest = Vec::with_capacity(key.len() - 1);
    for i in 0..key.len() {
        // Equal values lead to the same subtree
        if i > 0 && key[i] == key[i - 1] {
            continue;
        }
        rest.clear();
        rest.extend_from_slice(&key[..i]);
        rest.extend_from_slice(&key[i + 1..]);

        let score = -negamax(&rest, memo, pacer) - key[i];
        pacer.tick();

        best = best.max(score);
        if best >= 0 {
            break;
        }
    }

    memo.insert(key, best);
    best
}

/// Score of choosing each component first, in component order.
pub fn branch_scores(components: &[Component], pacer: &mut Pacer) -> Vec<i32> {
    let values: Vec<i32> = components.iter().map(component_value).collect();
    let mut memo = Memo::default();
    let mut rest = Vec::with_capacity(values.len());

    (0..values.len())
        .map(|i| {
            rest.clear();
            rest.extend(values.iter().enumerate().filter(|&(j, _)| j != i).map(|(_, &v)| v));
            -negamax(&rest, &mut memo, pacer) - values[i]
        })
        .collect()
}

/// Hot components if there are any, otherwise cold ones.
pub(crate) fn endgame_components(board: &Board) -> Vec<Component> {
    let hot = collect_hot(board);
    if hot.is_empty() { collect_cold(board) } else { hot }
}

/// Length-model value of `board` for the player to move, bounded by the box count.
pub fn negamax_value(board: &Board, pacer: &mut Pacer) -> i32 {
    let values: Vec<i32> = endgame_components(board)
        .iter()
        .map(component_value)
        .collect();
    let total = board.box_count() as i32;
    negamax(&values, &mut Memo::default(), pacer).clamp(-total, total)
}

/// Pick an edge with the length-based solver.
///
/// Uses hot components, then cold components, then any free edge. Ties between
/// equally scored components are broken uniformly at random.
pub fn negamax_move(board: &Board, rng: &mut fastrand::Rng, pacer: &mut Pacer) -> Option<EdgeId> {
    let components = endgame_components(board);
    if components.is_empty() {
        let free: Vec<EdgeId> = board.free_edges().collect();
        return (!free.is_empty()).then(|| free[rng.usize(..free.len())]);
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
        "negamax: {} components, best {best}, {} tied, {} nodes",
        components.len(),
        tied.len(),
        pacer.nodes()
    );
    Some(tied[rng.usize(..tied.len())])
}
