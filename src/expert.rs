//! Shallow minimax on the live board.
//!
//! Candidate moves are applied with [`Board::apply`], evaluated, and taken back
//! with [`Board::undo`], so the board is left exactly as it was found.
//!
//! Leaf evaluation is the current score difference plus a projection of the rest
//! of the game. Boxes that are capturable right now go to the player to move,
//! together with every cold chain an open run leads into. The mover then either
//! opens the remaining chains and loops (valued by the exact solver) or declines
//! the tail of a run to keep control.

use log::debug;

use crate::berlekamp::{self, ComponentState, Kind, Memo};
use crate::board::{Board, EdgeId, Player};
use crate::classify::classify;
use crate::components::{Component, collect_cold, collect_hot};
use crate::config::EngineConfig;
use crate::constants::{CHAIN_KEEP_COST, LOOP_KEEP_COST};
use crate::heuristics::rank_safe_edges;
use crate::pacing::Pacer;

/// Boxes the player to move can take in one go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Run {
    length: usize,
    /// Open at both ends, like a loop that has been entered
    closed: bool,
}

impl Run {
    /// Score given up by declining the end of this run to keep the move.
    fn keep_cost(self) -> Option<i32> {
        let cost = if self.closed { LOOP_KEEP_COST } else { CHAIN_KEEP_COST };
        // Each declined box swings the difference by two
        let declined = (cost / 2) as usize;
        (self.length >= declined).then_some(cost)
    }
}

/// Capturable runs, and the cold structure left once they are taken.
///
/// A hot component whose open end leads into a cold chain takes that chain with
/// it: capturing the last hot box puts a third side on the next cold box.
fn capture_runs(board: &Board, cold: &[Component]) -> (Vec<Run>, ComponentState) {
    let mut owner = vec![None; board.box_count()];
    for (i, c) in cold.iter().enumerate() {
        for &b in &c.boxes {
            owner[b] = Some(i);
        }
    }

    let mut runs: Vec<Run> = Vec::new();
    // Run that swallowed each cold component
    let mut taken_by: Vec<Option<usize>> = vec![None; cold.len()];

    for hot in collect_hot(board) {
        // A hot component has at most one open end
        let next = hot.entry_edges.first().and_then(|&e| {
            board
                .edge_boxes(e)
                .iter()
                .find(|&&b| !hot.boxes.contains(&b))
                .and_then(|&b| owner[b])
        });

        match next.map(|i| (i, taken_by[i])) {
            // Other end of a chain another run already leads into
            Some((_, Some(r))) => {
                runs[r].length += hot.length;
                runs[r].closed = true;
            }
            Some((i, None)) => {
                taken_by[i] = Some(runs.len());
                runs.push(Run {
                    length: hot.length + cold[i].length,
                    closed: false,
                });
            }
            None => runs.push(Run {
                length: hot.length,
                closed: hot.is_loop,
            }),
        }
    }

    let rest = cold
        .iter()
        .zip(&taken_by)
        .filter(|(_, taken)| taken.is_none())
        .fold(ComponentState::new(), |s, (c, _)| s.with(Kind::of(c), c.length));
    (runs, rest)
}

/// Projected future differential for the player to move.
///
/// The mover takes every capturable run and then opens the rest, or gives up the
/// cheapest run tail so the opponent has to open the rest instead.
pub fn projected_value(board: &Board, pacer: &mut Pacer) -> i32 {
    let (runs, rest) = capture_runs(board, &collect_cold(board));
    let taken: i32 = runs.iter().map(|r| r.length as i32).sum();
    let rest_value = berlekamp::solve(&rest, &mut Memo::default(), pacer);

    let take_all = taken + rest_value;
    match runs.iter().filter_map(|r| r.keep_cost()).min() {
        Some(cost) => take_all.max(taken - cost - rest_value),
        None => take_all,
    }
}

/// Score difference plus projected value, from `me`'s point of view.
pub fn evaluate(board: &Board, me: Player, pacer: &mut Pacer) -> i32 {
    let diff = board.score(me) as i32 - board.score(me.other()) as i32;
    let projected = projected_value(board, pacer);
    if board.current_player() == me {
        diff + projected
    } else {
        diff - projected
    }
}

fn apply_and_eval(
    board: &mut Board,
    edge: EdgeId,
    pacer: &mut Pacer,
    eval: impl FnOnce(&mut Board, &mut Pacer) -> i32,
) -> Option<i32> {
    let undo = board.apply(edge).ok()?;
    let value = eval(board, pacer);
    board.undo(undo);
    Some(value)
}

/// Closers ordered by boxes completed, best first, capped at `cap`.
fn ranked_closers(board: &Board, closers: &[EdgeId], cap: usize) -> Vec<EdgeId> {
    let mut ranked = closers.to_vec();
    ranked.sort_by_key(|&e| std::cmp::Reverse(board.completes(e)));
    ranked.truncate(cap);
    ranked
}

/// Best closer by one-ply evaluation. First one wins ties.
pub fn best_closer(
    board: &mut Board,
    closers: &[EdgeId],
    config: &EngineConfig,
    pacer: &mut Pacer,
) -> Option<EdgeId> {
    let me = board.current_player();
    let mut best: Option<(i32, EdgeId)> = None;

    for e in ranked_closers(board, closers, config.closer_cap) {
        let Some(value) = apply_and_eval(board, e, pacer, |b, p| evaluate(b, me, p)) else {
            continue;
        };
        if best.is_none_or(|(v, _)| value > v) {
            best = Some((value, e));
        }
    }
    best.map(|(_, e)| e)
}

/// Value for `me` after the opponent's most damaging reply among a bounded set.
///
/// Replies are the opponent's best closers followed by its top safe edges. With no
/// such reply available the position is evaluated as it stands.
pub fn worst_reply(board: &mut Board, me: Player, config: &EngineConfig, pacer: &mut Pacer) -> i32 {
    let snap = classify(board);
    let mut replies = ranked_closers(board, &snap.closers, config.reply_cap);
    replies.extend(rank_safe_edges(board, &snap.safes));
    replies.truncate(config.reply_cap);

    let worst = replies
        .into_iter()
        .filter_map(|r| apply_and_eval(board, r, pacer, |b, p| evaluate(b, me, p)))
        .min();
    worst.unwrap_or_else(|| evaluate(board, me, pacer))
}

/// Two-ply search over the best-ranked safe edges. Returns the edge and its value.
pub fn best_safe(
    board: &mut Board,
    safes: &[EdgeId],
    config: &EngineConfig,
    pacer: &mut Pacer,
) -> Option<(EdgeId, i32)> {
    let me = board.current_player();
    let mut candidates = rank_safe_edges(board, safes);
    candidates.truncate(config.safe_cap);

    let mut best: Option<(EdgeId, i32)> = None;
    for e in candidates {
        let Some(value) = apply_and_eval(board, e, pacer, |b, p| worst_reply(b, me, config, p))
        else {
            continue;
        };
        if best.is_none_or(|(_, v)| value > v) {
            best = Some((e, value));
        }
    }
    best
}

/// Deliberately open the longest cold component when the safe moves look bad.
///
/// Only runs when the best safe value is negative and at most
/// `sacrifice_safe_limit` safe edges remain. The sacrifice is returned only if it
/// beats `safe_value` by more than `sacrifice_margin`.
pub fn sacrifice(
    board: &mut Board,
    safe_count: usize,
    safe_value: i32,
    config: &EngineConfig,
    pacer: &mut Pacer,
) -> Option<EdgeId> {
    if safe_value >= 0 || safe_count > config.sacrifice_safe_limit {
        return None;
    }

    let me = board.current_player();
    let longest = collect_cold(board).into_iter().max_by(|a, b| {
        // Keep the first of equally long components
        a.length.cmp(&b.length).then(std::cmp::Ordering::Greater)
    })?;
    let edge = longest.representative;
    let value = apply_and_eval(board, edge, pacer, |b, p| worst_reply(b, me, config, p))?;

    debug!(
        "sacrifice {} (length {}): {value} vs safe {safe_value}",
        board.edge_name(edge),
        longest.length
    );
    (value > safe_value + config.sacrifice_margin).then_some(edge)
}

/// Safe-edge search with sacrifice consideration.
pub fn best_safe_or_sacrifice(
    board: &mut Board,
    safes: &[EdgeId],
    config: &EngineConfig,
    pacer: &mut Pacer,
) -> Option<EdgeId> {
    let (edge, value) = best_safe(board, safes, config, pacer)?;
    sacrifice(board, safes.len(), value, config, pacer).or(Some(edge))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Position where only the edges in `free` are undrawn.
    fn setpos(rows: usize, cols: usize, free: &[&str]) -> Board {
        let mut board = Board::new(rows, cols).unwrap();
        let keep: Vec<EdgeId> = free.iter().map(|s| board.parse_edge(s).unwrap()).collect();
        board.fill_all_except(&keep).unwrap();
        board
    }

    fn edge(board: &Board, name: &str) -> EdgeId {
        board.parse_edge(name).unwrap()
    }

    #[test]
    fn test_evaluate_counts_capturable_boxes() {
        // One box with three sides drawn, nothing else going on
        let mut board = Board::new(1, 1).unwrap();
        let [top, bottom, left, _] = board.box_edges(0);
        for e in [top, bottom, left] {
            board.play(e).unwrap();
        }
        let mover = board.current_player();
        let mut pacer = Pacer::new();
        assert_eq!(projected_value(&board, &mut pacer), 1);
        assert_eq!(evaluate(&board, mover, &mut pacer), 1);
        assert_eq!(evaluate(&board, mover.other(), &mut pacer), -1);
    }

    #[test]
    fn test_best_closer_prefers_double_box() {
        // 1x3 board: boxes 0 and 1 miss only their shared edge, box 2 misses its right side
        let mut board = Board::new(1, 3).unwrap();
        let shared = board.v_edge(0, 1);
        let middle = board.v_edge(0, 2);
        let lone = board.v_edge(0, 3);
        board.fill_all_except(&[shared, middle, lone]).unwrap();
        board.play(middle).unwrap();

        let snap = classify(&board);
        assert_eq!(board.completes(shared), 2);
        let config = EngineConfig::default();
        let choice = best_closer(&mut board, &snap.closers, &config, &mut Pacer::new());
        assert_eq!(choice, Some(shared));
    }

    #[test]
    fn test_search_leaves_board_untouched() {
        let mut board = Board::new(3, 3).unwrap();
        for e in [0, 5, 13, 20] {
            board.play(e).unwrap();
        }
        let snapshot = board.to_string();
        let player = board.current_player();
        let scores = board.scores();

        let snap = classify(&board);
        let config = EngineConfig::default();
        let mut pacer = Pacer::new();
        let choice = best_safe_or_sacrifice(&mut board, &snap.safes, &config, &mut pacer);

        let edge = choice.expect("a safe edge exists");
        assert!(!board.is_filled(edge));
        assert_eq!(board.to_string(), snapshot);
        assert_eq!(board.current_player(), player);
        assert_eq!(board.scores(), scores);
    }

    #[test]
    fn test_no_sacrifice_when_safe_moves_are_fine() {
        let mut board = Board::new(2, 2).unwrap();
        let config = EngineConfig::default();
        assert_eq!(sacrifice(&mut board, 1, 0, &config, &mut Pacer::new()), None);
        assert_eq!(sacrifice(&mut board, 10, -5, &config, &mut Pacer::new()), None);
    }

    #[test]
    fn test_opened_chain_belongs_to_the_capturer() {
        // 1x4 strip with every vertical free: one cold chain of four
        let mut board = setpos(1, 4, &["v0-0", "v0-1", "v0-2", "v0-3", "v0-4"]);
        let me = board.current_player();
        let mut pacer = Pacer::new();
        assert_eq!(projected_value(&board, &mut pacer), -4);

        let open = edge(&board, "v0-0");
        let undo = board.apply(open).unwrap();
        assert_eq!(collect_hot(&board).len(), 1);
        assert_eq!(collect_cold(&board)[0].length, 3);

        // The opponent takes all four, not one box followed by a chain of three to open
        assert_eq!(projected_value(&board, &mut pacer), 4);
        assert_eq!(evaluate(&board, me, &mut pacer), -4);
        board.undo(undo);

        let config = EngineConfig::default();
        assert_eq!(sacrifice(&mut board, 0, -3, &config, &mut pacer), None);
    }

    #[test]
    fn test_capturer_may_decline_to_keep_control() {
        // Chain of four opened at the end, plus a chain of three elsewhere
        let mut board = setpos(
            2,
            4,
            &["v0-0", "v0-1", "v0-2", "v0-3", "v0-4", "v1-0", "v1-1", "v1-2", "h2-2"],
        );
        let open = edge(&board, "v0-0");
        board.play(open).unwrap();
        let mut pacer = Pacer::new();

        // Taking all four and opening the three nets 4 - 3, handing back two nets 0 + 3
        assert_eq!(projected_value(&board, &mut pacer), 3);
    }

    #[test]
    fn test_best_safe_assumes_the_worst_reply() {
        // Three single-box chains and two fresh boxes, four safe edges
        let mut board = setpos(
            1,
            5,
            &["h0-1", "h0-3", "h1-1", "h1-3", "h1-4", "v0-0", "v0-1", "v0-2", "v0-3", "v0-4"],
        );
        let me = board.current_player();
        let snap = classify(&board);
        assert_eq!(snap.safes.len(), 4);

        let config = EngineConfig::default();
        let mut pacer = Pacer::new();
        let first = edge(&board, "h0-1");
        assert_eq!(best_safe(&mut board, &snap.safes, &config, &mut pacer), Some((first, -1)));

        // The opponent's first-ranked reply would be worth +2 to us
        let undo = board.apply(first).unwrap();
        let greedy = edge(&board, "h1-1");
        let reply = board.apply(greedy).unwrap();
        assert_eq!(evaluate(&board, me, &mut pacer), 2);
        board.undo(reply);
        assert_eq!(worst_reply(&mut board, me, &config, &mut pacer), -1);
        board.undo(undo);
    }

    #[test]
    fn test_sacrifice_short_chain_to_keep_control() {
        // A two-box chain between two boxes with one side drawn. Any safe edge grows
        // the chain, so after both players run out of safe edges we must open a
        // chain of four. Giving the two boxes away now costs less.
        let mut board = setpos(1, 4, &["h0-0", "h0-3", "h1-0", "h1-3", "v0-1", "v0-2", "v0-3"]);
        let snap = classify(&board);
        assert!(snap.closers.is_empty());
        assert_eq!(snap.safes.len(), 4);

        let config = EngineConfig::default();
        let mut pacer = Pacer::new();
        let (_, safe_value) = best_safe(&mut board, &snap.safes, &config, &mut pacer).unwrap();
        assert_eq!(safe_value, -4);

        let chain_end = edge(&board, "v0-1");
        assert_eq!(
            sacrifice(&mut board, snap.safes.len(), safe_value, &config, &mut pacer),
            Some(chain_end)
        );
        assert_eq!(
            best_safe_or_sacrifice(&mut board, &snap.safes, &config, &mut pacer),
            Some(chain_end)
        );

        // Allowing fewer remaining safe edges keeps the safe move
        let cautious = EngineConfig {
            sacrifice_safe_limit: 3,
            ..EngineConfig::default()
        };
        let choice = best_safe_or_sacrifice(&mut board, &snap.safes, &cautious, &mut pacer);
        assert!(choice.is_some_and(|e| snap.safes.contains(&e)));
    }
}
