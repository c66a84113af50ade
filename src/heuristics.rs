//! Safe-edge ranking heuristics.
//!
//! Prefers perimeter edges and edges next to boxes that already have sides drawn,
//! and penalizes (with a one-ply lookahead) moves that hand over new captures.

use crate::board::{Board, EdgeId};
use crate::components::count_hot;
use crate::constants::BORDER_BONUS;

/// Static score of a single edge: border bonus plus the most drawn sides among its boxes.
pub fn score_safe_edge(board: &Board, edge: EdgeId) -> i32 {
    let border = if board.edge(edge).is_border() {
        BORDER_BONUS
    } else {
        0
    };
    let max_filled = board
        .edge_boxes(edge)
        .iter()
        .map(|&b| board.filled_count(b) as i32)
        .max()
        .unwrap_or(0);
    border + max_filled
}

/// Static score minus the number of hot components after hypothetically drawing `edge`.
///
/// The board is restored before returning.
pub fn lookahead_score(board: &mut Board, edge: EdgeId) -> i32 {
    let hot = match board.apply(edge) {
        Ok(undo) => {
            let hot = count_hot(board) as i32;
            board.undo(undo);
            hot
        }
        Err(_) => return i32::MIN,
    };
    score_safe_edge(board, edge) - hot
}

/// Candidate with the best [`lookahead_score`], first one on ties.
pub fn best_safe_edge(board: &mut Board, candidates: &[EdgeId]) -> Option<EdgeId> {
    let mut best: Option<(i32, EdgeId)> = None;
    for &e in candidates {
        let score = lookahead_score(board, e);
        if best.is_none_or(|(s, _)| score > s) {
            best = Some((score, e));
        }
    }
    best.map(|(_, e)| e)
}

/// Candidates sorted by [`score_safe_edge`], best first. Ties keep their input order.
pub fn rank_safe_edges(board: &Board, candidates: &[EdgeId]) -> Vec<EdgeId> {
    let mut ranked = candidates.to_vec();
    ranked.sort_by_key(|&e| std::cmp::Reverse(score_safe_edge(board, e)));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_border_bonus() {
        let board = Board::new(2, 2).unwrap();
        assert_eq!(score_safe_edge(&board, board.h_edge(0, 0)), BORDER_BONUS);
        assert_eq!(score_safe_edge(&board, board.v_edge(0, 1)), 0);
    }

    #[test]
    fn test_lookahead_penalizes_new_captures() {
        let mut board = Board::new(1, 2).unwrap();
        board.play(board.h_edge(0, 0)).unwrap();
        board.play(board.h_edge(1, 0)).unwrap();
        let before = board.clone();

        // Closing a third side of box 0 creates one hot component
        let left = board.v_edge(0, 0);
        assert_eq!(lookahead_score(&mut board, left), BORDER_BONUS + 2 - 1);

        let right = board.v_edge(0, 2);
        assert_eq!(lookahead_score(&mut board, right), BORDER_BONUS);

        assert_eq!(board.free_edges().count(), before.free_edges().count());
        assert_eq!(board.current_player(), before.current_player());
    }

    #[test]
    fn test_best_safe_edge_prefers_border_and_first_on_ties() {
        let mut board = Board::new(2, 2).unwrap();
        let inner = board.v_edge(0, 1);
        let top_left = board.h_edge(0, 0);
        let top_right = board.h_edge(0, 1);
        assert_eq!(
            best_safe_edge(&mut board, &[inner, top_left, top_right]),
            Some(top_left)
        );
        assert_eq!(best_safe_edge(&mut board, &[]), None);
    }

    #[test]
    fn test_rank_safe_edges_is_stable() {
        let board = Board::new(2, 2).unwrap();
        let inner = board.v_edge(0, 1);
        let a = board.h_edge(0, 0);
        let b = board.h_edge(2, 1);
        assert_eq!(rank_safe_edges(&board, &[inner, a, b]), vec![a, b, inner]);
    }
}
