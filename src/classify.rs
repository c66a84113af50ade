//! Edge classification.
//!
//! Buckets the free edges of a board into closers (complete at least one box)
//! and safe edges (leave no box with three sides drawn). Every free edge is
//! exactly one of closer, safe, or neither.

use crate::board::{Board, EdgeId};
use crate::constants::BOX_SIDES;

/// Per-decision view of the free edges, computed once and shared by the strategies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeSnapshot {
    /// All undrawn edges, in increasing id order
    pub free: Vec<EdgeId>,
    /// Free edges that complete a box
    pub closers: Vec<EdgeId>,
    /// Free edges that are not closers and give the opponent no box
    pub safes: Vec<EdgeId>,
}

impl EdgeSnapshot {
    pub fn is_empty(&self) -> bool {
        self.free.is_empty()
    }
}

/// Classify every free edge of `board`.
pub fn classify(board: &Board) -> EdgeSnapshot {
    let mut snap = EdgeSnapshot::default();

    for e in board.free_edges() {
        snap.free.push(e);

        let mut closer = false;
        let mut unsafe_edge = false;
        for &b in board.edge_boxes(e) {
            match board.filled_count(b) {
                c if c == BOX_SIDES - 1 => closer = true,
                c if c == BOX_SIDES - 2 => unsafe_edge = true,
                _ => {}
            }
        }

        if closer {
            snap.closers.push(e);
        } else if !unsafe_edge {
            snap.safes.push(e);
        }
    }
    snap
}

/// True if drawing `edge` leaves no box with three sides drawn.
pub fn is_safe(board: &Board, edge: EdgeId) -> bool {
    board
        .edge_boxes(edge)
        .iter()
        .all(|&b| board.filled_count(b) < BOX_SIDES - 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_board_all_safe() {
        let board = Board::new(3, 3).unwrap();
        let snap = classify(&board);
        assert_eq!(snap.free.len(), 24);
        assert!(snap.closers.is_empty());
        assert_eq!(snap.safes, snap.free);
    }

    #[test]
    fn test_full_board_is_empty() {
        let mut board = Board::new(1, 1).unwrap();
        for e in board.box_edges(0) {
            board.play(e).unwrap();
        }
        let snap = classify(&board);
        assert!(snap.is_empty());
        assert!(snap.closers.is_empty());
        assert!(snap.safes.is_empty());
    }

    #[test]
    fn test_two_sided_box_makes_edges_unsafe() {
        let mut board = Board::new(1, 2).unwrap();
        board.play(board.h_edge(0, 0)).unwrap();
        board.play(board.h_edge(1, 0)).unwrap();

        let snap = classify(&board);
        let left = board.v_edge(0, 0);
        let shared = board.v_edge(0, 1);
        assert!(!snap.safes.contains(&left));
        assert!(!snap.safes.contains(&shared));
        assert!(snap.safes.contains(&board.v_edge(0, 2)));
        assert!(snap.closers.is_empty());
        assert!(!is_safe(&board, shared));
    }

    #[test]
    fn test_partition() {
        let mut board = Board::new(2, 2).unwrap();
        for e in [0, 2, 7, 8, 9] {
            board.play(e).unwrap();
        }
        let snap = classify(&board);
        for &e in &snap.free {
            let closer = snap.closers.contains(&e);
            let safe = snap.safes.contains(&e);
            assert!(!(closer && safe), "edge {e} classified twice");
        }
        assert!(snap.closers.iter().all(|e| snap.free.contains(e)));
        assert!(snap.safes.iter().all(|e| snap.free.contains(e)));
    }
}
