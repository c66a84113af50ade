//! Chain and loop detection.
//!
//! Boxes that share an undrawn edge form a graph. Two decompositions of that graph
//! are used by the engine:
//!
//! - **hot** components: runs of boxes with three sides drawn, i.e. captures that
//!   are available right now
//! - **cold** components: runs of boxes with two sides drawn, i.e. the chains and
//!   loops that will exist once the safe moves run out
//!
//! Both use the same depth-first flood fill, seeded from boxes in increasing id
//! order so that identical boards always yield identical component lists.

use crate::board::{Board, BoxId, EdgeId};
use crate::constants::BOX_SIDES;

/// A connected run of boxes in the same state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    /// Number of boxes in the run
    pub length: usize,
    /// A playable edge belonging to the run
    pub representative: EdgeId,
    /// No open boundary edge was found
    pub is_loop: bool,
    /// Undrawn edges where the run ends (border, or a box in another state)
    pub entry_edges: Vec<EdgeId>,
    /// Boxes in traversal order
    pub boxes: Vec<BoxId>,
}

/// Runs of boxes with three sides drawn.
pub fn collect_hot(board: &Board) -> Vec<Component> {
    collect(board, BOX_SIDES - 1)
}

/// Runs of boxes with two sides drawn.
pub fn collect_cold(board: &Board) -> Vec<Component> {
    collect(board, BOX_SIDES - 2)
}

/// Number of hot components, used by the one-ply safe-edge lookahead.
pub fn count_hot(board: &Board) -> usize {
    collect_hot(board).len()
}

fn collect(board: &Board, sides: u8) -> Vec<Component> {
    let mut visited = vec![false; board.box_count()];
    let mut out = Vec::new();

    for seed in 0..board.box_count() {
        if visited[seed] || board.filled_count(seed) != sides {
            continue;
        }
        out.push(trace(board, seed, sides, &mut visited));
    }
    out
}

/// Flood-fill one component starting at `seed`.
fn trace(board: &Board, seed: BoxId, sides: u8, visited: &mut [bool]) -> Component {
    let mut stack = vec![seed];
    let mut boxes = Vec::new();
    let mut entry_edges = Vec::new();
    let mut first_free = None;
    visited[seed] = true;

    while let Some(b) = stack.pop() {
        boxes.push(b);
        for e in board.box_edges(b) {
            if board.is_filled(e) {
                continue;
            }
            first_free.get_or_insert(e);

            match board.other_box(e, b) {
                // Already part of this run
                Some(n) if visited[n] => {}
                Some(n) if board.filled_count(n) == sides => {
                    visited[n] = true;
                    stack.push(n);
                }
                _ => entry_edges.push(e),
            }
        }
    }

    // Every seed box has at least one free edge, since it has fewer than four drawn
    let first_free = first_free.unwrap_or(board.box_edges(seed)[0]);
    Component {
        length: boxes.len(),
        representative: entry_edges.first().copied().unwrap_or(first_free),
        is_loop: entry_edges.is_empty(),
        entry_edges,
        boxes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 3x3 board with a four-box chain (0,0)-(0,1)-(0,2)-(1,2), both ends on the border.
    fn chain_of_four() -> Board {
        let mut board = Board::new(3, 3).unwrap();
        let keep = [
            board.v_edge(0, 0),
            board.v_edge(0, 1),
            board.v_edge(0, 2),
            board.h_edge(1, 2),
            board.v_edge(1, 3),
        ];
        board.fill_all_except(&keep).unwrap();
        board
    }

    #[test]
    fn test_cold_chain() {
        let board = chain_of_four();
        let cold = collect_cold(&board);
        assert_eq!(cold.len(), 1);

        let chain = &cold[0];
        assert_eq!(chain.length, 4);
        assert!(!chain.is_loop);
        assert_eq!(chain.entry_edges, vec![board.v_edge(0, 0), board.v_edge(1, 3)]);
        assert_eq!(chain.representative, board.v_edge(0, 0));
        assert!(collect_hot(&board).is_empty());
    }

    #[test]
    fn test_cold_loop() {
        // Perimeter of a 2x2 board drawn: the four inner edges form a ring of four boxes
        let mut board = Board::new(2, 2).unwrap();
        let inner = [
            board.h_edge(1, 0),
            board.h_edge(1, 1),
            board.v_edge(0, 1),
            board.v_edge(1, 1),
        ];
        board.fill_all_except(&inner).unwrap();

        let cold = collect_cold(&board);
        assert_eq!(cold.len(), 1);
        assert_eq!(cold[0].length, 4);
        assert!(cold[0].is_loop);
        assert!(cold[0].entry_edges.is_empty());
        assert!(inner.contains(&cold[0].representative));
    }

    #[test]
    fn test_hot_single_box() {
        let mut board = Board::new(2, 2).unwrap();
        let [top, bottom, left, right] = board.box_edges(0);
        for e in [top, bottom, left] {
            board.play(e).unwrap();
        }

        let hot = collect_hot(&board);
        assert_eq!(hot.len(), 1);
        assert_eq!(hot[0].length, 1);
        assert_eq!(hot[0].representative, right);
        assert!(!hot[0].is_loop);
        assert_eq!(count_hot(&board), 1);
    }

    #[test]
    fn test_hot_pair_sharing_last_edge() {
        // Two boxes each missing only the edge between them
        let mut board = Board::new(1, 2).unwrap();
        let shared = board.v_edge(0, 1);
        board.fill_all_except(&[shared]).unwrap();

        let hot = collect_hot(&board);
        assert_eq!(hot.len(), 1);
        assert_eq!(hot[0].length, 2);
        assert!(hot[0].is_loop);
        assert_eq!(hot[0].representative, shared);
    }

    #[test]
    fn test_collect_is_idempotent() {
        let board = chain_of_four();
        let shape = |cs: Vec<Component>| {
            let mut v: Vec<(usize, bool)> = cs.iter().map(|c| (c.length, c.is_loop)).collect();
            v.sort();
            v
        };
        assert_eq!(shape(collect_cold(&board)), shape(collect_cold(&board)));
        assert_eq!(shape(collect_hot(&board)), shape(collect_hot(&board)));
        assert_eq!(collect_cold(&board), collect_cold(&board));
    }

    #[test]
    fn test_component_length_matches_distinct_boxes() {
        let board = chain_of_four();
        for c in collect_cold(&board) {
            let mut boxes = c.boxes.clone();
            boxes.sort();
            boxes.dedup();
            assert_eq!(boxes.len(), c.length);
        }
    }
}
