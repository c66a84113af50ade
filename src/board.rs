//! Dots and Boxes board representation and move execution.
//!
//! A board of `rows x cols` boxes is drawn on a `(rows + 1) x (cols + 1)` grid of dots.
//! Edges are numbered densely: all horizontal edges first (row-major), then all
//! vertical edges (row-major). Box `(r, c)` has id `r * cols + c` and lists its
//! edges as `[top, bottom, left, right]`.
//!
//! Edge geometry never changes after construction. The mutable state is which
//! edges are drawn (and by whom), which boxes are owned, whose turn it is, and
//! the score. A box's filled-edge count is always derived from the edge state.
//!
//! Moves come in two flavours:
//! - [`Board::play`] for real games
//! - [`Board::apply`] / [`Board::undo`] for lookahead, where `apply` hands back an
//!   [`Undo`] token that must be passed to `undo` to restore the position

use std::fmt;

use thiserror::Error;

use crate::constants::{BOX_SIDES, DEFAULT_COLS, DEFAULT_ROWS};

/// Dense edge identifier.
pub type EdgeId = usize;

/// Dense box identifier.
pub type BoxId = usize;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    First,
    Second,
}

impl Player {
    #[inline]
    pub fn other(self) -> Self {
        match self {
            Player::First => Player::Second,
            Player::Second => Player::First,
        }
    }

    /// Index into per-player arrays such as [`Board::scores`].
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Player::First => 0,
            Player::Second => 1,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::First => write!(f, "A"),
            Player::Second => write!(f, "B"),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Fixed geometry of one edge.
#[derive(Copy, Clone, Debug)]
pub struct Edge {
    /// Dot row of the edge's top/left endpoint
    pub row: usize,
    /// Dot column of the edge's top/left endpoint
    pub col: usize,
    pub orientation: Orientation,
    boxes: [BoxId; 2],
    n_boxes: usize,
}

impl Edge {
    /// The one or two boxes this edge borders.
    #[inline]
    pub fn boxes(&self) -> &[BoxId] {
        &self.boxes[..self.n_boxes]
    }

    /// True for edges on the perimeter (a single adjacent box).
    #[inline]
    pub fn is_border(&self) -> bool {
        self.n_boxes == 1
    }
}

/// Errors raised by board construction and move execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("board needs at least one box per side (got {rows}x{cols})")]
    InvalidSize { rows: usize, cols: usize },
    #[error("edge {0} does not exist")]
    NoSuchEdge(EdgeId),
    #[error("edge {0} is already drawn")]
    AlreadyFilled(EdgeId),
    #[error("cannot parse edge '{0}' (expected h<row>-<col>, v<row>-<col> or an edge id)")]
    BadNotation(String),
}

/// Outcome of a real move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveResult {
    /// Number of boxes completed by the move (0, 1 or 2)
    pub completed: usize,
    /// Whether the mover plays again
    pub extra_turn: bool,
}

/// Everything a move changed, returned by [`Board::apply`].
///
/// The token is consumed by [`Board::undo`], so a move can only be taken back once.
#[must_use = "an applied move must be handed back to Board::undo"]
#[derive(Debug)]
pub struct Undo {
    edge: EdgeId,
    player: Player,
    scores: [u32; 2],
    completed: [Option<BoxId>; 2],
}

impl Undo {
    /// The edge the move drew.
    pub fn edge(&self) -> EdgeId {
        self.edge
    }

    /// Number of boxes the move completed.
    pub fn completed(&self) -> usize {
        self.completed.iter().flatten().count()
    }
}

/// A Dots and Boxes position.
#[derive(Clone, Debug)]
pub struct Board {
    rows: usize,
    cols: usize,
    edges: Vec<Edge>,
    box_edges: Vec<[EdgeId; 4]>,
    filled: Vec<bool>,
    edge_owner: Vec<Option<Player>>,
    box_owner: Vec<Option<Player>>,
    current: Player,
    scores: [u32; 2],
}

#[inline]
fn h_index(cols: usize, row: usize, col: usize) -> EdgeId {
    row * cols + col
}

#[inline]
fn v_index(rows: usize, cols: usize, row: usize, col: usize) -> EdgeId {
    (rows + 1) * cols + row * (cols + 1) + col
}

impl Default for Board {
    fn default() -> Self {
        Self::build(DEFAULT_ROWS, DEFAULT_COLS)
    }
}

impl Board {
    /// Create an empty board with `rows x cols` boxes. First player to move.
    pub fn new(rows: usize, cols: usize) -> Result<Self, BoardError> {
        if rows == 0 || cols == 0 {
            return Err(BoardError::InvalidSize { rows, cols });
        }
        Ok(Self::build(rows, cols))
    }

    /// Board construction for sizes already known to be non-zero.
    fn build(rows: usize, cols: usize) -> Self {
        let n_edges = (rows + 1) * cols + rows * (cols + 1);
        let mut edges = Vec::with_capacity(n_edges);

        for row in 0..=rows {
            for col in 0..cols {
                let mut boxes = [0; 2];
                let mut n_boxes = 0;
                if row > 0 {
                    boxes[n_boxes] = (row - 1) * cols + col;
                    n_boxes += 1;
                }
                if row < rows {
                    boxes[n_boxes] = row * cols + col;
                    n_boxes += 1;
                }
                edges.push(Edge {
                    row,
                    col,
                    orientation: Orientation::Horizontal,
                    boxes,
                    n_boxes,
                });
            }
        }
        for row in 0..rows {
            for col in 0..=cols {
                let mut boxes = [0; 2];
                let mut n_boxes = 0;
                if col > 0 {
                    boxes[n_boxes] = row * cols + col - 1;
                    n_boxes += 1;
                }
                if col < cols {
                    boxes[n_boxes] = row * cols + col;
                    n_boxes += 1;
                }
                edges.push(Edge {
                    row,
                    col,
                    orientation: Orientation::Vertical,
                    boxes,
                    n_boxes,
                });
            }
        }

        let box_edges = (0..rows * cols)
            .map(|b| {
                let (row, col) = (b / cols, b % cols);
                [
                    h_index(cols, row, col),
                    h_index(cols, row + 1, col),
                    v_index(rows, cols, row, col),
                    v_index(rows, cols, row, col + 1),
                ]
            })
            .collect();

        Board {
            rows,
            cols,
            edges,
            box_edges,
            filled: vec![false; n_edges],
            edge_owner: vec![None; n_edges],
            box_owner: vec![None; rows * cols],
            current: Player::First,
            scores: [0, 0],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn box_count(&self) -> usize {
        self.box_owner.len()
    }

    /// Horizontal edge whose left endpoint is dot `(row, col)`.
    pub fn h_edge(&self, row: usize, col: usize) -> EdgeId {
        debug_assert!(row <= self.rows && col < self.cols);
        h_index(self.cols, row, col)
    }

    /// Vertical edge whose top endpoint is dot `(row, col)`.
    pub fn v_edge(&self, row: usize, col: usize) -> EdgeId {
        debug_assert!(row < self.rows && col <= self.cols);
        v_index(self.rows, self.cols, row, col)
    }

    pub fn box_at(&self, row: usize, col: usize) -> BoxId {
        debug_assert!(row < self.rows && col < self.cols);
        row * self.cols + col
    }

    #[inline]
    pub fn edge(&self, edge: EdgeId) -> &Edge {
        &self.edges[edge]
    }

    /// The one or two boxes adjacent to `edge`.
    #[inline]
    pub fn edge_boxes(&self, edge: EdgeId) -> &[BoxId] {
        self.edges[edge].boxes()
    }

    /// The four edges of a box: `[top, bottom, left, right]`.
    #[inline]
    pub fn box_edges(&self, b: BoxId) -> [EdgeId; 4] {
        self.box_edges[b]
    }

    /// The box on the other side of `edge` from `b`, if there is one.
    #[inline]
    pub fn other_box(&self, edge: EdgeId, b: BoxId) -> Option<BoxId> {
        self.edge_boxes(edge).iter().copied().find(|&o| o != b)
    }

    #[inline]
    pub fn is_filled(&self, edge: EdgeId) -> bool {
        self.filled[edge]
    }

    /// Number of drawn sides of a box (0 to 4).
    #[inline]
    pub fn filled_count(&self, b: BoxId) -> u8 {
        self.box_edges[b]
            .iter()
            .filter(|&&e| self.filled[e])
            .count() as u8
    }

    /// All undrawn edges in increasing id order.
    pub fn free_edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        (0..self.edges.len()).filter(|&e| !self.filled[e])
    }

    /// Number of boxes drawing this (free) edge would complete.
    pub fn completes(&self, edge: EdgeId) -> usize {
        if self.filled[edge] {
            return 0;
        }
        self.edge_boxes(edge)
            .iter()
            .filter(|&&b| self.filled_count(b) == BOX_SIDES - 1)
            .count()
    }

    pub fn current_player(&self) -> Player {
        self.current
    }

    /// Scores indexed by [`Player::index`].
    pub fn scores(&self) -> [u32; 2] {
        self.scores
    }

    pub fn score(&self, player: Player) -> u32 {
        self.scores[player.index()]
    }

    pub fn box_owner(&self, b: BoxId) -> Option<Player> {
        self.box_owner[b]
    }

    pub fn edge_owner(&self, edge: EdgeId) -> Option<Player> {
        self.edge_owner[edge]
    }

    /// The game is over once every box is owned.
    pub fn is_over(&self) -> bool {
        self.box_owner.iter().all(Option::is_some)
    }

    fn check_free(&self, edge: EdgeId) -> Result<(), BoardError> {
        if edge >= self.edges.len() {
            return Err(BoardError::NoSuchEdge(edge));
        }
        if self.filled[edge] {
            return Err(BoardError::AlreadyFilled(edge));
        }
        Ok(())
    }

    /// Draw `edge` for the player to move and return the token that undoes it.
    ///
    /// Completed boxes go to the mover, who then keeps the turn. A move that
    /// completes nothing passes the turn.
    pub fn apply(&mut self, edge: EdgeId) -> Result<Undo, BoardError> {
        self.check_free(edge)?;

        let player = self.current;
        let mut undo = Undo {
            edge,
            player,
            scores: self.scores,
            completed: [None; 2],
        };

        self.filled[edge] = true;
        self.edge_owner[edge] = Some(player);

        let mut n = 0;
        for i in 0..self.edges[edge].n_boxes {
            let b = self.edges[edge].boxes[i];
            if self.filled_count(b) == BOX_SIDES {
                self.box_owner[b] = Some(player);
                self.scores[player.index()] += 1;
                undo.completed[n] = Some(b);
                n += 1;
            }
        }

        if n == 0 {
            self.current = player.other();
        }
        Ok(undo)
    }

    /// Restore exactly the fields touched by the `apply` that produced `undo`.
    ///
    /// Tokens must be handed back in reverse order of their creation.
    pub fn undo(&mut self, undo: Undo) {
        self.filled[undo.edge] = false;
        self.edge_owner[undo.edge] = None;
        for b in undo.completed.into_iter().flatten() {
            self.box_owner[b] = None;
        }
        self.current = undo.player;
        self.scores = undo.scores;
    }

    /// Play a move for real.
    pub fn play(&mut self, edge: EdgeId) -> Result<MoveResult, BoardError> {
        let undo = self.apply(edge)?;
        let completed = undo.completed();
        Ok(MoveResult {
            completed,
            extra_turn: completed > 0,
        })
    }

    /// Draw every free edge except those in `keep`, in increasing id order.
    ///
    /// Handy for setting up endgame positions; turn and score follow the moves played.
    pub fn fill_all_except(&mut self, keep: &[EdgeId]) -> Result<(), BoardError> {
        for e in 0..self.edges.len() {
            if !self.filled[e] && !keep.contains(&e) {
                self.play(e)?;
            }
        }
        Ok(())
    }

    /// Human-readable edge name, e.g. `h0-2` or `v1-0`.
    pub fn edge_name(&self, edge: EdgeId) -> String {
        let e = &self.edges[edge];
        let tag = match e.orientation {
            Orientation::Horizontal => 'h',
            Orientation::Vertical => 'v',
        };
        format!("{tag}{}-{}", e.row, e.col)
    }

    /// Parse an edge written as `h<row>-<col>`, `v<row>-<col>`, or a bare edge id.
    pub fn parse_edge(&self, s: &str) -> Result<EdgeId, BoardError> {
        let s = s.trim();
        let bad = || BoardError::BadNotation(s.to_string());

        if let Ok(id) = s.parse::<usize>() {
            return if id < self.edges.len() {
                Ok(id)
            } else {
                Err(BoardError::NoSuchEdge(id))
            };
        }

        let mut chars = s.chars();
        let orientation = match chars.next().map(|c| c.to_ascii_lowercase()) {
            Some('h') => Orientation::Horizontal,
            Some('v') => Orientation::Vertical,
            _ => return Err(bad()),
        };
        let (row, col) = chars.as_str().split_once('-').ok_or_else(bad)?;
        let row: usize = row.parse().map_err(|_| bad())?;
        let col: usize = col.parse().map_err(|_| bad())?;

        match orientation {
            Orientation::Horizontal if row <= self.rows && col < self.cols => {
                Ok(h_index(self.cols, row, col))
            }
            Orientation::Vertical if row < self.rows && col <= self.cols => {
                Ok(v_index(self.rows, self.cols, row, col))
            }
            _ => Err(bad()),
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..=self.rows {
            for col in 0..self.cols {
                let drawn = self.filled[h_index(self.cols, row, col)];
                write!(f, "+{}", if drawn { "---" } else { "   " })?;
            }
            writeln!(f, "+")?;

            if row == self.rows {
                break;
            }
            for col in 0..=self.cols {
                let drawn = self.filled[v_index(self.rows, self.cols, row, col)];
                write!(f, "{}", if drawn { '|' } else { ' ' })?;
                if col < self.cols {
                    match self.box_owner[row * self.cols + col] {
                        Some(p) => write!(f, " {p} ")?,
                        None => write!(f, "   ")?,
                    }
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
