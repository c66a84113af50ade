//! Engine-vs-engine games.
//!
//! Plays complete games between two [`Engine`]s, one per seat, until every box is
//! owned. Used by the `selfplay` CLI command and as an end-to-end check of the
//! strategies.

use log::{debug, error};

use crate::board::{Board, BoardError, EdgeId, Player};
use crate::config::Difficulty;
use crate::strategy::Engine;

/// Moves and final scores of one game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    pub moves: Vec<EdgeId>,
    /// Scores indexed by [`Player::index`]
    pub scores: [u32; 2],
}

impl GameRecord {
    /// The player with more boxes, or `None` for a tie.
    pub fn winner(&self) -> Option<Player> {
        let [a, b] = self.scores;
        match a.cmp(&b) {
            std::cmp::Ordering::Greater => Some(Player::First),
            std::cmp::Ordering::Less => Some(Player::Second),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// Play `board` to the end. `engines[i]` moves for the player with index `i`.
pub fn play_game(board: &mut Board, engines: &mut [Engine; 2]) -> GameRecord {
    let mut moves = Vec::with_capacity(board.edge_count());

    while !board.is_over() {
        let player = board.current_player();
        let Some(edge) = engines[player.index()].choose_move(board) else {
            break;
        };
        if let Err(err) = board.play(edge) {
            error!("engine for {player} chose an illegal edge: {err}");
            break;
        }
        moves.push(edge);
    }

    debug!("game over after {} moves: {:?}", moves.len(), board.scores());
    GameRecord {
        moves,
        scores: board.scores(),
    }
}

/// Aggregate result of a series of games between two tiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchSummary {
    /// Games won by each tier, in the order they were passed to [`play_match`]
    pub wins: [u32; 2],
    pub ties: u32,
    /// Total boxes taken by each tier
    pub boxes: [u32; 2],
}

/// Play `games` games on a fresh `rows x cols` board, alternating who moves first.
///
/// Engine seeds are derived from `seed`, so a match is reproducible.
pub fn play_match(
    rows: usize,
    cols: usize,
    tiers: [Difficulty; 2],
    games: u32,
    seed: u64,
) -> Result<MatchSummary, BoardError> {
    let mut summary = MatchSummary::default();

    for game in 0..games {
        let mut board = Board::new(rows, cols)?;
        // Tier index seated as the first player
        let first = (game % 2) as usize;
        let seats = [first, 1 - first];

        let mut engines = seats.map(|tier| {
            let mut engine = Engine::with_seed(seed.wrapping_add(2 * game as u64 + tier as u64));
            engine.set_difficulty(tiers[tier].name());
            engine
        });
        let record = play_game(&mut board, &mut engines);

        for (seat, &tier) in seats.iter().enumerate() {
            summary.boxes[tier] += record.scores[seat];
        }
        match record.winner() {
            Some(p) => summary.wins[seats[p.index()]] += 1,
            None => summary.ties += 1,
        }
    }
    Ok(summary)
}
