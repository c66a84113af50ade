//! Engine configuration: difficulty tiers and search limits.

use std::fmt;

use log::warn;

use crate::constants::{
    BLUNDER_PROB, EXPERT_CLOSER_CAP, EXPERT_REPLY_CAP, EXPERT_SAFE_CAP, MEDIUM_TOP_K,
    SACRIFICE_MARGIN, SACRIFICE_SAFE_LIMIT, YIELD_INTERVAL,
};

/// Playing strength.
///
/// | Tier   | Closers          | Safe edges                  | Endgame          |
/// |--------|------------------|-----------------------------|------------------|
/// | Easy   | any (random)     | random                      | random           |
/// | Medium | first            | random among top-ranked     | length negamax   |
/// | Hard   | first            | one-ply lookahead           | length negamax   |
/// | Expert | searched         | two-ply search + sacrifices | exact solver     |
///
/// Easy also blunders with a fixed probability.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    Expert,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Expert,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Expert => "expert",
        }
    }

    /// Case-insensitive exact match on a tier name.
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(name))
    }

    /// Like [`Difficulty::parse`], but unknown names become the default tier.
    pub fn from_name(name: &str) -> Self {
        Self::parse(name).unwrap_or_else(|| {
            let fallback = Self::default();
            warn!("unknown difficulty '{name}', using {fallback}");
            fallback
        })
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Tunable engine parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    pub difficulty: Difficulty,
    /// Probability that Easy plays a random edge
    pub blunder_prob: f64,
    /// Medium chooses among this many best safe edges
    pub medium_top_k: usize,
    /// Closers compared by Expert
    pub closer_cap: usize,
    /// Safe edges searched by Expert
    pub safe_cap: usize,
    /// Opponent replies examined per safe edge
    pub reply_cap: usize,
    /// Sacrifices are considered once this few safe edges remain
    pub sacrifice_safe_limit: usize,
    /// Required advantage of a sacrifice over the best safe edge
    pub sacrifice_margin: i32,
    /// Search nodes between yield-hook calls
    pub yield_interval: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            blunder_prob: BLUNDER_PROB,
            medium_top_k: MEDIUM_TOP_K,
            closer_cap: EXPERT_CLOSER_CAP,
            safe_cap: EXPERT_SAFE_CAP,
            reply_cap: EXPERT_REPLY_CAP,
            sacrifice_safe_limit: SACRIFICE_SAFE_LIMIT,
            sacrifice_margin: SACRIFICE_MARGIN,
            yield_interval: YIELD_INTERVAL,
        }
    }
}
