//! Turn Scheduler
//!
//! Resolves the simultaneous proposals of one turn into a single winner.
//! The current speaker keeps the floor with probability one half; otherwise
//! the floor goes uniformly to a proposer in the fairness tier (the proposers
//! with the fewest contributions so far).
//!
//! [`win_probability`] is the closed-form model of the same rule that the
//! planner uses to weight hypothetical futures.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeMap;

use parley_model::{contributions, current_speaker, Item, PlayerId, Slot};

/// Probability that a proposing current speaker keeps the floor.
pub const CURRENT_SPEAKER_EDGE: f64 = 0.5;

/// Lowest prior the win model ever returns, so no path loses all weight.
pub const MIN_WIN_PROBABILITY: f64 = 1e-3;

/// Per-player count of turns won.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContributionCounters {
    counts: BTreeMap<PlayerId, usize>,
}

impl ContributionCounters {
    /// Counters starting at zero for every listed player.
    pub fn new(players: impl IntoIterator<Item = PlayerId>) -> Self {
        Self {
            counts: players.into_iter().map(|p| (p, 0)).collect(),
        }
    }

    pub fn get(&self, player: PlayerId) -> usize {
        self.counts.get(&player).copied().unwrap_or(0)
    }

    pub fn increment(&mut self, player: PlayerId) {
        *self.counts.entry(player).or_insert(0) += 1;
    }

    /// Sum over all players.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Largest minus smallest counter.
    pub fn spread(&self) -> usize {
        let max = self.counts.values().max().copied().unwrap_or(0);
        let min = self.counts.values().min().copied().unwrap_or(0);
        max - min
    }
}

/// One player's offer for the current turn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Proposal {
    pub player: PlayerId,
    pub item: Item,
}

/// Picks the winning proposal, returning its index in `proposals`.
///
/// Returns `None` only when `proposals` is empty, which the engine records
/// as a pause.
pub fn resolve<R: Rng + ?Sized>(
    proposals: &[Proposal],
    current: Option<PlayerId>,
    counters: &ContributionCounters,
    rng: &mut R,
) -> Option<usize> {
    if proposals.is_empty() {
        return None;
    }

    if let Some(speaker) = current {
        if let Some(index) = proposals.iter().position(|p| p.player == speaker) {
            if rng.gen_bool(CURRENT_SPEAKER_EDGE) {
                return Some(index);
            }
        }
    }

    let min_count = proposals.iter().map(|p| counters.get(p.player)).min()?;
    let tier: Vec<usize> = proposals
        .iter()
        .enumerate()
        .filter(|(_, p)| counters.get(p.player) == min_count)
        .map(|(i, _)| i)
        .collect();
    tier.choose(rng).copied()
}

/// Estimated probability that `me` wins the next turn if it proposes,
/// given the slots so far and `players` seats in total.
///
/// Every rival is assumed to propose independently with probability
/// `proposal_rate`. With `lower` rivals below our count and `equal` rivals
/// level with us, the fairness branch wins with
/// `(1 - q)^lower * E[1 / (1 + K)]`, `K ~ Binomial(equal, q)`.
/// The current-speaker edge is layered on top.
pub fn win_probability(me: PlayerId, slots: &[Slot], players: usize, proposal_rate: f64) -> f64 {
    let q = proposal_rate.clamp(0.0, 1.0);
    let counts = contributions(slots);
    let own = counts.get(&me).copied().unwrap_or(0);

    let rivals = players.saturating_sub(1);
    let spoken_rivals: Vec<usize> = counts
        .iter()
        .filter(|(p, _)| **p != me)
        .map(|(_, c)| *c)
        .collect();
    let silent_rivals = rivals.saturating_sub(spoken_rivals.len());

    let mut lower = spoken_rivals.iter().filter(|c| **c < own).count();
    let mut equal = spoken_rivals.iter().filter(|c| **c == own).count();
    if own == 0 {
        equal += silent_rivals;
    } else {
        lower += silent_rivals;
    }

    let no_lower = (1.0 - q).powi(lower as i32);
    let share = if equal == 0 || q == 0.0 {
        1.0
    } else {
        let n = (equal + 1) as f64;
        (1.0 - (1.0 - q).powi(equal as i32 + 1)) / (n * q)
    };
    let fair = no_lower * share;

    let p = match current_speaker(slots) {
        Some(speaker) if speaker == me => CURRENT_SPEAKER_EDGE + (1.0 - CURRENT_SPEAKER_EDGE) * fair,
        Some(_) if rivals > 0 => (1.0 - CURRENT_SPEAKER_EDGE * q) * fair,
        _ => fair,
    };
    p.clamp(MIN_WIN_PROBABILITY, 1.0)
}
