//! Running score accumulators owned by the engine.

use parley_model::{PlayerId, ScoreBreakdown, Slot};
use std::collections::BTreeMap;

use super::append_delta;

/// Running shared-score components and per-player individual totals.
///
/// The engine records every slot right after appending it. Coherence
/// revisions of earlier items are folded in as they happen, so the running
/// totals equal a full recomputation over the log at every point.
#[derive(Debug, Clone, Default)]
pub struct ScoreLedger {
    shared: ScoreBreakdown,
    individual: BTreeMap<PlayerId, f64>,
}

impl ScoreLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds in the last slot of `slots`, plus `bonus` for its speaker.
    pub fn record(&mut self, slots: &[Slot], bonus: f64) -> ScoreBreakdown {
        let delta = append_delta(slots);
        self.shared += delta;
        if let Some(speaker) = slots.last().and_then(Slot::speaker) {
            *self.individual.entry(speaker).or_insert(0.0) += bonus;
        }
        delta
    }

    pub fn shared(&self) -> ScoreBreakdown {
        self.shared
    }

    /// Individual total of `player`, zero if they never spoke.
    pub fn individual(&self, player: PlayerId) -> f64 {
        self.individual.get(&player).copied().unwrap_or(0.0)
    }
}
