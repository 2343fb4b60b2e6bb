//! Scoring Engine
//!
//! Pure functions computing shared-score components and individual bonuses
//! over a slice of slots. Both the engine and the planner score through this
//! module, so there is exactly one definition of every rule.
//!
//! Appending a slot can change the coherence of up to [`WINDOW_RADIUS`]
//! earlier items, because their forward window grows. [`append_delta`]
//! captures the full effect of one append; summing it over every append
//! telescopes to [`score_log`] of the final log.

pub mod ledger;
pub mod rules;
pub mod window;

pub use ledger::ScoreLedger;
pub use rules::{
    coherence, freshness, importance, individual_bonus, nonmonotonousness, score_slot,
    subject_bonus, FRESHNESS_LOOKBACK, MONOTONY_RUN,
};
pub use window::{context_window, is_repeat, preceding_run, WINDOW_RADIUS};

use std::collections::BTreeMap;

use parley_model::{PlayerId, ScoreBreakdown, Slot};

/// Shared score of a complete log: every slot scored with full windows.
pub fn score_log(slots: &[Slot]) -> ScoreBreakdown {
    (0..slots.len()).fold(ScoreBreakdown::default(), |acc, i| acc + score_slot(slots, i))
}

/// Change in the shared score caused by the last slot of `slots`.
///
/// This is the last slot's own components, plus the coherence revisions of
/// earlier items whose forward window now includes it. Returns zero for an
/// empty slice.
pub fn append_delta(slots: &[Slot]) -> ScoreBreakdown {
    let Some(last) = slots.len().checked_sub(1) else {
        return ScoreBreakdown::default();
    };
    let before = &slots[..last];

    let mut delta = score_slot(slots, last);
    if slots[last].is_pause() {
        return delta;
    }
    for j in last.saturating_sub(WINDOW_RADIUS)..last {
        delta.coherence += coherence(slots, j) - coherence(before, j);
    }
    delta
}

/// Shared components of the slots each speaker won, evaluated on the final log.
pub fn contributed_by_speaker(slots: &[Slot]) -> BTreeMap<PlayerId, ScoreBreakdown> {
    let mut contributed: BTreeMap<PlayerId, ScoreBreakdown> = BTreeMap::new();
    for (i, slot) in slots.iter().enumerate() {
        if let Some(speaker) = slot.speaker() {
            *contributed.entry(speaker).or_default() += score_slot(slots, i);
        }
    }
    contributed
}
