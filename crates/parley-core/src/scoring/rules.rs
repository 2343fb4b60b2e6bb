//! Scoring Rules
//!
//! One function per shared-score component, each evaluated for the slot at
//! `index` against the slice it is given. The end of the slice is the end of
//! the conversation as far as the rule is concerned.

use parley_model::{Item, PreferenceRanking, ScoreBreakdown, Slot, Subject};

use super::window::{context_window, is_repeat, preceding_run};

/// Slots before a pause inspected for freshness.
pub const FRESHNESS_LOOKBACK: usize = 5;

/// Consecutive prior items that must share a subject for the monotony penalty.
pub const MONOTONY_RUN: usize = 3;

/// Importance of the item at `index`, zero for a repeat or a pause.
pub fn importance(slots: &[Slot], index: usize) -> f64 {
    match slots.get(index).and_then(Slot::item) {
        Some(item) if !is_repeat(slots, index) => item.importance,
        _ => 0.0,
    }
}

/// Coherence of the item at `index`: -1 if a subject is never mentioned in
/// its window, +1 if every subject is mentioned at least twice, else 0.
///
/// Repeats are not evaluated, but still count as mentions inside the windows
/// of other items.
pub fn coherence(slots: &[Slot], index: usize) -> f64 {
    let Some(item) = slots.get(index).and_then(Slot::item) else {
        return 0.0;
    };
    if is_repeat(slots, index) {
        return 0.0;
    }

    let window = context_window(slots, index);
    let mentions = |subject: Subject| window.iter().filter(|other| other.mentions(subject)).count();

    if item.subjects.iter().any(|s| mentions(s) == 0) {
        -1.0
    } else if item.subjects.iter().all(|s| mentions(s) >= 2) {
        1.0
    } else {
        0.0
    }
}

/// Freshness of the item at `index`: +1 per subject absent from the
/// [`FRESHNESS_LOOKBACK`] slots before the pause that directly precedes it.
/// Zero unless the previous slot is a pause, and zero for a repeat.
pub fn freshness(slots: &[Slot], index: usize) -> f64 {
    let Some(item) = slots.get(index).and_then(Slot::item) else {
        return 0.0;
    };
    if index == 0 || !slots[index - 1].is_pause() || is_repeat(slots, index) {
        return 0.0;
    }

    let pause = index - 1;
    let recent = &slots[pause.saturating_sub(FRESHNESS_LOOKBACK)..pause];
    let novel = item
        .subjects
        .iter()
        .filter(|s| !recent.iter().filter_map(Slot::item).any(|other| other.mentions(*s)))
        .count();
    novel as f64
}

/// Nonmonotonousness of the item at `index`: -1 if one of its subjects
/// appears in each of the previous [`MONOTONY_RUN`] items with no pause in
/// between, or if the item is a repeat. At most one point per item.
pub fn nonmonotonousness(slots: &[Slot], index: usize) -> f64 {
    let Some(item) = slots.get(index).and_then(Slot::item) else {
        return 0.0;
    };
    if is_repeat(slots, index) {
        return -1.0;
    }

    let run = preceding_run(slots, index, MONOTONY_RUN);
    if run.len() < MONOTONY_RUN {
        return 0.0;
    }
    let monotone = item
        .subjects
        .iter()
        .any(|s| run.iter().all(|other| other.mentions(s)));
    if monotone {
        -1.0
    } else {
        0.0
    }
}

/// All shared components of the slot at `index`. Pauses score zero.
pub fn score_slot(slots: &[Slot], index: usize) -> ScoreBreakdown {
    ScoreBreakdown {
        importance: importance(slots, index),
        coherence: coherence(slots, index),
        freshness: freshness(slots, index),
        nonmonotonousness: nonmonotonousness(slots, index),
    }
}

/// Bonus for one subject at the contributor's 1-based rank `k`: `(1 - k) / S`.
pub fn subject_bonus(rank: usize, subjects_count: usize) -> f64 {
    (1.0 - rank as f64) / subjects_count.max(1) as f64
}

/// Individual bonus of `item` for a contributor with `ranking`: the mean of
/// the per-subject bonuses. Subjects the ranking does not know are skipped.
pub fn individual_bonus(item: &Item, ranking: &PreferenceRanking) -> f64 {
    let bonuses: Vec<f64> = item
        .subjects
        .iter()
        .filter_map(|s| ranking.rank(s))
        .map(|rank| subject_bonus(rank, ranking.len()))
        .collect();
    if bonuses.is_empty() {
        0.0
    } else {
        bonuses.iter().sum::<f64>() / bonuses.len() as f64
    }
}
