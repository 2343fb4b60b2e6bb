//! Planner-driven strategies
//!
//! Greedy and beam-search players share one implementation: plan the best
//! item, then speak only if its value clears the proposal threshold.

use rand::RngCore;
use tracing::debug;

use parley_model::{Item, PreferenceRanking, Slot};

use super::{Player, TurnView};
use crate::error::ConfigurationError;
use crate::planner::{blended_value, Planner, PlannerConfig};

/// Weight of the newest sample in the dynamic threshold's moving average.
pub const THRESHOLD_DISCOUNT: f64 = 0.12;
/// Threshold used when the log has no spoken items yet.
pub const THRESHOLD_BASELINE: f64 = 0.45;
/// Share of the moving average in the blended threshold.
pub const THRESHOLD_BLEND: f64 = 0.6;
/// The dynamic threshold never exceeds this.
pub const THRESHOLD_CAP: f64 = 0.6;

/// When a planned item is worth saying.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThresholdPolicy {
    /// Speak when the plan value exceeds a constant.
    Static(f64),
    /// Speak when the plan value exceeds a moving average of how well recent
    /// items scored.
    Dynamic {
        discount: f64,
        baseline: f64,
        blend: f64,
        cap: f64,
    },
}

impl ThresholdPolicy {
    pub fn dynamic() -> Self {
        ThresholdPolicy::Dynamic {
            discount: THRESHOLD_DISCOUNT,
            baseline: THRESHOLD_BASELINE,
            blend: THRESHOLD_BLEND,
            cap: THRESHOLD_CAP,
        }
    }

    /// Threshold for the next proposal given the slots so far.
    pub fn threshold(&self, slots: &[Slot], ranking: &PreferenceRanking, competition_rate: f64) -> f64 {
        match *self {
            ThresholdPolicy::Static(t) => t,
            ThresholdPolicy::Dynamic {
                discount,
                baseline,
                blend,
                cap,
            } => {
                let horizon = if discount > 0.0 {
                    (10.0 / discount) as usize
                } else {
                    100
                };
                let start = slots.len().saturating_sub(horizon);

                let mut ema: Option<f64> = None;
                for i in start..slots.len() {
                    if slots[i].is_pause() {
                        continue;
                    }
                    let score = blended_value(&slots[..=i], ranking, competition_rate);
                    ema = Some(match ema {
                        Some(prev) => discount * score + (1.0 - discount) * prev,
                        None => score,
                    });
                }

                let average = ema.unwrap_or(baseline);
                (blend * average + (1.0 - blend) * baseline).min(cap)
            }
        }
    }
}

/// A player that proposes the planner's choice when it clears a threshold.
#[derive(Debug, Clone)]
pub struct SearchPlayer {
    label: String,
    planner: Planner,
    threshold: ThresholdPolicy,
}

impl SearchPlayer {
    pub fn new(
        label: impl Into<String>,
        config: PlannerConfig,
        threshold: ThresholdPolicy,
    ) -> Result<Self, ConfigurationError> {
        Ok(Self {
            label: label.into(),
            planner: Planner::new(config)?,
            threshold,
        })
    }
}

impl Player for SearchPlayer {
    fn label(&self) -> &str {
        &self.label
    }

    fn propose(&mut self, turn: &TurnView<'_>, _rng: &mut dyn RngCore) -> Option<Item> {
        let plan = self.planner.plan(turn)?;
        let threshold = self.threshold.threshold(
            turn.slots(),
            turn.ranking,
            self.planner.config().competition_rate,
        );

        if plan.value > threshold {
            debug!(
                player = %turn.me,
                item = %plan.item.id,
                value = plan.value,
                threshold,
                nodes = plan.nodes,
                "proposing planned item"
            );
            Some(plan.item)
        } else {
            debug!(
                player = %turn.me,
                value = plan.value,
                threshold,
                nodes = plan.nodes,
                "holding back"
            );
            None
        }
    }
}
