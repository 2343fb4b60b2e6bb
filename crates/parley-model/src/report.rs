//! Score and Report Types
//!
//! Running score components and the read-only report handed to external
//! collaborators once a conversation ends.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Sub};

use crate::log::ConversationLog;
use crate::player::PlayerId;

/// The four shared-score components, tracked separately for reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub importance: f64,
    pub coherence: f64,
    pub freshness: f64,
    pub nonmonotonousness: f64,
}

impl ScoreBreakdown {
    /// Sum of all components.
    pub fn total(&self) -> f64 {
        self.importance + self.coherence + self.freshness + self.nonmonotonousness
    }

    /// Every component divided by `length`.
    pub fn per_turn(&self, length: usize) -> ScoreBreakdown {
        let n = length.max(1) as f64;
        ScoreBreakdown {
            importance: self.importance / n,
            coherence: self.coherence / n,
            freshness: self.freshness / n,
            nonmonotonousness: self.nonmonotonousness / n,
        }
    }
}

impl Add for ScoreBreakdown {
    type Output = ScoreBreakdown;

    fn add(self, rhs: ScoreBreakdown) -> ScoreBreakdown {
        ScoreBreakdown {
            importance: self.importance + rhs.importance,
            coherence: self.coherence + rhs.coherence,
            freshness: self.freshness + rhs.freshness,
            nonmonotonousness: self.nonmonotonousness + rhs.nonmonotonousness,
        }
    }
}

impl AddAssign for ScoreBreakdown {
    fn add_assign(&mut self, rhs: ScoreBreakdown) {
        *self = *self + rhs;
    }
}

impl Sub for ScoreBreakdown {
    type Output = ScoreBreakdown;

    fn sub(self, rhs: ScoreBreakdown) -> ScoreBreakdown {
        ScoreBreakdown {
            importance: self.importance - rhs.importance,
            coherence: self.coherence - rhs.coherence,
            freshness: self.freshness - rhs.freshness,
            nonmonotonousness: self.nonmonotonousness - rhs.nonmonotonousness,
        }
    }
}

/// Final standing of one player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerTotals {
    pub id: PlayerId,
    /// Strategy label, e.g. `random` or `bst_medium`
    pub label: String,
    /// Turns won
    pub contributions: usize,
    /// Sum of individual bonuses for items this player finalized
    pub individual: f64,
    /// Shared score of the whole conversation (same for every player)
    pub shared: f64,
    /// `shared + individual`
    pub total: f64,
    /// `total / L`
    pub quality: f64,
    /// Shared components of the slots this player spoke, on the final log
    pub contributed: ScoreBreakdown,
}

/// Everything an external collaborator needs once a conversation ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalReport {
    pub seed: u64,
    /// Configured maximum length L
    pub length: usize,
    /// Slots actually appended
    pub actual_length: usize,
    /// True when three consecutive pauses ended the run before L
    pub terminated_early: bool,
    pub pauses: usize,
    pub log: ConversationLog,
    pub shared: ScoreBreakdown,
    pub players: Vec<PlayerTotals>,
}

impl FinalReport {
    pub fn player(&self, id: PlayerId) -> Option<&PlayerTotals> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Serializes the report as pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakdown_arithmetic() {
        let a = ScoreBreakdown {
            importance: 1.5,
            coherence: -1.0,
            freshness: 2.0,
            nonmonotonousness: -1.0,
        };
        let b = ScoreBreakdown {
            importance: 0.5,
            ..Default::default()
        };

        assert!((a.total() - 1.5).abs() < 1e-12);
        assert_eq!((a + b).importance, 2.0);
        assert_eq!((a + b - b), a);

        let mut c = ScoreBreakdown::default();
        c += a;
        assert_eq!(c, a);
    }

    #[test]
    fn test_per_turn_guards_zero_length() {
        let a = ScoreBreakdown {
            importance: 4.0,
            ..Default::default()
        };
        assert_eq!(a.per_turn(0).importance, 4.0);
        assert_eq!(a.per_turn(4).importance, 1.0);
    }
}
