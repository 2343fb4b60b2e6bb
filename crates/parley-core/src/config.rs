//! Configuration loading for simulation runs.
//!
//! Settings come from an optional TOML file; every field has a default so a
//! partial file (or none at all) is valid.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use parley_model::PlayerId;

use crate::engine::ConversationConfig;
use crate::error::ConfigurationError;
use crate::players::{PlayerKind, RosterEntry, DEFAULT_RIVAL_PROPOSAL_RATE};

/// Complete run configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Conversations to play; round `r` uses seed `seed + r`
    pub rounds: usize,
    /// Size and seed of each conversation
    pub conversation: ConversationConfig,
    /// Planner assumptions shared by every search player
    pub planner: PlannerSettings,
    /// Seats by strategy, dealt ids in listed order
    pub roster: Vec<RosterSpec>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            rounds: 1,
            conversation: ConversationConfig::default(),
            planner: PlannerSettings::default(),
            roster: vec![
                RosterSpec {
                    kind: PlayerKind::Random,
                    count: 2,
                },
                RosterSpec {
                    kind: PlayerKind::Pause,
                    count: 1,
                },
            ],
        }
    }
}

/// `count` seats played by `kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterSpec {
    pub kind: PlayerKind,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerSettings {
    /// Assumed chance that each rival proposes on a turn
    pub rival_proposal_rate: f64,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            rival_proposal_rate: DEFAULT_RIVAL_PROPOSAL_RATE,
        }
    }
}

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

impl SimConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parses configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Conversation settings for round `round`.
    pub fn conversation_for_round(&self, round: usize) -> ConversationConfig {
        ConversationConfig {
            seed: self.conversation.seed.wrapping_add(round as u64),
            ..self.conversation
        }
    }

    /// Expands the roster into seats with ids `0, 1, 2, ...`.
    pub fn roster_entries(&self) -> Result<Vec<RosterEntry>, ConfigurationError> {
        let rate = self.planner.rival_proposal_rate;
        if !(0.0..=1.0).contains(&rate) {
            return Err(ConfigurationError::InvalidProposalRate(rate));
        }

        let entries: Vec<RosterEntry> = self
            .roster
            .iter()
            .flat_map(|spec| std::iter::repeat(spec.kind).take(spec.count))
            .enumerate()
            .map(|(i, kind)| RosterEntry::new(PlayerId(i as u32), kind.with_proposal_rate(rate)))
            .collect();
        if entries.is_empty() {
            return Err(ConfigurationError::EmptyRoster);
        }
        Ok(entries)
    }

    /// Strategy of every seat, in seat order.
    pub fn seat_kinds(&self) -> Vec<PlayerKind> {
        self.roster
            .iter()
            .flat_map(|spec| std::iter::repeat(spec.kind).take(spec.count))
            .collect()
    }
}

/// Commented default configuration file content.
pub fn default_config_toml() -> String {
    r#"# Conversation simulation configuration

rounds = 1

[conversation]
subjects = 20
memory_size = 10
length = 10
seed = 91

[planner]
rival_proposal_rate = 0.75

[[roster]]
kind = "random"
count = 2

[[roster]]
kind = "pause"
count = 1
"#
    .to_string()
}
