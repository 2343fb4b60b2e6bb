//! Player Capability Contract
//!
//! Every strategy implements [`Player`]: given a read-only view of the turn,
//! propose one item from its own memory or stay silent. Players are built by
//! a [`PlayerFactory`] once the engine has generated their memory and ranking.

pub mod search;
pub mod simple;
pub mod zipper;

use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use parley_model::{ConversationLog, Item, MemoryBank, PlayerId, PreferenceRanking, Slot};

use crate::error::ConfigurationError;
use crate::planner::PlannerConfig;

pub use search::{SearchPlayer, ThresholdPolicy};
pub use simple::{PausePlayer, RandomPausePlayer, RandomPlayer};
pub use zipper::ZipperPlayer;

/// Default assumed rate at which each rival proposes on a turn.
pub const DEFAULT_RIVAL_PROPOSAL_RATE: f64 = 0.75;

/// Conversation-wide parameters every player may read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameContext {
    /// Number of seats
    pub players: usize,
    /// Configured maximum length L
    pub length: usize,
    /// Subject universe size S
    pub subjects: usize,
}

/// Read-only view of one turn, lent to a player for its proposal.
#[derive(Debug, Clone, Copy)]
pub struct TurnView<'a> {
    pub me: PlayerId,
    pub log: &'a ConversationLog,
    pub memory: &'a MemoryBank,
    pub ranking: &'a PreferenceRanking,
    pub context: GameContext,
}

impl<'a> TurnView<'a> {
    pub fn slots(&self) -> &'a [Slot] {
        self.log.slots()
    }

    /// Memory items not yet said by anyone.
    pub fn unsaid(&self) -> impl Iterator<Item = &'a Item> + 'a {
        let log = self.log;
        self.memory.iter().filter(move |item| !log.has_said(item.id))
    }
}

/// A conversation participant.
///
/// Implementations may keep private state across turns but never share
/// mutable state with other instances.
pub trait Player {
    /// Short strategy name used in reports.
    fn label(&self) -> &str;

    /// Proposes an item from `turn.memory`, or `None` to stay silent.
    fn propose(&mut self, turn: &TurnView<'_>, rng: &mut dyn RngCore) -> Option<Item>;
}

/// What a factory sees when building the player for one seat.
#[derive(Debug, Clone, Copy)]
pub struct PlayerSetup<'a> {
    pub id: PlayerId,
    pub context: GameContext,
    pub memory: &'a MemoryBank,
    pub ranking: &'a PreferenceRanking,
}

/// Builds a player for a seat.
pub trait PlayerFactory {
    fn build(&self, setup: &PlayerSetup<'_>) -> Result<Box<dyn Player>, ConfigurationError>;
}

impl<F> PlayerFactory for F
where
    F: Fn(&PlayerSetup<'_>) -> Box<dyn Player>,
{
    fn build(&self, setup: &PlayerSetup<'_>) -> Result<Box<dyn Player>, ConfigurationError> {
        Ok(self(setup))
    }
}

/// Fixes a closure's signature so it can serve as a [`PlayerFactory`].
pub fn factory_fn<F>(f: F) -> F
where
    F: Fn(&PlayerSetup<'_>) -> Box<dyn Player>,
{
    f
}

/// One seat of the roster: a unique id and the factory for its player.
pub struct RosterEntry {
    pub id: PlayerId,
    pub factory: Box<dyn PlayerFactory>,
}

impl RosterEntry {
    pub fn new(id: PlayerId, factory: impl PlayerFactory + 'static) -> Self {
        Self {
            id,
            factory: Box::new(factory),
        }
    }
}

impl fmt::Debug for RosterEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RosterEntry").field("id", &self.id).finish()
    }
}

/// Named strategies available from configuration and the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerKind {
    Random,
    RandomPause,
    Pause,
    Zipper,
    BalancedGreedy,
    SelflessGreedy,
    SelfishGreedy,
    BstLow,
    BstMedium,
    BstHigh,
    BstDynamic,
    BstDynamicWidth,
    BstDynamicDepth,
    BstDynamicHigh,
}

impl PlayerKind {
    pub const ALL: [PlayerKind; 14] = [
        PlayerKind::Random,
        PlayerKind::RandomPause,
        PlayerKind::Pause,
        PlayerKind::Zipper,
        PlayerKind::BalancedGreedy,
        PlayerKind::SelflessGreedy,
        PlayerKind::SelfishGreedy,
        PlayerKind::BstLow,
        PlayerKind::BstMedium,
        PlayerKind::BstHigh,
        PlayerKind::BstDynamic,
        PlayerKind::BstDynamicWidth,
        PlayerKind::BstDynamicDepth,
        PlayerKind::BstDynamicHigh,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PlayerKind::Random => "random",
            PlayerKind::RandomPause => "random_pause",
            PlayerKind::Pause => "pause",
            PlayerKind::Zipper => "zipper",
            PlayerKind::BalancedGreedy => "balanced_greedy",
            PlayerKind::SelflessGreedy => "selfless_greedy",
            PlayerKind::SelfishGreedy => "selfish_greedy",
            PlayerKind::BstLow => "bst_low",
            PlayerKind::BstMedium => "bst_medium",
            PlayerKind::BstHigh => "bst_high",
            PlayerKind::BstDynamic => "bst_dynamic",
            PlayerKind::BstDynamicWidth => "bst_dynamic_width",
            PlayerKind::BstDynamicDepth => "bst_dynamic_depth",
            PlayerKind::BstDynamicHigh => "bst_dynamic_high",
        }
    }

    /// Factory for this kind with an explicit rival proposal rate for the planner.
    pub fn with_proposal_rate(self, rival_proposal_rate: f64) -> KindFactory {
        KindFactory {
            kind: self,
            rival_proposal_rate,
        }
    }
}

impl fmt::Display for PlayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PlayerKind {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PlayerKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| ConfigurationError::UnknownPlayerKind(s.to_string()))
    }
}

impl PlayerFactory for PlayerKind {
    fn build(&self, setup: &PlayerSetup<'_>) -> Result<Box<dyn Player>, ConfigurationError> {
        self.with_proposal_rate(DEFAULT_RIVAL_PROPOSAL_RATE).build(setup)
    }
}

/// A [`PlayerKind`] bound to the planner's rival model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KindFactory {
    pub kind: PlayerKind,
    pub rival_proposal_rate: f64,
}

impl PlayerFactory for KindFactory {
    fn build(&self, setup: &PlayerSetup<'_>) -> Result<Box<dyn Player>, ConfigurationError> {
        let label = self.kind.name();
        let memory = setup.memory.len();
        let q = self.rival_proposal_rate;

        let planned = |config: PlannerConfig, threshold: ThresholdPolicy| {
            SearchPlayer::new(label, config, threshold).map(|p| Box::new(p) as Box<dyn Player>)
        };

        match self.kind {
            PlayerKind::Random => Ok(Box::new(RandomPlayer::new())),
            PlayerKind::RandomPause => Ok(Box::new(RandomPausePlayer::new())),
            PlayerKind::Pause => Ok(Box::new(PausePlayer::new())),
            PlayerKind::Zipper => Ok(Box::new(ZipperPlayer::new(setup.memory, setup.ranking))),
            PlayerKind::BalancedGreedy => planned(
                PlannerConfig::greedy(memory, 0.5, q),
                ThresholdPolicy::Static(0.5),
            ),
            PlayerKind::SelflessGreedy => {
                planned(PlannerConfig::greedy(memory, 0.0, q), ThresholdPolicy::dynamic())
            }
            PlayerKind::SelfishGreedy => {
                planned(PlannerConfig::greedy(memory, 1.0, q), ThresholdPolicy::dynamic())
            }
            PlayerKind::BstLow => planned(PlannerConfig::fixed(2, 4, q), ThresholdPolicy::Static(0.0)),
            PlayerKind::BstMedium => {
                planned(PlannerConfig::fixed(3, 16, q), ThresholdPolicy::Static(0.0))
            }
            PlayerKind::BstHigh => {
                planned(PlannerConfig::fixed(6, 128, q), ThresholdPolicy::Static(0.0))
            }
            PlayerKind::BstDynamic => planned(
                PlannerConfig::scaled(3, 0.5, memory, q),
                ThresholdPolicy::Static(0.0),
            ),
            PlayerKind::BstDynamicWidth => planned(
                PlannerConfig::scaled(3, 4.0, memory, q),
                ThresholdPolicy::Static(0.0),
            ),
            PlayerKind::BstDynamicDepth => planned(
                PlannerConfig::scaled(6, 0.5, memory, q),
                ThresholdPolicy::Static(0.0),
            ),
            PlayerKind::BstDynamicHigh => planned(
                PlannerConfig::scaled(6, 8.0, memory, q),
                ThresholdPolicy::Static(0.0),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_model::fixtures::identity_ranking;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_kind_names_round_trip() {
        for kind in PlayerKind::ALL {
            assert_eq!(kind.name().parse::<PlayerKind>().unwrap(), kind);
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.name()));
        }
    }

    #[test]
    fn test_unknown_kind() {
        let err = "chatty".parse::<PlayerKind>().unwrap_err();
        assert_eq!(err, ConfigurationError::UnknownPlayerKind("chatty".into()));
    }

    #[test]
    fn test_every_kind_builds() {
        let mut rng = SmallRng::seed_from_u64(5);
        let memory = MemoryBank::generate(PlayerId(0), 8, 6, &mut rng);
        let ranking = identity_ranking(8);
        let setup = PlayerSetup {
            id: PlayerId(0),
            context: GameContext {
                players: 2,
                length: 5,
                subjects: 8,
            },
            memory: &memory,
            ranking: &ranking,
        };

        for kind in PlayerKind::ALL {
            let player = kind.build(&setup).unwrap();
            assert_eq!(player.label(), kind.name());
        }
    }

    #[test]
    fn test_closure_factory() {
        let factory = factory_fn(|_| Box::new(PausePlayer::new()) as Box<dyn Player>);
        let memory = MemoryBank::default();
        let ranking = identity_ranking(1);
        let setup = PlayerSetup {
            id: PlayerId(3),
            context: GameContext {
                players: 1,
                length: 1,
                subjects: 1,
            },
            memory: &memory,
            ranking: &ranking,
        };
        assert_eq!(factory.build(&setup).unwrap().label(), "pause");
    }
}
