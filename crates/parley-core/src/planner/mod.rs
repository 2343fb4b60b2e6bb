//! Beam-Search Planner
//!
//! Picks the item an advanced player should propose this turn by looking
//! ahead over `depth` hypothetical own turns, keeping `breadth` nodes per
//! level. The tree is an arena of [`PlanNode`]s addressed by [`NodeId`].
//!
//! Evaluation is sequential and draws no randomness, so a plan is a pure
//! function of the turn view and the configuration.

pub mod node;
mod search;
pub mod tree;

pub use node::{NodeId, PlanNode};
pub use tree::PlanTree;

use tracing::trace;

use parley_model::{Item, PreferenceRanking, Slot};

use crate::error::ConfigurationError;
use crate::players::{TurnView, DEFAULT_RIVAL_PROPOSAL_RATE};
use crate::scoring::{append_delta, individual_bonus};
use search::BeamSearch;

/// Default weight of the individual bonus in a node value.
pub const DEFAULT_COMPETITION_RATE: f64 = 0.5;

/// Search shape and value blend for one planner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannerConfig {
    /// Number of hypothetical own turns to look ahead
    pub depth: usize,
    /// Nodes kept per node expansion and per level
    pub breadth: usize,
    /// 0.0 values only the shared score, 1.0 only the individual bonus
    pub competition_rate: f64,
    /// Assumed chance that each rival proposes on a turn
    pub rival_proposal_rate: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            depth: 3,
            breadth: 16,
            competition_rate: DEFAULT_COMPETITION_RATE,
            rival_proposal_rate: DEFAULT_RIVAL_PROPOSAL_RATE,
        }
    }
}

impl PlannerConfig {
    /// Fixed depth and breadth.
    pub fn fixed(depth: usize, breadth: usize, rival_proposal_rate: f64) -> Self {
        Self {
            depth,
            breadth,
            rival_proposal_rate,
            ..Self::default()
        }
    }

    /// Breadth scaled with the memory size: `max(1, floor(rate * memory_size))`.
    pub fn scaled(depth: usize, breadth_rate: f64, memory_size: usize, rival_proposal_rate: f64) -> Self {
        let breadth = ((breadth_rate * memory_size as f64).floor() as usize).max(1);
        Self::fixed(depth, breadth, rival_proposal_rate)
    }

    /// One-step lookahead over the whole memory.
    pub fn greedy(memory_size: usize, competition_rate: f64, rival_proposal_rate: f64) -> Self {
        Self {
            competition_rate,
            ..Self::fixed(1, memory_size.max(1), rival_proposal_rate)
        }
    }

    pub fn with_competition_rate(self, competition_rate: f64) -> Self {
        Self {
            competition_rate,
            ..self
        }
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.depth == 0 || self.breadth == 0 {
            return Err(ConfigurationError::InvalidBreadth {
                breadth: self.breadth,
                depth: self.depth,
            });
        }
        if !(0.0..=1.0).contains(&self.competition_rate) {
            return Err(ConfigurationError::InvalidCompetitionRate(self.competition_rate));
        }
        if !(0.0..=1.0).contains(&self.rival_proposal_rate) {
            return Err(ConfigurationError::InvalidProposalRate(self.rival_proposal_rate));
        }
        Ok(())
    }
}

/// The planner's choice for this turn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanOutcome {
    pub item: Item,
    /// Best normalized path value in the chosen item's subtree
    pub value: f64,
    /// Blended value of saying the item right now
    pub immediate: f64,
    /// Nodes allocated during the search
    pub nodes: usize,
}

#[derive(Debug, Clone)]
pub struct Planner {
    config: PlannerConfig,
}

impl Planner {
    pub fn new(config: PlannerConfig) -> Result<Self, ConfigurationError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Best first item for `turn`, or `None` when no unsaid item remains.
    pub fn plan(&self, turn: &TurnView<'_>) -> Option<PlanOutcome> {
        let outcome = BeamSearch::new(&self.config, turn).run();
        if let Some(plan) = &outcome {
            trace!(
                player = %turn.me,
                item = %plan.item.id,
                value = plan.value,
                nodes = plan.nodes,
                "plan ready"
            );
        }
        outcome
    }
}

/// Blended value of the last slot of `slots` for a contributor with `ranking`:
/// `(1 - c) * shared delta + c * individual bonus`. Zero for a pause.
pub fn blended_value(slots: &[Slot], ranking: &PreferenceRanking, competition_rate: f64) -> f64 {
    let Some(item) = slots.last().and_then(Slot::item) else {
        return 0.0;
    };
    let shared = append_delta(slots).total();
    let individual = individual_bonus(item, ranking);
    (1.0 - competition_rate) * shared + competition_rate * individual
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::players::GameContext;
    use parley_model::fixtures::{identity_ranking, owned_by, single, LogBuilder};
    use parley_model::{ConversationLog, MemoryBank, PlayerId};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn view<'a>(
        log: &'a ConversationLog,
        memory: &'a MemoryBank,
        ranking: &'a PreferenceRanking,
    ) -> TurnView<'a> {
        TurnView {
            me: PlayerId(0),
            log,
            memory,
            ranking,
            context: GameContext {
                players: 3,
                length: 10,
                subjects: 6,
            },
        }
    }

    #[test]
    fn test_scaled_breadth() {
        assert_eq!(PlannerConfig::scaled(3, 0.5, 10, 0.75).breadth, 5);
        assert_eq!(PlannerConfig::scaled(3, 0.5, 1, 0.75).breadth, 1);
        assert_eq!(PlannerConfig::scaled(3, 4.0, 10, 0.75).breadth, 40);
        assert_eq!(PlannerConfig::greedy(7, 1.0, 0.75).breadth, 7);
    }

    #[test]
    fn test_validate() {
        assert!(Planner::new(PlannerConfig::fixed(0, 4, 0.75)).is_err());
        assert_eq!(
            PlannerConfig::default().with_competition_rate(1.5).validate(),
            Err(ConfigurationError::InvalidCompetitionRate(1.5))
        );
        assert!(PlannerConfig::fixed(2, 4, 2.0).validate().is_err());
    }

    #[test]
    fn test_empty_memory_yields_none() {
        let log = ConversationLog::new();
        let memory = MemoryBank::default();
        let ranking = identity_ranking(6);
        let planner = Planner::new(PlannerConfig::default()).unwrap();
        assert!(planner.plan(&view(&log, &memory, &ranking)).is_none());
    }

    #[test]
    fn test_exhausted_memory_yields_none() {
        let item = single(1, 2, 0.5);
        let log = LogBuilder::new().say(0, item).build_log();
        let memory = MemoryBank::new(vec![item]);
        let ranking = identity_ranking(6);
        let planner = Planner::new(PlannerConfig::default()).unwrap();
        assert!(planner.plan(&view(&log, &memory, &ranking)).is_none());
    }

    #[test]
    fn test_greedy_prefers_coherent_item() {
        // The log talks about subject 3; a subject-3 item keeps coherence at 0
        // for the new item and lifts the earlier one, while subject 5 is -1.
        let log = LogBuilder::new()
            .say(1, owned_by(single(50, 3, 0.2), 1))
            .build_log();
        let memory = MemoryBank::new(vec![single(1, 5, 0.5), single(2, 3, 0.5)]);
        let ranking = identity_ranking(6);
        let planner = Planner::new(PlannerConfig::greedy(2, 0.0, 0.75)).unwrap();

        let plan = planner.plan(&view(&log, &memory, &ranking)).unwrap();
        assert_eq!(plan.item.id.0.as_u128(), 2);
    }

    #[test]
    fn test_selfish_prefers_favourite_subject() {
        let log = ConversationLog::new();
        let memory = MemoryBank::new(vec![single(1, 5, 0.9), single(2, 0, 0.1)]);
        let ranking = identity_ranking(6);
        let planner = Planner::new(PlannerConfig::greedy(2, 1.0, 0.75)).unwrap();

        let plan = planner.plan(&view(&log, &memory, &ranking)).unwrap();
        assert_eq!(plan.item.id.0.as_u128(), 2);
        assert_eq!(plan.immediate, 0.0);
    }

    #[test]
    fn test_plan_is_deterministic() {
        let mut rng = SmallRng::seed_from_u64(21);
        let memory = MemoryBank::generate(PlayerId(0), 6, 8, &mut rng);
        let ranking = PreferenceRanking::generate(6, &mut rng);
        let log = ConversationLog::new();
        let planner = Planner::new(PlannerConfig::fixed(3, 4, 0.75)).unwrap();

        let first = planner.plan(&view(&log, &memory, &ranking)).unwrap();
        let second = planner.plan(&view(&log, &memory, &ranking)).unwrap();
        assert_eq!(first, second);
        assert!(memory.holds(&first.item));
    }

    #[test]
    fn test_deeper_search_allocates_more_nodes() {
        let mut rng = SmallRng::seed_from_u64(22);
        let memory = MemoryBank::generate(PlayerId(0), 6, 8, &mut rng);
        let ranking = PreferenceRanking::generate(6, &mut rng);
        let log = ConversationLog::new();

        let shallow = Planner::new(PlannerConfig::fixed(1, 4, 0.75)).unwrap();
        let deep = Planner::new(PlannerConfig::fixed(3, 4, 0.75)).unwrap();
        let a = shallow.plan(&view(&log, &memory, &ranking)).unwrap();
        let b = deep.plan(&view(&log, &memory, &ranking)).unwrap();

        assert_eq!(a.nodes, 4);
        assert!(b.nodes > a.nodes);
    }

    #[test]
    fn test_blended_value_of_pause_is_zero() {
        let slots = LogBuilder::new().pause().build();
        assert_eq!(blended_value(&slots, &identity_ranking(3), 0.5), 0.0);
    }
}
