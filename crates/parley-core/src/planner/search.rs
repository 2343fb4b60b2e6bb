//! Beam search over hypothetical own contributions.
//!
//! Level by level, every frontier node is expanded with the player's unsaid
//! items. Each child is scored with the shared append delta and the player's
//! individual bonus, weighted by the estimated chance of actually winning
//! that turn. Only the best `breadth` children of a level stay in the beam.

use parley_model::{Item, PlayerId, Slot};

use super::tree::PlanTree;
use super::{blended_value, NodeId, PlanOutcome, PlannerConfig};
use crate::players::TurnView;
use crate::scheduler::win_probability;

pub(crate) struct BeamSearch<'a, 'v> {
    config: &'a PlannerConfig,
    turn: &'a TurnView<'v>,
    tree: PlanTree,
}

impl<'a, 'v> BeamSearch<'a, 'v> {
    pub(crate) fn new(config: &'a PlannerConfig, turn: &'a TurnView<'v>) -> Self {
        Self {
            config,
            turn,
            tree: PlanTree::new(),
        }
    }

    pub(crate) fn run(mut self) -> Option<PlanOutcome> {
        let mut frontier: Vec<Option<NodeId>> = vec![None];

        for _ in 0..self.config.depth {
            let mut level = Vec::new();
            for parent in &frontier {
                level.extend(self.expand(*parent));
            }
            if level.is_empty() {
                break;
            }
            frontier = self
                .tree
                .retain_top(level, self.config.breadth)
                .into_iter()
                .map(Some)
                .collect();
        }

        let (branch, value) = self.tree.best_branch()?;
        let node = self.tree.get(branch);
        Some(PlanOutcome {
            item: node.item,
            value,
            immediate: node.value,
            nodes: self.tree.len(),
        })
    }

    /// Adds the best `breadth` children of `parent` and returns their ids.
    fn expand(&mut self, parent: Option<NodeId>) -> Vec<NodeId> {
        let me = self.turn.me;
        let path = self.tree.path_items(parent);

        let mut scratch: Vec<Slot> = self.turn.slots().to_vec();
        scratch.extend(path.iter().map(|item| Slot::spoken(me, *item)));
        let prior = win_probability(
            me,
            &scratch,
            self.turn.context.players,
            self.config.rival_proposal_rate,
        );

        let mut scored: Vec<(Item, f64)> = self
            .turn
            .unsaid()
            .filter(|item| !path.iter().any(|p| p.same_as(item)))
            .map(|item| (*item, self.value_of(&mut scratch, me, item)))
            .collect();

        scored.sort_by(|(a, va), (b, vb)| {
            vb.total_cmp(va)
                .then(b.importance.total_cmp(&a.importance))
                .then(a.id.cmp(&b.id))
        });
        scored.truncate(self.config.breadth);

        scored
            .into_iter()
            .map(|(item, value)| self.tree.add_child(parent, item, prior, value))
            .collect()
    }

    fn value_of(&self, scratch: &mut Vec<Slot>, me: PlayerId, item: &Item) -> f64 {
        scratch.push(Slot::spoken(me, *item));
        let value = blended_value(scratch, self.turn.ranking, self.config.competition_rate);
        scratch.pop();
        value
    }
}
