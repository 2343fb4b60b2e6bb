//! Plan tree with arena allocation.
//!
//! Nodes live in a contiguous Vec and are referenced by [`NodeId`]. The
//! actual conversation log is the implicit root; first-level nodes have no
//! parent.

use std::cmp::Ordering;

use parley_model::Item;

use super::node::{NodeId, PlanNode};

#[derive(Debug, Default)]
pub struct PlanTree {
    nodes: Vec<PlanNode>,
}

impl PlanTree {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &PlanNode {
        &self.nodes[id.0 as usize]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut PlanNode {
        &mut self.nodes[id.0 as usize]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Adds a node under `parent` (or at the first level) and folds its
    /// weighted value into the path sums. Returns the new node's id.
    pub fn add_child(&mut self, parent: Option<NodeId>, item: Item, prior: f64, value: f64) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        let (branch, depth, path_probability, weighted_sum, probability_sum) = match parent {
            Some(p) => {
                let up = self.get(p);
                let pi = up.path_probability * prior;
                (
                    up.branch,
                    up.depth + 1,
                    pi,
                    up.weighted_sum + pi * value,
                    up.probability_sum + pi,
                )
            }
            None => (id, 1, prior, prior * value, prior),
        };

        self.nodes.push(PlanNode {
            parent,
            branch,
            depth,
            item,
            prior,
            path_probability,
            value,
            weighted_sum,
            probability_sum,
            retained: false,
        });
        id
    }

    /// Items along the path to `node`, first level first. Empty for the root.
    pub fn path_items(&self, node: Option<NodeId>) -> Vec<Item> {
        let mut items = Vec::new();
        let mut current = node;
        while let Some(id) = current {
            let n = self.get(id);
            items.push(n.item);
            current = n.parent;
        }
        items.reverse();
        items
    }

    /// Beam order: normalized value, immediate value and importance
    /// descending, then item id and node id ascending.
    pub fn beam_order(&self, a: NodeId, b: NodeId) -> Ordering {
        let (na, nb) = (self.get(a), self.get(b));
        nb.normalized_value()
            .total_cmp(&na.normalized_value())
            .then(nb.value.total_cmp(&na.value))
            .then(nb.item.importance.total_cmp(&na.item.importance))
            .then(na.item.id.cmp(&nb.item.id))
            .then(a.cmp(&b))
    }

    /// Sorts `candidates` into beam order, marks the first `width` as
    /// retained and returns them.
    pub fn retain_top(&mut self, mut candidates: Vec<NodeId>, width: usize) -> Vec<NodeId> {
        candidates.sort_by(|a, b| self.beam_order(*a, *b));
        candidates.truncate(width);
        for id in &candidates {
            self.get_mut(*id).retained = true;
        }
        candidates
    }

    /// First-level node whose retained subtree reaches the highest
    /// normalized value, with that value.
    ///
    /// Ties go to the higher immediate value, then the higher importance,
    /// then the lower item id.
    pub fn best_branch(&self) -> Option<(NodeId, f64)> {
        let mut best: Vec<(NodeId, f64)> = Vec::new();
        for node in self.nodes.iter().filter(|n| n.retained) {
            let value = node.normalized_value();
            match best.iter_mut().find(|(b, _)| *b == node.branch) {
                Some((_, v)) => *v = v.max(value),
                None => best.push((node.branch, value)),
            }
        }

        best.into_iter().min_by(|(a, va), (b, vb)| {
            let (na, nb) = (self.get(*a), self.get(*b));
            vb.total_cmp(va)
                .then(nb.value.total_cmp(&na.value))
                .then(nb.item.importance.total_cmp(&na.item.importance))
                .then(na.item.id.cmp(&nb.item.id))
        })
    }
}
