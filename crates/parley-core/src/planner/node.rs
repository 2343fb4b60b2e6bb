//! Plan tree node representation.
//!
//! Each node is one hypothetical own contribution, appended after the
//! contributions of its ancestors. Nodes carry running sums along their path
//! so the probability-normalized path value is O(1) to read.

use parley_model::Item;

/// Index into the node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

#[derive(Debug, Clone)]
pub struct PlanNode {
    /// Parent node, `None` for first-level nodes (children of the actual log)
    pub parent: Option<NodeId>,

    /// First-level ancestor; a first-level node is its own branch
    pub branch: NodeId,

    /// 1 for first-level nodes
    pub depth: usize,

    /// Item assumed to be said at this step
    pub item: Item,

    /// Estimated probability of winning this step
    pub prior: f64,

    /// Product of priors from the first level down to this node
    pub path_probability: f64,

    /// Blended value of saying `item` here
    pub value: f64,

    /// Sum of `path_probability * value` along the path
    pub weighted_sum: f64,

    /// Sum of `path_probability` along the path
    pub probability_sum: f64,

    /// Survived the per-level beam cut
    pub retained: bool,
}

impl PlanNode {
    /// Probability-weighted mean of the values along the path.
    pub fn normalized_value(&self) -> f64 {
        if self.probability_sum > 0.0 {
            self.weighted_sum / self.probability_sum
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_model::fixtures::single;

    #[test]
    fn test_normalized_value() {
        let node = PlanNode {
            parent: None,
            branch: NodeId(0),
            depth: 1,
            item: single(1, 0, 0.5),
            prior: 0.5,
            path_probability: 0.5,
            value: 2.0,
            weighted_sum: 1.0,
            probability_sum: 0.5,
            retained: true,
        };
        assert_eq!(node.normalized_value(), 2.0);

        let empty = PlanNode {
            probability_sum: 0.0,
            ..node
        };
        assert_eq!(empty.normalized_value(), 0.0);
    }
}
