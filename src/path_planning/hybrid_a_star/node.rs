//! Search nodes, the node arena handle, and open-set entries

use std::cmp::Ordering;

use ordered_float::OrderedFloat;

use crate::common::Pose;

use super::motion_model::ActionLabel;

/// Index of a node in the search arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

/// A node of the search tree. Parents are arena indices, never references.
///
/// Costs are fixed at construction so `priority == cost + heuristic` holds.
#[derive(Debug, Clone)]
pub struct SearchNode {
    pub pose: Pose,
    cost: f64,
    heuristic: f64,
    priority: f64,
    pub parent: Option<NodeId>,
    /// Label of the action that produced this node; `None` for the start
    pub action: Option<ActionLabel>,
}

impl SearchNode {
    pub fn new(
        pose: Pose,
        cost: f64,
        heuristic: f64,
        parent: Option<NodeId>,
        action: Option<ActionLabel>,
    ) -> Self {
        Self {
            pose,
            cost,
            heuristic,
            priority: cost + heuristic,
            parent,
            action,
        }
    }

    /// Cost from start (g)
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Estimated cost to goal (h)
    pub fn heuristic(&self) -> f64 {
        self.heuristic
    }

    /// g + h
    pub fn priority(&self) -> f64 {
        self.priority
    }
}

/// Open-set entry ordered by (priority, insertion sequence)
#[derive(Debug, Clone, Copy)]
pub(super) struct OpenEntry {
    pub priority: OrderedFloat<f64>,
    pub sequence: u64,
    pub node: NodeId,
}

impl Eq for OpenEntry {}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.sequence == other.sequence
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior, earlier insertion wins ties
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
