use super::plan::{Plan, PlanStep};
use crate::data::{GroundActionId, Idx};
use crate::state::{StateId, StateSpace};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum NodeStatus {
    #[default]
    New,
    Open,
    Closed,
    /// The heuristic reported infinity.
    DeadEnd,
    /// Discarded by novelty pruning.
    Pruned,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Parent {
    pub state: StateId,
    pub action: GroundActionId,
    pub cost: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchNode {
    pub status: NodeStatus,
    pub g: f64,
    pub depth: usize,
    /// `None` until the heuristic has been evaluated for this state.
    pub h: Option<f64>,
    pub parent: Option<Parent>,
}

/// Per-state search bookkeeping, indexed by `StateId`.
#[derive(Debug, Default)]
pub struct SearchNodes {
    nodes: Vec<SearchNode>,
}

impl SearchNodes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, state: StateId) -> Option<&SearchNode> {
        self.nodes.get(state.index())
    }

    pub fn status(&self, state: StateId) -> NodeStatus {
        self.get(state).map_or(NodeStatus::New, |node| node.status)
    }

    pub fn get_mut(&mut self, state: StateId) -> &mut SearchNode {
        let index = state.index();
        if index >= self.nodes.len() {
            self.nodes.resize(index + 1, SearchNode::default());
        }
        &mut self.nodes[index]
    }

    /// Opens `state` as a root of the search.
    pub fn open_root(&mut self, state: StateId) -> &mut SearchNode {
        let node = self.get_mut(state);
        *node = SearchNode {
            status: NodeStatus::Open,
            ..SearchNode::default()
        };
        node
    }

    /// Walks parent links back from `goal` to a root.
    pub fn extract_plan(&self, space: &StateSpace, goal: StateId) -> Plan {
        let mut steps = Vec::new();
        let mut current = goal;
        while let Some(parent) = self.get(current).and_then(|node| node.parent) {
            let action = space.ground_action(parent.action);
            steps.push(PlanStep {
                schema: action.schema,
                binding: action.binding.clone(),
                cost: parent.cost,
            });
            current = parent.state;
        }
        steps.reverse();
        Plan::from_steps(steps)
    }
}
