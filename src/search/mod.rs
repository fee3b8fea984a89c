//! Search algorithms over a [`StateSpace`].
//!
//! Every algorithm runs once: a second call to
//! [`SearchAlgorithm::search`] fails with
//! [`Error::SearchAlreadyFinished`].

mod astar;
mod best_first;
mod brfs;
mod gbfs;
pub mod heuristic;
mod iw;
mod limits;
mod node;
pub mod novelty;
mod observer;
mod open_list;
mod plan;

pub use astar::AStarSearch;
pub use brfs::BreadthFirstSearch;
pub use gbfs::GreedyBestFirstSearch;
pub use heuristic::{BlindHeuristic, GoalCountHeuristic, Heuristic};
pub use iw::{IteratedWidthSearch, SerializedWidthSearch, WidthSearch};
pub use limits::{AbortReason, SearchLimits};
pub use node::{NodeStatus, Parent, SearchNode, SearchNodes};
pub use observer::{NoopObserver, SearchObserver, StatisticsObserver};
pub use open_list::{AlternatingOpenList, OpenEntry, PriorityQueue};
pub use plan::{Plan, PlanStep};

use crate::error::{Error, Result};
use crate::state::{StateId, StateSpace};
use serde::Serialize;

/// How a search run ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    Solved,
    /// The reachable space was searched exhaustively without pruning.
    Unsolvable,
    /// The search ran out of nodes, but pruning may have hidden a solution.
    Exhausted,
    Aborted(AbortReason),
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum SearchPhase {
    #[default]
    Ready,
    Searching,
    Finished,
}

impl SearchPhase {
    /// Moves `Ready` to `Searching`; any other phase is an error.
    pub(crate) fn begin(&mut self) -> Result<()> {
        if *self != SearchPhase::Ready {
            return Err(Error::SearchAlreadyFinished);
        }
        *self = SearchPhase::Searching;
        Ok(())
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SearchCounters {
    pub expanded: usize,
    pub generated: usize,
    pub pruned: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SearchResult {
    pub status: SearchStatus,
    pub plan: Option<Plan>,
    pub goal_state: Option<StateId>,
    pub counters: SearchCounters,
}

impl SearchResult {
    pub(crate) fn solved(plan: Plan, goal_state: StateId, counters: SearchCounters) -> Self {
        Self {
            status: SearchStatus::Solved,
            plan: Some(plan),
            goal_state: Some(goal_state),
            counters,
        }
    }

    pub(crate) fn unsolved(status: SearchStatus, counters: SearchCounters) -> Self {
        Self {
            status,
            plan: None,
            goal_state: None,
            counters,
        }
    }

    pub fn is_solved(&self) -> bool {
        self.status == SearchStatus::Solved
    }

    pub fn cost(&self) -> Option<f64> {
        self.plan.as_ref().map(|plan| plan.cost)
    }
}

/// A configured search that can be run once over a state space.
pub trait SearchAlgorithm {
    fn name(&self) -> &'static str;

    fn phase(&self) -> SearchPhase;

    fn search(
        &mut self,
        space: &mut StateSpace,
        observer: &mut dyn SearchObserver,
    ) -> Result<SearchResult>;
}

/// Reports an exhausted open list to the observer.
fn exhausted(
    status: SearchStatus,
    counters: SearchCounters,
    observer: &mut dyn SearchObserver,
) -> SearchResult {
    match status {
        SearchStatus::Unsolvable => observer.on_unsolvable(),
        _ => observer.on_exhausted(),
    }
    SearchResult::unsolved(status, counters)
}
