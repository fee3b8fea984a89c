//! Builds a state space and a search algorithm from [`PlannerOptions`] and
//! runs them.

use crate::config::{HeuristicKind, PlannerOptions, SearchAlgorithmKind, Statistics};
use crate::error::Result;
use crate::loader::TaskDescription;
use crate::search::{
    AStarSearch, BlindHeuristic, BreadthFirstSearch, GoalCountHeuristic, GreedyBestFirstSearch,
    Heuristic, IteratedWidthSearch, SearchAlgorithm, SearchResult, SerializedWidthSearch,
    StatisticsObserver, WidthSearch,
};
use crate::state::StateSpace;
use std::time::Instant;
use tracing::info;

/// Result of a planner run.
#[derive(Debug)]
pub struct PlannerReport {
    pub result: SearchResult,
    /// Plan steps as `(action obj ...)`, empty without a plan.
    pub plan_lines: Vec<String>,
    pub statistics: Statistics,
}

#[derive(Clone, Debug, Default)]
pub struct Planner {
    options: PlannerOptions,
}

impl Planner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(mut self, options: PlannerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &PlannerOptions {
        &self.options
    }

    pub fn heuristic(&self) -> Box<dyn Heuristic> {
        match self.options.heuristic {
            HeuristicKind::Blind => Box::new(BlindHeuristic),
            HeuristicKind::GoalCount => Box::new(GoalCountHeuristic),
        }
    }

    pub fn algorithm(&self) -> Box<dyn SearchAlgorithm> {
        let options = &self.options;
        let limits = options.search_limits();
        match options.search {
            SearchAlgorithmKind::Brfs => Box::new(BreadthFirstSearch::new(limits)),
            SearchAlgorithmKind::Astar => {
                let search =
                    AStarSearch::new(self.heuristic(), limits).with_evaluation(options.evaluation);
                if options.use_preferred {
                    Box::new(search.with_preferred_operators(options.preferred_weight))
                } else {
                    Box::new(search)
                }
            }
            SearchAlgorithmKind::Gbfs => {
                let search = GreedyBestFirstSearch::new(self.heuristic(), limits)
                    .with_evaluation(options.evaluation);
                if options.use_preferred {
                    Box::new(search.with_preferred_operators(options.preferred_weight))
                } else {
                    Box::new(search)
                }
            }
            SearchAlgorithmKind::Iw if options.iterate_width => {
                Box::new(IteratedWidthSearch::new(options.max_arity, limits))
            }
            SearchAlgorithmKind::Iw => Box::new(WidthSearch::new(options.max_arity, limits)),
            SearchAlgorithmKind::Siw => {
                Box::new(SerializedWidthSearch::new(options.max_arity, limits))
            }
        }
    }

    pub fn state_space(&self, task: &TaskDescription) -> Result<StateSpace> {
        StateSpace::from_description(task, self.options.grounding)
    }

    pub fn solve(&self, task: &TaskDescription) -> Result<PlannerReport> {
        let mut space = self.state_space(task)?;
        self.solve_in(&mut space)
    }

    /// Runs the configured search over an existing state space.
    pub fn solve_in(&self, space: &mut StateSpace) -> Result<PlannerReport> {
        let mut algorithm = self.algorithm();
        let mut observer = StatisticsObserver::new();
        let started = Instant::now();
        let result = algorithm.search(space, &mut observer)?;
        let elapsed = started.elapsed();
        info!(
            algorithm = algorithm.name(),
            status = ?result.status,
            expanded = result.counters.expanded,
            generated = result.counters.generated,
            elapsed_ms = elapsed.as_millis() as u64,
            "search finished"
        );

        let mut statistics = space.statistics();
        statistics.merge(observer.statistics());
        statistics.set("search_time_ms", elapsed.as_millis() as u64);
        let plan_lines = result
            .plan
            .as_ref()
            .map(|plan| plan.format(space))
            .unwrap_or_default();
        Ok(PlannerReport {
            result,
            plan_lines,
            statistics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::Planner;
    use crate::config::{GroundingMode, HeuristicKind, PlannerOptions, SearchAlgorithmKind};
    use crate::loader::TaskDescription;
    use crate::search::SearchStatus;

    const DOORS: &str = r#"{
        "objects": ["hall", "kitchen", "garden"],
        "predicates": [{"name": "in", "arity": 1}, {"name": "door", "arity": 2}],
        "actions": [{
            "name": "go",
            "parameters": ["?from", "?to"],
            "precondition": [
                {"predicate": "in", "args": ["?from"]},
                {"predicate": "door", "args": ["?from", "?to"]}
            ],
            "effect": [
                {"predicate": "in", "args": ["?to"]},
                {"predicate": "in", "args": ["?from"], "negated": true}
            ]
        }],
        "init": [
            {"predicate": "in", "args": ["hall"]},
            {"predicate": "door", "args": ["hall", "kitchen"]},
            {"predicate": "door", "args": ["kitchen", "garden"]}
        ],
        "goal": [{"predicate": "in", "args": ["garden"]}]
    }"#;

    #[test]
    fn every_algorithm_solves_a_small_task() {
        let task = TaskDescription::from_json_str(DOORS).unwrap();
        for search in [
            SearchAlgorithmKind::Brfs,
            SearchAlgorithmKind::Astar,
            SearchAlgorithmKind::Gbfs,
            SearchAlgorithmKind::Iw,
            SearchAlgorithmKind::Siw,
        ] {
            for grounding in [GroundingMode::Lifted, GroundingMode::Grounded] {
                let options = PlannerOptions {
                    search,
                    grounding,
                    heuristic: HeuristicKind::GoalCount,
                    use_preferred: true,
                    ..PlannerOptions::default()
                };
                let report = Planner::new().with_options(options).solve(&task).unwrap();
                assert_eq!(report.result.status, SearchStatus::Solved, "{search:?}");
                assert_eq!(report.plan_lines, vec!["(go hall kitchen)", "(go kitchen garden)"]);
                assert!(report.statistics.get("states").unwrap_or(0) >= 3);
            }
        }
    }
}
