use super::best_first::{best_first, BestFirstConfig, Priority};
use super::heuristic::Heuristic;
use super::limits::SearchLimits;
use super::observer::SearchObserver;
use super::{SearchAlgorithm, SearchPhase, SearchResult};
use crate::config::EvaluationMode;
use crate::error::Result;
use crate::state::StateSpace;
use tracing::info;

/// A* with reopening. Returns optimal plans when the heuristic is
/// admissible.
pub struct AStarSearch<H> {
    heuristic: H,
    config: BestFirstConfig,
    phase: SearchPhase,
}

impl<H: Heuristic> AStarSearch<H> {
    pub fn new(heuristic: H, limits: SearchLimits) -> Self {
        Self {
            heuristic,
            config: BestFirstConfig::new(Priority::Cost, limits),
            phase: SearchPhase::Ready,
        }
    }

    pub fn with_evaluation(mut self, evaluation: EvaluationMode) -> Self {
        self.config.evaluation = evaluation;
        self
    }

    /// Expands up to `weight` preferred successors per regular one, never
    /// beyond the current minimum `f`.
    pub fn with_preferred_operators(mut self, weight: u32) -> Self {
        self.config.use_preferred = true;
        self.config.preferred_weight = weight;
        self
    }
}

impl<H: Heuristic> SearchAlgorithm for AStarSearch<H> {
    fn name(&self) -> &'static str {
        "astar"
    }

    fn phase(&self) -> SearchPhase {
        self.phase
    }

    fn search(
        &mut self,
        space: &mut StateSpace,
        observer: &mut dyn SearchObserver,
    ) -> Result<SearchResult> {
        self.phase.begin()?;
        info!(evaluation = ?self.config.evaluation, "starting A*");
        let result = best_first(space, &self.heuristic, &self.config, observer);
        self.phase = SearchPhase::Finished;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::AStarSearch;
    use crate::config::{EvaluationMode, GroundingMode};
    use crate::error::Error;
    use crate::loader::TaskDescription;
    use crate::data::GroundConjunctiveCondition;
    use crate::search::{
        BlindHeuristic, GoalCountHeuristic, Heuristic, NoopObserver, SearchAlgorithm,
        SearchLimits, SearchPhase, SearchStatus,
    };
    use crate::state::{StateId, StateSpace};

    // Walking a-b-c costs 2 + 2; the shortcut a-c costs 5.
    const ROADS: &str = r#"{
        "objects": ["a", "b", "c"],
        "predicates": [
            {"name": "at", "arity": 1},
            {"name": "road", "arity": 2},
            {"name": "shortcut", "arity": 2}
        ],
        "actions": [
            {
                "name": "walk",
                "parameters": ["?x", "?y"],
                "precondition": [
                    {"predicate": "at", "args": ["?x"]},
                    {"predicate": "road", "args": ["?x", "?y"]}
                ],
                "effect": [
                    {"predicate": "at", "args": ["?y"]},
                    {"predicate": "at", "args": ["?x"], "negated": true}
                ],
                "cost": 2
            },
            {
                "name": "jump",
                "parameters": ["?x", "?y"],
                "precondition": [
                    {"predicate": "at", "args": ["?x"]},
                    {"predicate": "shortcut", "args": ["?x", "?y"]}
                ],
                "effect": [
                    {"predicate": "at", "args": ["?y"]},
                    {"predicate": "at", "args": ["?x"], "negated": true}
                ],
                "cost": 5
            }
        ],
        "init": [
            {"predicate": "at", "args": ["a"]},
            {"predicate": "road", "args": ["a", "b"]},
            {"predicate": "road", "args": ["b", "c"]},
            {"predicate": "shortcut", "args": ["a", "c"]}
        ],
        "goal": [{"predicate": "at", "args": ["c"]}]
    }"#;

    fn space() -> StateSpace {
        let task = TaskDescription::from_json_str(ROADS).unwrap();
        StateSpace::from_description(&task, GroundingMode::Lifted).unwrap()
    }

    #[test]
    fn finds_the_cheapest_plan() {
        let mut space = space();
        let mut search = AStarSearch::new(BlindHeuristic, SearchLimits::unlimited());
        let result = search.search(&mut space, &mut NoopObserver).unwrap();
        assert_eq!(result.status, SearchStatus::Solved);
        assert_eq!(result.cost(), Some(4.0));
        assert_eq!(result.plan.as_ref().map(|plan| plan.len()), Some(2));
        assert_eq!(search.phase(), SearchPhase::Finished);
    }

    #[test]
    fn lazy_evaluation_finds_the_same_cost() {
        let mut space = space();
        let mut search = AStarSearch::new(BlindHeuristic, SearchLimits::unlimited())
            .with_evaluation(EvaluationMode::Lazy);
        let result = search.search(&mut space, &mut NoopObserver).unwrap();
        assert_eq!(result.cost(), Some(4.0));
    }

    // Finishing from s costs 2.5; stepping to a and finishing there costs
    // 1 + 1.
    const DETOUR: &str = r#"{
        "objects": ["s", "a"],
        "predicates": [{"name": "at", "arity": 1}, {"name": "done"}],
        "actions": [
            {
                "name": "step",
                "precondition": [{"predicate": "at", "args": ["s"]}],
                "effect": [
                    {"predicate": "at", "args": ["a"]},
                    {"predicate": "at", "args": ["s"], "negated": true}
                ],
                "cost": 1
            },
            {
                "name": "finish-near",
                "precondition": [{"predicate": "at", "args": ["a"]}],
                "effect": [{"predicate": "done"}],
                "cost": 1
            },
            {
                "name": "finish-far",
                "precondition": [{"predicate": "at", "args": ["s"]}],
                "effect": [{"predicate": "done"}],
                "cost": 2.5
            }
        ],
        "init": [{"predicate": "at", "args": ["s"]}],
        "goal": [{"predicate": "done"}]
    }"#;

    /// 1 at `a` until done, 0 elsewhere. Consistent on DETOUR.
    struct NearA;

    impl Heuristic for NearA {
        fn compute(&self, space: &StateSpace, state: StateId, goal: &GroundConjunctiveCondition) -> f64 {
            if space.satisfies(state, goal) {
                return 0.0;
            }
            if space.describe_state(state).contains("(at a)") {
                1.0
            } else {
                0.0
            }
        }

        fn is_admissible(&self) -> bool {
            true
        }
    }

    #[test]
    fn lazy_evaluation_stays_optimal_with_an_informed_heuristic() {
        for evaluation in [EvaluationMode::Eager, EvaluationMode::Lazy] {
            let task = TaskDescription::from_json_str(DETOUR).unwrap();
            let mut space = StateSpace::from_description(&task, GroundingMode::Lifted).unwrap();
            let mut search = AStarSearch::new(NearA, SearchLimits::unlimited())
                .with_evaluation(evaluation);
            let result = search.search(&mut space, &mut NoopObserver).unwrap();
            assert_eq!(result.cost(), Some(2.0), "{evaluation:?}");
            assert_eq!(
                result.plan.unwrap().format(&space),
                vec!["(step)", "(finish-near)"],
                "{evaluation:?}"
            );
        }
    }

    #[test]
    fn goal_popped_at_the_expansion_limit_is_solved() {
        let mut space = space();
        let mut search =
            AStarSearch::new(BlindHeuristic, SearchLimits::unlimited().with_max_expansions(2));
        let result = search.search(&mut space, &mut NoopObserver).unwrap();
        assert_eq!(result.status, SearchStatus::Solved);
        assert_eq!(result.counters.expanded, 2);
        assert_eq!(result.cost(), Some(4.0));
    }

    #[test]
    fn second_run_is_rejected() {
        let mut space = space();
        let mut search = AStarSearch::new(GoalCountHeuristic, SearchLimits::unlimited())
            .with_preferred_operators(2);
        assert!(search.search(&mut space, &mut NoopObserver).is_ok());
        assert!(matches!(
            search.search(&mut space, &mut NoopObserver),
            Err(Error::SearchAlreadyFinished)
        ));
    }

    #[test]
    fn unreachable_goal_is_unsolvable_with_an_admissible_heuristic() {
        let mut task = TaskDescription::from_json_str(ROADS).unwrap();
        task.init.retain(|literal| literal.predicate != "shortcut" && literal.args != ["b", "c"]);
        let mut space = StateSpace::from_description(&task, GroundingMode::Lifted).unwrap();
        let mut search = AStarSearch::new(BlindHeuristic, SearchLimits::unlimited());
        let result = search.search(&mut space, &mut NoopObserver).unwrap();
        assert_eq!(result.status, SearchStatus::Unsolvable);
        assert_eq!(result.counters.expanded, 2);
    }
}
