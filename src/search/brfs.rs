use super::limits::SearchLimits;
use super::node::{NodeStatus, Parent, SearchNodes};
use super::observer::SearchObserver;
use super::{exhausted, SearchAlgorithm, SearchCounters, SearchPhase, SearchResult, SearchStatus};
use crate::error::Result;
use crate::state::StateSpace;
use std::collections::VecDeque;
use tracing::{debug, info};

/// Breadth-first search with duplicate detection at generation. Plans are
/// shortest in the number of actions.
pub struct BreadthFirstSearch {
    limits: SearchLimits,
    phase: SearchPhase,
}

impl BreadthFirstSearch {
    pub fn new(limits: SearchLimits) -> Self {
        Self {
            limits,
            phase: SearchPhase::Ready,
        }
    }

    fn run(&self, space: &mut StateSpace, observer: &mut dyn SearchObserver) -> Result<SearchResult> {
        let budget = self.limits.start();
        let mut nodes = SearchNodes::new();
        let mut counters = SearchCounters::default();
        let mut queue = VecDeque::new();

        let initial = space.initial_state();
        nodes.open_root(initial);
        queue.push_back(initial);
        let (mut layer, mut layer_size) = (0, 0);

        while let Some(state) = queue.pop_front() {
            let (g, depth) = match nodes.get(state) {
                Some(node) => (node.g, node.depth),
                None => continue,
            };
            if depth > layer {
                observer.on_layer_finished(layer, layer_size);
                debug!(depth = layer, states = layer_size, "layer finished");
                layer = depth;
                layer_size = 0;
            }
            layer_size += 1;

            if space.is_goal(state) {
                let plan = nodes.extract_plan(space, state);
                observer.on_solved(&plan);
                return Ok(SearchResult::solved(plan, state, counters));
            }
            if let Err(reason) = budget.before_expansion(counters.expanded) {
                return Ok(SearchResult::unsolved(SearchStatus::Aborted(reason), counters));
            }
            nodes.get_mut(state).status = NodeStatus::Closed;
            counters.expanded += 1;
            observer.on_expand(state);

            for action in space.applicable_actions(state) {
                if let Err(reason) = budget.before_generation(space.num_states()) {
                    return Ok(SearchResult::unsolved(SearchStatus::Aborted(reason), counters));
                }
                let (successor, cost) = space.successor(state, action)?;
                counters.generated += 1;
                observer.on_generate(state, action, successor);

                let node = nodes.get_mut(successor);
                if node.status != NodeStatus::New {
                    continue;
                }
                node.status = NodeStatus::Open;
                node.g = g + cost;
                node.depth = depth + 1;
                node.parent = Some(Parent {
                    state,
                    action,
                    cost,
                });
                queue.push_back(successor);
            }
        }

        observer.on_layer_finished(layer, layer_size);
        Ok(exhausted(SearchStatus::Unsolvable, counters, observer))
    }
}

impl SearchAlgorithm for BreadthFirstSearch {
    fn name(&self) -> &'static str {
        "brfs"
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
        info!("starting breadth-first search");
        let result = self.run(space, observer);
        self.phase = SearchPhase::Finished;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::BreadthFirstSearch;
    use crate::config::GroundingMode;
    use crate::loader::TaskDescription;
    use crate::search::{
        AbortReason, Plan, SearchAlgorithm, SearchLimits, SearchObserver, SearchStatus,
    };
    use crate::state::StateSpace;

    // A counter 0 -> 1 -> 2 -> 3 driven by `inc`, with `reset` back to 0.
    const COUNTER: &str = r#"{
        "objects": ["n0", "n1", "n2", "n3"],
        "predicates": [{"name": "value", "arity": 1}, {"name": "next", "arity": 2}],
        "actions": [
            {
                "name": "inc",
                "parameters": ["?x", "?y"],
                "precondition": [
                    {"predicate": "value", "args": ["?x"]},
                    {"predicate": "next", "args": ["?x", "?y"]}
                ],
                "effect": [
                    {"predicate": "value", "args": ["?y"]},
                    {"predicate": "value", "args": ["?x"], "negated": true}
                ]
            },
            {
                "name": "reset",
                "parameters": ["?x"],
                "precondition": [{"predicate": "value", "args": ["?x"]}],
                "effect": [
                    {"predicate": "value", "args": ["n0"]},
                    {"predicate": "value", "args": ["?x"], "negated": true}
                ]
            }
        ],
        "init": [
            {"predicate": "value", "args": ["n0"]},
            {"predicate": "next", "args": ["n0", "n1"]},
            {"predicate": "next", "args": ["n1", "n2"]},
            {"predicate": "next", "args": ["n2", "n3"]}
        ],
        "goal": [{"predicate": "value", "args": ["n3"]}]
    }"#;

    #[derive(Default)]
    struct Layers(Vec<(usize, usize)>, Option<Plan>);

    impl SearchObserver for Layers {
        fn on_layer_finished(&mut self, depth: usize, states: usize) {
            self.0.push((depth, states));
        }

        fn on_solved(&mut self, plan: &Plan) {
            self.1 = Some(plan.clone());
        }
    }

    fn space(task: &str) -> StateSpace {
        let task = TaskDescription::from_json_str(task).unwrap();
        StateSpace::from_description(&task, GroundingMode::Lifted).unwrap()
    }

    #[test]
    fn finds_shortest_plan_and_reports_layers() {
        let mut space = space(COUNTER);
        let mut layers = Layers::default();
        let result = BreadthFirstSearch::new(SearchLimits::unlimited())
            .search(&mut space, &mut layers)
            .unwrap();
        assert_eq!(result.status, SearchStatus::Solved);
        let plan = result.plan.unwrap();
        assert_eq!(plan.len(), 3);
        assert_eq!(plan.cost, 3.0);
        assert_eq!(layers.0, vec![(0, 1), (1, 1), (2, 1)]);
        assert_eq!(layers.1, Some(plan.clone()));
        assert_eq!(
            plan.format(&space),
            vec!["(inc n0 n1)", "(inc n1 n2)", "(inc n2 n3)"]
        );
    }

    #[test]
    fn exhausting_the_space_proves_unsolvability() {
        let mut task = TaskDescription::from_json_str(COUNTER).unwrap();
        task.init.retain(|literal| literal.args != ["n2", "n3"]);
        let mut space = StateSpace::from_description(&task, GroundingMode::Lifted).unwrap();
        let mut layers = Layers::default();
        let result = BreadthFirstSearch::new(SearchLimits::unlimited())
            .search(&mut space, &mut layers)
            .unwrap();
        assert_eq!(result.status, SearchStatus::Unsolvable);
        assert_eq!(result.counters.expanded, 3);
        assert_eq!(layers.0, vec![(0, 1), (1, 1), (2, 1)]);
    }

    #[test]
    fn expansion_limit_aborts() {
        let mut space = space(COUNTER);
        let result = BreadthFirstSearch::new(SearchLimits::unlimited().with_max_expansions(1))
            .search(&mut space, &mut Layers::default())
            .unwrap();
        assert_eq!(result.status, SearchStatus::Aborted(AbortReason::ExpansionLimit));
        assert_eq!(result.counters.expanded, 1);
    }

    #[test]
    fn goal_popped_at_the_expansion_limit_is_solved() {
        let mut space = space(COUNTER);
        let result = BreadthFirstSearch::new(SearchLimits::unlimited().with_max_expansions(3))
            .search(&mut space, &mut Layers::default())
            .unwrap();
        assert_eq!(result.status, SearchStatus::Solved);
        assert_eq!(result.counters.expanded, 3);
        assert_eq!(result.cost(), Some(3.0));
    }
}
