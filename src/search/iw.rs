//! Width-based search: IW(k), iterated width and serialized IW.
//!
//! IW(k) is breadth-first search that prunes every generated state of
//! novelty greater than `k`. Goal tests happen at generation, so pruned
//! states can still be recognised as goals.

use super::limits::{AbortReason, Budget, SearchLimits};
use super::node::{NodeStatus, Parent, SearchNodes};
use super::novelty::{AtomUniverse, NoveltyTable};
use super::observer::SearchObserver;
use super::plan::Plan;
use super::{exhausted, SearchAlgorithm, SearchCounters, SearchPhase, SearchResult, SearchStatus};
use crate::data::{Category, GroundConjunctiveCondition, Idx};
use crate::error::Result;
use crate::state::{StateId, StateSpace};
use std::collections::VecDeque;
use tracing::{debug, info};

type GoalTest<'a> = &'a dyn Fn(&StateSpace, StateId) -> bool;

fn reaches_goal(space: &StateSpace, state: StateId) -> bool {
    space.is_goal(state)
}

enum RunOutcome {
    Solved { goal_state: StateId, plan: Plan },
    /// No nodes left; `pruned` states were discarded on the way.
    Exhausted { pruned: usize },
    Aborted(AbortReason),
}

/// Shared state of the width runs that make up one search.
struct WidthContext<'a> {
    budget: Budget,
    universe: AtomUniverse,
    counters: SearchCounters,
    observer: &'a mut dyn SearchObserver,
}

impl<'a> WidthContext<'a> {
    fn new(space: &mut StateSpace, limits: &SearchLimits, observer: &'a mut dyn SearchObserver) -> Self {
        let universe = AtomUniverse::from_reachability(space.reachability());
        debug!(atoms = universe.len(), "novelty universe");
        Self {
            budget: limits.start(),
            universe,
            counters: SearchCounters::default(),
            observer,
        }
    }

    /// One IW(`arity`) run from `start`.
    fn run(
        &mut self,
        space: &mut StateSpace,
        start: StateId,
        arity: usize,
        is_goal: GoalTest<'_>,
    ) -> Result<RunOutcome> {
        let mut table = NoveltyTable::new(self.universe.len(), arity)?;
        let mut nodes = SearchNodes::new();
        nodes.open_root(start);
        table.insert(&self.universe.positions(space.state(start)));
        if is_goal(space, start) {
            return Ok(RunOutcome::Solved {
                goal_state: start,
                plan: Plan::default(),
            });
        }

        let mut queue = VecDeque::from([start]);
        let mut pruned = 0;
        while let Some(state) = queue.pop_front() {
            if let Err(reason) = self.budget.before_expansion(self.counters.expanded) {
                return Ok(RunOutcome::Aborted(reason));
            }
            let (g, depth) = match nodes.get(state) {
                Some(node) => (node.g, node.depth),
                None => continue,
            };
            nodes.get_mut(state).status = NodeStatus::Closed;
            self.counters.expanded += 1;
            self.observer.on_expand(state);

            for action in space.applicable_actions(state) {
                if let Err(reason) = self.budget.before_generation(space.num_states()) {
                    return Ok(RunOutcome::Aborted(reason));
                }
                let (successor, cost) = space.successor(state, action)?;
                self.counters.generated += 1;
                self.observer.on_generate(state, action, successor);

                let node = nodes.get_mut(successor);
                if node.status != NodeStatus::New {
                    continue;
                }
                node.g = g + cost;
                node.depth = depth + 1;
                node.parent = Some(Parent {
                    state,
                    action,
                    cost,
                });
                if is_goal(space, successor) {
                    let plan = nodes.extract_plan(space, successor);
                    return Ok(RunOutcome::Solved {
                        goal_state: successor,
                        plan,
                    });
                }
                if table.insert(&self.universe.positions(space.state(successor))) {
                    nodes.get_mut(successor).status = NodeStatus::Open;
                    queue.push_back(successor);
                } else {
                    nodes.get_mut(successor).status = NodeStatus::Pruned;
                    pruned += 1;
                    self.counters.pruned += 1;
                    self.observer.on_prune(successor);
                }
            }
        }
        debug!(arity, pruned, "width run exhausted");
        Ok(RunOutcome::Exhausted { pruned })
    }

    /// IW(1), IW(2), ... up to `max_arity`, stopping early once a run
    /// exhausts without pruning.
    fn iterate(
        &mut self,
        space: &mut StateSpace,
        start: StateId,
        max_arity: usize,
        is_goal: GoalTest<'_>,
    ) -> Result<RunOutcome> {
        let mut outcome = RunOutcome::Exhausted { pruned: 0 };
        for arity in 1..=max_arity {
            debug!(arity, "starting width run");
            outcome = self.run(space, start, arity, is_goal)?;
            match outcome {
                RunOutcome::Exhausted { pruned } if pruned > 0 => continue,
                _ => break,
            }
        }
        Ok(outcome)
    }

    fn finish(self, outcome: RunOutcome, proves_unsolvable: bool) -> SearchResult {
        match outcome {
            RunOutcome::Solved { goal_state, plan } => {
                self.observer.on_solved(&plan);
                SearchResult::solved(plan, goal_state, self.counters)
            }
            RunOutcome::Aborted(reason) => {
                SearchResult::unsolved(SearchStatus::Aborted(reason), self.counters)
            }
            RunOutcome::Exhausted { pruned } => {
                let status = if pruned == 0 && proves_unsolvable {
                    SearchStatus::Unsolvable
                } else {
                    SearchStatus::Exhausted
                };
                exhausted(status, self.counters, self.observer)
            }
        }
    }
}

/// IW(k) for a fixed `k`.
pub struct WidthSearch {
    arity: usize,
    limits: SearchLimits,
    phase: SearchPhase,
}

impl WidthSearch {
    pub fn new(arity: usize, limits: SearchLimits) -> Self {
        Self {
            arity,
            limits,
            phase: SearchPhase::Ready,
        }
    }

    fn run(&self, space: &mut StateSpace, observer: &mut dyn SearchObserver) -> Result<SearchResult> {
        let mut context = WidthContext::new(space, &self.limits, observer);
        let start = space.initial_state();
        let outcome = context.run(space, start, self.arity, &reaches_goal)?;
        Ok(context.finish(outcome, true))
    }
}

impl SearchAlgorithm for WidthSearch {
    fn name(&self) -> &'static str {
        "iw"
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
        info!(arity = self.arity, "starting IW");
        let result = self.run(space, observer);
        self.phase = SearchPhase::Finished;
        result
    }
}

/// IW(1) through IW(`max_arity`) until one succeeds.
pub struct IteratedWidthSearch {
    max_arity: usize,
    limits: SearchLimits,
    phase: SearchPhase,
}

impl IteratedWidthSearch {
    pub fn new(max_arity: usize, limits: SearchLimits) -> Self {
        Self {
            max_arity,
            limits,
            phase: SearchPhase::Ready,
        }
    }

    fn run(&self, space: &mut StateSpace, observer: &mut dyn SearchObserver) -> Result<SearchResult> {
        let mut context = WidthContext::new(space, &self.limits, observer);
        let start = space.initial_state();
        let outcome = context.iterate(space, start, self.max_arity, &reaches_goal)?;
        Ok(context.finish(outcome, true))
    }
}

impl SearchAlgorithm for IteratedWidthSearch {
    fn name(&self) -> &'static str {
        "iterated_width"
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
        info!(max_arity = self.max_arity, "starting iterated width");
        let result = self.run(space, observer);
        self.phase = SearchPhase::Finished;
        result
    }
}

/// Which goal literals and constraints hold in `state`.
fn goal_progress(space: &StateSpace, state: StateId, goal: &GroundConjunctiveCondition) -> Vec<bool> {
    let current = space.state(state);
    let valuation = space
        .problem()
        .valuation(&current.fluent, &current.derived, &current.numeric);
    let mut progress = Vec::with_capacity(goal.literal_count());
    for category in Category::ALL {
        let literals = goal.atoms(category);
        let atoms = valuation.atoms(category);
        progress.extend(literals.positive.iter().map(|atom| atoms.contains(atom.index())));
        progress.extend(literals.negative.iter().map(|atom| !atoms.contains(atom.index())));
    }
    progress.extend(
        goal.numeric_constraints
            .iter()
            .map(|constraint| constraint.is_satisfied(&valuation)),
    );
    progress
}

/// Serialized iterated width: repeatedly searches for a state that satisfies
/// more goal literals while keeping the ones already achieved. When no such
/// state is found, a last iterated-width search targets the full goal.
pub struct SerializedWidthSearch {
    max_arity: usize,
    limits: SearchLimits,
    phase: SearchPhase,
}

impl SerializedWidthSearch {
    pub fn new(max_arity: usize, limits: SearchLimits) -> Self {
        Self {
            max_arity,
            limits,
            phase: SearchPhase::Ready,
        }
    }

    fn run(&self, space: &mut StateSpace, observer: &mut dyn SearchObserver) -> Result<SearchResult> {
        let goal = space.goal().clone();
        let mut context = WidthContext::new(space, &self.limits, observer);
        let initial = space.initial_state();
        let mut current = initial;
        let mut plan = Plan::default();

        while !space.is_goal(current) {
            let achieved = goal_progress(space, current, &goal);
            let count = achieved.iter().filter(|&&holds| holds).count();
            let subgoal = |space: &StateSpace, state: StateId| {
                let progress = goal_progress(space, state, &goal);
                progress.iter().filter(|&&holds| holds).count() > count
                    && achieved.iter().zip(&progress).all(|(&before, &now)| !before || now)
            };
            match context.iterate(space, current, self.max_arity, &subgoal)? {
                RunOutcome::Solved { goal_state, plan: subplan } => {
                    debug!(achieved = count, steps = subplan.len(), "subgoal reached");
                    plan.extend(subplan);
                    current = goal_state;
                }
                RunOutcome::Exhausted { .. } => {
                    debug!("no subgoal progress, searching for the full goal");
                    let outcome = context.iterate(space, current, self.max_arity, &reaches_goal)?;
                    let outcome = match outcome {
                        RunOutcome::Solved {
                            goal_state,
                            plan: subplan,
                        } => {
                            plan.extend(subplan);
                            RunOutcome::Solved {
                                goal_state,
                                plan,
                            }
                        }
                        other => other,
                    };
                    return Ok(context.finish(outcome, current == initial));
                }
                aborted @ RunOutcome::Aborted(_) => return Ok(context.finish(aborted, false)),
            }
        }
        Ok(context.finish(
            RunOutcome::Solved {
                goal_state: current,
                plan,
            },
            false,
        ))
    }
}

impl SearchAlgorithm for SerializedWidthSearch {
    fn name(&self) -> &'static str {
        "siw"
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
        info!(max_arity = self.max_arity, "starting serialized iterated width");
        let result = self.run(space, observer);
        self.phase = SearchPhase::Finished;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::{IteratedWidthSearch, SerializedWidthSearch, WidthSearch};
    use crate::config::GroundingMode;
    use crate::loader::TaskDescription;
    use crate::search::{NoopObserver, SearchAlgorithm, SearchLimits, SearchStatus};
    use crate::state::StateSpace;

    const LAMPS: &str = r#"{
        "objects": ["l1", "l2", "l3"],
        "predicates": [{"name": "on", "arity": 1}, {"name": "lamp", "arity": 1}],
        "actions": [{
            "name": "turn-on",
            "parameters": ["?l"],
            "precondition": [{"predicate": "lamp", "args": ["?l"]}],
            "effect": [{"predicate": "on", "args": ["?l"]}]
        }],
        "init": [
            {"predicate": "lamp", "args": ["l1"]},
            {"predicate": "lamp", "args": ["l2"]},
            {"predicate": "lamp", "args": ["l3"]}
        ],
        "goal": [
            {"predicate": "on", "args": ["l1"]},
            {"predicate": "on", "args": ["l2"]},
            {"predicate": "on", "args": ["l3"]}
        ]
    }"#;

    fn space() -> StateSpace {
        let task = TaskDescription::from_json_str(LAMPS).unwrap();
        StateSpace::from_description(&task, GroundingMode::Lifted).unwrap()
    }

    #[test]
    fn width_one_prunes_conjunctive_goals() {
        let mut space = space();
        let result = WidthSearch::new(1, SearchLimits::unlimited())
            .search(&mut space, &mut NoopObserver)
            .unwrap();
        assert_eq!(result.status, SearchStatus::Exhausted);
        assert!(result.counters.pruned > 0);
    }

    #[test]
    fn iterated_width_succeeds_at_width_two() {
        let mut space = space();
        let result = IteratedWidthSearch::new(2, SearchLimits::unlimited())
            .search(&mut space, &mut NoopObserver)
            .unwrap();
        assert_eq!(result.status, SearchStatus::Solved);
        let plan = result.plan.unwrap();
        assert_eq!(plan.len(), 3);
        assert!(plan.validate(&mut space).is_ok());
    }

    #[test]
    fn serialized_width_chains_subgoals() {
        let mut space = space();
        let result = SerializedWidthSearch::new(1, SearchLimits::unlimited())
            .search(&mut space, &mut NoopObserver)
            .unwrap();
        assert_eq!(result.status, SearchStatus::Solved);
        let plan = result.plan.unwrap();
        assert_eq!(plan.len(), 3);
        assert_eq!(plan.validate(&mut space).ok(), result.goal_state);
    }

    #[test]
    fn exhausting_without_pruning_is_unsolvable() {
        let mut task = TaskDescription::from_json_str(LAMPS).unwrap();
        task.objects.push("rock".to_string());
        task.goal.push(crate::loader::LiteralDescription::positive("on", &["rock"]));
        let mut space = StateSpace::from_description(&task, GroundingMode::Lifted).unwrap();
        let result = WidthSearch::new(3, SearchLimits::unlimited())
            .search(&mut space, &mut NoopObserver)
            .unwrap();
        assert_eq!(result.status, SearchStatus::Unsolvable);
        assert_eq!(result.counters.pruned, 0);
    }
}
