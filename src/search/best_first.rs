//! Best-first search shared by A* and greedy best-first search.

use super::heuristic::Heuristic;
use super::limits::SearchLimits;
use super::node::{NodeStatus, Parent, SearchNodes};
use super::observer::SearchObserver;
use super::open_list::{AlternatingOpenList, OpenEntry};
use super::{exhausted, SearchCounters, SearchResult, SearchStatus};
use crate::config::EvaluationMode;
use crate::error::Result;
use crate::state::StateSpace;
use tracing::debug;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Priority {
    /// `f = g + h`, ties on lower `h`; closed nodes are reopened on a
    /// cheaper path.
    Cost,
    /// `h` only; nodes are never reopened.
    Greedy,
}

#[derive(Clone, Debug)]
pub(crate) struct BestFirstConfig {
    pub priority: Priority,
    pub evaluation: EvaluationMode,
    pub preferred_weight: u32,
    pub use_preferred: bool,
    pub limits: SearchLimits,
}

impl BestFirstConfig {
    pub fn new(priority: Priority, limits: SearchLimits) -> Self {
        Self {
            priority,
            evaluation: EvaluationMode::Eager,
            preferred_weight: 1,
            use_preferred: false,
            limits,
        }
    }

    fn key(&self, g: f64, h: f64) -> (f64, f64) {
        match self.priority {
            Priority::Cost => (g + h, h),
            Priority::Greedy => (h, 0.0),
        }
    }
}

pub(crate) fn best_first(
    space: &mut StateSpace,
    heuristic: &dyn Heuristic,
    config: &BestFirstConfig,
    observer: &mut dyn SearchObserver,
) -> Result<SearchResult> {
    let budget = config.limits.start();
    let goal = space.goal().clone();
    let reopen = config.priority == Priority::Cost;
    let lazy = config.evaluation == EvaluationMode::Lazy;
    let weight = if config.use_preferred {
        config.preferred_weight
    } else {
        0
    };

    let mut nodes = SearchNodes::new();
    let mut open = AlternatingOpenList::new(weight, reopen);
    let mut counters = SearchCounters::default();

    let initial = space.initial_state();
    let initial_h = heuristic.compute(space, initial, &goal);
    let root = nodes.open_root(initial);
    root.h = Some(initial_h);
    let mut best_h = initial_h;
    if initial_h.is_infinite() {
        root.status = NodeStatus::DeadEnd;
    } else {
        let (primary, secondary) = config.key(0.0, initial_h);
        open.push(
            OpenEntry {
                state: initial,
                primary,
                secondary,
                g: 0.0,
            },
            false,
        );
        observer.on_new_best_h(initial_h);
    }

    while let Some(entry) = open.pop() {
        let node = nodes.get_mut(entry.state);
        if node.status != NodeStatus::Open || entry.g > node.g {
            continue;
        }
        let (g, depth, cached) = (node.g, node.depth, node.h);

        // Lazily evaluated nodes were queued with a placeholder estimate.
        let h = match cached {
            Some(h) => h,
            None => {
                let h = heuristic.compute(space, entry.state, &goal);
                let node = nodes.get_mut(entry.state);
                node.h = Some(h);
                if h.is_infinite() {
                    node.status = NodeStatus::DeadEnd;
                    continue;
                }
                if h < best_h {
                    best_h = h;
                    observer.on_new_best_h(h);
                }
                let (primary, secondary) = config.key(g, h);
                if reopen && primary > entry.primary {
                    open.push(
                        OpenEntry {
                            state: entry.state,
                            primary,
                            secondary,
                            g,
                        },
                        false,
                    );
                    continue;
                }
                h
            }
        };

        if space.is_goal(entry.state) {
            let plan = nodes.extract_plan(space, entry.state);
            observer.on_solved(&plan);
            return Ok(SearchResult::solved(plan, entry.state, counters));
        }
        if let Err(reason) = budget.before_expansion(counters.expanded) {
            debug!(?reason, "best-first search aborted");
            return Ok(SearchResult::unsolved(SearchStatus::Aborted(reason), counters));
        }
        nodes.get_mut(entry.state).status = NodeStatus::Closed;
        counters.expanded += 1;
        observer.on_expand(entry.state);

        for action in space.applicable_actions(entry.state) {
            if let Err(reason) = budget.before_generation(space.num_states()) {
                debug!(?reason, "best-first search aborted");
                return Ok(SearchResult::unsolved(SearchStatus::Aborted(reason), counters));
            }
            let (successor, cost) = space.successor(entry.state, action)?;
            counters.generated += 1;
            observer.on_generate(entry.state, action, successor);

            let successor_g = g + cost;
            let node = nodes.get_mut(successor);
            let improves = match node.status {
                NodeStatus::New => true,
                NodeStatus::Open | NodeStatus::Closed => reopen && successor_g < node.g,
                NodeStatus::DeadEnd | NodeStatus::Pruned => false,
            };
            if !improves {
                continue;
            }
            node.g = successor_g;
            node.depth = depth + 1;
            node.parent = Some(Parent {
                state: entry.state,
                action,
                cost,
            });

            let cached = node.h;
            let estimate = match cached {
                Some(h) => h,
                // A* needs a lower bound on f so the re-queue at the first
                // pop restores f order; greedy search reuses the parent's h.
                None if lazy => match config.priority {
                    Priority::Cost => 0.0,
                    Priority::Greedy => h,
                },
                None => {
                    let successor_h = heuristic.compute(space, successor, &goal);
                    node.h = Some(successor_h);
                    if successor_h.is_infinite() {
                        node.status = NodeStatus::DeadEnd;
                        continue;
                    }
                    if successor_h < best_h {
                        best_h = successor_h;
                        observer.on_new_best_h(successor_h);
                    }
                    successor_h
                }
            };
            node.status = NodeStatus::Open;

            let preferred = weight > 0
                && heuristic.is_preferred(space, entry.state, &goal, space.ground_action(action));
            let (primary, secondary) = config.key(successor_g, estimate);
            open.push(
                OpenEntry {
                    state: successor,
                    primary,
                    secondary,
                    g: successor_g,
                },
                preferred,
            );
        }
    }

    let status = if heuristic.is_admissible() {
        SearchStatus::Unsolvable
    } else {
        SearchStatus::Exhausted
    };
    debug!(?status, expanded = counters.expanded, "open list exhausted");
    Ok(exhausted(status, counters, observer))
}
