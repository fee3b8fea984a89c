//! State evaluators for informed search.

use crate::data::{Category, GroundAction, GroundConjunctiveCondition, Idx, Valuation};
use crate::state::{StateId, StateSpace};

/// Estimates the cost from a state to `goal`. `f64::INFINITY` marks a dead
/// end.
pub trait Heuristic {
    fn compute(&self, space: &StateSpace, state: StateId, goal: &GroundConjunctiveCondition) -> f64;

    /// Whether the estimate never exceeds the true cost.
    fn is_admissible(&self) -> bool {
        false
    }

    /// Whether `action`, applicable in `state`, should be expanded with
    /// priority.
    fn is_preferred(
        &self,
        _space: &StateSpace,
        _state: StateId,
        _goal: &GroundConjunctiveCondition,
        _action: &GroundAction,
    ) -> bool {
        false
    }
}

impl<H: Heuristic + ?Sized> Heuristic for Box<H> {
    fn compute(&self, space: &StateSpace, state: StateId, goal: &GroundConjunctiveCondition) -> f64 {
        (**self).compute(space, state, goal)
    }

    fn is_admissible(&self) -> bool {
        (**self).is_admissible()
    }

    fn is_preferred(
        &self,
        space: &StateSpace,
        state: StateId,
        goal: &GroundConjunctiveCondition,
        action: &GroundAction,
    ) -> bool {
        (**self).is_preferred(space, state, goal, action)
    }
}

/// Zero everywhere.
#[derive(Copy, Clone, Debug, Default)]
pub struct BlindHeuristic;

impl Heuristic for BlindHeuristic {
    fn compute(&self, _: &StateSpace, _: StateId, _: &GroundConjunctiveCondition) -> f64 {
        0.0
    }

    fn is_admissible(&self) -> bool {
        true
    }
}

/// Number of goal literals and constraints not satisfied in the state.
///
/// Actions whose effects add an unsatisfied positive goal atom, or delete an
/// atom the goal requires to be false, are preferred.
#[derive(Copy, Clone, Debug, Default)]
pub struct GoalCountHeuristic;

impl GoalCountHeuristic {
    pub fn unsatisfied(goal: &GroundConjunctiveCondition, valuation: &Valuation<'_>) -> usize {
        let atoms: usize = Category::ALL
            .into_iter()
            .map(|category| {
                let literals = goal.atoms(category);
                let set = valuation.atoms(category);
                let missing = literals
                    .positive
                    .iter()
                    .filter(|atom| !set.contains(atom.index()))
                    .count();
                let violated = literals
                    .negative
                    .iter()
                    .filter(|atom| set.contains(atom.index()))
                    .count();
                missing + violated
            })
            .sum();
        let constraints = goal
            .numeric_constraints
            .iter()
            .filter(|constraint| !constraint.is_satisfied(valuation))
            .count();
        atoms + constraints
    }
}

impl Heuristic for GoalCountHeuristic {
    fn compute(&self, space: &StateSpace, state: StateId, goal: &GroundConjunctiveCondition) -> f64 {
        let state = space.state(state);
        let valuation = space
            .problem()
            .valuation(&state.fluent, &state.derived, &state.numeric);
        Self::unsatisfied(goal, &valuation) as f64
    }

    fn is_preferred(
        &self,
        space: &StateSpace,
        state: StateId,
        goal: &GroundConjunctiveCondition,
        action: &GroundAction,
    ) -> bool {
        let fluent = &space.state(state).fluent;
        let goal = goal.atoms(Category::Fluent);
        let achieves = action
            .possible_adds()
            .any(|atom| !fluent.contains(atom.index()) && goal.positive.contains(&atom));
        achieves
            || action
                .effect
                .delete
                .iter()
                .chain(action.conditional_effects.iter().flat_map(|c| c.effect.delete.iter()))
                .any(|atom| fluent.contains(atom.index()) && goal.negative.contains(atom))
    }
}
