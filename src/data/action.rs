use super::atom::{AtomIndex, LiteralId};
use super::condition::{ConjunctiveCondition, GroundConjunctiveCondition};
use super::function::{FunctionExpression, GroundFunctionExpression, GroundNumericEffect, NumericEffect};
use super::index::define_index;
use super::symbol::{ObjectId, VariableId};

define_index!(
    /// Position of an action schema in the problem.
    ActionSchemaId
);
define_index!(
    /// Identifier of a ground action, unique within one state space.
    GroundActionId
);

/// Effect literals (all fluent) and numeric effects.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConjunctiveEffect {
    pub literals: Vec<LiteralId>,
    pub numeric_effects: Vec<NumericEffect>,
}

/// Effect guarded by a condition that is evaluated in the state the action is
/// applied to.
///
/// `parameters` are extra, universally quantified variables. The condition's
/// parameter list is the action parameters followed by these.
#[derive(Clone, Debug, PartialEq)]
pub struct ConditionalEffect {
    pub parameters: Vec<VariableId>,
    pub condition: ConjunctiveCondition,
    pub effect: ConjunctiveEffect,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ActionSchema {
    pub name: String,
    pub parameters: Vec<VariableId>,
    pub precondition: ConjunctiveCondition,
    pub effect: ConjunctiveEffect,
    pub conditional_effects: Vec<ConditionalEffect>,
    pub cost: FunctionExpression,
}

impl ActionSchema {
    pub fn arity(&self) -> usize {
        self.parameters.len()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GroundEffect {
    pub add: Vec<AtomIndex>,
    pub delete: Vec<AtomIndex>,
    pub numeric: Vec<GroundNumericEffect>,
}

impl GroundEffect {
    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.delete.is_empty() && self.numeric.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GroundConditionalEffect {
    pub condition: GroundConjunctiveCondition,
    pub effect: GroundEffect,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GroundAction {
    pub id: GroundActionId,
    pub schema: ActionSchemaId,
    pub binding: Vec<ObjectId>,
    pub precondition: GroundConjunctiveCondition,
    pub effect: GroundEffect,
    pub conditional_effects: Vec<GroundConditionalEffect>,
    pub cost: GroundFunctionExpression,
}

impl GroundAction {
    /// Atoms the action may add, including those of conditional effects.
    pub fn possible_adds(&self) -> impl Iterator<Item = AtomIndex> + '_ {
        self.effect.add.iter().copied().chain(
            self.conditional_effects
                .iter()
                .flat_map(|conditional| conditional.effect.add.iter().copied()),
        )
    }
}
