//! Instantiation of lifted conditions, effects, actions and axioms under a
//! binding. Ground atoms and functions are interned as they are created.

use super::pattern::Arg;
use crate::data::{
    ActionSchemaId, Atom, AtomIndex, AxiomId, Bitset, Category, ConjunctiveCondition,
    ConjunctiveEffect, FunctionCategory, FunctionExpression, FunctionIndex, FunctionTerm,
    GroundAction, GroundActionId, GroundAtom, GroundAxiom, GroundAxiomId,
    GroundConditionalEffect, GroundConjunctiveCondition, GroundEffect, GroundFunction,
    GroundFunctionExpression, GroundFunctionRef, GroundNumericConstraint, GroundNumericEffect,
    Idx, LiteralId, ObjectId, Problem, Repository,
};

pub fn ground_atom(repository: &Repository, atom: &Atom, binding: &[ObjectId]) -> GroundAtom {
    GroundAtom::new(
        atom.predicate,
        atom.terms
            .iter()
            .map(|term| Arg::from_term(repository, *term).resolve(binding))
            .collect(),
    )
}

/// Returns the category, polarity and interned index of the ground literal.
pub fn ground_literal(
    repository: &mut Repository,
    literal: LiteralId,
    binding: &[ObjectId],
) -> (Category, bool, AtomIndex) {
    let resolved = repository.literal(literal);
    let category = repository.atom_category(resolved.atom);
    let atom = ground_atom(repository, repository.atom(resolved.atom), binding);
    let index = repository.intern_ground_atom(category, atom);
    (category, resolved.polarity, index)
}

pub fn ground_function(
    repository: &mut Repository,
    term: &FunctionTerm,
    binding: &[ObjectId],
) -> (FunctionCategory, FunctionIndex) {
    let objects = term
        .terms
        .iter()
        .map(|t| Arg::from_term(repository, *t).resolve(binding))
        .collect();
    let category = repository.function(term.function).category;
    let index = repository.intern_ground_function(
        category,
        GroundFunction {
            function: term.function,
            objects,
        },
    );
    (category, index)
}

pub fn ground_expression(
    repository: &mut Repository,
    expression: &FunctionExpression,
    binding: &[ObjectId],
) -> GroundFunctionExpression {
    match expression {
        FunctionExpression::Number(value) => GroundFunctionExpression::Number(*value),
        FunctionExpression::Binary { op, lhs, rhs } => GroundFunctionExpression::Binary {
            op: *op,
            lhs: Box::new(ground_expression(repository, lhs, binding)),
            rhs: Box::new(ground_expression(repository, rhs, binding)),
        },
        FunctionExpression::Negate(inner) => {
            GroundFunctionExpression::Negate(Box::new(ground_expression(repository, inner, binding)))
        }
        FunctionExpression::Function(term) => {
            let (category, index) = ground_function(repository, term, binding);
            GroundFunctionExpression::Function(match category {
                FunctionCategory::Static => GroundFunctionRef::Static(index),
                FunctionCategory::Fluent => GroundFunctionRef::Fluent(index),
            })
        }
    }
}

pub fn ground_condition(
    repository: &mut Repository,
    condition: &ConjunctiveCondition,
    binding: &[ObjectId],
) -> GroundConjunctiveCondition {
    let mut ground = GroundConjunctiveCondition::default();
    for (_, literal) in condition.all_literals() {
        let (category, polarity, index) = ground_literal(repository, literal, binding);
        ground.atoms_mut(category).push(polarity, index);
    }
    for constraint in &condition.numeric_constraints {
        ground.numeric_constraints.push(GroundNumericConstraint {
            comparator: constraint.comparator,
            lhs: ground_expression(repository, &constraint.lhs, binding),
            rhs: ground_expression(repository, &constraint.rhs, binding),
        });
    }
    ground
}

pub fn ground_effect(
    repository: &mut Repository,
    effect: &ConjunctiveEffect,
    binding: &[ObjectId],
) -> GroundEffect {
    let mut ground = GroundEffect::default();
    for &literal in &effect.literals {
        let (category, polarity, index) = ground_literal(repository, literal, binding);
        debug_assert_eq!(category, Category::Fluent);
        if polarity {
            ground.add.push(index);
        } else {
            ground.delete.push(index);
        }
    }
    for numeric in &effect.numeric_effects {
        let (category, function) = ground_function(repository, &numeric.function, binding);
        debug_assert_eq!(category, FunctionCategory::Fluent);
        ground.numeric.push(GroundNumericEffect {
            op: numeric.op,
            function,
            expression: ground_expression(repository, &numeric.expression, binding),
        });
    }
    ground
}

/// Every object tuple of length `arity`, in lexicographic order.
pub(crate) fn object_tuples(objects: &[ObjectId], arity: usize) -> Vec<Vec<ObjectId>> {
    let mut tuples = vec![Vec::with_capacity(arity)];
    for _ in 0..arity {
        tuples = tuples
            .into_iter()
            .flat_map(|prefix| {
                objects.iter().map(move |&object| {
                    let mut tuple = prefix.clone();
                    tuple.push(object);
                    tuple
                })
            })
            .collect();
    }
    tuples
}

fn static_literals_hold(
    repository: &Repository,
    condition: &ConjunctiveCondition,
    static_atoms: &Bitset,
    binding: &[ObjectId],
) -> bool {
    condition.static_literals.iter().all(|&literal| {
        let resolved = repository.literal(literal);
        let atom = ground_atom(repository, repository.atom(resolved.atom), binding);
        let present = repository
            .find_ground_atom(Category::Static, &atom)
            .is_some_and(|index| static_atoms.contains(index.index()));
        present == resolved.polarity
    })
}

/// Instantiates an action schema. Conditional effects with extra parameters
/// are expanded over all objects; instances whose static literals fail are
/// dropped since they can never fire.
pub fn ground_action(
    problem: &Problem,
    repository: &mut Repository,
    schema_id: ActionSchemaId,
    binding: Vec<ObjectId>,
    id: GroundActionId,
) -> GroundAction {
    let schema = problem.action_schema(schema_id);
    debug_assert_eq!(schema.arity(), binding.len());
    let precondition = ground_condition(repository, &schema.precondition, &binding);
    let effect = ground_effect(repository, &schema.effect, &binding);

    let objects: Vec<ObjectId> = repository.object_ids().collect();
    let mut conditional_effects = Vec::new();
    for conditional in &schema.conditional_effects {
        for extra in object_tuples(&objects, conditional.parameters.len()) {
            let mut full = binding.clone();
            full.extend(extra);
            if !static_literals_hold(repository, &conditional.condition, &problem.static_atoms, &full)
            {
                continue;
            }
            conditional_effects.push(GroundConditionalEffect {
                condition: ground_condition(repository, &conditional.condition, &full),
                effect: ground_effect(repository, &conditional.effect, &full),
            });
        }
    }

    let cost = ground_expression(repository, &schema.cost, &binding);
    GroundAction {
        id,
        schema: schema_id,
        binding,
        precondition,
        effect,
        conditional_effects,
        cost,
    }
}

pub fn ground_axiom(
    problem: &Problem,
    repository: &mut Repository,
    axiom_id: AxiomId,
    binding: Vec<ObjectId>,
    id: GroundAxiomId,
) -> GroundAxiom {
    let axiom = problem.axiom(axiom_id);
    let body = ground_condition(repository, &axiom.body, &binding);
    let head = ground_atom(repository, repository.atom(axiom.head), &binding);
    let head = repository.intern_ground_atom(Category::Derived, head);
    GroundAxiom {
        id,
        axiom: axiom_id,
        binding,
        body,
        head,
    }
}

#[cfg(test)]
mod tests {
    use super::object_tuples;
    use crate::data::ObjectId;

    #[test]
    fn tuples_cover_every_combination() {
        let objects = [ObjectId::from_raw(0), ObjectId::from_raw(1), ObjectId::from_raw(2)];
        assert_eq!(object_tuples(&objects, 0), vec![Vec::<ObjectId>::new()]);
        assert_eq!(object_tuples(&objects, 2).len(), 9);
        assert_eq!(object_tuples(&[], 1).len(), 0);
    }
}
