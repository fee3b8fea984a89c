//! Delete-relaxed reachability.
//!
//! Ignoring delete effects, negative fluent and derived literals and numeric
//! constraints, atoms only ever become true. Firing every action and axiom
//! instance whose relaxed condition holds until nothing new appears gives an
//! over-approximation of the atoms, actions and axioms any real state can
//! reach. The grounded mode instantiates exactly these actions and axioms,
//! and the novelty tables of width search are sized by these atoms.
//!
//! Every reachable fluent atom, derived atom and numeric effect target is
//! interned here, in firing order. Running the exploration before search
//! fixes their indices for the problem independently of exploration order.

use super::assignment::AssignmentSet;
use super::ground::{ground_atom, ground_function};
use super::satisfier::ConditionSatisfier;
use super::view::StateAssignments;
use crate::data::{
    ActionSchemaId, AxiomId, Bitset, Category, ConjunctiveCondition, ConjunctiveEffect,
    FunctionTerm, Idx, LiteralId, ObjectId, Problem, Repository,
};
use rustc_hash::FxHashSet;
use tracing::info;

/// Result of the relaxed exploration.
#[derive(Clone, Debug, Default)]
pub struct Reachability {
    pub fluent_atoms: Bitset,
    pub derived_atoms: Bitset,
    pub actions: Vec<(ActionSchemaId, Vec<ObjectId>)>,
    pub axioms: Vec<(AxiomId, Vec<ObjectId>)>,
}

enum RuleKind {
    Action { schema: ActionSchemaId, record: bool },
    Axiom(AxiomId),
}

/// A relaxed condition with the atoms it adds and the functions it
/// assigns under each of its bindings.
struct Rule {
    kind: RuleKind,
    satisfier: ConditionSatisfier,
    adds: Vec<LiteralId>,
    targets: Vec<FunctionTerm>,
}

fn targets(effect: &ConjunctiveEffect) -> Vec<FunctionTerm> {
    effect
        .numeric_effects
        .iter()
        .map(|numeric| numeric.function.clone())
        .collect()
}

fn positive(repository: &Repository, literals: &[LiteralId]) -> Vec<LiteralId> {
    literals
        .iter()
        .copied()
        .filter(|&literal| repository.literal(literal).polarity)
        .collect()
}

fn relax(repository: &Repository, condition: &ConjunctiveCondition) -> ConjunctiveCondition {
    ConjunctiveCondition {
        parameters: condition.parameters.clone(),
        static_literals: condition.static_literals.clone(),
        fluent_literals: positive(repository, &condition.fluent_literals),
        derived_literals: positive(repository, &condition.derived_literals),
        numeric_constraints: Vec::new(),
    }
}

fn rules(
    problem: &Problem,
    repository: &Repository,
    static_assignments: &AssignmentSet,
) -> Vec<Rule> {
    let compile = |condition: &ConjunctiveCondition| {
        ConditionSatisfier::new(
            &relax(repository, condition),
            repository,
            &problem.static_atoms,
            static_assignments,
        )
    };

    let mut rules = Vec::new();
    for schema_id in problem.action_schema_ids() {
        let schema = problem.action_schema(schema_id);
        rules.push(Rule {
            kind: RuleKind::Action {
                schema: schema_id,
                record: true,
            },
            satisfier: compile(&schema.precondition),
            adds: positive(repository, &schema.effect.literals),
            targets: targets(&schema.effect),
        });
        for conditional in &schema.conditional_effects {
            // Precondition and effect condition together, over the extended
            // parameter list.
            let mut merged = conditional.condition.clone();
            for (category, literal) in schema.precondition.all_literals() {
                merged.literals_mut(category).push(literal);
            }
            rules.push(Rule {
                kind: RuleKind::Action {
                    schema: schema_id,
                    record: false,
                },
                satisfier: compile(&merged),
                adds: positive(repository, &conditional.effect.literals),
                targets: targets(&conditional.effect),
            });
        }
    }
    for (index, axiom) in problem.axioms.iter().enumerate() {
        rules.push(Rule {
            kind: RuleKind::Axiom(AxiomId::from_usize(index)),
            satisfier: compile(&axiom.body),
            adds: Vec::new(),
            targets: Vec::new(),
        });
    }
    rules
}

/// Runs the relaxed exploration to its fixpoint.
pub fn explore(
    problem: &Problem,
    repository: &mut Repository,
    static_assignments: &AssignmentSet,
) -> Reachability {
    let rules = rules(problem, repository, static_assignments);
    let mut result = Reachability {
        fluent_atoms: problem.initial_fluent_atoms.clone(),
        ..Reachability::default()
    };
    let mut seen_actions: FxHashSet<(ActionSchemaId, Vec<ObjectId>)> = FxHashSet::default();
    let mut seen_axioms: FxHashSet<(AxiomId, Vec<ObjectId>)> = FxHashSet::default();
    let mut rounds = 0;

    loop {
        rounds += 1;
        let fired: Vec<(usize, Vec<ObjectId>)> = {
            let valuation = problem.valuation(
                &result.fluent_atoms,
                &result.derived_atoms,
                &problem.initial_numeric_values,
            );
            let dynamic = StateAssignments::new(repository, &valuation);
            let view = dynamic.view(repository, valuation, static_assignments);
            rules
                .iter()
                .enumerate()
                .flat_map(|(index, rule)| rule.satisfier.bindings(view, None).map(move |b| (index, b)))
                .collect()
        };

        let mut changed = false;
        for (index, binding) in fired {
            let rule = &rules[index];
            match rule.kind {
                RuleKind::Action { schema, record } => {
                    if record && seen_actions.insert((schema, binding.clone())) {
                        result.actions.push((schema, binding.clone()));
                    }
                    for &literal in &rule.adds {
                        let atom = ground_atom(repository, repository.literal_atom(literal), &binding);
                        let added = repository.intern_ground_atom(Category::Fluent, atom);
                        changed |= result.fluent_atoms.insert(added.index());
                    }
                    for target in &rule.targets {
                        ground_function(repository, target, &binding);
                    }
                }
                RuleKind::Axiom(axiom) => {
                    if seen_axioms.insert((axiom, binding.clone())) {
                        result.axioms.push((axiom, binding.clone()));
                    }
                    let head = repository.atom(problem.axiom(axiom).head);
                    let atom = ground_atom(repository, head, &binding);
                    let added = repository.intern_ground_atom(Category::Derived, atom);
                    changed |= result.derived_atoms.insert(added.index());
                }
            }
        }
        if !changed {
            break;
        }
    }

    info!(
        rounds,
        fluent_atoms = result.fluent_atoms.len(),
        derived_atoms = result.derived_atoms.len(),
        actions = result.actions.len(),
        axioms = result.axioms.len(),
        "relaxed reachability finished"
    );
    result
}
