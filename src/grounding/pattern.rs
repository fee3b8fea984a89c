//! Literals and numeric constraints compiled against a parameter list, so
//! they can be checked under a partial binding without touching the lifted
//! representation.

use super::view::AtomView;
use crate::data::{
    Category, FunctionCategory, FunctionExpression, FunctionTerm, GroundAtom, GroundFunction,
    GroundFunctionRef, LiteralId, NumericConstraint, ObjectId, PredicateId, Repository, Term,
    Valuation,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Arg {
    Object(ObjectId),
    Parameter(usize),
}

impl Arg {
    pub fn from_term(repository: &Repository, term: Term) -> Self {
        match term {
            Term::Object(object) => Arg::Object(object),
            Term::Variable(variable) => Arg::Parameter(repository.variable(variable).parameter_index),
        }
    }

    pub fn resolve(self, binding: &[ObjectId]) -> ObjectId {
        match self {
            Arg::Object(object) => object,
            Arg::Parameter(index) => binding[index],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LiteralPattern {
    pub predicate: PredicateId,
    pub category: Category,
    pub polarity: bool,
    pub args: Vec<Arg>,
    /// Distinct parameters mentioned, ascending.
    pub parameters: Vec<usize>,
}

impl LiteralPattern {
    pub fn new(predicate: PredicateId, category: Category, polarity: bool, args: Vec<Arg>) -> Self {
        let mut parameters: Vec<usize> = args
            .iter()
            .filter_map(|arg| match arg {
                Arg::Parameter(index) => Some(*index),
                Arg::Object(_) => None,
            })
            .collect();
        parameters.sort_unstable();
        parameters.dedup();
        Self {
            predicate,
            category,
            polarity,
            args,
            parameters,
        }
    }

    pub fn from_literal(repository: &Repository, literal: LiteralId) -> Self {
        let resolved = repository.literal(literal);
        let atom = repository.atom(resolved.atom);
        let args = atom
            .terms
            .iter()
            .map(|term| Arg::from_term(repository, *term))
            .collect();
        Self::new(
            atom.predicate,
            repository.predicate(atom.predicate).category,
            resolved.polarity,
            args,
        )
    }

    pub fn ground(&self, binding: &[ObjectId]) -> GroundAtom {
        GroundAtom::new(
            self.predicate,
            self.args.iter().map(|arg| arg.resolve(binding)).collect(),
        )
    }

    /// Exact check; every parameter of the pattern must be bound.
    pub fn holds(&self, repository: &Repository, valuation: &Valuation<'_>, binding: &[ObjectId]) -> bool {
        let atom = self.ground(binding);
        let present = repository
            .find_ground_atom(self.category, &atom)
            .is_some_and(|index| valuation.holds(self.category, index));
        present == self.polarity
    }

    pub fn is_ground(&self) -> bool {
        self.parameters.is_empty()
    }

    pub fn mentions(&self, parameter: usize) -> bool {
        self.parameters.binary_search(&parameter).is_ok()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ConstraintPattern {
    pub constraint: NumericConstraint,
    pub parameters: Vec<usize>,
}

impl ConstraintPattern {
    pub fn new(repository: &Repository, constraint: &NumericConstraint) -> Self {
        let mut parameters: Vec<usize> = constraint
            .terms()
            .into_iter()
            .filter_map(|term| match term {
                Term::Variable(variable) => Some(repository.variable(variable).parameter_index),
                Term::Object(_) => None,
            })
            .collect();
        parameters.sort_unstable();
        parameters.dedup();
        Self {
            constraint: constraint.clone(),
            parameters,
        }
    }

    pub fn holds(&self, view: &AtomView<'_>, binding: &[ObjectId]) -> bool {
        let lhs = evaluate(&self.constraint.lhs, view.repository, &view.valuation, binding);
        let rhs = evaluate(&self.constraint.rhs, view.repository, &view.valuation, binding);
        self.constraint.comparator.holds(lhs, rhs)
    }
}

/// Looks up the ground function a lifted term denotes under `binding`.
/// Functions that were never interned have no value.
pub fn find_ground_function(
    repository: &Repository,
    term: &FunctionTerm,
    binding: &[ObjectId],
) -> Option<GroundFunctionRef> {
    let ground = GroundFunction {
        function: term.function,
        objects: term
            .terms
            .iter()
            .map(|t| Arg::from_term(repository, *t).resolve(binding))
            .collect(),
    };
    let category = repository.function(term.function).category;
    let index = repository.find_ground_function(category, &ground)?;
    Some(match category {
        FunctionCategory::Static => GroundFunctionRef::Static(index),
        FunctionCategory::Fluent => GroundFunctionRef::Fluent(index),
    })
}

/// Evaluates a lifted expression under a full binding without grounding it.
pub fn evaluate(
    expression: &FunctionExpression,
    repository: &Repository,
    valuation: &Valuation<'_>,
    binding: &[ObjectId],
) -> f64 {
    match expression {
        FunctionExpression::Number(value) => *value,
        FunctionExpression::Binary { op, lhs, rhs } => op.apply(
            evaluate(lhs, repository, valuation, binding),
            evaluate(rhs, repository, valuation, binding),
        ),
        FunctionExpression::Negate(inner) => -evaluate(inner, repository, valuation, binding),
        FunctionExpression::Function(term) => find_ground_function(repository, term, binding)
            .map_or(f64::NAN, |function| valuation.value(function)),
    }
}
