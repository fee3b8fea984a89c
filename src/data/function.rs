//! Numeric fluents: function terms, arithmetic expressions, constraints and
//! numeric effects, in lifted and ground form.
//!
//! Undefined values are represented as `NaN`. Every comparison against an
//! undefined value fails, so a constraint over an undefined function is
//! never satisfied.

use super::atom::Term;
use super::condition::Valuation;
use super::index::define_index;
use super::symbol::{FunctionId, ObjectId};
use serde::{Deserialize, Serialize};
use std::fmt;

define_index!(
    /// Dense index of a ground function within its category.
    FunctionIndex
);

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FunctionTerm {
    pub function: FunctionId,
    pub terms: Vec<Term>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroundFunction {
    pub function: FunctionId,
    pub objects: Vec<ObjectId>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOperator {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Sub,
    #[serde(rename = "*")]
    Mul,
    #[serde(rename = "/")]
    Div,
}

impl BinaryOperator {
    pub fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            BinaryOperator::Add => lhs + rhs,
            BinaryOperator::Sub => lhs - rhs,
            BinaryOperator::Mul => lhs * rhs,
            BinaryOperator::Div if rhs == 0.0 => f64::NAN,
            BinaryOperator::Div => lhs / rhs,
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
        };
        f.write_str(symbol)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum FunctionExpression {
    Number(f64),
    Binary {
        op: BinaryOperator,
        lhs: Box<FunctionExpression>,
        rhs: Box<FunctionExpression>,
    },
    Negate(Box<FunctionExpression>),
    Function(FunctionTerm),
}

impl FunctionExpression {
    pub fn binary(op: BinaryOperator, lhs: FunctionExpression, rhs: FunctionExpression) -> Self {
        FunctionExpression::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// Calls `visit` for every function term in the expression.
    pub fn visit_function_terms<'a>(&'a self, visit: &mut impl FnMut(&'a FunctionTerm)) {
        match self {
            FunctionExpression::Number(_) => {}
            FunctionExpression::Binary { lhs, rhs, .. } => {
                lhs.visit_function_terms(visit);
                rhs.visit_function_terms(visit);
            }
            FunctionExpression::Negate(inner) => inner.visit_function_terms(visit),
            FunctionExpression::Function(term) => visit(term),
        }
    }

    pub fn terms(&self) -> Vec<Term> {
        let mut terms = Vec::new();
        self.visit_function_terms(&mut |function| terms.extend(function.terms.iter().copied()));
        terms
    }
}

/// A ground function reference, resolved against the static table or the
/// numeric part of a state.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GroundFunctionRef {
    Static(FunctionIndex),
    Fluent(FunctionIndex),
}

#[derive(Clone, Debug, PartialEq)]
pub enum GroundFunctionExpression {
    Number(f64),
    Binary {
        op: BinaryOperator,
        lhs: Box<GroundFunctionExpression>,
        rhs: Box<GroundFunctionExpression>,
    },
    Negate(Box<GroundFunctionExpression>),
    Function(GroundFunctionRef),
}

impl GroundFunctionExpression {
    pub fn evaluate(&self, valuation: &Valuation<'_>) -> f64 {
        match self {
            GroundFunctionExpression::Number(value) => *value,
            GroundFunctionExpression::Binary { op, lhs, rhs } => {
                op.apply(lhs.evaluate(valuation), rhs.evaluate(valuation))
            }
            GroundFunctionExpression::Negate(inner) => -inner.evaluate(valuation),
            GroundFunctionExpression::Function(function) => valuation.value(*function),
        }
    }

    /// Constant value if the expression mentions no functions.
    pub fn as_constant(&self) -> Option<f64> {
        match self {
            GroundFunctionExpression::Number(value) => Some(*value),
            GroundFunctionExpression::Binary { op, lhs, rhs } => {
                Some(op.apply(lhs.as_constant()?, rhs.as_constant()?))
            }
            GroundFunctionExpression::Negate(inner) => inner.as_constant().map(|v| -v),
            GroundFunctionExpression::Function(_) => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparator {
    #[serde(rename = "<")]
    Less,
    #[serde(rename = "<=")]
    LessEqual,
    #[serde(rename = "=")]
    Equal,
    #[serde(rename = ">=")]
    GreaterEqual,
    #[serde(rename = ">")]
    Greater,
}

impl Comparator {
    pub fn holds(self, lhs: f64, rhs: f64) -> bool {
        match self {
            Comparator::Less => lhs < rhs,
            Comparator::LessEqual => lhs <= rhs,
            Comparator::Equal => lhs == rhs,
            Comparator::GreaterEqual => lhs >= rhs,
            Comparator::Greater => lhs > rhs,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NumericConstraint {
    pub comparator: Comparator,
    pub lhs: FunctionExpression,
    pub rhs: FunctionExpression,
}

impl NumericConstraint {
    pub fn terms(&self) -> Vec<Term> {
        let mut terms = self.lhs.terms();
        terms.extend(self.rhs.terms());
        terms
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GroundNumericConstraint {
    pub comparator: Comparator,
    pub lhs: GroundFunctionExpression,
    pub rhs: GroundFunctionExpression,
}

impl GroundNumericConstraint {
    pub fn is_satisfied(&self, valuation: &Valuation<'_>) -> bool {
        self.comparator
            .holds(self.lhs.evaluate(valuation), self.rhs.evaluate(valuation))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignOperator {
    Assign,
    Increase,
    Decrease,
    ScaleUp,
    ScaleDown,
}

impl AssignOperator {
    pub fn apply(self, current: f64, value: f64) -> f64 {
        match self {
            AssignOperator::Assign => value,
            AssignOperator::Increase => current + value,
            AssignOperator::Decrease => current - value,
            AssignOperator::ScaleUp => current * value,
            AssignOperator::ScaleDown => BinaryOperator::Div.apply(current, value),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NumericEffect {
    pub op: AssignOperator,
    pub function: FunctionTerm,
    pub expression: FunctionExpression,
}

/// Numeric effect on a fluent function of the state.
#[derive(Clone, Debug, PartialEq)]
pub struct GroundNumericEffect {
    pub op: AssignOperator,
    pub function: FunctionIndex,
    pub expression: GroundFunctionExpression,
}

#[cfg(test)]
mod tests {
    use super::{AssignOperator, BinaryOperator, Comparator, GroundFunctionExpression};

    #[test]
    fn division_by_zero_is_undefined() {
        assert!(BinaryOperator::Div.apply(1.0, 0.0).is_nan());
        assert!(!Comparator::Equal.holds(f64::NAN, f64::NAN));
        assert!(!Comparator::LessEqual.holds(f64::NAN, 1.0));
    }

    #[test]
    fn assign_operators() {
        assert_eq!(AssignOperator::Assign.apply(3.0, 5.0), 5.0);
        assert_eq!(AssignOperator::Increase.apply(3.0, 5.0), 8.0);
        assert_eq!(AssignOperator::Decrease.apply(3.0, 5.0), -2.0);
        assert_eq!(AssignOperator::ScaleUp.apply(3.0, 5.0), 15.0);
        assert_eq!(AssignOperator::ScaleDown.apply(10.0, 5.0), 2.0);
    }

    #[test]
    fn constant_folding() {
        let expression = GroundFunctionExpression::Binary {
            op: BinaryOperator::Mul,
            lhs: Box::new(GroundFunctionExpression::Number(2.0)),
            rhs: Box::new(GroundFunctionExpression::Negate(Box::new(
                GroundFunctionExpression::Number(3.0),
            ))),
        };
        assert_eq!(expression.as_constant(), Some(-6.0));
    }
}
