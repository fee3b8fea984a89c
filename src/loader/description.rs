//! JSON task description.
//!
//! A task names its objects, predicates and functions, the action and axiom
//! schemas, the initial state and the goal. Arguments starting with `?` are
//! variables; everything else is an object name. Predicate categories are
//! not declared, they are inferred by the [`ProblemBuilder`](super::ProblemBuilder).

use crate::data::{AssignOperator, BinaryOperator, Comparator};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskDescription {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub objects: Vec<String>,
    #[serde(default)]
    pub predicates: Vec<SymbolDescription>,
    #[serde(default)]
    pub functions: Vec<SymbolDescription>,
    #[serde(default)]
    pub actions: Vec<ActionDescription>,
    #[serde(default)]
    pub axioms: Vec<AxiomDescription>,
    #[serde(default)]
    pub init: Vec<LiteralDescription>,
    #[serde(default)]
    pub numeric_init: Vec<NumericInitDescription>,
    #[serde(default)]
    pub goal: Vec<LiteralDescription>,
    #[serde(default)]
    pub goal_constraints: Vec<ConstraintDescription>,
}

impl TaskDescription {
    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolDescription {
    pub name: String,
    #[serde(default)]
    pub arity: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiteralDescription {
    pub predicate: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub negated: bool,
}

impl LiteralDescription {
    pub fn positive(predicate: &str, args: &[&str]) -> Self {
        Self {
            predicate: predicate.to_string(),
            args: args.iter().map(|arg| arg.to_string()).collect(),
            negated: false,
        }
    }

    pub fn negative(predicate: &str, args: &[&str]) -> Self {
        Self {
            negated: true,
            ..Self::positive(predicate, args)
        }
    }
}

/// Arithmetic expression: a number, `{"op", "lhs", "rhs"}`, `{"negate"}` or
/// a function application `{"function", "args"}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExpressionDescription {
    Number(f64),
    Binary {
        op: BinaryOperator,
        lhs: Box<ExpressionDescription>,
        rhs: Box<ExpressionDescription>,
    },
    Negate {
        negate: Box<ExpressionDescription>,
    },
    Function {
        function: String,
        #[serde(default)]
        args: Vec<String>,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConstraintDescription {
    pub comparator: Comparator,
    pub lhs: ExpressionDescription,
    pub rhs: ExpressionDescription,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NumericEffectDescription {
    pub op: AssignOperator,
    pub function: String,
    #[serde(default)]
    pub args: Vec<String>,
    pub value: ExpressionDescription,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConditionalEffectDescription {
    /// Extra quantified parameters, in scope after the action's own.
    #[serde(default)]
    pub parameters: Vec<String>,
    #[serde(default)]
    pub condition: Vec<LiteralDescription>,
    #[serde(default)]
    pub constraints: Vec<ConstraintDescription>,
    #[serde(default)]
    pub effect: Vec<LiteralDescription>,
    #[serde(default)]
    pub numeric_effects: Vec<NumericEffectDescription>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionDescription {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<String>,
    #[serde(default)]
    pub precondition: Vec<LiteralDescription>,
    #[serde(default)]
    pub constraints: Vec<ConstraintDescription>,
    #[serde(default)]
    pub effect: Vec<LiteralDescription>,
    #[serde(default)]
    pub numeric_effects: Vec<NumericEffectDescription>,
    #[serde(default)]
    pub conditional_effects: Vec<ConditionalEffectDescription>,
    /// Defaults to unit cost.
    #[serde(default)]
    pub cost: Option<ExpressionDescription>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AxiomDescription {
    #[serde(default)]
    pub parameters: Vec<String>,
    pub head: LiteralDescription,
    #[serde(default)]
    pub body: Vec<LiteralDescription>,
    #[serde(default)]
    pub constraints: Vec<ConstraintDescription>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NumericInitDescription {
    pub function: String,
    #[serde(default)]
    pub args: Vec<String>,
    pub value: f64,
}

#[cfg(test)]
mod tests {
    use super::{ExpressionDescription, TaskDescription};
    use crate::data::BinaryOperator;

    #[test]
    fn parses_expression_shapes() {
        let expression: ExpressionDescription = serde_json::from_str(
            r#"{"op": "+", "lhs": 1, "rhs": {"negate": {"function": "fuel", "args": ["truck"]}}}"#,
        )
        .unwrap();
        match expression {
            ExpressionDescription::Binary { op, lhs, rhs } => {
                assert_eq!(op, BinaryOperator::Add);
                assert_eq!(*lhs, ExpressionDescription::Number(1.0));
                assert!(matches!(*rhs, ExpressionDescription::Negate { .. }));
            }
            other => panic!("unexpected expression {other:?}"),
        }
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let task = TaskDescription::from_json_str(r#"{"objects": ["a"]}"#).unwrap();
        assert_eq!(task.objects, vec!["a".to_string()]);
        assert!(task.actions.is_empty());
        assert!(task.goal.is_empty());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(TaskDescription::from_json_str("{\"objects\": [").is_err());
    }
}
