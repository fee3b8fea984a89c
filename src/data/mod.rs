//! Core data model shared by the loader, the grounder and the searches.
//!
//! Everything is owned by a [`Repository`] or a [`Problem`] and cross
//! referenced by dense integer indices.

pub mod action;
pub mod atom;
pub mod axiom;
pub mod bitset;
pub mod condition;
pub mod function;
pub mod index;
pub mod problem;
pub mod repository;
pub mod symbol;

pub use action::{
    ActionSchema, ActionSchemaId, ConditionalEffect, ConjunctiveEffect, GroundAction,
    GroundActionId, GroundConditionalEffect, GroundEffect,
};
pub use atom::{Atom, AtomId, AtomIndex, GroundAtom, Literal, LiteralId, Term};
pub use axiom::{Axiom, AxiomId, GroundAxiom, GroundAxiomId};
pub use bitset::Bitset;
pub use condition::{ConjunctiveCondition, GroundAtomSets, GroundConjunctiveCondition, Valuation};
pub use function::{
    AssignOperator, BinaryOperator, Comparator, FunctionExpression, FunctionIndex, FunctionTerm,
    GroundFunction, GroundFunctionExpression, GroundFunctionRef, GroundNumericConstraint,
    GroundNumericEffect, NumericConstraint, NumericEffect,
};
pub use index::{Idx, Interner};
pub use problem::Problem;
pub use repository::Repository;
pub use symbol::{
    Category, FunctionCategory, FunctionId, FunctionSkeleton, Object, ObjectId, Predicate,
    PredicateId, Variable, VariableId,
};
