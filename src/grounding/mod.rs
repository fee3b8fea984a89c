//! Grounding: turning lifted schemas into ground actions and axioms.
//!
//! The [`ConditionSatisfier`] finds the bindings of a lifted condition in a
//! state. [`ActionGrounder`] and [`AxiomEvaluator`] build on it in lifted
//! mode, or on the relaxed [`explore`] results in grounded mode.

mod actions;
mod assignment;
mod axioms;
mod clique;
mod general;
pub mod ground;
mod pattern;
mod reachability;
mod satisfier;
mod view;

pub use actions::ActionGrounder;
pub use assignment::AssignmentSet;
pub use axioms::AxiomEvaluator;
pub use clique::StaticConsistencyGraph;
pub use pattern::{Arg, ConstraintPattern, LiteralPattern};
pub use reachability::{explore, Reachability};
pub use satisfier::{Bindings, ConditionSatisfier, SatisfierStatistics, Strategy};
pub use view::{AtomView, StateAssignments};
