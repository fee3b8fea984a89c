//! Planner options and run statistics.

mod options;
mod stats;

pub use options::{
    EvaluationMode, GroundingMode, HeuristicKind, LimitOptions, PlannerOptions,
    SearchAlgorithmKind,
};
pub use stats::Statistics;
