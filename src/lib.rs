//! Forward state-space planning over lifted task descriptions.
//!
//! A task is loaded from JSON into an interned [`Repository`] and a
//! [`Problem`]. The [`StateSpace`] instantiates applicable actions per state,
//! either lazily from action schemas or from an up-front grounding, and the
//! algorithms in [`search`] look for plans in it.

pub mod config;
pub mod data;
pub mod error;
pub mod grounding;
pub mod loader;
pub mod planner;
pub mod search;
pub mod state;

pub use config::{
    EvaluationMode, GroundingMode, HeuristicKind, LimitOptions, PlannerOptions,
    SearchAlgorithmKind, Statistics,
};
pub use data::{
    ActionSchema, ActionSchemaId, Category, GroundAction, GroundActionId, ObjectId, Problem,
    Repository,
};
pub use error::{Error, Result};
pub use loader::{load_task, ProblemBuilder, TaskDescription};
pub use planner::{Planner, PlannerReport};
pub use search::{
    AStarSearch, AbortReason, BlindHeuristic, BreadthFirstSearch, GoalCountHeuristic,
    GreedyBestFirstSearch, Heuristic, IteratedWidthSearch, NoopObserver, Plan, PlanStep,
    SearchAlgorithm, SearchLimits, SearchObserver, SearchResult, SearchStatus,
    SerializedWidthSearch, StatisticsObserver, WidthSearch,
};
pub use state::{State, StateId, StateSpace};
