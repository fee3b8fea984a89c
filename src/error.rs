//! Error types for the planner.
//!
//! Input and load-time errors are reported here. Running out of time or
//! states during search is not an error: it is reported through
//! [`SearchStatus::Aborted`](crate::search::SearchStatus).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("duplicate {kind} '{name}'")]
    DuplicateSymbol { kind: &'static str, name: String },

    #[error("unknown object '{0}'")]
    UnknownObject(String),

    #[error("unknown predicate '{0}'")]
    UnknownPredicate(String),

    #[error("unknown function '{0}'")]
    UnknownFunction(String),

    #[error("variable '{variable}' is not declared in {context}")]
    UnboundVariable { variable: String, context: String },

    #[error("'{symbol}' expects {expected} arguments, found {found}")]
    ArityMismatch {
        symbol: String,
        expected: usize,
        found: usize,
    },

    #[error("predicate '{predicate}' cannot be used here: {reason}")]
    CategoryConflict { predicate: String, reason: String },

    #[error("axioms are not stratifiable: '{0}' depends negatively on itself")]
    NotStratifiable(String),

    #[error("unknown action schema '{0}'")]
    UnknownActionSchema(String),

    #[error("action '{0}' is not applicable in the given state")]
    ActionNotApplicable(String),

    #[error("action '{action}' has invalid cost {cost}")]
    InvalidActionCost { action: String, cost: f64 },

    #[error("invalid state snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("plan does not reach the goal")]
    GoalNotReached,

    #[error("novelty table for {atoms} atoms at width {arity} exceeds {limit} tuples")]
    NoveltyTableTooLarge { atoms: usize, arity: usize, limit: u64 },

    #[error("search instance has already finished")]
    SearchAlreadyFinished,

    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn unbound_variable(
        variable: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        Self::UnboundVariable {
            variable: variable.into(),
            context: context.into(),
        }
    }

    pub fn arity_mismatch(
        symbol: impl Into<String>,
        expected: usize,
        found: usize,
    ) -> Self {
        Self::ArityMismatch {
            symbol: symbol.into(),
            expected,
            found,
        }
    }

    pub fn category_conflict(
        predicate: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::CategoryConflict {
            predicate: predicate.into(),
            reason: reason.into(),
        }
    }
}
