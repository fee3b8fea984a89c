//! Planner options.
//!
//! Loaded from TOML. Every field has a default, so an empty file (or no
//! file at all) describes a blind breadth-first search in lifted mode.

use crate::error::{Error, Result};
use crate::search::SearchLimits;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// How ground actions and axioms are produced.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroundingMode {
    /// Instantiate on demand per state.
    #[default]
    Lifted,
    /// Enumerate every relaxed-reachable instance once, then filter per state.
    Grounded,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchAlgorithmKind {
    #[default]
    Brfs,
    Astar,
    Gbfs,
    Iw,
    Siw,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationMode {
    #[default]
    Eager,
    Lazy,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeuristicKind {
    #[default]
    Blind,
    GoalCount,
}

/// Resource limits. Zero means unlimited.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitOptions {
    pub max_seconds: f64,
    pub max_states: usize,
    pub max_expansions: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerOptions {
    pub search: SearchAlgorithmKind,
    pub evaluation: EvaluationMode,
    pub grounding: GroundingMode,
    pub heuristic: HeuristicKind,
    /// Pops from the preferred queue per pop from the regular queue.
    pub preferred_weight: u32,
    /// Use preferred operators of the heuristic, if it has any.
    pub use_preferred: bool,
    /// Largest width tried by iterated width and SIW. Fixed width for `iw`
    /// when `iterate_width` is false.
    pub max_arity: usize,
    pub iterate_width: bool,
    pub limits: LimitOptions,
}

impl Default for PlannerOptions {
    fn default() -> Self {
        Self {
            search: SearchAlgorithmKind::default(),
            evaluation: EvaluationMode::default(),
            grounding: GroundingMode::default(),
            heuristic: HeuristicKind::default(),
            preferred_weight: 1,
            use_preferred: false,
            max_arity: 2,
            iterate_width: true,
            limits: LimitOptions::default(),
        }
    }
}

impl PlannerOptions {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let options: PlannerOptions = toml::from_str(content)?;
        options.validate()?;
        Ok(options)
    }

    /// Unlike a missing file, a malformed one is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let options = Self::from_toml_str(&content)?;
        tracing::info!("loaded planner options from {}", path.display());
        Ok(options)
    }

    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }

    pub fn validate(&self) -> Result<()> {
        if !self.limits.max_seconds.is_finite() || self.limits.max_seconds < 0.0 {
            return Err(Error::Config(format!(
                "max_seconds must be a non-negative number, got {}",
                self.limits.max_seconds
            )));
        }
        if self.max_arity == 0
            && matches!(self.search, SearchAlgorithmKind::Iw | SearchAlgorithmKind::Siw)
        {
            return Err(Error::Config("width search needs max_arity >= 1".into()));
        }
        Ok(())
    }

    pub fn search_limits(&self) -> SearchLimits {
        let limits = &self.limits;
        SearchLimits {
            max_time: (limits.max_seconds > 0.0).then(|| Duration::from_secs_f64(limits.max_seconds)),
            max_states: (limits.max_states > 0).then_some(limits.max_states),
            max_expansions: (limits.max_expansions > 0).then_some(limits.max_expansions),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let options = PlannerOptions::from_toml_str("").unwrap();
        assert_eq!(options, PlannerOptions::default());
        assert_eq!(options.search_limits(), SearchLimits::default());
    }

    #[test]
    fn parses_nested_limits() {
        let options = PlannerOptions::from_toml_str(
            r#"
            search = "astar"
            evaluation = "lazy"
            grounding = "grounded"
            heuristic = "goal_count"

            [limits]
            max_seconds = 1.5
            max_expansions = 100
            "#,
        )
        .unwrap();
        assert_eq!(options.search, SearchAlgorithmKind::Astar);
        assert_eq!(options.evaluation, EvaluationMode::Lazy);
        assert_eq!(options.grounding, GroundingMode::Grounded);
        assert_eq!(options.heuristic, HeuristicKind::GoalCount);
        let limits = options.search_limits();
        assert_eq!(limits.max_time, Some(Duration::from_millis(1500)));
        assert_eq!(limits.max_expansions, Some(100));
        assert_eq!(limits.max_states, None);
    }

    #[test]
    fn rejects_unknown_search() {
        assert!(PlannerOptions::from_toml_str("search = \"dfs\"").is_err());
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("planner.toml");
        let mut options = PlannerOptions::default();
        options.search = SearchAlgorithmKind::Siw;
        options.max_arity = 3;
        std::fs::write(&path, options.to_toml()).unwrap();
        assert_eq!(PlannerOptions::load(&path).unwrap(), options);
    }
}
