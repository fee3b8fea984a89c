use super::best_first::{best_first, BestFirstConfig, Priority};
use super::heuristic::Heuristic;
use super::limits::SearchLimits;
use super::observer::SearchObserver;
use super::{SearchAlgorithm, SearchPhase, SearchResult};
use crate::config::EvaluationMode;
use crate::error::Result;
use crate::state::StateSpace;
use tracing::info;

/// Greedy best-first search ordered by `h` alone.
pub struct GreedyBestFirstSearch<H> {
    heuristic: H,
    config: BestFirstConfig,
    phase: SearchPhase,
}

impl<H: Heuristic> GreedyBestFirstSearch<H> {
    pub fn new(heuristic: H, limits: SearchLimits) -> Self {
        Self {
            heuristic,
            config: BestFirstConfig::new(Priority::Greedy, limits),
            phase: SearchPhase::Ready,
        }
    }

    pub fn with_evaluation(mut self, evaluation: EvaluationMode) -> Self {
        self.config.evaluation = evaluation;
        self
    }

    pub fn with_preferred_operators(mut self, weight: u32) -> Self {
        self.config.use_preferred = true;
        self.config.preferred_weight = weight;
        self
    }
}

impl<H: Heuristic> SearchAlgorithm for GreedyBestFirstSearch<H> {
    fn name(&self) -> &'static str {
        "gbfs"
    }

    fn phase(&self) -> SearchPhase {
        self.phase
    }

    fn search(
        &mut self,
        space: &mut StateSpace,
        observer: &mut dyn SearchObserver,
    ) -> Result<SearchResult> {
        self.phase.begin()?;
        info!(evaluation = ?self.config.evaluation, "starting greedy best-first search");
        let result = best_first(space, &self.heuristic, &self.config, observer);
        self.phase = SearchPhase::Finished;
        result
    }
}
