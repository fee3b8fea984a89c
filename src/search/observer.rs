use super::plan::Plan;
use crate::config::Statistics;
use crate::data::GroundActionId;
use crate::state::StateId;
use tracing::{debug, info};

/// Callbacks fired by the search algorithms. Every method defaults to a
/// no-op.
pub trait SearchObserver {
    fn on_generate(&mut self, _parent: StateId, _action: GroundActionId, _state: StateId) {}
    fn on_expand(&mut self, _state: StateId) {}
    fn on_prune(&mut self, _state: StateId) {}
    /// All states of `depth` have been expanded.
    fn on_layer_finished(&mut self, _depth: usize, _states: usize) {}
    fn on_new_best_h(&mut self, _h: f64) {}
    fn on_solved(&mut self, _plan: &Plan) {}
    fn on_unsolvable(&mut self) {}
    fn on_exhausted(&mut self) {}
}

impl<O: SearchObserver + ?Sized> SearchObserver for &mut O {
    fn on_generate(&mut self, parent: StateId, action: GroundActionId, state: StateId) {
        (**self).on_generate(parent, action, state)
    }
    fn on_expand(&mut self, state: StateId) {
        (**self).on_expand(state)
    }
    fn on_prune(&mut self, state: StateId) {
        (**self).on_prune(state)
    }
    fn on_layer_finished(&mut self, depth: usize, states: usize) {
        (**self).on_layer_finished(depth, states)
    }
    fn on_new_best_h(&mut self, h: f64) {
        (**self).on_new_best_h(h)
    }
    fn on_solved(&mut self, plan: &Plan) {
        (**self).on_solved(plan)
    }
    fn on_unsolvable(&mut self) {
        (**self).on_unsolvable()
    }
    fn on_exhausted(&mut self) {
        (**self).on_exhausted()
    }
}

#[derive(Copy, Clone, Debug, Default)]
pub struct NoopObserver;

impl SearchObserver for NoopObserver {}

/// Counts events and reports progress through `tracing`.
#[derive(Clone, Debug, Default)]
pub struct StatisticsObserver {
    statistics: Statistics,
    best_h: Option<f64>,
}

impl StatisticsObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    pub fn best_h(&self) -> Option<f64> {
        self.best_h
    }
}

impl SearchObserver for StatisticsObserver {
    fn on_generate(&mut self, _parent: StateId, _action: GroundActionId, _state: StateId) {
        self.statistics.increment("generated");
    }

    fn on_expand(&mut self, _state: StateId) {
        self.statistics.increment("expanded");
    }

    fn on_prune(&mut self, _state: StateId) {
        self.statistics.increment("pruned");
    }

    fn on_layer_finished(&mut self, depth: usize, states: usize) {
        self.statistics.increment("layers");
        debug!(depth, states, "layer finished");
    }

    fn on_new_best_h(&mut self, h: f64) {
        self.best_h = Some(h);
        let expanded = self.statistics.get("expanded").unwrap_or(0);
        info!(h, expanded, "new best heuristic value");
    }

    fn on_solved(&mut self, plan: &Plan) {
        info!(length = plan.len(), cost = plan.cost, "solution found");
    }

    fn on_unsolvable(&mut self) {
        info!("task is unsolvable");
    }

    fn on_exhausted(&mut self) {
        info!("search space exhausted without a solution");
    }
}

#[cfg(test)]
mod tests {
    use super::{SearchObserver, StatisticsObserver};
    use crate::data::GroundActionId;
    use crate::state::StateId;

    fn forward(mut observer: impl SearchObserver) {
        observer.on_expand(StateId::from_raw(0));
        observer.on_generate(StateId::from_raw(0), GroundActionId::from_raw(0), StateId::from_raw(1));
        observer.on_prune(StateId::from_raw(1));
        observer.on_new_best_h(3.0);
    }

    #[test]
    fn counts_events_through_mutable_reference() {
        let mut observer = StatisticsObserver::new();
        forward(&mut observer);
        forward(&mut observer);
        assert_eq!(observer.statistics().get("expanded"), Some(2));
        assert_eq!(observer.statistics().get("generated"), Some(2));
        assert_eq!(observer.statistics().get("pruned"), Some(2));
        assert_eq!(observer.best_h(), Some(3.0));
    }
}
