//! Ground action management.
//!
//! In lifted mode each schema's precondition gets a satisfier and applicable
//! actions are found per state. In grounded mode every relaxed-reachable
//! action is instantiated once and states only filter that list. Either way
//! ground actions are cached by (schema, binding), so asking twice for the
//! same instance yields the same id.

use super::assignment::AssignmentSet;
use super::ground::ground_action;
use super::satisfier::ConditionSatisfier;
use super::view::StateAssignments;
use crate::config::{GroundingMode, Statistics};
use crate::data::{
    ActionSchemaId, GroundAction, GroundActionId, Idx, ObjectId, Problem, Repository, Valuation,
};
use rustc_hash::FxHashMap;
use tracing::debug;

pub struct ActionGrounder {
    mode: GroundingMode,
    satisfiers: Vec<ConditionSatisfier>,
    cache: FxHashMap<(ActionSchemaId, Vec<ObjectId>), GroundActionId>,
    actions: Vec<GroundAction>,
    precomputed: Vec<GroundActionId>,
    cache_hits: u64,
    cache_misses: u64,
}

impl ActionGrounder {
    pub fn lifted(
        problem: &Problem,
        repository: &Repository,
        static_assignments: &AssignmentSet,
    ) -> Self {
        let satisfiers = problem
            .action_schemas
            .iter()
            .map(|schema| {
                ConditionSatisfier::new(
                    &schema.precondition,
                    repository,
                    &problem.static_atoms,
                    static_assignments,
                )
            })
            .collect();
        Self::with_mode(GroundingMode::Lifted, satisfiers)
    }

    /// Instantiates every action in `reachable` up front.
    pub fn grounded(
        problem: &Problem,
        repository: &mut Repository,
        reachable: &[(ActionSchemaId, Vec<ObjectId>)],
    ) -> Self {
        let mut grounder = Self::with_mode(GroundingMode::Grounded, Vec::new());
        for (schema, binding) in reachable {
            let id = grounder.instantiate(problem, repository, *schema, binding.clone());
            grounder.precomputed.push(id);
        }
        debug!(actions = grounder.precomputed.len(), "grounded all reachable actions");
        grounder
    }

    fn with_mode(mode: GroundingMode, satisfiers: Vec<ConditionSatisfier>) -> Self {
        Self {
            mode,
            satisfiers,
            cache: FxHashMap::default(),
            actions: Vec::new(),
            precomputed: Vec::new(),
            cache_hits: 0,
            cache_misses: 0,
        }
    }

    pub fn mode(&self) -> GroundingMode {
        self.mode
    }

    /// The cached ground action for (schema, binding), creating it if needed.
    pub fn instantiate(
        &mut self,
        problem: &Problem,
        repository: &mut Repository,
        schema: ActionSchemaId,
        binding: Vec<ObjectId>,
    ) -> GroundActionId {
        let key = (schema, binding);
        if let Some(&id) = self.cache.get(&key) {
            self.cache_hits += 1;
            return id;
        }
        self.cache_misses += 1;
        let id = GroundActionId::from_usize(self.actions.len());
        let action = ground_action(problem, repository, schema, key.1.clone(), id);
        self.actions.push(action);
        self.cache.insert(key, id);
        id
    }

    /// Actions whose precondition holds under `valuation`, in schema order.
    pub fn applicable(
        &mut self,
        problem: &Problem,
        repository: &mut Repository,
        static_assignments: &AssignmentSet,
        valuation: Valuation<'_>,
    ) -> Vec<GroundActionId> {
        let applicable: Vec<GroundActionId> = match self.mode {
            GroundingMode::Grounded => self
                .precomputed
                .iter()
                .copied()
                .filter(|id| self.actions[id.index()].precondition.is_satisfied(&valuation))
                .collect(),
            GroundingMode::Lifted => {
                let dynamic = StateAssignments::new(repository, &valuation);
                let view = dynamic.view(repository, valuation, static_assignments);
                let found: Vec<(ActionSchemaId, Vec<ObjectId>)> = self
                    .satisfiers
                    .iter()
                    .enumerate()
                    .flat_map(|(schema, satisfier)| {
                        satisfier
                            .bindings(view, None)
                            .map(move |binding| (ActionSchemaId::from_usize(schema), binding))
                    })
                    .collect();
                found
                    .into_iter()
                    .map(|(schema, binding)| self.instantiate(problem, repository, schema, binding))
                    .collect()
            }
        };
        debug_assert!(applicable
            .iter()
            .all(|id| self.actions[id.index()].precondition.is_satisfied(&valuation)));
        applicable
    }

    pub fn get(&self, id: GroundActionId) -> &GroundAction {
        &self.actions[id.index()]
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn statistics(&self, statistics: &mut Statistics) {
        statistics.set("grounding.actions", self.actions.len() as u64);
        statistics.set("grounding.cache_hits", self.cache_hits);
        statistics.set("grounding.cache_misses", self.cache_misses);
        for satisfier in &self.satisfiers {
            let counters = satisfier.statistics();
            statistics.increment_by("satisfier.invocations", counters.invocations);
            statistics.increment_by("satisfier.general_nodes", counters.general_nodes);
            statistics.increment_by("satisfier.cliques_explored", counters.cliques_explored);
            statistics.increment_by("satisfier.bindings_accepted", counters.bindings_accepted);
        }
    }
}
