//! The state space: initial state, applicable actions and successors.
//!
//! `StateSpace` owns the problem, the repository and everything derived
//! from them. All searches go through it.

use super::numeric::apply_numeric_effects;
use super::repository::StateRepository;
use super::types::{State, StateId, StateSnapshot};
use crate::config::{GroundingMode, Statistics};
use crate::data::{
    ActionSchemaId, Bitset, Category, FunctionCategory, GroundAction, GroundActionId,
    GroundConjunctiveCondition, Idx, ObjectId, Problem, Repository,
};
use crate::error::{Error, Result};
use crate::grounding::{explore, ActionGrounder, AssignmentSet, AxiomEvaluator, Reachability};
use crate::loader::{ProblemBuilder, TaskDescription};
use std::iter;
use tracing::info;

pub struct StateSpace {
    problem: Problem,
    repository: Repository,
    static_assignments: AssignmentSet,
    grounder: ActionGrounder,
    axioms: AxiomEvaluator,
    states: StateRepository,
    reachability: Reachability,
    initial: StateId,
}

impl StateSpace {
    pub fn new(problem: Problem, mut repository: Repository, mode: GroundingMode) -> Self {
        let static_assignments =
            AssignmentSet::from_atoms(&repository, Category::Static, &problem.static_atoms);
        // Interns every reachable atom before search so that atom indices,
        // and with them state snapshots, do not depend on the search.
        let reachability = explore(&problem, &mut repository, &static_assignments);
        let (grounder, axioms) = match mode {
            GroundingMode::Lifted => (
                ActionGrounder::lifted(&problem, &repository, &static_assignments),
                AxiomEvaluator::lifted(&problem, &repository, &static_assignments),
            ),
            GroundingMode::Grounded => (
                ActionGrounder::grounded(&problem, &mut repository, &reachability.actions),
                AxiomEvaluator::grounded(&problem, &mut repository, &reachability.axioms),
            ),
        };

        let mut space = Self {
            problem,
            repository,
            static_assignments,
            grounder,
            axioms,
            states: StateRepository::new(),
            reachability,
            initial: StateId::from_raw(0),
        };
        let fluent = space.problem.initial_fluent_atoms.clone();
        let numeric = space.problem.initial_numeric_values.clone();
        space.initial = space.intern(fluent, numeric);
        info!(
            mode = ?mode,
            fluent_atoms = space.problem.initial_fluent_atoms.len(),
            "state space ready"
        );
        space
    }

    /// Loads a task description and builds its state space.
    pub fn from_description(task: &TaskDescription, mode: GroundingMode) -> Result<Self> {
        let (problem, repository) = ProblemBuilder::new().build(task)?;
        Ok(Self::new(problem, repository, mode))
    }

    pub fn problem(&self) -> &Problem {
        &self.problem
    }

    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    pub fn mode(&self) -> GroundingMode {
        self.grounder.mode()
    }

    pub fn goal(&self) -> &GroundConjunctiveCondition {
        &self.problem.goal
    }

    pub fn initial_state(&self) -> StateId {
        self.initial
    }

    pub fn state(&self, id: StateId) -> &State {
        self.states.get(id)
    }

    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    /// Derives the axiom closure and interns the resulting state.
    fn intern(&mut self, fluent: Bitset, numeric: Vec<f64>) -> StateId {
        let derived = self.axioms.evaluate(
            &self.problem,
            &mut self.repository,
            &self.static_assignments,
            &fluent,
            &numeric,
        );
        self.states.insert(State::new(fluent, derived, numeric)).0
    }

    pub fn applicable_actions(&mut self, id: StateId) -> Vec<GroundActionId> {
        let state = self.states.get(id);
        let valuation = self
            .problem
            .valuation(&state.fluent, &state.derived, &state.numeric);
        self.grounder.applicable(
            &self.problem,
            &mut self.repository,
            &self.static_assignments,
            valuation,
        )
    }

    pub fn ground_action(&self, id: GroundActionId) -> &GroundAction {
        self.grounder.get(id)
    }

    /// Ground action for a schema and binding, checked against the schema.
    pub fn ground_action_for(
        &mut self,
        schema: ActionSchemaId,
        binding: Vec<ObjectId>,
    ) -> Result<GroundActionId> {
        let Some(declared) = self.problem.action_schemas.get(schema.index()) else {
            return Err(Error::UnknownActionSchema(format!("#{}", schema.as_raw())));
        };
        if declared.arity() != binding.len() {
            return Err(Error::arity_mismatch(
                declared.name.as_str(),
                declared.arity(),
                binding.len(),
            ));
        }
        if let Some(object) = binding
            .iter()
            .find(|object| object.index() >= self.repository.num_objects())
        {
            return Err(Error::UnknownObject(format!("#{}", object.as_raw())));
        }
        Ok(self
            .grounder
            .instantiate(&self.problem, &mut self.repository, schema, binding))
    }

    /// Applies `action` to state `id`.
    ///
    /// Conditional effects are evaluated in `id`, deletes are applied before
    /// adds, numeric effects in declaration order, and derived atoms are
    /// recomputed from scratch for the new state.
    pub fn successor(&mut self, id: StateId, action_id: GroundActionId) -> Result<(StateId, f64)> {
        let state = self.states.get(id);
        let action = self.grounder.get(action_id);
        let valuation = self
            .problem
            .valuation(&state.fluent, &state.derived, &state.numeric);
        if !action.precondition.is_satisfied(&valuation) {
            return Err(Error::ActionNotApplicable(self.format_action(action_id)));
        }
        let cost = action.cost.evaluate(&valuation);
        if !cost.is_finite() || cost < 0.0 {
            return Err(Error::InvalidActionCost {
                action: self.format_action(action_id),
                cost,
            });
        }

        let effects: Vec<_> = iter::once(&action.effect)
            .chain(
                action
                    .conditional_effects
                    .iter()
                    .filter(|conditional| conditional.condition.is_satisfied(&valuation))
                    .map(|conditional| &conditional.effect),
            )
            .collect();
        let mut fluent = state.fluent.clone();
        for effect in &effects {
            for atom in &effect.delete {
                fluent.remove(atom.index());
            }
        }
        for effect in &effects {
            for atom in &effect.add {
                fluent.insert(atom.index());
            }
        }
        let mut numeric = state.numeric.clone();
        apply_numeric_effects(
            &mut numeric,
            effects.iter().flat_map(|effect| effect.numeric.iter()),
            &valuation,
        );

        let successor = self.intern(fluent, numeric);
        Ok((successor, cost))
    }

    pub fn is_goal(&self, id: StateId) -> bool {
        self.satisfies(id, &self.problem.goal)
    }

    pub fn satisfies(&self, id: StateId, condition: &GroundConjunctiveCondition) -> bool {
        let state = self.states.get(id);
        condition.is_satisfied(
            &self
                .problem
                .valuation(&state.fluent, &state.derived, &state.numeric),
        )
    }

    /// Relaxed-reachable atoms, actions and axioms.
    pub fn reachability(&self) -> &Reachability {
        &self.reachability
    }

    pub fn format_action(&self, id: GroundActionId) -> String {
        let action = self.grounder.get(id);
        let name = &self.problem.action_schema(action.schema).name;
        self.repository.format_application(name, &action.binding)
    }

    pub fn describe_state(&self, id: StateId) -> String {
        self.states.get(id).describe(&self.repository)
    }

    pub fn snapshot(&self, id: StateId) -> StateSnapshot {
        self.states.get(id).snapshot()
    }

    /// Interns a snapshot taken from any state space of the same problem.
    /// Atoms outside the reachable set and surplus numeric values are
    /// rejected.
    pub fn restore(&mut self, snapshot: &StateSnapshot) -> Result<StateId> {
        let reachable = |atoms: &[u32], set: &Bitset| {
            atoms.iter().all(|&bit| set.contains(bit as usize))
        };
        if !reachable(&snapshot.fluent, &self.reachability.fluent_atoms) {
            return Err(Error::InvalidSnapshot(
                "fluent atom outside the reachable set".to_string(),
            ));
        }
        if !reachable(&snapshot.derived, &self.reachability.derived_atoms) {
            return Err(Error::InvalidSnapshot(
                "derived atom outside the reachable set".to_string(),
            ));
        }
        let functions = self.repository.ground_function_count(FunctionCategory::Fluent);
        if snapshot.numeric.len() > functions {
            return Err(Error::InvalidSnapshot(format!(
                "{} numeric values for {functions} fluent functions",
                snapshot.numeric.len()
            )));
        }
        Ok(self.states.insert(snapshot.restore()).0)
    }

    pub fn statistics(&self) -> Statistics {
        let mut statistics = Statistics::new();
        statistics.set("states", self.states.len() as u64);
        self.grounder.statistics(&mut statistics);
        self.axioms.statistics(&mut statistics);
        statistics
    }
}
