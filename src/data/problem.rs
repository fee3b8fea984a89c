use super::action::{ActionSchema, ActionSchemaId};
use super::axiom::{Axiom, AxiomId};
use super::bitset::Bitset;
use super::condition::{GroundConjunctiveCondition, Valuation};
use super::index::Idx;

/// A resolved planning task. Symbols live in the accompanying
/// [`Repository`](super::Repository).
#[derive(Clone, Debug, Default)]
pub struct Problem {
    pub name: String,
    pub action_schemas: Vec<ActionSchema>,
    pub axioms: Vec<Axiom>,
    /// Axioms grouped by stratum, lowest first.
    pub strata: Vec<Vec<AxiomId>>,
    pub static_atoms: Bitset,
    pub initial_fluent_atoms: Bitset,
    /// Static function values indexed by static `FunctionIndex`, `NaN` if undefined.
    pub static_values: Vec<f64>,
    pub initial_numeric_values: Vec<f64>,
    pub goal: GroundConjunctiveCondition,
}

impl Problem {
    pub fn action_schema(&self, id: ActionSchemaId) -> &ActionSchema {
        &self.action_schemas[id.index()]
    }

    pub fn action_schema_ids(&self) -> impl Iterator<Item = ActionSchemaId> {
        (0..self.action_schemas.len()).map(ActionSchemaId::from_usize)
    }

    pub fn find_action_schema(&self, name: &str) -> Option<ActionSchemaId> {
        self.action_schemas
            .iter()
            .position(|schema| schema.name == name)
            .map(ActionSchemaId::from_usize)
    }

    pub fn axiom(&self, id: AxiomId) -> &Axiom {
        &self.axioms[id.index()]
    }

    pub fn has_axioms(&self) -> bool {
        !self.axioms.is_empty()
    }

    /// Valuation over the static part of the problem and the given state parts.
    pub fn valuation<'a>(
        &'a self,
        fluent_atoms: &'a Bitset,
        derived_atoms: &'a Bitset,
        fluent_values: &'a [f64],
    ) -> Valuation<'a> {
        Valuation {
            static_atoms: &self.static_atoms,
            fluent_atoms,
            derived_atoms,
            static_values: &self.static_values,
            fluent_values,
        }
    }
}
