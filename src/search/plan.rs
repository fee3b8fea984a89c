//! Plans: serialisation and validation.

use crate::data::{ActionSchemaId, ObjectId};
use crate::error::{Error, Result};
use crate::state::{StateId, StateSpace};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlanStep {
    pub schema: ActionSchemaId,
    pub binding: Vec<ObjectId>,
    pub cost: f64,
}

/// A sequence of action instances and its total cost.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub steps: Vec<PlanStep>,
    pub cost: f64,
}

impl Plan {
    pub fn from_steps(steps: Vec<PlanStep>) -> Self {
        let cost = steps.iter().map(|step| step.cost).sum();
        Self { steps, cost }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Appends `other`, as when chaining the subplans of a serialized search.
    pub fn extend(&mut self, other: Plan) {
        self.cost += other.cost;
        self.steps.extend(other.steps);
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    /// Applies the plan from the initial state. Fails if a step is not
    /// applicable or the final state is not a goal state; returns the final
    /// state otherwise.
    pub fn validate(&self, space: &mut StateSpace) -> Result<StateId> {
        let mut state = space.initial_state();
        for step in &self.steps {
            let action = space.ground_action_for(step.schema, step.binding.clone())?;
            state = space.successor(state, action)?.0;
        }
        if space.is_goal(state) {
            Ok(state)
        } else {
            Err(Error::GoalNotReached)
        }
    }

    /// One `(action obj ...)` line per step.
    pub fn format(&self, space: &StateSpace) -> Vec<String> {
        let problem = space.problem();
        self.steps
            .iter()
            .map(|step| {
                let name = problem
                    .action_schemas
                    .get(step.schema.as_raw() as usize)
                    .map_or("?", |schema| schema.name.as_str());
                space.repository().format_application(name, &step.binding)
            })
            .collect()
    }
}
