use super::assignment::AssignmentSet;
use crate::data::{Category, Repository, Valuation};

/// Everything the satisfier reads while enumerating bindings in one state:
/// the repository, the true atoms and values, and the assignment sets of
/// each category.
#[derive(Copy, Clone)]
pub struct AtomView<'a> {
    pub repository: &'a Repository,
    pub valuation: Valuation<'a>,
    pub static_assignments: &'a AssignmentSet,
    pub fluent_assignments: &'a AssignmentSet,
    pub derived_assignments: &'a AssignmentSet,
}

impl<'a> AtomView<'a> {
    pub fn assignments(&self, category: Category) -> &'a AssignmentSet {
        match category {
            Category::Static => self.static_assignments,
            Category::Fluent => self.fluent_assignments,
            Category::Derived => self.derived_assignments,
        }
    }
}

/// Owned assignment sets for the dynamic part of one state.
#[derive(Clone, Debug, Default)]
pub struct StateAssignments {
    pub fluent: AssignmentSet,
    pub derived: AssignmentSet,
}

impl StateAssignments {
    pub fn new(repository: &Repository, valuation: &Valuation<'_>) -> Self {
        Self {
            fluent: AssignmentSet::from_atoms(repository, Category::Fluent, valuation.fluent_atoms),
            derived: AssignmentSet::from_atoms(
                repository,
                Category::Derived,
                valuation.derived_atoms,
            ),
        }
    }

    pub fn view<'a>(
        &'a self,
        repository: &'a Repository,
        valuation: Valuation<'a>,
        static_assignments: &'a AssignmentSet,
    ) -> AtomView<'a> {
        AtomView {
            repository,
            valuation,
            static_assignments,
            fluent_assignments: &self.fluent,
            derived_assignments: &self.derived,
        }
    }
}
