use super::atom::{AtomIndex, LiteralId};
use super::bitset::Bitset;
use super::function::{GroundFunctionRef, GroundNumericConstraint, NumericConstraint};
use super::index::Idx;
use super::symbol::{Category, VariableId};

/// Lifted conjunction of literals and numeric constraints over a parameter
/// list. Literals are partitioned by the category of their predicate.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConjunctiveCondition {
    pub parameters: Vec<VariableId>,
    pub static_literals: Vec<LiteralId>,
    pub fluent_literals: Vec<LiteralId>,
    pub derived_literals: Vec<LiteralId>,
    pub numeric_constraints: Vec<NumericConstraint>,
}

impl ConjunctiveCondition {
    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    pub fn literals(&self, category: Category) -> &[LiteralId] {
        match category {
            Category::Static => &self.static_literals,
            Category::Fluent => &self.fluent_literals,
            Category::Derived => &self.derived_literals,
        }
    }

    pub fn literals_mut(&mut self, category: Category) -> &mut Vec<LiteralId> {
        match category {
            Category::Static => &mut self.static_literals,
            Category::Fluent => &mut self.fluent_literals,
            Category::Derived => &mut self.derived_literals,
        }
    }

    pub fn all_literals(&self) -> impl Iterator<Item = (Category, LiteralId)> + '_ {
        Category::ALL
            .into_iter()
            .flat_map(move |category| self.literals(category).iter().map(move |l| (category, *l)))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GroundAtomSets {
    pub positive: Vec<AtomIndex>,
    pub negative: Vec<AtomIndex>,
}

impl GroundAtomSets {
    pub fn push(&mut self, polarity: bool, atom: AtomIndex) {
        if polarity {
            self.positive.push(atom);
        } else {
            self.negative.push(atom);
        }
    }

    pub fn is_satisfied(&self, atoms: &Bitset) -> bool {
        self.positive.iter().all(|atom| atoms.contains(atom.index()))
            && self.negative.iter().all(|atom| !atoms.contains(atom.index()))
    }

    pub fn len(&self) -> usize {
        self.positive.len() + self.negative.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positive.is_empty() && self.negative.is_empty()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GroundConjunctiveCondition {
    pub static_atoms: GroundAtomSets,
    pub fluent_atoms: GroundAtomSets,
    pub derived_atoms: GroundAtomSets,
    pub numeric_constraints: Vec<GroundNumericConstraint>,
}

impl GroundConjunctiveCondition {
    pub fn atoms(&self, category: Category) -> &GroundAtomSets {
        match category {
            Category::Static => &self.static_atoms,
            Category::Fluent => &self.fluent_atoms,
            Category::Derived => &self.derived_atoms,
        }
    }

    pub fn atoms_mut(&mut self, category: Category) -> &mut GroundAtomSets {
        match category {
            Category::Static => &mut self.static_atoms,
            Category::Fluent => &mut self.fluent_atoms,
            Category::Derived => &mut self.derived_atoms,
        }
    }

    pub fn is_satisfied(&self, valuation: &Valuation<'_>) -> bool {
        self.static_atoms.is_satisfied(valuation.static_atoms)
            && self.fluent_atoms.is_satisfied(valuation.fluent_atoms)
            && self.derived_atoms.is_satisfied(valuation.derived_atoms)
            && self
                .numeric_constraints
                .iter()
                .all(|constraint| constraint.is_satisfied(valuation))
    }

    /// Number of literals, not counting numeric constraints.
    pub fn literal_count(&self) -> usize {
        self.static_atoms.len() + self.fluent_atoms.len() + self.derived_atoms.len()
    }
}

/// Read-only view of everything a ground condition can mention: the static
/// atoms and values of the problem plus one state.
#[derive(Copy, Clone, Debug)]
pub struct Valuation<'a> {
    pub static_atoms: &'a Bitset,
    pub fluent_atoms: &'a Bitset,
    pub derived_atoms: &'a Bitset,
    pub static_values: &'a [f64],
    pub fluent_values: &'a [f64],
}

impl<'a> Valuation<'a> {
    pub fn atoms(&self, category: Category) -> &'a Bitset {
        match category {
            Category::Static => self.static_atoms,
            Category::Fluent => self.fluent_atoms,
            Category::Derived => self.derived_atoms,
        }
    }

    pub fn holds(&self, category: Category, atom: AtomIndex) -> bool {
        self.atoms(category).contains(atom.index())
    }

    /// `NaN` when the function has no value.
    pub fn value(&self, function: GroundFunctionRef) -> f64 {
        let (values, index) = match function {
            GroundFunctionRef::Static(index) => (self.static_values, index),
            GroundFunctionRef::Fluent(index) => (self.fluent_values, index),
        };
        values.get(index.index()).copied().unwrap_or(f64::NAN)
    }
}
