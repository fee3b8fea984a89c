use super::numeric::{canonical_bits, normalize};
use crate::data::index::define_index;
use crate::data::{Bitset, Category, Idx, Repository};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

define_index!(
    /// Identifier of an interned state within one state space.
    StateId
);

/// A search state: true fluent atoms, true derived atoms and fluent
/// function values (`NaN` where undefined).
#[derive(Clone, Debug)]
pub struct State {
    pub fluent: Bitset,
    pub derived: Bitset,
    pub numeric: Vec<f64>,
}

impl State {
    pub fn new(fluent: Bitset, derived: Bitset, mut numeric: Vec<f64>) -> Self {
        normalize(&mut numeric);
        Self {
            fluent,
            derived,
            numeric,
        }
    }

    pub fn atoms(&self, category: Category) -> Option<&Bitset> {
        match category {
            Category::Static => None,
            Category::Fluent => Some(&self.fluent),
            Category::Derived => Some(&self.derived),
        }
    }

    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            fluent: self.fluent.iter().map(|bit| bit as u32).collect(),
            derived: self.derived.iter().map(|bit| bit as u32).collect(),
            numeric: self
                .numeric
                .iter()
                .map(|value| (!value.is_nan()).then_some(*value))
                .collect(),
        }
    }

    /// `(at ball1 rooma) (free left) ...`, fluent atoms first.
    pub fn describe(&self, repository: &Repository) -> String {
        let mut atoms = Vec::new();
        for category in [Category::Fluent, Category::Derived] {
            if let Some(set) = self.atoms(category) {
                atoms.extend(
                    set.iter()
                        .map(|bit| repository.format_ground_atom(category, Idx::from_usize(bit))),
                );
            }
        }
        atoms.join(" ")
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.fluent == other.fluent
            && self.derived == other.derived
            && self.numeric.len() == other.numeric.len()
            && self
                .numeric
                .iter()
                .zip(&other.numeric)
                .all(|(a, b)| canonical_bits(*a) == canonical_bits(*b))
    }
}

impl Eq for State {}

impl Hash for State {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.fluent.hash(state);
        self.derived.hash(state);
        self.numeric.len().hash(state);
        for value in &self.numeric {
            canonical_bits(*value).hash(state);
        }
    }
}

/// Serialisable form of a state. Atom positions refer to the per-category
/// ground atom indices of the repository that produced it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub fluent: Vec<u32>,
    pub derived: Vec<u32>,
    pub numeric: Vec<Option<f64>>,
}

impl StateSnapshot {
    pub fn restore(&self) -> State {
        State::new(
            self.fluent.iter().map(|bit| *bit as usize).collect(),
            self.derived.iter().map(|bit| *bit as usize).collect(),
            self.numeric.iter().map(|value| value.unwrap_or(f64::NAN)).collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::State;
    use crate::data::Bitset;

    #[test]
    fn equal_contents_are_equal_states() {
        let a = State::new([1, 5].into_iter().collect(), Bitset::new(), vec![1.0, f64::NAN]);
        let mut fluent = Bitset::with_capacity(512);
        fluent.insert(5);
        fluent.insert(1);
        let b = State::new(fluent, Bitset::new(), vec![1.0]);
        assert_eq!(a, b);
        let c = State::new([1].into_iter().collect(), Bitset::new(), vec![1.0]);
        assert_ne!(a, c);
    }

    #[test]
    fn snapshot_round_trip() {
        let state = State::new([0, 3].into_iter().collect(), [2].into_iter().collect(), vec![
            f64::NAN,
            4.5,
        ]);
        let json = serde_json::to_string(&state.snapshot()).unwrap();
        let snapshot: super::StateSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snapshot.restore(), state);
    }
}
