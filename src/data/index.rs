//! Dense integer indices and the interning table behind the repository.

use indexmap::IndexSet;
use rustc_hash::FxHasher;
use std::fmt;
use std::hash::{BuildHasherDefault, Hash};
use std::marker::PhantomData;

pub(crate) type FxBuildHasher = BuildHasherDefault<FxHasher>;

/// A dense index into one of the repository tables.
pub trait Idx: Copy + Eq + Hash + Ord + fmt::Debug {
    fn from_usize(raw: usize) -> Self;
    fn index(self) -> usize;
}

macro_rules! define_index {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Copy,
            Clone,
            Debug,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            pub const fn from_raw(raw: u32) -> Self {
                Self(raw)
            }

            pub const fn as_raw(self) -> u32 {
                self.0
            }
        }

        impl $crate::data::index::Idx for $name {
            fn from_usize(raw: usize) -> Self {
                Self(u32::try_from(raw).expect("index space exhausted"))
            }

            fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

pub(crate) use define_index;

/// Append-only interning table. Structurally equal values share one index,
/// and indices are handed out in first-seen order.
#[derive(Clone)]
pub struct Interner<I, T> {
    values: IndexSet<T, FxBuildHasher>,
    _marker: PhantomData<I>,
}

impl<I, T> Default for Interner<I, T> {
    fn default() -> Self {
        Self { values: IndexSet::default(), _marker: PhantomData }
    }
}

impl<I: Idx, T: Eq + Hash> Interner<I, T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the index of `value`, allocating the next one if unseen.
    pub fn intern(&mut self, value: T) -> I {
        let (index, _) = self.values.insert_full(value);
        I::from_usize(index)
    }

    /// Lookup without insertion.
    pub fn find(&self, value: &T) -> Option<I> {
        self.values.get_index_of(value).map(I::from_usize)
    }

    /// Panics if `id` was not produced by this table.
    pub fn get(&self, id: I) -> &T {
        &self.values[id.index()]
    }

    pub fn try_get(&self, id: I) -> Option<&T> {
        self.values.get_index(id.index())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = I> {
        (0..self.values.len()).map(I::from_usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = (I, &T)> {
        self.values
            .iter()
            .enumerate()
            .map(|(index, value)| (I::from_usize(index), value))
    }
}

impl<I, T: fmt::Debug> fmt::Debug for Interner<I, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.values.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{Idx, Interner};

    define_index!(TestId);

    #[test]
    fn interning_is_stable_and_dense() {
        let mut table: Interner<TestId, String> = Interner::new();
        let a = table.intern("a".to_string());
        let b = table.intern("b".to_string());
        let a_again = table.intern("a".to_string());
        assert_eq!(a, a_again);
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(table.len(), 2);
        assert_eq!(table.find(&"b".to_string()), Some(b));
        assert!(table.find(&"c".to_string()).is_none());
    }

    #[test]
    fn same_sequence_yields_same_indices() {
        let words = ["x", "y", "x", "z", "y"];
        let run = || {
            let mut table: Interner<TestId, &str> = Interner::new();
            words.iter().map(|w| table.intern(*w)).collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }
}
