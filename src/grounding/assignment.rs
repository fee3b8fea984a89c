//! Assignment sets: which (position, object) pairs and pairs of pairs occur
//! in some true atom of a predicate.
//!
//! They are a necessary condition for a positive literal: if the literal
//! holds under a binding, every single and paired argument of the binding is
//! recorded here. The satisfier uses them to prune domains and clique graph
//! edges before doing exact atom lookups.

use super::pattern::{Arg, LiteralPattern};
use crate::data::{Bitset, Category, Idx, ObjectId, PredicateId, Repository};
use rustc_hash::FxHashSet;

type UnaryKey = (PredicateId, usize, ObjectId);
type BinaryKey = (PredicateId, usize, ObjectId, usize, ObjectId);

#[derive(Clone, Debug, Default)]
pub struct AssignmentSet {
    nullary: FxHashSet<PredicateId>,
    unary: FxHashSet<UnaryKey>,
    binary: FxHashSet<BinaryKey>,
}

impl AssignmentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assignment set of the true ground atoms of one category.
    pub fn from_atoms(repository: &Repository, category: Category, atoms: &Bitset) -> Self {
        let mut set = Self::new();
        for index in atoms.iter() {
            let atom = repository.ground_atom(category, Idx::from_usize(index));
            set.insert(atom.predicate, &atom.objects);
        }
        set
    }

    pub fn insert(&mut self, predicate: PredicateId, objects: &[ObjectId]) {
        if objects.is_empty() {
            self.nullary.insert(predicate);
        }
        for (i, &first) in objects.iter().enumerate() {
            self.unary.insert((predicate, i, first));
            for (k, &second) in objects.iter().enumerate().skip(i + 1) {
                self.binary.insert((predicate, i, first, k, second));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.nullary.len() + self.unary.len() + self.binary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn pair(&self, predicate: PredicateId, i: usize, oi: ObjectId, k: usize, ok: ObjectId) -> bool {
        if i < k {
            self.binary.contains(&(predicate, i, oi, k, ok))
        } else {
            self.binary.contains(&(predicate, k, ok, i, oi))
        }
    }

    /// Could `pattern` hold with `parameter` bound to `object`, other
    /// parameters free?
    pub fn admits_unary(&self, pattern: &LiteralPattern, parameter: usize, object: ObjectId) -> bool {
        let predicate = pattern.predicate;
        if pattern.args.is_empty() {
            return self.nullary.contains(&predicate);
        }
        for (j, arg) in pattern.args.iter().enumerate() {
            if *arg != Arg::Parameter(parameter) {
                continue;
            }
            if !self.unary.contains(&(predicate, j, object)) {
                return false;
            }
            for (c, other) in pattern.args.iter().enumerate() {
                if c == j {
                    continue;
                }
                let other_object = match *other {
                    Arg::Object(constant) => constant,
                    Arg::Parameter(p) if p == parameter => object,
                    Arg::Parameter(_) => continue,
                };
                if !self.pair(predicate, j, object, c, other_object) {
                    return false;
                }
            }
        }
        true
    }

    /// Could `pattern` hold with `x` bound to `ox` and `y` bound to `oy`?
    pub fn admits_binary(
        &self,
        pattern: &LiteralPattern,
        x: usize,
        ox: ObjectId,
        y: usize,
        oy: ObjectId,
    ) -> bool {
        let predicate = pattern.predicate;
        for (j, first) in pattern.args.iter().enumerate() {
            if *first != Arg::Parameter(x) {
                continue;
            }
            for (l, second) in pattern.args.iter().enumerate() {
                if *second == Arg::Parameter(y) && !self.pair(predicate, j, ox, l, oy) {
                    return false;
                }
            }
        }
        true
    }
}
