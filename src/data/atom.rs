use super::index::define_index;
use super::symbol::{ObjectId, PredicateId, VariableId};

define_index!(
    /// Identifier for a lifted atom.
    AtomId
);
define_index!(
    /// Identifier for a lifted literal.
    LiteralId
);
define_index!(
    /// Dense index of a ground atom within its category.
    ///
    /// Static, fluent and derived ground atoms each have their own index space
    /// so states can hold them in bitsets.
    AtomIndex
);

/// Argument of a lifted atom.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Term {
    Object(ObjectId),
    Variable(VariableId),
}

impl Term {
    pub fn as_object(self) -> Option<ObjectId> {
        match self {
            Term::Object(object) => Some(object),
            Term::Variable(_) => None,
        }
    }

    pub fn is_variable(self) -> bool {
        matches!(self, Term::Variable(_))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Atom {
    pub predicate: PredicateId,
    pub terms: Vec<Term>,
}

impl Atom {
    pub fn new(predicate: PredicateId, terms: Vec<Term>) -> Self {
        Self { predicate, terms }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Literal {
    pub polarity: bool,
    pub atom: AtomId,
}

impl Literal {
    pub fn positive(atom: AtomId) -> Self {
        Self { polarity: true, atom }
    }

    pub fn negative(atom: AtomId) -> Self {
        Self { polarity: false, atom }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroundAtom {
    pub predicate: PredicateId,
    pub objects: Vec<ObjectId>,
}

impl GroundAtom {
    pub fn new(predicate: PredicateId, objects: Vec<ObjectId>) -> Self {
        Self { predicate, objects }
    }
}
