use super::index::define_index;
use serde::{Deserialize, Serialize};
use std::fmt;

define_index!(
    /// Identifier for an object in the repository.
    ObjectId
);
define_index!(
    /// Identifier for a schema variable.
    VariableId
);
define_index!(
    /// Identifier for a predicate symbol.
    PredicateId
);
define_index!(
    /// Identifier for a numeric function symbol.
    FunctionId
);

/// Predicate categories.
///
/// Static predicates are fixed by the initial state, fluent predicates are
/// changed by action effects and derived predicates are defined by axioms.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Static,
    Fluent,
    Derived,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Static, Category::Fluent, Category::Derived];

    /// Position in per-category tables.
    pub const fn slot(self) -> usize {
        match self {
            Category::Static => 0,
            Category::Fluent => 1,
            Category::Derived => 2,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Category::Static => "static",
            Category::Fluent => "fluent",
            Category::Derived => "derived",
        };
        f.write_str(text)
    }
}

/// Categories for numeric functions. There are no derived functions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionCategory {
    Static,
    Fluent,
}

impl FunctionCategory {
    pub const fn slot(self) -> usize {
        match self {
            FunctionCategory::Static => 0,
            FunctionCategory::Fluent => 1,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Object {
    pub name: String,
}

impl Object {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A schema variable. `parameter_index` is its position in the parameter
/// list of the schema that declares it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Variable {
    pub name: String,
    pub parameter_index: usize,
}

impl Variable {
    pub fn new(name: impl Into<String>, parameter_index: usize) -> Self {
        Self {
            name: name.into(),
            parameter_index,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Predicate {
    pub name: String,
    pub arity: usize,
    pub category: Category,
}

impl Predicate {
    pub fn new(name: impl Into<String>, arity: usize, category: Category) -> Self {
        Self {
            name: name.into(),
            arity,
            category,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FunctionSkeleton {
    pub name: String,
    pub arity: usize,
    pub category: FunctionCategory,
}

impl FunctionSkeleton {
    pub fn new(name: impl Into<String>, arity: usize, category: FunctionCategory) -> Self {
        Self {
            name: name.into(),
            arity,
            category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Category, ObjectId};

    #[test]
    fn category_slots_are_distinct() {
        let slots: Vec<usize> = Category::ALL.iter().map(|c| c.slot()).collect();
        assert_eq!(slots, vec![0, 1, 2]);
    }

    #[test]
    fn ids_round_trip_raw() {
        let id = ObjectId::from_raw(7);
        assert_eq!(id.as_raw(), 7);
    }
}
