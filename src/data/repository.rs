//! The symbol repository: one interning table per kind of entity.
//!
//! Every symbol, atom and literal of a problem, and every ground atom or
//! ground function created while grounding, is owned by the repository and
//! referred to elsewhere by its dense index. Interning the same value twice
//! returns the same index.

use super::atom::{Atom, AtomId, AtomIndex, GroundAtom, Literal, LiteralId, Term};
use super::function::{FunctionIndex, GroundFunction};
use super::index::{FxBuildHasher, Interner};
use super::symbol::{
    Category, FunctionCategory, FunctionId, FunctionSkeleton, Object, ObjectId, Predicate,
    PredicateId, Variable, VariableId,
};
use crate::error::{Error, Result};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct Repository {
    objects: Interner<ObjectId, Object>,
    variables: Interner<VariableId, Variable>,
    predicates: Interner<PredicateId, Predicate>,
    predicate_names: HashMap<String, PredicateId, FxBuildHasher>,
    functions: Interner<FunctionId, FunctionSkeleton>,
    function_names: HashMap<String, FunctionId, FxBuildHasher>,
    atoms: Interner<AtomId, Atom>,
    literals: Interner<LiteralId, Literal>,
    ground_atoms: [Interner<AtomIndex, GroundAtom>; 3],
    ground_functions: [Interner<FunctionIndex, GroundFunction>; 2],
}

impl Repository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern_object(&mut self, name: impl Into<String>) -> ObjectId {
        self.objects.intern(Object::new(name))
    }

    pub fn find_object(&self, name: &str) -> Option<ObjectId> {
        self.objects.find(&Object::new(name))
    }

    pub fn object(&self, id: ObjectId) -> &Object {
        self.objects.get(id)
    }

    pub fn object_ids(&self) -> impl Iterator<Item = ObjectId> {
        self.objects.ids()
    }

    pub fn num_objects(&self) -> usize {
        self.objects.len()
    }

    pub fn intern_variable(&mut self, name: impl Into<String>, parameter_index: usize) -> VariableId {
        self.variables.intern(Variable::new(name, parameter_index))
    }

    pub fn variable(&self, id: VariableId) -> &Variable {
        self.variables.get(id)
    }

    /// Declares a predicate. Names are unique regardless of arity.
    pub fn add_predicate(
        &mut self,
        name: &str,
        arity: usize,
        category: Category,
    ) -> Result<PredicateId> {
        if self.predicate_names.contains_key(name) {
            return Err(Error::DuplicateSymbol {
                kind: "predicate",
                name: name.to_string(),
            });
        }
        let id = self.predicates.intern(Predicate::new(name, arity, category));
        self.predicate_names.insert(name.to_string(), id);
        Ok(id)
    }

    pub fn find_predicate(&self, name: &str) -> Option<PredicateId> {
        self.predicate_names.get(name).copied()
    }

    pub fn predicate(&self, id: PredicateId) -> &Predicate {
        self.predicates.get(id)
    }

    pub fn predicates(&self) -> impl Iterator<Item = (PredicateId, &Predicate)> {
        self.predicates.iter()
    }

    pub fn add_function(
        &mut self,
        name: &str,
        arity: usize,
        category: FunctionCategory,
    ) -> Result<FunctionId> {
        if self.function_names.contains_key(name) {
            return Err(Error::DuplicateSymbol {
                kind: "function",
                name: name.to_string(),
            });
        }
        let id = self
            .functions
            .intern(FunctionSkeleton::new(name, arity, category));
        self.function_names.insert(name.to_string(), id);
        Ok(id)
    }

    pub fn find_function(&self, name: &str) -> Option<FunctionId> {
        self.function_names.get(name).copied()
    }

    pub fn function(&self, id: FunctionId) -> &FunctionSkeleton {
        self.functions.get(id)
    }

    pub fn intern_atom(&mut self, atom: Atom) -> AtomId {
        self.atoms.intern(atom)
    }

    pub fn atom(&self, id: AtomId) -> &Atom {
        self.atoms.get(id)
    }

    pub fn intern_literal(&mut self, literal: Literal) -> LiteralId {
        self.literals.intern(literal)
    }

    pub fn literal(&self, id: LiteralId) -> Literal {
        *self.literals.get(id)
    }

    /// Atom of a literal, resolved.
    pub fn literal_atom(&self, id: LiteralId) -> &Atom {
        self.atom(self.literal(id).atom)
    }

    pub fn atom_category(&self, id: AtomId) -> Category {
        self.predicate(self.atom(id).predicate).category
    }

    pub fn intern_ground_atom(&mut self, category: Category, atom: GroundAtom) -> AtomIndex {
        self.ground_atoms[category.slot()].intern(atom)
    }

    pub fn find_ground_atom(&self, category: Category, atom: &GroundAtom) -> Option<AtomIndex> {
        self.ground_atoms[category.slot()].find(atom)
    }

    pub fn ground_atom(&self, category: Category, index: AtomIndex) -> &GroundAtom {
        self.ground_atoms[category.slot()].get(index)
    }

    pub fn ground_atom_count(&self, category: Category) -> usize {
        self.ground_atoms[category.slot()].len()
    }

    pub fn intern_ground_function(
        &mut self,
        category: FunctionCategory,
        function: GroundFunction,
    ) -> FunctionIndex {
        self.ground_functions[category.slot()].intern(function)
    }

    pub fn find_ground_function(
        &self,
        category: FunctionCategory,
        function: &GroundFunction,
    ) -> Option<FunctionIndex> {
        self.ground_functions[category.slot()].find(function)
    }

    pub fn ground_function(&self, category: FunctionCategory, index: FunctionIndex) -> &GroundFunction {
        self.ground_functions[category.slot()].get(index)
    }

    pub fn ground_function_count(&self, category: FunctionCategory) -> usize {
        self.ground_functions[category.slot()].len()
    }

    pub fn format_ground_atom(&self, category: Category, index: AtomIndex) -> String {
        let atom = self.ground_atom(category, index);
        self.format_application(&self.predicate(atom.predicate).name, &atom.objects)
    }

    pub fn format_atom(&self, id: AtomId) -> String {
        let atom = self.atom(id);
        let mut text = format!("({}", self.predicate(atom.predicate).name);
        for term in &atom.terms {
            text.push(' ');
            match term {
                Term::Object(object) => text.push_str(&self.object(*object).name),
                Term::Variable(variable) => text.push_str(&self.variable(*variable).name),
            }
        }
        text.push(')');
        text
    }

    /// `(name o1 o2 ...)`
    pub fn format_application(&self, name: &str, objects: &[ObjectId]) -> String {
        let mut text = format!("({name}");
        for object in objects {
            text.push(' ');
            text.push_str(&self.object(*object).name);
        }
        text.push(')');
        text
    }
}
