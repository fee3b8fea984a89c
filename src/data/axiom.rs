use super::atom::{AtomId, AtomIndex};
use super::condition::{ConjunctiveCondition, GroundConjunctiveCondition};
use super::index::define_index;
use super::symbol::{ObjectId, VariableId};

define_index!(AxiomId);
define_index!(GroundAxiomId);

/// Derivation rule: when `body` holds under a binding of `parameters`, the
/// derived atom `head` holds under the same binding.
#[derive(Clone, Debug, PartialEq)]
pub struct Axiom {
    pub parameters: Vec<VariableId>,
    pub body: ConjunctiveCondition,
    pub head: AtomId,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GroundAxiom {
    pub id: GroundAxiomId,
    pub axiom: AxiomId,
    pub binding: Vec<ObjectId>,
    pub body: GroundConjunctiveCondition,
    pub head: AtomIndex,
}
