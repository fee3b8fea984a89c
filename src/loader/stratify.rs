//! Axiom stratification.
//!
//! A derived predicate must sit in a stratum at least as high as every
//! derived predicate it depends on positively, and strictly higher than every
//! one it depends on negatively. Strata are raised until nothing changes; a
//! stratum number above the number of derived predicates can only come from
//! a negative cycle.

use crate::data::{Axiom, AxiomId, Category, Idx, PredicateId, Repository};
use crate::error::{Error, Result};
use std::collections::BTreeMap;

pub fn stratify(repository: &Repository, axioms: &[Axiom]) -> Result<Vec<Vec<AxiomId>>> {
    let mut stratum: BTreeMap<PredicateId, usize> = repository
        .predicates()
        .filter(|(_, predicate)| predicate.category == Category::Derived)
        .map(|(id, _)| (id, 0))
        .collect();
    let bound = stratum.len();

    let mut changed = true;
    while changed {
        changed = false;
        for axiom in axioms {
            let head = repository.atom(axiom.head).predicate;
            for &literal_id in &axiom.body.derived_literals {
                let literal = repository.literal(literal_id);
                let dependency = repository.atom(literal.atom).predicate;
                let required = stratum[&dependency] + usize::from(!literal.polarity);
                let current = stratum[&head];
                if current < required {
                    if required > bound {
                        return Err(Error::NotStratifiable(
                            repository.predicate(head).name.clone(),
                        ));
                    }
                    stratum.insert(head, required);
                    changed = true;
                }
            }
        }
    }

    let mut strata: BTreeMap<usize, Vec<AxiomId>> = BTreeMap::new();
    for (index, axiom) in axioms.iter().enumerate() {
        let head = repository.atom(axiom.head).predicate;
        strata
            .entry(stratum[&head])
            .or_default()
            .push(AxiomId::from_usize(index));
    }
    Ok(strata.into_values().collect())
}

#[cfg(test)]
mod tests {
    use crate::error::Error;
    use crate::loader::{ProblemBuilder, TaskDescription};

    fn task(axioms: &str) -> TaskDescription {
        TaskDescription::from_json_str(&format!(
            r#"{{
                "objects": ["a"],
                "predicates": [
                    {{"name": "base", "arity": 1}},
                    {{"name": "p", "arity": 1}},
                    {{"name": "q", "arity": 1}},
                    {{"name": "r", "arity": 1}}
                ],
                "axioms": {axioms}
            }}"#
        ))
        .unwrap()
    }

    #[test]
    fn negative_dependency_raises_stratum() {
        let description = task(
            r#"[
                {"parameters": ["?x"], "head": {"predicate": "r", "args": ["?x"]},
                 "body": [{"predicate": "q", "args": ["?x"], "negated": true}]},
                {"parameters": ["?x"], "head": {"predicate": "q", "args": ["?x"]},
                 "body": [{"predicate": "p", "args": ["?x"]}]},
                {"parameters": ["?x"], "head": {"predicate": "p", "args": ["?x"]},
                 "body": [{"predicate": "base", "args": ["?x"]}]}
            ]"#,
        );
        let (problem, _) = ProblemBuilder::new().build(&description).unwrap();
        assert_eq!(problem.strata.len(), 2);
        assert_eq!(problem.strata[0].len(), 2);
        assert_eq!(problem.strata[1][0].as_raw(), 0);
    }

    #[test]
    fn negative_cycle_is_rejected() {
        let description = task(
            r#"[
                {"parameters": ["?x"], "head": {"predicate": "p", "args": ["?x"]},
                 "body": [{"predicate": "q", "args": ["?x"], "negated": true}]},
                {"parameters": ["?x"], "head": {"predicate": "q", "args": ["?x"]},
                 "body": [{"predicate": "p", "args": ["?x"], "negated": true}]}
            ]"#,
        );
        let err = ProblemBuilder::new().build(&description).unwrap_err();
        assert!(matches!(err, Error::NotStratifiable(_)));
    }

    #[test]
    fn positive_recursion_is_one_stratum() {
        let description = task(
            r#"[
                {"parameters": ["?x"], "head": {"predicate": "p", "args": ["?x"]},
                 "body": [{"predicate": "q", "args": ["?x"]}]},
                {"parameters": ["?x"], "head": {"predicate": "q", "args": ["?x"]},
                 "body": [{"predicate": "p", "args": ["?x"]}]}
            ]"#,
        );
        let (problem, _) = ProblemBuilder::new().build(&description).unwrap();
        assert_eq!(problem.strata.len(), 1);
    }
}
