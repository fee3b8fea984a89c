//! Stratified evaluation of derived atoms.
//!
//! Strata are processed lowest first. Within a stratum every axiom is fired
//! repeatedly until a pass derives nothing new. Negative derived literals
//! only refer to lower strata, which are complete by then.

use super::assignment::AssignmentSet;
use super::ground::{ground_atom, ground_axiom};
use super::satisfier::ConditionSatisfier;
use super::view::StateAssignments;
use crate::config::Statistics;
use crate::data::{
    AxiomId, Bitset, Category, GroundAxiom, GroundAxiomId, Idx, ObjectId, Problem, Repository,
};
use tracing::trace;

enum Strata {
    Lifted(Vec<Vec<(AxiomId, ConditionSatisfier)>>),
    Grounded(Vec<Vec<GroundAxiom>>),
}

pub struct AxiomEvaluator {
    strata: Strata,
    evaluations: u64,
    passes: u64,
}

impl AxiomEvaluator {
    pub fn lifted(
        problem: &Problem,
        repository: &Repository,
        static_assignments: &AssignmentSet,
    ) -> Self {
        let strata = problem
            .strata
            .iter()
            .map(|stratum| {
                stratum
                    .iter()
                    .map(|&id| {
                        let satisfier = ConditionSatisfier::new(
                            &problem.axiom(id).body,
                            repository,
                            &problem.static_atoms,
                            static_assignments,
                        );
                        (id, satisfier)
                    })
                    .collect()
            })
            .collect();
        Self::new(Strata::Lifted(strata))
    }

    /// Uses the given relaxed-reachable axiom instances only.
    pub fn grounded(
        problem: &Problem,
        repository: &mut Repository,
        reachable: &[(AxiomId, Vec<ObjectId>)],
    ) -> Self {
        let mut stratum_of = vec![0; problem.axioms.len()];
        for (index, stratum) in problem.strata.iter().enumerate() {
            for id in stratum {
                stratum_of[id.index()] = index;
            }
        }
        let mut strata: Vec<Vec<GroundAxiom>> = vec![Vec::new(); problem.strata.len()];
        for (index, (axiom, binding)) in reachable.iter().enumerate() {
            let ground = ground_axiom(
                problem,
                repository,
                *axiom,
                binding.clone(),
                GroundAxiomId::from_usize(index),
            );
            strata[stratum_of[axiom.index()]].push(ground);
        }
        Self::new(Strata::Grounded(strata))
    }

    fn new(strata: Strata) -> Self {
        Self {
            strata,
            evaluations: 0,
            passes: 0,
        }
    }

    /// Derived atoms implied by `fluent` and the numeric `values`, computed
    /// from scratch.
    pub fn evaluate(
        &mut self,
        problem: &Problem,
        repository: &mut Repository,
        static_assignments: &AssignmentSet,
        fluent: &Bitset,
        values: &[f64],
    ) -> Bitset {
        self.evaluations += 1;
        let mut derived = Bitset::new();
        match &self.strata {
            Strata::Lifted(strata) => {
                for stratum in strata {
                    loop {
                        self.passes += 1;
                        let heads: Vec<(AxiomId, Vec<ObjectId>)> = {
                            let valuation = problem.valuation(fluent, &derived, values);
                            let dynamic = StateAssignments::new(repository, &valuation);
                            let view = dynamic.view(repository, valuation, static_assignments);
                            stratum
                                .iter()
                                .flat_map(|(id, satisfier)| {
                                    satisfier.bindings(view, None).map(move |b| (*id, b))
                                })
                                .collect()
                        };
                        let mut added = false;
                        for (id, binding) in heads {
                            let head = ground_atom(
                                repository,
                                repository.atom(problem.axiom(id).head),
                                &binding,
                            );
                            let index = repository.intern_ground_atom(Category::Derived, head);
                            added |= derived.insert(index.index());
                        }
                        if !added {
                            break;
                        }
                    }
                }
            }
            Strata::Grounded(strata) => {
                for stratum in strata {
                    loop {
                        self.passes += 1;
                        let mut added = false;
                        for axiom in stratum {
                            if derived.contains(axiom.head.index()) {
                                continue;
                            }
                            let valuation = problem.valuation(fluent, &derived, values);
                            if axiom.body.is_satisfied(&valuation) {
                                derived.insert(axiom.head.index());
                                added = true;
                            }
                        }
                        if !added {
                            break;
                        }
                    }
                }
            }
        }
        trace!(derived = derived.len(), "axioms evaluated");
        derived
    }

    pub fn statistics(&self, statistics: &mut Statistics) {
        statistics.set("axioms.evaluations", self.evaluations);
        statistics.set("axioms.passes", self.passes);
    }
}
