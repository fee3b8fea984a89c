//! Conjunctive condition satisfier.
//!
//! Given a lifted condition and a state, enumerate every binding of the
//! condition's parameters to objects under which all literals and numeric
//! constraints hold. The enumeration strategy is fixed when the satisfier is
//! built:
//!
//! * conditions whose literals are all positive and that have no numeric
//!   constraints are solved as a k-partite k-clique search over a
//!   consistency graph ([`clique`](super::clique));
//! * everything else uses backtracking over per-parameter domains
//!   ([`general`](super::general)).
//!
//! Both strategies start from the same per-state domains and return the
//! same set of bindings.

use super::assignment::AssignmentSet;
use super::clique::{CliqueSearch, StaticConsistencyGraph};
use super::general::GeneralSearch;
use super::pattern::{ConstraintPattern, LiteralPattern};
use super::view::AtomView;
use crate::data::{Bitset, Category, ConjunctiveCondition, Idx, ObjectId, Repository};
use std::cell::Cell;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SatisfierStatistics {
    pub invocations: u64,
    pub general_nodes: u64,
    pub cliques_explored: u64,
    pub bindings_accepted: u64,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Strategy {
    General,
    Clique,
}

pub struct ConditionSatisfier {
    pub(super) arity: usize,
    pub(super) literals: Vec<LiteralPattern>,
    pub(super) constraints: Vec<ConstraintPattern>,
    static_consistent: bool,
    static_domains: Vec<Vec<ObjectId>>,
    graph: Option<StaticConsistencyGraph>,
    statistics: Cell<SatisfierStatistics>,
}

impl ConditionSatisfier {
    /// Compiles `condition`. Static literals are checked against
    /// `static_atoms` here, once, and never again per state.
    pub fn new(
        condition: &ConjunctiveCondition,
        repository: &Repository,
        static_atoms: &Bitset,
        static_assignments: &AssignmentSet,
    ) -> Self {
        let arity = condition.arity();
        let literals: Vec<LiteralPattern> = condition
            .all_literals()
            .map(|(_, literal)| LiteralPattern::from_literal(repository, literal))
            .collect();
        let constraints: Vec<ConstraintPattern> = condition
            .numeric_constraints
            .iter()
            .map(|constraint| ConstraintPattern::new(repository, constraint))
            .collect();

        let holds_static = |pattern: &LiteralPattern, binding: &[ObjectId]| {
            let present = repository
                .find_ground_atom(Category::Static, &pattern.ground(binding))
                .is_some_and(|index| static_atoms.contains(index.index()));
            present == pattern.polarity
        };

        let static_literals: Vec<&LiteralPattern> = literals
            .iter()
            .filter(|pattern| pattern.category == Category::Static)
            .collect();
        let static_consistent = static_literals
            .iter()
            .filter(|pattern| pattern.is_ground())
            .all(|pattern| holds_static(pattern, &[]));

        let mut binding = Vec::with_capacity(arity);
        let static_domains = (0..arity)
            .map(|parameter| {
                repository
                    .object_ids()
                    .filter(|&object| {
                        binding.clear();
                        binding.resize(arity, object);
                        static_literals.iter().all(|pattern| {
                            if !pattern.mentions(parameter) {
                                true
                            } else if pattern.parameters.len() == 1 {
                                holds_static(pattern, &binding)
                            } else {
                                !pattern.polarity
                                    || static_assignments.admits_unary(pattern, parameter, object)
                            }
                        })
                    })
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();

        let clique_shaped = arity > 0
            && constraints.is_empty()
            && literals.iter().all(|pattern| pattern.polarity);
        let graph = (clique_shaped && static_consistent).then(|| {
            StaticConsistencyGraph::new(&literals, &static_domains, static_assignments)
        });

        Self {
            arity,
            literals,
            constraints,
            static_consistent,
            static_domains,
            graph,
            statistics: Cell::new(SatisfierStatistics::default()),
        }
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn strategy(&self) -> Strategy {
        if self.graph.is_some() {
            Strategy::Clique
        } else {
            Strategy::General
        }
    }

    pub fn statistics(&self) -> SatisfierStatistics {
        self.statistics.get()
    }

    pub(super) fn record(&self, update: impl FnOnce(&mut SatisfierStatistics)) {
        let mut statistics = self.statistics.get();
        update(&mut statistics);
        self.statistics.set(statistics);
    }

    /// Lazily enumerates the bindings that satisfy the condition in `view`,
    /// at most `limit` of them.
    pub fn bindings<'a>(&'a self, view: AtomView<'a>, limit: Option<usize>) -> Bindings<'a> {
        self.record(|s| s.invocations += 1);
        let inner = self.start(view);
        Bindings {
            inner,
            remaining: limit,
        }
    }

    /// Convenience for tests and callers that want every binding at once.
    pub fn all_bindings(&self, view: AtomView<'_>) -> Vec<Vec<ObjectId>> {
        self.bindings(view, None).collect()
    }

    fn start<'a>(&'a self, view: AtomView<'a>) -> BindingsInner<'a> {
        if !self.static_consistent {
            return BindingsInner::Empty;
        }
        let ground_literals_hold = self
            .literals
            .iter()
            .filter(|pattern| pattern.is_ground() && pattern.category != Category::Static)
            .all(|pattern| pattern.holds(view.repository, &view.valuation, &[]));
        let ground_constraints_hold = self
            .constraints
            .iter()
            .filter(|constraint| constraint.parameters.is_empty())
            .all(|constraint| constraint.holds(&view, &[]));
        if !ground_literals_hold || !ground_constraints_hold {
            return BindingsInner::Empty;
        }
        if self.arity == 0 {
            self.record(|s| s.bindings_accepted += 1);
            return BindingsInner::Single(Some(Vec::new()));
        }

        let domains = match self.state_domains(&view) {
            Some(domains) => domains,
            None => return BindingsInner::Empty,
        };
        match &self.graph {
            Some(graph) => BindingsInner::Clique(CliqueSearch::new(self, graph, view, &domains)),
            None => BindingsInner::General(GeneralSearch::new(self, view, domains)),
        }
    }

    /// Static domains narrowed by the fluent and derived atoms of the state.
    /// Single-parameter literals are checked exactly here. `None` if some
    /// domain is empty.
    fn state_domains(&self, view: &AtomView<'_>) -> Option<Vec<Vec<ObjectId>>> {
        let mut binding = vec![ObjectId::from_raw(0); self.arity];
        let mut domains = Vec::with_capacity(self.arity);
        for (parameter, candidates) in self.static_domains.iter().enumerate() {
            let relevant: Vec<&LiteralPattern> = self
                .literals
                .iter()
                .filter(|pattern| pattern.category != Category::Static && pattern.mentions(parameter))
                .collect();
            let domain: Vec<ObjectId> = candidates
                .iter()
                .copied()
                .filter(|&object| {
                    binding[parameter] = object;
                    relevant.iter().all(|pattern| {
                        if pattern.parameters.len() == 1 {
                            pattern.holds(view.repository, &view.valuation, &binding)
                        } else {
                            !pattern.polarity
                                || view
                                    .assignments(pattern.category)
                                    .admits_unary(pattern, parameter, object)
                        }
                    })
                })
                .collect();
            if domain.is_empty() {
                return None;
            }
            domains.push(domain);
        }
        Some(domains)
    }
}

enum BindingsInner<'a> {
    Empty,
    Single(Option<Vec<ObjectId>>),
    General(GeneralSearch<'a>),
    Clique(CliqueSearch<'a>),
}

/// Iterator over satisfying bindings. Each binding lists one object per
/// condition parameter, in parameter order.
pub struct Bindings<'a> {
    inner: BindingsInner<'a>,
    remaining: Option<usize>,
}

impl Iterator for Bindings<'_> {
    type Item = Vec<ObjectId>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == Some(0) {
            return None;
        }
        let binding = match &mut self.inner {
            BindingsInner::Empty => None,
            BindingsInner::Single(binding) => binding.take(),
            BindingsInner::General(search) => search.next(),
            BindingsInner::Clique(search) => search.next(),
        }?;
        if let Some(remaining) = &mut self.remaining {
            *remaining -= 1;
        }
        Some(binding)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConditionSatisfier, Strategy};
    use crate::data::{Bitset, Category, Idx, ObjectId, Problem, Repository};
    use crate::grounding::assignment::AssignmentSet;
    use crate::grounding::view::StateAssignments;
    use crate::loader::{ProblemBuilder, TaskDescription};
    use std::collections::BTreeSet;

    fn load(json: &str) -> (Problem, Repository) {
        ProblemBuilder::new()
            .build(&TaskDescription::from_json_str(json).unwrap())
            .unwrap()
    }

    fn names(repo: &Repository, bindings: Vec<Vec<ObjectId>>) -> BTreeSet<Vec<String>> {
        bindings
            .into_iter()
            .map(|binding| binding.iter().map(|o| repo.object(*o).name.clone()).collect())
            .collect()
    }

    fn run(problem: &Problem, repo: &Repository, schema: usize) -> (Strategy, BTreeSet<Vec<String>>) {
        let statics = AssignmentSet::from_atoms(repo, Category::Static, &problem.static_atoms);
        let condition = &problem.action_schemas[schema].precondition;
        let satisfier = ConditionSatisfier::new(condition, repo, &problem.static_atoms, &statics);
        let derived = Bitset::new();
        let valuation = problem.valuation(
            &problem.initial_fluent_atoms,
            &derived,
            &problem.initial_numeric_values,
        );
        let dynamic = StateAssignments::new(repo, &valuation);
        let view = dynamic.view(repo, valuation, &statics);
        (satisfier.strategy(), names(repo, satisfier.all_bindings(view)))
    }

    const GRAPH: &str = r#"{
        "objects": ["a", "b", "c"],
        "predicates": [
            {"name": "edge", "arity": 2},
            {"name": "at", "arity": 1},
            {"name": "blocked", "arity": 1},
            {"name": "ready", "arity": 0}
        ],
        "actions": [
            {"name": "go", "parameters": ["?x", "?y"],
             "precondition": [
                {"predicate": "at", "args": ["?x"]},
                {"predicate": "edge", "args": ["?x", "?y"]}
             ],
             "effect": [{"predicate": "at", "args": ["?y"]}, {"predicate": "blocked", "args": ["?y"]}]},
            {"name": "safe-go", "parameters": ["?x", "?y"],
             "precondition": [
                {"predicate": "at", "args": ["?x"]},
                {"predicate": "edge", "args": ["?x", "?y"]},
                {"predicate": "blocked", "args": ["?y"], "negated": true}
             ],
             "effect": [{"predicate": "at", "args": ["?y"]}]},
            {"name": "start", "parameters": [],
             "precondition": [{"predicate": "ready"}],
             "effect": [{"predicate": "ready", "negated": true}]}
        ],
        "init": [
            {"predicate": "edge", "args": ["a", "b"]},
            {"predicate": "edge", "args": ["a", "c"]},
            {"predicate": "edge", "args": ["b", "c"]},
            {"predicate": "at", "args": ["a"]},
            {"predicate": "blocked", "args": ["c"]},
            {"predicate": "ready"}
        ]
    }"#;

    #[test]
    fn positive_condition_uses_clique_strategy() {
        let (problem, repo) = load(GRAPH);
        let (strategy, bindings) = run(&problem, &repo, 0);
        assert_eq!(strategy, Strategy::Clique);
        let expected: BTreeSet<Vec<String>> = [vec!["a", "b"], vec!["a", "c"]]
            .iter()
            .map(|b| b.iter().map(|s| s.to_string()).collect())
            .collect();
        assert_eq!(bindings, expected);
    }

    #[test]
    fn negative_literal_uses_general_strategy() {
        let (problem, repo) = load(GRAPH);
        let (strategy, bindings) = run(&problem, &repo, 1);
        assert_eq!(strategy, Strategy::General);
        assert_eq!(bindings.len(), 1);
        assert!(bindings.contains(&vec!["a".to_string(), "b".to_string()]));
    }

    #[test]
    fn zero_arity_yields_single_empty_binding() {
        let (problem, repo) = load(GRAPH);
        let (_, bindings) = run(&problem, &repo, 2);
        assert_eq!(bindings.len(), 1);
        assert!(bindings.contains(&Vec::<String>::new()));
    }

    #[test]
    fn limit_caps_enumeration() {
        let (problem, repo) = load(GRAPH);
        let statics = AssignmentSet::from_atoms(&repo, Category::Static, &problem.static_atoms);
        let satisfier = ConditionSatisfier::new(
            &problem.action_schemas[0].precondition,
            &repo,
            &problem.static_atoms,
            &statics,
        );
        let derived = Bitset::new();
        let valuation = problem.valuation(&problem.initial_fluent_atoms, &derived, &[]);
        let dynamic = StateAssignments::new(&repo, &valuation);
        let view = dynamic.view(&repo, valuation, &statics);
        assert_eq!(satisfier.bindings(view, Some(1)).count(), 1);
        assert_eq!(satisfier.bindings(view, Some(0)).count(), 0);
        let stats = satisfier.statistics();
        assert_eq!(stats.invocations, 2);
        assert!(stats.cliques_explored >= stats.bindings_accepted);
        assert_eq!(ObjectId::from_usize(0), repo.find_object("a").unwrap());
    }
}
