//! k-partite k-clique enumeration over a consistency graph.
//!
//! Vertices are (parameter, object) pairs; one partition per parameter.
//! Two vertices of different partitions are joined when every positive
//! literal mentioning both parameters admits the pair. A k-clique picks one
//! object per parameter such that every pair is admitted, which is exactly
//! arc consistency on binary projections. Literals over three or more
//! parameters can still fail, so each clique is verified before it is
//! returned.

use super::assignment::AssignmentSet;
use super::pattern::LiteralPattern;
use super::satisfier::ConditionSatisfier;
use super::view::AtomView;
use crate::data::{Bitset, Category, Idx, ObjectId};
use std::borrow::Cow;

/// The part of the graph fixed by static atoms, built once per condition.
#[derive(Clone, Debug)]
pub struct StaticConsistencyGraph {
    vertices: Vec<(usize, ObjectId)>,
    partitions: Vec<Vec<usize>>,
    adjacency: Vec<Bitset>,
}

impl StaticConsistencyGraph {
    pub fn new(
        literals: &[LiteralPattern],
        domains: &[Vec<ObjectId>],
        static_assignments: &AssignmentSet,
    ) -> Self {
        let mut vertices = Vec::new();
        let mut partitions = Vec::with_capacity(domains.len());
        for (parameter, domain) in domains.iter().enumerate() {
            let start = vertices.len();
            vertices.extend(domain.iter().map(|&object| (parameter, object)));
            partitions.push((start..vertices.len()).collect());
        }

        let pair_literals: Vec<&LiteralPattern> = literals
            .iter()
            .filter(|pattern| pattern.category == Category::Static && pattern.parameters.len() >= 2)
            .collect();
        let mut adjacency = vec![Bitset::with_capacity(vertices.len()); vertices.len()];
        for u in 0..vertices.len() {
            let (pu, ou) = vertices[u];
            for v in (u + 1)..vertices.len() {
                let (pv, ov) = vertices[v];
                if pu == pv {
                    continue;
                }
                let consistent = pair_literals.iter().all(|pattern| {
                    !(pattern.mentions(pu) && pattern.mentions(pv))
                        || static_assignments.admits_binary(pattern, pu, ou, pv, ov)
                });
                if consistent {
                    adjacency[u].insert(v);
                    adjacency[v].insert(u);
                }
            }
        }

        Self {
            vertices,
            partitions,
            adjacency,
        }
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn num_edges(&self) -> usize {
        self.adjacency.iter().map(Bitset::len).sum::<usize>() / 2
    }
}

struct Frame {
    partition: usize,
    vertices: Vec<usize>,
    next: usize,
    /// Remaining candidates per partition; `None` once the partition is bound.
    candidates: Vec<Option<Bitset>>,
}

pub(super) struct CliqueSearch<'a> {
    satisfier: &'a ConditionSatisfier,
    graph: &'a StaticConsistencyGraph,
    view: AtomView<'a>,
    adjacency: Cow<'a, [Bitset]>,
    stack: Vec<Frame>,
    binding: Vec<ObjectId>,
}

impl<'a> CliqueSearch<'a> {
    pub(super) fn new(
        satisfier: &'a ConditionSatisfier,
        graph: &'a StaticConsistencyGraph,
        view: AtomView<'a>,
        domains: &[Vec<ObjectId>],
    ) -> Self {
        let allowed: Vec<Bitset> = domains
            .iter()
            .map(|domain| domain.iter().map(|object| object.index()).collect())
            .collect();
        let candidates: Vec<Option<Bitset>> = graph
            .partitions
            .iter()
            .map(|partition| {
                Some(
                    partition
                        .iter()
                        .copied()
                        .filter(|&vertex| {
                            let (parameter, object) = graph.vertices[vertex];
                            allowed[parameter].contains(object.index())
                        })
                        .collect::<Bitset>(),
                )
            })
            .collect();

        let adjacency = Self::state_adjacency(satisfier, graph, &view, &candidates);
        let mut search = Self {
            satisfier,
            graph,
            view,
            adjacency,
            stack: Vec::new(),
            binding: vec![ObjectId::from_raw(0); satisfier.arity],
        };
        if candidates.iter().flatten().all(|set| !set.is_empty()) {
            search.push_frame(candidates);
        }
        search
    }

    /// Drops static edges that the fluent and derived pair literals reject in
    /// this state. Borrows the static adjacency when there are none.
    fn state_adjacency(
        satisfier: &ConditionSatisfier,
        graph: &'a StaticConsistencyGraph,
        view: &AtomView<'_>,
        candidates: &[Option<Bitset>],
    ) -> Cow<'a, [Bitset]> {
        let dynamic: Vec<&LiteralPattern> = satisfier
            .literals
            .iter()
            .filter(|pattern| pattern.category != Category::Static && pattern.parameters.len() >= 2)
            .collect();
        if dynamic.is_empty() {
            return Cow::Borrowed(&graph.adjacency);
        }

        let mut active = Bitset::new();
        for set in candidates.iter().flatten() {
            active.union_with(set);
        }
        let mut adjacency = graph.adjacency.clone();
        for u in active.iter() {
            let (pu, ou) = graph.vertices[u];
            let neighbours: Vec<usize> = graph.adjacency[u].iter().filter(|&v| v > u).collect();
            for v in neighbours {
                if !active.contains(v) {
                    continue;
                }
                let (pv, ov) = graph.vertices[v];
                let consistent = dynamic.iter().all(|pattern| {
                    !(pattern.mentions(pu) && pattern.mentions(pv))
                        || view
                            .assignments(pattern.category)
                            .admits_binary(pattern, pu, ou, pv, ov)
                });
                if !consistent {
                    adjacency[u].remove(v);
                    adjacency[v].remove(u);
                }
            }
        }
        Cow::Owned(adjacency)
    }

    /// Branch on the open partition with the fewest candidates.
    fn push_frame(&mut self, candidates: Vec<Option<Bitset>>) {
        let partition = candidates
            .iter()
            .enumerate()
            .filter_map(|(index, set)| set.as_ref().map(|set| (set.len(), index)))
            .min()
            .map(|(_, index)| index);
        if let Some(partition) = partition {
            let vertices = candidates[partition]
                .as_ref()
                .map(|set| set.iter().collect())
                .unwrap_or_default();
            self.stack.push(Frame {
                partition,
                vertices,
                next: 0,
                candidates,
            });
        }
    }

    fn verify(&self) -> bool {
        self.satisfier
            .literals
            .iter()
            .filter(|pattern| pattern.parameters.len() >= 2)
            .all(|pattern| pattern.holds(self.view.repository, &self.view.valuation, &self.binding))
    }
}

impl Iterator for CliqueSearch<'_> {
    type Item = Vec<ObjectId>;

    fn next(&mut self) -> Option<Vec<ObjectId>> {
        loop {
            let frame = self.stack.last_mut()?;
            if frame.next >= frame.vertices.len() {
                self.stack.pop();
                continue;
            }
            let vertex = frame.vertices[frame.next];
            frame.next += 1;

            let (parameter, object) = self.graph.vertices[vertex];
            self.binding[parameter] = object;

            let mut candidates = frame.candidates.clone();
            candidates[frame.partition] = None;
            let mut pruned = false;
            for set in candidates.iter_mut().flatten() {
                set.intersect_with(&self.adjacency[vertex]);
                if set.is_empty() {
                    pruned = true;
                    break;
                }
            }
            if pruned {
                continue;
            }

            if candidates.iter().all(Option::is_none) {
                self.satisfier.record(|s| s.cliques_explored += 1);
                if self.verify() {
                    self.satisfier.record(|s| s.bindings_accepted += 1);
                    return Some(self.binding.clone());
                }
                continue;
            }
            self.push_frame(candidates);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::StaticConsistencyGraph;
    use crate::data::{Category, ObjectId, PredicateId};
    use crate::grounding::assignment::AssignmentSet;
    use crate::grounding::pattern::{Arg, LiteralPattern};

    #[test]
    fn static_graph_connects_admitted_pairs_only() {
        let edge = PredicateId::from_raw(0);
        let o = ObjectId::from_raw;
        let mut statics = AssignmentSet::new();
        statics.insert(edge, &[o(0), o(1)]);
        statics.insert(edge, &[o(1), o(2)]);
        let literal = LiteralPattern::new(
            edge,
            Category::Static,
            true,
            vec![Arg::Parameter(0), Arg::Parameter(1)],
        );
        let domains = vec![vec![o(0), o(1)], vec![o(1), o(2)]];
        let graph = StaticConsistencyGraph::new(&[literal], &domains, &statics);
        assert_eq!(graph.num_vertices(), 4);
        assert_eq!(graph.num_edges(), 2);
    }
}
