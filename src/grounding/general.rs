//! Backtracking enumeration for arbitrary conditions.
//!
//! Parameters are bound in order of increasing domain size. A literal is
//! checked exactly at the depth where its last parameter is bound; before
//! that, positive literals only have to admit each pair of bound parameters
//! according to the assignment sets.

use super::satisfier::ConditionSatisfier;
use super::view::AtomView;
use crate::data::ObjectId;

pub(super) struct GeneralSearch<'a> {
    satisfier: &'a ConditionSatisfier,
    view: AtomView<'a>,
    /// Parameter bound at each depth.
    order: Vec<usize>,
    domains: Vec<Vec<ObjectId>>,
    cursors: Vec<usize>,
    binding: Vec<ObjectId>,
    depth: usize,
    /// (literal, parameter at this depth, earlier parameter) pairs to test.
    pair_checks: Vec<Vec<(usize, usize, usize)>>,
    literal_checks: Vec<Vec<usize>>,
    constraint_checks: Vec<Vec<usize>>,
    exhausted: bool,
}

impl<'a> GeneralSearch<'a> {
    pub(super) fn new(
        satisfier: &'a ConditionSatisfier,
        view: AtomView<'a>,
        domains: Vec<Vec<ObjectId>>,
    ) -> Self {
        let arity = satisfier.arity;
        let mut order: Vec<usize> = (0..arity).collect();
        order.sort_by_key(|&parameter| domains[parameter].len());
        let mut depth_of = vec![0; arity];
        for (depth, &parameter) in order.iter().enumerate() {
            depth_of[parameter] = depth;
        }

        let mut pair_checks = vec![Vec::new(); arity];
        let mut literal_checks = vec![Vec::new(); arity];
        for (index, pattern) in satisfier.literals.iter().enumerate() {
            // Ground and single-parameter literals were settled with the domains.
            if pattern.parameters.len() < 2 {
                continue;
            }
            let last = pattern
                .parameters
                .iter()
                .map(|&p| depth_of[p])
                .max()
                .unwrap_or(0);
            literal_checks[last].push(index);
            if !pattern.polarity {
                continue;
            }
            for &p in &pattern.parameters {
                let d = depth_of[p];
                if d == last {
                    continue;
                }
                for &q in &pattern.parameters {
                    if depth_of[q] < d {
                        pair_checks[d].push((index, p, q));
                    }
                }
            }
        }

        let mut constraint_checks = vec![Vec::new(); arity];
        for (index, constraint) in satisfier.constraints.iter().enumerate() {
            if let Some(last) = constraint.parameters.iter().map(|&p| depth_of[p]).max() {
                constraint_checks[last].push(index);
            }
        }

        let ordered_domains = order.iter().map(|&p| domains[p].clone()).collect();
        Self {
            satisfier,
            view,
            order,
            domains: ordered_domains,
            cursors: vec![0; arity],
            // Only entries of bound parameters are ever read.
            binding: vec![ObjectId::from_raw(0); arity],
            depth: 0,
            pair_checks,
            literal_checks,
            constraint_checks,
            exhausted: arity == 0,
        }
    }

    fn consistent(&self, depth: usize) -> bool {
        let parameter = self.order[depth];
        let object = self.binding[parameter];
        let literals = &self.satisfier.literals;
        let pairs_admitted = self.pair_checks[depth].iter().all(|&(index, p, q)| {
            debug_assert_eq!(p, parameter);
            let pattern = &literals[index];
            self.view
                .assignments(pattern.category)
                .admits_binary(pattern, p, object, q, self.binding[q])
        });
        pairs_admitted
            && self.literal_checks[depth].iter().all(|&index| {
                literals[index].holds(self.view.repository, &self.view.valuation, &self.binding)
            })
            && self.constraint_checks[depth]
                .iter()
                .all(|&index| self.satisfier.constraints[index].holds(&self.view, &self.binding))
    }
}

impl Iterator for GeneralSearch<'_> {
    type Item = Vec<ObjectId>;

    fn next(&mut self) -> Option<Vec<ObjectId>> {
        if self.exhausted {
            return None;
        }
        let last = self.order.len() - 1;
        loop {
            let depth = self.depth;
            let cursor = self.cursors[depth];
            if cursor >= self.domains[depth].len() {
                if depth == 0 {
                    self.exhausted = true;
                    return None;
                }
                self.cursors[depth] = 0;
                self.depth -= 1;
                continue;
            }
            self.cursors[depth] += 1;
            self.binding[self.order[depth]] = self.domains[depth][cursor];
            self.satisfier.record(|s| s.general_nodes += 1);
            if !self.consistent(depth) {
                continue;
            }
            if depth == last {
                self.satisfier.record(|s| s.bindings_accepted += 1);
                return Some(self.binding.clone());
            }
            self.depth += 1;
        }
    }
}
