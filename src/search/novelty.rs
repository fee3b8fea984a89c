//! Novelty tables for width-based search.
//!
//! A state has novelty `k` when the smallest tuple of its atoms that no
//! earlier state contained has size `k`. Tuples of up to `arity` atoms are
//! ranked into one flat bit table with the combinatorial number system.

use crate::data::Bitset;
use crate::error::{Error, Result};
use crate::grounding::Reachability;
use crate::state::State;
use rustc_hash::FxHashMap;

/// Largest number of tuples a table may track.
pub const MAX_TUPLES: u64 = 1 << 32;

fn binomial(n: u64, k: u64) -> Option<u64> {
    if k > n {
        return Some(0);
    }
    let k = k.min(n - k);
    let mut result: u64 = 1;
    for i in 0..k {
        result = result.checked_mul(n - i)? / (i + 1);
    }
    Some(result)
}

/// Bijection between sorted atom tuples of size `1..=arity` and
/// `0..num_tuples()`.
#[derive(Clone, Debug)]
pub struct TupleIndexMapper {
    num_atoms: usize,
    arity: usize,
    /// `offsets[m - 1]` is the rank of the first tuple of size `m`; the last
    /// entry is the total.
    offsets: Vec<u64>,
}

impl TupleIndexMapper {
    pub fn new(num_atoms: usize, arity: usize) -> Result<Self> {
        let too_large = || Error::NoveltyTableTooLarge {
            atoms: num_atoms,
            arity,
            limit: MAX_TUPLES,
        };
        let mut offsets = vec![0];
        let mut total: u64 = 0;
        for size in 1..=arity {
            let count = binomial(num_atoms as u64, size as u64).ok_or_else(too_large)?;
            total = total.checked_add(count).ok_or_else(too_large)?;
            if total > MAX_TUPLES {
                return Err(too_large());
            }
            offsets.push(total);
        }
        Ok(Self {
            num_atoms,
            arity,
            offsets,
        })
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn num_atoms(&self) -> usize {
        self.num_atoms
    }

    pub fn num_tuples(&self) -> u64 {
        self.offsets.last().copied().unwrap_or(0)
    }

    /// Rank of a strictly increasing tuple of atom positions.
    pub fn rank(&self, tuple: &[usize]) -> u64 {
        debug_assert!(!tuple.is_empty() && tuple.len() <= self.arity);
        debug_assert!(tuple.windows(2).all(|pair| pair[0] < pair[1]));
        let within: u64 = tuple
            .iter()
            .enumerate()
            .map(|(i, &atom)| binomial(atom as u64, i as u64 + 1).unwrap_or(0))
            .sum();
        self.offsets[tuple.len() - 1] + within
    }

    pub fn unrank(&self, rank: u64) -> Vec<usize> {
        let size = self.offsets.partition_point(|&offset| offset <= rank);
        let mut rest = rank - self.offsets[size - 1];
        let mut tuple = vec![0; size];
        let mut bound = self.num_atoms as u64;
        for position in (1..=size).rev() {
            let mut atom = bound;
            while atom > 0 {
                atom -= 1;
                let count = binomial(atom, position as u64).unwrap_or(u64::MAX);
                if count <= rest {
                    rest -= count;
                    break;
                }
            }
            tuple[position - 1] = atom as usize;
            bound = atom;
        }
        tuple
    }
}

/// Dense positions for the fluent and derived atoms a width search can
/// encounter.
#[derive(Clone, Debug, Default)]
pub struct AtomUniverse {
    fluent: FxHashMap<usize, usize>,
    derived: FxHashMap<usize, usize>,
}

impl AtomUniverse {
    pub fn from_reachability(reachability: &Reachability) -> Self {
        let fluent: FxHashMap<usize, usize> = reachability
            .fluent_atoms
            .iter()
            .enumerate()
            .map(|(position, atom)| (atom, position))
            .collect();
        let offset = fluent.len();
        let derived = reachability
            .derived_atoms
            .iter()
            .enumerate()
            .map(|(position, atom)| (atom, offset + position))
            .collect();
        Self { fluent, derived }
    }

    pub fn len(&self) -> usize {
        self.fluent.len() + self.derived.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sorted positions of the atoms true in `state`.
    pub fn positions(&self, state: &State) -> Vec<usize> {
        let mut positions: Vec<usize> = state
            .fluent
            .iter()
            .filter_map(|atom| self.fluent.get(&atom).copied())
            .chain(
                state
                    .derived
                    .iter()
                    .filter_map(|atom| self.derived.get(&atom).copied()),
            )
            .collect();
        positions.sort_unstable();
        positions
    }
}

/// Tuples seen so far.
#[derive(Clone, Debug)]
pub struct NoveltyTable {
    mapper: TupleIndexMapper,
    seen: Bitset,
}

impl NoveltyTable {
    pub fn new(num_atoms: usize, arity: usize) -> Result<Self> {
        let mapper = TupleIndexMapper::new(num_atoms, arity)?;
        Ok(Self {
            mapper,
            seen: Bitset::new(),
        })
    }

    pub fn mapper(&self) -> &TupleIndexMapper {
        &self.mapper
    }

    /// Records every tuple of `positions` and returns whether any of them
    /// was new, i.e. whether the state has novelty at most the table arity.
    pub fn insert(&mut self, positions: &[usize]) -> bool {
        let mut novel = false;
        let mut tuple = Vec::with_capacity(self.mapper.arity);
        self.visit(positions, 0, &mut tuple, &mut novel);
        novel
    }

    fn visit(&mut self, positions: &[usize], start: usize, tuple: &mut Vec<usize>, novel: &mut bool) {
        for index in start..positions.len() {
            tuple.push(positions[index]);
            let rank = self.mapper.rank(tuple);
            if self.seen.insert(rank as usize) {
                *novel = true;
            }
            if tuple.len() < self.mapper.arity {
                self.visit(positions, index + 1, tuple, novel);
            }
            tuple.pop();
        }
    }

    /// Smallest size of an unseen tuple, without recording anything.
    pub fn novelty(&self, positions: &[usize]) -> Option<usize> {
        let mut tuple = Vec::with_capacity(self.mapper.arity);
        (1..=self.mapper.arity).find(|&size| self.has_unseen(positions, 0, size, &mut tuple))
    }

    fn has_unseen(&self, positions: &[usize], start: usize, size: usize, tuple: &mut Vec<usize>) -> bool {
        if tuple.len() == size {
            return !self.seen.contains(self.mapper.rank(tuple) as usize);
        }
        for index in start..positions.len() {
            tuple.push(positions[index]);
            let unseen = self.has_unseen(positions, index + 1, size, tuple);
            tuple.pop();
            if unseen {
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::{binomial, NoveltyTable, TupleIndexMapper, MAX_TUPLES};
    use crate::error::Error;

    #[test]
    fn binomials() {
        assert_eq!(binomial(5, 2), Some(10));
        assert_eq!(binomial(5, 0), Some(1));
        assert_eq!(binomial(2, 3), Some(0));
    }

    #[test]
    fn ranks_are_a_bijection() {
        let mapper = TupleIndexMapper::new(6, 3).unwrap();
        assert_eq!(mapper.num_tuples(), 6 + 15 + 20);
        for rank in 0..mapper.num_tuples() {
            let tuple = mapper.unrank(rank);
            assert!(tuple.windows(2).all(|pair| pair[0] < pair[1]));
            assert!(tuple.iter().all(|&atom| atom < 6));
            assert_eq!(mapper.rank(&tuple), rank);
        }
    }

    #[test]
    fn oversized_tables_are_rejected() {
        assert!(TupleIndexMapper::new(50_000, 2).is_ok());
        assert!(matches!(
            TupleIndexMapper::new(50_000, 3),
            Err(Error::NoveltyTableTooLarge { atoms: 50_000, arity: 3, limit }) if limit == MAX_TUPLES
        ));
    }

    #[test]
    fn arity_one_prunes_states_without_new_atoms() {
        let mut table = NoveltyTable::new(4, 1).unwrap();
        assert!(table.insert(&[0, 1]));
        assert_eq!(table.novelty(&[0, 1]), None);
        assert!(!table.insert(&[0, 1]));
        assert!(!table.insert(&[1]));
        assert_eq!(table.novelty(&[1, 2]), Some(1));
        assert!(table.insert(&[1, 2]));
    }

    #[test]
    fn arity_two_tracks_pairs() {
        let mut table = NoveltyTable::new(4, 2).unwrap();
        assert!(table.insert(&[0, 1]));
        assert!(table.insert(&[2]));
        // Every atom was seen, but the pair (0, 2) was not.
        assert_eq!(table.novelty(&[0, 2]), Some(2));
        assert!(table.insert(&[0, 2]));
        assert!(!table.insert(&[0, 2]));
    }
}
