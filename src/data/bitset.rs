use std::hash::{Hash, Hasher};

const WORD_BITS: usize = 64;

/// Growable set of small integers backed by 64-bit words.
///
/// Equality and hashing ignore trailing zero words, so two sets holding the
/// same members compare equal regardless of how far each has grown.
#[derive(Clone, Debug, Default)]
pub struct Bitset {
    words: Vec<u64>,
}

impl Bitset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(bits: usize) -> Self {
        Self {
            words: vec![0; bits.div_ceil(WORD_BITS)],
        }
    }

    /// Sets `bit`, returning true if it was not already present.
    pub fn insert(&mut self, bit: usize) -> bool {
        let (word, mask) = (bit / WORD_BITS, 1u64 << (bit % WORD_BITS));
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        let fresh = self.words[word] & mask == 0;
        self.words[word] |= mask;
        fresh
    }

    pub fn remove(&mut self, bit: usize) -> bool {
        let (word, mask) = (bit / WORD_BITS, 1u64 << (bit % WORD_BITS));
        match self.words.get_mut(word) {
            Some(value) if *value & mask != 0 => {
                *value &= !mask;
                true
            }
            _ => false,
        }
    }

    pub fn contains(&self, bit: usize) -> bool {
        self.words
            .get(bit / WORD_BITS)
            .is_some_and(|word| word & (1u64 << (bit % WORD_BITS)) != 0)
    }

    pub fn len(&self) -> usize {
        self.words.iter().map(|word| word.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|word| *word == 0)
    }

    pub fn clear(&mut self) {
        self.words.clear();
    }

    /// Members in increasing order.
    pub fn iter(&self) -> BitsetIter<'_> {
        BitsetIter {
            words: &self.words,
            word_index: 0,
            current: self.words.first().copied().unwrap_or(0),
        }
    }

    pub fn union_with(&mut self, other: &Bitset) {
        if other.words.len() > self.words.len() {
            self.words.resize(other.words.len(), 0);
        }
        for (word, value) in self.words.iter_mut().zip(&other.words) {
            *word |= value;
        }
    }

    pub fn difference_with(&mut self, other: &Bitset) {
        for (word, value) in self.words.iter_mut().zip(&other.words) {
            *word &= !value;
        }
    }

    pub fn intersect_with(&mut self, other: &Bitset) {
        for (index, word) in self.words.iter_mut().enumerate() {
            *word &= other.words.get(index).copied().unwrap_or(0);
        }
    }

    pub fn is_subset(&self, other: &Bitset) -> bool {
        self.words
            .iter()
            .enumerate()
            .all(|(index, word)| word & !other.words.get(index).copied().unwrap_or(0) == 0)
    }

    fn significant_words(&self) -> &[u64] {
        let end = self
            .words
            .iter()
            .rposition(|word| *word != 0)
            .map_or(0, |last| last + 1);
        &self.words[..end]
    }
}

impl PartialEq for Bitset {
    fn eq(&self, other: &Self) -> bool {
        self.significant_words() == other.significant_words()
    }
}

impl Eq for Bitset {}

impl Hash for Bitset {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.significant_words().hash(state);
    }
}

impl FromIterator<usize> for Bitset {
    fn from_iter<T: IntoIterator<Item = usize>>(iter: T) -> Self {
        let mut set = Bitset::new();
        for bit in iter {
            set.insert(bit);
        }
        set
    }
}

impl<'a> IntoIterator for &'a Bitset {
    type Item = usize;
    type IntoIter = BitsetIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct BitsetIter<'a> {
    words: &'a [u64],
    word_index: usize,
    current: u64,
}

impl Iterator for BitsetIter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        loop {
            if self.current != 0 {
                let bit = self.current.trailing_zeros() as usize;
                self.current &= self.current - 1;
                return Some(self.word_index * WORD_BITS + bit);
            }
            self.word_index += 1;
            self.current = *self.words.get(self.word_index)?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Bitset;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    fn hash_of(set: &Bitset) -> u64 {
        let mut hasher = DefaultHasher::new();
        set.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn insert_remove_contains() {
        let mut set = Bitset::new();
        assert!(set.insert(3));
        assert!(!set.insert(3));
        assert!(set.insert(130));
        assert!(set.contains(3));
        assert!(set.contains(130));
        assert!(!set.contains(64));
        assert_eq!(set.len(), 2);
        assert!(set.remove(3));
        assert!(!set.remove(3));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![130]);
    }

    #[test]
    fn trailing_zero_words_do_not_affect_equality() {
        let mut grown = Bitset::new();
        grown.insert(1);
        grown.insert(500);
        grown.remove(500);
        let small: Bitset = [1].into_iter().collect();
        assert_eq!(grown, small);
        assert_eq!(hash_of(&grown), hash_of(&small));
        assert_eq!(Bitset::with_capacity(1000), Bitset::new());
    }

    #[test]
    fn set_operations() {
        let mut a: Bitset = [1, 2, 70].into_iter().collect();
        let b: Bitset = [2, 3].into_iter().collect();
        let mut union = a.clone();
        union.union_with(&b);
        assert_eq!(union.iter().collect::<Vec<_>>(), vec![1, 2, 3, 70]);
        let mut intersection = a.clone();
        intersection.intersect_with(&b);
        assert_eq!(intersection.iter().collect::<Vec<_>>(), vec![2]);
        a.difference_with(&b);
        assert_eq!(a.iter().collect::<Vec<_>>(), vec![1, 70]);
        assert!(intersection.is_subset(&b));
        assert!(!a.is_subset(&b));
    }
}
