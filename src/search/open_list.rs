//! Priority queues for best-first search.

use crate::state::StateId;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OpenEntry {
    pub state: StateId,
    pub primary: f64,
    pub secondary: f64,
    /// Path cost when the entry was pushed, used to detect stale entries.
    pub g: f64,
}

#[derive(Copy, Clone, Debug)]
struct HeapEntry {
    entry: OpenEntry,
    order: u64,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    // Reversed: the heap pops the smallest key, oldest first on ties.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .entry
            .primary
            .total_cmp(&self.entry.primary)
            .then_with(|| other.entry.secondary.total_cmp(&self.entry.secondary))
            .then_with(|| other.order.cmp(&self.order))
    }
}

/// Min-queue on `(primary, secondary, insertion order)`.
#[derive(Debug, Default)]
pub struct PriorityQueue {
    heap: BinaryHeap<HeapEntry>,
    pushed: u64,
}

impl PriorityQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: OpenEntry) {
        let order = self.pushed;
        self.pushed += 1;
        self.heap.push(HeapEntry { entry, order });
    }

    pub fn pop(&mut self) -> Option<OpenEntry> {
        self.heap.pop().map(|heap_entry| heap_entry.entry)
    }

    pub fn min_primary(&self) -> Option<f64> {
        self.heap.peek().map(|heap_entry| heap_entry.entry.primary)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

/// A regular queue plus a queue of preferred entries.
///
/// Up to `weight` preferred entries are popped for every regular one. When
/// `bounded`, a preferred entry is only taken if its key does not exceed the
/// regular minimum, which keeps A* expansions in `f` order.
#[derive(Debug)]
pub struct AlternatingOpenList {
    regular: PriorityQueue,
    preferred: PriorityQueue,
    weight: u32,
    bounded: bool,
    streak: u32,
}

impl AlternatingOpenList {
    pub fn new(weight: u32, bounded: bool) -> Self {
        Self {
            regular: PriorityQueue::new(),
            preferred: PriorityQueue::new(),
            weight,
            bounded,
            streak: 0,
        }
    }

    pub fn push(&mut self, entry: OpenEntry, preferred: bool) {
        if preferred && self.weight > 0 {
            self.preferred.push(entry);
        }
        self.regular.push(entry);
    }

    pub fn pop(&mut self) -> Option<OpenEntry> {
        if self.streak < self.weight && self.take_preferred() {
            self.streak += 1;
            return self.preferred.pop();
        }
        self.streak = 0;
        self.regular.pop().or_else(|| self.preferred.pop())
    }

    fn take_preferred(&self) -> bool {
        match (self.preferred.min_primary(), self.regular.min_primary()) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(preferred), Some(regular)) => !self.bounded || preferred <= regular,
        }
    }

    pub fn len(&self) -> usize {
        self.regular.len() + self.preferred.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regular.is_empty() && self.preferred.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{AlternatingOpenList, OpenEntry, PriorityQueue};
    use crate::state::StateId;

    fn entry(state: u32, primary: f64, secondary: f64) -> OpenEntry {
        OpenEntry {
            state: StateId::from_raw(state),
            primary,
            secondary,
            g: 0.0,
        }
    }

    fn drain(queue: &mut PriorityQueue) -> Vec<u32> {
        std::iter::from_fn(|| queue.pop())
            .map(|entry| entry.state.as_raw())
            .collect()
    }

    #[test]
    fn ties_break_on_secondary_then_insertion_order() {
        let mut queue = PriorityQueue::new();
        queue.push(entry(0, 5.0, 2.0));
        queue.push(entry(1, 5.0, 1.0));
        queue.push(entry(2, 3.0, 9.0));
        queue.push(entry(3, 5.0, 1.0));
        assert_eq!(drain(&mut queue), vec![2, 1, 3, 0]);
    }

    #[test]
    fn preferred_entries_alternate_by_weight() {
        let mut open = AlternatingOpenList::new(2, false);
        open.push(entry(0, 1.0, 0.0), false);
        open.push(entry(1, 4.0, 0.0), true);
        open.push(entry(2, 5.0, 0.0), true);
        open.push(entry(3, 6.0, 0.0), true);
        let order: Vec<u32> = std::iter::from_fn(|| open.pop())
            .map(|entry| entry.state.as_raw())
            .collect();
        // Preferred entries also sit in the regular queue.
        assert_eq!(order[..3], [1, 2, 0]);
        assert_eq!(order.len(), 7);
    }

    #[test]
    fn bounded_list_never_pops_above_the_regular_minimum() {
        let mut open = AlternatingOpenList::new(5, true);
        open.push(entry(0, 1.0, 0.0), false);
        open.push(entry(1, 4.0, 0.0), true);
        assert_eq!(open.pop().map(|entry| entry.state.as_raw()), Some(0));
        assert_eq!(open.pop().map(|entry| entry.state.as_raw()), Some(1));
    }
}
