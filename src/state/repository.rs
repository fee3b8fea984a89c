use super::types::{State, StateId};
use crate::data::Interner;

/// Interning table for states. Equal states share one id, so searches can
/// key their bookkeeping by `StateId`.
#[derive(Debug, Default)]
pub struct StateRepository {
    states: Interner<StateId, State>,
}

impl StateRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id and whether the state was seen for the first time.
    pub fn insert(&mut self, state: State) -> (StateId, bool) {
        let before = self.states.len();
        let id = self.states.intern(state);
        (id, self.states.len() > before)
    }

    pub fn get(&self, id: StateId) -> &State {
        self.states.get(id)
    }

    pub fn find(&self, state: &State) -> Option<StateId> {
        self.states.find(state)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::StateRepository;
    use crate::data::Bitset;
    use crate::state::State;

    #[test]
    fn interning_is_idempotent() {
        let mut states = StateRepository::new();
        let (a, fresh) = states.insert(State::new([1].into_iter().collect(), Bitset::new(), vec![]));
        assert!(fresh);
        let (b, fresh) = states.insert(State::new([1].into_iter().collect(), Bitset::new(), vec![]));
        assert!(!fresh);
        assert_eq!(a, b);
        let (c, _) = states.insert(State::new(Bitset::new(), Bitset::new(), vec![]));
        assert_ne!(a, c);
        assert_eq!(states.len(), 2);
    }
}
