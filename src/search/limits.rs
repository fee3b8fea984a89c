use std::time::{Duration, Instant};

/// Why a search gave up before finishing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AbortReason {
    TimeLimit,
    StateLimit,
    ExpansionLimit,
}

/// Cooperative resource limits. `None` means unlimited.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchLimits {
    pub max_time: Option<Duration>,
    pub max_states: Option<usize>,
    pub max_expansions: Option<usize>,
}

impl SearchLimits {
    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn with_max_expansions(mut self, expansions: usize) -> Self {
        self.max_expansions = Some(expansions);
        self
    }

    pub fn with_max_states(mut self, states: usize) -> Self {
        self.max_states = Some(states);
        self
    }

    pub fn with_max_time(mut self, time: Duration) -> Self {
        self.max_time = Some(time);
        self
    }

    pub(crate) fn start(&self) -> Budget {
        Budget {
            deadline: self.max_time.map(|time| Instant::now() + time),
            max_states: self.max_states,
            max_expansions: self.max_expansions,
        }
    }
}

/// Limits of one running search.
#[derive(Clone, Debug)]
pub(crate) struct Budget {
    deadline: Option<Instant>,
    max_states: Option<usize>,
    max_expansions: Option<usize>,
}

impl Budget {
    fn time_left(&self) -> Result<(), AbortReason> {
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(AbortReason::TimeLimit),
            _ => Ok(()),
        }
    }

    /// Checked before expanding a node; `expanded` is the count so far.
    pub(crate) fn before_expansion(&self, expanded: usize) -> Result<(), AbortReason> {
        if self.max_expansions.is_some_and(|max| expanded >= max) {
            return Err(AbortReason::ExpansionLimit);
        }
        self.time_left()
    }

    /// Checked before generating a successor; `states` is the number of
    /// states generated so far.
    pub(crate) fn before_generation(&self, states: usize) -> Result<(), AbortReason> {
        if self.max_states.is_some_and(|max| states >= max) {
            return Err(AbortReason::StateLimit);
        }
        self.time_left()
    }
}
