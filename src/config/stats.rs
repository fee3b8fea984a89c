use std::collections::BTreeMap;
use std::fmt;

/// Named run counters, such as `expanded`, `generated` or
/// `grounding.cache_hits`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Statistics {
    counters: BTreeMap<String, u64>,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: u64) {
        self.counters.insert(name.into(), value);
    }

    pub fn increment(&mut self, name: impl Into<String>) -> u64 {
        self.increment_by(name, 1)
    }

    pub fn increment_by(
        &mut self,
        name: impl Into<String>,
        amount: u64,
    ) -> u64 {
        let entry = self.counters.entry(name.into()).or_insert(0);
        *entry += amount;
        *entry
    }

    pub fn get(&self, name: &str) -> Option<u64> {
        self.counters.get(name).copied()
    }

    pub fn reset(&mut self, name: &str) {
        self.counters.remove(name);
    }

    pub fn clear(&mut self) {
        self.counters.clear();
    }

    /// Adds every counter of `other` into this one.
    pub fn merge(&mut self, other: &Statistics) {
        for (name, value) in &other.counters {
            self.increment_by(name.clone(), *value);
        }
    }

    /// Counters in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counters.iter().map(|(name, value)| (name.as_str(), *value))
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in self.iter() {
            writeln!(f, "{name}: {value}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Statistics;

    #[test]
    fn counters_increment() {
        let mut stats = Statistics::new();
        assert_eq!(stats.increment("expanded"), 1);
        assert_eq!(stats.increment_by("expanded", 4), 5);
        assert_eq!(stats.get("expanded"), Some(5));
        stats.reset("expanded");
        assert!(stats.get("expanded").is_none());
    }

    #[test]
    fn merge_and_display_in_name_order() {
        let mut a = Statistics::new();
        a.set("generated", 2);
        let mut b = Statistics::new();
        b.set("generated", 3);
        b.set("expanded", 1);
        a.merge(&b);
        assert_eq!(a.get("generated"), Some(5));
        assert_eq!(a.to_string(), "expanded: 1\ngenerated: 5\n");
    }
}
