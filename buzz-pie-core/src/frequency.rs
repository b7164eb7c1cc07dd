use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Cumulative count per category key since the table was created.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrequencyTable {
    map: HashMap<String, u64>,
    total: u64,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bump `key` by one and return its new count.
    pub fn increment(&mut self, key: &str) -> u64 {
        self.total += 1;
        let count = self.map.entry(key.to_owned()).or_insert(0);
        *count += 1;
        *count
    }

    pub fn count(&self, key: &str) -> u64 {
        self.map.get(key).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Entries by count descending; equal counts order by label ascending.
    pub fn sorted(&self) -> Vec<(&str, u64)> {
        let mut entries: Vec<(&str, u64)> = self.map.iter().map(|(k, &c)| (k.as_str(), c)).collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }
}

impl<S: AsRef<str>> FromIterator<(S, u64)> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (key, count) in iter {
            if count == 0 {
                continue;
            }
            *table.map.entry(key.as_ref().to_owned()).or_insert(0) += count;
            table.total += count;
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increment_touches_only_one_key() {
        let mut t = FrequencyTable::new();
        t.increment("tech");
        t.increment("tech");
        assert_eq!(t.increment("sports"), 1);
        assert_eq!(t.count("tech"), 2);
        assert_eq!(t.count("sports"), 1);
        assert_eq!(t.count("missing"), 0);
        assert_eq!(t.total(), 3);
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn sorted_breaks_ties_by_label() {
        let t: FrequencyTable = [("b", 2), ("a", 2), ("c", 5), ("d", 1)].into_iter().collect();
        assert_eq!(t.sorted(), vec![("c", 5), ("a", 2), ("b", 2), ("d", 1)]);
    }

    #[test]
    fn from_iter_skips_zero_counts() {
        let t: FrequencyTable = [("a", 0), ("b", 3)].into_iter().collect();
        assert_eq!(t.len(), 1);
        assert_eq!(t.total(), 3);
    }

    #[test]
    fn empty_table() {
        let t = FrequencyTable::new();
        assert!(t.is_empty());
        assert!(t.sorted().is_empty());
        assert_eq!(t.total(), 0);
    }
}
