use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;

/// Occurrence counts that remember the order in which values were first seen,
/// so sorting by count gives a deterministic tie-break.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrequencyTable {
    entries: Vec<(String, usize)>,
    index: HashMap<String, usize>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = Self::new();
        table.extend(values);
        table
    }

    pub fn add(&mut self, value: &str) {
        self.add_count(value, 1);
    }

    pub fn add_count(&mut self, value: &str, count: usize) {
        match self.index.get(value) {
            Some(&i) => self.entries[i].1 += count,
            None => {
                self.index.insert(value.to_string(), self.entries.len());
                self.entries.push((value.to_string(), count));
            }
        }
    }

    pub fn extend<I, S>(&mut self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for value in values {
            self.add(value.as_ref());
        }
    }

    pub fn get(&self, value: &str) -> Option<usize> {
        self.index.get(value).map(|&i| self.entries[i].1)
    }

    /// Number of distinct values.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    /// Entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(value, count)| (value.as_str(), *count))
    }

    /// Entries by descending count; ties keep first-seen order.
    pub fn sorted(&self) -> Vec<(&str, usize)> {
        let mut sorted: Vec<_> = self.iter().collect();
        sorted.sort_by(|a, b| b.1.cmp(&a.1));
        sorted
    }

    pub fn top(&self, n: usize) -> Vec<(&str, usize)> {
        let mut sorted = self.sorted();
        sorted.truncate(n);
        sorted
    }

    /// Distinct values by descending count.
    pub fn keys_by_frequency(&self) -> Vec<String> {
        self.sorted()
            .into_iter()
            .map(|(value, _)| value.to_string())
            .collect()
    }
}

impl Serialize for FrequencyTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let sorted = self.sorted();
        let mut map = serializer.serialize_map(Some(sorted.len()))?;
        for (value, count) in sorted {
            map.serialize_entry(value, &count)?;
        }
        map.end()
    }
}
