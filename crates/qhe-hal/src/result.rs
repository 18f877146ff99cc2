//! Measurement results.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Histogram of measured bit strings.
///
/// Keys are kept sorted so printed histograms are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Counts(BTreeMap<String, u64>);

impl Counts {
    /// An empty histogram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` occurrences of `bitstring`.
    pub fn insert(&mut self, bitstring: impl Into<String>, count: u64) {
        *self.0.entry(bitstring.into()).or_insert(0) += count;
    }

    /// Occurrences of `bitstring`, zero when absent.
    pub fn get(&self, bitstring: &str) -> u64 {
        self.0.get(bitstring).copied().unwrap_or(0)
    }

    /// Iterate over `(bitstring, count)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &u64)> {
        self.0.iter()
    }

    /// Number of distinct outcomes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no outcome was recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    /// The outcome seen most often; ties go to the smallest key.
    pub fn most_frequent(&self) -> Option<(&String, u64)> {
        self.0
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(k, &v)| (k, v))
    }

    /// Map every key through `f`, merging keys that collide.
    #[must_use]
    pub fn map_keys(&self, mut f: impl FnMut(&str) -> String) -> Self {
        let mut out = Self::new();
        for (k, &v) in &self.0 {
            out.insert(f(k), v);
        }
        out
    }

    /// Borrow the underlying map.
    pub fn as_map(&self) -> &BTreeMap<String, u64> {
        &self.0
    }
}

impl FromIterator<(String, u64)> for Counts {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        let mut counts = Self::new();
        for (k, v) in iter {
            counts.insert(k, v);
        }
        counts
    }
}

impl<'a> IntoIterator for &'a Counts {
    type Item = (&'a String, &'a u64);
    type IntoIter = std::collections::btree_map::Iter<'a, String, u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Output of a finished job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Measured histogram.
    pub counts: Counts,
    /// Shots executed.
    pub shots: u32,
    /// Wall-clock execution time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_time_ms: Option<u64>,
}

impl ExecutionResult {
    /// Create a result without timing information.
    pub fn new(counts: Counts, shots: u32) -> Self {
        Self {
            counts,
            shots,
            execution_time_ms: None,
        }
    }

    /// Attach the execution time.
    #[must_use]
    pub fn with_execution_time(mut self, ms: u64) -> Self {
        self.execution_time_ms = Some(ms);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_accumulate() {
        let mut counts = Counts::new();
        counts.insert("00", 3);
        counts.insert("11", 5);
        counts.insert("00", 2);

        assert_eq!(counts.get("00"), 5);
        assert_eq!(counts.get("01"), 0);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts.total(), 10);
        assert_eq!(counts.most_frequent(), Some((&"00".to_string(), 5)));
    }

    #[test]
    fn test_map_keys_merges() {
        let counts: Counts = [("01".to_string(), 1), ("11".to_string(), 2)]
            .into_iter()
            .collect();
        let merged = counts.map_keys(|k| k[1..].to_string());
        assert_eq!(merged.get("1"), 3);
        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn test_counts_serialize_as_map() {
        let mut counts = Counts::new();
        counts.insert("10", 4);
        let json = serde_json::to_string(&counts).unwrap();
        assert_eq!(json, r#"{"10":4}"#);

        let result = ExecutionResult::new(counts, 4).with_execution_time(7);
        let back: ExecutionResult =
            serde_json::from_str(&serde_json::to_string(&result).unwrap()).unwrap();
        assert_eq!(back, result);
    }
}
