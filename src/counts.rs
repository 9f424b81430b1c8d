use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Observed frequency of each outcome key over a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Counts {
    counts: BTreeMap<String, usize>,
}

impl Counts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, key: impl Into<String>) {
        *self.counts.entry(key.into()).or_insert(0) += 1;
    }

    pub fn get(&self, key: &str) -> usize {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Sum of all frequencies (the number of shots).
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Number of distinct outcomes observed.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(k, &v)| (k.as_str(), v))
    }

    pub fn probabilities(&self) -> BTreeMap<String, f64> {
        let total = self.total() as f64;
        self.counts
            .iter()
            .map(|(k, &v)| (k.clone(), v as f64 / total))
            .collect()
    }

    pub fn most_frequent(&self) -> Option<(&str, usize)> {
        self.iter().max_by_key(|&(_, v)| v)
    }

    /// Keeps only the bits at `positions` (bit 0 is the rightmost character,
    /// register separators ignored). Each resulting key lists the kept bits
    /// highest position first. Keys too short to hold every position are
    /// dropped.
    pub fn marginal(&self, positions: &[usize]) -> Counts {
        let mut sorted = positions.to_vec();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        sorted.dedup();

        let mut out = Counts::new();
        for (key, &count) in &self.counts {
            let bits: Vec<char> = key.chars().filter(|c| *c != ' ').rev().collect();
            if sorted.first().is_some_and(|&p| p >= bits.len()) {
                continue;
            }
            let kept: String = sorted.iter().map(|&p| bits[p]).collect();
            *out.counts.entry(kept).or_insert(0) += count;
        }
        out
    }
}

/// Zero frequencies are not observations and are skipped.
impl FromIterator<(String, usize)> for Counts {
    fn from_iter<I: IntoIterator<Item = (String, usize)>>(iter: I) -> Self {
        let mut out = Counts::new();
        for (k, v) in iter.into_iter().filter(|&(_, v)| v > 0) {
            *out.counts.entry(k).or_insert(0) += v;
        }
        out
    }
}

impl fmt::Display for Counts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, count)) in self.counts.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "'{key}': {count}")?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Counts {
        [("000", 10), ("101", 30), ("110", 60)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    #[test]
    fn totals_and_lookup() {
        let counts = sample();
        assert_eq!(counts.total(), 100);
        assert_eq!(counts.len(), 3);
        assert_eq!(counts.get("101"), 30);
        assert_eq!(counts.get("111"), 0);
        assert_eq!(counts.most_frequent(), Some(("110", 60)));
        assert!((counts.probabilities()["110"] - 0.6).abs() < 1e-12);
    }

    #[test]
    fn marginal_counts_from_the_right() {
        let counts = sample();
        let top = counts.marginal(&[2]);
        assert_eq!(top.get("0"), 10);
        assert_eq!(top.get("1"), 90);

        let low = counts.marginal(&[0, 1]);
        assert_eq!(low.get("00"), 10);
        assert_eq!(low.get("01"), 30);
        assert_eq!(low.get("10"), 60);
    }

    #[test]
    fn marginal_ignores_register_separator() {
        let counts: Counts = [("1 01".to_string(), 4)].into_iter().collect();
        assert_eq!(counts.marginal(&[2]).get("1"), 4);
    }

    #[test]
    fn display_and_json() {
        let counts = sample();
        assert_eq!(counts.to_string(), "{'000': 10, '101': 30, '110': 60}");
        let json = serde_json::to_string(&counts).unwrap();
        assert_eq!(json, r#"{"000":10,"101":30,"110":60}"#);
    }

    #[test]
    fn zero_frequencies_are_not_recorded() {
        let counts: Counts = [("0".to_string(), 0), ("1".to_string(), 4)]
            .into_iter()
            .collect();
        assert_eq!(counts.len(), 1);
        assert_eq!(counts.get("0"), 0);
        assert_eq!(counts.to_string(), "{'1': 4}");

        let none: Counts = [("0".to_string(), 0)].into_iter().collect();
        assert!(none.is_empty());
    }

    #[test]
    fn marginal_skips_keys_too_short() {
        let counts: Counts = [("1 01", 5), ("11", 3)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        let bob = counts.marginal(&[2]);
        assert_eq!(bob.total(), 5);
        assert_eq!(bob.get("1"), 5);
        assert_eq!(counts.marginal(&[0]).total(), 8);
    }
}
