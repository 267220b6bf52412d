//! Grouped Tables Module
//! Key-to-accumulator reductions used by the aggregator.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Row count for one group key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupCount {
    pub key: String,
    pub count: usize,
}

/// CLTV sum for one group key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSum {
    pub key: String,
    pub total: f64,
}

/// Counter that remembers the order in which keys were first seen.
#[derive(Debug, Default)]
pub struct ValueCounts {
    index: HashMap<String, usize>,
    counts: Vec<GroupCount>,
}

impl ValueCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: &str) {
        match self.index.get(key) {
            Some(&i) => self.counts[i].count += 1,
            None => {
                self.index.insert(key.to_string(), self.counts.len());
                self.counts.push(GroupCount {
                    key: key.to_string(),
                    count: 1,
                });
            }
        }
    }

    /// Groups ordered by count, highest first; equal counts keep first-seen order.
    pub fn into_descending(self) -> Vec<GroupCount> {
        let mut counts = self.counts;
        // sort_by is stable
        counts.sort_by(|a, b| b.count.cmp(&a.count));
        counts
    }

    /// Top `n` groups of [`into_descending`](Self::into_descending).
    pub fn into_top(self, n: usize) -> Vec<GroupCount> {
        let mut counts = self.into_descending();
        counts.truncate(n);
        counts
    }
}

impl<'a> FromIterator<&'a str> for ValueCounts {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut counts = ValueCounts::new();
        for key in iter {
            counts.add(key);
        }
        counts
    }
}

/// Sum values per key, keys in ascending order.
pub fn sum_by_key<'a>(pairs: impl Iterator<Item = (&'a str, f64)>) -> Vec<GroupSum> {
    let mut sums: BTreeMap<&str, f64> = BTreeMap::new();
    for (key, value) in pairs {
        *sums.entry(key).or_insert(0.0) += value;
    }
    sums.into_iter()
        .map(|(key, total)| GroupSum {
            key: key.to_string(),
            total,
        })
        .collect()
}

/// Two-way count matrix; row and column labels are the values present, sorted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CrossTab {
    pub rows: Vec<String>,
    pub columns: Vec<String>,
    pub counts: Vec<Vec<usize>>,
}

impl CrossTab {
    pub fn from_pairs<'a>(pairs: impl Iterator<Item = (&'a str, &'a str)>) -> Self {
        let mut cells: BTreeMap<(&str, &str), usize> = BTreeMap::new();
        let mut columns: BTreeSet<&str> = BTreeSet::new();
        for (row, column) in pairs {
            *cells.entry((row, column)).or_insert(0) += 1;
            columns.insert(column);
        }

        let rows: BTreeSet<&str> = cells.keys().map(|(r, _)| *r).collect();
        let counts = rows
            .iter()
            .map(|r| {
                columns
                    .iter()
                    .map(|c| cells.get(&(*r, *c)).copied().unwrap_or(0))
                    .collect()
            })
            .collect();

        Self {
            rows: rows.into_iter().map(str::to_string).collect(),
            columns: columns.into_iter().map(str::to_string).collect(),
            counts,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, row: &str, column: &str) -> usize {
        let r = self.rows.iter().position(|x| x == row);
        let c = self.columns.iter().position(|x| x == column);
        match (r, c) {
            (Some(r), Some(c)) => self.counts[r][c],
            _ => 0,
        }
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ties_keep_first_seen_order() {
        let counts: ValueCounts = ["b", "a", "c", "a", "c", "d"].into_iter().collect();
        let keys: Vec<_> = counts
            .into_descending()
            .into_iter()
            .map(|g| (g.key, g.count))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("a".to_string(), 2),
                ("c".to_string(), 2),
                ("b".to_string(), 1),
                ("d".to_string(), 1)
            ]
        );
    }

    #[test]
    fn top_truncates() {
        let counts: ValueCounts = ["x", "y", "y", "z"].into_iter().collect();
        let top = counts.into_top(2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].key, "y");
        assert_eq!(top[1].key, "x");
    }

    #[test]
    fn sums_are_sorted_by_key() {
        let sums = sum_by_key([("Low", 10.0), ("High", 5.0), ("Low", 2.5)].into_iter());
        assert_eq!(
            sums,
            vec![
                GroupSum { key: "High".into(), total: 5.0 },
                GroupSum { key: "Low".into(), total: 12.5 },
            ]
        );
    }

    #[test]
    fn crosstab_fills_missing_cells_with_zero() {
        let tab = CrossTab::from_pairs(
            [("High Risk", "Low"), ("Low Risk", "High"), ("High Risk", "Low")].into_iter(),
        );
        assert_eq!(tab.rows, vec!["High Risk", "Low Risk"]);
        assert_eq!(tab.columns, vec!["High", "Low"]);
        assert_eq!(tab.counts, vec![vec![0, 2], vec![1, 0]]);
        assert_eq!(tab.get("High Risk", "Low"), 2);
        assert_eq!(tab.get("Critical Risk", "Low"), 0);
        assert_eq!(tab.total(), 3);
    }

    #[test]
    fn empty_crosstab() {
        let tab = CrossTab::from_pairs(std::iter::empty());
        assert!(tab.is_empty());
        assert!(tab.counts.is_empty());
    }
}
