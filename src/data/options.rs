//! Filter Options Module
//! Lists the values a user can pick for each filter dimension.

use super::filter::{CltvRange, ALL};
use super::loader::Dataset;
use serde::Serialize;
use std::collections::BTreeSet;

/// Choices offered per dimension, each list starting with "All".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterOptions {
    pub statuses: Vec<String>,
    pub satisfaction_levels: Vec<String>,
    pub risk_levels: Vec<String>,
    pub cltv_bounds: CltvRange,
}

impl FilterOptions {
    /// Statuses keep first-seen order; satisfaction and risk levels are sorted.
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let mut statuses = vec![ALL.to_string()];
        for record in dataset.records() {
            if !statuses[1..].contains(&record.customer_status) {
                statuses.push(record.customer_status.clone());
            }
        }

        Self {
            statuses,
            satisfaction_levels: Self::sorted_with_all(
                dataset.records().iter().map(|r| r.satisfaction_level.as_str()),
            ),
            risk_levels: Self::sorted_with_all(
                dataset.records().iter().map(|r| r.churn_risk_level.as_str()),
            ),
            cltv_bounds: CltvRange::observed(dataset),
        }
    }

    fn sorted_with_all<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
        let unique: BTreeSet<&str> = values.collect();
        std::iter::once(ALL)
            .chain(unique)
            .map(str::to_string)
            .collect()
    }
}
