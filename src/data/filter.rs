//! Filter Engine Module
//! Narrows the dataset by status, satisfaction level, risk level and CLTV range.

use super::loader::Dataset;
use super::record::CustomerRecord;
use log::debug;
use serde::{Deserialize, Serialize};

/// Value every categorical filter accepts to mean "no constraint".
pub const ALL: &str = "All";

/// Choice for one categorical dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selector {
    #[default]
    All,
    Only(String),
}

impl Selector {
    /// "All" maps to no constraint, anything else is an exact value.
    pub fn parse(value: &str) -> Self {
        if value == ALL {
            Selector::All
        } else {
            Selector::Only(value.to_string())
        }
    }

    /// Exact, case-sensitive comparison.
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Selector::All => true,
            Selector::Only(expected) => expected == value,
        }
    }
}

/// Inclusive CLTV bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CltvRange {
    pub min: f64,
    pub max: f64,
}

impl CltvRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// A range that admits every non-negative CLTV.
    pub fn unbounded() -> Self {
        Self::new(f64::NEG_INFINITY, f64::INFINITY)
    }

    /// The observed range of the dataset, or unbounded when it is empty.
    pub fn observed(dataset: &Dataset) -> Self {
        dataset
            .cltv_bounds()
            .map(|(min, max)| Self::new(min, max))
            .unwrap_or_else(Self::unbounded)
    }

    pub fn contains(&self, cltv: f64) -> bool {
        self.min <= cltv && cltv <= self.max
    }
}

impl Default for CltvRange {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// A single predicate of a selection.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    Status(String),
    Satisfaction(String),
    Risk(String),
    Cltv(CltvRange),
}

impl Constraint {
    pub fn accepts(&self, record: &CustomerRecord) -> bool {
        match self {
            Constraint::Status(v) => record.customer_status == *v,
            Constraint::Satisfaction(v) => record.satisfaction_level == *v,
            Constraint::Risk(v) => record.churn_risk_level == *v,
            Constraint::Cltv(range) => range.contains(record.cltv),
        }
    }
}

/// User choices across the four filter dimensions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSelection {
    pub status: Selector,
    pub satisfaction: Selector,
    pub risk: Selector,
    pub cltv_range: CltvRange,
}

impl FilterSelection {
    /// Selection with every dimension on "All" and the dataset's full CLTV range.
    pub fn for_dataset(dataset: &Dataset) -> Self {
        Self {
            cltv_range: CltvRange::observed(dataset),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: &str) -> Self {
        self.status = Selector::parse(status);
        self
    }

    pub fn with_satisfaction(mut self, level: &str) -> Self {
        self.satisfaction = Selector::parse(level);
        self
    }

    pub fn with_risk(mut self, risk: &str) -> Self {
        self.risk = Selector::parse(risk);
        self
    }

    pub fn with_cltv_range(mut self, min: f64, max: f64) -> Self {
        self.cltv_range = CltvRange::new(min, max);
        self
    }

    /// Active predicates. The CLTV range is always active.
    pub fn constraints(&self) -> Vec<Constraint> {
        let mut constraints = Vec::with_capacity(4);
        if let Selector::Only(v) = &self.status {
            constraints.push(Constraint::Status(v.clone()));
        }
        if let Selector::Only(v) = &self.satisfaction {
            constraints.push(Constraint::Satisfaction(v.clone()));
        }
        if let Selector::Only(v) = &self.risk {
            constraints.push(Constraint::Risk(v.clone()));
        }
        constraints.push(Constraint::Cltv(self.cltv_range));
        constraints
    }

    pub fn matches(&self, record: &CustomerRecord) -> bool {
        self.status.matches(&record.customer_status)
            && self.satisfaction.matches(&record.satisfaction_level)
            && self.risk.matches(&record.churn_risk_level)
            && self.cltv_range.contains(record.cltv)
    }
}

/// Borrowed subsequence of a dataset, in dataset order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilteredView<'a> {
    rows: Vec<&'a CustomerRecord>,
}

impl<'a> FilteredView<'a> {
    /// View over every record of the dataset.
    pub fn full(dataset: &'a Dataset) -> Self {
        Self {
            rows: dataset.records().iter().collect(),
        }
    }

    pub fn from_rows(rows: Vec<&'a CustomerRecord>) -> Self {
        Self { rows }
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a CustomerRecord> + '_ {
        self.rows.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Keep only the rows accepted by `constraint`.
    pub fn retain(mut self, constraint: &Constraint) -> Self {
        self.rows.retain(|r| constraint.accepts(r));
        self
    }

    /// Owned copies of the first `n` rows.
    pub fn head(&self, n: usize) -> Vec<CustomerRecord> {
        self.rows.iter().take(n).map(|r| (*r).clone()).collect()
    }
}

/// Applies filter selections. Stateless.
pub struct FilterEngine;

impl FilterEngine {
    /// Rows of `dataset` matching every active constraint of `selection`.
    pub fn apply<'a>(dataset: &'a Dataset, selection: &FilterSelection) -> FilteredView<'a> {
        let view = FilteredView::from_rows(
            dataset
                .records()
                .iter()
                .filter(|r| selection.matches(r))
                .collect(),
        );
        debug!(
            "Filter kept {} of {} records ({:?})",
            view.len(),
            dataset.len(),
            selection
        );
        view
    }

    /// Apply `selection` again on top of an existing view.
    pub fn refine<'a>(view: &FilteredView<'a>, selection: &FilterSelection) -> FilteredView<'a> {
        FilteredView::from_rows(view.iter().filter(|r| selection.matches(r)).collect())
    }

    /// Apply constraints one after another, in the given order.
    pub fn apply_constraints<'a>(
        dataset: &'a Dataset,
        constraints: &[Constraint],
    ) -> FilteredView<'a> {
        constraints
            .iter()
            .fold(FilteredView::full(dataset), |view, c| view.retain(c))
    }
}
