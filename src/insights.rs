//! Insights Module
//! Follow-up actions and data-explorer summary derived from the aggregates.

use crate::data::{CustomerRecord, Dataset, FilteredView};
use crate::stats::{AggregateResult, StatsCalculator, ValueSummary};
use serde::Serialize;

/// Retention follow-ups for the current view.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ActionPlan {
    /// Critical-risk customers to contact within 12 hours.
    pub contact_within_12h: usize,
    /// High-risk customers to contact within 24 hours.
    pub contact_within_24h: usize,
    /// Medium-risk customers to review weekly.
    pub monitor_weekly: usize,
    pub revenue_at_risk: f64,
    /// Churned revenue per churned customer, 0 without churn.
    pub avg_recovery_value: f64,
    pub critical_and_high: usize,
}

impl ActionPlan {
    pub fn from_aggregates(result: &AggregateResult) -> Self {
        let avg_recovery_value = if result.churned > 0 {
            result.churned_revenue / result.churned as f64
        } else {
            0.0
        };

        Self {
            contact_within_12h: result.critical_risk,
            contact_within_24h: result.high_risk,
            monitor_weekly: result.medium_risk,
            revenue_at_risk: result.churned_revenue,
            avg_recovery_value,
            critical_and_high: result.critical_risk + result.high_risk,
        }
    }
}

/// Size of the filtered view relative to the dataset, plus a preview.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub total_records: usize,
    pub filtered_records: usize,
    pub total_columns: usize,
    /// Filtered share of the dataset in percent.
    pub filter_efficiency: f64,
    pub cltv: ValueSummary,
    pub sample: Vec<CustomerRecord>,
}

impl DatasetSummary {
    pub fn new(dataset: &Dataset, view: &FilteredView<'_>, sample_rows: usize) -> Self {
        let cltvs: Vec<f64> = view.iter().map(|r| r.cltv).collect();

        Self {
            total_records: dataset.len(),
            filtered_records: view.len(),
            total_columns: dataset.columns().len(),
            filter_efficiency: StatsCalculator::percent(view.len() as f64, dataset.len() as f64),
            cltv: StatsCalculator::compute_descriptive_stats(&cltvs),
            sample: view.head(sample_rows),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::record::*;
    use crate::data::{FilterEngine, FilterSelection};

    fn record(id: &str, status: &str, cltv: f64) -> CustomerRecord {
        CustomerRecord {
            customer_id: id.into(),
            customer_status: status.into(),
            satisfaction_score: 3,
            satisfaction_level: "Medium".into(),
            cltv,
            cltv_quartile: "Q2".into(),
            churn_value: u8::from(status == STATUS_CHURNED),
            churn_risk_level: RISK_MEDIUM.into(),
            churn_category: CATEGORY_NOT_APPLICABLE.into(),
            churn_reason: None,
        }
    }

    #[test]
    fn recovery_value_is_zero_without_churn() {
        let result = AggregateResult {
            critical_risk: 3,
            high_risk: 4,
            medium_risk: 5,
            ..AggregateResult::default()
        };
        let plan = ActionPlan::from_aggregates(&result);
        assert_eq!(plan.avg_recovery_value, 0.0);
        assert_eq!(plan.critical_and_high, 7);
        assert_eq!(plan.monitor_weekly, 5);
    }

    #[test]
    fn recovery_value_divides_churned_revenue() {
        let result = AggregateResult {
            churned: 4,
            churned_revenue: 10_000.0,
            ..AggregateResult::default()
        };
        let plan = ActionPlan::from_aggregates(&result);
        assert_eq!(plan.avg_recovery_value, 2_500.0);
        assert_eq!(plan.revenue_at_risk, 10_000.0);
    }

    #[test]
    fn summary_reports_efficiency_and_sample() {
        let ds = Dataset::from_records(vec![
            record("1", STATUS_CHURNED, 100.0),
            record("2", STATUS_STAYED, 300.0),
            record("3", STATUS_CHURNED, 200.0),
            record("4", STATUS_STAYED, 400.0),
        ]);
        let selection = FilterSelection::for_dataset(&ds).with_status(STATUS_CHURNED);
        let view = FilterEngine::apply(&ds, &selection);

        let summary = DatasetSummary::new(&ds, &view, 1);

        assert_eq!(summary.total_records, 4);
        assert_eq!(summary.filtered_records, 2);
        assert_eq!(summary.total_columns, REQUIRED_COLUMNS.len());
        assert_eq!(summary.filter_efficiency, 50.0);
        assert_eq!(summary.cltv.mean, 150.0);
        assert_eq!(summary.sample.len(), 1);
        assert_eq!(summary.sample[0].customer_id, "1");
    }

    #[test]
    fn empty_dataset_summary_has_zero_efficiency() {
        let ds = Dataset::default();
        let view = FilteredView::full(&ds);
        let summary = DatasetSummary::new(&ds, &view, 10);
        assert_eq!(summary.filter_efficiency, 0.0);
        assert!(summary.sample.is_empty());
    }
}
