//! Aggregator Module
//! Computes every dashboard metric and grouped table from a filtered view.

use super::calculator::StatsCalculator;
use super::tables::{sum_by_key, CrossTab, GroupCount, GroupSum, ValueCounts};
use crate::data::record::*;
use crate::data::FilteredView;
use log::{debug, warn};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Default number of churn reasons reported.
pub const DEFAULT_TOP_REASONS: usize = 10;

/// Per satisfaction level: size, churn and CLTV.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SatisfactionRow {
    pub satisfaction_level: String,
    pub count: usize,
    /// Mean of `churn_value` (0..=1).
    pub churn_value: f64,
    pub avg_cltv: f64,
    /// `churn_value * 100`.
    pub churn_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreCount {
    pub score: i64,
    pub count: usize,
}

/// Frequency and revenue lost for one churn reason.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReasonImpact {
    pub reason: String,
    pub count: usize,
    pub revenue: f64,
}

/// All derived numbers and tables for one filtered view.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregateResult {
    pub total: usize,
    pub churned: usize,
    pub stayed: usize,
    pub joined: usize,
    pub churn_rate: f64,
    pub avg_cltv: f64,

    pub critical_risk: usize,
    pub high_risk: usize,
    pub medium_risk: usize,
    pub low_risk: usize,

    pub churned_revenue: f64,
    pub total_revenue: f64,
    pub revenue_at_risk_pct: f64,
    pub risk_revenue: Vec<GroupSum>,

    pub satisfaction_analysis: Vec<SatisfactionRow>,
    pub score_distribution: Vec<ScoreCount>,
    pub status_distribution: Vec<GroupCount>,
    pub quartile_distribution: Vec<GroupCount>,
    pub risk_satisfaction_crosstab: CrossTab,
    pub category_counts: Vec<GroupCount>,
    pub top_churn_reasons: Vec<GroupCount>,
    pub reason_impact: Vec<ReasonImpact>,
}

struct Headline {
    total: usize,
    churned: usize,
    stayed: usize,
    joined: usize,
    churn_rate: f64,
    avg_cltv: f64,
    critical_risk: usize,
    high_risk: usize,
    medium_risk: usize,
    low_risk: usize,
}

struct Revenue {
    churned_revenue: f64,
    total_revenue: f64,
    revenue_at_risk_pct: f64,
    risk_revenue: Vec<GroupSum>,
}

struct Distributions {
    satisfaction_analysis: Vec<SatisfactionRow>,
    score_distribution: Vec<ScoreCount>,
    status_distribution: Vec<GroupCount>,
    quartile_distribution: Vec<GroupCount>,
    risk_satisfaction_crosstab: CrossTab,
    category_counts: Vec<GroupCount>,
}

struct Reasons {
    top_churn_reasons: Vec<GroupCount>,
    reason_impact: Vec<ReasonImpact>,
}

/// Stateless aggregation over a filtered view.
pub struct Aggregator;

impl Aggregator {
    /// Compute every statistic with the default top-10 reason limit.
    pub fn aggregate(view: &FilteredView<'_>) -> AggregateResult {
        Self::aggregate_with_limit(view, DEFAULT_TOP_REASONS)
    }

    /// Compute every statistic. The four groups are independent and run with rayon.
    pub fn aggregate_with_limit(view: &FilteredView<'_>, top_reasons: usize) -> AggregateResult {
        if view.is_empty() {
            warn!("Aggregating an empty view; all metrics take their zero values");
        }

        let ((headline, revenue), (distributions, reasons)) = rayon::join(
            || rayon::join(|| Self::headline(view), || Self::revenue(view)),
            || {
                rayon::join(
                    || Self::distributions(view),
                    || Self::churn_reasons(view, top_reasons),
                )
            },
        );
        debug!(
            "Aggregated {} rows: churn rate {:.1}%, {} reason groups",
            headline.total,
            headline.churn_rate,
            reasons.top_churn_reasons.len()
        );

        AggregateResult {
            total: headline.total,
            churned: headline.churned,
            stayed: headline.stayed,
            joined: headline.joined,
            churn_rate: headline.churn_rate,
            avg_cltv: headline.avg_cltv,
            critical_risk: headline.critical_risk,
            high_risk: headline.high_risk,
            medium_risk: headline.medium_risk,
            low_risk: headline.low_risk,
            churned_revenue: revenue.churned_revenue,
            total_revenue: revenue.total_revenue,
            revenue_at_risk_pct: revenue.revenue_at_risk_pct,
            risk_revenue: revenue.risk_revenue,
            satisfaction_analysis: distributions.satisfaction_analysis,
            score_distribution: distributions.score_distribution,
            status_distribution: distributions.status_distribution,
            quartile_distribution: distributions.quartile_distribution,
            risk_satisfaction_crosstab: distributions.risk_satisfaction_crosstab,
            category_counts: distributions.category_counts,
            top_churn_reasons: reasons.top_churn_reasons,
            reason_impact: reasons.reason_impact,
        }
    }

    fn count_where(view: &FilteredView<'_>, pred: impl Fn(&CustomerRecord) -> bool) -> usize {
        view.iter().filter(|r| pred(*r)).count()
    }

    fn headline(view: &FilteredView<'_>) -> Headline {
        let total = view.len();
        let churned = Self::count_where(view, |r| r.customer_status == STATUS_CHURNED);
        let cltvs: Vec<f64> = view.iter().map(|r| r.cltv).collect();

        Headline {
            total,
            churned,
            stayed: Self::count_where(view, |r| r.customer_status == STATUS_STAYED),
            joined: Self::count_where(view, |r| r.customer_status == STATUS_JOINED),
            churn_rate: StatsCalculator::percent(churned as f64, total as f64),
            avg_cltv: StatsCalculator::mean_or_zero(&cltvs),
            critical_risk: Self::count_where(view, |r| r.churn_risk_level == RISK_CRITICAL),
            high_risk: Self::count_where(view, |r| r.churn_risk_level == RISK_HIGH),
            medium_risk: Self::count_where(view, |r| r.churn_risk_level == RISK_MEDIUM),
            low_risk: Self::count_where(view, |r| r.churn_risk_level == RISK_LOW),
        }
    }

    fn revenue(view: &FilteredView<'_>) -> Revenue {
        let churned_revenue: f64 = view.iter().filter(|r| r.is_churned()).map(|r| r.cltv).sum();
        let total_revenue: f64 = view.iter().map(|r| r.cltv).sum();

        Revenue {
            churned_revenue,
            total_revenue,
            revenue_at_risk_pct: StatsCalculator::percent(churned_revenue, total_revenue),
            risk_revenue: sum_by_key(view.iter().map(|r| (r.churn_risk_level.as_str(), r.cltv))),
        }
    }

    fn distributions(view: &FilteredView<'_>) -> Distributions {
        Distributions {
            satisfaction_analysis: Self::satisfaction_analysis(view),
            score_distribution: Self::score_distribution(view),
            status_distribution: view
                .iter()
                .map(|r| r.customer_status.as_str())
                .collect::<ValueCounts>()
                .into_descending(),
            quartile_distribution: view
                .iter()
                .map(|r| r.cltv_quartile.as_str())
                .collect::<ValueCounts>()
                .into_descending(),
            risk_satisfaction_crosstab: CrossTab::from_pairs(
                view.iter()
                    .map(|r| (r.churn_risk_level.as_str(), r.satisfaction_level.as_str())),
            ),
            category_counts: view
                .iter()
                .map(|r| r.churn_category.as_str())
                .filter(|c| *c != CATEGORY_NOT_APPLICABLE)
                .collect::<ValueCounts>()
                .into_descending(),
        }
    }

    /// Levels in ascending order with count, mean churn and mean CLTV.
    fn satisfaction_analysis(view: &FilteredView<'_>) -> Vec<SatisfactionRow> {
        #[derive(Default)]
        struct Acc {
            count: usize,
            churn_sum: f64,
            cltv_sum: f64,
        }

        let mut groups: BTreeMap<&str, Acc> = BTreeMap::new();
        for r in view.iter() {
            let acc = groups.entry(r.satisfaction_level.as_str()).or_default();
            acc.count += 1;
            acc.churn_sum += f64::from(r.churn_value);
            acc.cltv_sum += r.cltv;
        }

        groups
            .into_iter()
            .map(|(level, acc)| {
                // count >= 1 for every group present
                let n = acc.count as f64;
                let churn_value = acc.churn_sum / n;
                SatisfactionRow {
                    satisfaction_level: level.to_string(),
                    count: acc.count,
                    churn_value,
                    avg_cltv: acc.cltv_sum / n,
                    churn_rate: churn_value * 100.0,
                }
            })
            .collect()
    }

    fn score_distribution(view: &FilteredView<'_>) -> Vec<ScoreCount> {
        let mut scores: BTreeMap<i64, usize> = BTreeMap::new();
        for r in view.iter() {
            *scores.entry(r.satisfaction_score).or_insert(0) += 1;
        }
        scores
            .into_iter()
            .map(|(score, count)| ScoreCount { score, count })
            .collect()
    }

    /// Most frequent known reasons among churned rows, and the CLTV each one lost.
    fn churn_reasons(view: &FilteredView<'_>, limit: usize) -> Reasons {
        let mut counts = ValueCounts::new();
        let mut revenue: HashMap<&str, f64> = HashMap::new();
        for r in view.iter().filter(|r| r.is_churned()) {
            if let Some(reason) = r.known_churn_reason() {
                counts.add(reason);
                *revenue.entry(reason).or_insert(0.0) += r.cltv;
            }
        }

        let top_churn_reasons = counts.into_top(limit);
        let reason_impact = top_churn_reasons
            .iter()
            .map(|g| ReasonImpact {
                reason: g.key.clone(),
                count: g.count,
                revenue: revenue.get(g.key.as_str()).copied().unwrap_or(0.0),
            })
            .collect();

        Reasons {
            top_churn_reasons,
            reason_impact,
        }
    }
}
