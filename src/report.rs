//! Text Report Module
//! Renders a dashboard view as plain text, one section per dashboard panel.

use crate::app::DashboardView;
use crate::stats::GroupCount;
use std::fmt::Write;

pub const NO_CATEGORY_DATA: &str = "No churn category data available for current filters";
pub const NO_REASON_DATA: &str = "No churn reason data available for current filters";

pub struct TextReport;

impl TextReport {
    pub fn render(view: &DashboardView) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail
        let _ = Self::write_all(&mut out, view);
        out
    }

    fn write_all(out: &mut String, view: &DashboardView) -> std::fmt::Result {
        let m = &view.metrics;

        writeln!(out, "== Risk Alert System ==")?;
        writeln!(out, "  CRITICAL RISK  {:>8}  Emergency Action", m.critical_risk)?;
        writeln!(out, "  HIGH RISK      {:>8}  Immediate Action", m.high_risk)?;
        writeln!(out, "  MEDIUM RISK    {:>8}  Monitor Closely", m.medium_risk)?;
        writeln!(out, "  LOW RISK       {:>8}  Stable", m.low_risk)?;

        writeln!(out, "\n== Key Metrics ==")?;
        writeln!(out, "  Total Customers     {}", thousands(m.total as f64))?;
        writeln!(out, "  Churned Customers   {}", thousands(m.churned as f64))?;
        writeln!(out, "  Retained Customers  {}", thousands(m.stayed as f64))?;
        writeln!(out, "  Joined Customers    {}", thousands(m.joined as f64))?;
        writeln!(out, "  Churn Rate          {:.1}%", m.churn_rate)?;
        writeln!(out, "  Average CLTV        ${}", thousands(m.avg_cltv))?;

        writeln!(out, "\n== Revenue Impact Analysis ==")?;
        writeln!(out, "  Revenue at Risk     {:.1}%", m.revenue_at_risk_pct)?;
        writeln!(out, "  Churned Revenue     ${}", thousands(m.churned_revenue))?;
        writeln!(out, "  Total Revenue       ${}", thousands(m.total_revenue))?;
        for g in &m.risk_revenue {
            writeln!(out, "  {:<18}  ${}", g.key, thousands(g.total))?;
        }

        writeln!(out, "\n== Satisfaction Analysis ==")?;
        for row in &m.satisfaction_analysis {
            writeln!(
                out,
                "  {:<10} count {:>6}  churn {:>5.1}%  avg CLTV ${}",
                row.satisfaction_level,
                row.count,
                row.churn_rate,
                thousands(row.avg_cltv)
            )?;
        }
        writeln!(out, "  Score distribution:")?;
        for s in &m.score_distribution {
            writeln!(out, "    {} -> {}", s.score, s.count)?;
        }

        writeln!(out, "\n== Customer Analysis ==")?;
        Self::write_counts(out, "Status", &m.status_distribution)?;
        Self::write_counts(out, "CLTV Quartile", &m.quartile_distribution)?;

        let tab = &m.risk_satisfaction_crosstab;
        writeln!(out, "  Risk Level vs Satisfaction Level:")?;
        if tab.is_empty() {
            writeln!(out, "    (no data)")?;
        } else {
            writeln!(out, "    {:<14}{}", "", tab.columns.join(" | "))?;
            for (row, counts) in tab.rows.iter().zip(&tab.counts) {
                let cells: Vec<String> = counts.iter().map(|c| c.to_string()).collect();
                writeln!(out, "    {:<14}{}", row, cells.join(" | "))?;
            }
        }

        writeln!(out, "  Churn Categories:")?;
        if m.category_counts.is_empty() {
            writeln!(out, "    {NO_CATEGORY_DATA}")?;
        } else {
            for g in &m.category_counts {
                writeln!(out, "    {:<20} {}", g.key, g.count)?;
            }
        }

        writeln!(out, "\n== Action Priority Analysis ==")?;
        if m.reason_impact.is_empty() {
            writeln!(out, "  {NO_REASON_DATA}")?;
        } else {
            for r in &m.reason_impact {
                writeln!(
                    out,
                    "  {:>5}  ${:>12}  {}",
                    r.count,
                    thousands(r.revenue),
                    r.reason
                )?;
            }
        }

        let a = &view.actions;
        writeln!(out, "\n== Actionable Insights ==")?;
        writeln!(out, "  Contact {} critical-risk customers within 12 hours", a.contact_within_12h)?;
        writeln!(out, "  Contact {} high-risk customers within 24 hours", a.contact_within_24h)?;
        writeln!(out, "  Monitor {} medium-risk customers weekly", a.monitor_weekly)?;
        writeln!(out, "  Revenue at risk: ${}", thousands(a.revenue_at_risk))?;
        writeln!(
            out,
            "  Average recovery value: ${} per customer",
            thousands(a.avg_recovery_value)
        )?;
        writeln!(out, "  Critical + high risk customers: {}", a.critical_and_high)?;

        let s = &view.summary;
        writeln!(out, "\n== Data Explorer ==")?;
        writeln!(out, "  Total Records      {}", thousands(s.total_records as f64))?;
        writeln!(out, "  Filtered Records   {}", thousands(s.filtered_records as f64))?;
        writeln!(out, "  Total Columns      {}", s.total_columns)?;
        writeln!(out, "  Filter Efficiency  {:.1}%", s.filter_efficiency)?;
        writeln!(
            out,
            "  CLTV median ${}  p05 ${}  p95 ${}",
            thousands(s.cltv.median),
            thousands(s.cltv.p05),
            thousands(s.cltv.p95)
        )?;
        for r in &s.sample {
            writeln!(
                out,
                "    {:<12} {:<8} {:<10} {:<14} ${}",
                r.customer_id,
                r.customer_status,
                r.satisfaction_level,
                r.churn_risk_level,
                thousands(r.cltv)
            )?;
        }

        Ok(())
    }

    fn write_counts(out: &mut String, title: &str, counts: &[GroupCount]) -> std::fmt::Result {
        writeln!(out, "  {title}:")?;
        if counts.is_empty() {
            writeln!(out, "    (no data)")?;
        }
        for g in counts {
            writeln!(out, "    {:<20} {}", g.key, g.count)?;
        }
        Ok(())
    }
}

/// Rounded to whole units with comma separators, e.g. `12,345`.
pub fn thousands(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0.0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::DashboardApp;
    use crate::config::DashboardConfig;
    use crate::data::record::*;
    use crate::data::{CustomerRecord, Dataset, FilterSelection};

    fn record(id: &str, status: &str, cltv: f64, reason: Option<&str>) -> CustomerRecord {
        CustomerRecord {
            customer_id: id.into(),
            customer_status: status.into(),
            satisfaction_score: 2,
            satisfaction_level: "Low".into(),
            cltv,
            cltv_quartile: "Q2".into(),
            churn_value: u8::from(status == STATUS_CHURNED),
            churn_risk_level: RISK_HIGH.into(),
            churn_category: if status == STATUS_CHURNED { "Price".into() } else { CATEGORY_NOT_APPLICABLE.into() },
            churn_reason: reason.map(str::to_string),
        }
    }

    #[test]
    fn thousands_groups_digits() {
        assert_eq!(thousands(0.0), "0");
        assert_eq!(thousands(999.4), "999");
        assert_eq!(thousands(1234.5), "1,235");
        assert_eq!(thousands(1_234_567.0), "1,234,567");
        assert_eq!(thousands(-4200.0), "-4,200");
    }

    #[test]
    fn report_lists_reasons() {
        let ds = Dataset::from_records(vec![
            record("1", STATUS_CHURNED, 4200.0, Some("Price too high")),
            record("2", STATUS_STAYED, 1800.0, None),
        ]);
        let config = DashboardConfig::default();
        let view = DashboardApp::build_view(&ds, &FilterSelection::for_dataset(&ds), &config);

        let text = TextReport::render(&view);
        assert!(text.contains("Churn Rate          50.0%"));
        assert!(text.contains("Price too high"));
        assert!(text.contains("$4,200"));
        assert!(!text.contains(NO_REASON_DATA));
    }

    #[test]
    fn empty_view_shows_placeholders() {
        let ds = Dataset::from_records(vec![record("1", STATUS_STAYED, 1800.0, None)]);
        let config = DashboardConfig::default();
        let selection = FilterSelection::for_dataset(&ds).with_status(STATUS_CHURNED);
        let view = DashboardApp::build_view(&ds, &selection, &config);

        let text = TextReport::render(&view);
        assert!(text.contains(NO_CATEGORY_DATA));
        assert!(text.contains(NO_REASON_DATA));
        assert!(text.contains("Churn Rate          0.0%"));
    }
}
