//! Customer Record Module
//! Strongly typed row of the churn dataset.

use serde::{Deserialize, Serialize};

pub const COL_CUSTOMER_ID: &str = "customer_id";
pub const COL_CUSTOMER_STATUS: &str = "customer_status";
pub const COL_SATISFACTION_SCORE: &str = "satisfaction_score";
pub const COL_SATISFACTION_LEVEL: &str = "satisfaction_level";
pub const COL_CLTV: &str = "cltv";
pub const COL_CLTV_QUARTILE: &str = "cltv_quartile";
pub const COL_CHURN_VALUE: &str = "churn_value";
pub const COL_CHURN_RISK_LEVEL: &str = "churn_risk_level";
pub const COL_CHURN_CATEGORY: &str = "churn_category";
pub const COL_CHURN_REASON: &str = "churn_reason";

/// Columns the source CSV must carry (extra columns are allowed).
pub const REQUIRED_COLUMNS: [&str; 10] = [
    COL_CUSTOMER_ID,
    COL_CUSTOMER_STATUS,
    COL_SATISFACTION_SCORE,
    COL_SATISFACTION_LEVEL,
    COL_CLTV,
    COL_CLTV_QUARTILE,
    COL_CHURN_VALUE,
    COL_CHURN_RISK_LEVEL,
    COL_CHURN_CATEGORY,
    COL_CHURN_REASON,
];

// customer_status values
pub const STATUS_CHURNED: &str = "Churned";
pub const STATUS_STAYED: &str = "Stayed";
pub const STATUS_JOINED: &str = "Joined";

// churn_risk_level values
pub const RISK_CRITICAL: &str = "Critical Risk";
pub const RISK_HIGH: &str = "High Risk";
pub const RISK_MEDIUM: &str = "Medium Risk";
pub const RISK_LOW: &str = "Low Risk";

/// churn_category value carried by customers that did not churn.
pub const CATEGORY_NOT_APPLICABLE: &str = "Not Applicable";

/// churn_reason sentinel for "no reason recorded".
pub const REASON_UNKNOWN: &str = "Unknown";

/// One customer row. Categorical columns keep the string found in the CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub customer_id: String,
    pub customer_status: String,
    pub satisfaction_score: i64,
    pub satisfaction_level: String,
    pub cltv: f64,
    pub cltv_quartile: String,
    pub churn_value: u8,
    pub churn_risk_level: String,
    pub churn_category: String,
    pub churn_reason: Option<String>,
}

impl CustomerRecord {
    pub fn is_churned(&self) -> bool {
        self.customer_status == STATUS_CHURNED
    }

    /// Reason usable for churn-driver analysis: present and not "Unknown".
    pub fn known_churn_reason(&self) -> Option<&str> {
        self.churn_reason
            .as_deref()
            .filter(|reason| *reason != REASON_UNKNOWN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(status: &str, reason: Option<&str>) -> CustomerRecord {
        CustomerRecord {
            customer_id: "c-1".into(),
            customer_status: status.into(),
            satisfaction_score: 3,
            satisfaction_level: "Medium".into(),
            cltv: 1000.0,
            cltv_quartile: "Q2".into(),
            churn_value: u8::from(status == STATUS_CHURNED),
            churn_risk_level: RISK_LOW.into(),
            churn_category: CATEGORY_NOT_APPLICABLE.into(),
            churn_reason: reason.map(str::to_string),
        }
    }

    #[test]
    fn unknown_and_missing_reasons_are_not_known() {
        assert_eq!(record(STATUS_CHURNED, None).known_churn_reason(), None);
        assert_eq!(
            record(STATUS_CHURNED, Some(REASON_UNKNOWN)).known_churn_reason(),
            None
        );
        assert_eq!(
            record(STATUS_CHURNED, Some("Price too high")).known_churn_reason(),
            Some("Price too high")
        );
    }

    #[test]
    fn status_match_is_case_sensitive() {
        assert!(record("Churned", None).is_churned());
        assert!(!record("churned", None).is_churned());
    }
}
