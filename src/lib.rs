//! Churn Dashboard - Customer churn analytics over a pre-built CSV
//!
//! Loads the customer table once, filters it by status, satisfaction, risk and
//! CLTV range, and computes the dashboard's metrics and grouped tables.

pub mod app;
pub mod config;
pub mod data;
pub mod insights;
pub mod report;
pub mod stats;

pub use app::{AppError, DashboardApp, DashboardView};
pub use config::DashboardConfig;
