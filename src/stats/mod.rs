//! Stats module - Metric aggregation and descriptive statistics

mod aggregator;
mod calculator;
mod tables;

pub use aggregator::{
    AggregateResult, Aggregator, ReasonImpact, SatisfactionRow, ScoreCount, DEFAULT_TOP_REASONS,
};
pub use calculator::{StatsCalculator, ValueSummary};
pub use tables::{CrossTab, GroupCount, GroupSum, ValueCounts};
