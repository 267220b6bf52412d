//! Dashboard Application
//! Owns the configuration and the lazily loaded dataset; runs filter -> aggregate per request.

use crate::config::DashboardConfig;
use crate::data::{DataLoader, Dataset, FilterEngine, FilterOptions, FilterSelection, LoaderError};
use crate::insights::{ActionPlan, DatasetSummary};
use crate::stats::{AggregateResult, Aggregator};
use log::info;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Dataset unavailable: {0}")]
    Load(#[from] LoaderError),
}

/// Everything one render cycle produces.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub selection: FilterSelection,
    pub metrics: AggregateResult,
    pub actions: ActionPlan,
    pub summary: DatasetSummary,
}

/// Process-wide context. The dataset is read once and shared by reference.
pub struct DashboardApp {
    config: DashboardConfig,
    loader: DataLoader,
}

impl DashboardApp {
    pub fn new(config: DashboardConfig) -> Self {
        let loader = DataLoader::new(config.csv_path.clone())
            .with_infer_schema_rows(config.infer_schema_rows);
        Self { config, loader }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Cached dataset; the first call reads the CSV.
    pub fn dataset(&self) -> Result<&Dataset, AppError> {
        Ok(self.loader.load()?)
    }

    pub fn filter_options(&self) -> Result<FilterOptions, AppError> {
        Ok(FilterOptions::from_dataset(self.dataset()?))
    }

    /// Selection with no constraint beyond the dataset's CLTV bounds.
    pub fn default_selection(&self) -> Result<FilterSelection, AppError> {
        Ok(FilterSelection::for_dataset(self.dataset()?))
    }

    /// Recompute the whole dashboard for `selection`.
    pub fn render(&self, selection: &FilterSelection) -> Result<DashboardView, AppError> {
        let dataset = self.dataset()?;
        Ok(Self::build_view(dataset, selection, &self.config))
    }

    /// Filter and aggregate an already loaded dataset.
    pub fn build_view(
        dataset: &Dataset,
        selection: &FilterSelection,
        config: &DashboardConfig,
    ) -> DashboardView {
        let view = FilterEngine::apply(dataset, selection);
        let metrics = Aggregator::aggregate_with_limit(&view, config.top_reasons);
        let actions = ActionPlan::from_aggregates(&metrics);
        let summary = DatasetSummary::new(dataset, &view, config.sample_rows);
        info!(
            "Rendered dashboard: {} of {} customers, churn rate {:.1}%",
            metrics.total,
            dataset.len(),
            metrics.churn_rate
        );

        DashboardView {
            selection: selection.clone(),
            metrics,
            actions,
            summary,
        }
    }
}
