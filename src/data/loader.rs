//! CSV Data Loader Module
//! Reads the churn CSV with Polars once and keeps the typed rows for the process lifetime.

use super::record::*;
use log::{debug, info};
use polars::prelude::*;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("CSV file not found: {0}")]
    NotFound(PathBuf),
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Missing required column '{0}'")]
    MissingColumn(String),
    #[error("Invalid value in row {row}, column '{column}': {reason}")]
    InvalidValue {
        row: usize,
        column: &'static str,
        reason: String,
    },
}

/// The full customer table, read-only once loaded.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<CustomerRecord>,
    columns: Vec<String>,
}

impl Dataset {
    /// Build a dataset from already typed rows (columns default to the required set).
    pub fn from_records(records: Vec<CustomerRecord>) -> Self {
        Self {
            records,
            columns: REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn records(&self) -> &[CustomerRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Column names of the source table, including columns not mapped onto the record.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Observed (min, max) of `cltv`; `None` for an empty dataset.
    pub fn cltv_bounds(&self) -> Option<(f64, f64)> {
        let mut values = self.records.iter().map(|r| r.cltv);
        let first = values.next()?;
        Some(values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }
}

/// Handles CSV file loading with Polars and caches the result.
pub struct DataLoader {
    file_path: PathBuf,
    infer_schema_rows: usize,
    dataset: OnceLock<Dataset>,
}

impl DataLoader {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
            infer_schema_rows: 10_000,
            dataset: OnceLock::new(),
        }
    }

    pub fn with_infer_schema_rows(mut self, rows: usize) -> Self {
        self.infer_schema_rows = rows;
        self
    }

    /// Whether the CSV has already been read.
    pub fn is_loaded(&self) -> bool {
        self.dataset.get().is_some()
    }

    /// Load the dataset. The file is read on the first call only; later calls
    /// hand back the cached table.
    pub fn load(&self) -> Result<&Dataset, LoaderError> {
        if let Some(dataset) = self.dataset.get() {
            return Ok(dataset);
        }

        let dataset = self.read_csv()?;
        info!(
            "Loaded {} records ({} columns) from {}",
            dataset.len(),
            dataset.columns().len(),
            self.file_path.display()
        );
        Ok(self.dataset.get_or_init(|| dataset))
    }

    fn read_csv(&self) -> Result<Dataset, LoaderError> {
        if !self.file_path.exists() {
            return Err(LoaderError::NotFound(self.file_path.clone()));
        }

        // Parse errors must surface, so ignore_errors stays off
        let df = LazyCsvReader::new(&self.file_path)
            .with_has_header(true)
            .with_infer_schema_length(Some(self.infer_schema_rows))
            .with_dtype_overwrite(Some(Arc::new(Self::required_schema())))
            .finish()?
            .collect()?;

        Self::from_dataframe(&df)
    }

    /// Fixed dtypes for the required columns; only extra columns are inferred.
    fn required_schema() -> Schema {
        let mut schema = Schema::default();
        for name in REQUIRED_COLUMNS {
            let dtype = match name {
                COL_SATISFACTION_SCORE | COL_CHURN_VALUE => DataType::Int64,
                COL_CLTV => DataType::Float64,
                _ => DataType::String,
            };
            schema.with_column(name.into(), dtype);
        }
        schema
    }

    /// Convert a DataFrame into typed records, rejecting rows that do not fit the schema.
    pub fn from_dataframe(df: &DataFrame) -> Result<Dataset, LoaderError> {
        for name in REQUIRED_COLUMNS {
            if df.get_column_index(name).is_none() {
                return Err(LoaderError::MissingColumn(name.to_string()));
            }
        }

        let ids = Self::string_column(df, COL_CUSTOMER_ID)?;
        let statuses = Self::string_column(df, COL_CUSTOMER_STATUS)?;
        let scores = Self::int_column(df, COL_SATISFACTION_SCORE)?;
        let levels = Self::string_column(df, COL_SATISFACTION_LEVEL)?;
        let cltvs = Self::float_column(df, COL_CLTV)?;
        let quartiles = Self::string_column(df, COL_CLTV_QUARTILE)?;
        let churn_values = Self::int_column(df, COL_CHURN_VALUE)?;
        let risks = Self::string_column(df, COL_CHURN_RISK_LEVEL)?;
        let categories = Self::string_column(df, COL_CHURN_CATEGORY)?;
        let reasons = Self::string_column(df, COL_CHURN_REASON)?;

        let mut records = Vec::with_capacity(df.height());
        for row in 0..df.height() {
            let satisfaction_score = required(scores[row], row, COL_SATISFACTION_SCORE)?;
            if !(1..=5).contains(&satisfaction_score) {
                return Err(invalid(
                    row,
                    COL_SATISFACTION_SCORE,
                    format!("{satisfaction_score} is outside 1-5"),
                ));
            }

            let cltv = required(cltvs[row], row, COL_CLTV)?;
            if !cltv.is_finite() || cltv < 0.0 {
                return Err(invalid(row, COL_CLTV, format!("{cltv} is not a non-negative amount")));
            }

            let churn_value = match required(churn_values[row], row, COL_CHURN_VALUE)? {
                0 => 0,
                1 => 1,
                other => {
                    return Err(invalid(row, COL_CHURN_VALUE, format!("{other} is not 0 or 1")))
                }
            };

            records.push(CustomerRecord {
                customer_id: required(ids[row].clone(), row, COL_CUSTOMER_ID)?,
                customer_status: required(statuses[row].clone(), row, COL_CUSTOMER_STATUS)?,
                satisfaction_score,
                satisfaction_level: required(levels[row].clone(), row, COL_SATISFACTION_LEVEL)?,
                cltv,
                cltv_quartile: required(quartiles[row].clone(), row, COL_CLTV_QUARTILE)?,
                churn_value,
                churn_risk_level: required(risks[row].clone(), row, COL_CHURN_RISK_LEVEL)?,
                churn_category: required(categories[row].clone(), row, COL_CHURN_CATEGORY)?,
                churn_reason: reasons[row].clone(),
            });
        }

        let columns = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        debug!("Converted {} rows into customer records", records.len());

        Ok(Dataset { records, columns })
    }

    fn string_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>, LoaderError> {
        let column = df.column(name)?.cast(&DataType::String)?;
        let values = column
            .str()?
            .into_iter()
            .map(|v| v.map(|s| s.to_string()))
            .collect();
        Ok(values)
    }

    /// Whole numbers only; a fractional value is rejected instead of truncated.
    fn int_column(df: &DataFrame, name: &'static str) -> Result<Vec<Option<i64>>, LoaderError> {
        let column = df.column(name)?.cast(&DataType::Float64)?;
        column
            .f64()?
            .into_iter()
            .enumerate()
            .map(|(row, value)| match value {
                Some(v) if !v.is_finite() || v.fract() != 0.0 => {
                    Err(invalid(row, name, format!("{v} is not a whole number")))
                }
                other => Ok(other.map(|v| v as i64)),
            })
            .collect()
    }

    fn float_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, LoaderError> {
        let column = df.column(name)?.cast(&DataType::Float64)?;
        let values = column.f64()?.into_iter().collect();
        Ok(values)
    }
}

fn required<T>(value: Option<T>, row: usize, column: &'static str) -> Result<T, LoaderError> {
    value.ok_or_else(|| invalid(row, column, "missing or unparsable value".to_string()))
}

fn invalid(row: usize, column: &'static str, reason: String) -> LoaderError {
    LoaderError::InvalidValue {
        row,
        column,
        reason,
    }
}
