//! Data module - CSV loading, typed records and filtering

mod filter;
mod loader;
mod options;
pub mod record;

pub use filter::{CltvRange, Constraint, FilterEngine, FilterSelection, FilteredView, Selector, ALL};
pub use loader::{DataLoader, Dataset, LoaderError};
pub use options::FilterOptions;
pub use record::CustomerRecord;
