//! Data module - CSV loading, join and pivot aggregation

mod loader;
mod pivot;
mod processor;
mod records;

pub use loader::{DataLoader, LoaderError, SchemaError};
pub use pivot::PivotTable;
pub use processor::{DataProcessor, ProcessorError, TOP_PRODUCT_RENAMES};
pub use records::{JoinedRecord, KeyField, TopProduct, ValueField};
