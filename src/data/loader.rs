//! CSV Data Loader Module
//! Reads the orders, products and top-products files with Polars and
//! extracts typed records, checking the required columns on the way.

use crate::data::records::{OrderRecord, ProductRecord};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// A frame that does not have the shape a dataset needs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("{dataset}: missing required column '{column}'")]
    MissingColumn { dataset: String, column: String },
    #[error("{dataset}: column '{column}' has no value at row {row}")]
    MissingValue {
        dataset: String,
        column: String,
        row: usize,
    },
    #[error("{dataset}: column '{column}' cannot be read as {expected}")]
    WrongType {
        dataset: String,
        column: String,
        expected: &'static str,
    },
}

pub const ORDER_COLUMNS: [&str; 7] = [
    "order_id",
    "product_id",
    "market",
    "region",
    "sales",
    "profit",
    "quantity",
];

pub const PRODUCT_COLUMNS: [&str; 3] = ["product_id", "category", "product_name"];

/// Handles CSV file loading with Polars.
pub struct DataLoader {
    infer_schema_length: usize,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new(10000)
    }
}

impl DataLoader {
    pub fn new(infer_schema_length: usize) -> Self {
        Self {
            infer_schema_length,
        }
    }

    /// Load a CSV file into a DataFrame.
    pub fn load_frame(&self, path: &Path) -> Result<DataFrame, LoaderError> {
        let to_load_error = |source| LoaderError::Load {
            path: path.to_path_buf(),
            source,
        };

        let df = LazyCsvReader::new(path)
            .with_infer_schema_length(Some(self.infer_schema_length))
            .finish()
            .map_err(to_load_error)?
            .collect()
            .map_err(to_load_error)?;

        tracing::debug!(
            "Read {} rows, {} columns from {}",
            df.height(),
            df.width(),
            path.display()
        );
        Ok(df)
    }

    pub fn load_orders(&self, path: &Path) -> Result<Vec<OrderRecord>, LoaderError> {
        let df = self.load_frame(path)?;
        Ok(orders_from_frame(&df)?)
    }

    pub fn load_products(&self, path: &Path) -> Result<Vec<ProductRecord>, LoaderError> {
        let df = self.load_frame(path)?;
        Ok(products_from_frame(&df)?)
    }
}

pub fn orders_from_frame(df: &DataFrame) -> Result<Vec<OrderRecord>, SchemaError> {
    const DATASET: &str = "orders";
    require_columns(df, DATASET, &ORDER_COLUMNS)?;

    let order_ids = text_column(df, DATASET, "order_id")?;
    let product_ids = text_column(df, DATASET, "product_id")?;
    let markets = text_column(df, DATASET, "market")?;
    let regions = text_column(df, DATASET, "region")?;
    let sales = float_column(df, DATASET, "sales")?;
    let profits = float_column(df, DATASET, "profit")?;
    let quantities = int_column(df, DATASET, "quantity")?;

    let orders = order_ids
        .into_iter()
        .zip(product_ids)
        .zip(markets)
        .zip(regions)
        .zip(sales)
        .zip(profits)
        .zip(quantities)
        .map(
            |((((((order_id, product_id), market), region), sales), profit), quantity)| {
                OrderRecord {
                    order_id,
                    product_id,
                    market,
                    region,
                    sales,
                    profit,
                    quantity,
                }
            },
        )
        .collect();

    Ok(orders)
}

pub fn products_from_frame(df: &DataFrame) -> Result<Vec<ProductRecord>, SchemaError> {
    const DATASET: &str = "products";
    require_columns(df, DATASET, &PRODUCT_COLUMNS)?;

    let product_ids = text_column(df, DATASET, "product_id")?;
    let categories = text_column(df, DATASET, "category")?;
    let names = text_column(df, DATASET, "product_name")?;

    Ok(product_ids
        .into_iter()
        .zip(categories)
        .zip(names)
        .map(|((product_id, category), product_name)| ProductRecord {
            product_id,
            category,
            product_name,
        })
        .collect())
}

/// Fail on the first required column the frame lacks.
pub fn require_columns(df: &DataFrame, dataset: &str, columns: &[&str]) -> Result<(), SchemaError> {
    match columns.iter().find(|name| df.column(name).is_err()) {
        Some(missing) => Err(SchemaError::MissingColumn {
            dataset: dataset.to_string(),
            column: missing.to_string(),
        }),
        None => Ok(()),
    }
}

fn typed_column(
    df: &DataFrame,
    dataset: &str,
    name: &str,
    dtype: DataType,
    expected: &'static str,
) -> Result<Series, SchemaError> {
    let column = df.column(name).map_err(|_| SchemaError::MissingColumn {
        dataset: dataset.to_string(),
        column: name.to_string(),
    })?;

    column
        .as_materialized_series()
        .strict_cast(&dtype)
        .map_err(|_| SchemaError::WrongType {
            dataset: dataset.to_string(),
            column: name.to_string(),
            expected,
        })
}

fn missing_value(dataset: &str, column: &str, row: usize) -> SchemaError {
    SchemaError::MissingValue {
        dataset: dataset.to_string(),
        column: column.to_string(),
        row,
    }
}

fn wrong_type(dataset: &str, column: &str, expected: &'static str) -> SchemaError {
    SchemaError::WrongType {
        dataset: dataset.to_string(),
        column: column.to_string(),
        expected,
    }
}

/// Read a column as text. Numeric ids are rendered in their CSV form.
pub fn text_column(df: &DataFrame, dataset: &str, name: &str) -> Result<Vec<String>, SchemaError> {
    let series = typed_column(df, dataset, name, DataType::String, "text")?;
    let ca = series.str().map_err(|_| wrong_type(dataset, name, "text"))?;

    ca.into_iter()
        .enumerate()
        .map(|(row, value)| {
            value
                .map(|s| s.to_string())
                .ok_or_else(|| missing_value(dataset, name, row))
        })
        .collect()
}

pub fn float_column(df: &DataFrame, dataset: &str, name: &str) -> Result<Vec<f64>, SchemaError> {
    let series = typed_column(df, dataset, name, DataType::Float64, "a number")?;
    let ca = series.f64().map_err(|_| wrong_type(dataset, name, "a number"))?;

    ca.into_iter()
        .enumerate()
        .map(|(row, value)| match value {
            Some(v) if !v.is_nan() => Ok(v),
            _ => Err(missing_value(dataset, name, row)),
        })
        .collect()
}

pub fn int_column(df: &DataFrame, dataset: &str, name: &str) -> Result<Vec<i64>, SchemaError> {
    let series = typed_column(df, dataset, name, DataType::Int64, "an integer")?;
    let ca = series.i64().map_err(|_| wrong_type(dataset, name, "an integer"))?;

    ca.into_iter()
        .enumerate()
        .map(|(row, value)| value.ok_or_else(|| missing_value(dataset, name, row)))
        .collect()
}
