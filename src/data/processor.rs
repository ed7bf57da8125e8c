//! Data Processor Module
//! Inner join of orders with products, pivot aggregation and field relabelling.

use crate::data::loader::{float_column, require_columns, text_column, SchemaError};
use crate::data::pivot::PivotTable;
use crate::data::records::{
    JoinedRecord, KeyField, OrderRecord, ProductRecord, TopProduct, ValueField,
};
use polars::prelude::*;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Field not found: '{field}'")]
    FieldNotFound { field: String },
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Renames applied to the top-five summary for display.
pub const TOP_PRODUCT_RENAMES: [(&str, &str); 2] = [
    ("product_total_sales", "Total Sales"),
    ("category", "Category"),
];

/// Handles the join, aggregation and relabelling steps.
pub struct DataProcessor;

impl DataProcessor {
    /// Inner join on product id.
    ///
    /// Orders with no matching product are dropped. An order matching several
    /// products yields one row per match. Output follows the order sequence.
    pub fn inner_join(orders: &[OrderRecord], products: &[ProductRecord]) -> Vec<JoinedRecord> {
        let mut by_id: HashMap<&str, Vec<&ProductRecord>> = HashMap::new();
        for product in products {
            by_id.entry(product.product_id.as_str()).or_default().push(product);
        }

        let joined: Vec<JoinedRecord> = orders
            .iter()
            .flat_map(|order| {
                by_id
                    .get(order.product_id.as_str())
                    .into_iter()
                    .flatten()
                    .map(move |product| JoinedRecord::new(order, product))
            })
            .collect();

        let unmatched = orders
            .iter()
            .filter(|order| !by_id.contains_key(order.product_id.as_str()))
            .count();
        tracing::debug!(
            "Joined {} orders with {} products: {} rows, {} orders without a product",
            orders.len(),
            products.len(),
            joined.len(),
            unmatched
        );

        joined
    }

    /// Sum `value` over every (row_key, column_key) pair of the joined rows.
    pub fn pivot_sum(
        rows: &[JoinedRecord],
        value: ValueField,
        row_key: KeyField,
        column_key: KeyField,
    ) -> PivotTable {
        let pivot = rows.iter().fold(
            PivotTable::new(value, row_key, column_key),
            |mut pivot, row| {
                pivot.add(row.key(row_key), row.key(column_key), row.value(value));
                pivot
            },
        );

        tracing::debug!(
            "{}: {} rows x {} columns, {} cells",
            pivot.title(),
            pivot.row_labels().len(),
            pivot.column_labels().len(),
            pivot.cell_count()
        );
        pivot
    }

    /// Rename fields for display. Every source field must exist.
    pub fn relabel(mut df: DataFrame, renames: &[(&str, &str)]) -> Result<DataFrame, ProcessorError> {
        for (from, to) in renames {
            if df.column(from).is_err() {
                return Err(ProcessorError::FieldNotFound {
                    field: from.to_string(),
                });
            }
            df.rename(from, (*to).into())?;
        }
        Ok(df)
    }

    /// Typed rows from the relabelled top-five summary.
    pub fn top_products(df: &DataFrame) -> Result<Vec<TopProduct>, ProcessorError> {
        const DATASET: &str = "top products";
        require_columns(
            df,
            DATASET,
            &["Category", "product_name", "product_total_profit", "Total Sales"],
        )?;

        let categories = text_column(df, DATASET, "Category")?;
        let names = text_column(df, DATASET, "product_name")?;
        let profits = float_column(df, DATASET, "product_total_profit")?;
        let sales = float_column(df, DATASET, "Total Sales")?;

        Ok(categories
            .into_iter()
            .zip(names)
            .zip(profits)
            .zip(sales)
            .map(|(((category, product_name), total_profit), total_sales)| TopProduct {
                category,
                product_name,
                total_profit,
                total_sales,
            })
            .collect())
    }
}
