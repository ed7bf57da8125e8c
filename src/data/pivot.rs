//! Pivot Table Module
//! Sum-by-key aggregate over two categorical dimensions.

use crate::data::records::{KeyField, ValueField};
use std::collections::{BTreeMap, BTreeSet};

/// Summed values keyed by (row label, column label).
///
/// Combinations that no row contributed to are absent rather than zero, so a
/// heatmap can tell "no sales" apart from "sales netting to zero".
#[derive(Debug, Clone, PartialEq)]
pub struct PivotTable {
    pub value_field: ValueField,
    pub row_field: KeyField,
    pub column_field: KeyField,
    cells: BTreeMap<String, BTreeMap<String, f64>>,
}

impl PivotTable {
    pub fn new(value_field: ValueField, row_field: KeyField, column_field: KeyField) -> Self {
        Self {
            value_field,
            row_field,
            column_field,
            cells: BTreeMap::new(),
        }
    }

    /// Add `value` to the (row, column) cell, creating it on first use.
    pub fn add(&mut self, row: &str, column: &str, value: f64) {
        *self
            .cells
            .entry(row.to_string())
            .or_default()
            .entry(column.to_string())
            .or_insert(0.0) += value;
    }

    pub fn get(&self, row: &str, column: &str) -> Option<f64> {
        self.cells.get(row)?.get(column).copied()
    }

    /// Row labels in ascending order.
    pub fn row_labels(&self) -> Vec<String> {
        self.cells.keys().cloned().collect()
    }

    /// Union of column labels across all rows, ascending.
    pub fn column_labels(&self) -> Vec<String> {
        self.cells
            .values()
            .flat_map(|row| row.keys().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn row_total(&self, row: &str) -> f64 {
        self.cells
            .get(row)
            .map(|columns| columns.values().sum())
            .unwrap_or(0.0)
    }

    pub fn grand_total(&self) -> f64 {
        self.cells.values().flat_map(|row| row.values()).sum()
    }

    /// Number of present cells.
    pub fn cell_count(&self) -> usize {
        self.cells.values().map(|row| row.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Smallest and largest present cell, `None` for an empty table.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.cells
            .values()
            .flat_map(|row| row.values().copied())
            .fold(None, |range, v| match range {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    pub fn title(&self) -> String {
        format!(
            "{} by {} and {}",
            self.value_field.label(),
            self.row_field.label(),
            self.column_field.label()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> PivotTable {
        let mut pivot = PivotTable::new(ValueField::Sales, KeyField::Category, KeyField::Market);
        pivot.add("Tech", "US", 10.0);
        pivot.add("Tech", "EU", 5.0);
        pivot.add("Office", "US", 2.5);
        pivot.add("Tech", "US", 1.0);
        pivot
    }

    #[test]
    fn duplicates_accumulate() {
        let pivot = table();
        assert_eq!(pivot.get("Tech", "US"), Some(11.0));
        assert_eq!(pivot.get("Tech", "EU"), Some(5.0));
    }

    #[test]
    fn empty_combination_is_absent() {
        let pivot = table();
        assert_eq!(pivot.get("Office", "EU"), None);
        assert_eq!(pivot.get("Furniture", "US"), None);
        assert_eq!(pivot.cell_count(), 3);
    }

    #[test]
    fn labels_are_sorted() {
        let pivot = table();
        assert_eq!(pivot.row_labels(), vec!["Office", "Tech"]);
        assert_eq!(pivot.column_labels(), vec!["EU", "US"]);
    }

    #[test]
    fn totals_and_range() {
        let pivot = table();
        assert_eq!(pivot.row_total("Tech"), 16.0);
        assert_eq!(pivot.row_total("Office"), 2.5);
        assert_eq!(pivot.row_total("Missing"), 0.0);
        assert_eq!(pivot.grand_total(), 18.5);
        assert_eq!(pivot.value_range(), Some((2.5, 11.0)));
        assert_eq!(pivot.title(), "Sales by Category and Market");
    }

    #[test]
    fn empty_table_has_no_range() {
        let pivot = PivotTable::new(ValueField::Sales, KeyField::Category, KeyField::Region);
        assert!(pivot.is_empty());
        assert_eq!(pivot.value_range(), None);
        assert_eq!(pivot.grand_total(), 0.0);
    }
}
