//! Sales Analysis Module
//! Runs load → join → aggregate and keeps everything the charts draw from.

use crate::config::Settings;
use crate::data::{
    DataLoader, DataProcessor, JoinedRecord, KeyField, LoaderError, PivotTable, ProcessorError,
    TopProduct, ValueField, TOP_PRODUCT_RENAMES,
};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error(transparent)]
    Loader(#[from] LoaderError),
    #[error(transparent)]
    Processor(#[from] ProcessorError),
}

/// Chart inputs derived from the three datasets.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesAnalysis {
    pub joined: Vec<JoinedRecord>,
    pub sales_by_market: PivotTable,
    pub sales_by_region: PivotTable,
    pub top_products: Vec<TopProduct>,
}

impl SalesAnalysis {
    pub fn build(settings: &Settings) -> Result<Self, AnalysisError> {
        let loader = DataLoader::new(settings.infer_schema_length);

        let orders = loader.load_orders(&settings.orders_path)?;
        let products = loader.load_products(&settings.products_path)?;
        info!("Loaded {} orders and {} products", orders.len(), products.len());

        let joined = DataProcessor::inner_join(&orders, &products);
        info!("Joined {} rows from {} orders", joined.len(), orders.len());

        let sales_by_market =
            DataProcessor::pivot_sum(&joined, ValueField::Sales, KeyField::Category, KeyField::Market);
        let sales_by_region =
            DataProcessor::pivot_sum(&joined, ValueField::Sales, KeyField::Category, KeyField::Region);
        for category in sales_by_market.row_labels() {
            debug!(
                "{}: total sales {:.2}",
                category,
                sales_by_market.row_total(&category)
            );
        }
        info!("Total sales {:.2}", sales_by_market.grand_total());

        let summary = loader.load_frame(&settings.top_products_path)?;
        let summary = DataProcessor::relabel(summary, &TOP_PRODUCT_RENAMES)?;
        let top_products = DataProcessor::top_products(&summary)?;
        info!("Loaded {} top products", top_products.len());

        Ok(Self {
            joined,
            sales_by_market,
            sales_by_region,
            top_products,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SchemaError;
    use std::fs;
    use tempfile::TempDir;

    const ORDERS: &str = "\
order_id,product_id,market,region,sales,profit,quantity
1,A,US,East,100,10,2
2,B,US,East,50,5,1
3,A,EU,North,40,-2,4
4,C,EU,North,25,3,1
5,C,US,West,12.5,1.5,3
";

    const PRODUCTS: &str = "\
product_id,category,product_name
A,X,Alpha
C,Y,Gamma
";

    const TOP_FIVE: &str = "\
category,product_name,product_total_sales,product_total_profit
X,Alpha,140,8
Y,Gamma,37.5,4.5
";

    fn fixture(products: &str) -> (TempDir, Settings) {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("orders.csv"), ORDERS).unwrap();
        fs::write(dir.path().join("products.csv"), products).unwrap();
        fs::write(dir.path().join("top.csv"), TOP_FIVE).unwrap();

        let settings = Settings {
            orders_path: dir.path().join("orders.csv"),
            products_path: dir.path().join("products.csv"),
            top_products_path: dir.path().join("top.csv"),
            output_dir: Some(dir.path().join("charts")),
            open_charts: false,
            ..Settings::default()
        };
        (dir, settings)
    }

    #[test]
    fn builds_pivots_from_files() {
        let (_dir, settings) = fixture(PRODUCTS);
        let analysis = SalesAnalysis::build(&settings).unwrap();

        assert_eq!(analysis.joined.len(), 4);
        assert!(analysis.joined.iter().all(|r| r.product_id != "B"));

        let market = &analysis.sales_by_market;
        assert_eq!(market.get("X", "US"), Some(100.0));
        assert_eq!(market.get("X", "EU"), Some(40.0));
        assert_eq!(market.get("Y", "EU"), Some(25.0));
        assert_eq!(market.get("Y", "US"), Some(12.5));
        assert_eq!(market.row_total("X"), 140.0);

        let region = &analysis.sales_by_region;
        assert_eq!(region.get("X", "East"), Some(100.0));
        assert_eq!(region.get("X", "West"), None);
        assert_eq!(region.get("Y", "West"), Some(12.5));
        assert_eq!(region.grand_total(), market.grand_total());

        assert_eq!(analysis.top_products.len(), 2);
        assert_eq!(analysis.top_products[0].category, "X");
        assert_eq!(analysis.top_products[0].total_sales, 140.0);
    }

    #[test]
    fn repeated_runs_are_identical() {
        let (_dir, settings) = fixture(PRODUCTS);
        let first = SalesAnalysis::build(&settings).unwrap();
        let second = SalesAnalysis::build(&settings).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn products_without_category_fail() {
        let (_dir, settings) = fixture("product_id,product_name\nA,Alpha\n");
        let err = SalesAnalysis::build(&settings).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::Loader(LoaderError::Schema(SchemaError::MissingColumn { ref column, .. }))
                if column == "category"
        ));
        assert!(!settings.chart_dir().exists());
    }
}
