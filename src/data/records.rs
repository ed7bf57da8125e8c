//! Typed rows for the orders, products and top-products datasets.

/// One row of `orders.csv`.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRecord {
    pub order_id: String,
    pub product_id: String,
    pub market: String,
    pub region: String,
    pub sales: f64,
    pub profit: f64,
    pub quantity: i64,
}

/// One row of `products.csv`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRecord {
    pub product_id: String,
    pub category: String,
    pub product_name: String,
}

/// An order enriched with its product's category and name.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedRecord {
    pub order_id: String,
    pub product_id: String,
    pub market: String,
    pub region: String,
    pub sales: f64,
    pub profit: f64,
    pub quantity: i64,
    pub category: String,
    pub product_name: String,
}

impl JoinedRecord {
    pub fn new(order: &OrderRecord, product: &ProductRecord) -> Self {
        Self {
            order_id: order.order_id.clone(),
            product_id: order.product_id.clone(),
            market: order.market.clone(),
            region: order.region.clone(),
            sales: order.sales,
            profit: order.profit,
            quantity: order.quantity,
            category: product.category.clone(),
            product_name: product.product_name.clone(),
        }
    }

    pub fn key(&self, field: KeyField) -> &str {
        match field {
            KeyField::OrderId => &self.order_id,
            KeyField::ProductId => &self.product_id,
            KeyField::Market => &self.market,
            KeyField::Region => &self.region,
            KeyField::Category => &self.category,
            KeyField::ProductName => &self.product_name,
        }
    }

    pub fn value(&self, field: ValueField) -> f64 {
        match field {
            ValueField::Sales => self.sales,
            ValueField::Profit => self.profit,
            ValueField::Quantity => self.quantity as f64,
        }
    }
}

/// Categorical fields of a joined row usable as pivot keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyField {
    OrderId,
    ProductId,
    Market,
    Region,
    Category,
    ProductName,
}

impl KeyField {
    /// Display label used on chart axes.
    pub fn label(self) -> &'static str {
        match self {
            KeyField::OrderId => "Order",
            KeyField::ProductId => "Product Id",
            KeyField::Market => "Market",
            KeyField::Region => "Region",
            KeyField::Category => "Category",
            KeyField::ProductName => "Product Name",
        }
    }
}

/// Numeric fields of a joined row that can be summed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueField {
    Sales,
    Profit,
    Quantity,
}

impl ValueField {
    pub fn label(self) -> &'static str {
        match self {
            ValueField::Sales => "Sales",
            ValueField::Profit => "Profit",
            ValueField::Quantity => "Quantity",
        }
    }
}

/// One row of the relabelled top-five-products summary.
#[derive(Debug, Clone, PartialEq)]
pub struct TopProduct {
    pub category: String,
    pub product_name: String,
    pub total_profit: f64,
    pub total_sales: f64,
}
