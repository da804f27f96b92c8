//! View-model types shared by the data-access layer, the computation helpers
//! and every dashboard consumer.
//!
//! The structs here are the stable shapes widgets render. They are produced
//! from the raw rows in [`raw`] by the functions in [`converters`] and are
//! never mutated after being handed to a consumer.

pub mod converters;
pub mod filters;
pub mod raw;

mod metric;

pub use converters::{ASSUMED_PROFIT_MARGIN, assumed_margin_percent, derive_profit};
pub use filters::{DateRange, FilterKind, FilterParams, FilterSelection};
pub use metric::Metric;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ===================== Overview =====================

/// Headline figures for the overview page. One per query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DashboardKpis {
    pub total_revenue: Decimal,
    /// Reported by the view when available, otherwise derived from revenue.
    pub total_profit: Decimal,
    pub total_orders: u64,
    pub average_order_value: Decimal,
    pub total_customers: u64,
    pub total_products: u64,
    /// Percentage, e.g. `30.0`.
    pub profit_margin: Decimal,
    pub top_category: String,
}

/// Revenue and profit for one product category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SalesByCategory {
    pub category_name: String,
    pub total_revenue: Decimal,
    pub total_profit: Decimal,
    pub order_count: u64,
    pub profit_margin: Decimal,
}

/// One calendar month of the revenue time series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct MonthlyRevenueTrend {
    pub order_month: String,
    pub monthly_revenue: Decimal,
    pub monthly_profit: Decimal,
    pub order_count: u64,
    /// Cumulative revenue up to and including this month.
    pub running_total: Decimal,
}

// ===================== Rankings =====================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct TopProduct {
    pub product_name: String,
    pub category_name: String,
    pub total_revenue: Decimal,
    pub total_quantity: u64,
    pub order_count: u64,
    pub average_unit_price: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct TopCustomer {
    pub customer_id: String,
    pub company_name: String,
    pub contact_name: String,
    pub country: String,
    pub total_revenue: Decimal,
    pub order_count: u64,
    pub average_order_value: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct EmployeePerformance {
    pub employee_id: i64,
    pub employee_name: String,
    pub title: String,
    pub total_revenue: Decimal,
    pub order_count: u64,
    pub average_order_value: Decimal,
    pub customers_served: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ProductProfitability {
    pub product_name: String,
    pub category_name: String,
    pub units_sold: u64,
    pub revenue: Decimal,
    pub total_discount: Decimal,
    pub profit_margin: Decimal,
}

// ===================== Geography & orders =====================

/// Orders shipped to one country. Unordered; sort at the call site.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct OrdersByCountry {
    pub country: String,
    pub order_count: u64,
    pub total_revenue: Decimal,
    pub customer_count: u64,
    pub average_order_value: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CustomerOrder {
    pub order_id: i64,
    pub customer_id: String,
    pub company_name: String,
    pub order_date: String,
    pub shipped_date: String,
    pub ship_country: String,
    pub product_count: u64,
    pub total_amount: Decimal,
}

// ===================== Aggregate =====================

/// Everything the overview page needs, loaded together.
///
/// Singleton and ranked metrics stay `None` when their fetch failed; the
/// monthly trend falls back to an empty series instead.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DashboardData {
    pub kpis: Option<DashboardKpis>,
    pub sales_by_category: Option<Vec<SalesByCategory>>,
    pub top_products: Option<Vec<TopProduct>>,
    pub top_customers: Option<Vec<TopCustomer>>,
    pub monthly_trend: Vec<MonthlyRevenueTrend>,
}
