use serde::{Deserialize, Serialize};
use std::fmt;

/// One logical dataset, backed by exactly one named view in the remote store.
///
/// The view names are a fixed contract with the backend and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    Kpis,
    SalesByCategory,
    TopProducts,
    TopCustomers,
    MonthlyTrend,
    OrdersByCountry,
    EmployeePerformance,
    ProductProfitability,
    CustomerOrders,
}

impl Metric {
    pub const ALL: [Metric; 9] = [
        Metric::Kpis,
        Metric::SalesByCategory,
        Metric::TopProducts,
        Metric::TopCustomers,
        Metric::MonthlyTrend,
        Metric::OrdersByCountry,
        Metric::EmployeePerformance,
        Metric::ProductProfitability,
        Metric::CustomerOrders,
    ];

    pub fn view_name(self) -> &'static str {
        match self {
            Metric::Kpis => "nw_dashboard_kpis",
            Metric::SalesByCategory => "nw_sales_by_category",
            Metric::TopProducts => "nw_top_products",
            Metric::TopCustomers => "nw_top_customers",
            Metric::MonthlyTrend => "nw_monthly_revenue_trend",
            Metric::OrdersByCountry => "nw_orders_by_country",
            Metric::EmployeePerformance => "nw_employee_performance",
            Metric::ProductProfitability => "nw_product_profitability",
            Metric::CustomerOrders => "nw_customer_orders",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Metric::Kpis => "KPIs",
            Metric::SalesByCategory => "sales by category",
            Metric::TopProducts => "top products",
            Metric::TopCustomers => "top customers",
            Metric::MonthlyTrend => "monthly trend",
            Metric::OrdersByCountry => "orders by country",
            Metric::EmployeePerformance => "employee performance",
            Metric::ProductProfitability => "product profitability",
            Metric::CustomerOrders => "customer orders",
        }
    }

    /// The KPI view yields exactly one row; everything else is a collection.
    pub fn is_singleton(self) -> bool {
        matches!(self, Metric::Kpis)
    }

    /// Columns a healthy view must expose for its converter to produce
    /// meaningful output.
    pub fn expected_columns(self) -> &'static [&'static str] {
        match self {
            Metric::Kpis => &[
                "total_revenue",
                "total_orders",
                "avg_order_value",
                "total_customers",
                "active_products",
            ],
            Metric::SalesByCategory => &["category_name", "total_revenue", "order_count"],
            Metric::TopProducts => &["product_name", "category_name", "total_revenue"],
            Metric::TopCustomers => &["customer_id", "company_name", "total_revenue"],
            Metric::MonthlyTrend => &["order_month", "revenue", "order_count"],
            Metric::OrdersByCountry => &["country", "order_count", "total_revenue"],
            Metric::EmployeePerformance => &["employee_id", "employee_name", "total_revenue"],
            Metric::ProductProfitability => &["product_name", "category_name", "profit_margin"],
            Metric::CustomerOrders => &["order_id", "customer_id", "order_date"],
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
