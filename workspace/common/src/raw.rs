//! Row shapes as the backend views currently return them.
//!
//! Every column is optional: a missing column and an explicit `null` both
//! deserialize to `None`, and the converters substitute the documented
//! default. Legacy column names are accepted through serde aliases.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// `nw_dashboard_kpis`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KpiRow {
    pub total_orders: Option<Decimal>,
    pub total_customers: Option<Decimal>,
    pub active_products: Option<Decimal>,
    pub total_revenue: Option<Decimal>,
    #[serde(alias = "average_order_value")]
    pub avg_order_value: Option<Decimal>,
    pub total_employees: Option<Decimal>,
    pub total_profit: Option<Decimal>,
    pub profit_margin: Option<Decimal>,
    pub top_category: Option<String>,
}

/// `nw_sales_by_category`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategorySalesRow {
    pub category_id: Option<i64>,
    pub category_name: Option<String>,
    pub order_count: Option<Decimal>,
    pub units_sold: Option<Decimal>,
    pub total_revenue: Option<Decimal>,
    pub avg_sale_value: Option<Decimal>,
    pub total_profit: Option<Decimal>,
    pub profit_margin: Option<Decimal>,
}

/// `nw_monthly_revenue_trend`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonthlyTrendRow {
    pub order_month: Option<String>,
    pub order_count: Option<Decimal>,
    pub unique_customers: Option<Decimal>,
    #[serde(alias = "monthly_revenue")]
    pub revenue: Option<Decimal>,
    pub avg_order_value: Option<Decimal>,
    #[serde(alias = "monthly_profit")]
    pub profit: Option<Decimal>,
}

/// `nw_top_products`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopProductRow {
    pub product_name: Option<String>,
    pub category_name: Option<String>,
    pub total_revenue: Option<Decimal>,
    #[serde(alias = "units_sold")]
    pub total_quantity: Option<Decimal>,
    pub order_count: Option<Decimal>,
    #[serde(alias = "avg_unit_price")]
    pub average_unit_price: Option<Decimal>,
}

/// `nw_top_customers`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopCustomerRow {
    pub customer_id: Option<String>,
    pub company_name: Option<String>,
    pub contact_name: Option<String>,
    pub country: Option<String>,
    pub total_revenue: Option<Decimal>,
    pub order_count: Option<Decimal>,
    #[serde(alias = "avg_order_value")]
    pub average_order_value: Option<Decimal>,
}

/// `nw_orders_by_country`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CountryOrdersRow {
    pub country: Option<String>,
    pub order_count: Option<Decimal>,
    pub total_revenue: Option<Decimal>,
    pub customer_count: Option<Decimal>,
    #[serde(alias = "avg_order_value")]
    pub average_order_value: Option<Decimal>,
}

/// `nw_employee_performance`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmployeeRow {
    pub employee_id: Option<i64>,
    pub employee_name: Option<String>,
    pub title: Option<String>,
    pub total_revenue: Option<Decimal>,
    pub order_count: Option<Decimal>,
    #[serde(alias = "avg_order_value")]
    pub average_order_value: Option<Decimal>,
    pub customers_served: Option<Decimal>,
}

/// `nw_product_profitability`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfitabilityRow {
    pub product_name: Option<String>,
    pub category_name: Option<String>,
    pub units_sold: Option<Decimal>,
    pub revenue: Option<Decimal>,
    pub total_discount: Option<Decimal>,
    pub profit_margin: Option<Decimal>,
}

/// `nw_customer_orders`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomerOrderRow {
    pub order_id: Option<i64>,
    pub customer_id: Option<String>,
    pub company_name: Option<String>,
    pub order_date: Option<String>,
    pub shipped_date: Option<String>,
    pub ship_country: Option<String>,
    pub product_count: Option<Decimal>,
    pub total_amount: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_and_null_columns_deserialize_to_none() {
        let row: KpiRow =
            serde_json::from_str(r#"{"total_revenue": 1000, "total_orders": null}"#).unwrap();
        assert_eq!(row.total_revenue, Some(Decimal::from(1000)));
        assert_eq!(row.total_orders, None);
        assert_eq!(row.active_products, None);
    }

    #[test]
    fn test_numeric_strings_are_accepted() {
        let row: TopProductRow =
            serde_json::from_str(r#"{"product_name": "Chai", "total_revenue": "1234.50"}"#).unwrap();
        assert_eq!(row.total_revenue, Some(Decimal::new(123450, 2)));
    }

    #[test]
    fn test_legacy_aliases() {
        let row: TopProductRow =
            serde_json::from_str(r#"{"units_sold": 12, "avg_unit_price": 18.5}"#).unwrap();
        assert_eq!(row.total_quantity, Some(Decimal::from(12)));
        assert_eq!(row.average_unit_price, Some(Decimal::new(185, 1)));
    }

    #[test]
    fn test_wrong_type_is_rejected() {
        let result: Result<MonthlyTrendRow, _> =
            serde_json::from_str(r#"{"order_month": "1997-01-01", "revenue": {"nested": true}}"#);
        assert!(result.is_err());
    }
}
