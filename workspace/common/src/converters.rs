//! Converter functions turning raw view rows into view-models.
//!
//! Where a view does not report profit, profit is derived as a fixed share of
//! revenue. That share is [`ASSUMED_PROFIT_MARGIN`] and every converter goes
//! through [`profit_or_derived`] and [`margin_or_assumed`], so the constant
//! is applied identically everywhere.
//!
//! The assumed margin is a placeholder carried over for compatibility. It is
//! not a computed figure and should be reviewed before anyone relies on it.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use tracing::{debug, trace};

use crate::raw::{
    CategorySalesRow, CountryOrdersRow, CustomerOrderRow, EmployeeRow, KpiRow, MonthlyTrendRow,
    ProfitabilityRow, TopCustomerRow, TopProductRow,
};
use crate::{
    CustomerOrder, DashboardKpis, EmployeePerformance, MonthlyRevenueTrend, OrdersByCountry,
    ProductProfitability, SalesByCategory, TopCustomer, TopProduct,
};

/// Fraction of revenue assumed to be profit when a view does not report it (0.30).
pub const ASSUMED_PROFIT_MARGIN: Decimal = Decimal::from_parts(30, 0, 0, false, 2);

/// [`ASSUMED_PROFIT_MARGIN`] expressed as a percentage (30.0).
pub fn assumed_margin_percent() -> Decimal {
    ASSUMED_PROFIT_MARGIN * Decimal::ONE_HUNDRED
}

/// Profit derived from revenue under the assumed margin.
pub fn derive_profit(revenue: Decimal) -> Decimal {
    revenue * ASSUMED_PROFIT_MARGIN
}

/// The reported profit when the view carries one, otherwise the derived value.
pub fn profit_or_derived(reported: Option<Decimal>, revenue: Decimal) -> Decimal {
    match reported {
        Some(profit) => non_negative(Some(profit)),
        None => derive_profit(revenue),
    }
}

/// The reported margin percentage when present, otherwise the assumed one.
pub fn margin_or_assumed(reported: Option<Decimal>) -> Decimal {
    match reported {
        Some(margin) => non_negative(Some(margin)),
        None => assumed_margin_percent(),
    }
}

/// Absent values become zero and negative values are clamped to zero.
pub fn non_negative(value: Option<Decimal>) -> Decimal {
    match value {
        Some(v) if v.is_sign_negative() && !v.is_zero() => {
            debug!(value = %v, "Clamping negative value to zero");
            Decimal::ZERO
        }
        Some(v) => v,
        None => Decimal::ZERO,
    }
}

/// Whole, non-negative count. Fractional parts are truncated.
pub fn count(value: Option<Decimal>) -> u64 {
    non_negative(value).trunc().to_u64().unwrap_or(u64::MAX)
}

fn text(value: Option<String>) -> String {
    value.unwrap_or_default()
}

impl From<KpiRow> for DashboardKpis {
    fn from(row: KpiRow) -> Self {
        let total_revenue = non_negative(row.total_revenue);
        DashboardKpis {
            total_revenue,
            total_profit: profit_or_derived(row.total_profit, total_revenue),
            total_orders: count(row.total_orders),
            average_order_value: non_negative(row.avg_order_value),
            total_customers: count(row.total_customers),
            total_products: count(row.active_products),
            profit_margin: margin_or_assumed(row.profit_margin),
            top_category: text(row.top_category),
        }
    }
}

impl From<CategorySalesRow> for SalesByCategory {
    fn from(row: CategorySalesRow) -> Self {
        let total_revenue = non_negative(row.total_revenue);
        SalesByCategory {
            category_name: text(row.category_name),
            total_revenue,
            total_profit: profit_or_derived(row.total_profit, total_revenue),
            order_count: count(row.order_count),
            profit_margin: margin_or_assumed(row.profit_margin),
        }
    }
}

impl From<TopProductRow> for TopProduct {
    fn from(row: TopProductRow) -> Self {
        TopProduct {
            product_name: text(row.product_name),
            category_name: text(row.category_name),
            total_revenue: non_negative(row.total_revenue),
            total_quantity: count(row.total_quantity),
            order_count: count(row.order_count),
            average_unit_price: non_negative(row.average_unit_price),
        }
    }
}

impl From<TopCustomerRow> for TopCustomer {
    fn from(row: TopCustomerRow) -> Self {
        TopCustomer {
            customer_id: text(row.customer_id),
            company_name: text(row.company_name),
            contact_name: text(row.contact_name),
            country: text(row.country),
            total_revenue: non_negative(row.total_revenue),
            order_count: count(row.order_count),
            average_order_value: non_negative(row.average_order_value),
        }
    }
}

impl From<CountryOrdersRow> for OrdersByCountry {
    fn from(row: CountryOrdersRow) -> Self {
        OrdersByCountry {
            country: text(row.country),
            order_count: count(row.order_count),
            total_revenue: non_negative(row.total_revenue),
            customer_count: count(row.customer_count),
            average_order_value: non_negative(row.average_order_value),
        }
    }
}

impl From<EmployeeRow> for EmployeePerformance {
    fn from(row: EmployeeRow) -> Self {
        EmployeePerformance {
            employee_id: row.employee_id.unwrap_or_default().max(0),
            employee_name: text(row.employee_name),
            title: text(row.title),
            total_revenue: non_negative(row.total_revenue),
            order_count: count(row.order_count),
            average_order_value: non_negative(row.average_order_value),
            customers_served: count(row.customers_served),
        }
    }
}

impl From<ProfitabilityRow> for ProductProfitability {
    fn from(row: ProfitabilityRow) -> Self {
        ProductProfitability {
            product_name: text(row.product_name),
            category_name: text(row.category_name),
            units_sold: count(row.units_sold),
            revenue: non_negative(row.revenue),
            total_discount: non_negative(row.total_discount),
            profit_margin: non_negative(row.profit_margin),
        }
    }
}

impl From<CustomerOrderRow> for CustomerOrder {
    fn from(row: CustomerOrderRow) -> Self {
        CustomerOrder {
            order_id: row.order_id.unwrap_or_default().max(0),
            customer_id: text(row.customer_id),
            company_name: text(row.company_name),
            order_date: text(row.order_date),
            shipped_date: text(row.shipped_date),
            ship_country: text(row.ship_country),
            product_count: count(row.product_count),
            total_amount: non_negative(row.total_amount),
        }
    }
}

/// Converts trend rows, already in ascending month order, into the revenue
/// time series with a cumulative running total.
pub fn monthly_trend_from_rows(rows: Vec<MonthlyTrendRow>) -> Vec<MonthlyRevenueTrend> {
    trace!("Converting {} monthly trend rows", rows.len());
    let mut running_total = Decimal::ZERO;

    rows.into_iter()
        .map(|row| {
            let monthly_revenue = non_negative(row.revenue);
            running_total += monthly_revenue;
            MonthlyRevenueTrend {
                order_month: text(row.order_month),
                monthly_revenue,
                monthly_profit: profit_or_derived(row.profit, monthly_revenue),
                order_count: count(row.order_count),
                running_total,
            }
        })
        .collect()
}

/// Name of the highest-revenue category, or an empty string.
pub fn top_category(categories: &[SalesByCategory]) -> String {
    categories
        .iter()
        .max_by(|a, b| a.total_revenue.cmp(&b.total_revenue))
        .map(|c| c.category_name.clone())
        .unwrap_or_default()
}
