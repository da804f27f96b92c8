//! Plain-text widgets for the terminal.
//!
//! Each widget renders its own fallback when its data is missing, so one
//! failed metric never blanks the whole screen.

use client::{DiagnosticsReport, ViewStatus};
use common::{
    DashboardData, DashboardKpis, FilterKind, FilterSelection, MonthlyRevenueTrend,
    SalesByCategory, TopCustomer, TopProduct,
};
use compute::chart::{bar_widths, pie_slices, sparkline};
use compute::format::{DEFAULT_NUMBER_DECIMALS, DEFAULT_PERCENT_DECIMALS, amount, parse_date};
use compute::table::{TablePage, page_numbers};
use compute::{
    format_compact_number, format_currency, format_date, format_number, format_percent,
    safe_average, safe_max,
};
use rust_decimal::Decimal;
use std::fmt::Write;

const NO_DATA: &str = "  No data available";
const BAR_WIDTH: usize = 30;

fn money(value: Decimal) -> String {
    format_currency(amount(value))
}

fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n{}\n{}", title, "-".repeat(title.chars().count()));
}

fn bar(width_percent: f64) -> String {
    let cells = ((width_percent / 100.0) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(cells.min(BAR_WIDTH))
}

/// Month key as `Jan 1997`; unparsable keys are shown as they are.
fn month_label(order_month: &str) -> String {
    parse_date(order_month)
        .map(|d| d.format("%b %Y").to_string())
        .unwrap_or_else(|| order_month.to_string())
}

pub fn active_filters(selection: &FilterSelection) -> String {
    if !selection.has_active_filters() {
        return "Filters: none".to_string();
    }

    let mut parts = Vec::new();
    let kinds = [
        FilterKind::Category,
        FilterKind::Client,
        FilterKind::Product,
        FilterKind::Employee,
        FilterKind::Country,
    ];
    for kind in kinds {
        if let Some(value) = selection.value(kind) {
            parts.push(format!("{}={}", kind, value));
        }
    }
    if selection.date_range.is_active() {
        parts.push(format!(
            "dates={}..{}",
            format_date(selection.date_range.start.as_deref()),
            format_date(selection.date_range.end.as_deref())
        ));
    }
    format!("Filters: {}", parts.join(", "))
}

pub fn kpi_cards(kpis: Option<&DashboardKpis>) -> String {
    let mut out = String::new();
    heading(&mut out, "Key figures");
    let Some(kpis) = kpis else {
        out.push_str(NO_DATA);
        return out;
    };

    let cards = [
        ("Total revenue", money(kpis.total_revenue)),
        ("Total profit", money(kpis.total_profit)),
        ("Profit margin", format_percent(amount(kpis.profit_margin), DEFAULT_PERCENT_DECIMALS)),
        ("Orders", format_number(Some(kpis.total_orders as f64), DEFAULT_NUMBER_DECIMALS)),
        ("Average order", money(kpis.average_order_value)),
        ("Customers", format_number(Some(kpis.total_customers as f64), DEFAULT_NUMBER_DECIMALS)),
        ("Products", format_number(Some(kpis.total_products as f64), DEFAULT_NUMBER_DECIMALS)),
    ];
    for (label, value) in cards {
        let _ = writeln!(out, "  {:<16}{:>14}", label, value);
    }
    if !kpis.top_category.is_empty() {
        let _ = writeln!(out, "  {:<16}{:>14}", "Top category", kpis.top_category);
    }
    out
}

pub fn sales_split(categories: Option<&[SalesByCategory]>) -> String {
    let mut out = String::new();
    heading(&mut out, "Sales by category");
    let Some(categories) = categories.filter(|c| !c.is_empty()) else {
        out.push_str(NO_DATA);
        return out;
    };

    let items: Vec<(&str, f64)> = categories
        .iter()
        .map(|c| (c.category_name.as_str(), amount(c.total_revenue).unwrap_or(0.0)))
        .collect();
    let slices = pie_slices(&items);
    if slices.is_empty() {
        out.push_str(NO_DATA);
        return out;
    }

    for (slice, category) in slices.iter().zip(categories) {
        let _ = writeln!(
            out,
            "  {:<20}{:>7}  {:>12}  {}",
            slice.label,
            format_percent(Some(slice.percentage), DEFAULT_PERCENT_DECIMALS),
            money(category.total_revenue),
            slice.color
        );
    }
    out
}

fn ranking(out: &mut String, rows: &[(String, Decimal, String)]) {
    let values: Vec<f64> = rows
        .iter()
        .map(|(_, value, _)| amount(*value).unwrap_or(0.0))
        .collect();
    for ((label, value, note), width) in rows.iter().zip(bar_widths(&values)) {
        let _ = writeln!(
            out,
            "  {:<28}{:>12}  {:<width$}  {}",
            label,
            money(*value),
            bar(width),
            note,
            width = BAR_WIDTH
        );
    }
}

pub fn top_products(products: Option<&[TopProduct]>) -> String {
    let mut out = String::new();
    heading(&mut out, "Top products");
    match products.filter(|p| !p.is_empty()) {
        Some(products) => {
            let rows: Vec<_> = products
                .iter()
                .map(|p| (p.product_name.clone(), p.total_revenue, p.category_name.clone()))
                .collect();
            ranking(&mut out, &rows);
        }
        None => out.push_str(NO_DATA),
    }
    out
}

pub fn top_customers(customers: Option<&[TopCustomer]>) -> String {
    let mut out = String::new();
    heading(&mut out, "Top customers");
    match customers.filter(|c| !c.is_empty()) {
        Some(customers) => {
            let rows: Vec<_> = customers
                .iter()
                .map(|c| (c.company_name.clone(), c.total_revenue, c.country.clone()))
                .collect();
            ranking(&mut out, &rows);
        }
        None => out.push_str(NO_DATA),
    }
    out
}

pub fn monthly_trend(trend: &[MonthlyRevenueTrend]) -> String {
    let mut out = String::new();
    heading(&mut out, "Monthly revenue");
    if trend.is_empty() {
        out.push_str(NO_DATA);
        return out;
    }

    let revenue: Vec<f64> = trend
        .iter()
        .map(|m| amount(m.monthly_revenue).unwrap_or(0.0))
        .collect();

    for (month, value) in trend.iter().zip(&revenue) {
        let _ = writeln!(
            out,
            "  {:<10}{:>8}  {:>12}",
            month_label(&month.order_month),
            format_compact_number(Some(*value)),
            money(month.running_total)
        );
    }
    let _ = writeln!(out, "  {}", sparkline(&revenue));
    let _ = writeln!(
        out,
        "  Average {}  Best {}",
        format_currency(Some(safe_average(revenue.iter().copied()))),
        format_currency(Some(safe_max(revenue.iter().copied())))
    );
    out
}

pub fn dashboard(data: &DashboardData, error: Option<&str>, selection: &FilterSelection) -> String {
    let mut out = active_filters(selection);
    if let Some(error) = error {
        let _ = write!(out, "\nSome data failed to load: {}", error);
    }
    out.push_str(&kpi_cards(data.kpis.as_ref()));
    out.push_str(&sales_split(data.sales_by_category.as_deref()));
    out.push_str(&top_products(data.top_products.as_deref()));
    out.push_str(&top_customers(data.top_customers.as_deref()));
    out.push_str(&monthly_trend(&data.monthly_trend));
    out
}

pub fn orders_table(page: &TablePage<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<8}{:<8}{:<30}{:<14}{:<14}{:<14}{:>6}{:>12}",
        "Order", "Cust.", "Company", "Ordered", "Shipped", "Country", "Items", "Total"
    );
    if page.rows.is_empty() {
        let _ = writeln!(out, "No orders found");
    }
    for order in &page.rows {
        let _ = writeln!(
            out,
            "{:<8}{:<8}{:<30}{:<14}{:<14}{:<14}{:>6}{:>12}",
            order.order_id,
            order.customer_id,
            order.company_name,
            format_date(Some(order.order_date.as_str())),
            format_date(Some(order.shipped_date.as_str())),
            order.ship_country,
            order.product_count,
            money(order.total_amount)
        );
    }

    let pager: Vec<String> = page_numbers(page.page, page.total_pages)
        .into_iter()
        .map(|p| match p {
            Some(n) if n == page.page => format!("[{}]", n),
            Some(n) => n.to_string(),
            None => "...".to_string(),
        })
        .collect();
    let _ = write!(
        out,
        "Page {} of {} ({} orders)",
        page.page, page.total_pages, page.total_matches
    );
    if !pager.is_empty() {
        let _ = write!(out, "  {}", pager.join(" "));
    }
    out
}

pub fn diagnostics(report: &DiagnosticsReport) -> String {
    let mut out = String::new();
    for view in &report.views {
        match &view.status {
            ViewStatus::Ok {
                records,
                missing,
                null,
                ..
            } => {
                let _ = write!(out, "OK      {:<28}{:>3} records", view.view, records);
                if !missing.is_empty() {
                    let _ = write!(out, "  missing: {}", missing.join(", "));
                }
                if !null.is_empty() {
                    let _ = write!(out, "  null: {}", null.join(", "));
                }
                out.push('\n');
            }
            ViewStatus::Failed { error, hint } => {
                let _ = writeln!(out, "FAILED  {:<28}{}  ({})", view.view, error, hint);
            }
        }
    }
    let _ = write!(out, "{}/{} views working", report.passed(), report.total());
    out
}
