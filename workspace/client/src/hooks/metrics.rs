//! One hook constructor per metric.
//!
//! Only [`use_dashboard_data`] follows the filter store. The per-metric hooks
//! load unfiltered data and re-run only when their own argument changes.

use common::{
    CustomerOrder, DashboardData, DashboardKpis, EmployeePerformance, FilterParams,
    FilterSelection, MonthlyRevenueTrend, OrdersByCountry, ProductProfitability, SalesByCategory,
    TopCustomer, TopProduct,
};
use tokio::sync::watch;

use super::{Binding, Hook};
use crate::api_client::ApiClient;
use crate::store::FilterStore;

fn hook<T>(api: &ApiClient, empty: T) -> Hook<T>
where
    T: Clone + Send + Sync + 'static,
{
    match api.timeout() {
        Some(timeout) => Hook::with_timeout(empty, timeout),
        None => Hook::new(empty),
    }
}

/// KPIs, category split, top products and customers and the monthly trend,
/// reloaded whenever any filter changes.
pub fn use_dashboard_data(api: &ApiClient, filters: &FilterStore) -> Binding<DashboardData> {
    let api = api.clone();
    Binding::watching(
        hook(&api, DashboardData::default()),
        filters.subscribe(),
        move |selection: FilterSelection| {
            let api = api.clone();
            async move { api.fetch_dashboard(&selection.to_params()).await }
        },
    )
}

pub fn use_kpis(api: &ApiClient) -> Binding<Option<DashboardKpis>> {
    let api = api.clone();
    Binding::once(hook(&api, None), move || async move { api.fetch_kpis().await })
}

pub fn use_sales_by_category(api: &ApiClient) -> Binding<Option<Vec<SalesByCategory>>> {
    let api = api.clone();
    Binding::once(hook(&api, None), move || async move {
        api.fetch_sales_by_category(&FilterParams::default()).await
    })
}

pub fn use_top_products(
    api: &ApiClient,
    limit: watch::Receiver<usize>,
) -> Binding<Option<Vec<TopProduct>>> {
    let api = api.clone();
    Binding::watching(hook(&api, None), limit, move |limit| {
        let api = api.clone();
        async move {
            api.fetch_top_products(Some(limit), &FilterParams::default())
                .await
        }
    })
}

pub fn use_top_customers(
    api: &ApiClient,
    limit: watch::Receiver<usize>,
) -> Binding<Option<Vec<TopCustomer>>> {
    let api = api.clone();
    Binding::watching(hook(&api, None), limit, move |limit| {
        let api = api.clone();
        async move {
            api.fetch_top_customers(Some(limit), &FilterParams::default())
                .await
        }
    })
}

pub fn use_monthly_trend(api: &ApiClient) -> Binding<Vec<MonthlyRevenueTrend>> {
    let api = api.clone();
    Binding::once(hook(&api, Vec::new()), move || async move {
        api.fetch_monthly_trend(&FilterParams::default()).await
    })
}

pub fn use_orders_by_country(api: &ApiClient) -> Binding<Option<Vec<OrdersByCountry>>> {
    let api = api.clone();
    Binding::once(hook(&api, None), move || async move {
        api.fetch_orders_by_country().await
    })
}

pub fn use_employee_performance(api: &ApiClient) -> Binding<Option<Vec<EmployeePerformance>>> {
    let api = api.clone();
    Binding::once(hook(&api, None), move || async move {
        api.fetch_employee_performance().await
    })
}

pub fn use_product_profitability(
    api: &ApiClient,
    limit: watch::Receiver<usize>,
) -> Binding<Option<Vec<ProductProfitability>>> {
    let api = api.clone();
    Binding::watching(hook(&api, None), limit, move |limit| {
        let api = api.clone();
        async move { api.fetch_product_profitability(Some(limit)).await }
    })
}

/// Orders for the selected customer, or all orders when none is selected.
pub fn use_customer_orders(
    api: &ApiClient,
    customer: watch::Receiver<Option<String>>,
) -> Binding<Option<Vec<CustomerOrder>>> {
    let api = api.clone();
    Binding::watching(hook(&api, None), customer, move |customer: Option<String>| {
        let api = api.clone();
        async move { api.fetch_customer_orders(customer.as_deref()).await }
    })
}
