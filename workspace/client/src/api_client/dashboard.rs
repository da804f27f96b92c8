use common::converters::top_category;
use common::{DashboardData, FilterParams};
use tracing::{info, instrument, trace, warn};

use super::{ApiClient, Fetched};

impl ApiClient {
    /// Everything the overview page needs, fetched concurrently.
    ///
    /// Each part falls back independently. `error` reports the first failure
    /// in the order KPIs, categories, products, customers, trend.
    #[instrument(skip(self))]
    pub async fn fetch_dashboard(&self, params: &FilterParams) -> Fetched<DashboardData> {
        trace!("Fetching dashboard data");
        if let Some(employee) = &params.employee {
            warn!(
                "Employee filter '{}' is set but no dashboard query applies it",
                employee
            );
        }

        let (kpis, sales_by_category, top_products, top_customers, monthly_trend) = tokio::join!(
            self.fetch_kpis(),
            self.fetch_sales_by_category(params),
            self.fetch_top_products(None, params),
            self.fetch_top_customers(None, params),
            self.fetch_monthly_trend(params),
        );

        let error = kpis
            .error
            .or(sales_by_category.error)
            .or(top_products.error)
            .or(top_customers.error)
            .or(monthly_trend.error);

        let mut kpis = kpis.data;
        if let (Some(kpis), Some(categories)) = (kpis.as_mut(), sales_by_category.data.as_deref()) {
            if kpis.top_category.is_empty() {
                kpis.top_category = top_category(categories);
            }
        }

        let data = DashboardData {
            kpis,
            sales_by_category: sales_by_category.data,
            top_products: top_products.data,
            top_customers: top_customers.data,
            monthly_trend: monthly_trend.data,
        };

        match &error {
            None => info!("Dashboard data loaded"),
            Some(e) => warn!("Dashboard data loaded with failures, first: {}", e),
        }
        Fetched { data, error }
    }
}
