use common::converters::monthly_trend_from_rows;
use common::raw::{CategorySalesRow, MonthlyTrendRow};
use common::{FilterParams, Metric, MonthlyRevenueTrend, SalesByCategory};
use tracing::{debug, info, instrument, trace};

use super::{ApiClient, Fetched};
use crate::query::ViewQuery;

impl ApiClient {
    /// Revenue per category, highest first. Honors the category filter.
    #[instrument(skip(self))]
    pub async fn fetch_sales_by_category(
        &self,
        params: &FilterParams,
    ) -> Fetched<Option<Vec<SalesByCategory>>> {
        trace!("Fetching sales by category");
        let mut query = ViewQuery::from_view(Metric::SalesByCategory.view_name())
            .order("total_revenue", false);
        if let Some(category) = &params.category {
            debug!("Restricting to category '{}'", category);
            query = query.eq("category_name", category.as_str());
        }

        self.fetch_list::<CategorySalesRow, SalesByCategory>(Metric::SalesByCategory, query)
            .await
    }

    /// Monthly time series in ascending month order, bounded by the date
    /// range filter. Falls back to an empty series rather than `None`.
    #[instrument(skip(self))]
    pub async fn fetch_monthly_trend(&self, params: &FilterParams) -> Fetched<Vec<MonthlyRevenueTrend>> {
        trace!("Fetching monthly revenue trend");
        let mut query =
            ViewQuery::from_view(Metric::MonthlyTrend.view_name()).order("order_month", true);
        if let Some(start) = &params.start_date {
            query = query.gte("order_month", start.as_str());
        }
        if let Some(end) = &params.end_date {
            query = query.lte("order_month", end.as_str());
        }

        let result = self
            .select_rows::<MonthlyTrendRow>(Metric::MonthlyTrend, query)
            .await
            .map(monthly_trend_from_rows);

        if let Ok(series) = &result {
            info!("Fetched {} months of revenue trend", series.len());
        }
        Fetched::settle(result, Vec::new())
    }
}
