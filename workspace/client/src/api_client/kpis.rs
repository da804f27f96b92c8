use common::raw::KpiRow;
use common::{DashboardKpis, Metric};
use tracing::{info, instrument, trace};

use super::{ApiClient, Fetched};
use crate::query::ViewQuery;

impl ApiClient {
    /// Headline figures. Not narrowed by filters; the view is a singleton.
    ///
    /// When the view carries no profit column, profit is derived from revenue
    /// with the assumed margin.
    #[instrument(skip(self))]
    pub async fn fetch_kpis(&self) -> Fetched<Option<DashboardKpis>> {
        trace!("Fetching dashboard KPIs");
        let query = ViewQuery::from_view(Metric::Kpis.view_name());

        let result = self
            .select_single::<KpiRow>(Metric::Kpis, query)
            .await
            .map(DashboardKpis::from);

        if let Ok(kpis) = &result {
            info!(
                "Fetched dashboard KPIs: {} orders, {} customers",
                kpis.total_orders, kpis.total_customers
            );
        }
        Fetched::settle(result.map(Some), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FetchError, QueryError};
    use crate::testing::{MockSource, sample_source};
    use rust_decimal::Decimal;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_kpis_derive_profit_from_revenue() {
        let source = Arc::new(sample_source());
        let api = ApiClient::new(source.clone());

        let kpis = api.fetch_kpis().await.data.unwrap();

        assert_eq!(kpis.total_revenue, Decimal::from(1000));
        assert_eq!(kpis.total_profit, Decimal::from(300));
        assert_eq!(kpis.average_order_value, Decimal::from(100));
        assert_eq!(kpis.total_products, 3);
        assert_eq!(kpis.total_orders, 10);
        assert_eq!(kpis.total_customers, 5);
        assert_eq!(kpis.profit_margin, Decimal::from(30));

        let query = &source.queries()[0];
        assert_eq!(query.view, "nw_dashboard_kpis");
        assert!(query.single);
    }

    #[tokio::test]
    async fn test_reported_profit_is_preferred() {
        let source = MockSource::new().with_rows(
            "nw_dashboard_kpis",
            vec![json!({ "total_revenue": 1000, "total_profit": 420, "profit_margin": 42 })],
        );
        let kpis = ApiClient::new(Arc::new(source)).fetch_kpis().await.data.unwrap();

        assert_eq!(kpis.total_profit, Decimal::from(420));
        assert_eq!(kpis.profit_margin, Decimal::from(42));
    }

    #[tokio::test]
    async fn test_failure_yields_none() {
        let source = MockSource::new().with_failure(
            "nw_dashboard_kpis",
            QueryError::Rejected {
                status: 401,
                code: None,
                message: "Invalid API key".to_string(),
                hint: None,
            },
        );
        let fetched = ApiClient::new(Arc::new(source)).fetch_kpis().await;

        assert_eq!(fetched.data, None);
        assert!(matches!(fetched.error, Some(FetchError::Query { metric: Metric::Kpis, .. })));
    }

    #[tokio::test]
    async fn test_empty_view_yields_none() {
        let source = MockSource::new().with_rows("nw_dashboard_kpis", vec![]);
        let fetched = ApiClient::new(Arc::new(source)).fetch_kpis().await;
        assert_eq!(fetched.data, None);
        assert!(fetched.error.is_some());
    }
}
