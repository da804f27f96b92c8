//! Data-access layer: one fetch per metric.
//!
//! Every fetch settles. A query or transformation failure is logged, the
//! metric's empty value is returned in `data`, and the cause is kept in
//! `error` for callers that want to surface it.

pub mod customers;
pub mod dashboard;
pub mod employees;
pub mod geography;
pub mod kpis;
pub mod products;
pub mod sales;

use common::Metric;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, trace};

use crate::error::{ConfigError, FetchError};
use crate::query::{ViewQuery, ViewSource};
use crate::rest::RestSource;
use crate::settings::Settings;

/// Row limit for the top products and top customers rankings.
pub const DEFAULT_RANKING_LIMIT: usize = 5;
pub const DEFAULT_PROFITABILITY_LIMIT: usize = 10;

/// Outcome of a fetch: the view-model (or its empty value) plus the failure
/// that caused the fallback, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    pub data: T,
    pub error: Option<FetchError>,
}

impl<T> Fetched<T> {
    pub fn ok(data: T) -> Self {
        Self { data, error: None }
    }

    pub fn failed(empty: T, error: FetchError) -> Self {
        Self {
            data: empty,
            error: Some(error),
        }
    }

    fn settle(result: Result<T, FetchError>, empty: T) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::failed(empty, e),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn into_result(self) -> Result<T, FetchError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.data),
        }
    }
}

/// Cheap to clone; all clones share one [`ViewSource`].
#[derive(Clone)]
pub struct ApiClient {
    source: Arc<dyn ViewSource>,
    timeout: Option<Duration>,
}

impl ApiClient {
    pub fn new(source: Arc<dyn ViewSource>) -> Self {
        Self {
            source,
            timeout: None,
        }
    }

    /// Upper bound for hooks driven by this client. A hook whose fetch runs
    /// longer settles with its empty value and a timeout error.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Client talking to the configured REST endpoint.
    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        Ok(Self::new(Arc::new(RestSource::new(settings)?)))
    }

    pub fn source(&self) -> &dyn ViewSource {
        self.source.as_ref()
    }

    /// Runs `query` and deserializes every row as `R`.
    async fn select_rows<R>(&self, metric: Metric, query: ViewQuery) -> Result<Vec<R>, FetchError>
    where
        R: DeserializeOwned,
    {
        trace!("Querying {} for {}", query.view, metric);
        debug!("Query: {}", query);

        let rows = self.source.select(&query).await.map_err(|source| {
            let err = FetchError::Query { metric, source };
            error!("{}", err);
            err
        })?;

        trace!("{} - {} rows received, transforming", metric, rows.len());
        rows.into_iter()
            .map(serde_json::from_value::<R>)
            .collect::<Result<Vec<R>, _>>()
            .map_err(|e| {
                let err = FetchError::Transform {
                    metric,
                    message: e.to_string(),
                };
                error!("{}", err);
                err
            })
    }

    /// Runs `query` as a singleton read.
    async fn select_single<R>(&self, metric: Metric, query: ViewQuery) -> Result<R, FetchError>
    where
        R: DeserializeOwned,
    {
        let mut rows = self.select_rows::<R>(metric, query.single()).await?;
        match (rows.pop(), rows.is_empty()) {
            (Some(row), true) => Ok(row),
            _ => {
                let err = FetchError::Transform {
                    metric,
                    message: "expected exactly one row".to_string(),
                };
                error!("{}", err);
                Err(err)
            }
        }
    }

    /// Fetches a list metric, mapping raw rows `R` into view-models `T`.
    /// Falls back to `None`.
    async fn fetch_list<R, T>(&self, metric: Metric, query: ViewQuery) -> Fetched<Option<Vec<T>>>
    where
        R: DeserializeOwned,
        T: From<R>,
    {
        let result = self
            .select_rows::<R>(metric, query)
            .await
            .map(|rows| rows.into_iter().map(T::from).collect::<Vec<T>>());

        if let Ok(items) = &result {
            info!("Fetched {} {} records", items.len(), metric);
        }
        Fetched::settle(result.map(Some), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QueryError;
    use crate::testing::{MockSource, sample_source};
    use common::SalesByCategory;
    use common::raw::CategorySalesRow;
    use serde_json::json;

    #[tokio::test]
    async fn test_query_failure_falls_back_to_none() {
        let source = MockSource::new().with_failure(
            "nw_sales_by_category",
            QueryError::Transport("connection reset".to_string()),
        );
        let api = ApiClient::new(Arc::new(source));

        let fetched = api
            .fetch_list::<CategorySalesRow, SalesByCategory>(
                Metric::SalesByCategory,
                ViewQuery::from_view("nw_sales_by_category"),
            )
            .await;

        assert_eq!(fetched.data, None);
        assert_eq!(fetched.error.as_ref().map(|e| e.metric()), Some(Metric::SalesByCategory));
        assert!(matches!(fetched.error, Some(FetchError::Query { .. })));
    }

    #[tokio::test]
    async fn test_malformed_row_is_a_transform_error() {
        let source = MockSource::new().with_rows(
            "nw_sales_by_category",
            vec![json!({ "category_name": "Beverages", "total_revenue": "lots" })],
        );
        let api = ApiClient::new(Arc::new(source));

        let fetched = api
            .fetch_list::<CategorySalesRow, SalesByCategory>(
                Metric::SalesByCategory,
                ViewQuery::from_view("nw_sales_by_category"),
            )
            .await;

        assert_eq!(fetched.data, None);
        assert!(matches!(fetched.error, Some(FetchError::Transform { .. })));
    }

    #[tokio::test]
    async fn test_fetched_into_result() {
        let api = ApiClient::new(Arc::new(sample_source()));
        let result = api.fetch_employee_performance().await.into_result().unwrap();
        assert_eq!(result.map(|e| e.len()), Some(3));

        let failed: Fetched<Option<u8>> = Fetched::failed(
            None,
            FetchError::Transform {
                metric: Metric::Kpis,
                message: "bad".to_string(),
            },
        );
        assert!(!failed.is_ok());
        assert!(failed.into_result().is_err());
    }
}
