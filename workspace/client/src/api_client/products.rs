use common::raw::{ProfitabilityRow, TopProductRow};
use common::{FilterParams, Metric, ProductProfitability, TopProduct};
use tracing::{debug, instrument, trace};

use super::{ApiClient, Fetched, DEFAULT_PROFITABILITY_LIMIT, DEFAULT_RANKING_LIMIT};
use crate::query::ViewQuery;

impl ApiClient {
    /// Best-selling products by revenue. Honors the category and product
    /// filters.
    #[instrument(skip(self))]
    pub async fn fetch_top_products(
        &self,
        limit: Option<usize>,
        params: &FilterParams,
    ) -> Fetched<Option<Vec<TopProduct>>> {
        let limit = limit.unwrap_or(DEFAULT_RANKING_LIMIT);
        trace!("Fetching top {} products", limit);

        let mut query = ViewQuery::from_view(Metric::TopProducts.view_name())
            .order("total_revenue", false)
            .limit(limit);
        if let Some(category) = &params.category {
            debug!("Restricting to category '{}'", category);
            query = query.eq("category_name", category.as_str());
        }
        if let Some(product) = &params.product {
            debug!("Restricting to product '{}'", product);
            query = query.eq("product_name", product.as_str());
        }

        self.fetch_list::<TopProductRow, TopProduct>(Metric::TopProducts, query)
            .await
    }

    #[instrument(skip(self))]
    pub async fn fetch_product_profitability(
        &self,
        limit: Option<usize>,
    ) -> Fetched<Option<Vec<ProductProfitability>>> {
        let limit = limit.unwrap_or(DEFAULT_PROFITABILITY_LIMIT);
        trace!("Fetching {} most profitable products", limit);

        let query = ViewQuery::from_view(Metric::ProductProfitability.view_name())
            .order("profit_margin", false)
            .limit(limit);

        self.fetch_list::<ProfitabilityRow, ProductProfitability>(Metric::ProductProfitability, query)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Operator;
    use crate::testing::sample_source;
    use rust_decimal::Decimal;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_top_products_default_limit() {
        let source = Arc::new(sample_source());
        let api = ApiClient::new(source.clone());

        let products = api
            .fetch_top_products(None, &FilterParams::default())
            .await
            .data
            .unwrap();

        assert_eq!(products.len(), DEFAULT_RANKING_LIMIT);
        assert_eq!(products[0].product_name, "Cote de Blaye");
        assert_eq!(products[0].total_quantity, 623);
        assert_eq!(products[0].average_unit_price, Decimal::from(245));
        assert_eq!(source.queries()[0].limit, Some(5));
    }

    #[tokio::test]
    async fn test_top_products_filters() {
        let source = Arc::new(sample_source());
        let api = ApiClient::new(source.clone());
        let params = FilterParams::default()
            .with_category("Beverages")
            .with_product("Chai");

        let products = api.fetch_top_products(Some(3), &params).await.data.unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].product_name, "Chai");

        let query = &source.queries()[0];
        assert_eq!(query.predicate("category_name", Operator::Eq), Some("Beverages"));
        assert_eq!(query.predicate("product_name", Operator::Eq), Some("Chai"));
        assert_eq!(query.limit, Some(3));
    }

    #[tokio::test]
    async fn test_profitability_ranked_by_margin() {
        let api = ApiClient::new(Arc::new(sample_source()));
        let rows = api.fetch_product_profitability(None).await.data.unwrap();

        let names: Vec<_> = rows.iter().map(|p| p.product_name.as_str()).collect();
        assert_eq!(names, vec!["Tofu", "Cote de Blaye", "Chai"]);
        assert_eq!(rows[0].units_sold, 404);
    }
}
