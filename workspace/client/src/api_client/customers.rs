use common::raw::{CustomerOrderRow, TopCustomerRow};
use common::{CustomerOrder, FilterParams, Metric, TopCustomer};
use tracing::{debug, instrument, trace};

use super::{ApiClient, Fetched, DEFAULT_RANKING_LIMIT};
use crate::query::ViewQuery;

impl ApiClient {
    /// Customers ranked by revenue. The client filter matches the company
    /// name.
    #[instrument(skip(self))]
    pub async fn fetch_top_customers(
        &self,
        limit: Option<usize>,
        params: &FilterParams,
    ) -> Fetched<Option<Vec<TopCustomer>>> {
        let limit = limit.unwrap_or(DEFAULT_RANKING_LIMIT);
        trace!("Fetching top {} customers", limit);

        let mut query = ViewQuery::from_view(Metric::TopCustomers.view_name())
            .order("total_revenue", false)
            .limit(limit);
        if let Some(client) = &params.client {
            debug!("Restricting to company '{}'", client);
            query = query.eq("company_name", client.as_str());
        }
        if let Some(country) = &params.country {
            debug!("Restricting to country '{}'", country);
            query = query.eq("country", country.as_str());
        }

        self.fetch_list::<TopCustomerRow, TopCustomer>(Metric::TopCustomers, query)
            .await
    }

    /// Orders, newest first, optionally for a single customer.
    #[instrument(skip(self))]
    pub async fn fetch_customer_orders(
        &self,
        customer_id: Option<&str>,
    ) -> Fetched<Option<Vec<CustomerOrder>>> {
        trace!("Fetching customer orders");
        let mut query =
            ViewQuery::from_view(Metric::CustomerOrders.view_name()).order("order_date", false);
        if let Some(customer_id) = customer_id.map(str::trim).filter(|c| !c.is_empty()) {
            debug!("Restricting to customer '{}'", customer_id);
            query = query.eq("customer_id", customer_id);
        }

        self.fetch_list::<CustomerOrderRow, CustomerOrder>(Metric::CustomerOrders, query)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Operator;
    use crate::testing::sample_source;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_client_and_country_filters() {
        let source = Arc::new(sample_source());
        let api = ApiClient::new(source.clone());

        let params = FilterParams::default().with_country("USA");
        let customers = api.fetch_top_customers(None, &params).await.data.unwrap();
        let ids: Vec<_> = customers.iter().map(|c| c.customer_id.as_str()).collect();
        assert_eq!(ids, vec!["SAVEA", "RATTC"]);

        let params = FilterParams::default().with_client("Ernst Handel");
        let customers = api.fetch_top_customers(None, &params).await.data.unwrap();
        assert_eq!(customers.len(), 1);
        assert_eq!(customers[0].contact_name, "Roland Mendel");

        let query = &source.queries()[1];
        assert_eq!(query.predicate("company_name", Operator::Eq), Some("Ernst Handel"));
    }

    #[tokio::test]
    async fn test_customer_orders_newest_first() {
        let api = ApiClient::new(Arc::new(sample_source()));

        let all = api.fetch_customer_orders(None).await.data.unwrap();
        assert_eq!(all.len(), 4);
        assert_eq!(all[0].order_id, 10692);
        assert_eq!(all[3].order_id, 10248);

        let alfki = api.fetch_customer_orders(Some("ALFKI")).await.data.unwrap();
        let ids: Vec<_> = alfki.iter().map(|o| o.order_id).collect();
        assert_eq!(ids, vec![10692, 10643]);
    }

    #[tokio::test]
    async fn test_blank_customer_is_unscoped() {
        let source = Arc::new(sample_source());
        let api = ApiClient::new(source.clone());

        api.fetch_customer_orders(Some("  ")).await;
        assert!(source.queries()[0].predicates.is_empty());
    }
}
