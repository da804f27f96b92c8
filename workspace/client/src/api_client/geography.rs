use common::raw::CountryOrdersRow;
use common::{Metric, OrdersByCountry};
use tracing::{instrument, trace};

use super::{ApiClient, Fetched};
use crate::query::ViewQuery;

impl ApiClient {
    #[instrument(skip(self))]
    pub async fn fetch_orders_by_country(&self) -> Fetched<Option<Vec<OrdersByCountry>>> {
        trace!("Fetching orders by country");
        let query =
            ViewQuery::from_view(Metric::OrdersByCountry.view_name()).order("order_count", false);

        self.fetch_list::<CountryOrdersRow, OrdersByCountry>(Metric::OrdersByCountry, query)
            .await
    }
}
