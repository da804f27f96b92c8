use common::raw::EmployeeRow;
use common::{EmployeePerformance, Metric};
use tracing::{instrument, trace};

use super::{ApiClient, Fetched};
use crate::query::ViewQuery;

impl ApiClient {
    /// Sales per employee, highest revenue first.
    ///
    /// There is no employee predicate anywhere in the data-access layer; the
    /// employee filter selects nothing.
    #[instrument(skip(self))]
    pub async fn fetch_employee_performance(&self) -> Fetched<Option<Vec<EmployeePerformance>>> {
        trace!("Fetching employee performance");
        let query = ViewQuery::from_view(Metric::EmployeePerformance.view_name())
            .order("total_revenue", false);

        self.fetch_list::<EmployeeRow, EmployeePerformance>(Metric::EmployeePerformance, query)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_source;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_employees_by_revenue() {
        let api = ApiClient::new(Arc::new(sample_source()));
        let employees = api.fetch_employee_performance().await.data.unwrap();

        let ids: Vec<_> = employees.iter().map(|e| e.employee_id).collect();
        assert_eq!(ids, vec![4, 3, 1]);
        assert_eq!(employees[0].customers_served, 75);
        assert_eq!(employees[0].title, "Sales Representative");
    }
}
