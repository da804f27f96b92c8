//! In-memory [`ViewSource`] for tests and offline runs.

use async_trait::async_trait;
use serde_json::{Value, json};
use std::cmp::Ordering;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use crate::error::QueryError;
use crate::query::{Operator, ViewQuery, ViewSource};

/// Serves canned rows per view and evaluates predicates, ordering and limits
/// the way the REST endpoint would.
///
/// Every query is recorded, so tests can assert on what was asked for.
#[derive(Debug, Default)]
pub struct MockSource {
    rows: Mutex<HashMap<String, Vec<Value>>>,
    failures: Mutex<HashMap<String, QueryError>>,
    delays: Mutex<HashMap<String, VecDeque<Duration>>>,
    log: Mutex<Vec<ViewQuery>>,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(self, view: &str, rows: Vec<Value>) -> Self {
        self.set_rows(view, rows);
        self
    }

    pub fn with_failure(self, view: &str, error: QueryError) -> Self {
        self.set_failure(view, Some(error));
        self
    }

    /// Delays applied to successive queries on `view`, one per call. Calls
    /// beyond the list answer immediately.
    pub fn with_delays(self, view: &str, delays: impl IntoIterator<Item = Duration>) -> Self {
        lock(&self.delays).insert(view.to_string(), delays.into_iter().collect());
        self
    }

    pub fn set_rows(&self, view: &str, rows: Vec<Value>) {
        lock(&self.rows).insert(view.to_string(), rows);
    }

    pub fn set_failure(&self, view: &str, error: Option<QueryError>) {
        let mut failures = lock(&self.failures);
        match error {
            Some(error) => failures.insert(view.to_string(), error),
            None => failures.remove(view),
        };
    }

    /// All queries received so far, oldest first.
    pub fn queries(&self) -> Vec<ViewQuery> {
        lock(&self.log).clone()
    }

    pub fn calls(&self, view: &str) -> usize {
        lock(&self.log).iter().filter(|q| q.view == view).count()
    }

    fn evaluate(&self, query: &ViewQuery) -> Result<Vec<Value>, QueryError> {
        if let Some(error) = lock(&self.failures).get(&query.view) {
            return Err(error.clone());
        }

        let Some(rows) = lock(&self.rows).get(&query.view).cloned() else {
            return Err(QueryError::Rejected {
                status: 404,
                code: Some("42P01".to_string()),
                message: format!("relation \"public.{}\" does not exist", query.view),
                hint: None,
            });
        };

        let mut rows: Vec<Value> = rows
            .into_iter()
            .filter(|row| {
                query.predicates.iter().all(|p| {
                    let Some(actual) = row.get(&p.column).and_then(text) else {
                        return false;
                    };
                    match p.operator {
                        Operator::Eq => actual == p.value,
                        Operator::Gte => actual.as_str() >= p.value.as_str(),
                        Operator::Lte => actual.as_str() <= p.value.as_str(),
                    }
                })
            })
            .collect();

        if let Some(order) = &query.order {
            rows.sort_by(|a, b| {
                let ordering = compare(a.get(&order.column), b.get(&order.column));
                if order.ascending { ordering } else { ordering.reverse() }
            });
        }
        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }

        if query.single && rows.len() != 1 {
            return Err(QueryError::Rejected {
                status: 406,
                code: Some("PGRST116".to_string()),
                message: format!("JSON object requested, multiple (or no) rows returned ({})", rows.len()),
                hint: None,
            });
        }

        Ok(rows)
    }
}

#[async_trait]
impl ViewSource for MockSource {
    async fn select(&self, query: &ViewQuery) -> Result<Vec<Value>, QueryError> {
        lock(&self.log).push(query.clone());

        let delay = lock(&self.delays)
            .get_mut(&query.view)
            .and_then(|queue| queue.pop_front());
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.evaluate(query)
    }
}

/// A small Northwind-shaped data set covering every view.
pub fn sample_source() -> MockSource {
    MockSource::new()
        .with_rows(
            "nw_dashboard_kpis",
            vec![json!({
                "total_revenue": 1000,
                "total_orders": 10,
                "avg_order_value": 100,
                "total_customers": 5,
                "active_products": 3
            })],
        )
        .with_rows(
            "nw_sales_by_category",
            vec![
                json!({ "category_id": 1, "category_name": "Beverages", "order_count": 354, "units_sold": 9532, "total_revenue": 267868 }),
                json!({ "category_id": 4, "category_name": "Dairy Products", "order_count": 366, "units_sold": 9149, "total_revenue": 234507 }),
                json!({ "category_id": 3, "category_name": "Confections", "order_count": 334, "units_sold": 7906, "total_revenue": 167357 }),
                json!({ "category_id": 7, "category_name": "Produce", "order_count": 136, "units_sold": 2990, "total_revenue": 99984 }),
            ],
        )
        .with_rows(
            "nw_top_products",
            vec![
                json!({ "product_name": "Cote de Blaye", "category_name": "Beverages", "total_revenue": 141396, "units_sold": 623, "order_count": 24, "avg_unit_price": 245 }),
                json!({ "product_name": "Thuringer Rostbratwurst", "category_name": "Meat/Poultry", "total_revenue": 80368, "units_sold": 746, "order_count": 32, "avg_unit_price": 115 }),
                json!({ "product_name": "Raclette Courdavault", "category_name": "Dairy Products", "total_revenue": 71155, "units_sold": 1496, "order_count": 54, "avg_unit_price": 54 }),
                json!({ "product_name": "Tarte au sucre", "category_name": "Confections", "total_revenue": 47234, "units_sold": 1083, "order_count": 48, "avg_unit_price": 48 }),
                json!({ "product_name": "Camembert Pierrot", "category_name": "Dairy Products", "total_revenue": 46825, "units_sold": 1577, "order_count": 51, "avg_unit_price": 33 }),
                json!({ "product_name": "Chai", "category_name": "Beverages", "total_revenue": 12788, "units_sold": 828, "order_count": 38, "avg_unit_price": 17 }),
            ],
        )
        .with_rows(
            "nw_top_customers",
            vec![
                json!({ "customer_id": "QUICK", "company_name": "QUICK-Stop", "contact_name": "Horst Kloss", "country": "Germany", "total_revenue": 110277, "order_count": 28, "avg_order_value": 3938 }),
                json!({ "customer_id": "ERNSH", "company_name": "Ernst Handel", "contact_name": "Roland Mendel", "country": "Austria", "total_revenue": 104874, "order_count": 30, "avg_order_value": 3495 }),
                json!({ "customer_id": "SAVEA", "company_name": "Save-a-lot Markets", "contact_name": "Jose Pavarotti", "country": "USA", "total_revenue": 104361, "order_count": 31, "avg_order_value": 3366 }),
                json!({ "customer_id": "RATTC", "company_name": "Rattlesnake Canyon Grocery", "contact_name": "Paula Wilson", "country": "USA", "total_revenue": 51097, "order_count": 18, "avg_order_value": 2838 }),
                json!({ "customer_id": "HUNGO", "company_name": "Hungry Owl All-Night Grocers", "contact_name": "Patricia McKenna", "country": "Ireland", "total_revenue": 49979, "order_count": 19, "avg_order_value": 2630 }),
                json!({ "customer_id": "FOLKO", "company_name": "Folk och fa HB", "contact_name": "Maria Larsson", "country": "Sweden", "total_revenue": 29567, "order_count": 19, "avg_order_value": 1556 }),
            ],
        )
        .with_rows(
            "nw_monthly_revenue_trend",
            vec![
                json!({ "order_month": "1997-03-01", "order_count": 30, "unique_customers": 26, "revenue": 38547 }),
                json!({ "order_month": "1997-01-01", "order_count": 33, "unique_customers": 28, "revenue": 61258 }),
                json!({ "order_month": "1997-02-01", "order_count": 29, "unique_customers": 25, "revenue": 38483 }),
                json!({ "order_month": "1997-04-01", "order_count": 31, "unique_customers": 27, "revenue": 53032 }),
            ],
        )
        .with_rows(
            "nw_orders_by_country",
            vec![
                json!({ "country": "Germany", "order_count": 122, "total_revenue": 230284, "customer_count": 11, "avg_order_value": 1887 }),
                json!({ "country": "Austria", "order_count": 40, "total_revenue": 128003, "customer_count": 2, "avg_order_value": 3200 }),
                json!({ "country": "USA", "order_count": 122, "total_revenue": 245584, "customer_count": 13, "avg_order_value": 2013 }),
                json!({ "country": "Brazil", "order_count": 83, "total_revenue": 106925, "customer_count": 9, "avg_order_value": 1288 }),
            ],
        )
        .with_rows(
            "nw_employee_performance",
            vec![
                json!({ "employee_id": 3, "employee_name": "Janet Leverling", "title": "Sales Representative", "total_revenue": 202812, "order_count": 127, "avg_order_value": 1596, "customers_served": 63 }),
                json!({ "employee_id": 4, "employee_name": "Margaret Peacock", "title": "Sales Representative", "total_revenue": 232890, "order_count": 156, "avg_order_value": 1492, "customers_served": 75 }),
                json!({ "employee_id": 1, "employee_name": "Nancy Davolio", "title": "Sales Representative", "total_revenue": 192107, "order_count": 123, "avg_order_value": 1561, "customers_served": 65 }),
            ],
        )
        .with_rows(
            "nw_product_profitability",
            vec![
                json!({ "product_name": "Cote de Blaye", "category_name": "Beverages", "units_sold": 623, "revenue": 141396, "total_discount": 8431, "profit_margin": 94 }),
                json!({ "product_name": "Chai", "category_name": "Beverages", "units_sold": 828, "revenue": 12788, "total_discount": 1158, "profit_margin": 91 }),
                json!({ "product_name": "Tofu", "category_name": "Produce", "units_sold": 404, "revenue": 7991, "total_discount": 459, "profit_margin": 95 }),
            ],
        )
        .with_rows(
            "nw_customer_orders",
            vec![
                json!({ "order_id": 10643, "customer_id": "ALFKI", "company_name": "Alfreds Futterkiste", "order_date": "1997-08-25", "shipped_date": "1997-09-02", "ship_country": "Germany", "product_count": 3, "total_amount": 814 }),
                json!({ "order_id": 10692, "customer_id": "ALFKI", "company_name": "Alfreds Futterkiste", "order_date": "1997-10-03", "shipped_date": "1997-10-13", "ship_country": "Germany", "product_count": 1, "total_amount": 878 }),
                json!({ "order_id": 10248, "customer_id": "VINET", "company_name": "Vins et alcools Chevalier", "order_date": "1996-07-04", "shipped_date": "1996-07-16", "ship_country": "France", "product_count": 3, "total_amount": 440 }),
                json!({ "order_id": 10250, "customer_id": "HANAR", "company_name": "Hanari Carnes", "order_date": "1996-07-08", "shipped_date": null, "ship_country": "Brazil", "product_count": 3, "total_amount": 1552 }),
            ],
        )
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Numbers compare numerically, everything else by text. Nulls sort last.
fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => text(a).cmp(&text(b)),
        },
    }
}
