//! Read-only queries against named backend views.

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

use crate::error::QueryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Gte,
    Lte,
}

impl Operator {
    fn as_str(self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Gte => "gte",
            Operator::Lte => "lte",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub column: String,
    pub operator: Operator,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub ascending: bool,
}

/// `select *` from one view, with optional predicates, ordering and limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewQuery {
    pub view: String,
    pub predicates: Vec<Predicate>,
    pub order: Option<OrderBy>,
    pub limit: Option<usize>,
    /// Exactly one row is expected.
    pub single: bool,
}

impl ViewQuery {
    pub fn from_view(view: impl Into<String>) -> Self {
        Self {
            view: view.into(),
            predicates: Vec::new(),
            order: None,
            limit: None,
            single: false,
        }
    }

    pub fn eq(self, column: &str, value: impl Into<String>) -> Self {
        self.filter(column, Operator::Eq, value)
    }

    pub fn gte(self, column: &str, value: impl Into<String>) -> Self {
        self.filter(column, Operator::Gte, value)
    }

    pub fn lte(self, column: &str, value: impl Into<String>) -> Self {
        self.filter(column, Operator::Lte, value)
    }

    fn filter(mut self, column: &str, operator: Operator, value: impl Into<String>) -> Self {
        self.predicates.push(Predicate {
            column: column.to_string(),
            operator,
            value: value.into(),
        });
        self
    }

    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        self.order = Some(OrderBy {
            column: column.to_string(),
            ascending,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn single(mut self) -> Self {
        self.single = true;
        self
    }

    /// Value of the first predicate on `column` with `operator`, if any.
    pub fn predicate(&self, column: &str, operator: Operator) -> Option<&str> {
        self.predicates
            .iter()
            .find(|p| p.column == column && p.operator == operator)
            .map(|p| p.value.as_str())
    }

    /// Query-string pairs in the backend's REST dialect, e.g.
    /// `[("select", "*"), ("order", "total_revenue.desc"), ("limit", "5"),
    /// ("category_name", "eq.Beverages")]`.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("select".to_string(), "*".to_string())];

        if let Some(order) = &self.order {
            let direction = if order.ascending { "asc" } else { "desc" };
            pairs.push(("order".to_string(), format!("{}.{}", order.column, direction)));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        for predicate in &self.predicates {
            pairs.push((
                predicate.column.clone(),
                format!("{}.{}", predicate.operator.as_str(), predicate.value),
            ));
        }

        pairs
    }
}

impl fmt::Display for ViewQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pairs: Vec<String> = self
            .to_query_pairs()
            .into_iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        write!(f, "{}?{}", self.view, pairs.join("&"))
    }
}

/// The remote data store boundary.
///
/// Implementations return raw JSON rows; a singleton query yields a vector
/// with exactly one element or an error.
#[async_trait]
pub trait ViewSource: Send + Sync {
    async fn select(&self, query: &ViewQuery) -> Result<Vec<Value>, QueryError>;
}
