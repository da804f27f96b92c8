//! Probes every backend view and reports what it returns.

use common::Metric;
use serde_json::Value;
use tracing::{debug, info, trace, warn};

use crate::error::QueryError;
use crate::query::{ViewQuery, ViewSource};

/// Rows read from each list view.
const SAMPLE_ROWS: usize = 3;

const HINT_MISSING_VIEW: &str = "View does not exist - run the view migration script";
const HINT_OTHER: &str = "Check permissions or data";

#[derive(Debug, Clone, PartialEq)]
pub enum ViewStatus {
    Ok {
        records: usize,
        /// Columns of the first row.
        columns: Vec<String>,
        /// Expected columns absent from the first row.
        missing: Vec<&'static str>,
        /// Expected columns present but `null` in the first row.
        null: Vec<&'static str>,
    },
    Failed {
        error: QueryError,
        hint: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewReport {
    pub metric: Metric,
    pub view: &'static str,
    pub status: ViewStatus,
}

impl ViewReport {
    pub fn passed(&self) -> bool {
        matches!(self.status, ViewStatus::Ok { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DiagnosticsReport {
    pub views: Vec<ViewReport>,
}

impl DiagnosticsReport {
    pub fn passed(&self) -> usize {
        self.views.iter().filter(|v| v.passed()).count()
    }

    pub fn total(&self) -> usize {
        self.views.len()
    }

    pub fn failures(&self) -> impl Iterator<Item = &ViewReport> {
        self.views.iter().filter(|v| !v.passed())
    }

    pub fn all_passed(&self) -> bool {
        self.passed() == self.total()
    }
}

/// Queries each view in turn: a singleton read for the KPIs, a small sample
/// for the others.
pub async fn run_diagnostics(source: &dyn ViewSource) -> DiagnosticsReport {
    trace!("Running view diagnostics");
    let mut views = Vec::with_capacity(Metric::ALL.len());

    for metric in Metric::ALL {
        let query = if metric.is_singleton() {
            ViewQuery::from_view(metric.view_name()).single()
        } else {
            ViewQuery::from_view(metric.view_name()).limit(SAMPLE_ROWS)
        };

        let status = match source.select(&query).await {
            Ok(rows) => inspect(metric, &rows),
            Err(error) => {
                let hint = if error.code() == Some("42P01") {
                    HINT_MISSING_VIEW
                } else {
                    HINT_OTHER
                };
                warn!("{} ({}) failed: {}", metric, metric.view_name(), error);
                ViewStatus::Failed { error, hint }
            }
        };

        views.push(ViewReport {
            metric,
            view: metric.view_name(),
            status,
        });
    }

    let report = DiagnosticsReport { views };
    info!("Diagnostics: {}/{} views working", report.passed(), report.total());
    report
}

fn inspect(metric: Metric, rows: &[Value]) -> ViewStatus {
    let first = rows.first().and_then(Value::as_object);
    let columns: Vec<String> = first
        .map(|row| row.keys().cloned().collect())
        .unwrap_or_default();

    let mut missing = Vec::new();
    let mut null = Vec::new();
    if let Some(row) = first {
        for column in metric.expected_columns() {
            match row.get(*column) {
                None => missing.push(*column),
                Some(Value::Null) => null.push(*column),
                Some(_) => {}
            }
        }
    }

    debug!(
        "{}: {} rows, {} columns, missing {:?}, null {:?}",
        metric,
        rows.len(),
        columns.len(),
        missing,
        null
    );
    ViewStatus::Ok {
        records: rows.len(),
        columns,
        missing,
        null,
    }
}
