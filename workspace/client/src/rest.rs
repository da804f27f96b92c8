//! [`ViewSource`] backed by the backend's PostgREST endpoint.

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, trace, warn};

use crate::error::{ConfigError, QueryError};
use crate::query::{ViewQuery, ViewSource};
use crate::settings::Settings;

/// Asks the endpoint for a bare object instead of a one-element array, and
/// makes it reject queries that match zero or several rows.
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

/// Error body returned by the endpoint on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: Option<String>,
    message: Option<String>,
    details: Option<String>,
    hint: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RestSource {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
    schema: String,
    timeout: Duration,
}

impl RestSource {
    pub fn new(settings: &Settings) -> Result<Self, ConfigError> {
        let timeout = settings.request_timeout();
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            http,
            base_url: settings.url.trim_end_matches('/').to_string(),
            anon_key: settings.anon_key.clone(),
            schema: settings.schema.clone(),
            timeout,
        })
    }

    fn endpoint(&self, view: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, view)
    }

    fn transport_error(&self, err: reqwest::Error) -> QueryError {
        if err.is_timeout() {
            QueryError::Timeout(self.timeout)
        } else {
            QueryError::Transport(err.to_string())
        }
    }
}

fn rejected(status: reqwest::StatusCode, body: &str) -> QueryError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => {
            let message = match (parsed.message, parsed.details) {
                (Some(message), Some(details)) => format!("{} ({})", message, details),
                (Some(message), None) => message,
                (None, Some(details)) => details,
                (None, None) => status.to_string(),
            };
            QueryError::Rejected {
                status: status.as_u16(),
                code: parsed.code,
                message,
                hint: parsed.hint,
            }
        }
        Err(_) => QueryError::Rejected {
            status: status.as_u16(),
            code: None,
            message: if body.trim().is_empty() {
                status.to_string()
            } else {
                body.trim().to_string()
            },
            hint: None,
        },
    }
}

#[async_trait]
impl ViewSource for RestSource {
    async fn select(&self, query: &ViewQuery) -> Result<Vec<Value>, QueryError> {
        let url = self.endpoint(&query.view);
        trace!("GET {} {:?}", url, query.to_query_pairs());

        let mut request = self
            .http
            .get(&url)
            .query(&query.to_query_pairs())
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .header("Accept-Profile", &self.schema);
        if query.single {
            request = request.header(ACCEPT, SINGLE_OBJECT);
        }

        let response = request.send().await.map_err(|e| self.transport_error(e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            let err = rejected(status, &body);
            warn!("Query on {} rejected: {}", query.view, err);
            return Err(err);
        }

        let value: Value =
            serde_json::from_str(&body).map_err(|e| QueryError::Decode(e.to_string()))?;
        let rows = match value {
            Value::Array(rows) => rows,
            object @ Value::Object(_) if query.single => vec![object],
            other => {
                return Err(QueryError::Decode(format!(
                    "expected a JSON array of rows, got {}",
                    other
                )));
            }
        };

        debug!("Fetched {} rows from {}", rows.len(), query.view);
        Ok(rows)
    }
}
