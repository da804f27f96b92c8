//! Data access for the sales dashboard.
//!
//! [`ApiClient`] turns backend view rows into the view-models in `common`,
//! [`FilterStore`] holds the user's filter selection, and the hooks in
//! [`hooks::metrics`] keep a [`hooks::LoadState`] in sync with both.

pub mod api_client;
pub mod diagnostics;
pub mod error;
pub mod hooks;
pub mod query;
pub mod rest;
pub mod settings;
pub mod store;
pub mod testing;

pub use api_client::{ApiClient, Fetched, DEFAULT_PROFITABILITY_LIMIT, DEFAULT_RANKING_LIMIT};
pub use diagnostics::{run_diagnostics, DiagnosticsReport, ViewReport, ViewStatus};
pub use error::{ConfigError, FetchError, QueryError};
pub use hooks::metrics::*;
pub use hooks::{Binding, Hook, LoadState};
pub use query::{ViewQuery, ViewSource};
pub use rest::RestSource;
pub use settings::Settings;
pub use store::FilterStore;
