use anyhow::{Context, Result};
use client::{ApiClient, FilterStore, LoadState, use_dashboard_data};
use common::DashboardData;
use std::path::Path;
use tracing::{debug, error, info, trace};

use crate::cli::FilterArgs;
use crate::config::initialize_client;
use crate::render;

/// Mount the dashboard loader on `store` and wait for its first result.
pub async fn load_dashboard(api: &ApiClient, store: &FilterStore) -> LoadState<DashboardData> {
    trace!("Mounting dashboard loader");
    let binding = use_dashboard_data(api, store);
    let state = binding.settled().await;
    debug!(
        "Dashboard settled: kpis={}, trend months={}",
        state.data.kpis.is_some(),
        state.data.monthly_trend.len()
    );
    state
}

pub fn render_snapshot(state: &LoadState<DashboardData>, store: &FilterStore) -> String {
    render::dashboard(&state.data, state.error.as_deref(), &store.selection())
}

pub async fn snapshot(config: Option<&Path>, filters: &FilterArgs, json: bool) -> Result<()> {
    trace!("Entering snapshot command");
    let api = initialize_client(config)?;

    let store = FilterStore::default();
    filters.apply(&store);
    info!("Loading dashboard ({})", render::active_filters(&store.selection()));

    let state = load_dashboard(&api, &store).await;
    if let Some(message) = &state.error {
        error!("Dashboard loaded with errors: {}", message);
    } else {
        info!("Dashboard loaded");
    }

    if json {
        let body = serde_json::to_string_pretty(&state.data)
            .context("Failed to serialize dashboard data")?;
        println!("{}", body);
    } else {
        println!("{}", render_snapshot(&state, &store));
    }
    Ok(())
}
