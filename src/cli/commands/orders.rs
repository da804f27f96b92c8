use anyhow::{Result, anyhow};
use client::{ApiClient, use_customer_orders};
use compute::table::{OrderTable, SortColumn, SortDirection};
use std::path::Path;
use tokio::sync::watch;
use tracing::{debug, error, info, trace};

use crate::config::initialize_client;
use crate::render;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrdersOptions {
    pub customer: Option<String>,
    pub search: Option<String>,
    pub sort: Option<SortColumn>,
    pub desc: bool,
    pub page: usize,
}

impl OrdersOptions {
    /// Table state for these options. Sorting goes through the same toggle a
    /// column header click would.
    pub fn table(&self) -> OrderTable {
        let mut table = OrderTable::new();
        if let Some(search) = &self.search {
            table.set_search(search.as_str());
        }
        if let Some(column) = self.sort {
            let direction = if self.desc {
                SortDirection::Desc
            } else {
                SortDirection::Asc
            };
            table.toggle_sort(column);
            if table.sort() != (column, direction) {
                table.toggle_sort(column);
            }
        }
        table.set_page(self.page);
        table
    }
}

/// Load the orders and render the requested page.
pub async fn render_orders(api: &ApiClient, options: &OrdersOptions) -> Result<String> {
    trace!("Loading customer orders");
    let (_customer, customer_rx) = watch::channel(options.customer.clone());
    let binding = use_customer_orders(api, customer_rx);
    let state = binding.settled().await;

    if let Some(message) = state.error {
        error!("Failed to load orders: {}", message);
        return Err(anyhow!(message));
    }

    let orders = state.data.unwrap_or_default();
    debug!("Loaded {} orders", orders.len());

    let table = options.table();
    let page = table.view(&orders);
    info!(
        "Showing page {} of {} ({} matching orders)",
        page.page, page.total_pages, page.total_matches
    );
    Ok(render::orders_table(&page))
}

pub async fn orders(config: Option<&Path>, options: &OrdersOptions) -> Result<()> {
    trace!("Entering orders command");
    let api = initialize_client(config)?;
    let output = render_orders(&api, options).await?;
    println!("{}", output);
    Ok(())
}
