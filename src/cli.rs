use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use client::FilterStore;
use compute::table::SortColumn;
use std::path::PathBuf;

pub mod commands;

use commands::{diagnose, orders, snapshot};

#[derive(Parser, Debug)]
#[command(name = "salesdash")]
#[command(about = "Sales dashboard for the Northwind reporting views")]
#[command(version)]
pub struct Cli {
    /// Optional TOML file with `url`, `anon_key`, `schema` and
    /// `request_timeout_ms`
    ///
    /// Environment variables (SUPABASE_URL, SUPABASE_ANON_KEY, ...) override
    /// values from the file.
    #[arg(short, long, env = "SALESDASH_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Narrowing criteria applied to the dashboard queries.
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct FilterArgs {
    /// Product category, e.g. "Beverages"
    #[arg(long)]
    pub category: Option<String>,

    /// Customer company name
    #[arg(long)]
    pub client: Option<String>,

    #[arg(long)]
    pub product: Option<String>,

    /// Accepted but not applied by any query
    #[arg(long)]
    pub employee: Option<String>,

    /// Customer country
    #[arg(long)]
    pub country: Option<String>,

    /// First month to include (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<String>,

    /// Last month to include (YYYY-MM-DD)
    #[arg(long)]
    pub end_date: Option<String>,
}

impl FilterArgs {
    pub fn apply(&self, store: &FilterStore) {
        store.set_category(self.category.as_deref());
        store.set_client(self.client.as_deref());
        store.set_product(self.product.as_deref());
        store.set_employee(self.employee.as_deref());
        store.set_country(self.country.as_deref());
        store.set_date_range(self.start_date.as_deref(), self.end_date.as_deref());
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the overview dashboard
    Snapshot {
        #[command(flatten)]
        filters: FilterArgs,

        /// Print the loaded data as JSON instead of text widgets
        #[arg(long)]
        json: bool,
    },
    /// Print one page of the customer orders table
    Orders {
        /// Only orders of this customer id, e.g. ALFKI
        #[arg(long)]
        customer: Option<String>,

        /// Case-insensitive match on order id, customer, company or country
        #[arg(short, long)]
        search: Option<String>,

        /// Column to sort by (order_id, customer, company, date, shipped,
        /// country, products, amount)
        #[arg(long)]
        sort: Option<SortColumn>,

        /// Sort descending
        #[arg(long, requires = "sort")]
        desc: bool,

        /// 1-based page number
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
    /// Check that every backend view exists and returns the expected columns
    Diagnose,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let config = self.config.as_deref();
        match self.command {
            Commands::Snapshot { filters, json } => {
                snapshot(config, &filters, json).await?;
            }
            Commands::Orders {
                customer,
                search,
                sort,
                desc,
                page,
            } => {
                let options = orders::OrdersOptions {
                    customer,
                    search,
                    sort,
                    desc,
                    page,
                };
                orders(config, &options).await?;
            }
            Commands::Diagnose => {
                diagnose(config).await?;
            }
        }
        Ok(())
    }
}
