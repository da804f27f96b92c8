#[cfg(test)]
mod integration_tests {
    use crate::cli::commands::orders::{OrdersOptions, render_orders};
    use crate::cli::commands::snapshot::{load_dashboard, render_snapshot};
    use crate::cli::{Cli, Commands, FilterArgs};
    use crate::render;
    use clap::Parser;
    use client::query::Operator;
    use client::testing::sample_source;
    use client::{ApiClient, FilterStore, QueryError, run_diagnostics};
    use common::FilterKind;
    use compute::table::SortColumn;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_snapshot_renders_kpi_cards() {
        let api = ApiClient::new(Arc::new(sample_source()));
        let store = FilterStore::default();

        let state = load_dashboard(&api, &store).await;
        assert!(!state.loading);
        assert_eq!(state.error, None);

        let output = render_snapshot(&state, &store);
        assert!(output.starts_with("Filters: none"));
        assert!(output.contains("$1,000"));
        assert!(output.contains("$300"));
        assert!(output.contains("30.0%"));
        assert!(output.contains("Beverages"));
        assert!(output.contains("Jan 1997"));
        assert!(!output.contains("Some data failed to load"));
    }

    #[tokio::test]
    async fn test_category_filter_flows_into_queries() {
        let source = Arc::new(sample_source());
        let api = ApiClient::new(source.clone());
        let store = FilterStore::default();

        let filters = FilterArgs {
            category: Some("Beverages".to_string()),
            ..Default::default()
        };
        filters.apply(&store);
        assert!(store.has_active_filters());

        let state = load_dashboard(&api, &store).await;
        let categories = state.data.sales_by_category.unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].category_name, "Beverages");

        let products = state.data.top_products.unwrap();
        assert!(products.iter().all(|p| p.category_name == "Beverages"));

        let filtered = source
            .queries()
            .into_iter()
            .filter(|q| q.view == "nw_sales_by_category")
            .filter(|q| q.predicate("category_name", Operator::Eq) == Some("Beverages"))
            .count();
        assert_eq!(filtered, 1);

        store.clear_filter(FilterKind::Category);
        assert!(!store.has_active_filters());
        assert_eq!(render::active_filters(&store.selection()), "Filters: none");
    }

    #[tokio::test]
    async fn test_failed_metric_keeps_other_widgets() {
        let source = sample_source().with_failure(
            "nw_top_products",
            QueryError::Transport("connection reset".to_string()),
        );
        let api = ApiClient::new(Arc::new(source));
        let store = FilterStore::default();

        let state = load_dashboard(&api, &store).await;
        assert!(state.data.kpis.is_some());
        assert!(state.data.top_products.is_none());

        let output = render_snapshot(&state, &store);
        assert!(output.contains("Some data failed to load: Error fetching top products"));
        assert!(output.contains("$1,000"));
        assert!(output.contains("No data available"));
    }

    #[tokio::test]
    async fn test_orders_sorted_by_amount() {
        let api = ApiClient::new(Arc::new(sample_source()));
        let options = OrdersOptions {
            sort: Some(SortColumn::TotalAmount),
            desc: true,
            page: 1,
            ..Default::default()
        };

        let output = render_orders(&api, &options).await.unwrap();
        let first_row = output.lines().nth(1).unwrap();
        assert!(first_row.starts_with("10250"));
        assert!(first_row.contains("$1,552"));
        assert!(output.contains("Page 1 of 1 (4 orders)"));
    }

    #[tokio::test]
    async fn test_orders_for_customer_with_search() {
        let api = ApiClient::new(Arc::new(sample_source()));

        let options = OrdersOptions {
            customer: Some("ALFKI".to_string()),
            page: 1,
            ..Default::default()
        };
        let output = render_orders(&api, &options).await.unwrap();
        assert!(output.contains("(2 orders)"));
        // newest first by default
        assert!(output.lines().nth(1).unwrap().starts_with("10692"));

        let options = OrdersOptions {
            search: Some("brazil".to_string()),
            page: 1,
            ..Default::default()
        };
        let output = render_orders(&api, &options).await.unwrap();
        assert!(output.contains("(1 orders)"));
        assert!(output.contains("Hanari Carnes"));
    }

    #[tokio::test]
    async fn test_orders_failure_is_an_error() {
        let source = sample_source().with_failure(
            "nw_customer_orders",
            QueryError::Transport("connection refused".to_string()),
        );
        let api = ApiClient::new(Arc::new(source));

        let result = render_orders(&api, &OrdersOptions::default()).await;
        let message = result.unwrap_err().to_string();
        assert!(message.contains("Error fetching customer orders"));
    }

    #[test]
    fn test_sort_options_end_in_requested_direction() {
        let mut options = OrdersOptions {
            sort: Some(SortColumn::OrderDate),
            desc: true,
            page: 1,
            ..Default::default()
        };
        assert_eq!(
            options.table().sort(),
            (SortColumn::OrderDate, compute::table::SortDirection::Desc)
        );

        options.desc = false;
        assert_eq!(
            options.table().sort(),
            (SortColumn::OrderDate, compute::table::SortDirection::Asc)
        );
    }

    #[tokio::test]
    async fn test_diagnostics_report_output() {
        let source = sample_source();
        let report = run_diagnostics(&source).await;
        let output = render::diagnostics(&report);
        assert!(output.contains("OK      nw_dashboard_kpis"));
        assert!(output.ends_with("9/9 views working"));

        let source = sample_source().with_rows("nw_orders_by_country", Vec::new());
        let report = run_diagnostics(&source).await;
        let output = render::diagnostics(&report);
        assert!(output.contains("OK      nw_orders_by_country"));
        assert!(output.contains("  0 records"));
    }

    #[test]
    fn test_cli_parses_snapshot_filters() {
        let cli = Cli::try_parse_from([
            "salesdash",
            "snapshot",
            "--category",
            "Seafood",
            "--start-date",
            "1997-01-01",
            "--json",
        ])
        .unwrap();

        match cli.command {
            Commands::Snapshot { filters, json } => {
                assert!(json);
                assert_eq!(filters.category.as_deref(), Some("Seafood"));
                assert_eq!(filters.start_date.as_deref(), Some("1997-01-01"));
                assert_eq!(filters.end_date, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_parses_orders() {
        let cli = Cli::try_parse_from([
            "salesdash", "orders", "--sort", "amount", "--desc", "--page", "2",
        ])
        .unwrap();

        match cli.command {
            Commands::Orders { sort, desc, page, .. } => {
                assert_eq!(sort, Some(SortColumn::TotalAmount));
                assert!(desc);
                assert_eq!(page, 2);
            }
            other => panic!("unexpected command: {:?}", other),
        }

        assert!(Cli::try_parse_from(["salesdash", "orders", "--sort", "colour"]).is_err());
        assert!(Cli::try_parse_from(["salesdash", "orders", "--desc"]).is_err());
    }
}
