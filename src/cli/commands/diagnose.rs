use anyhow::{Result, bail};
use client::run_diagnostics;
use std::path::Path;
use tracing::{error, info, trace};

use crate::config::initialize_client;
use crate::render;

pub async fn diagnose(config: Option<&Path>) -> Result<()> {
    trace!("Entering diagnose command");
    let api = initialize_client(config)?;

    info!("Checking backend views");
    let report = run_diagnostics(api.source()).await;
    println!("{}", render::diagnostics(&report));

    if !report.all_passed() {
        for failure in report.failures() {
            error!("View {} is not usable", failure.view);
        }
        bail!(
            "{} of {} views failed",
            report.total() - report.passed(),
            report.total()
        );
    }
    info!("All views are working");
    Ok(())
}
