use anyhow::{Context, Result};
use client::{ApiClient, Settings};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, trace};

/// Extra time a hook allows on top of the transport timeout before it gives
/// up on a request.
const HOOK_TIMEOUT_MARGIN: Duration = Duration::from_secs(2);

/// Load backend settings from the environment and an optional config file.
pub fn load_settings(config: Option<&Path>) -> Result<Settings> {
    trace!("Loading backend settings");
    let settings = Settings::load(config).context("Invalid backend configuration")?;
    debug!("Backend URL: {}", settings.url);
    debug!("Request timeout: {:?}", settings.request_timeout());
    Ok(settings)
}

/// Build the API client for the configured backend.
pub fn initialize_client(config: Option<&Path>) -> Result<ApiClient> {
    let settings = load_settings(config)?;
    let api = ApiClient::from_settings(&settings)
        .context("Failed to initialize backend client")?
        .with_timeout(settings.request_timeout() + HOOK_TIMEOUT_MARGIN);
    info!("Using backend at {}", settings.url);
    Ok(api)
}
