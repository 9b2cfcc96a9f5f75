pub mod auth;
pub mod config;
pub mod session;
pub mod stats;
pub mod track;

use cogniflow_core::{StudyClient, TrackerConfig};

/// Build a store client from the loaded configuration.
pub(crate) fn store_client(
    config: &TrackerConfig,
) -> Result<StudyClient, Box<dyn std::error::Error>> {
    let token = config
        .token()
        .ok_or("no API token configured; set COGNIFLOW_TOKEN or `config set api.token <token>`")?;
    Ok(StudyClient::new(&config.api.base_url, token)?)
}
