use clap::Subcommand;
use cogniflow_core::{weekly_focus, TrackerConfig};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Mon-Sun focus minutes, as served by the store
    Weekly,
    /// Recompute the weekly buckets locally from the session list
    WeeklyLocal,
}

pub async fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = TrackerConfig::load()?;
    let client = super::store_client(&config)?;

    match action {
        StatsAction::Weekly => {
            let weekly = client.weekly_focus().await?;
            println!("{}", serde_json::to_string_pretty(&weekly)?);
        }
        StatsAction::WeeklyLocal => {
            // Same aggregation the store runs; useful for spotting drift.
            let sessions = client.list_sessions().await?;
            let weekly = weekly_focus(&sessions);
            println!("{}", serde_json::to_string_pretty(&weekly)?);
        }
    }
    Ok(())
}
