use clap::Subcommand;
use cogniflow_core::TrackerConfig;

#[derive(Subcommand)]
pub enum AuthAction {
    /// Fetch the user profile (focus streak, fatigue level)
    Profile,
}

pub async fn run(action: AuthAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = TrackerConfig::load()?;
    let client = super::store_client(&config)?;

    match action {
        AuthAction::Profile => {
            let profile = client.profile().await?;
            println!("{}", serde_json::to_string_pretty(&profile)?);
        }
    }
    Ok(())
}
