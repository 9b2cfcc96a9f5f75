use clap::Subcommand;
use cogniflow_core::TrackerConfig;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the current configuration as TOML
    Show,
    /// Print the configuration file path
    Path,
    /// Set a configuration value
    Set {
        /// Key, e.g. api.base_url, study_origin, policy.idle_detection
        key: String,
        value: String,
    },
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show => {
            let config = TrackerConfig::load()?;
            print!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Path => {
            println!("{}", TrackerConfig::path()?.display());
        }
        ConfigAction::Set { key, value } => {
            let mut config = TrackerConfig::load()?;
            apply(&mut config, &key, &value)?;
            config.save()?;
            println!("set {key} = {value}");
        }
    }
    Ok(())
}

fn apply(
    config: &mut TrackerConfig,
    key: &str,
    value: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    match key {
        "api.base_url" => config.api.base_url = value.to_string(),
        "api.token" => config.api.token = Some(value.to_string()),
        "study_origin" => config.study_origin = value.to_string(),
        "idle.idle_threshold_secs" => config.idle.idle_threshold_secs = value.parse()?,
        "idle.prompt_timeout_secs" => config.idle.prompt_timeout_secs = value.parse()?,
        "policy.distract_on_hidden" => config.policy.distract_on_hidden = value.parse()?,
        "policy.idle_detection" => config.policy.idle_detection = value.parse()?,
        "policy.allowlist_restore" => config.policy.allowlist_restore = value.parse()?,
        other => return Err(format!("unknown configuration key: {other}").into()),
    }
    Ok(())
}
