use clap::Subcommand;
use cogniflow_core::tracker::validate_subject;
use cogniflow_core::{SessionPatch, SessionStatus, TrackerConfig};

#[derive(Subcommand)]
pub enum SessionAction {
    /// Create a new study session in the store
    Start {
        /// Subject being studied
        #[arg(long)]
        subject: String,
        /// Comma-separated allowed site fragments
        #[arg(long, value_delimiter = ',')]
        sites: Vec<String>,
    },
    /// List the user's study sessions
    List,
    /// Mark a session completed with its final counters
    Stop {
        #[arg(long)]
        id: String,
        /// Final focus seconds
        #[arg(long, default_value = "0")]
        focus: u64,
        /// Final distracted seconds
        #[arg(long, default_value = "0")]
        distracted: u64,
    },
    /// Ask the store whether a URL is allowed for a session
    CheckTab {
        #[arg(long)]
        id: String,
        #[arg(long)]
        url: String,
    },
}

pub async fn run(action: SessionAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = TrackerConfig::load()?;
    let client = super::store_client(&config)?;

    match action {
        SessionAction::Start { subject, sites } => {
            validate_subject(&subject)?;
            let session = client.create_session(&subject, &sites).await?;
            println!("{}", serde_json::to_string_pretty(&session)?);
        }
        SessionAction::List => {
            let sessions = client.list_sessions().await?;
            println!("{}", serde_json::to_string_pretty(&sessions)?);
        }
        SessionAction::Stop {
            id,
            focus,
            distracted,
        } => {
            let patch = SessionPatch {
                duration: Some(focus + distracted),
                focus_time: Some(focus),
                distracted_time: Some(distracted),
                status: Some(SessionStatus::Completed),
            };
            let session = client.update_session(&id, &patch).await?;
            println!("{}", serde_json::to_string_pretty(&session)?);
        }
        SessionAction::CheckTab { id, url } => {
            let allowed = client.check_tab(&id, &url).await?;
            println!("{}", serde_json::json!({ "isAllowed": allowed }));
        }
    }
    Ok(())
}
