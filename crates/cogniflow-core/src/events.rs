use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::monitor::MonitorCommand;
use crate::tracker::{DistractionCause, FocusStatus, PromptOutcome};

/// Every state change in the tracker produces an Event.
/// The CLI prints them; a GUI front end would subscribe to them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// The canonical focus status changed.
    StatusChanged {
        from: FocusStatus,
        to: FocusStatus,
        /// Why the user is considered distracted, when `to` is Distracted.
        cause: Option<DistractionCause>,
        at: DateTime<Utc>,
    },
    SessionStarted {
        session_id: String,
        subject: String,
        allowed_sites: Vec<String>,
        at: DateTime<Utc>,
    },
    SessionCompleted {
        session_id: String,
        duration_secs: u64,
        focus_secs: u64,
        distracted_secs: u64,
        at: DateTime<Utc>,
    },
    /// The store no longer recognizes the current session id.
    SessionOrphaned {
        session_id: String,
        at: DateTime<Utc>,
    },
    /// A 25-minute continuous-focus interval completed.
    StreakCompleted {
        focus_streak: u32,
        at: DateTime<Utc>,
    },
    /// Sustained focus crossed a fatigue threshold.
    FatigueRaised {
        fatigue_level: u8,
        at: DateTime<Utc>,
    },
    BreakStarted {
        at: DateTime<Utc>,
    },
    BreakEnded {
        break_secs: u64,
        at: DateTime<Utc>,
    },
    /// The idle monitor wants the user to confirm they are still focused.
    PromptOpened {
        deadline_secs: u64,
        at: DateTime<Utc>,
    },
    PromptResolved {
        outcome: PromptOutcome,
        at: DateTime<Utc>,
    },
    /// A command for the external tab-monitoring collaborator.
    MonitorCommand {
        command: MonitorCommand,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        status: FocusStatus,
        session_id: Option<String>,
        focus_secs: u64,
        distracted_secs: u64,
        break_secs: u64,
        focus_streak: u32,
        fatigue_level: u8,
        at: DateTime<Utc>,
    },
}
