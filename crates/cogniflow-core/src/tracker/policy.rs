//! Distraction-detection policy toggles.
//!
//! The idle-driven, visibility-driven, and allowlist-driven rules evolved
//! independently and their precedence is configurable rather than hardwired.
//! Defaults follow the later revision of the tracker: visibility-based
//! auto-distraction off, idle detection on, allowlist restoration on.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerPolicy {
    /// Mark the user Distracted the moment the dashboard tab is hidden.
    #[serde(default)]
    pub distract_on_hidden: bool,
    /// Run the idle monitor (confirmation prompt after the idle threshold).
    #[serde(default = "default_true")]
    pub idle_detection: bool,
    /// Let an allowed tab-change restore Active from a URL-mismatch
    /// distraction. This is the only programmatic restore path; idle- and
    /// visibility-caused distractions always require explicit user action.
    #[serde(default = "default_true")]
    pub allowlist_restore: bool,
}

impl Default for TrackerPolicy {
    fn default() -> Self {
        Self {
            distract_on_hidden: false,
            idle_detection: true,
            allowlist_restore: true,
        }
    }
}

fn default_true() -> bool {
    true
}
