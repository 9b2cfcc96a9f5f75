//! Tab-monitoring transport types and the extension-side session registry.
//!
//! The browser-extension collaborator exchanges a closed set of messages
//! with the dashboard: the dashboard is the sole producer of start/stop
//! commands and the sole consumer of tab notifications. Delivery is
//! at-most-once per tab event with no ordering guarantee across tabs.

use serde::{Deserialize, Serialize};

/// Identifier of a browser tab, as reported by the extension runtime.
pub type TabId = u32;

/// Lifecycle commands sent to the tab-monitoring collaborator.
///
/// Duplicate commands must be tolerated as no-ops on the receiving side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonitorCommand {
    StartMonitoring,
    StopMonitoring,
}

/// Wire messages on the dashboard <-> extension channel.
///
/// The tag values match the extension's message protocol
/// (`START_SESSION` / `STOP_SESSION` / `CURRENT_TAB_INFO`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MonitorMessage {
    #[serde(rename = "START_SESSION")]
    StartMonitoring,
    #[serde(rename = "STOP_SESSION")]
    StopMonitoring,
    #[serde(rename = "CURRENT_TAB_INFO")]
    TabInfo { url: String, title: String },
}

impl From<MonitorCommand> for MonitorMessage {
    fn from(command: MonitorCommand) -> Self {
        match command {
            MonitorCommand::StartMonitoring => MonitorMessage::StartMonitoring,
            MonitorCommand::StopMonitoring => MonitorMessage::StopMonitoring,
        }
    }
}

/// Extension-side monitoring state with an explicit lifecycle.
///
/// Created once on extension startup, mutated only by the two documented
/// commands, and reset to defaults on stop. Replaces ad-hoc module-level
/// flags with one owned object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitorRegistry {
    session_active: bool,
    dashboard_tab: Option<TabId>,
}

impl MonitorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a command received from the dashboard tab.
    ///
    /// `sender` is the tab the command arrived from; for start commands it
    /// becomes the dashboard tab that tab notifications are routed to.
    /// Both commands are idempotent.
    pub fn apply(&mut self, command: MonitorCommand, sender: Option<TabId>) {
        match command {
            MonitorCommand::StartMonitoring => {
                self.session_active = true;
                if sender.is_some() {
                    self.dashboard_tab = sender;
                }
            }
            MonitorCommand::StopMonitoring => {
                *self = Self::default();
            }
        }
    }

    pub fn is_active(&self) -> bool {
        self.session_active
    }

    pub fn dashboard_tab(&self) -> Option<TabId> {
        self.dashboard_tab
    }

    /// Should a foreground-tab event be relayed to the dashboard?
    ///
    /// All tab activations are relayed while monitoring is active, the
    /// dashboard's own tab included: its URL matches the seeded study-site
    /// origin, so returning to the dashboard reads as allowed browsing.
    pub fn should_relay(&self) -> bool {
        self.session_active && self.dashboard_tab.is_some()
    }

    /// Should a start/stop broadcast reach this tab?
    /// The dashboard's own tab is excluded from broadcasts.
    pub fn should_broadcast_to(&self, tab: TabId) -> bool {
        self.dashboard_tab != Some(tab)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_tags_match_extension_protocol() {
        let info = MonitorMessage::TabInfo {
            url: "https://en.wikipedia.org/wiki/X".into(),
            title: "X".into(),
        };
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["type"], "CURRENT_TAB_INFO");
        assert_eq!(json["url"], "https://en.wikipedia.org/wiki/X");

        assert_eq!(
            serde_json::to_value(MonitorMessage::StartMonitoring).unwrap()["type"],
            "START_SESSION"
        );
        assert_eq!(
            serde_json::to_value(MonitorMessage::StopMonitoring).unwrap()["type"],
            "STOP_SESSION"
        );
    }

    #[test]
    fn test_registry_lifecycle() {
        let mut registry = MonitorRegistry::new();
        assert!(!registry.is_active());
        assert!(!registry.should_relay());

        registry.apply(MonitorCommand::StartMonitoring, Some(7));
        assert!(registry.is_active());
        assert_eq!(registry.dashboard_tab(), Some(7));
        assert!(registry.should_relay());

        registry.apply(MonitorCommand::StopMonitoring, None);
        assert_eq!(registry, MonitorRegistry::default());
    }

    #[test]
    fn test_duplicate_commands_are_noops() {
        let mut registry = MonitorRegistry::new();
        registry.apply(MonitorCommand::StartMonitoring, Some(7));
        registry.apply(MonitorCommand::StartMonitoring, Some(7));
        assert!(registry.is_active());
        assert_eq!(registry.dashboard_tab(), Some(7));

        registry.apply(MonitorCommand::StopMonitoring, None);
        registry.apply(MonitorCommand::StopMonitoring, None);
        assert!(!registry.is_active());
    }

    #[test]
    fn test_broadcast_excludes_dashboard_tab() {
        let mut registry = MonitorRegistry::new();
        registry.apply(MonitorCommand::StartMonitoring, Some(7));
        assert!(!registry.should_broadcast_to(7));
        assert!(registry.should_broadcast_to(8));
    }
}
