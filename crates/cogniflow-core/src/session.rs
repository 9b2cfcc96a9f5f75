//! Study session entity and wire types for the session store.
//!
//! The store speaks camelCase JSON with Mongo-style `_id` keys; the serde
//! attributes here pin that wire shape so local code can use Rust naming.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a stored session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SessionStatus {
    #[default]
    Active,
    Completed,
}

/// One timed study interval with a subject and an allowlist of permitted
/// websites, as persisted by the session store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub subject: String,
    #[serde(default, rename = "allowedSites")]
    pub allowed_sites: Vec<String>,
    /// Total duration in seconds (focus + distracted).
    #[serde(default)]
    pub duration: u64,
    /// Seconds spent focused.
    #[serde(default, rename = "focusTime")]
    pub focus_time: u64,
    /// Seconds spent distracted.
    #[serde(default, rename = "distractedTime")]
    pub distracted_time: u64,
    #[serde(default)]
    pub status: SessionStatus,
    #[serde(rename = "createdAt", default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Create a session locally, without the store (offline mode, tests).
    /// The store normally assigns ids; local sessions get a fresh UUID.
    pub fn new_local<S: Into<String>>(subject: S, allowed_sites: Vec<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            subject: subject.into(),
            allowed_sites,
            duration: 0,
            focus_time: 0,
            distracted_time: 0,
            status: SessionStatus::Active,
            created_at: Utc::now(),
        }
    }
}

/// Request body for `POST /study`.
#[derive(Debug, Clone, Serialize)]
pub struct NewSession<'a> {
    pub subject: &'a str,
    #[serde(rename = "allowedSites")]
    pub allowed_sites: &'a [String],
    pub duration: u64,
}

/// Partial update body for `PATCH /study/:id`. Only provided fields change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    #[serde(rename = "focusTime", skip_serializing_if = "Option::is_none")]
    pub focus_time: Option<u64>,
    #[serde(rename = "distractedTime", skip_serializing_if = "Option::is_none")]
    pub distracted_time: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<SessionStatus>,
}

/// User profile fields consumed from `GET /auth/profile`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, rename = "focusStreak")]
    pub focus_streak: u32,
    #[serde(default, rename = "fatigueLevel")]
    pub fatigue_level: u8,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_wire_shape() {
        let json = r#"{
            "_id": "abc123",
            "subject": "Mathematics",
            "allowedSites": ["wikipedia.org"],
            "duration": 150,
            "focusTime": 120,
            "distractedTime": 30,
            "status": "Completed",
            "createdAt": "2024-03-04T10:00:00Z"
        }"#;
        let session: Session = serde_json::from_str(json).unwrap();
        assert_eq!(session.id, "abc123");
        assert_eq!(session.duration, 150);
        assert_eq!(session.focus_time, 120);
        assert_eq!(session.status, SessionStatus::Completed);
    }

    #[test]
    fn test_session_defaults_missing_counters() {
        let json = r#"{"_id": "abc", "subject": "History", "createdAt": "2024-03-04T10:00:00Z"}"#;
        let session: Session = serde_json::from_str(json).unwrap();
        assert_eq!(session.duration, 0);
        assert_eq!(session.status, SessionStatus::Active);
        assert!(session.allowed_sites.is_empty());
    }

    #[test]
    fn test_patch_skips_absent_fields() {
        let patch = SessionPatch {
            duration: Some(151),
            focus_time: Some(120),
            distracted_time: Some(30),
            status: None,
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json["duration"], 151);
        assert_eq!(json["focusTime"], 120);
        assert!(json.get("status").is_none());
    }

    #[test]
    fn test_status_serializes_capitalized() {
        assert_eq!(
            serde_json::to_string(&SessionStatus::Completed).unwrap(),
            "\"Completed\""
        );
    }
}
