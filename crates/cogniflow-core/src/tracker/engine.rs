//! The focus state machine.
//!
//! Owns the canonical [`FocusStatus`] and applies every transition rule
//! from the signal sources. The engine holds no timers and spawns no
//! threads: the runtime funnels all signals and periodic ticks into it on
//! one loop, so there are never concurrent writers to the status.
//!
//! ## State transitions
//!
//! ```text
//! Inactive --start session--> Active
//! Active --idle confirmed negative / hidden / url not allowed--> Distracted
//! Distracted --allowed url (mismatch-caused) / back to focus--> Active
//! Active|Distracted --stop session--> Inactive
//! Inactive --start break--> OnBreak --end break--> Inactive
//! ```
//!
//! Command methods return the events the transition produced; an empty
//! vector means the command did not apply in the current state.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::momentum::{Momentum, MomentumConfig};
use super::policy::TrackerPolicy;
use crate::allowlist::AllowedUrlSet;
use crate::error::ValidationError;
use crate::events::Event;
use crate::monitor::MonitorCommand;
use crate::session::Session;

/// Canonical focus status. Exactly one value at any instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FocusStatus {
    #[default]
    Inactive,
    Active,
    Distracted,
    OnBreak,
}

/// Why the user is currently considered distracted.
///
/// Only a `UrlMismatch` distraction can be programmatically restored to
/// Active by an allowed tab-change; the other causes require explicit
/// user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistractionCause {
    /// Idle prompt answered negatively or timed out.
    Idle,
    /// Dashboard tab/window was hidden.
    Hidden,
    /// Foreground tab left the allowlist.
    UrlMismatch,
}

/// The session currently being tracked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentSession {
    pub id: String,
    pub subject: String,
}

/// Reject a session subject before any store call is made.
pub fn validate_subject(subject: &str) -> Result<(), ValidationError> {
    if subject.trim().is_empty() {
        return Err(ValidationError::MissingSubject);
    }
    Ok(())
}

/// The focus-state reconciliation engine.
///
/// Tick-driven: the caller invokes [`FocusEngine::tick`] once per second
/// (or with a larger batch after a stall) and exactly one of the focus /
/// distracted / break counters advances, gated by the status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FocusEngine {
    status: FocusStatus,
    policy: TrackerPolicy,
    momentum: Momentum,
    session: Option<CurrentSession>,
    allowed: AllowedUrlSet,
    distraction_cause: Option<DistractionCause>,
    current_focus_secs: u64,
    current_distracted_secs: u64,
    break_secs: u64,
}

impl FocusEngine {
    pub fn new(policy: TrackerPolicy, momentum_config: MomentumConfig) -> Self {
        Self::with_momentum(policy, Momentum::new(momentum_config))
    }

    /// Create an engine seeded with streak/fatigue from a fetched profile.
    pub fn with_momentum(policy: TrackerPolicy, momentum: Momentum) -> Self {
        Self {
            status: FocusStatus::Inactive,
            policy,
            momentum,
            session: None,
            allowed: AllowedUrlSet::empty(),
            distraction_cause: None,
            current_focus_secs: 0,
            current_distracted_secs: 0,
            break_secs: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn status(&self) -> FocusStatus {
        self.status
    }

    pub fn policy(&self) -> TrackerPolicy {
        self.policy
    }

    pub fn session(&self) -> Option<&CurrentSession> {
        self.session.as_ref()
    }

    pub fn allowed_sites(&self) -> &AllowedUrlSet {
        &self.allowed
    }

    pub fn distraction_cause(&self) -> Option<DistractionCause> {
        self.distraction_cause
    }

    pub fn focus_secs(&self) -> u64 {
        self.current_focus_secs
    }

    pub fn distracted_secs(&self) -> u64 {
        self.current_distracted_secs
    }

    pub fn break_secs(&self) -> u64 {
        self.break_secs
    }

    pub fn focus_streak(&self) -> u32 {
        self.momentum.focus_streak()
    }

    pub fn fatigue_level(&self) -> u8 {
        self.momentum.fatigue_level()
    }

    /// A session is "current" iff one exists and the status is Active or
    /// Distracted. During OnBreak no session is current.
    pub fn is_session_current(&self) -> bool {
        self.session.is_some()
            && matches!(self.status, FocusStatus::Active | FocusStatus::Distracted)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            status: self.status,
            session_id: self.session.as_ref().map(|s| s.id.clone()),
            focus_secs: self.current_focus_secs,
            distracted_secs: self.current_distracted_secs,
            break_secs: self.break_secs,
            focus_streak: self.momentum.focus_streak(),
            fatigue_level: self.momentum.fatigue_level(),
            at: Utc::now(),
        }
    }

    // ── Session lifecycle ────────────────────────────────────────────

    /// Start tracking a freshly-created store session.
    ///
    /// Resets both timers to 0 and replaces the allowlist with the
    /// study-site origin plus the session's fragments. Only applies from
    /// Inactive. Issues the start-monitoring command exactly once.
    pub fn start_session(&mut self, session: &Session, study_origin: &str) -> Vec<Event> {
        if self.status != FocusStatus::Inactive {
            return Vec::new();
        }
        self.session = Some(CurrentSession {
            id: session.id.clone(),
            subject: session.subject.clone(),
        });
        self.allowed = AllowedUrlSet::for_session(study_origin, &session.allowed_sites);
        self.current_focus_secs = 0;
        self.current_distracted_secs = 0;
        self.distraction_cause = None;

        let mut events = vec![Event::SessionStarted {
            session_id: session.id.clone(),
            subject: session.subject.clone(),
            allowed_sites: self.allowed.fragments().to_vec(),
            at: Utc::now(),
        }];
        events.push(self.transition(FocusStatus::Active, None));
        events.push(Event::MonitorCommand {
            command: MonitorCommand::StartMonitoring,
            at: Utc::now(),
        });
        events
    }

    /// Stop the current session, finalizing its counters.
    ///
    /// The streak is not reset; counters keep their values until the next
    /// session start so callers can build the final store update from the
    /// emitted `SessionCompleted` event.
    pub fn stop_session(&mut self) -> Vec<Event> {
        if !matches!(self.status, FocusStatus::Active | FocusStatus::Distracted) {
            return Vec::new();
        }
        let Some(session) = self.session.take() else {
            return Vec::new();
        };
        self.allowed = AllowedUrlSet::empty();
        let mut events = vec![Event::SessionCompleted {
            session_id: session.id,
            duration_secs: self.current_focus_secs + self.current_distracted_secs,
            focus_secs: self.current_focus_secs,
            distracted_secs: self.current_distracted_secs,
            at: Utc::now(),
        }];
        events.push(self.transition(FocusStatus::Inactive, None));
        events.push(Event::MonitorCommand {
            command: MonitorCommand::StopMonitoring,
            at: Utc::now(),
        });
        events
    }

    /// The store reported the session id unknown: stop tracking it rather
    /// than silently continuing to sync against a dead record.
    pub fn orphan_session(&mut self) -> Vec<Event> {
        let Some(session) = self.session.take() else {
            return Vec::new();
        };
        self.allowed = AllowedUrlSet::empty();
        let mut events = vec![Event::SessionOrphaned {
            session_id: session.id,
            at: Utc::now(),
        }];
        if self.status != FocusStatus::Inactive {
            events.push(self.transition(FocusStatus::Inactive, None));
        }
        events.push(Event::MonitorCommand {
            command: MonitorCommand::StopMonitoring,
            at: Utc::now(),
        });
        events
    }

    // ── Breaks ───────────────────────────────────────────────────────

    pub fn start_break(&mut self) -> Vec<Event> {
        if self.status != FocusStatus::Inactive {
            return Vec::new();
        }
        self.break_secs = 0;
        vec![
            Event::BreakStarted { at: Utc::now() },
            self.transition(FocusStatus::OnBreak, None),
        ]
    }

    /// End the break: fatigue resets to 0, the streak persists, and both
    /// session timers go back to 0 for a fresh start.
    pub fn end_break(&mut self) -> Vec<Event> {
        if self.status != FocusStatus::OnBreak {
            return Vec::new();
        }
        self.momentum.reset_fatigue();
        self.current_focus_secs = 0;
        self.current_distracted_secs = 0;
        let events = vec![
            Event::BreakEnded {
                break_secs: self.break_secs,
                at: Utc::now(),
            },
            self.transition(FocusStatus::Inactive, None),
        ];
        self.break_secs = 0;
        events
    }

    // ── Distraction signals ──────────────────────────────────────────

    /// The user explicitly clicked "back to focus".
    pub fn back_to_focus(&mut self) -> Vec<Event> {
        if self.status != FocusStatus::Distracted {
            return Vec::new();
        }
        vec![self.transition(FocusStatus::Active, None)]
    }

    /// The dashboard tab/window became hidden.
    pub fn on_visibility_hidden(&mut self) -> Vec<Event> {
        if !self.policy.distract_on_hidden || self.status != FocusStatus::Active {
            return Vec::new();
        }
        vec![self.distract(DistractionCause::Hidden)]
    }

    /// The idle prompt resolved against the user (negative answer or
    /// timeout).
    pub fn on_idle_confirmed_distracted(&mut self) -> Vec<Event> {
        if self.status != FocusStatus::Active {
            return Vec::new();
        }
        vec![self.distract(DistractionCause::Idle)]
    }

    /// A foreground-tab notification arrived from the monitor.
    ///
    /// Ignored unless a session is current. A disallowed URL drives the
    /// machine to Distracted; an allowed URL restores Active only when the
    /// standing distraction was URL-caused (and the policy permits it).
    pub fn on_tab_info(&mut self, url: &str) -> Vec<Event> {
        if !self.is_session_current() {
            return Vec::new();
        }
        if self.allowed.is_allowed(url) {
            if self.status == FocusStatus::Distracted
                && self.distraction_cause == Some(DistractionCause::UrlMismatch)
                && self.policy.allowlist_restore
            {
                return vec![self.transition(FocusStatus::Active, None)];
            }
            return Vec::new();
        }
        match self.status {
            FocusStatus::Active => vec![self.distract(DistractionCause::UrlMismatch)],
            FocusStatus::Distracted => {
                // Already distracted: the latest evidence is a URL mismatch,
                // so an allowed tab may now restore focus.
                self.distraction_cause = Some(DistractionCause::UrlMismatch);
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    // ── Time accrual ─────────────────────────────────────────────────

    /// Apply `seconds` elapsed ticks.
    ///
    /// Exactly one counter advances, gated by the status; nothing accrues
    /// while Inactive. Batches larger than one honor every streak/fatigue
    /// multiple crossed.
    pub fn tick(&mut self, seconds: u64) -> Vec<Event> {
        if seconds == 0 {
            return Vec::new();
        }
        match self.status {
            FocusStatus::Active => {
                let before = self.current_focus_secs;
                self.current_focus_secs += seconds;
                let delta = self.momentum.on_focus_accrued(before, self.current_focus_secs);
                let mut events = Vec::new();
                let streak_now = self.momentum.focus_streak();
                for i in 0..delta.streaks_completed {
                    events.push(Event::StreakCompleted {
                        focus_streak: streak_now - delta.streaks_completed + i + 1,
                        at: Utc::now(),
                    });
                }
                if delta.fatigue_raises > 0 {
                    events.push(Event::FatigueRaised {
                        fatigue_level: self.momentum.fatigue_level(),
                        at: Utc::now(),
                    });
                }
                events
            }
            FocusStatus::Distracted => {
                self.current_distracted_secs += seconds;
                Vec::new()
            }
            FocusStatus::OnBreak => {
                self.break_secs += seconds;
                Vec::new()
            }
            FocusStatus::Inactive => Vec::new(),
        }
    }

    // ── Internals ────────────────────────────────────────────────────

    fn distract(&mut self, cause: DistractionCause) -> Event {
        self.transition(FocusStatus::Distracted, Some(cause))
    }

    fn transition(&mut self, to: FocusStatus, cause: Option<DistractionCause>) -> Event {
        let from = self.status;
        self.status = to;
        self.distraction_cause = if to == FocusStatus::Distracted {
            cause
        } else {
            None
        };
        Event::StatusChanged {
            from,
            to,
            cause: self.distraction_cause,
            at: Utc::now(),
        }
    }
}
