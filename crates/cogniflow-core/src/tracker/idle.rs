//! Idle detection with a non-blocking confirmation prompt.
//!
//! Tracks the last observed user interaction. Once no interaction has been
//! seen for the idle threshold (default 5 minutes), a confirmation prompt
//! opens and races the user's answer against a deadline (default 30
//! seconds). A positive answer cancels the prompt and leaves status
//! unchanged; a negative answer or the deadline expiring both resolve to
//! Distracted. One prompt per idle spell: the spell must end (activity)
//! before another prompt can open.
//!
//! The monitor holds no timers of its own; the runtime polls it from the
//! per-second tick, so all decisions stay on the single-threaded loop.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Idle monitor timing configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdleConfig {
    /// Seconds without interaction before the prompt opens.
    #[serde(default = "default_idle_threshold")]
    pub idle_threshold_secs: u64,
    /// Seconds the user has to answer the prompt.
    #[serde(default = "default_prompt_timeout")]
    pub prompt_timeout_secs: u64,
}

impl Default for IdleConfig {
    fn default() -> Self {
        Self {
            idle_threshold_secs: default_idle_threshold(),
            prompt_timeout_secs: default_prompt_timeout(),
        }
    }
}

fn default_idle_threshold() -> u64 {
    5 * 60
}

fn default_prompt_timeout() -> u64 {
    30
}

/// Edges surfaced to the runtime by [`IdleMonitor::poll`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleSignal {
    /// The idle threshold elapsed; ask the user to confirm focus.
    PromptDue,
    /// The prompt deadline passed without an answer.
    PromptTimedOut,
}

/// How an open prompt was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptOutcome {
    /// User confirmed they are still focused.
    StillFocused,
    /// User admitted distraction.
    Distracted,
    /// No answer before the deadline.
    TimedOut,
}

/// Absence-of-interaction detector.
#[derive(Debug, Clone)]
pub struct IdleMonitor {
    config: IdleConfig,
    last_activity: DateTime<Utc>,
    prompt_opened_at: Option<DateTime<Utc>>,
    /// Set once a prompt fired for the current idle spell.
    spell_flagged: bool,
}

impl IdleMonitor {
    pub fn new(config: IdleConfig, now: DateTime<Utc>) -> Self {
        Self {
            config,
            last_activity: now,
            prompt_opened_at: None,
            spell_flagged: false,
        }
    }

    pub fn config(&self) -> IdleConfig {
        self.config
    }

    pub fn prompt_pending(&self) -> bool {
        self.prompt_opened_at.is_some()
    }

    /// Record a user interaction.
    ///
    /// Returns true when this interaction ended an idle spell. An open
    /// prompt is not auto-answered by raw interaction; it still needs an
    /// explicit response or the deadline.
    pub fn on_activity(&mut self, now: DateTime<Utc>) -> bool {
        self.last_activity = now;
        if self.prompt_pending() {
            return false;
        }
        let was_idle = self.spell_flagged;
        self.spell_flagged = false;
        was_idle
    }

    /// Advance the monitor to `now`, surfacing at most one edge.
    pub fn poll(&mut self, now: DateTime<Utc>) -> Option<IdleSignal> {
        if let Some(opened_at) = self.prompt_opened_at {
            let deadline = opened_at + Duration::seconds(self.config.prompt_timeout_secs as i64);
            if now >= deadline {
                self.prompt_opened_at = None;
                return Some(IdleSignal::PromptTimedOut);
            }
            return None;
        }
        if self.spell_flagged {
            return None;
        }
        let idle_for = now - self.last_activity;
        if idle_for >= Duration::seconds(self.config.idle_threshold_secs as i64) {
            self.prompt_opened_at = Some(now);
            self.spell_flagged = true;
            return Some(IdleSignal::PromptDue);
        }
        None
    }

    /// Resolve an open prompt with the user's answer.
    ///
    /// Returns None when no prompt is pending (late answers are ignored).
    pub fn respond(&mut self, still_focused: bool, now: DateTime<Utc>) -> Option<PromptOutcome> {
        self.prompt_opened_at?;
        self.prompt_opened_at = None;
        if still_focused {
            self.last_activity = now;
            self.spell_flagged = false;
            Some(PromptOutcome::StillFocused)
        } else {
            Some(PromptOutcome::Distracted)
        }
    }

    /// Discard prompt state and restart the spell, e.g. when the status
    /// leaves Active.
    pub fn reset(&mut self, now: DateTime<Utc>) {
        self.last_activity = now;
        self.prompt_opened_at = None;
        self.spell_flagged = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn monitor() -> IdleMonitor {
        IdleMonitor::new(IdleConfig::default(), at(0))
    }

    #[test]
    fn test_no_prompt_before_threshold() {
        let mut idle = monitor();
        assert_eq!(idle.poll(at(299)), None);
    }

    #[test]
    fn test_prompt_opens_at_threshold() {
        let mut idle = monitor();
        assert_eq!(idle.poll(at(300)), Some(IdleSignal::PromptDue));
        assert!(idle.prompt_pending());
        // Only one edge per spell.
        assert_eq!(idle.poll(at(301)), None);
    }

    #[test]
    fn test_prompt_times_out_after_deadline() {
        let mut idle = monitor();
        idle.poll(at(300));
        assert_eq!(idle.poll(at(329)), None);
        assert_eq!(idle.poll(at(330)), Some(IdleSignal::PromptTimedOut));
        assert!(!idle.prompt_pending());
        // The spell is still flagged: no second prompt without activity.
        assert_eq!(idle.poll(at(700)), None);
    }

    #[test]
    fn test_positive_answer_cancels_deadline() {
        let mut idle = monitor();
        idle.poll(at(300));
        assert_eq!(idle.respond(true, at(310)), Some(PromptOutcome::StillFocused));
        assert_eq!(idle.poll(at(340)), None);
        // Threshold counts from the answer now.
        assert_eq!(idle.poll(at(610)), Some(IdleSignal::PromptDue));
    }

    #[test]
    fn test_negative_answer_resolves_immediately() {
        let mut idle = monitor();
        idle.poll(at(300));
        assert_eq!(idle.respond(false, at(305)), Some(PromptOutcome::Distracted));
        assert!(!idle.prompt_pending());
    }

    #[test]
    fn test_late_answer_ignored() {
        let mut idle = monitor();
        assert_eq!(idle.respond(true, at(10)), None);
    }

    #[test]
    fn test_activity_resets_spell() {
        let mut idle = monitor();
        idle.poll(at(300));
        idle.poll(at(330)); // timed out, spell still flagged
        assert!(idle.on_activity(at(400)));
        // A fresh spell can prompt again.
        assert_eq!(idle.poll(at(700)), Some(IdleSignal::PromptDue));
    }

    #[test]
    fn test_activity_does_not_answer_open_prompt() {
        let mut idle = monitor();
        idle.poll(at(300));
        assert!(!idle.on_activity(at(310)));
        assert!(idle.prompt_pending());
        assert_eq!(idle.poll(at(340)), Some(IdleSignal::PromptTimedOut));
    }
}
