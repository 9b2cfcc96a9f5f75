//! Streak and fatigue derivation from accumulated focus time.
//!
//! Watches focus-second accrual and derives two counters:
//! - **Focus streak**: +1 per completed 25-minute continuous-focus interval.
//! - **Fatigue level**: +5 (clamped to 100) per 60-minute interval; never
//!   decays with elapsed time, reset to 0 only by an explicit end-break.
//!
//! Accrual may arrive in batches larger than one second, so the derivation
//! counts every multiple crossed between the pre- and post-increment values
//! instead of assuming single-unit steps.

use serde::{Deserialize, Serialize};

/// Thresholds for streak and fatigue derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MomentumConfig {
    /// Focus seconds per streak increment.
    #[serde(default = "default_streak_interval")]
    pub streak_interval_secs: u64,
    /// Focus seconds per fatigue increment.
    #[serde(default = "default_fatigue_interval")]
    pub fatigue_interval_secs: u64,
    /// Fatigue percentage points added per interval.
    #[serde(default = "default_fatigue_step")]
    pub fatigue_step: u8,
}

impl Default for MomentumConfig {
    fn default() -> Self {
        Self {
            streak_interval_secs: default_streak_interval(),
            fatigue_interval_secs: default_fatigue_interval(),
            fatigue_step: default_fatigue_step(),
        }
    }
}

fn default_streak_interval() -> u64 {
    25 * 60
}

fn default_fatigue_interval() -> u64 {
    60 * 60
}

fn default_fatigue_step() -> u8 {
    5
}

const FATIGUE_MAX: u8 = 100;

/// What a focus accrual produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MomentumDelta {
    pub streaks_completed: u32,
    pub fatigue_raises: u32,
}

impl MomentumDelta {
    pub fn is_empty(&self) -> bool {
        self.streaks_completed == 0 && self.fatigue_raises == 0
    }
}

/// Streak and fatigue state, carried across sessions and breaks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Momentum {
    focus_streak: u32,
    /// 0-100.
    fatigue_level: u8,
    config: MomentumConfig,
}

impl Momentum {
    pub fn new(config: MomentumConfig) -> Self {
        Self {
            focus_streak: 0,
            fatigue_level: 0,
            config,
        }
    }

    /// Seed from a fetched user profile.
    pub fn with_profile(config: MomentumConfig, focus_streak: u32, fatigue_level: u8) -> Self {
        Self {
            focus_streak,
            fatigue_level: fatigue_level.min(FATIGUE_MAX),
            config,
        }
    }

    pub fn focus_streak(&self) -> u32 {
        self.focus_streak
    }

    pub fn fatigue_level(&self) -> u8 {
        self.fatigue_level
    }

    /// Apply a focus-time accrual from `before` to `after` seconds.
    ///
    /// Uses the post-increment value, honoring every multiple crossed in
    /// the batch: no double counting, no missed multiples.
    pub fn on_focus_accrued(&mut self, before: u64, after: u64) -> MomentumDelta {
        debug_assert!(after >= before);
        let streaks = multiples_crossed(before, after, self.config.streak_interval_secs);
        self.focus_streak = self.focus_streak.saturating_add(streaks);

        let raises = multiples_crossed(before, after, self.config.fatigue_interval_secs);
        for _ in 0..raises {
            self.fatigue_level = self
                .fatigue_level
                .saturating_add(self.config.fatigue_step)
                .min(FATIGUE_MAX);
        }

        MomentumDelta {
            streaks_completed: streaks,
            fatigue_raises: raises,
        }
    }

    /// Explicit end-break: fatigue resets to 0, streak persists.
    pub fn reset_fatigue(&mut self) {
        self.fatigue_level = 0;
    }
}

/// Number of exact multiples of `interval` in `(before, after]`.
fn multiples_crossed(before: u64, after: u64, interval: u64) -> u32 {
    if interval == 0 {
        return 0;
    }
    (after / interval - before / interval) as u32
}
