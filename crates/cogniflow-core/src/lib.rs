//! # Cogniflow Core Library
//!
//! This library provides the core logic for the Cogniflow study-focus
//! tracker: it classifies a running study session as Active or Distracted
//! from timer ticks, idle timeouts, visibility changes, and cross-tab URL
//! notifications, accumulates focus/distraction time, derives streaks and
//! fatigue, and reconciles the session record with the remote store once
//! per second.
//!
//! ## Architecture
//!
//! - **Focus engine**: a tick-driven state machine with no internal
//!   threads; the runtime invokes `tick()` and funnels every signal
//!   through one ordered channel
//! - **Allowlist**: one authoritative URL matcher shared by the local
//!   tab-change handler and the store-side check-tab endpoint
//! - **Sync**: fire-and-forget full-state session updates; a failed tick
//!   is superseded by the next one
//! - **Storage**: TOML-based configuration; session records live in the
//!   external store, reached over HTTP
//!
//! ## Key Components
//!
//! - [`FocusEngine`]: the focus/distraction state machine
//! - [`TrackerRuntime`]: the single-threaded event loop driving it
//! - [`AllowedUrlSet`]: per-session URL allowlist
//! - [`StudyClient`]: session store / auth client
//! - [`TrackerConfig`]: application configuration

pub mod allowlist;
pub mod config;
pub mod error;
pub mod events;
pub mod monitor;
pub mod runtime;
pub mod session;
pub mod stats;
pub mod sync;
pub mod tracker;

pub use allowlist::{domain_of, is_allowed, AllowedUrlSet};
pub use config::{ApiConfig, TrackerConfig};
pub use error::{ApiError, ConfigError, CoreError, ValidationError};
pub use events::Event;
pub use monitor::{MonitorCommand, MonitorMessage, MonitorRegistry};
pub use runtime::{Signal, TrackerRuntime};
pub use session::{Profile, Session, SessionPatch, SessionStatus};
pub use stats::{weekly_focus, WeeklyBucket};
pub use sync::{StudyClient, SyncFault, SyncScheduler};
pub use tracker::{
    DistractionCause, FocusEngine, FocusStatus, IdleConfig, IdleMonitor, Momentum,
    MomentumConfig, TrackerPolicy,
};
