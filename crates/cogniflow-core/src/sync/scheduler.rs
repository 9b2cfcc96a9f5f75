//! Session sync scheduling.
//!
//! Once per tick while a session is current, the runtime sends a
//! full-state overwrite of the session's duration/focus/distraction
//! counters to the store. Delivery is fire-and-forget: a failed tick is
//! simply superseded by the next one, and out-of-order arrival is harmless
//! because each update carries the whole state, not a delta.
//!
//! Two failures are not transient and are fed back to the runtime as
//! [`SyncFault`]s: an expired token and an unknown session id.

use std::sync::Arc;

use tokio::sync::mpsc;

use super::client::StudyClient;
use crate::error::ApiError;
use crate::session::{SessionPatch, SessionStatus};
use crate::tracker::FocusEngine;

/// Non-transient sync outcomes the runtime must react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncFault {
    /// The bearer token was rejected; force a return to logged-out state.
    AuthExpired,
    /// The store no longer knows this session; stop syncing it.
    SessionNotFound { id: String },
}

/// Dispatches session updates without blocking the tick loop.
#[derive(Debug, Clone)]
pub struct SyncScheduler {
    client: Arc<StudyClient>,
    faults: mpsc::UnboundedSender<SyncFault>,
}

impl SyncScheduler {
    pub fn new(client: Arc<StudyClient>, faults: mpsc::UnboundedSender<SyncFault>) -> Self {
        Self { client, faults }
    }

    /// The per-tick update, computed from pre-tick counters: the duration
    /// anticipates the in-flight second.
    pub fn tick_patch(engine: &FocusEngine) -> SessionPatch {
        SessionPatch {
            duration: Some(engine.focus_secs() + engine.distracted_secs() + 1),
            focus_time: Some(engine.focus_secs()),
            distracted_time: Some(engine.distracted_secs()),
            status: None,
        }
    }

    /// The final update issued on stop, marking the session Completed.
    pub fn final_patch(focus_secs: u64, distracted_secs: u64) -> SessionPatch {
        SessionPatch {
            duration: Some(focus_secs + distracted_secs),
            focus_time: Some(focus_secs),
            distracted_time: Some(distracted_secs),
            status: Some(SessionStatus::Completed),
        }
    }

    /// Send one update, fire-and-forget. Never blocks the caller.
    pub fn dispatch(&self, session_id: String, patch: SessionPatch) {
        let client = Arc::clone(&self.client);
        let faults = self.faults.clone();
        tokio::spawn(async move {
            if let Err(err) = client.update_session(&session_id, &patch).await {
                report(&faults, &session_id, err);
            }
        });
    }

    /// Send one update and wait for it, e.g. the final Completed patch.
    /// Failures are reported the same way as dispatched ticks; the caller
    /// is never blocked from stopping.
    pub async fn send_now(&self, session_id: &str, patch: SessionPatch) {
        if let Err(err) = self.client.update_session(session_id, &patch).await {
            report(&self.faults, session_id, err);
        }
    }
}

fn report(faults: &mpsc::UnboundedSender<SyncFault>, session_id: &str, err: ApiError) {
    match err {
        ApiError::AuthExpired => {
            let _ = faults.send(SyncFault::AuthExpired);
        }
        ApiError::SessionNotFound { id } => {
            let _ = faults.send(SyncFault::SessionNotFound { id });
        }
        other => {
            // Transient: the next tick's full-state update supersedes this one.
            log::warn!("session sync failed for {session_id}: {other}");
        }
    }
}
