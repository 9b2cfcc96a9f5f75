//! The tracker runtime: one single-threaded event loop.
//!
//! All signal sources (activity, visibility, tab notifications, prompt
//! answers, user commands) funnel into one mpsc channel, and one 1-second
//! interval drives time accrual, idle polling, and the session sync tick.
//! The loop is the only writer to the focus status; the sync scheduler's
//! spawned requests never touch engine state directly and report back
//! through the fault channel instead.
//!
//! Timers are owned by the loop itself. Re-arming happens by reading the
//! engine state each tick, so state transitions can never leave a stale
//! duplicate timer running.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use crate::config::TrackerConfig;
use crate::events::Event;
use crate::session::Session;
use crate::sync::{StudyClient, SyncFault, SyncScheduler};
use crate::tracker::{
    validate_subject, FocusEngine, FocusStatus, IdleMonitor, IdleSignal, PromptOutcome,
};

const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Everything that can ask the state machine to move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    /// Any user interaction (mouse, key, scroll).
    Activity,
    /// The dashboard tab/window became hidden.
    VisibilityHidden,
    /// The dashboard tab/window became visible again. Does not restore
    /// Active; it only counts as interaction for the idle monitor.
    VisibilityVisible,
    /// Foreground-tab notification relayed by the monitor collaborator.
    TabInfo { url: String, title: String },
    /// Answer to the idle confirmation prompt.
    PromptAnswer { still_focused: bool },
    StartSession { subject: String, sites: Vec<String> },
    StopSession,
    StartBreak,
    EndBreak,
    BackToFocus,
    /// Emit a full state snapshot event.
    Snapshot,
    Shutdown,
}

/// The single-threaded tracker loop.
///
/// Owns the engine and the idle monitor; communicates with the outside
/// world only through the signal receiver and the event sender.
pub struct TrackerRuntime {
    engine: FocusEngine,
    idle: IdleMonitor,
    scheduler: Option<SyncScheduler>,
    client: Option<Arc<StudyClient>>,
    config: TrackerConfig,
    signals: mpsc::Receiver<Signal>,
    events: mpsc::UnboundedSender<Event>,
    faults_rx: mpsc::UnboundedReceiver<SyncFault>,
}

impl TrackerRuntime {
    /// Build a runtime. `client: None` runs offline: sessions are created
    /// locally and nothing is synced.
    pub fn new(
        config: TrackerConfig,
        engine: FocusEngine,
        client: Option<StudyClient>,
        signals: mpsc::Receiver<Signal>,
        events: mpsc::UnboundedSender<Event>,
    ) -> Self {
        let (faults_tx, faults_rx) = mpsc::unbounded_channel();
        let client = client.map(Arc::new);
        let scheduler = client
            .as_ref()
            .map(|c| SyncScheduler::new(Arc::clone(c), faults_tx));
        let idle = IdleMonitor::new(config.idle, Utc::now());
        Self {
            engine,
            idle,
            scheduler,
            client,
            config,
            signals,
            events,
            faults_rx,
        }
    }

    /// Run until `Signal::Shutdown` or the signal channel closes.
    pub async fn run(mut self) {
        let mut ticker = tokio::time::interval(TICK_PERIOD);
        // Catch up tick-by-tick after a stall; streak/fatigue multiples
        // crossed during the stall are still honored by batched accrual
        // inside the engine.
        ticker.set_missed_tick_behavior(MissedTickBehavior::Burst);

        loop {
            tokio::select! {
                _ = ticker.tick() => self.on_tick(),
                Some(fault) = self.faults_rx.recv() => self.on_fault(fault),
                signal = self.signals.recv() => match signal {
                    None => break,
                    Some(Signal::Shutdown) => {
                        self.shutdown().await;
                        break;
                    }
                    Some(signal) => self.on_signal(signal).await,
                },
            }
        }
    }

    fn on_tick(&mut self) {
        // Sync first, from pre-tick counters: at most one update per tick.
        if self.engine.is_session_current() {
            if let (Some(scheduler), Some(session)) = (&self.scheduler, self.engine.session()) {
                scheduler.dispatch(session.id.clone(), SyncScheduler::tick_patch(&self.engine));
            }
        }

        let events = self.engine.tick(1);
        self.emit(events);

        if self.engine.status() == FocusStatus::Active && self.engine.policy().idle_detection {
            let now = Utc::now();
            match self.idle.poll(now) {
                Some(IdleSignal::PromptDue) => {
                    self.emit(vec![Event::PromptOpened {
                        deadline_secs: self.idle.config().prompt_timeout_secs,
                        at: now,
                    }]);
                }
                Some(IdleSignal::PromptTimedOut) => {
                    self.emit(vec![Event::PromptResolved {
                        outcome: PromptOutcome::TimedOut,
                        at: now,
                    }]);
                    let events = self.engine.on_idle_confirmed_distracted();
                    self.emit(events);
                }
                None => {}
            }
        }
    }

    async fn on_signal(&mut self, signal: Signal) {
        match signal {
            Signal::Activity | Signal::VisibilityVisible => {
                self.idle.on_activity(Utc::now());
            }
            Signal::VisibilityHidden => {
                let events = self.engine.on_visibility_hidden();
                self.emit(events);
            }
            Signal::TabInfo { url, .. } => {
                let events = self.engine.on_tab_info(&url);
                self.emit(events);
            }
            Signal::PromptAnswer { still_focused } => {
                let now = Utc::now();
                if let Some(outcome) = self.idle.respond(still_focused, now) {
                    self.emit(vec![Event::PromptResolved { outcome, at: now }]);
                    if outcome == PromptOutcome::Distracted {
                        let events = self.engine.on_idle_confirmed_distracted();
                        self.emit(events);
                    }
                }
            }
            Signal::StartSession { subject, sites } => self.start_session(subject, sites).await,
            Signal::StopSession => self.stop_session().await,
            Signal::StartBreak => {
                let events = self.engine.start_break();
                self.emit(events);
            }
            Signal::EndBreak => {
                let events = self.engine.end_break();
                self.emit(events);
            }
            Signal::BackToFocus => {
                let events = self.engine.back_to_focus();
                self.emit(events);
            }
            Signal::Snapshot => {
                self.emit(vec![self.engine.snapshot()]);
            }
            // Intercepted by the run loop; harmless if it gets here.
            Signal::Shutdown => {}
        }
    }

    async fn start_session(&mut self, subject: String, sites: Vec<String>) {
        if let Err(err) = validate_subject(&subject) {
            log::warn!("rejected session start: {err}");
            return;
        }
        let session = match &self.client {
            Some(client) => match client.create_session(&subject, &sites).await {
                Ok(session) => session,
                Err(err) => {
                    log::error!("failed to create session in store: {err}");
                    return;
                }
            },
            None => Session::new_local(subject.clone(), sites.clone()),
        };
        let events = self.engine.start_session(&session, &self.config.study_origin);
        self.emit(events);
    }

    async fn stop_session(&mut self) {
        let events = self.engine.stop_session();
        // Build the final Completed update from the emitted counters.
        if let Some(scheduler) = &self.scheduler {
            if let Some(Event::SessionCompleted {
                session_id,
                focus_secs,
                distracted_secs,
                ..
            }) = events
                .iter()
                .find(|e| matches!(e, Event::SessionCompleted { .. }))
            {
                scheduler
                    .send_now(
                        session_id,
                        SyncScheduler::final_patch(*focus_secs, *distracted_secs),
                    )
                    .await;
            }
        }
        self.emit(events);
    }

    fn on_fault(&mut self, fault: SyncFault) {
        match fault {
            SyncFault::AuthExpired => {
                log::error!("authorization expired: stopping session tracking");
                let events = self.engine.orphan_session();
                self.emit(events);
            }
            SyncFault::SessionNotFound { id } => {
                let current = self.engine.session().map(|s| s.id.clone());
                if current.as_deref() == Some(id.as_str()) {
                    log::error!("session {id} unknown to the store: treating as orphaned");
                    let events = self.engine.orphan_session();
                    self.emit(events);
                }
            }
        }
    }

    async fn shutdown(&mut self) {
        if self.engine.is_session_current() {
            self.stop_session().await;
        }
    }

    fn emit(&mut self, events: Vec<Event>) {
        for event in events {
            // Entering Active starts a fresh idle spell.
            if let Event::StatusChanged {
                to: FocusStatus::Active,
                ..
            } = event
            {
                self.idle.reset(Utc::now());
            }
            let _ = self.events.send(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::{MomentumConfig, TrackerPolicy};

    fn runtime() -> (
        TrackerRuntime,
        mpsc::Sender<Signal>,
        mpsc::UnboundedReceiver<Event>,
    ) {
        let (signals_tx, signals_rx) = mpsc::channel(16);
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let engine = FocusEngine::new(TrackerPolicy::default(), MomentumConfig::default());
        let runtime = TrackerRuntime::new(
            TrackerConfig::default(),
            engine,
            None,
            signals_rx,
            events_tx,
        );
        (runtime, signals_tx, events_rx)
    }

    fn drain(events: &mut mpsc::UnboundedReceiver<Event>) -> Vec<Event> {
        let mut out = Vec::new();
        while let Ok(event) = events.try_recv() {
            out.push(event);
        }
        out
    }

    #[tokio::test]
    async fn test_offline_session_lifecycle() {
        let (mut runtime, _signals, mut events) = runtime();

        runtime
            .on_signal(Signal::StartSession {
                subject: "Math".into(),
                sites: vec!["wikipedia.org".into()],
            })
            .await;
        assert_eq!(runtime.engine.status(), FocusStatus::Active);
        assert!(drain(&mut events)
            .iter()
            .any(|e| matches!(e, Event::SessionStarted { .. })));

        runtime.on_tick();
        runtime.on_tick();
        assert_eq!(runtime.engine.focus_secs(), 2);

        runtime.on_signal(Signal::StopSession).await;
        assert_eq!(runtime.engine.status(), FocusStatus::Inactive);
        assert!(drain(&mut events)
            .iter()
            .any(|e| matches!(e, Event::SessionCompleted { duration_secs: 2, .. })));
    }

    #[tokio::test]
    async fn test_empty_subject_rejected_locally() {
        let (mut runtime, _signals, mut events) = runtime();
        runtime
            .on_signal(Signal::StartSession {
                subject: "  ".into(),
                sites: vec![],
            })
            .await;
        assert_eq!(runtime.engine.status(), FocusStatus::Inactive);
        assert!(drain(&mut events).is_empty());
    }

    #[tokio::test]
    async fn test_tab_signals_drive_distraction() {
        let (mut runtime, _signals, mut events) = runtime();
        runtime
            .on_signal(Signal::StartSession {
                subject: "Math".into(),
                sites: vec!["wikipedia.org".into()],
            })
            .await;

        runtime
            .on_signal(Signal::TabInfo {
                url: "https://youtube.com".into(),
                title: "YouTube".into(),
            })
            .await;
        assert_eq!(runtime.engine.status(), FocusStatus::Distracted);

        runtime
            .on_signal(Signal::TabInfo {
                url: "https://en.wikipedia.org/wiki/X".into(),
                title: "X".into(),
            })
            .await;
        assert_eq!(runtime.engine.status(), FocusStatus::Active);
        drain(&mut events);
    }

    #[tokio::test]
    async fn test_prompt_answer_negative_distracts() {
        let (mut runtime, _signals, mut events) = runtime();
        runtime
            .on_signal(Signal::StartSession {
                subject: "Math".into(),
                sites: vec![],
            })
            .await;
        drain(&mut events);

        // Force a prompt open by rewinding the idle monitor.
        let past = Utc::now() - chrono::Duration::seconds(301);
        runtime.idle.reset(past);
        runtime.on_tick();
        assert!(drain(&mut events)
            .iter()
            .any(|e| matches!(e, Event::PromptOpened { .. })));

        runtime
            .on_signal(Signal::PromptAnswer {
                still_focused: false,
            })
            .await;
        assert_eq!(runtime.engine.status(), FocusStatus::Distracted);
        let emitted = drain(&mut events);
        assert!(emitted.iter().any(|e| matches!(
            e,
            Event::PromptResolved {
                outcome: PromptOutcome::Distracted,
                ..
            }
        )));
    }

    #[tokio::test]
    async fn test_orphan_fault_for_current_session() {
        let (mut runtime, _signals, mut events) = runtime();
        runtime
            .on_signal(Signal::StartSession {
                subject: "Math".into(),
                sites: vec![],
            })
            .await;
        let id = runtime.engine.session().unwrap().id.clone();
        drain(&mut events);

        runtime.on_fault(SyncFault::SessionNotFound { id });
        assert_eq!(runtime.engine.status(), FocusStatus::Inactive);
        assert!(drain(&mut events)
            .iter()
            .any(|e| matches!(e, Event::SessionOrphaned { .. })));
    }

    #[tokio::test]
    async fn test_stale_orphan_fault_ignored() {
        let (mut runtime, _signals, mut events) = runtime();
        runtime
            .on_signal(Signal::StartSession {
                subject: "Math".into(),
                sites: vec![],
            })
            .await;
        drain(&mut events);

        runtime.on_fault(SyncFault::SessionNotFound {
            id: "someone-else".into(),
        });
        assert_eq!(runtime.engine.status(), FocusStatus::Active);
    }
}
