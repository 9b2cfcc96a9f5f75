//! End-to-end scenarios for the focus state machine, driven the way the
//! runtime drives it: signals interleaved with per-second ticks.

use cogniflow_core::{
    Event, FocusEngine, FocusStatus, MomentumConfig, Session, SyncScheduler, TrackerPolicy,
};

fn start(engine: &mut FocusEngine, sites: &[&str]) {
    let session = Session::new_local("Math", sites.iter().map(|s| s.to_string()).collect());
    let events = engine.start_session(&session, "app.local");
    assert!(!events.is_empty(), "session should start from Inactive");
}

#[test]
fn scenario_wikipedia_allowed_youtube_distracts() {
    let mut engine = FocusEngine::new(TrackerPolicy::default(), MomentumConfig::default());
    start(&mut engine, &["wikipedia.org"]);

    engine.on_tab_info("https://en.wikipedia.org/wiki/X");
    assert_eq!(engine.status(), FocusStatus::Active);

    engine.on_tab_info("https://youtube.com");
    assert_eq!(engine.status(), FocusStatus::Distracted);

    engine.on_tab_info("https://en.wikipedia.org/wiki/X");
    assert_eq!(engine.status(), FocusStatus::Active);
}

#[test]
fn scenario_1500_consecutive_active_ticks() {
    let mut engine = FocusEngine::new(TrackerPolicy::default(), MomentumConfig::default());
    start(&mut engine, &[]);

    for _ in 0..1500 {
        engine.tick(1);
    }
    assert_eq!(engine.focus_streak(), 1);
    assert_eq!(engine.focus_secs(), 1500);
}

#[test]
fn scenario_stop_session_final_update() {
    let mut engine = FocusEngine::new(TrackerPolicy::default(), MomentumConfig::default());
    start(&mut engine, &["wikipedia.org"]);

    engine.tick(120);
    engine.on_tab_info("https://youtube.com");
    engine.tick(30);

    let events = engine.stop_session();
    let completed = events
        .iter()
        .find_map(|e| match e {
            Event::SessionCompleted {
                focus_secs,
                distracted_secs,
                duration_secs,
                ..
            } => Some((*focus_secs, *distracted_secs, *duration_secs)),
            _ => None,
        })
        .expect("stop must emit SessionCompleted");
    assert_eq!(completed, (120, 30, 150));

    let patch = SyncScheduler::final_patch(completed.0, completed.1);
    assert_eq!(patch.duration, Some(150));
    assert_eq!(
        serde_json::to_value(&patch).unwrap()["status"],
        serde_json::json!("Completed")
    );
}

#[test]
fn scenario_focus_counter_advances_only_while_active() {
    let mut engine = FocusEngine::new(TrackerPolicy::default(), MomentumConfig::default());

    // Inactive: nothing accrues.
    engine.tick(60);
    assert_eq!(engine.focus_secs(), 0);

    start(&mut engine, &["wikipedia.org"]);
    engine.tick(60);
    assert_eq!(engine.focus_secs(), 60);

    engine.on_tab_info("https://youtube.com");
    engine.tick(60);
    assert_eq!(engine.focus_secs(), 60);
    assert_eq!(engine.distracted_secs(), 60);

    engine.stop_session();
    engine.tick(60);
    assert_eq!(engine.focus_secs(), 60);

    // OnBreak: only the break counter moves.
    engine.start_break();
    engine.tick(60);
    assert_eq!(engine.break_secs(), 60);
    assert_eq!(engine.focus_secs(), 60);
}

#[test]
fn scenario_streak_survives_sessions_fatigue_resets_on_break() {
    let mut engine = FocusEngine::new(TrackerPolicy::default(), MomentumConfig::default());

    start(&mut engine, &[]);
    engine.tick(3600);
    engine.stop_session();
    assert_eq!(engine.focus_streak(), 2); // 2 x 25 min completed
    assert_eq!(engine.fatigue_level(), 5);

    start(&mut engine, &[]);
    assert_eq!(engine.focus_secs(), 0, "new session resets the timer");
    assert_eq!(engine.focus_streak(), 2, "streak persists across sessions");
    engine.stop_session();

    engine.start_break();
    engine.tick(300);
    engine.end_break();
    assert_eq!(engine.fatigue_level(), 0);
    assert_eq!(engine.focus_streak(), 2);
}

#[test]
fn scenario_new_session_replaces_allowlist() {
    let mut engine = FocusEngine::new(TrackerPolicy::default(), MomentumConfig::default());

    start(&mut engine, &["wikipedia.org"]);
    assert!(engine.allowed_sites().is_allowed("https://wikipedia.org"));
    engine.stop_session();
    assert!(engine.allowed_sites().is_empty());

    let session = Session::new_local("History", vec!["docs.rs".into()]);
    engine.start_session(&session, "app.local");
    assert!(engine.allowed_sites().is_allowed("https://docs.rs"));
    assert!(!engine.allowed_sites().is_allowed("https://wikipedia.org"));
}
