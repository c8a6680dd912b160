use pretty_assertions::assert_eq;
use sentiment_core::{
    update, AppState, Badge, BadgeTone, Effect, JobStatus, Msg, SessionPhase, SourceResult,
    StatusSnapshot, ALERT_JOB_ERROR,
};

fn init_logging() {
    engine_logging::initialize_for_tests();
}

fn running_session() -> AppState {
    let (state, _) = update(AppState::new(), Msg::CompanyChanged("Acme Corp".to_string()));
    let (state, _) = update(state, Msg::RunClicked);
    let (state, _) = update(
        state,
        Msg::StartAcknowledged {
            session: 1,
            result: Ok(()),
        },
    );
    state
}

fn snapshot(status: JobStatus, progress: i64, step: &str) -> StatusSnapshot {
    StatusSnapshot {
        status,
        progress,
        step: step.to_string(),
        ..StatusSnapshot::default()
    }
}

/// Issues one tick and answers it with the given snapshot.
fn poll_once(state: AppState, snap: StatusSnapshot) -> (AppState, Vec<Effect>) {
    let tick = state.poller().ticks_issued() + 1;
    let (state, effects) = update(state, Msg::PollTick { session: 1 });
    assert_eq!(effects, vec![Effect::FetchStatus { session: 1, tick }]);
    update(
        state,
        Msg::StatusReceived {
            session: 1,
            result: Ok(snap),
        },
    )
}

#[test]
fn job_runs_to_done_and_stops_polling() {
    init_logging();
    let mut state = running_session();

    for progress in [1, 25, 60, 90] {
        let (next, effects) = poll_once(state, snapshot(JobStatus::Running, progress, "Scraping"));
        assert!(effects.is_empty());
        assert_eq!(next.view().progress.label, format!("{progress}%"));
        state = next;
    }

    let (state, effects) = poll_once(state, snapshot(JobStatus::Done, 100, "Finished"));
    let view = state.view();
    assert_eq!(effects, vec![Effect::StopPolling { session: 1 }]);
    assert_eq!(view.session, SessionPhase::Finished(JobStatus::Done));
    assert!(view.run_enabled);
    assert_eq!(view.alert, None);
    assert_eq!(view.progress.fill, 100);
    assert_eq!(view.progress.badges[0], Badge::ok("DONE"));

    let (state, effects) = update(state, Msg::PollTick { session: 1 });
    assert!(effects.is_empty());
    assert_eq!(state.poller().ticks_issued(), 5);
}

#[test]
fn error_status_is_terminal_and_alerts() {
    init_logging();
    let state = running_session();
    let mut snap = snapshot(JobStatus::Error, 40, "Discovering links");
    snap.error = Some("OpenAI quota exceeded".to_string());

    let (state, effects) = poll_once(state, snap);
    let view = state.view();

    assert_eq!(effects, vec![Effect::StopPolling { session: 1 }]);
    assert_eq!(view.session, SessionPhase::Finished(JobStatus::Error));
    assert!(view.run_enabled);
    assert_eq!(view.alert.as_deref(), Some("OpenAI quota exceeded"));
    assert_eq!(view.progress.badges[0].tone, BadgeTone::Bad);

    let (_, effects) = update(state, Msg::PollTick { session: 1 });
    assert!(effects.is_empty());
}

#[test]
fn error_status_without_message_uses_default_alert() {
    init_logging();
    let (state, _) = poll_once(running_session(), snapshot(JobStatus::Error, 0, ""));
    assert_eq!(state.view().alert.as_deref(), Some(ALERT_JOB_ERROR));
}

#[test]
fn tick_while_fetch_outstanding_is_skipped() {
    init_logging();
    let state = running_session();

    let (state, first) = update(state, Msg::PollTick { session: 1 });
    let (state, second) = update(state, Msg::PollTick { session: 1 });
    let (state, third) = update(state, Msg::PollTick { session: 1 });

    assert_eq!(first, vec![Effect::FetchStatus { session: 1, tick: 1 }]);
    assert!(second.is_empty());
    assert!(third.is_empty());
    assert_eq!(state.view().ticks_skipped, 2);

    let (state, _) = update(
        state,
        Msg::StatusReceived {
            session: 1,
            result: Ok(snapshot(JobStatus::Running, 30, "Scoring")),
        },
    );
    let (_, effects) = update(state, Msg::PollTick { session: 1 });
    assert_eq!(effects, vec![Effect::FetchStatus { session: 1, tick: 2 }]);
}

#[test]
fn poll_error_is_absorbed_and_loop_continues() {
    init_logging();
    let state = running_session();
    let (state, _) = update(state, Msg::PollTick { session: 1 });

    let (state, effects) = update(
        state,
        Msg::StatusReceived {
            session: 1,
            result: Err("connection refused".to_string()),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state.session(), SessionPhase::Running);
    assert_eq!(state.poller().consecutive_failures(), 1);
    assert_eq!(state.view().alert, None);

    let (_, effects) = update(state, Msg::PollTick { session: 1 });
    assert_eq!(effects, vec![Effect::FetchStatus { session: 1, tick: 2 }]);
}

#[test]
fn responses_for_older_session_are_discarded() {
    init_logging();
    let state = running_session();
    let (state, _) = update(state, Msg::PollTick { session: 1 });
    let (state, _) = poll_once_for_restart(state);

    let (state, effects) = update(
        state,
        Msg::StatusReceived {
            session: 1,
            result: Ok(snapshot(JobStatus::Done, 100, "old")),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state.session(), SessionPhase::Running);
    assert_eq!(state.session_id(), 2);
    assert_ne!(state.view().progress.step, "old");
}

/// Finishes session 1 with an error, then starts session 2.
fn poll_once_for_restart(state: AppState) -> (AppState, Vec<Effect>) {
    let (state, _) = update(
        state,
        Msg::StatusReceived {
            session: 1,
            result: Ok(snapshot(JobStatus::Error, 10, "")),
        },
    );
    let (state, _) = update(state, Msg::AlertDismissed);
    let (state, effects) = update(state, Msg::RunClicked);
    assert!(matches!(
        effects.as_slice(),
        [Effect::StartJob { session: 2, .. }]
    ));
    let (state, _) = update(
        state,
        Msg::StartAcknowledged {
            session: 2,
            result: Ok(()),
        },
    );
    let (state, _) = update(state, Msg::PollTick { session: 1 });
    (state, effects)
}

#[test]
fn snapshot_renders_sources_and_tallies() {
    init_logging();
    let mut snap = snapshot(JobStatus::Running, 55, "Scraping sources");
    snap.urls = vec!["https://a.com".to_string(), "https://b.com".to_string()];
    snap.items = vec![
        SourceResult {
            url: "a.com".to_string(),
            ok: true,
            preview: "Great service overall...".to_string(),
        },
        SourceResult {
            url: "b.com".to_string(),
            ok: false,
            preview: String::new(),
        },
    ];

    let (state, _) = poll_once(running_session(), snap);
    let view = state.view();

    assert_eq!(view.sources.ok_count, 1);
    assert_eq!(view.sources.bad_count, 1);
    assert_eq!(view.sources.rows.len(), 2);
    assert_eq!(view.sources.rows[0].badge, Badge::ok("OK"));
    assert_eq!(view.sources.rows[1].badge, Badge::bad("BLOCKED/ERROR"));
    assert_eq!(view.links_count, 2);
}

#[test]
fn snapshot_replaces_previous_render_wholesale() {
    init_logging();
    let mut first = snapshot(JobStatus::Running, 50, "Scraping");
    first.items = vec![SourceResult {
        url: "a.com".to_string(),
        ok: true,
        preview: String::new(),
    }];
    let (state, _) = poll_once(running_session(), first);

    let (state, _) = poll_once(state, snapshot(JobStatus::Running, 60, ""));
    let view = state.view();

    assert!(view.sources.rows.is_empty());
    assert_eq!((view.sources.ok_count, view.sources.bad_count), (0, 0));
    assert_eq!(view.progress.step, sentiment_core::STEP_PLACEHOLDER);
    assert_eq!(state.last_snapshot().map(|s| s.progress), Some(60));
}
