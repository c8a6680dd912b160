use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use sentiment_core::{JobRequest, JobStatus, PredictiveAction, StatusSnapshot};
use sentiment_engine::{
    BackendError, EngineEvent, EngineHandle, EngineSettings, ExportOptions, FailureKind,
    JobBackend, PanelCapture, PanelId, RetryPolicy, TextPanelSurface,
};

const WAIT: Duration = Duration::from_secs(5);

#[derive(Default)]
struct FakeBackend {
    started: Mutex<Vec<JobRequest>>,
    status_failures_left: AtomicU32,
    status_calls: AtomicU32,
}

#[async_trait::async_trait]
impl JobBackend for FakeBackend {
    async fn start_job(&self, request: &JobRequest) -> Result<(), BackendError> {
        self.started.lock().unwrap().push(request.clone());
        Ok(())
    }

    async fn read_status(&self) -> Result<StatusSnapshot, BackendError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        let failures_left = self.status_failures_left.load(Ordering::SeqCst);
        if failures_left > 0 {
            self.status_failures_left
                .store(failures_left - 1, Ordering::SeqCst);
            return Err(BackendError {
                kind: FailureKind::Network,
                message: "connection reset".to_string(),
            });
        }
        Ok(StatusSnapshot {
            status: JobStatus::Running,
            progress: 33,
            ..StatusSnapshot::default()
        })
    }

    async fn generate_actions(&self) -> Result<Vec<PredictiveAction>, BackendError> {
        Err(BackendError {
            kind: FailureKind::Rejected,
            message: "timeout".to_string(),
        })
    }
}

fn quick_settings(max_retries: u32) -> EngineSettings {
    EngineSettings {
        status_retry: RetryPolicy {
            max_retries,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(2),
        },
    }
}

fn next_event(engine: &EngineHandle, mut pick: impl FnMut(&EngineEvent) -> bool) -> EngineEvent {
    let deadline = Instant::now() + WAIT;
    while Instant::now() < deadline {
        if let Some(event) = engine.recv_timeout(Duration::from_millis(50)) {
            if pick(&event) {
                return event;
            }
        }
    }
    panic!("expected event did not arrive");
}

#[test]
fn start_job_is_acknowledged() {
    let backend = Arc::new(FakeBackend::default());
    let engine = EngineHandle::new(backend.clone(), quick_settings(0)).unwrap();
    let request = JobRequest {
        company: "Acme Corp".to_string(),
        hints: String::new(),
        max_links: 12,
    };

    engine.start_job(3, request.clone());

    let event = next_event(&engine, |e| matches!(e, EngineEvent::StartAcknowledged { .. }));
    assert_eq!(
        event,
        EngineEvent::StartAcknowledged {
            session: 3,
            result: Ok(())
        }
    );
    assert_eq!(backend.started.lock().unwrap().as_slice(), &[request]);
}

#[test]
fn poll_timer_ticks_until_stopped() {
    let engine = EngineHandle::new(Arc::new(FakeBackend::default()), quick_settings(0)).unwrap();

    engine.start_polling(1, Duration::from_millis(10));
    for _ in 0..3 {
        let event = next_event(&engine, |e| matches!(e, EngineEvent::PollTick { .. }));
        assert_eq!(event, EngineEvent::PollTick { session: 1 });
    }

    engine.stop_polling(1);
    std::thread::sleep(Duration::from_millis(50));
    while engine.try_recv().is_some() {}
    std::thread::sleep(Duration::from_millis(60));
    assert_eq!(engine.try_recv(), None);
}

#[test]
fn starting_new_poll_loop_replaces_previous_timer() {
    let engine = EngineHandle::new(Arc::new(FakeBackend::default()), quick_settings(0)).unwrap();

    engine.start_polling(1, Duration::from_millis(10));
    next_event(&engine, |e| matches!(e, EngineEvent::PollTick { session: 1 }));
    engine.start_polling(2, Duration::from_millis(10));
    // Ticks of session 1 may still be queued; once session 2 ticks, session 1 is gone.
    next_event(&engine, |e| matches!(e, EngineEvent::PollTick { session: 2 }));
    std::thread::sleep(Duration::from_millis(60));

    let mut sessions = Vec::new();
    while let Some(event) = engine.try_recv() {
        if let EngineEvent::PollTick { session } = event {
            sessions.push(session);
        }
    }
    assert!(sessions.iter().all(|s| *s == 2), "got {sessions:?}");
    engine.stop_polling(2);
}

#[test]
fn fetch_status_retries_transient_failures() {
    let backend = Arc::new(FakeBackend::default());
    backend.status_failures_left.store(2, Ordering::SeqCst);
    let engine = EngineHandle::new(backend.clone(), quick_settings(2)).unwrap();

    engine.fetch_status(1, 1);

    let event = next_event(&engine, |e| matches!(e, EngineEvent::StatusFetched { .. }));
    let EngineEvent::StatusFetched { session, result } = event else {
        unreachable!();
    };
    assert_eq!(session, 1);
    assert_eq!(result.unwrap().progress, 33);
    assert_eq!(backend.status_calls.load(Ordering::SeqCst), 3);
}

#[test]
fn exhausted_retries_report_the_failure() {
    let backend = Arc::new(FakeBackend::default());
    backend.status_failures_left.store(5, Ordering::SeqCst);
    let engine = EngineHandle::new(backend.clone(), quick_settings(1)).unwrap();

    engine.fetch_status(4, 6);

    let event = next_event(&engine, |e| matches!(e, EngineEvent::StatusFetched { .. }));
    let EngineEvent::StatusFetched { result, .. } = event else {
        unreachable!();
    };
    assert_eq!(result.unwrap_err().kind, FailureKind::Network);
    assert_eq!(backend.status_calls.load(Ordering::SeqCst), 2);
}

#[test]
fn generate_actions_reports_modal_and_result() {
    let engine = EngineHandle::new(Arc::new(FakeBackend::default()), quick_settings(0)).unwrap();

    engine.generate_actions(9);

    let event = next_event(&engine, |e| matches!(e, EngineEvent::ActionsGenerated { .. }));
    let EngineEvent::ActionsGenerated { modal, result } = event else {
        unreachable!();
    };
    assert_eq!(modal, 9);
    assert_eq!(result.unwrap_err().user_message(), "timeout");
}

#[test]
fn export_runs_on_engine_and_reports_summary() {
    let temp = tempfile::TempDir::new().unwrap();
    let engine = EngineHandle::new(Arc::new(FakeBackend::default()), quick_settings(0)).unwrap();

    engine.export(
        vec![
            PanelCapture::present(PanelId::Charts, TextPanelSurface::new(vec!["Gauge 70".into()])),
            PanelCapture::absent(PanelId::Kpis),
            PanelCapture::present(PanelId::Sources, TextPanelSurface::new(Vec::new())),
        ],
        ExportOptions::in_dir(temp.path()),
    );

    let event = next_event(&engine, |e| matches!(e, EngineEvent::ExportCompleted { .. }));
    let EngineEvent::ExportCompleted { result } = event else {
        unreachable!();
    };
    let summary = result.expect("export ok");
    assert_eq!(summary.entries, vec!["charts.png", "sources.png"]);
    assert!(summary.archive_path.exists());
}
