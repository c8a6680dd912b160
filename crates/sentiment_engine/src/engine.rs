use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use engine_logging::{engine_debug, engine_error, engine_info};
use sentiment_core::{JobRequest, ModalId, SessionId};
use tokio_util::sync::CancellationToken;

use crate::backend::JobBackend;
use crate::export::{export_dashboard, ExportOptions, PanelCapture};
use crate::retry::{retry_async, RetryPolicy};
use crate::EngineEvent;

enum EngineCommand {
    StartJob {
        session: SessionId,
        request: JobRequest,
    },
    StartPolling {
        session: SessionId,
        interval: Duration,
    },
    StopPolling {
        session: SessionId,
    },
    FetchStatus {
        session: SessionId,
        tick: u64,
    },
    GenerateActions {
        modal: ModalId,
    },
    Export {
        panels: Vec<PanelCapture>,
        options: ExportOptions,
    },
}

#[derive(Debug, Clone, Default)]
pub struct EngineSettings {
    /// Retries applied to each status read before it is reported as failed.
    pub status_retry: RetryPolicy,
}

/// Poll timer owned by the command loop. At most one exists at a time.
struct PollTimer {
    session: SessionId,
    cancel: CancellationToken,
}

/// Runs backend calls, the poll timer and exports on a background runtime.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(backend: Arc<dyn JobBackend>, settings: EngineSettings) -> std::io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_time()
            .enable_io()
            .build()?;

        thread::Builder::new()
            .name("sentiment-engine".to_string())
            .spawn(move || {
                let mut timer: Option<PollTimer> = None;
                while let Ok(command) = cmd_rx.recv() {
                    handle_command(
                        &runtime,
                        &backend,
                        &settings,
                        &mut timer,
                        command,
                        &event_tx,
                    );
                }
                if let Some(timer) = timer.take() {
                    timer.cancel.cancel();
                }
            })?;

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn start_job(&self, session: SessionId, request: JobRequest) {
        self.send(EngineCommand::StartJob { session, request });
    }

    /// Starts the poll timer for `session`, discarding any previous timer.
    pub fn start_polling(&self, session: SessionId, interval: Duration) {
        self.send(EngineCommand::StartPolling { session, interval });
    }

    pub fn stop_polling(&self, session: SessionId) {
        self.send(EngineCommand::StopPolling { session });
    }

    /// Reads the job status once. `tick` labels the retry log lines.
    pub fn fetch_status(&self, session: SessionId, tick: u64) {
        self.send(EngineCommand::FetchStatus { session, tick });
    }

    pub fn generate_actions(&self, modal: ModalId) {
        self.send(EngineCommand::GenerateActions { modal });
    }

    pub fn export(&self, panels: Vec<PanelCapture>, options: ExportOptions) {
        self.send(EngineCommand::Export { panels, options });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            engine_error!("Engine command loop has stopped; command dropped");
        }
    }
}

fn handle_command(
    runtime: &tokio::runtime::Runtime,
    backend: &Arc<dyn JobBackend>,
    settings: &EngineSettings,
    timer: &mut Option<PollTimer>,
    command: EngineCommand,
    event_tx: &mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::StartJob { session, request } => {
            let backend = backend.clone();
            let event_tx = event_tx.clone();
            runtime.spawn(async move {
                let result = backend.start_job(&request).await;
                let _ = event_tx.send(EngineEvent::StartAcknowledged { session, result });
            });
        }
        EngineCommand::StartPolling { session, interval } => {
            if let Some(previous) = timer.take() {
                engine_debug!("Replacing poll timer of session {}", previous.session);
                previous.cancel.cancel();
            }
            let cancel = CancellationToken::new();
            runtime.spawn(run_poll_timer(
                session,
                interval,
                cancel.clone(),
                event_tx.clone(),
            ));
            *timer = Some(PollTimer { session, cancel });
            engine_info!("Polling session {} every {:?}", session, interval);
        }
        EngineCommand::StopPolling { session } => {
            if timer.as_ref().is_some_and(|t| t.session == session) {
                if let Some(stopped) = timer.take() {
                    stopped.cancel.cancel();
                }
                engine_info!("Stopped polling session {}", session);
            }
        }
        EngineCommand::FetchStatus { session, tick } => {
            let backend = backend.clone();
            let policy = settings.status_retry.clone();
            let event_tx = event_tx.clone();
            let operation = format!("[tick {tick}] read_status");
            runtime.spawn(async move {
                let result = retry_async(&policy, &operation, || backend.read_status()).await;
                let _ = event_tx.send(EngineEvent::StatusFetched { session, result });
            });
        }
        EngineCommand::GenerateActions { modal } => {
            let backend = backend.clone();
            let event_tx = event_tx.clone();
            runtime.spawn(async move {
                let result = backend.generate_actions().await;
                let _ = event_tx.send(EngineEvent::ActionsGenerated { modal, result });
            });
        }
        EngineCommand::Export { panels, options } => {
            let event_tx = event_tx.clone();
            runtime.spawn_blocking(move || {
                let result = export_dashboard(&panels, &options).map_err(|err| err.to_string());
                let _ = event_tx.send(EngineEvent::ExportCompleted { result });
            });
        }
    }
}

async fn run_poll_timer(
    session: SessionId,
    interval: Duration,
    cancel: CancellationToken,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                if event_tx.send(EngineEvent::PollTick { session }).is_err() {
                    break;
                }
            }
        }
    }
}
