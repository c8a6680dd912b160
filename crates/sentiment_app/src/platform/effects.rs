use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use engine_logging::{engine_debug, engine_info, engine_warn};
use sentiment_core::{AppViewModel, Effect, ExportReport, Msg};
use sentiment_engine::{
    BackendError, BackendSettings, EngineEvent, EngineHandle, EngineSettings, ExportOptions,
    ExportSummary, ReqwestBackend,
};

use super::cli::Cli;
use super::ui;

/// Executes core effects on the engine and turns engine events back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
    output_dir: PathBuf,
}

impl EffectRunner {
    pub fn new(cli: &Cli) -> anyhow::Result<Self> {
        let backend = ReqwestBackend::new(&BackendSettings {
            base_url: cli.base_url.clone(),
            ..BackendSettings::default()
        })?;
        let engine = EngineHandle::new(Arc::new(backend), EngineSettings::default())?;
        Ok(Self {
            engine,
            output_dir: cli.output_dir.clone(),
        })
    }

    /// `view` is the frame the effects were produced with; exports capture it.
    pub fn enqueue(&self, effects: Vec<Effect>, view: &AppViewModel) {
        for effect in effects {
            match effect {
                Effect::StartJob { session, request } => {
                    engine_info!(
                        "StartJob session={} company={} max_links={}",
                        session,
                        request.company,
                        request.max_links
                    );
                    self.engine.start_job(session, request);
                }
                Effect::StartPolling { session, interval } => {
                    engine_debug!("StartPolling session={} every {:?}", session, interval);
                    self.engine.start_polling(session, interval);
                }
                Effect::FetchStatus { session, tick } => {
                    engine_debug!("FetchStatus session={} tick={}", session, tick);
                    self.engine.fetch_status(session, tick);
                }
                Effect::StopPolling { session } => {
                    self.engine.stop_polling(session);
                }
                Effect::GenerateActions { modal } => {
                    engine_info!("GenerateActions modal={}", modal);
                    self.engine.generate_actions(modal);
                }
                Effect::ExportDashboard => {
                    let panels = ui::render::panel_captures(view);
                    self.engine
                        .export(panels, ExportOptions::in_dir(self.output_dir.clone()));
                }
            }
        }
    }

    /// Waits up to `timeout` for the next engine event.
    pub fn next_msg(&self, timeout: Duration) -> Option<Msg> {
        self.engine.recv_timeout(timeout).map(map_event)
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::StartAcknowledged { session, result } => Msg::StartAcknowledged {
            session,
            result: result.map_err(|err| describe("Start", &err)),
        },
        EngineEvent::PollTick { session } => Msg::PollTick { session },
        EngineEvent::StatusFetched { session, result } => Msg::StatusReceived {
            session,
            result: result.map_err(|err| describe("Status read", &err)),
        },
        EngineEvent::ActionsGenerated { modal, result } => Msg::ActionsReceived {
            modal,
            result: result.map_err(|err| describe("Action generation", &err)),
        },
        EngineEvent::ExportCompleted { result } => Msg::ExportFinished(result.map(export_report)),
    }
}

fn describe(operation: &str, err: &BackendError) -> String {
    engine_warn!("{} failed: {}", operation, err);
    err.user_message()
}

fn export_report(summary: ExportSummary) -> ExportReport {
    ExportReport {
        archive_path: summary.archive_path.display().to_string(),
        entries: summary.entries,
    }
}
