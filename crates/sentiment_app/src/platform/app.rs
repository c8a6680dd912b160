use std::io::Write;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::Parser;
use engine_logging::{engine_info, engine_warn};
use sentiment_core::{
    update, AppState, AppViewModel, Category, DetailKind, JobStatus, Msg, SessionPhase,
};

use super::cli::Cli;
use super::effects::EffectRunner;
use super::{logging, ui};

/// How long one wait on the engine blocks before conditions are re-checked.
const EVENT_WAIT: Duration = Duration::from_millis(100);

pub fn run_app() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::initialize(cli.log, cli.log_level);
    engine_info!("sentiment_client starting against {}", cli.base_url);

    let runner = EffectRunner::new(&cli).context("failed to start engine")?;
    let mut app = App::new(AppState::with_poll_interval(cli.poll_interval()), runner);

    app.dispatch(Msg::CompanyChanged(cli.company.clone()));
    app.dispatch(Msg::HintsChanged(cli.hints.clone()));
    app.dispatch(Msg::MaxLinksChanged(cli.max_links.clone()));
    app.dispatch(Msg::RunClicked);
    app.pump_until(|state| {
        !matches!(
            state.session(),
            SessionPhase::Starting | SessionPhase::Running
        )
    });

    let outcome = app.state.session();
    if outcome == SessionPhase::Idle {
        bail!(app.alert_or("job was not started"));
    }

    for category in &cli.details {
        app.show_detail(*category, cli.generate_actions);
    }

    if cli.export {
        app.export()?;
    }

    if outcome == SessionPhase::Finished(JobStatus::Error) {
        bail!(app.alert_or("job failed"));
    }
    Ok(())
}

struct App {
    state: AppState,
    runner: EffectRunner,
    last_frame: String,
}

impl App {
    fn new(state: AppState, runner: EffectRunner) -> Self {
        Self {
            state,
            runner,
            last_frame: String::new(),
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let view = state.view();
        if !effects.is_empty() {
            self.runner.enqueue(effects, &view);
        }
        let was_dirty = state.consume_dirty();
        self.state = state;
        if was_dirty {
            self.render(&view);
        }
    }

    /// Feeds engine events into the core until `done` holds.
    fn pump_until(&mut self, done: impl Fn(&AppState) -> bool) {
        while !done(&self.state) {
            if let Some(msg) = self.runner.next_msg(EVENT_WAIT) {
                self.dispatch(msg);
            }
        }
    }

    fn show_detail(&mut self, category: Category, generate_actions: bool) {
        if self.state.view().dashboard.card(category).is_none() {
            engine_warn!("No dashboard card for {}; detail skipped", category);
            return;
        }
        self.dispatch(Msg::KpiCardClicked(category));
        if generate_actions && category.detail_kind() == DetailKind::Predictive {
            self.dispatch(Msg::GenerateActionsClicked);
            self.pump_until(|state| {
                state
                    .view()
                    .modal
                    .as_ref()
                    .and_then(|modal| modal.predictive())
                    .is_none_or(|panel| !panel.in_flight)
            });
        }
        self.dispatch(Msg::ModalClosed);
    }

    fn export(&mut self) -> anyhow::Result<()> {
        self.dispatch(Msg::ExportClicked);
        self.pump_until(|state| state.view().export_enabled);
        if self.state.view().last_export.is_none() {
            bail!(self.alert_or("export failed"));
        }
        Ok(())
    }

    fn alert_or(&self, fallback: &str) -> String {
        self.state
            .view()
            .alert
            .unwrap_or_else(|| fallback.to_string())
    }

    fn render(&mut self, view: &AppViewModel) {
        let frame = ui::render::render(view);
        if frame == self.last_frame {
            return;
        }
        let mut out = std::io::stdout().lock();
        if writeln!(out, "{frame}\n").and_then(|_| out.flush()).is_err() {
            engine_warn!("Failed to write frame to stdout");
        }
        self.last_frame = frame;
    }
}
