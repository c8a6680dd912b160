use std::time::Duration;

use crate::dashboard::KpiDashboardView;
use crate::modal::{DetailModal, ModalId};
use crate::poller::{StatusPoller, TickDecision, POLL_INTERVAL};
use crate::progress::ProgressView;
use crate::sources::SourceResultsView;
use crate::view_model::AppViewModel;
use crate::{Category, JobStatus, KpiBlock, PredictiveAction, StatusSnapshot};

/// Identifies one started job. Responses tagged with an older id are stale.
pub type SessionId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Idle,
    /// Start call issued, acknowledgment pending.
    Starting,
    /// Start acknowledged, polling.
    Running,
    /// A terminal snapshot was applied.
    Finished(JobStatus),
}

/// Raw form input, validated only when the run trigger fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobInputs {
    pub company: String,
    pub hints: String,
    pub max_links: String,
}

impl Default for JobInputs {
    fn default() -> Self {
        Self {
            company: String::new(),
            hints: String::new(),
            max_links: crate::DEFAULT_MAX_LINKS.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub archive_path: String,
    pub entries: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    inputs: JobInputs,
    phase: SessionPhase,
    session_id: SessionId,
    run_enabled: bool,
    poll_interval: Duration,
    poller: StatusPoller,
    progress: ProgressView,
    sources: SourceResultsView,
    dashboard: KpiDashboardView,
    links_count: usize,
    last_snapshot: Option<StatusSnapshot>,
    modal: Option<DetailModal>,
    next_modal_id: ModalId,
    export_in_flight: bool,
    last_export: Option<ExportReport>,
    alert: Option<String>,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            inputs: JobInputs::default(),
            phase: SessionPhase::Idle,
            session_id: 0,
            run_enabled: true,
            poll_interval: POLL_INTERVAL,
            poller: StatusPoller::default(),
            progress: ProgressView::default(),
            sources: SourceResultsView::default(),
            dashboard: KpiDashboardView::default(),
            links_count: 0,
            last_snapshot: None,
            modal: None,
            next_modal_id: 0,
            export_in_flight: false,
            last_export: None,
            alert: None,
            dirty: false,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh state whose sessions poll at `interval` instead of [`POLL_INTERVAL`].
    pub fn with_poll_interval(interval: Duration) -> Self {
        Self {
            poll_interval: interval,
            ..Self::default()
        }
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            session: self.phase,
            session_id: self.session_id,
            inputs: self.inputs.clone(),
            run_enabled: self.run_enabled,
            export_enabled: !self.export_in_flight,
            progress: self.progress.clone(),
            sources: self.sources.clone(),
            links_count: self.links_count,
            dashboard: self.dashboard.clone(),
            modal: self.modal.clone(),
            alert: self.alert.clone(),
            last_export: self.last_export.clone(),
            ticks_issued: self.poller.ticks_issued(),
            ticks_skipped: self.poller.ticks_skipped(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn session(&self) -> SessionPhase {
        self.phase
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn last_snapshot(&self) -> Option<&StatusSnapshot> {
        self.last_snapshot.as_ref()
    }

    pub fn poller(&self) -> &StatusPoller {
        &self.poller
    }

    pub(crate) fn inputs(&self) -> &JobInputs {
        &self.inputs
    }

    pub(crate) fn inputs_mut(&mut self) -> &mut JobInputs {
        self.dirty = true;
        &mut self.inputs
    }

    pub(crate) fn run_enabled(&self) -> bool {
        self.run_enabled
    }

    pub(crate) fn set_alert(&mut self, message: impl Into<String>) {
        self.alert = Some(message.into());
        self.dirty = true;
    }

    pub(crate) fn clear_alert(&mut self) {
        if self.alert.take().is_some() {
            self.dirty = true;
        }
    }

    /// Disables the trigger and allocates a new session id.
    pub(crate) fn begin_start(&mut self) -> SessionId {
        self.session_id += 1;
        self.phase = SessionPhase::Starting;
        self.run_enabled = false;
        self.poller.stop();
        self.progress.update(1, "Starting…");
        self.dirty = true;
        self.session_id
    }

    pub(crate) fn start_rejected(&mut self) {
        self.phase = SessionPhase::Idle;
        self.run_enabled = true;
        self.dirty = true;
    }

    pub(crate) fn start_accepted(&mut self) {
        self.phase = SessionPhase::Running;
        self.poller.activate();
        self.dirty = true;
    }

    pub(crate) fn poll_tick(&mut self) -> TickDecision {
        self.poller.on_tick()
    }

    pub(crate) fn poll_failed(&mut self) -> u32 {
        self.poller.on_failure()
    }

    /// Renders a snapshot into every view and keeps it as the latest one.
    pub(crate) fn apply_snapshot(&mut self, snapshot: StatusSnapshot) {
        self.poller.on_success();
        self.progress.set_status(snapshot.status, &snapshot.step);
        self.progress.update(snapshot.progress, &snapshot.step);
        self.links_count = snapshot.urls.len();
        self.sources.update(&snapshot.items);
        if let Some(dashboard) = &snapshot.dashboard {
            self.dashboard.update(dashboard);
        }
        self.last_snapshot = Some(snapshot);
        self.dirty = true;
    }

    pub(crate) fn finish_session(&mut self, status: JobStatus) {
        self.poller.stop();
        self.phase = SessionPhase::Finished(status);
        self.run_enabled = true;
        self.dirty = true;
    }

    pub(crate) fn card_detail(&self, category: Category) -> Option<(KpiBlock, f64)> {
        self.dashboard
            .card(category)
            .map(|card| (card.block.clone(), self.dashboard.overall_rate))
    }

    pub(crate) fn open_modal(&mut self, category: Category, block: &KpiBlock, rate: f64) {
        self.next_modal_id += 1;
        self.modal = Some(DetailModal::open(self.next_modal_id, category, block, rate));
        self.dirty = true;
    }

    pub(crate) fn close_modal(&mut self) {
        if self.modal.take().is_some() {
            self.dirty = true;
        }
    }

    /// Marks the open modal's trigger busy and returns its id.
    pub(crate) fn begin_generate(&mut self) -> Option<ModalId> {
        let modal = self.modal.as_mut()?;
        if modal.begin_generate() {
            self.dirty = true;
            Some(modal.id)
        } else {
            None
        }
    }

    /// Applies a recommendation result; false when the modal it belongs to is gone.
    pub(crate) fn finish_generate(
        &mut self,
        modal_id: ModalId,
        result: Result<Vec<PredictiveAction>, String>,
    ) -> bool {
        match self.modal.as_mut() {
            Some(modal) if modal.id == modal_id => {
                modal.finish_generate(result);
                self.dirty = true;
                true
            }
            _ => false,
        }
    }

    pub(crate) fn begin_export(&mut self) -> bool {
        if self.export_in_flight {
            return false;
        }
        self.export_in_flight = true;
        self.dirty = true;
        true
    }

    pub(crate) fn finish_export(&mut self, report: Option<ExportReport>) {
        self.export_in_flight = false;
        if report.is_some() {
            self.last_export = report;
        }
        self.dirty = true;
    }
}
