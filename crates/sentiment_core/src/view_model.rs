use crate::dashboard::KpiDashboardView;
use crate::modal::DetailModal;
use crate::progress::ProgressView;
use crate::sources::SourceResultsView;
use crate::{ExportReport, JobInputs, SessionId, SessionPhase};

#[derive(Debug, Clone, PartialEq)]
pub struct AppViewModel {
    pub session: SessionPhase,
    pub session_id: SessionId,
    pub inputs: JobInputs,
    pub run_enabled: bool,
    pub export_enabled: bool,
    pub progress: ProgressView,
    pub sources: SourceResultsView,
    pub links_count: usize,
    pub dashboard: KpiDashboardView,
    pub modal: Option<DetailModal>,
    pub alert: Option<String>,
    pub last_export: Option<ExportReport>,
    pub ticks_issued: u64,
    pub ticks_skipped: u64,
    pub dirty: bool,
}

impl AppViewModel {
    /// True while a job is starting or being polled.
    pub fn is_busy(&self) -> bool {
        matches!(
            self.session,
            SessionPhase::Starting | SessionPhase::Running
        )
    }
}
