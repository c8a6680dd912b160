//! Sentiment core: pure job-session state machine and view-model helpers.
mod category;
mod dashboard;
mod effect;
mod modal;
mod msg;
mod poller;
mod progress;
mod snapshot;
mod sources;
mod state;
mod update;
mod view_model;

pub use category::{Category, DetailKind, Headline};
pub use dashboard::{
    format_number, headline_value, summarize_value, DistributionChart, KpiCard,
    KpiDashboardView, RateGauge, CARD_TAG, VALUE_OPEN_DETAIL, VALUE_PLACEHOLDER,
};
pub use effect::Effect;
pub use modal::{
    detail_value, uplift_label, DetailBody, DetailModal, DetailRow, ModalId, PredictiveOutcome,
    PredictivePanel, MODAL_SUBTITLE, PREDICT_BUSY_LABEL, PREDICT_HINT, PREDICT_LABEL,
};
pub use msg::Msg;
pub use poller::{StatusPoller, TickDecision, POLL_INTERVAL};
pub use progress::{Badge, BadgeTone, ProgressView, STEP_PLACEHOLDER};
pub use snapshot::{
    DashboardData, Evidence, JobRequest, JobStatus, KpiBlock, PredictiveAction, ScoredSentence,
    SentimentDistribution, SentimentSeries, SourceResult, StatusSnapshot, DEFAULT_MAX_LINKS,
    MAX_LINKS_LIMIT,
};
pub use sources::{SourceResultsView, SourceRow};
pub use state::{AppState, ExportReport, JobInputs, SessionId, SessionPhase};
pub use update::{update, ALERT_EMPTY_COMPANY, ALERT_JOB_ERROR, ALERT_START_FAILED};
pub use view_model::AppViewModel;
