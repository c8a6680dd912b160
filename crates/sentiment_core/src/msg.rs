use crate::{Category, ExportReport, ModalId, PredictiveAction, SessionId, StatusSnapshot};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User edited the company input.
    CompanyChanged(String),
    /// User edited the hints input.
    HintsChanged(String),
    /// User edited the max-links input (raw text, validated on run).
    MaxLinksChanged(String),
    /// User clicked Run.
    RunClicked,
    /// Backend answered the start call.
    StartAcknowledged {
        session: SessionId,
        result: Result<(), String>,
    },
    /// Poll timer fired.
    PollTick { session: SessionId },
    /// A status read finished, after any transport retries.
    StatusReceived {
        session: SessionId,
        result: Result<StatusSnapshot, String>,
    },
    /// User clicked a KPI card.
    KpiCardClicked(Category),
    /// User closed the detail overlay.
    ModalClosed,
    /// User clicked the recommendation trigger in the open detail view.
    GenerateActionsClicked,
    /// Backend answered the recommendation call.
    ActionsReceived {
        modal: ModalId,
        result: Result<Vec<PredictiveAction>, String>,
    },
    /// User clicked Export.
    ExportClicked,
    /// Export pipeline finished.
    ExportFinished(Result<ExportReport, String>),
    /// User acknowledged the current alert.
    AlertDismissed,
    /// Fallback for placeholder wiring.
    NoOp,
}
