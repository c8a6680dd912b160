use std::time::Duration;

use crate::{JobRequest, ModalId, SessionId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Issue the job-start remote call.
    StartJob {
        session: SessionId,
        request: JobRequest,
    },
    /// Start (or replace) the poll timer for a session.
    StartPolling {
        session: SessionId,
        interval: Duration,
    },
    /// Issue one status read. `tick` is the poll tick that requested it.
    FetchStatus { session: SessionId, tick: u64 },
    /// Discard the poll timer of a session.
    StopPolling { session: SessionId },
    /// Issue the recommendation-generation remote call.
    GenerateActions { modal: ModalId },
    /// Capture the rendered panels and bundle them into the export archive.
    ExportDashboard,
}
