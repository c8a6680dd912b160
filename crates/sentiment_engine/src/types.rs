use std::fmt;

use sentiment_core::{ModalId, PredictiveAction, SessionId, StatusSnapshot};
use serde::Deserialize;

use crate::export::ExportSummary;

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    StartAcknowledged {
        session: SessionId,
        result: Result<(), BackendError>,
    },
    PollTick {
        session: SessionId,
    },
    StatusFetched {
        session: SessionId,
        result: Result<StatusSnapshot, BackendError>,
    },
    ActionsGenerated {
        modal: ModalId,
        result: Result<Vec<PredictiveAction>, BackendError>,
    },
    ExportCompleted {
        result: Result<ExportSummary, String>,
    },
}

/// Acknowledgment body of the job-start call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct StartAck {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// Response body of the recommendation call.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct ActionsResponse {
    pub ok: bool,
    #[serde(default)]
    pub actions: Option<Vec<PredictiveAction>>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct BackendError {
    pub kind: FailureKind,
    pub message: String,
}

impl BackendError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Message shown to the user. A negative acknowledgment carries the
    /// backend's own text (possibly empty); transport failures describe themselves.
    pub fn user_message(&self) -> String {
        match self.kind {
            FailureKind::Rejected => self.message.clone(),
            _ => self.to_string(),
        }
    }

    /// Whether repeating the same request may succeed.
    pub fn is_transient(&self) -> bool {
        match self.kind {
            FailureKind::Timeout | FailureKind::Network => true,
            FailureKind::HttpStatus(code) => matches!(code, 408 | 429 | 500..=599),
            FailureKind::InvalidUrl | FailureKind::Decode | FailureKind::Rejected => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    /// Response body did not match the expected shape.
    Decode,
    /// Backend answered `{ok: false}`.
    Rejected,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Decode => write!(f, "malformed response"),
            FailureKind::Rejected => write!(f, "rejected"),
        }
    }
}
