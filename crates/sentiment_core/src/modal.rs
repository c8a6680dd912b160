use serde_json::Value;

use crate::dashboard::{format_json_number, format_number};
use crate::{Category, DetailKind, KpiBlock, PredictiveAction};

pub type ModalId = u64;

pub const MODAL_SUBTITLE: &str = "Master KPI details & sub-KPIs";
pub const PREDICT_LABEL: &str = "Generate Top 5 Actions";
pub const PREDICT_BUSY_LABEL: &str = "Generating…";
pub const PREDICT_HINT: &str = "Actions are sorted: most urgent → least urgent.";
const PREDICT_DEFAULT_ERROR: &str = "Failed";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRow {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PredictiveOutcome {
    /// Inline error badge text.
    Failed(String),
    /// Actions exactly as received, never re-sorted.
    Actions(Vec<PredictiveAction>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PredictivePanel {
    pub overall_rate: f64,
    pub in_flight: bool,
    pub outcome: Option<PredictiveOutcome>,
}

impl PredictivePanel {
    pub fn trigger_enabled(&self) -> bool {
        !self.in_flight
    }

    pub fn trigger_label(&self) -> &'static str {
        if self.in_flight {
            PREDICT_BUSY_LABEL
        } else {
            PREDICT_LABEL
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetailBody {
    Generic { rows: Vec<DetailRow> },
    Predictive(PredictivePanel),
}

/// Full-detail overlay for one KPI category.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailModal {
    pub id: ModalId,
    pub category: Category,
    pub subtitle: &'static str,
    pub body: DetailBody,
}

impl DetailModal {
    pub fn open(id: ModalId, category: Category, block: &KpiBlock, overall_rate: f64) -> Self {
        let body = match category.detail_kind() {
            DetailKind::Generic => DetailBody::Generic {
                rows: block
                    .iter()
                    .map(|(label, value)| DetailRow {
                        label: label.clone(),
                        value: detail_value(value),
                    })
                    .collect(),
            },
            DetailKind::Predictive => DetailBody::Predictive(PredictivePanel {
                overall_rate,
                in_flight: false,
                outcome: None,
            }),
        };
        Self {
            id,
            category,
            subtitle: MODAL_SUBTITLE,
            body,
        }
    }

    pub fn title(&self) -> &'static str {
        self.category.name()
    }

    pub fn predictive(&self) -> Option<&PredictivePanel> {
        match &self.body {
            DetailBody::Predictive(panel) => Some(panel),
            DetailBody::Generic { .. } => None,
        }
    }

    /// Marks the trigger busy. Returns false when a call is already outstanding
    /// or the modal has no trigger.
    pub(crate) fn begin_generate(&mut self) -> bool {
        match &mut self.body {
            DetailBody::Predictive(panel) if !panel.in_flight => {
                panel.in_flight = true;
                true
            }
            _ => false,
        }
    }

    pub(crate) fn finish_generate(&mut self, result: Result<Vec<PredictiveAction>, String>) {
        if let DetailBody::Predictive(panel) = &mut self.body {
            panel.in_flight = false;
            panel.outcome = Some(match result {
                Ok(actions) => PredictiveOutcome::Actions(actions),
                Err(message) => {
                    let message = if message.is_empty() {
                        PREDICT_DEFAULT_ERROR.to_string()
                    } else {
                        message
                    };
                    PredictiveOutcome::Failed(format!("Error: {message}"))
                }
            });
        }
    }
}

/// Scalars verbatim, nested structures as indented JSON.
pub fn detail_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => format_json_number(n),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => {
            serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
        }
    }
}

/// Formats an uplift metric as shown on an action row.
pub fn uplift_label(points: f64) -> String {
    format!("Uplift: +{} pts", format_number(points))
}
