use sentiment_core::{
    format_number, uplift_label, AppViewModel, Badge, BadgeTone, DetailBody, DetailModal,
    Evidence, KpiDashboardView, PredictiveOutcome, PredictivePanel, ProgressView, RateGauge,
    SessionPhase, CARD_TAG, PREDICT_HINT,
};
use sentiment_engine::{PanelCapture, PanelId, TextPanelSurface};

use super::constants::*;

/// Renders the whole view model as one terminal frame.
pub fn render(view: &AppViewModel) -> String {
    let mut sections = vec![
        session_line(view),
        progress_lines(&view.progress).join("\n"),
        source_lines(view).join("\n"),
        chart_lines(&view.dashboard).join("\n"),
    ];
    if view.dashboard.has_grid() {
        sections.push(kpi_lines(&view.dashboard).join("\n"));
    }
    if let Some(modal) = &view.modal {
        sections.push(modal_lines(modal).join("\n"));
    }
    if let Some(report) = &view.last_export {
        sections.push(format!(
            "Exported {} panel(s) to {}",
            report.entries.len(),
            report.archive_path
        ));
    }
    if let Some(alert) = &view.alert {
        sections.push(format!("(!) {alert}"));
    }
    sections.join("\n\n")
}

/// Text surfaces for the export pipeline. The KPI panel exists only once a
/// dashboard has been rendered into the grid.
pub fn panel_captures(view: &AppViewModel) -> Vec<PanelCapture> {
    PanelId::ALL
        .into_iter()
        .map(|panel| {
            let lines = match panel {
                PanelId::Charts => Some(chart_lines(&view.dashboard)),
                PanelId::Kpis => view
                    .dashboard
                    .has_grid()
                    .then(|| kpi_lines(&view.dashboard)),
                PanelId::Sources => Some(source_lines(view)),
            };
            match lines {
                Some(lines) => PanelCapture::present(panel, TextPanelSurface::new(lines)),
                None => PanelCapture::absent(panel),
            }
        })
        .collect()
}

fn session_line(view: &AppViewModel) -> String {
    let phase = match view.session {
        SessionPhase::Idle => "Idle".to_string(),
        SessionPhase::Starting => "Starting".to_string(),
        SessionPhase::Running => "Running".to_string(),
        SessionPhase::Finished(status) => format!("Finished ({status:?})"),
    };
    format!("Session #{} | {}", view.session_id, phase)
}

pub fn progress_lines(progress: &ProgressView) -> Vec<String> {
    let fill = progress.fill.clamp(0, 100) as f64;
    let mut lines = vec![
        HEADING_PROGRESS.to_string(),
        format!("{} {}  {}", bar(fill, 100.0), progress.label, progress.step),
    ];
    if !progress.badges.is_empty() {
        let badges: Vec<String> = progress.badges.iter().map(badge).collect();
        lines.push(badges.join(" "));
    }
    lines
}

pub fn source_lines(view: &AppViewModel) -> Vec<String> {
    let sources = &view.sources;
    let mut lines = vec![
        HEADING_SOURCES.to_string(),
        format!(
            "Links: {} | OK: {} | Blocked/Error: {}",
            view.links_count, sources.ok_count, sources.bad_count
        ),
    ];
    for row in &sources.rows {
        let url = clip(&row.url, URL_WIDTH);
        let preview = clip(&row.preview, PREVIEW_WIDTH);
        if preview.is_empty() {
            lines.push(format!("{} {}", badge(&row.badge), url));
        } else {
            lines.push(format!("{} {} | {}", badge(&row.badge), url, preview));
        }
    }
    lines
}

pub fn chart_lines(dashboard: &KpiDashboardView) -> Vec<String> {
    let dist = dashboard.distribution;
    let total = dist.positive + dist.negative + dist.neutral;
    let mut lines = vec![HEADING_CHARTS.to_string()];
    for (label, value) in [
        ("Positive", dist.positive),
        ("Negative", dist.negative),
        ("Neutral", dist.neutral),
    ] {
        lines.push(format!(
            "{label:<9} {} {}",
            bar(value, total),
            format_number(value)
        ));
    }
    lines.push(format!(
        "Overall sentiment rate: {}",
        dashboard.sentiment_rate_label
    ));
    lines.push(format!(
        "{:<9} {} {} / {}",
        "Gauge",
        bar(dashboard.gauge.value, RateGauge::MAX),
        format_number(dashboard.gauge.value),
        format_number(RateGauge::MAX)
    ));
    lines
}

pub fn kpi_lines(dashboard: &KpiDashboardView) -> Vec<String> {
    let title = match &dashboard.company {
        Some(company) if !company.is_empty() => {
            format!("{HEADING_KPIS}: {}", clip(company, VALUE_WIDTH))
        }
        _ => HEADING_KPIS.to_string(),
    };
    let mut lines = vec![title];
    for card in &dashboard.cards {
        lines.push(format!(
            "{:<20} {:<12} ({})",
            card.category.name(),
            clip(&card.value, VALUE_WIDTH),
            CARD_TAG
        ));
    }
    if let Some(evidence) = &dashboard.evidence {
        lines.extend(evidence_lines(evidence));
    }
    lines
}

fn evidence_lines(evidence: &Evidence) -> Vec<String> {
    let mut lines = vec![String::new(), HEADING_EVIDENCE.to_string()];
    for (label, sentences) in [
        ("Most negative", &evidence.most_negative),
        ("Most positive", &evidence.most_positive),
    ] {
        if sentences.is_empty() {
            continue;
        }
        lines.push(format!("{label}:"));
        for sentence in sentences {
            lines.push(format!(
                "  ({}) {}",
                format_number(sentence.compound),
                clip(&sentence.text, PREVIEW_WIDTH)
            ));
        }
    }
    lines
}

pub fn modal_lines(modal: &DetailModal) -> Vec<String> {
    let mut lines = vec![format!("== {} ==", modal.title()), modal.subtitle.to_string()];
    match &modal.body {
        DetailBody::Generic { rows } => {
            for row in rows {
                lines.push(format!("  {}: {}", row.label, row.value));
            }
        }
        DetailBody::Predictive(panel) => lines.extend(predictive_lines(panel)),
    }
    lines
}

fn predictive_lines(panel: &PredictivePanel) -> Vec<String> {
    let trigger = if panel.trigger_enabled() {
        format!("[{}]", panel.trigger_label())
    } else {
        format!("[{}] (busy)", panel.trigger_label())
    };
    let mut lines = vec![
        format!(
            "Overall sentiment rate: {}",
            format_number(panel.overall_rate)
        ),
        trigger,
        PREDICT_HINT.to_string(),
    ];
    match &panel.outcome {
        None => {}
        Some(PredictiveOutcome::Failed(message)) => {
            lines.push(badge(&Badge::bad(message.clone())));
        }
        Some(PredictiveOutcome::Actions(actions)) => {
            for action in actions {
                lines.push(format!(
                    "#{} {} [{}]",
                    action.rank, action.title, action.urgency
                ));
                if !action.why.is_empty() {
                    lines.push(format!("   {}", action.why));
                }
                lines.push(format!(
                    "   {} | Horizon: {} | KPIs impacted: {}",
                    uplift_label(action.expected_uplift_points),
                    action.time_horizon,
                    action.kpis_impacted.join(", ")
                ));
            }
        }
    }
    lines
}

fn badge(badge: &Badge) -> String {
    match badge.tone {
        BadgeTone::Ok => format!("[{}]", badge.text),
        BadgeTone::Bad => format!("[!{}]", badge.text),
    }
}

fn bar(value: f64, max: f64) -> String {
    let ratio = if max > 0.0 && value.is_finite() {
        (value / max).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let filled = (ratio * BAR_WIDTH as f64).round() as usize;
    let mut out = String::with_capacity(BAR_WIDTH + 2);
    out.push('[');
    out.extend(std::iter::repeat(BAR_FILLED).take(filled));
    out.extend(std::iter::repeat(BAR_EMPTY).take(BAR_WIDTH - filled));
    out.push(']');
    out
}

fn clip(text: &str, width: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut clipped: String = text.chars().take(width.saturating_sub(1)).collect();
    clipped.push('…');
    clipped
}
