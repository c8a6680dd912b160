use engine_logging::{engine_debug, engine_info, engine_warn};

use crate::{AppState, Effect, JobRequest, JobStatus, Msg, SessionPhase, TickDecision};

pub const ALERT_EMPTY_COMPANY: &str = "Enter company name.";
pub const ALERT_START_FAILED: &str = "Failed to start.";
pub const ALERT_JOB_ERROR: &str = "Error occurred.";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::CompanyChanged(text) => {
            state.inputs_mut().company = text;
            Vec::new()
        }
        Msg::HintsChanged(text) => {
            state.inputs_mut().hints = text;
            Vec::new()
        }
        Msg::MaxLinksChanged(text) => {
            state.inputs_mut().max_links = text;
            Vec::new()
        }
        Msg::RunClicked => {
            if !state.run_enabled() {
                return (state, Vec::new());
            }
            let inputs = state.inputs();
            let Some(request) =
                JobRequest::from_inputs(&inputs.company, &inputs.hints, &inputs.max_links)
            else {
                state.set_alert(ALERT_EMPTY_COMPANY);
                return (state, Vec::new());
            };
            state.clear_alert();
            let session = state.begin_start();
            engine_info!(
                "Starting job session={} company={:?} max_links={}",
                session,
                request.company,
                request.max_links
            );
            vec![Effect::StartJob { session, request }]
        }
        Msg::StartAcknowledged { session, result } => {
            if session != state.session_id() || state.session() != SessionPhase::Starting {
                engine_debug!("Ignoring stale start acknowledgment for session {}", session);
                return (state, Vec::new());
            }
            match result {
                Ok(()) => {
                    state.start_accepted();
                    vec![Effect::StartPolling {
                        session,
                        interval: state.poll_interval(),
                    }]
                }
                Err(message) => {
                    engine_warn!("Start rejected for session {}: {}", session, message);
                    state.start_rejected();
                    state.set_alert(non_empty_or(message, ALERT_START_FAILED));
                    Vec::new()
                }
            }
        }
        Msg::PollTick { session } => {
            if session != state.session_id() {
                return (state, Vec::new());
            }
            match state.poll_tick() {
                TickDecision::Fetch => {
                    let tick = state.poller().ticks_issued();
                    engine_logging::set_poll_tick(tick);
                    engine_debug!("Poll tick {} for session {}", tick, session);
                    vec![Effect::FetchStatus { session, tick }]
                }
                TickDecision::SkipInFlight => {
                    engine_debug!("Skipping poll tick: previous status read still outstanding");
                    Vec::new()
                }
                TickDecision::Inactive => Vec::new(),
            }
        }
        Msg::StatusReceived { session, result } => {
            if session != state.session_id() || !state.poller().is_active() {
                engine_debug!("Discarding status for inactive session {}", session);
                return (state, Vec::new());
            }
            match result {
                Ok(snapshot) => {
                    let status = snapshot.status;
                    let error = snapshot.error.clone();
                    state.apply_snapshot(snapshot);
                    if status.is_terminal() {
                        engine_info!("Job session {} finished with {:?}", session, status);
                        state.finish_session(status);
                        if status == JobStatus::Error {
                            let message = error.unwrap_or_default();
                            state.set_alert(non_empty_or(message, ALERT_JOB_ERROR));
                        }
                        vec![Effect::StopPolling { session }]
                    } else {
                        Vec::new()
                    }
                }
                Err(message) => {
                    let failures = state.poll_failed();
                    engine_warn!(
                        "Status read failed ({} in a row), polling continues: {}",
                        failures,
                        message
                    );
                    Vec::new()
                }
            }
        }
        Msg::KpiCardClicked(category) => match state.card_detail(category) {
            Some((block, rate)) => {
                state.open_modal(category, &block, rate);
                Vec::new()
            }
            None => Vec::new(),
        },
        Msg::ModalClosed => {
            state.close_modal();
            Vec::new()
        }
        Msg::GenerateActionsClicked => match state.begin_generate() {
            Some(modal) => {
                engine_info!("Requesting recommendations for modal {}", modal);
                vec![Effect::GenerateActions { modal }]
            }
            None => Vec::new(),
        },
        Msg::ActionsReceived { modal, result } => {
            if let Err(message) = &result {
                engine_warn!("Recommendation call failed: {}", message);
            }
            if !state.finish_generate(modal, result) {
                engine_debug!("Dropping recommendations for closed modal {}", modal);
            }
            Vec::new()
        }
        Msg::ExportClicked => {
            if state.begin_export() {
                vec![Effect::ExportDashboard]
            } else {
                Vec::new()
            }
        }
        Msg::ExportFinished(result) => {
            match result {
                Ok(report) => {
                    engine_info!(
                        "Exported {} panel(s) to {}",
                        report.entries.len(),
                        report.archive_path
                    );
                    state.finish_export(Some(report));
                }
                Err(message) => {
                    state.finish_export(None);
                    state.set_alert(format!("Export failed: {message}"));
                }
            }
            Vec::new()
        }
        Msg::AlertDismissed => {
            state.clear_alert();
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn non_empty_or(message: String, fallback: &str) -> String {
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message
    }
}
