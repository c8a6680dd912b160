use crate::JobStatus;

/// Step label shown while the backend has not reported a step yet.
pub const STEP_PLACEHOLDER: &str = "…";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeTone {
    Ok,
    Bad,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub tone: BadgeTone,
    pub text: String,
}

impl Badge {
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            tone: BadgeTone::Ok,
            text: text.into(),
        }
    }

    pub fn bad(text: impl Into<String>) -> Self {
        Self {
            tone: BadgeTone::Bad,
            text: text.into(),
        }
    }
}

/// Scalar progress, step label and status badge row.
///
/// Progress values are written through unchanged: a server sending 130 or -5
/// renders 130 or -5.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressView {
    pub label: String,
    /// Proportional fill in percent of the bar width.
    pub fill: i64,
    pub step: String,
    pub badges: Vec<Badge>,
}

impl Default for ProgressView {
    fn default() -> Self {
        Self {
            label: "0%".to_string(),
            fill: 0,
            step: STEP_PLACEHOLDER.to_string(),
            badges: Vec::new(),
        }
    }
}

impl ProgressView {
    pub fn update(&mut self, progress: i64, step: &str) {
        self.label = format!("{progress}%");
        self.fill = progress;
        self.step = if step.is_empty() {
            STEP_PLACEHOLDER.to_string()
        } else {
            step.to_string()
        };
    }

    pub fn set_status(&mut self, status: JobStatus, step: &str) {
        self.badges.clear();
        match status {
            JobStatus::Running => self.badges.push(Badge::ok("RUNNING")),
            JobStatus::Done => self.badges.push(Badge::ok("DONE")),
            JobStatus::Error => self.badges.push(Badge::bad("ERROR")),
            JobStatus::Idle => {}
        }
        if !step.is_empty() {
            self.badges.push(Badge::ok(step));
        }
    }
}
