use std::time::Duration;

/// Interval between status poll ticks.
pub const POLL_INTERVAL: Duration = Duration::from_millis(900);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickDecision {
    /// Issue one status fetch.
    Fetch,
    /// The previous fetch is still outstanding.
    SkipInFlight,
    /// The poller is not running.
    Inactive,
}

/// Single-flight bookkeeping for the status poll loop.
///
/// A tick issues a fetch only when no fetch is outstanding, so snapshots are
/// always applied in the order their fetches were issued.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusPoller {
    active: bool,
    in_flight: bool,
    ticks_issued: u64,
    ticks_skipped: u64,
    consecutive_failures: u32,
}

impl StatusPoller {
    pub fn activate(&mut self) {
        *self = Self {
            active: true,
            ..Self::default()
        };
    }

    pub fn stop(&mut self) {
        self.active = false;
        self.in_flight = false;
    }

    pub fn on_tick(&mut self) -> TickDecision {
        if !self.active {
            return TickDecision::Inactive;
        }
        if self.in_flight {
            self.ticks_skipped += 1;
            return TickDecision::SkipInFlight;
        }
        self.in_flight = true;
        self.ticks_issued += 1;
        TickDecision::Fetch
    }

    pub fn on_success(&mut self) {
        self.in_flight = false;
        self.consecutive_failures = 0;
    }

    /// Records a failed fetch; the loop keeps running.
    pub fn on_failure(&mut self) -> u32 {
        self.in_flight = false;
        self.consecutive_failures += 1;
        self.consecutive_failures
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn ticks_issued(&self) -> u64 {
        self.ticks_issued
    }

    pub fn ticks_skipped(&self) -> u64 {
        self.ticks_skipped
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }
}
