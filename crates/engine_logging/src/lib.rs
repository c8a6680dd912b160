#![deny(missing_docs)]
//! Shared logging utilities for the sentiment client workspace.
//!
//! This crate provides the `engine_*` logging macros used across the codebase,
//! a per-thread poll tick counter used as log context, and a minimal test
//! initializer for the global logger.

use std::cell::Cell;

thread_local! {
    /// Thread-local storage for the number of status poll ticks issued so far.
    static POLL_TICK: Cell<u64> = const { Cell::new(0) };
}

/// Records the poll tick count for the current thread.
/// The core calls this whenever it issues a status fetch.
pub fn set_poll_tick(tick: u64) {
    POLL_TICK.with(|v| v.set(tick));
}

/// Retrieves the poll tick count for the current thread.
/// Returns 0 if no tick has been issued on this thread.
pub fn get_poll_tick() -> u64 {
    POLL_TICK.with(|v| v.get())
}

/// Log prefix for the current thread's poll tick.
/// Empty on threads that never issued a tick, such as runtime workers.
pub fn tick_prefix() -> String {
    match get_poll_tick() {
        0 => String::new(),
        tick => format!("[tick {tick}] "),
    }
}

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! engine_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! engine_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! engine_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs a warn-level message, prefixed with the thread's poll tick when it has one.
#[macro_export]
macro_rules! engine_warn {
    ($($arg:tt)*) => {{
        log::warn!("{}{}", $crate::tick_prefix(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message, prefixed with the thread's poll tick when it has one.
#[macro_export]
macro_rules! engine_error {
    ($($arg:tt)*) => {{
        log::error!("{}{}", $crate::tick_prefix(), format_args!($($arg)*));
    }};
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
