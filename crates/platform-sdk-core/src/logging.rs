// crates/platform-sdk-core/src/logging.rs
// ============================================================================
// Module: SDK Logging
// Description: Process-wide tracing subscriber setup for SDK consumers.
// Purpose: Route request, retry, and token events to a chosen output.
// Dependencies: tracing, tracing-subscriber
// ============================================================================

//! ## Overview
//! The SDK emits `tracing` events; nothing is printed unless a subscriber is
//! installed. [`install_logger`] installs a formatter once per process. A
//! `RUST_LOG` filter takes precedence over the requested level.

// ============================================================================
// SECTION: Imports
// ============================================================================

use tracing_subscriber::EnvFilter;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Minimum level of SDK events to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Errors only.
    Error,
    /// Errors and warnings.
    Warn,
    /// Informational events and above.
    Info,
    /// Request and response detail.
    Debug,
}

impl LogLevel {
    /// Returns the filter directive for this level.
    #[must_use]
    pub const fn directive(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        }
    }
}

/// Destination for formatted events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutput {
    /// Standard error.
    Stderr,
    /// The test harness capture buffer.
    TestWriter,
}

// ============================================================================
// SECTION: Installation
// ============================================================================

/// Installs a global formatter for SDK events.
///
/// Returns `false` when a global subscriber was already installed; the
/// existing subscriber is kept.
pub fn install_logger(level: LogLevel, output: LogOutput) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.directive()));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    let installed = match output {
        LogOutput::Stderr => builder.with_writer(std::io::stderr).try_init(),
        LogOutput::TestWriter => builder.with_test_writer().try_init(),
    };
    installed.is_ok()
}
