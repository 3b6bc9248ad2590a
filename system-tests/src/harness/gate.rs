// system-tests/src/harness/gate.rs
// ============================================================================
// Module: Skip Gate
// Description: Run-wide switch between "skip everything" and "run normally".
// Purpose: Skip the whole suite uniformly when prerequisites are absent.
// Dependencies: std
// ============================================================================

//! ## Overview
//! A [`SkipGate`] starts closed and opens at most once. There is no way to
//! close it again, so every scenario after the opening sees the same state.

/// Reason reported while the gate has never been opened or explained.
const DEFAULT_CLOSED_REASON: &str = "suite prerequisites were not established";

/// Monotonic skip switch for one suite run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipGate {
    /// Whether scenarios run.
    open: bool,
    /// Why scenarios are skipped while closed.
    reason: String,
}

impl SkipGate {
    /// Creates a closed gate.
    #[must_use]
    pub fn new() -> Self {
        Self {
            open: false,
            reason: DEFAULT_CLOSED_REASON.to_string(),
        }
    }

    /// Opens the gate. Opening an open gate has no effect.
    pub fn open(&mut self) {
        self.open = true;
    }

    /// Records why the gate stays closed. Ignored once open.
    pub fn record_skip(&mut self, reason: impl Into<String>) {
        if !self.open {
            self.reason = reason.into();
        }
    }

    /// Returns true once the gate has opened.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Returns the skip reason while closed.
    #[must_use]
    pub fn skip_reason(&self) -> Option<&str> {
        (!self.open).then_some(self.reason.as_str())
    }
}

impl Default for SkipGate {
    fn default() -> Self {
        Self::new()
    }
}
