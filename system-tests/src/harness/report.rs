// system-tests/src/harness/report.rs
// ============================================================================
// Module: Suite Report
// Description: Per-scenario outcomes of one pipeline run.
// Purpose: Summarize a run for assertions, logs, and JSON artifacts.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`SuiteReport`] lists every scenario in declaration order with its
//! [`ScenarioOutcome`]. A run whose scenarios were all skipped is a pass, not
//! a failure; [`SuiteReport::ensure_success`] only rejects failed or aborted
//! scenarios.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;

use crate::harness::error::SuiteFailure;
use crate::harness::scenario::ScenarioKind;

// ============================================================================
// SECTION: Outcomes
// ============================================================================

/// Result of one scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ScenarioOutcome {
    /// Body ran and every assertion held.
    Passed,
    /// Body ran and returned an error.
    Failed {
        /// Rendered error.
        error: String,
    },
    /// Body did not run because the gate was closed or it signalled a skip.
    Skipped {
        /// Why the scenario was skipped.
        reason: String,
    },
    /// Body did not run because a fatal scenario failed earlier.
    Aborted {
        /// Which failure aborted the run.
        reason: String,
    },
}

/// Outcome of one scenario with its identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioRecord {
    /// Scenario name.
    pub name: String,
    /// Pipeline treatment.
    pub kind: ScenarioKind,
    /// Outcome.
    #[serde(flatten)]
    pub outcome: ScenarioOutcome,
}

// ============================================================================
// SECTION: Report
// ============================================================================

/// Outcomes of one run in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SuiteReport {
    /// One record per scenario.
    pub scenarios: Vec<ScenarioRecord>,
}

impl SuiteReport {
    /// Appends a record.
    pub(crate) fn push(&mut self, name: &str, kind: ScenarioKind, outcome: ScenarioOutcome) {
        self.scenarios.push(ScenarioRecord {
            name: name.to_string(),
            kind,
            outcome,
        });
    }

    /// Returns the outcome recorded for `name`.
    #[must_use]
    pub fn outcome(&self, name: &str) -> Option<&ScenarioOutcome> {
        self.scenarios.iter().find(|record| record.name == name).map(|record| &record.outcome)
    }

    /// Counts passed scenarios.
    #[must_use]
    pub fn passed(&self) -> usize {
        self.count(|outcome| matches!(outcome, ScenarioOutcome::Passed))
    }

    /// Counts failed scenarios.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|outcome| matches!(outcome, ScenarioOutcome::Failed { .. }))
    }

    /// Counts skipped scenarios.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(|outcome| matches!(outcome, ScenarioOutcome::Skipped { .. }))
    }

    /// Counts aborted scenarios.
    #[must_use]
    pub fn aborted(&self) -> usize {
        self.count(|outcome| matches!(outcome, ScenarioOutcome::Aborted { .. }))
    }

    /// Returns true when the run had scenarios and every one was skipped.
    #[must_use]
    pub fn all_skipped(&self) -> bool {
        !self.scenarios.is_empty() && self.skipped() == self.scenarios.len()
    }

    /// Returns the failed and aborted records.
    #[must_use]
    pub fn failures(&self) -> Vec<&ScenarioRecord> {
        self.scenarios
            .iter()
            .filter(|record| {
                matches!(
                    record.outcome,
                    ScenarioOutcome::Failed { .. } | ScenarioOutcome::Aborted { .. }
                )
            })
            .collect()
    }

    /// Succeeds unless a scenario failed or was aborted.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteFailure`] naming each failed or aborted scenario.
    pub fn ensure_success(&self) -> Result<(), SuiteFailure> {
        let failures: Vec<String> = self
            .failures()
            .into_iter()
            .map(|record| match &record.outcome {
                ScenarioOutcome::Failed {
                    error,
                } => format!("{}: {error}", record.name),
                ScenarioOutcome::Aborted {
                    reason,
                } => format!("{}: aborted ({reason})", record.name),
                ScenarioOutcome::Passed | ScenarioOutcome::Skipped { .. } => record.name.clone(),
            })
            .collect();
        if failures.is_empty() {
            Ok(())
        } else {
            Err(SuiteFailure {
                failures,
            })
        }
    }

    /// Counts records whose outcome matches `predicate`.
    fn count(&self, predicate: impl Fn(&ScenarioOutcome) -> bool) -> usize {
        self.scenarios.iter().filter(|record| predicate(&record.outcome)).count()
    }
}
