// system-tests/src/harness/pipeline.rs
// ============================================================================
// Module: Scenario Pipeline
// Description: Ordered, link-checked scenario execution.
// Purpose: Compose scenarios safely and run them sequentially.
// Dependencies: tracing
// ============================================================================

//! ## Overview
//! [`PipelineBuilder::build`] rejects a pipeline when names repeat, a link has
//! two producers, or a scenario requires a link that no strictly earlier
//! scenario produces. [`Pipeline::run`] then executes scenarios one at a time
//! in declaration order and reports each outcome:
//!
//! - After a fatal failure, every later scenario is aborted.
//! - While the gate is closed, non-gate scenarios are skipped unexecuted.
//! - A scenario whose required link is missing fails without running.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use crate::harness::context::RunContext;
use crate::harness::error::CompositionError;
use crate::harness::error::ScenarioError;
use crate::harness::links::LinkName;
use crate::harness::report::ScenarioOutcome;
use crate::harness::report::SuiteReport;
use crate::harness::scenario::Scenario;
use crate::harness::scenario::ScenarioKind;

// ============================================================================
// SECTION: Builder
// ============================================================================

/// Collects scenarios in execution order.
#[derive(Debug)]
pub struct PipelineBuilder<S> {
    /// Scenarios in declaration order.
    scenarios: Vec<Scenario<S>>,
}

impl<S> PipelineBuilder<S> {
    /// Starts an empty pipeline.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            scenarios: Vec::new(),
        }
    }

    /// Appends a scenario.
    #[must_use]
    pub fn scenario(mut self, scenario: Scenario<S>) -> Self {
        self.scenarios.push(scenario);
        self
    }

    /// Validates link ordering and returns the runnable pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`CompositionError`] for duplicate names, duplicate producers,
    /// or links required before they are produced.
    pub fn build(self) -> Result<Pipeline<S>, CompositionError> {
        let mut names = BTreeSet::new();
        let mut producers: BTreeMap<LinkName, &'static str> = BTreeMap::new();
        for scenario in &self.scenarios {
            if !names.insert(scenario.name()) {
                return Err(CompositionError::DuplicateScenario(scenario.name().to_string()));
            }
            if let Some(link) =
                scenario.required_links().iter().find(|link| !producers.contains_key(*link))
            {
                return Err(CompositionError::UnorderedLink {
                    scenario: scenario.name().to_string(),
                    link: *link,
                });
            }
            for link in scenario.produced_links() {
                if let Some(first) = producers.insert(*link, scenario.name()) {
                    return Err(CompositionError::DuplicateProducer {
                        link: *link,
                        first: first.to_string(),
                        second: scenario.name().to_string(),
                    });
                }
            }
        }
        Ok(Pipeline {
            scenarios: self.scenarios,
        })
    }
}

impl<S> Default for PipelineBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// SECTION: Pipeline
// ============================================================================

/// Validated scenario sequence.
///
/// # Invariants
/// - Scenario names are unique.
/// - Each link has at most one producer, declared before every consumer.
#[derive(Debug)]
pub struct Pipeline<S> {
    /// Scenarios in execution order.
    scenarios: Vec<Scenario<S>>,
}

impl<S> Pipeline<S> {
    /// Returns the scenario names in execution order.
    #[must_use]
    pub fn scenario_names(&self) -> Vec<&'static str> {
        self.scenarios.iter().map(Scenario::name).collect()
    }

    /// Runs every scenario against `context` and reports each outcome.
    pub fn run(&self, context: &mut RunContext<S>) -> SuiteReport {
        let mut report = SuiteReport::default();
        let mut aborted_by: Option<String> = None;
        for scenario in &self.scenarios {
            let outcome = match &aborted_by {
                Some(reason) => ScenarioOutcome::Aborted {
                    reason: reason.clone(),
                },
                None => Self::run_one(scenario, context),
            };
            if scenario.kind() == ScenarioKind::Fatal
                && matches!(outcome, ScenarioOutcome::Failed { .. })
            {
                aborted_by = Some(format!("fatal scenario {} failed", scenario.name()));
            }
            log_outcome(scenario.name(), &outcome);
            report.push(scenario.name(), scenario.kind(), outcome);
        }
        tracing::info!(
            passed = report.passed(),
            failed = report.failed(),
            skipped = report.skipped(),
            aborted = report.aborted(),
            "suite finished"
        );
        report
    }

    /// Executes one scenario, honoring the gate and required links.
    fn run_one(scenario: &Scenario<S>, context: &mut RunContext<S>) -> ScenarioOutcome {
        let is_gate = scenario.kind() == ScenarioKind::Gate;
        if !is_gate && let Some(reason) = context.gate().skip_reason() {
            return ScenarioOutcome::Skipped {
                reason: reason.to_string(),
            };
        }
        if let Some(link) =
            scenario.required_links().iter().find(|link| !context.links().contains(**link))
        {
            return ScenarioOutcome::Failed {
                error: ScenarioError::MissingLink(*link).to_string(),
            };
        }
        match scenario.execute(context) {
            Ok(()) => {
                if is_gate {
                    context.gate_mut().open();
                }
                ScenarioOutcome::Passed
            }
            Err(ScenarioError::Skip(reason)) => {
                if is_gate {
                    context.gate_mut().record_skip(reason.clone());
                }
                ScenarioOutcome::Skipped {
                    reason,
                }
            }
            Err(err) => ScenarioOutcome::Failed {
                error: err.to_string(),
            },
        }
    }
}

/// Logs a scenario outcome at a level matching its severity.
fn log_outcome(name: &str, outcome: &ScenarioOutcome) {
    match outcome {
        ScenarioOutcome::Passed => tracing::info!(scenario = name, "scenario passed"),
        ScenarioOutcome::Skipped {
            reason,
        } => tracing::warn!(scenario = name, reason = reason.as_str(), "scenario skipped"),
        ScenarioOutcome::Failed {
            error,
        } => tracing::error!(scenario = name, error = error.as_str(), "scenario failed"),
        ScenarioOutcome::Aborted {
            reason,
        } => tracing::error!(scenario = name, reason = reason.as_str(), "scenario aborted"),
    }
}
