// system-tests/src/harness/scenario.rs
// ============================================================================
// Module: Scenarios
// Description: Named scenario bodies with declared link dependencies.
// Purpose: Make sequential coupling between scenarios explicit.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`Scenario`] pairs a name and a body with the links it requires and
//! produces. Its [`ScenarioKind`] decides how the pipeline treats it:
//!
//! - [`ScenarioKind::Gate`] always runs; success opens the skip gate.
//! - [`ScenarioKind::Fatal`] aborts the rest of the run when it fails.
//! - [`ScenarioKind::Standard`] failures stay local to the scenario.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Serialize;

use crate::harness::context::RunContext;
use crate::harness::error::ScenarioError;
use crate::harness::links::LinkName;

// ============================================================================
// SECTION: Types
// ============================================================================

/// How the pipeline treats a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    /// Establishes prerequisites; runs even while the gate is closed.
    Gate,
    /// Failure aborts every later scenario.
    Fatal,
    /// Failure is reported and the run continues.
    Standard,
}

/// Boxed scenario body.
pub type ScenarioBody<S> = Box<dyn Fn(&mut RunContext<S>) -> Result<(), ScenarioError>>;

/// One named step of a suite.
pub struct Scenario<S> {
    /// Unique scenario name.
    name: &'static str,
    /// Pipeline treatment.
    kind: ScenarioKind,
    /// Links read by the body.
    requires: Vec<LinkName>,
    /// Links written by the body.
    produces: Vec<LinkName>,
    /// Scenario body.
    body: ScenarioBody<S>,
}

impl<S> Scenario<S> {
    /// Builds a scenario of the given kind.
    #[must_use]
    pub fn new<F>(name: &'static str, kind: ScenarioKind, body: F) -> Self
    where
        F: Fn(&mut RunContext<S>) -> Result<(), ScenarioError> + 'static,
    {
        Self {
            name,
            kind,
            requires: Vec::new(),
            produces: Vec::new(),
            body: Box::new(body),
        }
    }

    /// Builds a gate scenario.
    #[must_use]
    pub fn gate<F>(name: &'static str, body: F) -> Self
    where
        F: Fn(&mut RunContext<S>) -> Result<(), ScenarioError> + 'static,
    {
        Self::new(name, ScenarioKind::Gate, body)
    }

    /// Builds a fatal scenario.
    #[must_use]
    pub fn fatal<F>(name: &'static str, body: F) -> Self
    where
        F: Fn(&mut RunContext<S>) -> Result<(), ScenarioError> + 'static,
    {
        Self::new(name, ScenarioKind::Fatal, body)
    }

    /// Builds a standard scenario.
    #[must_use]
    pub fn standard<F>(name: &'static str, body: F) -> Self
    where
        F: Fn(&mut RunContext<S>) -> Result<(), ScenarioError> + 'static,
    {
        Self::new(name, ScenarioKind::Standard, body)
    }

    /// Declares a link the body reads.
    #[must_use]
    pub fn requires(mut self, link: LinkName) -> Self {
        self.requires.push(link);
        self
    }

    /// Declares a link the body writes.
    #[must_use]
    pub fn produces(mut self, link: LinkName) -> Self {
        self.produces.push(link);
        self
    }

    /// Returns the scenario name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the scenario kind.
    #[must_use]
    pub const fn kind(&self) -> ScenarioKind {
        self.kind
    }

    /// Returns the required links.
    #[must_use]
    pub fn required_links(&self) -> &[LinkName] {
        &self.requires
    }

    /// Returns the produced links.
    #[must_use]
    pub fn produced_links(&self) -> &[LinkName] {
        &self.produces
    }

    /// Runs the body against `context`.
    pub(crate) fn execute(&self, context: &mut RunContext<S>) -> Result<(), ScenarioError> {
        context.enter(self.name, &self.requires, &self.produces);
        let result = (self.body)(context);
        context.leave();
        result
    }
}

impl<S> fmt::Debug for Scenario<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scenario")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("requires", &self.requires)
            .field("produces", &self.produces)
            .finish_non_exhaustive()
    }
}
