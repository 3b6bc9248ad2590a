// system-tests/src/harness/context.rs
// ============================================================================
// Module: Run Context
// Description: Explicit per-run state handed to every scenario.
// Purpose: Replace global flags and shared variables with one owned value.
// Dependencies: std
// ============================================================================

//! ## Overview
//! A [`RunContext`] owns the [`SkipGate`], the [`LinkStore`], and a
//! suite-specific state value `S` (the service client, loaded configuration).
//! While a scenario runs, the context knows its declared links and rejects
//! access to anything else.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::harness::error::LinkError;
use crate::harness::error::ScenarioError;
use crate::harness::gate::SkipGate;
use crate::harness::links::LinkName;
use crate::harness::links::LinkStore;

// ============================================================================
// SECTION: Active Scenario
// ============================================================================

/// Declarations of the scenario currently executing.
#[derive(Debug, Clone)]
struct ActiveScenario {
    /// Scenario name.
    name: &'static str,
    /// Links the scenario may read.
    requires: Vec<LinkName>,
    /// Links the scenario may write.
    produces: Vec<LinkName>,
}

// ============================================================================
// SECTION: Run Context
// ============================================================================

/// State shared by the scenarios of one run.
#[derive(Debug)]
pub struct RunContext<S> {
    /// Run-wide skip switch.
    gate: SkipGate,
    /// Values handed between scenarios.
    links: LinkStore,
    /// Suite-specific state.
    state: S,
    /// Scenario currently executing, if any.
    active: Option<ActiveScenario>,
}

impl<S> RunContext<S> {
    /// Creates a context with a closed gate and no links.
    #[must_use]
    pub fn new(state: S) -> Self {
        Self {
            gate: SkipGate::new(),
            links: LinkStore::new(),
            state,
            active: None,
        }
    }

    /// Returns the skip gate.
    #[must_use]
    pub const fn gate(&self) -> &SkipGate {
        &self.gate
    }

    /// Returns the skip gate for the gate scenario's bookkeeping.
    pub(crate) const fn gate_mut(&mut self) -> &mut SkipGate {
        &mut self.gate
    }

    /// Returns the link store.
    #[must_use]
    pub const fn links(&self) -> &LinkStore {
        &self.links
    }

    /// Returns the suite state.
    #[must_use]
    pub const fn state(&self) -> &S {
        &self.state
    }

    /// Returns the suite state mutably.
    pub const fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }

    /// Consumes the context and returns the suite state.
    #[must_use]
    pub fn into_state(self) -> S {
        self.state
    }

    /// Reads a link the active scenario declared as required.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::Undeclared`] for undeclared links and
    /// [`ScenarioError::MissingLink`] when the link was never written.
    pub fn link(&self, name: LinkName) -> Result<&str, ScenarioError> {
        self.check_declared(name, |active| &active.requires)?;
        self.links.get(name).ok_or(ScenarioError::MissingLink(name))
    }

    /// Writes a link the active scenario declared as produced.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError`] for undeclared, repeated, or empty writes.
    pub fn produce(&mut self, name: LinkName, value: impl Into<String>) -> Result<(), ScenarioError> {
        self.check_declared(name, |active| &active.produces)?;
        self.links.set(name, value)?;
        Ok(())
    }

    /// Marks a scenario as executing.
    pub(crate) fn enter(&mut self, name: &'static str, requires: &[LinkName], produces: &[LinkName]) {
        self.active = Some(ActiveScenario {
            name,
            requires: requires.to_vec(),
            produces: produces.to_vec(),
        });
    }

    /// Clears the executing scenario.
    pub(crate) fn leave(&mut self) {
        self.active = None;
    }

    /// Verifies the active scenario lists `name` in the selected declaration.
    fn check_declared(
        &self,
        name: LinkName,
        declared: impl Fn(&ActiveScenario) -> &Vec<LinkName>,
    ) -> Result<(), LinkError> {
        match &self.active {
            Some(active) if declared(active).contains(&name) => Ok(()),
            Some(active) => Err(LinkError::Undeclared {
                scenario: active.name.to_string(),
                link: name,
            }),
            None => Err(LinkError::Undeclared {
                scenario: "<none>".to_string(),
                link: name,
            }),
        }
    }
}
