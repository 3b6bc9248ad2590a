// system-tests/src/harness/error.rs
// ============================================================================
// Module: Harness Errors
// Description: Error taxonomy for scenarios, links, and pipeline composition.
// Purpose: Distinguish skips, setup failures, remote failures, and mismatches.
// Dependencies: platform-sdk-core, thiserror
// ============================================================================

//! ## Overview
//! [`ScenarioError`] is what a scenario body returns. The pipeline maps it to
//! an outcome: [`ScenarioError::Skip`] becomes a skip, everything else a
//! failure. [`CompositionError`] rejects pipelines before anything runs, and
//! [`LinkError`] guards the single-writer link store.

// ============================================================================
// SECTION: Imports
// ============================================================================

use platform_sdk_core::SdkError;
use thiserror::Error;

use crate::harness::links::LinkName;

// ============================================================================
// SECTION: Scenario Errors
// ============================================================================

/// Failure or skip signal raised by a scenario body.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// Prerequisites are absent; the scenario is skipped, not failed.
    #[error("skipped: {0}")]
    Skip(String),
    /// The suite could not be set up (client construction, URL mismatch).
    #[error("setup failed: {0}")]
    Setup(String),
    /// The remote call returned an error.
    #[error("{operation} failed: {message}")]
    Remote {
        /// Operation that failed.
        operation: &'static str,
        /// Error reported by the client.
        message: String,
    },
    /// The remote call succeeded with a different status than expected.
    #[error("{operation} returned status {actual}, expected {expected}")]
    UnexpectedStatus {
        /// Operation under test.
        operation: &'static str,
        /// Status the scenario requires.
        expected: u16,
        /// Status the service returned.
        actual: u16,
    },
    /// The remote call succeeded without a response body.
    #[error("{operation} returned no payload")]
    MissingPayload {
        /// Operation under test.
        operation: &'static str,
    },
    /// The service returned a different entity than the one requested.
    #[error("{operation} returned {field} {actual}, expected {expected}")]
    EntityMismatch {
        /// Operation under test.
        operation: &'static str,
        /// Field that differs.
        field: &'static str,
        /// Value the scenario requires.
        expected: String,
        /// Value the service returned.
        actual: String,
    },
    /// A required link was never produced because its producer did not pass.
    #[error("required link {0} was never produced")]
    MissingLink(LinkName),
    /// A link store rule was violated.
    #[error(transparent)]
    Link(#[from] LinkError),
}

impl ScenarioError {
    /// Wraps a client error raised by `operation`.
    #[must_use]
    pub fn remote(operation: &'static str, error: &SdkError) -> Self {
        Self::Remote {
            operation,
            message: error.to_string(),
        }
    }

    /// Returns true for the skip signal.
    #[must_use]
    pub const fn is_skip(&self) -> bool {
        matches!(self, Self::Skip(_))
    }
}

// ============================================================================
// SECTION: Link Errors
// ============================================================================

/// Violations of the link store's single-writer rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    /// The link already holds a value.
    #[error("link {0} was already written")]
    AlreadySet(LinkName),
    /// The produced value was empty.
    #[error("link {0} must not be empty")]
    Empty(LinkName),
    /// The scenario touched a link it did not declare.
    #[error("scenario {scenario} did not declare link {link}")]
    Undeclared {
        /// Scenario that accessed the link.
        scenario: String,
        /// Link that was accessed.
        link: LinkName,
    },
}

// ============================================================================
// SECTION: Composition Errors
// ============================================================================

/// Reasons a pipeline is rejected before it runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompositionError {
    /// Two scenarios share a name.
    #[error("scenario {0} is declared more than once")]
    DuplicateScenario(String),
    /// Two scenarios produce the same link.
    #[error("link {link} is produced by both {first} and {second}")]
    DuplicateProducer {
        /// Link with two writers.
        link: LinkName,
        /// Earlier producer.
        first: String,
        /// Later producer.
        second: String,
    },
    /// A scenario requires a link no earlier scenario produces.
    #[error("scenario {scenario} requires link {link}, which no earlier scenario produces")]
    UnorderedLink {
        /// Consuming scenario.
        scenario: String,
        /// Required link.
        link: LinkName,
    },
}

// ============================================================================
// SECTION: Suite Failure
// ============================================================================

/// Summary error for a run with failed or aborted scenarios.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} scenario(s) did not pass: {}", .failures.len(), .failures.join("; "))]
pub struct SuiteFailure {
    /// One `name: reason` entry per failed or aborted scenario.
    pub failures: Vec<String>,
}
