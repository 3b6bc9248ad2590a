// system-tests/src/harness/mod.rs
// ============================================================================
// Module: Conditional Integration Harness
// Description: Gated, link-checked sequential scenario runner.
// Purpose: Run an ordered suite against a live service or skip it uniformly.
// Dependencies: platform-sdk-core, serde, thiserror, tracing
// ============================================================================

//! ## Overview
//! The harness runs a fixed, ordered list of named scenarios. A gate scenario
//! establishes prerequisites; until it passes, every other scenario is
//! skipped without executing. Values produced by early scenarios (created
//! identifiers) reach later ones through declared links, and the pipeline
//! checks those declarations when it is composed.
//!
//! All run state lives in an explicit [`RunContext`]; nothing is global.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod context;
mod error;
mod expect;
mod gate;
mod links;
mod pipeline;
mod report;
mod scenario;

// ============================================================================
// SECTION: Tests
// ============================================================================


// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use context::RunContext;
pub use error::CompositionError;
pub use error::LinkError;
pub use error::ScenarioError;
pub use error::SuiteFailure;
pub use expect::expect_field;
pub use expect::expect_payload;
pub use expect::expect_status;
pub use gate::SkipGate;
pub use links::LinkName;
pub use links::LinkStore;
pub use pipeline::Pipeline;
pub use pipeline::PipelineBuilder;
pub use report::ScenarioOutcome;
pub use report::ScenarioRecord;
pub use report::SuiteReport;
pub use scenario::Scenario;
pub use scenario::ScenarioBody;
pub use scenario::ScenarioKind;
