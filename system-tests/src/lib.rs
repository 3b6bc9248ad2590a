// system-tests/src/lib.rs
// ============================================================================
// Module: Metrics Router System Tests Library
// Description: Conditional integration harness and the metrics router suite.
// Purpose: Provide the scenario runner and configuration for system tests.
// Dependencies: metrics-router, platform-sdk-core
// ============================================================================

//! ## Overview
//! This crate hosts the conditional integration harness, the metrics router
//! scenario suite built on it, and the environment configuration used by the
//! system-test binaries in `system-tests/tests`.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod harness;
pub mod suite;
