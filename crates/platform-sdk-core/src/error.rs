// crates/platform-sdk-core/src/error.rs
// ============================================================================
// Module: SDK Errors
// Description: Error taxonomy shared by every generated service client.
// Purpose: Classify configuration, validation, transport, and API failures.
// Dependencies: serde_json, thiserror
// ============================================================================

//! ## Overview
//! Every fallible SDK call returns [`SdkError`]. Variants are stable so
//! callers can distinguish local mistakes (configuration, validation) from
//! remote ones (transport, API status, undecodable bodies).

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;
use thiserror::Error;

use crate::properties::PropertiesError;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// SDK failures.
///
/// # Invariants
/// - Variants are stable for error classification.
#[derive(Debug, Error)]
pub enum SdkError {
    /// Client or service configuration is invalid.
    #[error("invalid configuration: {0}")]
    Config(String),
    /// External service properties could not be loaded.
    #[error(transparent)]
    Properties(#[from] PropertiesError),
    /// Operation options failed validation before any request was sent.
    #[error("invalid argument: {0}")]
    Validation(String),
    /// The authenticator could not produce credentials.
    #[error("authentication failed: {0}")]
    Authentication(String),
    /// The request could not be delivered or the response could not be read.
    #[error("request failed: {0}")]
    Transport(String),
    /// The service answered with a non-success status.
    #[error("{message} (status {status})")]
    Api {
        /// HTTP status code returned by the service.
        status: u16,
        /// Error message extracted from the response body.
        message: String,
        /// Parsed response body, when it was JSON.
        body: Option<Box<Value>>,
    },
    /// The response body did not match the expected model.
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl SdkError {
    /// Returns the HTTP status for API errors.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api {
                status, ..
            } => Some(*status),
            _ => None,
        }
    }
}
