// system-tests/src/harness/expect.rs
// ============================================================================
// Module: Response Expectations
// Description: Status and payload checks for remote operation results.
// Purpose: Turn client results into scenario errors with operation context.
// Dependencies: platform-sdk-core
// ============================================================================

//! ## Overview
//! Scenario bodies pass each client result through [`expect_status`] and,
//! where a body is required, [`expect_payload`]. Reads that name an entity
//! confirm it with [`expect_field`].

use platform_sdk_core::DetailedResponse;
use platform_sdk_core::SdkError;

use crate::harness::error::ScenarioError;

/// Requires a successful call that returned `expected`.
///
/// # Errors
///
/// Returns [`ScenarioError::Remote`] when the call failed and
/// [`ScenarioError::UnexpectedStatus`] on a status mismatch.
pub fn expect_status<T>(
    operation: &'static str,
    result: Result<DetailedResponse<T>, SdkError>,
    expected: u16,
) -> Result<DetailedResponse<T>, ScenarioError> {
    let response = result.map_err(|err| ScenarioError::remote(operation, &err))?;
    if response.status_code != expected {
        return Err(ScenarioError::UnexpectedStatus {
            operation,
            expected,
            actual: response.status_code,
        });
    }
    Ok(response)
}

/// Requires the response to carry a decoded body.
///
/// # Errors
///
/// Returns [`ScenarioError::MissingPayload`] when the body was empty.
pub fn expect_payload<T>(
    operation: &'static str,
    response: DetailedResponse<T>,
) -> Result<T, ScenarioError> {
    response.into_result().ok_or(ScenarioError::MissingPayload {
        operation,
    })
}

/// Requires a returned entity field to equal the requested value.
///
/// # Errors
///
/// Returns [`ScenarioError::EntityMismatch`] when the values differ.
pub fn expect_field(
    operation: &'static str,
    field: &'static str,
    expected: &str,
    actual: &str,
) -> Result<(), ScenarioError> {
    if expected == actual {
        return Ok(());
    }
    Err(ScenarioError::EntityMismatch {
        operation,
        field,
        expected: expected.to_string(),
        actual: actual.to_string(),
    })
}
