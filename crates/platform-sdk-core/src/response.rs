// crates/platform-sdk-core/src/response.rs
// ============================================================================
// Module: Detailed Response
// Description: Status, headers, and decoded body of a service response.
// Purpose: Let callers assert on status codes alongside typed results.
// Dependencies: reqwest
// ============================================================================

//! ## Overview
//! Every operation returns a [`DetailedResponse`]. The decoded body is
//! optional: operations that answer with no content, or services that omit
//! a body, yield `None`.

use reqwest::header::HeaderMap;

/// Response returned by every service operation.
#[derive(Debug, Clone)]
pub struct DetailedResponse<T> {
    /// HTTP status code.
    pub status_code: u16,
    /// Response headers.
    pub headers: HeaderMap,
    /// Decoded body, absent when the service sent none.
    pub result: Option<T>,
}

impl<T> DetailedResponse<T> {
    /// Returns the decoded body, if present.
    #[must_use]
    pub const fn result(&self) -> Option<&T> {
        self.result.as_ref()
    }

    /// Consumes the response and returns the decoded body.
    #[must_use]
    pub fn into_result(self) -> Option<T> {
        self.result
    }

    /// Returns a header value as UTF-8 text.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }
}
