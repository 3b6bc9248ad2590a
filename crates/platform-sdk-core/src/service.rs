// crates/platform-sdk-core/src/service.rs
// ============================================================================
// Module: Base Service
// Description: Shared HTTP execution for generated service clients.
// Purpose: Build URLs, authenticate, retry, and decode JSON responses.
// Dependencies: reqwest, serde, serde_json, url
// ============================================================================

//! ## Overview
//! [`BaseService`] owns the blocking HTTP client, service URL, authenticator,
//! default headers, and optional [`RetryPolicy`]. Generated clients describe
//! each call as an [`ApiRequest`] and hand it to [`BaseService::execute`],
//! which returns a [`DetailedResponse`] or an [`SdkError`].
//!
//! Path parameters are percent-encoded segment by segment, so identifiers
//! containing `/` or spaces cannot escape their position in the path.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::thread;
use std::time::Duration;
use std::time::Instant;
use std::time::SystemTime;

use reqwest::Method;
use reqwest::Url;
use reqwest::blocking::Client;
use reqwest::blocking::Response;
use reqwest::header::ACCEPT;
use reqwest::header::AUTHORIZATION;
use reqwest::header::CONTENT_TYPE;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderName;
use reqwest::header::HeaderValue;
use reqwest::header::RETRY_AFTER;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::auth::Authenticator;
use crate::error::SdkError;
use crate::properties::ServiceProperties;
use crate::properties::keys;
use crate::response::DetailedResponse;
use crate::retry::RetryPolicy;
use crate::retry::parse_retry_after;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
/// Media type for JSON requests and responses.
const JSON_MEDIA_TYPE: &str = "application/json";

// ============================================================================
// SECTION: Options
// ============================================================================

/// Construction options for a [`BaseService`].
#[derive(Clone)]
pub struct ServiceOptions {
    /// Service name used for external configuration lookups.
    pub service_name: String,
    /// Service endpoint URL.
    pub url: String,
    /// Authenticator applied to every request.
    pub authenticator: Arc<dyn Authenticator>,
    /// Disables TLS certificate verification.
    pub disable_ssl_verification: bool,
    /// Per-request timeout.
    pub timeout: Duration,
    /// User agent sent with every request.
    pub user_agent: String,
}

impl ServiceOptions {
    /// Builds options with default timeout, TLS verification, and user agent.
    #[must_use]
    pub fn new(
        service_name: impl Into<String>,
        url: impl Into<String>,
        authenticator: Arc<dyn Authenticator>,
    ) -> Self {
        Self {
            service_name: service_name.into(),
            url: url.into(),
            authenticator,
            disable_ssl_verification: false,
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("platform-sdk-rust/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

// ============================================================================
// SECTION: Requests
// ============================================================================

/// Description of one service call.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// Operation name used in logs and errors.
    operation: &'static str,
    /// HTTP method.
    method: Method,
    /// Unencoded path segments appended to the service URL.
    segments: Vec<String>,
    /// Serialized JSON body.
    body: Option<Vec<u8>>,
    /// Per-request headers.
    headers: HeaderMap,
}

impl ApiRequest {
    /// Starts a request for `operation`.
    #[must_use]
    pub fn new(operation: &'static str, method: Method) -> Self {
        Self {
            operation,
            method,
            segments: Vec::new(),
            body: None,
            headers: HeaderMap::new(),
        }
    }

    /// Appends a path segment; the value is percent-encoded when sent.
    #[must_use]
    pub fn segment(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    /// Serializes `body` as the JSON request body.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Validation`] when the body cannot be serialized.
    pub fn json<B: Serialize>(mut self, body: &B) -> Result<Self, SdkError> {
        let bytes = serde_json::to_vec(body).map_err(|err| {
            SdkError::Validation(format!("{}: invalid request body: {err}", self.operation))
        })?;
        self.body = Some(bytes);
        Ok(self)
    }

    /// Adds a request header.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Validation`] for invalid header names or values.
    pub fn header(mut self, name: &str, value: &str) -> Result<Self, SdkError> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| SdkError::Validation(format!("invalid header name: {name}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| SdkError::Validation(format!("invalid value for header {name}")))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Returns the operation name.
    #[must_use]
    pub const fn operation(&self) -> &'static str {
        self.operation
    }

    /// Returns the HTTP method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }
}

// ============================================================================
// SECTION: Base Service
// ============================================================================

/// HTTP execution shared by generated clients.
///
/// # Invariants
/// - `service_url` is validated and has no trailing slash.
/// - `client` reflects the current TLS verification setting.
pub struct BaseService {
    /// Service name used for external configuration lookups.
    service_name: String,
    /// Validated service URL as configured.
    service_url: String,
    /// Parsed service URL used to build request URLs.
    base_url: Url,
    /// Authenticator applied to every attempt.
    authenticator: Arc<dyn Authenticator>,
    /// Blocking HTTP client.
    client: Client,
    /// Per-request timeout.
    timeout: Duration,
    /// User agent sent with every request.
    user_agent: String,
    /// Whether TLS verification is disabled.
    disable_ssl_verification: bool,
    /// Headers added to every request.
    default_headers: HeaderMap,
    /// Automatic retry configuration, when enabled.
    retry: Option<RetryPolicy>,
}

impl BaseService {
    /// Builds a service from options.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Config`] when the URL is invalid or the HTTP client
    /// cannot be built.
    pub fn new(options: ServiceOptions) -> Result<Self, SdkError> {
        let (service_url, base_url) = validate_service_url(&options.url)?;
        let client = build_client(
            options.timeout,
            &options.user_agent,
            options.disable_ssl_verification,
        )?;
        Ok(Self {
            service_name: options.service_name,
            service_url,
            base_url,
            authenticator: options.authenticator,
            client,
            timeout: options.timeout,
            user_agent: options.user_agent,
            disable_ssl_verification: options.disable_ssl_verification,
            default_headers: HeaderMap::new(),
            retry: None,
        })
    }

    /// Returns the service name.
    #[must_use]
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Returns the configured service URL.
    #[must_use]
    pub fn service_url(&self) -> &str {
        &self.service_url
    }

    /// Replaces the service URL.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Config`] when the URL is invalid.
    pub fn set_service_url(&mut self, url: &str) -> Result<(), SdkError> {
        let (service_url, base_url) = validate_service_url(url)?;
        self.service_url = service_url;
        self.base_url = base_url;
        Ok(())
    }

    /// Returns the authenticator.
    #[must_use]
    pub fn authenticator(&self) -> &Arc<dyn Authenticator> {
        &self.authenticator
    }

    /// Enables or disables TLS certificate verification.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Config`] when the HTTP client cannot be rebuilt.
    pub fn set_disable_ssl_verification(&mut self, disable: bool) -> Result<(), SdkError> {
        if disable != self.disable_ssl_verification {
            self.client = build_client(self.timeout, &self.user_agent, disable)?;
            self.disable_ssl_verification = disable;
        }
        Ok(())
    }

    /// Replaces the headers sent with every request.
    pub fn set_default_headers(&mut self, headers: HeaderMap) {
        self.default_headers = headers;
    }

    /// Enables retries; zero values select the defaults.
    pub fn enable_retries(&mut self, max_retries: u32, max_interval: Duration) {
        self.retry = Some(RetryPolicy::new(max_retries, max_interval));
    }

    /// Installs an explicit retry policy.
    pub fn set_retry_policy(&mut self, policy: RetryPolicy) {
        self.retry = Some(policy);
    }

    /// Disables retries.
    pub fn disable_retries(&mut self) {
        self.retry = None;
    }

    /// Returns the active retry policy.
    #[must_use]
    pub const fn retry_policy(&self) -> Option<&RetryPolicy> {
        self.retry.as_ref()
    }

    /// Applies URL, TLS, and retry settings from external properties.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] when a property is malformed.
    pub fn configure_from_properties(
        &mut self,
        properties: &ServiceProperties,
    ) -> Result<(), SdkError> {
        if let Some(url) = properties.url() {
            self.set_service_url(url)?;
        }
        if let Some(disable) = properties.get_bool(keys::DISABLE_SSL)? {
            self.set_disable_ssl_verification(disable)?;
        }
        if properties.get_bool(keys::ENABLE_RETRIES)?.unwrap_or(false) {
            let max_retries = properties.get_u64(keys::MAX_RETRIES)?.unwrap_or(0);
            let max_retries = u32::try_from(max_retries).map_err(|_| {
                SdkError::Config(format!("{} exceeds the supported range", keys::MAX_RETRIES))
            })?;
            let interval = properties.get_u64(keys::RETRY_INTERVAL)?.unwrap_or(0);
            self.enable_retries(max_retries, Duration::from_secs(interval));
        }
        Ok(())
    }

    /// Returns the fully encoded URL for `request`.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Config`] when the service URL cannot take a path.
    pub fn request_url(&self, request: &ApiRequest) -> Result<Url, SdkError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                SdkError::Config(format!("service url {} cannot be a base", self.service_url))
            })?;
            segments.pop_if_empty();
            for segment in &request.segments {
                segments.push(segment);
            }
        }
        Ok(url)
    }

    /// Sends `request`, retrying per policy, and decodes the response body.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Api`] for non-success statuses,
    /// [`SdkError::Transport`] when the service is unreachable,
    /// [`SdkError::Authentication`] when credentials fail, and
    /// [`SdkError::Decode`] when the body does not match `T`.
    pub fn execute<T: DeserializeOwned>(
        &self,
        request: &ApiRequest,
    ) -> Result<DetailedResponse<T>, SdkError> {
        let url = self.request_url(request)?;
        let mut attempt: u32 = 0;
        loop {
            let started = Instant::now();
            let outcome = self.send_once(request, &url);
            if let Some(delay) = self.retry_delay(attempt, &outcome) {
                tracing::warn!(
                    operation = request.operation,
                    attempt = attempt.saturating_add(1),
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    "retrying request"
                );
                thread::sleep(delay);
                attempt = attempt.saturating_add(1);
                continue;
            }
            let response = outcome?;
            tracing::debug!(
                operation = request.operation,
                status = response.status().as_u16(),
                elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
                "received response"
            );
            return decode_response(request.operation, response);
        }
    }

    /// Issues a single attempt.
    fn send_once(&self, request: &ApiRequest, url: &Url) -> Result<Response, SdkError> {
        let mut builder = self
            .client
            .request(request.method.clone(), url.clone())
            .header(ACCEPT, JSON_MEDIA_TYPE)
            .headers(self.default_headers.clone())
            .headers(request.headers.clone());
        if let Some(authorization) = self.authenticator.authorization_header()? {
            builder = builder.header(AUTHORIZATION, authorization);
        }
        if let Some(body) = &request.body {
            builder = builder.header(CONTENT_TYPE, JSON_MEDIA_TYPE).body(body.clone());
        }
        tracing::debug!(
            operation = request.operation,
            method = %request.method,
            url = %url,
            "sending request"
        );
        builder.send().map_err(|err| {
            SdkError::Transport(format!("{} {url}: {err}", request.method))
        })
    }

    /// Returns the delay before the next attempt, or `None` to stop.
    fn retry_delay(
        &self,
        attempt: u32,
        outcome: &Result<Response, SdkError>,
    ) -> Option<Duration> {
        let policy = self.retry.as_ref()?;
        if attempt >= policy.max_retries() {
            return None;
        }
        match outcome {
            Err(SdkError::Transport(_)) => Some(policy.backoff(attempt, None)),
            Ok(response) if RetryPolicy::is_retryable_status(response.status().as_u16()) => {
                let retry_after = response
                    .headers()
                    .get(RETRY_AFTER)
                    .and_then(|value| value.to_str().ok())
                    .and_then(|value| parse_retry_after(value, SystemTime::now()));
                Some(policy.backoff(attempt, retry_after))
            }
            _ => None,
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Validates and normalizes a service URL.
fn validate_service_url(raw: &str) -> Result<(String, Url), SdkError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(SdkError::Config("service url must not be empty".to_string()));
    }
    if trimmed.contains(['{', '}']) {
        return Err(SdkError::Config(format!(
            "service url {trimmed} contains unresolved placeholders"
        )));
    }
    let parsed = Url::parse(trimmed)
        .map_err(|err| SdkError::Config(format!("invalid service url {trimmed}: {err}")))?;
    if parsed.cannot_be_a_base() {
        return Err(SdkError::Config(format!("service url {trimmed} cannot be a base")));
    }
    Ok((trimmed.to_string(), parsed))
}

/// Builds the blocking HTTP client.
fn build_client(
    timeout: Duration,
    user_agent: &str,
    disable_ssl_verification: bool,
) -> Result<Client, SdkError> {
    Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .danger_accept_invalid_certs(disable_ssl_verification)
        .build()
        .map_err(|err| SdkError::Config(format!("failed to build http client: {err}")))
}

/// Converts a response into a detailed response or an API error.
fn decode_response<T: DeserializeOwned>(
    operation: &str,
    response: Response,
) -> Result<DetailedResponse<T>, SdkError> {
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response
        .bytes()
        .map_err(|err| SdkError::Transport(format!("{operation}: failed to read body: {err}")))?;
    if !status.is_success() {
        let body = serde_json::from_slice::<Value>(&bytes).ok();
        let message = body
            .as_ref()
            .and_then(error_message)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());
        return Err(SdkError::Api {
            status: status.as_u16(),
            message,
            body: body.map(Box::new),
        });
    }
    let result = if bytes.iter().all(u8::is_ascii_whitespace) {
        None
    } else {
        Some(serde_json::from_slice::<T>(&bytes).map_err(|err| {
            SdkError::Decode(format!("{operation}: {err}"))
        })?)
    };
    Ok(DetailedResponse {
        status_code: status.as_u16(),
        headers,
        result,
    })
}

/// Extracts a human-readable message from an error body.
fn error_message(body: &Value) -> Option<String> {
    let first_error = body
        .get("errors")
        .and_then(Value::as_array)
        .and_then(|errors| errors.first())
        .and_then(|error| error.get("message"));
    [first_error, body.get("message"), body.get("error"), body.get("errorMessage")]
        .into_iter()
        .flatten()
        .find_map(Value::as_str)
        .map(ToString::to_string)
}
