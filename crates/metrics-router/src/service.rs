// crates/metrics-router/src/service.rs
// ============================================================================
// Module: Metrics Router Client
// Description: Blocking client for the metrics router v3 API.
// Purpose: Map each API operation onto a validated, authenticated request.
// Dependencies: platform-sdk-core, reqwest, serde, tracing
// ============================================================================

//! ## Overview
//! [`MetricsRouterV3`] wraps a [`BaseService`] and exposes one method per API
//! operation. Every method validates its input, issues exactly one logical
//! request (retries are the base service's concern), and returns the
//! [`DetailedResponse`] so callers can inspect status codes and headers.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use platform_sdk_core::ApiRequest;
use platform_sdk_core::Authenticator;
use platform_sdk_core::BaseService;
use platform_sdk_core::DetailedResponse;
use platform_sdk_core::SdkError;
use platform_sdk_core::ServiceOptions;
use platform_sdk_core::ServiceProperties;
use platform_sdk_core::authenticator_from_properties;
use reqwest::Method;
use reqwest::header::HeaderMap;
use serde::de::IgnoredAny;

use crate::models::Route;
use crate::models::RouteCollection;
use crate::models::Settings;
use crate::models::Target;
use crate::models::TargetCollection;
use crate::models::WarningReport;
use crate::options::CreateRouteOptions;
use crate::options::CreateTargetOptions;
use crate::options::ReplaceRouteOptions;
use crate::options::ReplaceSettingsOptions;
use crate::options::ReplaceTargetOptions;
use crate::options::require_value;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Service name used for external configuration lookups.
pub const DEFAULT_SERVICE_NAME: &str = "metrics_router";
/// Endpoint used when no URL is configured.
pub const DEFAULT_SERVICE_URL: &str = "https://us-south.metrics-router.cloud.ibm.com/api/v3";
/// Regions with a public and private endpoint.
const REGIONS: [&str; 5] = ["us-south", "us-east", "eu-de", "eu-gb", "au-syd"];
/// Path segment for target resources.
const TARGETS: &str = "targets";
/// Path segment for route resources.
const ROUTES: &str = "routes";
/// Path segment for account settings.
const SETTINGS: &str = "settings";

/// Returns the endpoint URL for `region`, e.g. `eu-de` or `private.eu-de`.
///
/// # Errors
///
/// Returns [`SdkError::Config`] for unknown regions.
pub fn service_url_for_region(region: &str) -> Result<String, SdkError> {
    let public = region.strip_prefix("private.").unwrap_or(region);
    if REGIONS.contains(&public) {
        Ok(format!("https://{region}.metrics-router.cloud.ibm.com/api/v3"))
    } else {
        Err(SdkError::Config(format!("unknown metrics router region: {region}")))
    }
}

// ============================================================================
// SECTION: Options
// ============================================================================

/// Construction options for [`MetricsRouterV3`].
#[derive(Clone)]
pub struct MetricsRouterV3Options {
    /// Service name used for external configuration lookups.
    pub service_name: String,
    /// Endpoint URL; [`DEFAULT_SERVICE_URL`] when unset.
    pub url: Option<String>,
    /// Authenticator; built from external properties when unset.
    pub authenticator: Option<Arc<dyn Authenticator>>,
    /// Per-request timeout; the base service default when unset.
    pub timeout: Option<Duration>,
}

impl MetricsRouterV3Options {
    /// Options using the default service name, URL, and external credentials.
    #[must_use]
    pub fn new() -> Self {
        Self {
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            url: None,
            authenticator: None,
            timeout: None,
        }
    }

    /// Sets the service name.
    #[must_use]
    pub fn with_service_name(mut self, service_name: impl Into<String>) -> Self {
        self.service_name = service_name.into();
        self
    }

    /// Sets the endpoint URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Sets the authenticator.
    #[must_use]
    pub fn with_authenticator(mut self, authenticator: Arc<dyn Authenticator>) -> Self {
        self.authenticator = Some(authenticator);
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl Default for MetricsRouterV3Options {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// SECTION: Client
// ============================================================================

/// Metrics router v3 client.
pub struct MetricsRouterV3 {
    /// Shared transport.
    base: BaseService,
}

impl MetricsRouterV3 {
    /// Builds a client with an explicit authenticator.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Config`] when no authenticator is set or the URL
    /// is invalid.
    pub fn new(options: MetricsRouterV3Options) -> Result<Self, SdkError> {
        let authenticator = options.authenticator.ok_or_else(|| {
            SdkError::Config(format!("an authenticator is required for {}", options.service_name))
        })?;
        let url = options.url.unwrap_or_else(|| DEFAULT_SERVICE_URL.to_string());
        let mut service_options = ServiceOptions::new(options.service_name, url, authenticator);
        if let Some(timeout) = options.timeout {
            service_options.timeout = timeout;
        }
        let base = BaseService::new(service_options)?;
        Ok(Self {
            base,
        })
    }

    /// Builds a client from the credentials file or environment of the
    /// configured service name.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] when properties cannot be loaded or are invalid.
    pub fn new_using_external_config(options: MetricsRouterV3Options) -> Result<Self, SdkError> {
        let properties = ServiceProperties::load(&options.service_name)?;
        Self::from_properties(options, &properties)
    }

    /// Builds a client from already loaded service properties.
    ///
    /// Properties override the options' URL and may enable retries.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] when the authenticator or a property is invalid.
    pub fn from_properties(
        mut options: MetricsRouterV3Options,
        properties: &ServiceProperties,
    ) -> Result<Self, SdkError> {
        if options.authenticator.is_none() {
            options.authenticator = Some(authenticator_from_properties(properties)?);
        }
        let mut client = Self::new(options)?;
        client.base.configure_from_properties(properties)?;
        tracing::debug!(
            service = client.base.service_name(),
            url = client.base.service_url(),
            "metrics router client configured from external properties"
        );
        Ok(client)
    }

    /// Returns the endpoint URL.
    #[must_use]
    pub fn service_url(&self) -> &str {
        self.base.service_url()
    }

    /// Replaces the endpoint URL.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Config`] when `url` is invalid.
    pub fn set_service_url(&mut self, url: &str) -> Result<(), SdkError> {
        self.base.set_service_url(url)
    }

    /// Enables automatic retries; zero values select the defaults.
    pub fn enable_retries(&mut self, max_retries: u32, max_interval: Duration) {
        self.base.enable_retries(max_retries, max_interval);
    }

    /// Disables automatic retries.
    pub fn disable_retries(&mut self) {
        self.base.disable_retries();
    }

    /// Sets headers sent with every request.
    pub fn set_default_headers(&mut self, headers: HeaderMap) {
        self.base.set_default_headers(headers);
    }

    /// Toggles TLS certificate verification.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Config`] when the HTTP client cannot be rebuilt.
    pub fn set_disable_ssl_verification(&mut self, disable: bool) -> Result<(), SdkError> {
        self.base.set_disable_ssl_verification(disable)
    }

    /// Returns the underlying base service.
    #[must_use]
    pub const fn base(&self) -> &BaseService {
        &self.base
    }

    // ------------------------------------------------------------------------
    // Targets
    // ------------------------------------------------------------------------

    /// Creates a target. Expects `201 Created`.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] for invalid options or a failed request.
    pub fn create_target(
        &self,
        options: &CreateTargetOptions,
    ) -> Result<DetailedResponse<Target>, SdkError> {
        options.validate()?;
        let request = ApiRequest::new("create_target", Method::POST).segment(TARGETS).json(options)?;
        self.base.execute(&request)
    }

    /// Lists targets in the account.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] when the request fails.
    pub fn list_targets(&self) -> Result<DetailedResponse<TargetCollection>, SdkError> {
        self.base.execute(&ApiRequest::new("list_targets", Method::GET).segment(TARGETS))
    }

    /// Fetches one target.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] for an empty id or a failed request.
    pub fn get_target(&self, id: &str) -> Result<DetailedResponse<Target>, SdkError> {
        require_value("id", id)?;
        self.base.execute(&ApiRequest::new("get_target", Method::GET).segment(TARGETS).segment(id))
    }

    /// Replaces a target's name or destination.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] for invalid options or a failed request.
    pub fn replace_target(
        &self,
        options: &ReplaceTargetOptions,
    ) -> Result<DetailedResponse<Target>, SdkError> {
        options.validate()?;
        let request = ApiRequest::new("replace_target", Method::PUT)
            .segment(TARGETS)
            .segment(options.id.as_str())
            .json(options)?;
        self.base.execute(&request)
    }

    /// Asks the service to verify it can write to a target.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] for an empty id or a failed request.
    pub fn validate_target(&self, id: &str) -> Result<DetailedResponse<Target>, SdkError> {
        require_value("id", id)?;
        let request = ApiRequest::new("validate_target", Method::POST)
            .segment(TARGETS)
            .segment(id)
            .segment("validate");
        self.base.execute(&request)
    }

    /// Deletes a target and returns any warnings the service raised.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] for an empty id or a failed request.
    pub fn delete_target(&self, id: &str) -> Result<DetailedResponse<WarningReport>, SdkError> {
        require_value("id", id)?;
        self.base
            .execute(&ApiRequest::new("delete_target", Method::DELETE).segment(TARGETS).segment(id))
    }

    // ------------------------------------------------------------------------
    // Routes
    // ------------------------------------------------------------------------

    /// Creates a route. Expects `201 Created`.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] for invalid options or a failed request.
    pub fn create_route(
        &self,
        options: &CreateRouteOptions,
    ) -> Result<DetailedResponse<Route>, SdkError> {
        options.validate()?;
        let request = ApiRequest::new("create_route", Method::POST).segment(ROUTES).json(options)?;
        self.base.execute(&request)
    }

    /// Lists routes in the account.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] when the request fails.
    pub fn list_routes(&self) -> Result<DetailedResponse<RouteCollection>, SdkError> {
        self.base.execute(&ApiRequest::new("list_routes", Method::GET).segment(ROUTES))
    }

    /// Fetches one route.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] for an empty id or a failed request.
    pub fn get_route(&self, id: &str) -> Result<DetailedResponse<Route>, SdkError> {
        require_value("id", id)?;
        self.base.execute(&ApiRequest::new("get_route", Method::GET).segment(ROUTES).segment(id))
    }

    /// Replaces a route's name or rules.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] for invalid options or a failed request.
    pub fn replace_route(
        &self,
        options: &ReplaceRouteOptions,
    ) -> Result<DetailedResponse<Route>, SdkError> {
        options.validate()?;
        let request = ApiRequest::new("replace_route", Method::PUT)
            .segment(ROUTES)
            .segment(options.id.as_str())
            .json(options)?;
        self.base.execute(&request)
    }

    /// Deletes a route. Expects `204 No Content`; any body is discarded.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] for an empty id or a failed request.
    pub fn delete_route(&self, id: &str) -> Result<DetailedResponse<()>, SdkError> {
        require_value("id", id)?;
        let request = ApiRequest::new("delete_route", Method::DELETE).segment(ROUTES).segment(id);
        let response = self.base.execute::<IgnoredAny>(&request)?;
        Ok(DetailedResponse {
            status_code: response.status_code,
            headers: response.headers,
            result: None,
        })
    }

    // ------------------------------------------------------------------------
    // Settings
    // ------------------------------------------------------------------------

    /// Fetches account settings.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] when the request fails.
    pub fn get_settings(&self) -> Result<DetailedResponse<Settings>, SdkError> {
        self.base.execute(&ApiRequest::new("get_settings", Method::GET).segment(SETTINGS))
    }

    /// Replaces account settings.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] for invalid options or a failed request.
    pub fn replace_settings(
        &self,
        options: &ReplaceSettingsOptions,
    ) -> Result<DetailedResponse<Settings>, SdkError> {
        options.validate()?;
        let request =
            ApiRequest::new("replace_settings", Method::PUT).segment(SETTINGS).json(options)?;
        self.base.execute(&request)
    }
}
