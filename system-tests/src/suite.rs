// system-tests/src/suite.rs
// ============================================================================
// Module: Metrics Router Suite
// Description: Ordered integration scenarios for the metrics router v3 API.
// Purpose: Exercise every client operation against a configured service.
// Dependencies: metrics-router, platform-sdk-core, tracing
// ============================================================================

//! ## Overview
//! [`metrics_router_pipeline`] composes fifteen scenarios: configuration load
//! (the gate), client initialization (fatal), then the thirteen operations in
//! an order that creates resources first and deletes them last. Each
//! operation asserts its expected status code and the presence of a payload.
//!
//! Configuration comes from an explicit credentials file path. When the file
//! is missing or has no service URL, the whole suite is skipped and the
//! service is never contacted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use metrics_router::CreateRouteOptions;
use metrics_router::CreateTargetOptions;
use metrics_router::DEFAULT_SERVICE_NAME;
use metrics_router::FilterOperand;
use metrics_router::FilterOperator;
use metrics_router::InclusionFilter;
use metrics_router::MetricsRouterV3;
use metrics_router::MetricsRouterV3Options;
use metrics_router::ReplaceRouteOptions;
use metrics_router::ReplaceSettingsOptions;
use metrics_router::ReplaceTargetOptions;
use metrics_router::RulePrototype;
use platform_sdk_core::LogLevel;
use platform_sdk_core::LogOutput;
use platform_sdk_core::ServiceProperties;
use platform_sdk_core::install_logger;
use platform_sdk_core::properties::keys;

use crate::harness::CompositionError;
use crate::harness::LinkName;
use crate::harness::Pipeline;
use crate::harness::PipelineBuilder;
use crate::harness::RunContext;
use crate::harness::Scenario;
use crate::harness::ScenarioError;
use crate::harness::expect_field;
use crate::harness::expect_payload;
use crate::harness::expect_status;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Identifier of the target created by the suite.
pub const TARGET_ID: LinkName = LinkName::new("target_id");
/// Identifier of the route created by the suite.
pub const ROUTE_ID: LinkName = LinkName::new("route_id");
/// Retry attempts enabled on the suite client.
pub const SUITE_MAX_RETRIES: u32 = 4;
/// Backoff ceiling enabled on the suite client.
pub const SUITE_MAX_RETRY_INTERVAL: Duration = Duration::from_secs(30);

/// Request payload values used by the scenarios.
pub mod fixtures {
    /// Name of the created target.
    pub const TARGET_NAME: &str = "my-mr-target";
    /// Destination instance of the created target.
    pub const DESTINATION_CRN: &str = "crn:v1:bluemix:public:sysdig-monitor:us-south:a/0be5ad401ae913d8ff665d92680664ed:22222222-2222-2222-2222-222222222222::";
    /// Region of the created target and of settings metadata.
    pub const REGION: &str = "us-south";
    /// Name of the created route.
    pub const ROUTE_NAME: &str = "my-route";
    /// Value matched by the route's inclusion filter.
    pub const FILTER_VALUE: &str = "testString";
}

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Result of reading the suite configuration.
#[derive(Debug, Clone)]
pub enum ConfigurationLoad {
    /// Properties with a service URL.
    Loaded(ServiceProperties),
    /// Configuration is missing or incomplete; the suite is skipped.
    Absent(String),
}

/// Reads the service configuration from `path`.
///
/// Never fails hard: a missing or malformed file, or one without a service
/// URL, yields [`ConfigurationLoad::Absent`] with the reason.
#[must_use]
pub fn load_configuration(path: &Path) -> ConfigurationLoad {
    let load = match ServiceProperties::from_credentials_file(path, DEFAULT_SERVICE_NAME) {
        Ok(properties) if properties.url().is_some() => ConfigurationLoad::Loaded(properties),
        Ok(_) => ConfigurationLoad::Absent(format!(
            "{} defines no {} property for {DEFAULT_SERVICE_NAME}",
            path.display(),
            keys::URL
        )),
        Err(err) => ConfigurationLoad::Absent(err.to_string()),
    };
    if let ConfigurationLoad::Absent(reason) = &load {
        tracing::warn!(
            path = %path.display(),
            reason = reason.as_str(),
            "metrics router configuration unavailable; skipping the suite"
        );
    }
    load
}

/// Builds the suite client from loaded properties.
///
/// The client must expose exactly the configured URL. Debug logging and
/// retries (four attempts, 30 second ceiling) are enabled.
///
/// # Errors
///
/// Returns [`ScenarioError::Setup`] when the client cannot be built or its
/// URL differs from the configuration.
pub fn initialize_client(
    properties: &ServiceProperties,
    timeout: Option<Duration>,
) -> Result<MetricsRouterV3, ScenarioError> {
    let mut options = MetricsRouterV3Options::new();
    if let Some(timeout) = timeout {
        options = options.with_timeout(timeout);
    }
    let mut client = MetricsRouterV3::from_properties(options, properties)
        .map_err(|err| ScenarioError::Setup(err.to_string()))?;
    let configured = properties.url().unwrap_or_default().trim_end_matches('/');
    if client.service_url() != configured {
        return Err(ScenarioError::Setup(format!(
            "client url {} does not match configured url {configured}",
            client.service_url()
        )));
    }
    install_logger(LogLevel::Debug, LogOutput::TestWriter);
    client.enable_retries(SUITE_MAX_RETRIES, SUITE_MAX_RETRY_INTERVAL);
    Ok(client)
}

// ============================================================================
// SECTION: Suite State
// ============================================================================

/// Suite-specific state carried in the [`RunContext`].
pub struct SuiteState {
    /// Credentials file to load.
    config_path: PathBuf,
    /// Per-request timeout override.
    request_timeout: Option<Duration>,
    /// Properties loaded by the gate scenario.
    properties: Option<ServiceProperties>,
    /// Client built by the initialization scenario.
    client: Option<MetricsRouterV3>,
}

impl SuiteState {
    /// Creates state that loads configuration from `config_path`.
    #[must_use]
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            request_timeout: None,
            properties: None,
            client: None,
        }
    }

    /// Overrides the per-request timeout.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Returns the configuration file path.
    #[must_use]
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Returns the initialized client.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Setup`] before initialization.
    pub fn client(&self) -> Result<&MetricsRouterV3, ScenarioError> {
        self.client
            .as_ref()
            .ok_or_else(|| ScenarioError::Setup("client is not initialized".to_string()))
    }
}

// ============================================================================
// SECTION: Request Builders
// ============================================================================

/// Rules routing `location is testString` metrics to `target_id`.
fn route_rules(target_id: &str) -> Vec<RulePrototype> {
    vec![RulePrototype {
        target_ids: vec![target_id.to_string()],
        inclusion_filters: vec![InclusionFilter::new(
            FilterOperand::Location,
            FilterOperator::Is,
            vec![fixtures::FILTER_VALUE.to_string()],
        )],
    }]
}

// ============================================================================
// SECTION: Pipeline
// ============================================================================

/// Shorthand for the suite's run context.
type Context = RunContext<SuiteState>;

/// Composes the metrics router suite.
///
/// # Errors
///
/// Returns [`CompositionError`] if the scenario declarations are inconsistent.
pub fn metrics_router_pipeline() -> Result<Pipeline<SuiteState>, CompositionError> {
    PipelineBuilder::new()
        .scenario(Scenario::gate("load_configuration", load_configuration_scenario))
        .scenario(Scenario::fatal("initialize_client", initialize_client_scenario))
        .scenario(Scenario::standard("create_target", create_target).produces(TARGET_ID))
        .scenario(
            Scenario::standard("create_route", create_route).requires(TARGET_ID).produces(ROUTE_ID),
        )
        .scenario(Scenario::standard("list_targets", list_targets))
        .scenario(Scenario::standard("get_target", get_target).requires(TARGET_ID))
        .scenario(Scenario::standard("replace_target", replace_target).requires(TARGET_ID))
        .scenario(Scenario::standard("validate_target", validate_target).requires(TARGET_ID))
        .scenario(Scenario::standard("list_routes", list_routes))
        .scenario(Scenario::standard("get_route", get_route).requires(ROUTE_ID))
        .scenario(
            Scenario::standard("replace_route", replace_route).requires(ROUTE_ID).requires(TARGET_ID),
        )
        .scenario(Scenario::standard("get_settings", get_settings))
        .scenario(Scenario::standard("replace_settings", replace_settings).requires(TARGET_ID))
        .scenario(Scenario::standard("delete_route", delete_route).requires(ROUTE_ID))
        .scenario(Scenario::standard("delete_target", delete_target).requires(TARGET_ID))
        .build()
}

// ============================================================================
// SECTION: Scenarios
// ============================================================================

/// Gate: loads configuration or skips the suite.
fn load_configuration_scenario(context: &mut Context) -> Result<(), ScenarioError> {
    match load_configuration(context.state().config_path()) {
        ConfigurationLoad::Loaded(properties) => {
            context.state_mut().properties = Some(properties);
            Ok(())
        }
        ConfigurationLoad::Absent(reason) => Err(ScenarioError::Skip(reason)),
    }
}

/// Fatal: builds the client from the loaded configuration.
fn initialize_client_scenario(context: &mut Context) -> Result<(), ScenarioError> {
    let state = context.state_mut();
    let properties = state
        .properties
        .as_ref()
        .ok_or_else(|| ScenarioError::Setup("configuration is not loaded".to_string()))?;
    let client = initialize_client(properties, state.request_timeout)?;
    tracing::info!(url = client.service_url(), "metrics router client initialized");
    state.client = Some(client);
    Ok(())
}

/// Creates the suite target and links its id.
fn create_target(context: &mut Context) -> Result<(), ScenarioError> {
    let options = CreateTargetOptions::new(fixtures::TARGET_NAME, fixtures::DESTINATION_CRN)
        .with_region(fixtures::REGION);
    let client = context.state().client()?;
    let response = expect_status("create_target", client.create_target(&options), 201)?;
    let target = expect_payload("create_target", response)?;
    tracing::info!(target_id = target.id.as_str(), "saved target link");
    context.produce(TARGET_ID, target.id)
}

/// Creates a route to the linked target and links its id.
fn create_route(context: &mut Context) -> Result<(), ScenarioError> {
    let rules = route_rules(context.link(TARGET_ID)?);
    let options = CreateRouteOptions::new(fixtures::ROUTE_NAME, rules);
    let client = context.state().client()?;
    let response = expect_status("create_route", client.create_route(&options), 201)?;
    let route = expect_payload("create_route", response)?;
    tracing::info!(route_id = route.id.as_str(), "saved route link");
    context.produce(ROUTE_ID, route.id)
}

/// Lists targets.
fn list_targets(context: &mut Context) -> Result<(), ScenarioError> {
    let response = expect_status("list_targets", context.state().client()?.list_targets(), 200)?;
    expect_payload("list_targets", response).map(drop)
}

/// Reads the linked target back and checks its id and name.
fn get_target(context: &mut Context) -> Result<(), ScenarioError> {
    let target_id = context.link(TARGET_ID)?;
    let client = context.state().client()?;
    let response = expect_status("get_target", client.get_target(target_id), 200)?;
    let target = expect_payload("get_target", response)?;
    expect_field("get_target", "id", target_id, &target.id)?;
    expect_field("get_target", "name", fixtures::TARGET_NAME, &target.name)
}

/// Replaces the linked target's name and destination.
fn replace_target(context: &mut Context) -> Result<(), ScenarioError> {
    let options = ReplaceTargetOptions::new(context.link(TARGET_ID)?)
        .with_name(fixtures::TARGET_NAME)
        .with_destination_crn(fixtures::DESTINATION_CRN);
    let client = context.state().client()?;
    let response = expect_status("replace_target", client.replace_target(&options), 200)?;
    expect_payload("replace_target", response).map(drop)
}

/// Validates the linked target.
fn validate_target(context: &mut Context) -> Result<(), ScenarioError> {
    let client = context.state().client()?;
    let result = client.validate_target(context.link(TARGET_ID)?);
    let response = expect_status("validate_target", result, 200)?;
    expect_payload("validate_target", response).map(drop)
}

/// Lists routes.
fn list_routes(context: &mut Context) -> Result<(), ScenarioError> {
    let response = expect_status("list_routes", context.state().client()?.list_routes(), 200)?;
    expect_payload("list_routes", response).map(drop)
}

/// Reads the linked route.
fn get_route(context: &mut Context) -> Result<(), ScenarioError> {
    let client = context.state().client()?;
    let response = expect_status("get_route", client.get_route(context.link(ROUTE_ID)?), 200)?;
    expect_payload("get_route", response).map(drop)
}

/// Replaces the linked route's name and rules.
fn replace_route(context: &mut Context) -> Result<(), ScenarioError> {
    let options = ReplaceRouteOptions::new(context.link(ROUTE_ID)?)
        .with_name(fixtures::ROUTE_NAME)
        .with_rules(route_rules(context.link(TARGET_ID)?));
    let client = context.state().client()?;
    let response = expect_status("replace_route", client.replace_route(&options), 200)?;
    expect_payload("replace_route", response).map(drop)
}

/// Reads account settings.
fn get_settings(context: &mut Context) -> Result<(), ScenarioError> {
    let response = expect_status("get_settings", context.state().client()?.get_settings(), 200)?;
    expect_payload("get_settings", response).map(drop)
}

/// Makes the linked target the account default.
fn replace_settings(context: &mut Context) -> Result<(), ScenarioError> {
    let options = ReplaceSettingsOptions::new(fixtures::REGION, false)
        .with_default_targets(vec![context.link(TARGET_ID)?.to_string()])
        .with_permitted_target_regions(vec![fixtures::REGION.to_string()]);
    let client = context.state().client()?;
    let response = expect_status("replace_settings", client.replace_settings(&options), 201)?;
    expect_payload("replace_settings", response).map(drop)
}

/// Deletes the linked route; the service answers 204 with no body.
fn delete_route(context: &mut Context) -> Result<(), ScenarioError> {
    let client = context.state().client()?;
    expect_status("delete_route", client.delete_route(context.link(ROUTE_ID)?), 204).map(drop)
}

/// Deletes the linked target and logs any reported warnings.
fn delete_target(context: &mut Context) -> Result<(), ScenarioError> {
    let client = context.state().client()?;
    let result = client.delete_target(context.link(TARGET_ID)?);
    let report = expect_payload("delete_target", expect_status("delete_target", result, 200)?)?;
    for warning in &report.warnings {
        tracing::warn!(
            code = warning.code.as_str(),
            message = warning.message.as_str(),
            "target deletion reported a warning"
        );
    }
    Ok(())
}
