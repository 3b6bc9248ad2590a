// crates/metrics-router/src/lib.rs
// ============================================================================
// Module: Metrics Router Client Library
// Description: Typed client for the metrics router v3 REST API.
// Purpose: Manage targets, routes, and account routing settings.
// Dependencies: platform-sdk-core, serde, time
// ============================================================================

//! ## Overview
//! The metrics router forwards platform metrics to destinations (*targets*)
//! according to *routes*, ordered rules that match metrics by inclusion
//! filters. Account-wide *settings* pick default targets and permitted
//! regions.
//!
//! [`MetricsRouterV3`] exposes the thirteen API operations. Clients are built
//! from an explicit authenticator, from loaded [`ServiceProperties`], or from
//! the external configuration for the service name (`metrics_router` by
//! default).
//!
//! [`ServiceProperties`]: platform_sdk_core::ServiceProperties

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod models;
pub mod options;
pub mod service;


// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use models::FilterOperand;
pub use models::FilterOperator;
pub use models::InclusionFilter;
pub use models::Route;
pub use models::RouteCollection;
pub use models::Rule;
pub use models::RulePrototype;
pub use models::Settings;
pub use models::Target;
pub use models::TargetCollection;
pub use models::TargetReference;
pub use models::Warning;
pub use models::WarningReport;
pub use models::WriteStatus;
pub use options::CreateRouteOptions;
pub use options::CreateTargetOptions;
pub use options::ReplaceRouteOptions;
pub use options::ReplaceSettingsOptions;
pub use options::ReplaceTargetOptions;
pub use service::DEFAULT_SERVICE_NAME;
pub use service::DEFAULT_SERVICE_URL;
pub use service::MetricsRouterV3;
pub use service::MetricsRouterV3Options;
pub use service::service_url_for_region;
