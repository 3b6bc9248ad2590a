// crates/metrics-router/src/models.rs
// ============================================================================
// Module: Metrics Router Models
// Description: Wire types for targets, routes, settings, and warnings.
// Purpose: Decode service responses and encode rule prototypes.
// Dependencies: serde, time
// ============================================================================

//! ## Overview
//! JSON models exchanged with the metrics router v3 API. Field names match the
//! service (`snake_case`). Timestamps are RFC 3339 and decode into
//! [`OffsetDateTime`]; optional response fields tolerate absence so newer
//! service versions keep decoding.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use time::OffsetDateTime;

// ============================================================================
// SECTION: Targets
// ============================================================================

/// Destination that receives routed metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    /// Target identifier.
    pub id: String,
    /// Human-readable target name.
    pub name: String,
    /// Cloud resource name of the target itself.
    pub crn: String,
    /// Cloud resource name of the destination instance.
    pub destination_crn: String,
    /// Destination kind, e.g. `sysdig_monitor`.
    pub target_type: String,
    /// Region where the target is managed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Health of the most recent delivery attempt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub write_status: Option<WriteStatus>,
    /// Creation timestamp.
    #[serde(default, with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<OffsetDateTime>,
    /// Last modification timestamp.
    #[serde(default, with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<OffsetDateTime>,
}

/// Delivery health reported for a target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteStatus {
    /// Status keyword, e.g. `success` or `failed`.
    pub status: String,
    /// When the last failure occurred.
    #[serde(default, with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
    pub last_failure: Option<OffsetDateTime>,
    /// Why the last delivery failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason_for_last_failure: Option<String>,
}

/// Page of targets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetCollection {
    /// Targets in the account.
    #[serde(default)]
    pub targets: Vec<Target>,
}

/// Reference to a target embedded in routes and settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetReference {
    /// Target identifier.
    pub id: String,
    /// Target cloud resource name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crn: Option<String>,
    /// Target name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Destination kind.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_type: Option<String>,
}

// ============================================================================
// SECTION: Routes
// ============================================================================

/// Metric attribute an inclusion filter matches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperand {
    /// Region or data center of the source.
    Location,
    /// Service that emitted the metric.
    ServiceName,
    /// Service instance that emitted the metric.
    ServiceInstance,
    /// Resource type of the source.
    ResourceType,
    /// Resource identifier of the source.
    Resource,
    /// Operand this client does not know; never sent in requests.
    #[serde(other)]
    Unknown,
}

/// Comparison applied by an inclusion filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    /// Exactly one value must match.
    Is,
    /// Any of the listed values may match.
    In,
    /// Operator this client does not know; never sent in requests.
    #[serde(other)]
    Unknown,
}

/// Condition selecting which metrics a rule routes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InclusionFilter {
    /// Attribute to compare.
    pub operand: FilterOperand,
    /// Comparison operator.
    pub operator: FilterOperator,
    /// Accepted values.
    pub value: Vec<String>,
}

impl InclusionFilter {
    /// Builds a filter from its parts.
    #[must_use]
    pub fn new(operand: FilterOperand, operator: FilterOperator, value: Vec<String>) -> Self {
        Self {
            operand,
            operator,
            value,
        }
    }
}

/// Rule as sent when creating or replacing a route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulePrototype {
    /// Identifiers of the targets that receive matching metrics.
    pub target_ids: Vec<String>,
    /// Filters selecting the metrics.
    pub inclusion_filters: Vec<InclusionFilter>,
}

/// Rule as returned by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Targets that receive matching metrics.
    #[serde(default)]
    pub targets: Vec<TargetReference>,
    /// Filters selecting the metrics.
    #[serde(default)]
    pub inclusion_filters: Vec<InclusionFilter>,
}

/// Named set of routing rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// Route identifier.
    pub id: String,
    /// Route name.
    pub name: String,
    /// Route cloud resource name.
    pub crn: String,
    /// Rules in evaluation order.
    #[serde(default)]
    pub rules: Vec<Rule>,
    /// Creation timestamp.
    #[serde(default, with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<OffsetDateTime>,
    /// Last modification timestamp.
    #[serde(default, with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<OffsetDateTime>,
}

/// Page of routes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteCollection {
    /// Routes in the account.
    #[serde(default)]
    pub routes: Vec<Route>,
}

// ============================================================================
// SECTION: Settings
// ============================================================================

/// Account-wide routing settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Targets that receive metrics no route claims.
    #[serde(default)]
    pub default_targets: Vec<TargetReference>,
    /// Regions where targets may live.
    #[serde(default)]
    pub permitted_target_regions: Vec<String>,
    /// Region that stores routing metadata.
    pub metadata_region_primary: String,
    /// Backup region for routing metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_region_backup: Option<String>,
    /// Restricts API access to private endpoints.
    #[serde(default)]
    pub private_api_endpoint_only: bool,
}

// ============================================================================
// SECTION: Warnings
// ============================================================================

/// Non-fatal notices returned by destructive operations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarningReport {
    /// Summary code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Summary message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// HTTP status echoed by the service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    /// Individual warnings.
    #[serde(default)]
    pub warnings: Vec<Warning>,
}

/// Single warning entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    /// Warning code.
    pub code: String,
    /// Warning message.
    pub message: String,
}
