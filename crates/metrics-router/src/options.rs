// crates/metrics-router/src/options.rs
// ============================================================================
// Module: Metrics Router Operation Options
// Description: Request parameters for mutating operations.
// Purpose: Validate required fields before any network call is made.
// Dependencies: platform-sdk-core, serde
// ============================================================================

//! ## Overview
//! Each mutating operation takes an options struct that doubles as its JSON
//! request body. Path identifiers are carried alongside but never serialized.
//! [`validate`](CreateTargetOptions::validate) runs before the request is
//! built, so malformed input fails with [`SdkError::Validation`] and the
//! service is never contacted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use platform_sdk_core::SdkError;
use serde::Serialize;

use crate::models::FilterOperand;
use crate::models::FilterOperator;
use crate::models::RulePrototype;

// ============================================================================
// SECTION: Validation Helpers
// ============================================================================

/// Rejects empty or whitespace-only required values.
pub(crate) fn require_value(field: &str, value: &str) -> Result<(), SdkError> {
    if value.trim().is_empty() {
        return Err(SdkError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

/// Rejects optional values that are present but empty.
fn reject_empty(field: &str, value: Option<&str>) -> Result<(), SdkError> {
    value.map_or(Ok(()), |value| require_value(field, value))
}

/// Validates route rules: at least one, each with targets and filter values.
fn validate_rules(rules: &[RulePrototype]) -> Result<(), SdkError> {
    if rules.is_empty() {
        return Err(SdkError::Validation("rules must not be empty".to_string()));
    }
    for rule in rules {
        if rule.target_ids.is_empty() {
            return Err(SdkError::Validation("rule target_ids must not be empty".to_string()));
        }
        for target_id in &rule.target_ids {
            require_value("rule target id", target_id)?;
        }
        if rule.inclusion_filters.iter().any(|filter| filter.value.is_empty()) {
            return Err(SdkError::Validation(
                "inclusion filter value must not be empty".to_string(),
            ));
        }
        if rule.inclusion_filters.iter().any(|filter| {
            filter.operand == FilterOperand::Unknown || filter.operator == FilterOperator::Unknown
        }) {
            return Err(SdkError::Validation(
                "inclusion filter operand and operator must be known".to_string(),
            ));
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Targets
// ============================================================================

/// Parameters for creating a target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateTargetOptions {
    /// Target name.
    pub name: String,
    /// Cloud resource name of the destination instance.
    pub destination_crn: String,
    /// Region that manages the target; defaults to the endpoint region.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl CreateTargetOptions {
    /// Builds options with the required fields.
    #[must_use]
    pub fn new(name: impl Into<String>, destination_crn: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            destination_crn: destination_crn.into(),
            region: None,
        }
    }

    /// Sets the managing region.
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Checks required fields.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Validation`] when a field is empty.
    pub fn validate(&self) -> Result<(), SdkError> {
        require_value("name", &self.name)?;
        require_value("destination_crn", &self.destination_crn)?;
        reject_empty("region", self.region.as_deref())
    }
}

/// Parameters for replacing a target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplaceTargetOptions {
    /// Identifier of the target to replace.
    #[serde(skip)]
    pub id: String,
    /// New target name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New destination cloud resource name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_crn: Option<String>,
}

impl ReplaceTargetOptions {
    /// Builds options for target `id` with no field changes.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            destination_crn: None,
        }
    }

    /// Sets the new name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the new destination.
    #[must_use]
    pub fn with_destination_crn(mut self, destination_crn: impl Into<String>) -> Self {
        self.destination_crn = Some(destination_crn.into());
        self
    }

    /// Checks required fields.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Validation`] when the id or a provided field is empty.
    pub fn validate(&self) -> Result<(), SdkError> {
        require_value("id", &self.id)?;
        reject_empty("name", self.name.as_deref())?;
        reject_empty("destination_crn", self.destination_crn.as_deref())
    }
}

// ============================================================================
// SECTION: Routes
// ============================================================================

/// Parameters for creating a route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateRouteOptions {
    /// Route name.
    pub name: String,
    /// Routing rules in evaluation order.
    pub rules: Vec<RulePrototype>,
}

impl CreateRouteOptions {
    /// Builds options with the required fields.
    #[must_use]
    pub fn new(name: impl Into<String>, rules: Vec<RulePrototype>) -> Self {
        Self {
            name: name.into(),
            rules,
        }
    }

    /// Checks required fields.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Validation`] for an empty name or malformed rules.
    pub fn validate(&self) -> Result<(), SdkError> {
        require_value("name", &self.name)?;
        validate_rules(&self.rules)
    }
}

/// Parameters for replacing a route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplaceRouteOptions {
    /// Identifier of the route to replace.
    #[serde(skip)]
    pub id: String,
    /// New route name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New routing rules.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<RulePrototype>>,
}

impl ReplaceRouteOptions {
    /// Builds options for route `id` with no field changes.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            rules: None,
        }
    }

    /// Sets the new name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the new rules.
    #[must_use]
    pub fn with_rules(mut self, rules: Vec<RulePrototype>) -> Self {
        self.rules = Some(rules);
        self
    }

    /// Checks required fields.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Validation`] when the id, name, or rules are malformed.
    pub fn validate(&self) -> Result<(), SdkError> {
        require_value("id", &self.id)?;
        reject_empty("name", self.name.as_deref())?;
        self.rules.as_deref().map_or(Ok(()), validate_rules)
    }
}

// ============================================================================
// SECTION: Settings
// ============================================================================

/// Parameters for replacing account settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplaceSettingsOptions {
    /// Region that stores routing metadata.
    pub metadata_region_primary: String,
    /// Restricts API access to private endpoints.
    pub private_api_endpoint_only: bool,
    /// Identifiers of targets that receive unrouted metrics.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub default_targets: Vec<String>,
    /// Regions where targets may live.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub permitted_target_regions: Vec<String>,
    /// Backup region for routing metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata_region_backup: Option<String>,
}

impl ReplaceSettingsOptions {
    /// Builds options with the required fields.
    #[must_use]
    pub fn new(metadata_region_primary: impl Into<String>, private_api_endpoint_only: bool) -> Self {
        Self {
            metadata_region_primary: metadata_region_primary.into(),
            private_api_endpoint_only,
            default_targets: Vec::new(),
            permitted_target_regions: Vec::new(),
            metadata_region_backup: None,
        }
    }

    /// Sets the default target identifiers.
    #[must_use]
    pub fn with_default_targets(mut self, target_ids: Vec<String>) -> Self {
        self.default_targets = target_ids;
        self
    }

    /// Sets the permitted target regions.
    #[must_use]
    pub fn with_permitted_target_regions(mut self, regions: Vec<String>) -> Self {
        self.permitted_target_regions = regions;
        self
    }

    /// Sets the backup metadata region.
    #[must_use]
    pub fn with_metadata_region_backup(mut self, region: impl Into<String>) -> Self {
        self.metadata_region_backup = Some(region.into());
        self
    }

    /// Checks required fields.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Validation`] when a region or target id is empty.
    pub fn validate(&self) -> Result<(), SdkError> {
        require_value("metadata_region_primary", &self.metadata_region_primary)?;
        reject_empty("metadata_region_backup", self.metadata_region_backup.as_deref())?;
        for target_id in &self.default_targets {
            require_value("default target id", target_id)?;
        }
        for region in &self.permitted_target_regions {
            require_value("permitted target region", region)?;
        }
        Ok(())
    }
}
