// crates/platform-sdk-core/src/properties.rs
// ============================================================================
// Module: Service Properties
// Description: External configuration for a named service.
// Purpose: Read credentials files and environment variables into typed lookups.
// Dependencies: dirs, thiserror
// ============================================================================

//! ## Overview
//! Service properties are `KEY=VALUE` pairs whose keys carry the upper-cased
//! service name as a prefix (`metrics_router` becomes `METRICS_ROUTER_`). They
//! come from a credentials file or, failing that, the process environment.
//! The prefix is stripped on load, so callers look up `URL` rather than
//! `METRICS_ROUTER_URL`.
//!
//! Credentials files are located in order through [`CREDENTIALS_FILE_ENV`],
//! the home directory, and the working directory. The first file that exists
//! wins. Oversized or non-UTF-8 files fail closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable naming an explicit credentials file.
pub const CREDENTIALS_FILE_ENV: &str = "IBM_CREDENTIALS_FILE";
/// File name searched for in the home and working directories.
pub const DEFAULT_CREDENTIALS_FILE_NAME: &str = "ibm-credentials.env";
/// Maximum credentials file size in bytes.
pub(crate) const MAX_CREDENTIALS_FILE_SIZE: usize = 1024 * 1024;

/// Property names recognized by the SDK core (without the service prefix).
pub mod keys {
    /// Service endpoint URL.
    pub const URL: &str = "URL";
    /// Authenticator type (`iam`, `bearertoken`, `basic`, `noauth`).
    pub const AUTH_TYPE: &str = "AUTH_TYPE";
    /// API key exchanged for IAM access tokens.
    pub const APIKEY: &str = "APIKEY";
    /// IAM token service base URL.
    pub const AUTH_URL: &str = "AUTH_URL";
    /// Static bearer token.
    pub const BEARER_TOKEN: &str = "BEARER_TOKEN";
    /// Basic auth user name.
    pub const USERNAME: &str = "USERNAME";
    /// Basic auth password.
    pub const PASSWORD: &str = "PASSWORD";
    /// Disables TLS certificate verification when `true`.
    pub const DISABLE_SSL: &str = "DISABLE_SSL";
    /// Enables automatic retries when `true`.
    pub const ENABLE_RETRIES: &str = "ENABLE_RETRIES";
    /// Maximum retry attempts.
    pub const MAX_RETRIES: &str = "MAX_RETRIES";
    /// Maximum retry interval in seconds.
    pub const RETRY_INTERVAL: &str = "RETRY_INTERVAL";
}

/// Keys whose values are redacted from debug output.
const SECRET_KEYS: [&str; 3] = [keys::APIKEY, keys::BEARER_TOKEN, keys::PASSWORD];

// ============================================================================
// SECTION: Types
// ============================================================================

/// Properties configured for one service.
///
/// # Invariants
/// - Keys are stored without the service prefix.
/// - Values are trimmed; empty values are never returned by [`Self::get`].
#[derive(Clone, PartialEq, Eq, Default)]
pub struct ServiceProperties {
    /// Service name the properties were loaded for.
    service_name: String,
    /// Property values keyed by unprefixed name.
    values: BTreeMap<String, String>,
}

impl ServiceProperties {
    /// Loads properties for `service_name` from the first available source.
    ///
    /// The credentials file is consulted first; the process environment is
    /// used when no file exists or the file has nothing for this service.
    ///
    /// # Errors
    ///
    /// Returns [`PropertiesError`] when a located file cannot be read or a
    /// prefixed environment value is not valid UTF-8.
    pub fn load(service_name: &str) -> Result<Self, PropertiesError> {
        if let Some(path) = locate_credentials_file()? {
            let from_file = Self::from_credentials_file(&path, service_name)?;
            if !from_file.is_empty() {
                tracing::debug!(
                    service = service_name,
                    path = %path.display(),
                    "loaded service properties from credentials file"
                );
                return Ok(from_file);
            }
        }
        let from_env = Self::from_env(service_name)?;
        if !from_env.is_empty() {
            tracing::debug!(service = service_name, "loaded service properties from environment");
        }
        Ok(from_env)
    }

    /// Reads properties for `service_name` from an explicit credentials file.
    ///
    /// # Errors
    ///
    /// Returns [`PropertiesError`] when the file is missing, oversized, or
    /// not valid UTF-8.
    pub fn from_credentials_file(path: &Path, service_name: &str) -> Result<Self, PropertiesError> {
        let bytes = fs::read(path).map_err(|err| PropertiesError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        if bytes.len() > MAX_CREDENTIALS_FILE_SIZE {
            return Err(PropertiesError::Invalid(format!(
                "credentials file {} exceeds size limit",
                path.display()
            )));
        }
        let content = std::str::from_utf8(&bytes).map_err(|_| {
            PropertiesError::Invalid(format!("credentials file {} must be utf-8", path.display()))
        })?;
        Ok(Self::parse_credentials(content, service_name))
    }

    /// Parses credentials file content for `service_name`.
    ///
    /// Blank lines, `#` comments, lines without `=`, and keys for other
    /// services are ignored. Matching surrounding quotes are stripped.
    #[must_use]
    pub fn parse_credentials(content: &str, service_name: &str) -> Self {
        let pairs = content.lines().filter_map(|line| {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                return None;
            }
            let (key, value) = line.split_once('=')?;
            Some((key.trim().to_string(), unquote(value.trim()).to_string()))
        });
        Self::from_pairs(service_name, pairs)
    }

    /// Reads properties for `service_name` from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`PropertiesError::Invalid`] when a prefixed value is not
    /// valid UTF-8.
    pub fn from_env(service_name: &str) -> Result<Self, PropertiesError> {
        let prefix = service_prefix(service_name);
        let mut pairs = Vec::new();
        for (name, value) in std::env::vars_os() {
            let Ok(name) = name.into_string() else {
                continue;
            };
            if !name.starts_with(&prefix) {
                continue;
            }
            let value = value
                .into_string()
                .map_err(|_| PropertiesError::Invalid(format!("{name} must be valid UTF-8")))?;
            pairs.push((name, value.trim().to_string()));
        }
        Ok(Self::from_pairs(service_name, pairs))
    }

    /// Builds properties from prefixed `(key, value)` pairs.
    ///
    /// Later pairs override earlier ones with the same key.
    pub fn from_pairs<I, K, V>(service_name: &str, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let prefix = service_prefix(service_name);
        let values = pairs
            .into_iter()
            .filter_map(|(key, value)| {
                key.as_ref()
                    .strip_prefix(&prefix)
                    .filter(|stripped| !stripped.is_empty())
                    .map(|stripped| (stripped.to_string(), value.into()))
            })
            .collect();
        Self {
            service_name: service_name.to_string(),
            values,
        }
    }

    /// Returns the service name these properties belong to.
    #[must_use]
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Returns true when no property was found for the service.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.values().all(|value| value.is_empty())
    }

    /// Returns a non-empty property value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str).filter(|value| !value.is_empty())
    }

    /// Returns the configured service URL.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.get(keys::URL)
    }

    /// Parses a boolean property (`true`/`false`, case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`PropertiesError::Invalid`] for unrecognized literals.
    pub fn get_bool(&self, key: &str) -> Result<Option<bool>, PropertiesError> {
        let Some(raw) = self.get(key) else {
            return Ok(None);
        };
        if raw.eq_ignore_ascii_case("true") {
            return Ok(Some(true));
        }
        if raw.eq_ignore_ascii_case("false") {
            return Ok(Some(false));
        }
        Err(PropertiesError::Invalid(format!("{key} must be true or false")))
    }

    /// Parses an unsigned integer property.
    ///
    /// # Errors
    ///
    /// Returns [`PropertiesError::Invalid`] when the value is not a number.
    pub fn get_u64(&self, key: &str) -> Result<Option<u64>, PropertiesError> {
        self.get(key)
            .map(|raw| {
                raw.parse::<u64>().map_err(|_| {
                    PropertiesError::Invalid(format!("{key} must be a non-negative integer"))
                })
            })
            .transpose()
    }

    /// Iterates over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

impl fmt::Debug for ServiceProperties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (key, value) in &self.values {
            if SECRET_KEYS.contains(&key.as_str()) {
                map.entry(key, &"<redacted>");
            } else {
                map.entry(key, value);
            }
        }
        map.finish()
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Service property loading failures.
#[derive(Debug, Error)]
pub enum PropertiesError {
    /// A credentials file could not be read.
    #[error("failed to read credentials file {path}: {message}")]
    Io {
        /// Path that failed to load.
        path: String,
        /// Underlying I/O error message.
        message: String,
    },
    /// A property source or value is malformed.
    #[error("invalid service properties: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the key prefix for a service name.
pub(crate) fn service_prefix(service_name: &str) -> String {
    let mut prefix = service_name.to_ascii_uppercase().replace('-', "_");
    prefix.push('_');
    prefix
}

/// Finds the first existing credentials file.
fn locate_credentials_file() -> Result<Option<PathBuf>, PropertiesError> {
    let mut candidates = Vec::new();
    if let Some(raw) = std::env::var_os(CREDENTIALS_FILE_ENV) {
        let path = raw.into_string().map_err(|_| {
            PropertiesError::Invalid(format!("{CREDENTIALS_FILE_ENV} must be valid UTF-8"))
        })?;
        if !path.trim().is_empty() {
            candidates.push(PathBuf::from(path));
        }
    }
    if let Some(home) = dirs::home_dir() {
        candidates.push(home.join(DEFAULT_CREDENTIALS_FILE_NAME));
    }
    candidates.push(PathBuf::from(DEFAULT_CREDENTIALS_FILE_NAME));
    Ok(candidates.into_iter().find(|path| path.is_file()))
}

/// Strips one pair of matching surrounding quotes.
fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) =
            value.strip_prefix(quote).and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}
