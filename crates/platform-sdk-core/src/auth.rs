// crates/platform-sdk-core/src/auth.rs
// ============================================================================
// Module: Authenticators
// Description: Credential providers for outbound service requests.
// Purpose: Produce Authorization headers for no-auth, bearer, basic, and IAM.
// Dependencies: base64, reqwest, serde, url
// ============================================================================

//! ## Overview
//! An [`Authenticator`] turns configured credentials into an `Authorization`
//! header value. The IAM authenticator exchanges an API key for an access
//! token, caches it, and refreshes it once most of its lifetime has passed.
//! Secrets never appear in debug output or log events.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;
use std::time::Instant;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;

use crate::error::SdkError;
use crate::properties::ServiceProperties;
use crate::properties::keys;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default IAM token service base URL.
pub const DEFAULT_IAM_URL: &str = "https://iam.cloud.ibm.com";
/// Path of the IAM token operation.
const IAM_TOKEN_PATH: &str = "/identity/token";
/// Grant type for API key exchanges.
const IAM_GRANT_TYPE: &str = "urn:ibm:params:oauth:grant-type:apikey";
/// Fraction of the token lifetime after which it is refreshed.
const IAM_REFRESH_FRACTION: f64 = 0.8;
/// Timeout for token requests.
const IAM_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Produces credentials for outbound requests.
pub trait Authenticator: Send + Sync {
    /// Returns the canonical authenticator type name.
    fn authentication_type(&self) -> &'static str;

    /// Returns the `Authorization` header value, if any.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Authentication`] when credentials cannot be obtained.
    fn authorization_header(&self) -> Result<Option<String>, SdkError>;
}

// ============================================================================
// SECTION: Static Authenticators
// ============================================================================

/// Sends requests without credentials.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAuthAuthenticator;

impl Authenticator for NoAuthAuthenticator {
    fn authentication_type(&self) -> &'static str {
        "noauth"
    }

    fn authorization_header(&self) -> Result<Option<String>, SdkError> {
        Ok(None)
    }
}

/// Sends a fixed bearer token.
#[derive(Clone)]
pub struct BearerTokenAuthenticator {
    /// Token sent verbatim after `Bearer `.
    token: String,
}

impl BearerTokenAuthenticator {
    /// Builds a bearer token authenticator.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Config`] when the token is empty.
    pub fn new(token: impl Into<String>) -> Result<Self, SdkError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(SdkError::Config("bearer token must not be empty".to_string()));
        }
        Ok(Self {
            token,
        })
    }
}

impl fmt::Debug for BearerTokenAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerTokenAuthenticator").finish_non_exhaustive()
    }
}

impl Authenticator for BearerTokenAuthenticator {
    fn authentication_type(&self) -> &'static str {
        "bearerToken"
    }

    fn authorization_header(&self) -> Result<Option<String>, SdkError> {
        Ok(Some(format!("Bearer {}", self.token)))
    }
}

/// Sends HTTP basic credentials.
#[derive(Clone)]
pub struct BasicAuthenticator {
    /// Precomputed header value.
    header: String,
}

impl BasicAuthenticator {
    /// Builds a basic authenticator.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Config`] when the user name or password is empty,
    /// or when either contains braces or quotes.
    pub fn new(username: &str, password: &str) -> Result<Self, SdkError> {
        for (label, value) in [("username", username), ("password", password)] {
            if value.is_empty() {
                return Err(SdkError::Config(format!("basic auth {label} must not be empty")));
            }
            if value.contains(['{', '}', '"']) {
                return Err(SdkError::Config(format!(
                    "basic auth {label} must not contain braces or quotes"
                )));
            }
        }
        let encoded = STANDARD.encode(format!("{username}:{password}"));
        Ok(Self {
            header: format!("Basic {encoded}"),
        })
    }
}

impl fmt::Debug for BasicAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuthenticator").finish_non_exhaustive()
    }
}

impl Authenticator for BasicAuthenticator {
    fn authentication_type(&self) -> &'static str {
        "basic"
    }

    fn authorization_header(&self) -> Result<Option<String>, SdkError> {
        Ok(Some(self.header.clone()))
    }
}

// ============================================================================
// SECTION: IAM Authenticator
// ============================================================================

/// Access token cached by [`IamAuthenticator`].
struct CachedToken {
    /// Bearer access token.
    access_token: String,
    /// Instant after which the token is refreshed.
    refresh_at: Instant,
}

/// Token service response body.
#[derive(Deserialize)]
struct IamTokenResponse {
    /// Bearer access token.
    access_token: String,
    /// Lifetime in seconds.
    expires_in: u64,
}

/// Exchanges an API key for IAM access tokens.
///
/// # Invariants
/// - The token service URL has no trailing slash.
/// - At most one cached token exists at a time.
pub struct IamAuthenticator {
    /// API key exchanged for tokens.
    apikey: String,
    /// Token service base URL.
    url: String,
    /// HTTP client for token requests.
    client: Client,
    /// Cached token, refreshed on demand.
    cache: Mutex<Option<CachedToken>>,
}

impl IamAuthenticator {
    /// Builds an IAM authenticator against `url` (or [`DEFAULT_IAM_URL`]).
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Config`] when the API key is empty or the HTTP
    /// client cannot be built.
    pub fn new(
        apikey: impl Into<String>,
        url: Option<&str>,
        disable_ssl_verification: bool,
    ) -> Result<Self, SdkError> {
        let apikey = apikey.into();
        if apikey.trim().is_empty() {
            return Err(SdkError::Config("iam apikey must not be empty".to_string()));
        }
        let url = url.unwrap_or(DEFAULT_IAM_URL).trim_end_matches('/').to_string();
        let client = Client::builder()
            .timeout(IAM_REQUEST_TIMEOUT)
            .danger_accept_invalid_certs(disable_ssl_verification)
            .build()
            .map_err(|err| SdkError::Config(format!("failed to build iam client: {err}")))?;
        Ok(Self {
            apikey,
            url,
            client,
            cache: Mutex::new(None),
        })
    }

    /// Returns the token service base URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Requests a fresh token from the token service.
    fn request_token(&self) -> Result<CachedToken, SdkError> {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("grant_type", IAM_GRANT_TYPE)
            .append_pair("apikey", &self.apikey)
            .append_pair("response_type", "cloud_iam")
            .finish();
        let endpoint = format!("{}{IAM_TOKEN_PATH}", self.url);
        tracing::debug!(endpoint = %endpoint, "requesting iam access token");
        let response = self
            .client
            .post(&endpoint)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header(ACCEPT, "application/json")
            .body(body)
            .send()
            .map_err(|err| SdkError::Authentication(format!("iam token request failed: {err}")))?;
        let status = response.status();
        if !status.is_success() {
            return Err(SdkError::Authentication(format!(
                "iam token request returned status {}",
                status.as_u16()
            )));
        }
        let parsed: IamTokenResponse = response
            .json()
            .map_err(|err| SdkError::Authentication(format!("invalid iam token response: {err}")))?;
        let lifetime = Duration::from_secs(parsed.expires_in).mul_f64(IAM_REFRESH_FRACTION);
        Ok(CachedToken {
            access_token: parsed.access_token,
            refresh_at: Instant::now().checked_add(lifetime).unwrap_or_else(Instant::now),
        })
    }
}

impl fmt::Debug for IamAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IamAuthenticator").field("url", &self.url).finish_non_exhaustive()
    }
}

impl Authenticator for IamAuthenticator {
    fn authentication_type(&self) -> &'static str {
        "iam"
    }

    fn authorization_header(&self) -> Result<Option<String>, SdkError> {
        let mut cache = self
            .cache
            .lock()
            .map_err(|_| SdkError::Authentication("iam token cache poisoned".to_string()))?;
        let fresh = cache.as_ref().is_some_and(|token| Instant::now() < token.refresh_at);
        if !fresh {
            *cache = Some(self.request_token()?);
        }
        Ok(cache.as_ref().map(|token| format!("Bearer {}", token.access_token)))
    }
}

// ============================================================================
// SECTION: Factory
// ============================================================================

/// Builds the authenticator selected by `AUTH_TYPE` (default `iam`).
///
/// # Errors
///
/// Returns [`SdkError::Config`] for unknown types or missing credentials.
pub fn authenticator_from_properties(
    properties: &ServiceProperties,
) -> Result<Arc<dyn Authenticator>, SdkError> {
    let auth_type = properties.get(keys::AUTH_TYPE).unwrap_or("iam").to_ascii_lowercase();
    let missing = |key: &str| {
        SdkError::Config(format!(
            "{} auth requires the {key} property for service {}",
            auth_type,
            properties.service_name()
        ))
    };
    let authenticator: Arc<dyn Authenticator> = match auth_type.as_str() {
        "noauth" => Arc::new(NoAuthAuthenticator),
        "bearertoken" => {
            let token = properties.get(keys::BEARER_TOKEN).ok_or_else(|| missing(keys::BEARER_TOKEN))?;
            Arc::new(BearerTokenAuthenticator::new(token)?)
        }
        "basic" => {
            let username = properties.get(keys::USERNAME).ok_or_else(|| missing(keys::USERNAME))?;
            let password = properties.get(keys::PASSWORD).ok_or_else(|| missing(keys::PASSWORD))?;
            Arc::new(BasicAuthenticator::new(username, password)?)
        }
        "iam" => {
            let apikey = properties.get(keys::APIKEY).ok_or_else(|| missing(keys::APIKEY))?;
            let disable_ssl = properties.get_bool(keys::DISABLE_SSL)?.unwrap_or(false);
            Arc::new(IamAuthenticator::new(apikey, properties.get(keys::AUTH_URL), disable_ssl)?)
        }
        other => {
            return Err(SdkError::Config(format!("unsupported authentication type: {other}")));
        }
    };
    Ok(authenticator)
}
