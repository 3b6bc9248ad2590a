// crates/platform-sdk-core/src/lib.rs
// ============================================================================
// Module: Platform SDK Core Library
// Description: Shared runtime for generated platform service clients.
// Purpose: Provide transport, authentication, retries, and external config.
// Dependencies: reqwest, serde, thiserror, tracing, url
// ============================================================================

//! ## Overview
//! `platform-sdk-core` holds everything a generated service client needs that
//! is not specific to one service: loading service properties from
//! credentials files and the environment, building authenticators, issuing
//! JSON requests with optional retries, and decoding detailed responses.
//!
//! Clients are blocking and `Send + Sync`; callers drive them sequentially.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod auth;
pub mod error;
pub mod logging;
pub mod properties;
pub mod response;
pub mod retry;
pub mod service;


// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use auth::Authenticator;
pub use auth::BasicAuthenticator;
pub use auth::BearerTokenAuthenticator;
pub use auth::IamAuthenticator;
pub use auth::NoAuthAuthenticator;
pub use auth::authenticator_from_properties;
pub use error::SdkError;
pub use logging::LogLevel;
pub use logging::LogOutput;
pub use logging::install_logger;
pub use properties::PropertiesError;
pub use properties::ServiceProperties;
pub use response::DetailedResponse;
pub use retry::RetryPolicy;
pub use service::ApiRequest;
pub use service::BaseService;
pub use service::ServiceOptions;
