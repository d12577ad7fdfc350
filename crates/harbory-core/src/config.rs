//! Endpoint resolution and client configuration.
//!
//! The backend base URL is resolved exactly once by the hosting application
//! (see [`EndpointResolver`]) and frozen into an [`ApiConfig`], which is then
//! injected into the client. Nothing here is re-evaluated per request.

use crate::response::EnvelopePolicy;
use crate::Error;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;
use validator::Validate;

/// Environment variable carrying an explicit backend base URL.
pub const API_URL_ENV: &str = "HARBORY_API_URL";

/// Base URL used when neither an override nor a page origin is available.
pub const FALLBACK_BASE_URL: &str = "http://localhost:8080/api";

/// Port the backend listens on when the dashboard is served from a local host.
pub const LOCAL_API_PORT: u16 = 8080;

/// Path prefix every backend route lives under.
pub const API_PATH: &str = "/api";

/// Route the host navigates to when the session is rejected.
pub const DEFAULT_LOGIN_ROUTE: &str = "/login";

/// Default idle timeout for pooled connections (seconds)
pub const DEFAULT_POOL_IDLE_TIMEOUT: u64 = 90;

/// Default maximum idle connections per host
pub const DEFAULT_POOL_MAX_IDLE_PER_HOST: usize = 10;

const LOCAL_HOSTNAMES: [&str; 2] = ["localhost", "127.0.0.1"];

/// Protocol and hostname of the page hosting the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageOrigin {
    protocol: String,
    hostname: String,
}

impl PageOrigin {
    /// Create an origin from a protocol and hostname.
    ///
    /// The protocol may be given with or without the trailing `:` that
    /// `location.protocol` reports.
    #[must_use]
    pub fn new(protocol: impl AsRef<str>, hostname: impl Into<String>) -> Self {
        Self {
            protocol: protocol.as_ref().trim_end_matches(':').to_string(),
            hostname: hostname.into(),
        }
    }

    /// Parse an origin such as `https://dash.example.com:3000`.
    ///
    /// # Errors
    ///
    /// Returns an error if the origin is not a URL or has no host.
    pub fn parse(origin: &str) -> Result<Self, Error> {
        let url = Url::parse(origin)?;
        let hostname = url
            .host_str()
            .ok_or_else(|| Error::InvalidEndpoint(format!("Origin `{origin}` has no host")))?;
        Ok(Self::new(url.scheme(), hostname))
    }

    /// Scheme without the trailing colon.
    #[must_use]
    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    /// Hostname without port.
    #[must_use]
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// Returns true for `localhost` and `127.0.0.1`.
    #[must_use]
    pub fn is_local(&self) -> bool {
        LOCAL_HOSTNAMES.contains(&self.hostname.as_str())
    }

    /// Backend base URL for a dashboard served from this origin.
    #[must_use]
    pub fn api_base_url(&self) -> String {
        if self.is_local() {
            format!(
                "{}://{}:{LOCAL_API_PORT}{API_PATH}",
                self.protocol, self.hostname
            )
        } else {
            format!("{}://{}{API_PATH}", self.protocol, self.hostname)
        }
    }
}

/// Computes the backend base URL from the inputs available at startup.
///
/// Resolution never fails; it only degrades to [`FALLBACK_BASE_URL`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointResolver {
    env_override: Option<String>,
    page_origin: Option<PageOrigin>,
}

impl EndpointResolver {
    /// Create a resolver with no inputs.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            env_override: None,
            page_origin: None,
        }
    }

    /// Create a resolver seeded from the [`API_URL_ENV`] environment variable.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new().with_env_override(std::env::var(API_URL_ENV).ok())
    }

    /// Set the environment-provided override.
    #[must_use]
    pub fn with_env_override(mut self, value: Option<String>) -> Self {
        self.env_override = value;
        self
    }

    /// Set the origin of the page hosting the dashboard.
    #[must_use]
    pub fn with_page_origin(mut self, origin: PageOrigin) -> Self {
        self.page_origin = Some(origin);
        self
    }

    /// Resolve the base URL; first match wins.
    #[must_use]
    pub fn resolve(&self) -> String {
        if let Some(url) = self
            .env_override
            .as_deref()
            .filter(|value| !value.trim().is_empty())
        {
            return url.to_string();
        }

        match &self.page_origin {
            Some(origin) => origin.api_base_url(),
            None => FALLBACK_BASE_URL.to_string(),
        }
    }
}

/// Configuration for a Harbory client instance.
///
/// Built once by the host application and shared read-only by every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ApiConfig {
    /// Backend base URL, including the `/api` prefix
    #[validate(url)]
    base_url: String,

    /// Route the host navigates to after a 401
    #[validate(length(min = 1))]
    #[serde(default = "default_login_route")]
    login_route: String,

    /// How backend payloads are recognised as envelopes
    #[serde(default)]
    envelope_policy: EnvelopePolicy,

    /// Optional whole-request timeout in seconds; unset means none
    #[validate(range(min = 1, max = 3600))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    request_timeout_secs: Option<u64>,

    /// Optional connect timeout in seconds
    #[validate(range(min = 1, max = 300))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    connect_timeout_secs: Option<u64>,

    /// Connection pool idle timeout in seconds
    #[serde(default = "default_pool_idle_timeout_secs")]
    pool_idle_timeout_secs: u64,

    /// Maximum idle connections per host
    #[serde(default = "default_pool_max_idle_per_host")]
    pool_max_idle_per_host: usize,

    /// Enable gzip response compression
    #[serde(default = "default_enable_compression")]
    enable_compression: bool,
}

fn default_login_route() -> String {
    DEFAULT_LOGIN_ROUTE.to_string()
}

const fn default_pool_idle_timeout_secs() -> u64 {
    DEFAULT_POOL_IDLE_TIMEOUT
}

const fn default_pool_max_idle_per_host() -> usize {
    DEFAULT_POOL_MAX_IDLE_PER_HOST
}

const fn default_enable_compression() -> bool {
    true
}

impl ApiConfig {
    /// Create a configuration for the given base URL.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The backend base URL (e.g., "https://dash.example.com/api")
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn new(base_url: impl Into<String>) -> Result<Self, Error> {
        let config = Self {
            base_url: base_url.into(),
            login_route: default_login_route(),
            envelope_policy: EnvelopePolicy::default(),
            request_timeout_secs: None,
            connect_timeout_secs: None,
            pool_idle_timeout_secs: default_pool_idle_timeout_secs(),
            pool_max_idle_per_host: default_pool_max_idle_per_host(),
            enable_compression: default_enable_compression(),
        };

        config.validated()
    }

    /// Create a configuration from a resolver's result.
    ///
    /// # Errors
    ///
    /// Returns an error if the resolved URL (e.g. a malformed override) is invalid.
    pub fn from_resolver(resolver: &EndpointResolver) -> Result<Self, Error> {
        Self::new(resolver.resolve())
    }

    /// Create a configuration from the process environment alone.
    ///
    /// # Errors
    ///
    /// Returns an error if [`API_URL_ENV`] holds an invalid URL.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_resolver(&EndpointResolver::from_env())
    }

    /// Run validation, returning the configuration on success.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] describing the first invalid field.
    pub fn validated(self) -> Result<Self, Error> {
        self.validate()
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: {e}")))?;
        Ok(self)
    }

    /// Set the login route.
    #[must_use]
    pub fn with_login_route(mut self, route: impl Into<String>) -> Self {
        self.login_route = route.into();
        self
    }

    /// Set the envelope policy.
    #[must_use]
    pub const fn with_envelope_policy(mut self, policy: EnvelopePolicy) -> Self {
        self.envelope_policy = policy;
        self
    }

    /// Set a whole-request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_secs = Some(seconds);
        self
    }

    /// Set a connect timeout in seconds.
    #[must_use]
    pub const fn with_connect_timeout(mut self, seconds: u64) -> Self {
        self.connect_timeout_secs = Some(seconds);
        self
    }

    /// Set connection pool idle timeout in seconds.
    #[must_use]
    pub const fn with_pool_idle_timeout(mut self, seconds: u64) -> Self {
        self.pool_idle_timeout_secs = seconds;
        self
    }

    /// Set maximum idle connections per host.
    #[must_use]
    pub const fn with_pool_max_idle(mut self, max: usize) -> Self {
        self.pool_max_idle_per_host = max;
        self
    }

    /// Enable or disable compression.
    #[must_use]
    pub const fn with_compression(mut self, enabled: bool) -> Self {
        self.enable_compression = enabled;
        self
    }

    /// The resolved base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full request URL for `path`: the base URL followed by the path.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// The login route.
    #[must_use]
    pub fn login_route(&self) -> &str {
        &self.login_route
    }

    /// The envelope policy.
    #[must_use]
    pub const fn envelope_policy(&self) -> EnvelopePolicy {
        self.envelope_policy
    }

    /// Whole-request timeout, if any.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Connect timeout, if any.
    #[must_use]
    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_secs.map(Duration::from_secs)
    }

    /// Connection pool idle timeout.
    #[must_use]
    pub const fn pool_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.pool_idle_timeout_secs)
    }

    /// Maximum idle connections per host.
    #[must_use]
    pub const fn pool_max_idle_per_host(&self) -> usize {
        self.pool_max_idle_per_host
    }

    /// Whether gzip compression is enabled.
    #[must_use]
    pub const fn compression_enabled(&self) -> bool {
        self.enable_compression
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: FALLBACK_BASE_URL.to_string(),
            login_route: default_login_route(),
            envelope_policy: EnvelopePolicy::default(),
            request_timeout_secs: None,
            connect_timeout_secs: None,
            pool_idle_timeout_secs: default_pool_idle_timeout_secs(),
            pool_max_idle_per_host: default_pool_max_idle_per_host(),
            enable_compression: default_enable_compression(),
        }
    }
}
