//! Asynchronous Harbory client and the shared request pipeline.

use crate::accessors::{Auth, Containers, Health, Images, Networks, Nodes, System, Volumes};
use crate::Result;
use harbory_core::response::normalize;
use harbory_core::{
    ApiConfig, ApiResponse, CredentialStore, EnvelopePolicy, Error, MemoryCredentialStore,
};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, ClientBuilder, Method, StatusCode};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

const USER_AGENT: &str = concat!("harbory-client/", env!("CARGO_PKG_VERSION"));

/// Hook notified when the backend rejects the session credential.
///
/// The client has already cleared the credential when this runs; the host
/// decides how to get the user back to `login_route`.
#[cfg_attr(test, mockall::automock)]
pub trait UnauthorizedHandler: Send + Sync {
    /// Called once per 401 response.
    fn on_unauthorized(&self, login_route: &str);
}

/// Per-call options for [`HarboryClient::request`].
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    method: Method,
    headers: HeaderMap,
    envelope: Option<EnvelopePolicy>,
}

impl RequestOptions {
    /// Options for a plain `GET`.
    #[must_use]
    pub fn get() -> Self {
        Self::default()
    }

    /// Options for a `POST`.
    #[must_use]
    pub fn post() -> Self {
        Self::default().with_method(Method::POST)
    }

    /// Options for a `DELETE`.
    #[must_use]
    pub fn delete() -> Self {
        Self::default().with_method(Method::DELETE)
    }

    /// Set the HTTP method.
    #[must_use]
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Add a header; caller headers override the pipeline's own.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Override the client's envelope policy for this call.
    #[must_use]
    pub const fn with_envelope_policy(mut self, policy: EnvelopePolicy) -> Self {
        self.envelope = Some(policy);
        self
    }

    /// The HTTP method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }
}

/// Builder for [`HarboryClient`].
#[derive(Clone)]
pub struct HarboryClientBuilder {
    config: ApiConfig,
    credentials: Option<Arc<dyn CredentialStore>>,
    unauthorized: Option<Arc<dyn UnauthorizedHandler>>,
}

impl HarboryClientBuilder {
    /// Create a builder from a resolved configuration.
    #[must_use]
    pub fn new(config: ApiConfig) -> Self {
        Self {
            config,
            credentials: None,
            unauthorized: None,
        }
    }

    /// Use `store` for the session credential. Defaults to an empty in-memory store.
    #[must_use]
    pub fn with_credential_store(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.credentials = Some(store);
        self
    }

    /// Notify `handler` whenever the backend answers 401.
    #[must_use]
    pub fn with_unauthorized_handler(mut self, handler: Arc<dyn UnauthorizedHandler>) -> Self {
        self.unauthorized = Some(handler);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be constructed.
    pub fn build(self) -> Result<HarboryClient> {
        let config = self.config.validated()?;

        let mut builder = ClientBuilder::new()
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .pool_idle_timeout(config.pool_idle_timeout())
            .pool_max_idle_per_host(config.pool_max_idle_per_host());

        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = config.connect_timeout() {
            builder = builder.connect_timeout(timeout);
        }
        if !config.compression_enabled() {
            builder = builder.no_gzip();
        }

        let http = builder
            .build()
            .map_err(|err| Error::ConfigError(format!("Failed to build HTTP client: {err}")))?;

        Ok(HarboryClient {
            http,
            config: Arc::new(config),
            credentials: self
                .credentials
                .unwrap_or_else(|| Arc::new(MemoryCredentialStore::new())),
            unauthorized: self.unauthorized,
        })
    }
}

/// Asynchronous client for a Harbory backend.
///
/// Every call returns an [`ApiResponse`]; failures never surface as `Err`.
#[derive(Clone)]
pub struct HarboryClient {
    http: Client,
    config: Arc<ApiConfig>,
    credentials: Arc<dyn CredentialStore>,
    unauthorized: Option<Arc<dyn UnauthorizedHandler>>,
}

impl HarboryClient {
    /// Construct a client directly from a base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        HarboryClientBuilder::new(ApiConfig::new(base_url)?).build()
    }

    /// Start building a client from a resolved configuration.
    #[must_use]
    pub fn builder(config: ApiConfig) -> HarboryClientBuilder {
        HarboryClientBuilder::new(config)
    }

    /// The configuration this client was built with.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Return the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.config.base_url()
    }

    /// The session credential store.
    #[must_use]
    pub fn credentials(&self) -> &Arc<dyn CredentialStore> {
        &self.credentials
    }

    /// Container accessor.
    #[must_use]
    pub const fn containers(&self) -> Containers<'_> {
        Containers::new(self)
    }

    /// Image accessor.
    #[must_use]
    pub const fn images(&self) -> Images<'_> {
        Images::new(self)
    }

    /// Volume accessor.
    #[must_use]
    pub const fn volumes(&self) -> Volumes<'_> {
        Volumes::new(self)
    }

    /// Network accessor.
    #[must_use]
    pub const fn networks(&self) -> Networks<'_> {
        Networks::new(self)
    }

    /// Swarm node accessor.
    #[must_use]
    pub const fn nodes(&self) -> Nodes<'_> {
        Nodes::new(self)
    }

    /// Health accessor.
    #[must_use]
    pub const fn health(&self) -> Health<'_> {
        Health::new(self)
    }

    /// System statistics accessor.
    #[must_use]
    pub const fn system(&self) -> System<'_> {
        System::new(self)
    }

    /// Authentication accessor.
    #[must_use]
    pub const fn auth(&self) -> Auth<'_> {
        Auth::new(self)
    }

    /// Issue a request without a body.
    pub async fn request<T>(&self, path: &str, options: RequestOptions) -> ApiResponse<T>
    where
        T: DeserializeOwned,
    {
        self.send::<(), T>(path, options, None).await
    }

    /// Issue a request, JSON-encoding `body` when present.
    pub async fn send<B, T>(
        &self,
        path: &str,
        options: RequestOptions,
        body: Option<&B>,
    ) -> ApiResponse<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let policy = options
            .envelope
            .unwrap_or_else(|| self.config.envelope_policy());

        let outcome = match self.execute(path, options, body).await {
            Ok(payload) => normalize(payload, policy),
            Err(err) => Err(err),
        };

        outcome.unwrap_or_else(|err| {
            if err.should_log() {
                error!(path, code = err.error_code(), error = %err, "Harbory API request failed");
            }
            ApiResponse::failure(&err)
        })
    }

    async fn execute<B>(
        &self,
        path: &str,
        options: RequestOptions,
        body: Option<&B>,
    ) -> Result<Value>
    where
        B: Serialize + ?Sized,
    {
        let url = self.config.endpoint(path);
        let headers = self.build_headers(options.headers);

        debug!(method = %options.method, path, "Harbory API request");

        let mut request = self.http.request(options.method, url).headers(headers);
        if let Some(payload) = body {
            request = request.json(payload);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            self.handle_unauthorized(path);
            return Err(Error::Unauthorized);
        }
        if !status.is_success() {
            return Err(Error::HttpStatus {
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        decode_body(path, &bytes)
    }

    fn build_headers(&self, overrides: HeaderMap) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(value) = self.bearer_header() {
            headers.insert(AUTHORIZATION, value);
        }

        for name in overrides.keys() {
            headers.remove(name);
        }
        for (name, value) in &overrides {
            headers.append(name.clone(), value.clone());
        }
        headers
    }

    fn bearer_header(&self) -> Option<HeaderValue> {
        let token = match self.credentials.get() {
            Ok(token) => token?,
            Err(err) => {
                warn!(error = %err, "Failed to read session credential");
                return None;
            }
        };

        match HeaderValue::from_str(&format!("Bearer {}", token.expose_secret())) {
            Ok(mut value) => {
                value.set_sensitive(true);
                Some(value)
            }
            Err(_) => {
                warn!("Session credential is not a valid header value; sending request without it");
                None
            }
        }
    }

    fn handle_unauthorized(&self, path: &str) {
        if let Err(err) = self.credentials.clear() {
            warn!(error = %err, "Failed to clear session credential");
        }

        let login_route = self.config.login_route();
        info!(path, login_route, "Session rejected by backend");

        if let Some(handler) = &self.unauthorized {
            handler.on_unauthorized(login_route);
        }
    }
}

fn decode_body(path: &str, bytes: &[u8]) -> Result<Value> {
    if bytes.is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_slice(bytes).map_err(|err| {
        Error::Decode(format!("Failed to parse response for `{path}`: {err}"))
    })
}
