//! Client for the managed auth/database service.
//!
//! Two HTTP surfaces live behind one client: the auth endpoints under
//! `/auth/v1` and the table REST endpoints under `/rest/v1`. The signed-in
//! session is kept in the shared [`Config`] and written back to disk whenever
//! it changes.

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::config::{Config, ENV_SUPABASE_ANON_KEY, ENV_SUPABASE_URL};

mod auth;
mod error;
mod query;

pub use auth::{AuthUser, Session, SignUpOutcome};
pub use error::{BackendError, NO_ROWS_CODE};
pub use query::{Order, TableQuery};

/// Refresh the access token when it expires within this many seconds
const REFRESH_MARGIN_SECS: i64 = 60;

/// A request that can be replayed after a token refresh
#[derive(Debug, Clone)]
pub(crate) struct PreparedRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    headers: Vec<(&'static str, String)>,
    body: Option<Value>,
}

impl PreparedRequest {
    pub(crate) fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub(crate) fn query(mut self, params: Vec<(String, String)>) -> Self {
        self.query = params;
        self
    }

    pub(crate) fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    pub(crate) fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Client for the auth/database service
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
    anon_key: String,
    config: Arc<Mutex<Config>>,
}

impl BackendClient {
    /// Create a new client; fails when the service URL or public key is missing
    pub fn new(config: Config) -> Result<Self, BackendError> {
        if !config.has_backend() {
            return Err(BackendError::Config(format!(
                "service URL and public key are not configured (set {} and {}, or edit the config file)",
                ENV_SUPABASE_URL, ENV_SUPABASE_ANON_KEY
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.backend.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url: config.backend.url.trim_end_matches('/').to_string(),
            anon_key: config.backend.anon_key.clone(),
            config: Arc::new(Mutex::new(config)),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Config> {
        self.config.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the current configuration, session included
    pub fn config(&self) -> Config {
        self.lock().clone()
    }

    /// Whether a session is stored
    pub fn has_session(&self) -> bool {
        self.lock().is_authenticated()
    }

    /// Stored access token, if signed in
    pub fn access_token(&self) -> Option<String> {
        let config = self.lock();
        config
            .is_authenticated()
            .then(|| config.auth.access_token.clone())
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Request carrying only the public key
    pub(crate) fn anon_request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, self.url(path))
            .header("apikey", &self.anon_key)
    }

    fn build(&self, request: &PreparedRequest, token: Option<&str>) -> RequestBuilder {
        let bearer = token.unwrap_or(&self.anon_key);

        let mut builder = self
            .anon_request(request.method.clone(), &request.path)
            .bearer_auth(bearer);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(*name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        builder
    }

    /// Current access token, refreshed first when it is about to expire
    async fn valid_token(&self) -> Result<Option<String>, BackendError> {
        let (token, expiring) = {
            let config = self.lock();
            if !config.is_authenticated() {
                return Ok(None);
            }
            (
                config.auth.access_token.clone(),
                config.session_expiring(REFRESH_MARGIN_SECS),
            )
        };

        if !expiring {
            return Ok(Some(token));
        }

        tracing::debug!("Access token about to expire, refreshing");
        let session = self.refresh_session().await?;
        Ok(Some(session.access_token))
    }

    /// Send a request with the user's token (or the public key when signed
    /// out). A 401 with a stored session triggers one refresh and one replay.
    pub(crate) async fn send(&self, request: PreparedRequest) -> Result<Response, BackendError> {
        let token = self.valid_token().await?;

        tracing::debug!("{} {}", request.method, request.path);

        let response = self.build(&request, token.as_deref()).send().await?;

        if response.status() == StatusCode::UNAUTHORIZED && token.is_some() {
            tracing::debug!("Received 401, attempting token refresh");

            let session = self.refresh_session().await?;
            let response = self
                .build(&request, Some(&session.access_token))
                .send()
                .await?;

            return Ok(response);
        }

        Ok(response)
    }

    /// Decode a JSON response, or turn a failure status into an error
    pub(crate) async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            Ok(serde_json::from_str(&body)?)
        } else {
            Err(BackendError::from_status(status, &body))
        }
    }

    /// Like [`decode`](Self::decode) for endpoints without a useful body
    pub(crate) async fn expect_success(response: Response) -> Result<(), BackendError> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(BackendError::from_status(status, &body))
    }

    fn persist(config: &Config) -> Result<(), BackendError> {
        config
            .save_session()
            .map_err(|e| BackendError::Session(format!("{:#}", e)))
    }
}
