//! HTTP client for the ZIGG admin API.
//!
//! Provides a minimal client that sends the session token verbatim as
//! `Authorization`, generic GET/POST/PATCH/DELETE helpers, and domain methods
//! grouped per screen (auth, contents, auditions, boards, notices).
//!
//! Every non-2xx answer becomes `ConsoleError::Api` with the response body as
//! the message. A 401 also ends the session.

pub mod auditions;
pub mod auth;
pub mod boards;
pub mod contents;
pub mod notices;
pub mod session;

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;
use zigg_core::{ConsoleConfig, ConsoleError};

pub use session::Session;

/// HTTP client for the admin API.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Session,
}

impl ApiClient {
    /// `timeout` applies to every request, including presigned uploads. When
    /// `None` the transport default (no timeout) is kept.
    pub fn new(
        base_url: impl Into<String>,
        session: Session,
        timeout: Option<Duration>,
    ) -> Result<Self, ConsoleError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ConsoleError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        })
    }

    /// Client for `config`, with the session persisted to its token file.
    pub fn from_config(config: &ConsoleConfig) -> Result<Self, ConsoleError> {
        let session = Session::persisted(&config.session_file)?;
        Self::new(config.api_base_url.clone(), session, config.http_timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn apply_auth(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.token() {
            Some(token) => request.header(reqwest::header::AUTHORIZATION, token),
            None => request,
        }
    }

    /// Send an authorized request and turn non-2xx answers into errors.
    async fn send(&self, request: RequestBuilder) -> Result<Response, ConsoleError> {
        let response = self
            .apply_auth(request)
            .send()
            .await
            .map_err(transport_error)?;
        self.check(response).await
    }

    /// Like [`send`](Self::send) but without the session token.
    async fn send_anonymous(&self, request: RequestBuilder) -> Result<Response, ConsoleError> {
        let response = request.send().await.map_err(transport_error)?;
        self.check(response).await
    }

    async fn check(&self, response: Response) -> Result<Response, ConsoleError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_text = response.text().await.unwrap_or_default();
        if status == StatusCode::UNAUTHORIZED && self.session.is_active() {
            warn!("Backend rejected the session token, ending session");
            if let Err(e) = self.session.end() {
                warn!(error = %e, "Failed to clear session");
            }
        }
        Err(ConsoleError::api(status.as_u16(), error_text))
    }

    /// GET request with optional query parameters. Deserializes JSON response.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ConsoleError> {
        let mut request = self.client.get(self.build_url(path));
        if !query.is_empty() {
            request = request.query(query);
        }
        read_json(self.send(request).await?).await
    }

    /// POST JSON body and deserialize response.
    pub async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: &B,
    ) -> Result<T, ConsoleError> {
        let mut request = self.client.post(self.build_url(path)).json(body);
        if !query.is_empty() {
            request = request.query(query);
        }
        read_json(self.send(request).await?).await
    }

    /// PATCH JSON body and deserialize response.
    pub async fn patch_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ConsoleError> {
        let request = self.client.patch(self.build_url(path)).json(body);
        read_json(self.send(request).await?).await
    }

    /// POST without a body. Returns Ok(()) on success.
    pub async fn post_empty(&self, path: &str) -> Result<(), ConsoleError> {
        self.send(self.client.post(self.build_url(path))).await?;
        Ok(())
    }

    /// DELETE request. Returns Ok(()) on success.
    pub async fn delete(&self, path: &str) -> Result<(), ConsoleError> {
        self.send(self.client.delete(self.build_url(path))).await?;
        Ok(())
    }

    /// Raw client for requests that must not carry the session token.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

fn transport_error(err: reqwest::Error) -> ConsoleError {
    if err.is_timeout() {
        ConsoleError::Transport(format!("Request timed out: {}", err))
    } else {
        ConsoleError::Transport(format!("Failed to send request: {}", err))
    }
}

/// Deserialize a JSON body. An empty body reads as JSON `null`, so mutation
/// endpoints that answer with nothing still decode into `serde_json::Value`.
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ConsoleError> {
    let text = response
        .text()
        .await
        .map_err(|e| ConsoleError::Transport(format!("Failed to read response: {}", e)))?;
    let text = if text.trim().is_empty() { "null" } else { text.as_str() };
    serde_json::from_str(text)
        .map_err(|e| ConsoleError::Decode(format!("Failed to parse response as JSON: {}", e)))
}
