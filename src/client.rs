use std::env;
use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, Response, header};
use url::Url;

use crate::error::{Error, Result};
use crate::observability::{
    CLIENT_MALFORMED_REPLIES, CLIENT_REQUEST_DURATION, CLIENT_REQUEST_ERRORS, CLIENT_REQUESTS,
};
use crate::types::{ChatReply, ChatRequest};

/// Base URL used when neither an explicit URL nor `CHATRELAY_URL` is given.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000/";

/// Environment variable consulted for the base URL.
pub const BASE_URL_ENV: &str = "CHATRELAY_URL";

const CHAT_PATH: &str = "chat";

/// Anything that can carry one chat turn to the server and bring back a reply.
///
/// The controller only ever has one call outstanding per session.
#[async_trait::async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send `request` and wait for the server's reply.
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply>;
}

/// HTTP client for the `POST /chat` endpoint.
#[derive(Debug, Clone)]
pub struct ChatClient {
    client: ReqwestClient,
    endpoint: Url,
    timeout: Option<Duration>,
}

impl ChatClient {
    /// Create a new client.
    ///
    /// The base URL can be provided directly or read from the CHATRELAY_URL
    /// environment variable, falling back to [`DEFAULT_BASE_URL`].  No
    /// timeout is applied to requests.
    pub fn new(base_url: Option<String>) -> Result<Self> {
        Self::with_options(base_url, None)
    }

    /// Create a new client with custom settings.
    ///
    /// A blank `base_url` counts as absent; see [`resolve_base_url`].
    pub fn with_options(base_url: Option<String>, timeout: Option<Duration>) -> Result<Self> {
        let base_url = resolve_base_url(base_url);
        let endpoint = chat_endpoint(&base_url)?;

        let mut builder = ReqwestClient::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| {
            Error::http_client(
                format!("Failed to build HTTP client: {}", e),
                Some(Box::new(e)),
            )
        })?;

        Ok(Self {
            client,
            endpoint,
            timeout,
        })
    }

    /// The fully resolved URL requests are posted to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// The request timeout, if one is configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Create and return default headers for chat requests.
    fn default_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    /// Process an error response and convert it to our Error type.
    ///
    /// The chat server answers errors with the same `{"response": ...}` shape
    /// it uses for replies, so that field is preferred over the raw body.
    async fn process_error_response(response: Response) -> Error {
        let status = response.status();
        let status_code = status.as_u16();

        let error_body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return Error::http_client(
                    format!("Failed to read error response: {}", e),
                    Some(Box::new(e)),
                );
            }
        };

        let error_message = match serde_json::from_str::<ChatReply>(&error_body) {
            Ok(reply) => reply.response,
            Err(_) if error_body.trim().is_empty() => status
                .canonical_reason()
                .unwrap_or("no details")
                .to_string(),
            Err(_) => error_body,
        };

        match status_code {
            400 => Error::bad_request(error_message),
            500 => Error::internal_server(error_message),
            502..=504 => Error::service_unavailable(status_code, error_message),
            _ => Error::api(status_code, error_message),
        }
    }

    async fn post(&self, request: &ChatRequest) -> Result<ChatReply> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .headers(self.default_headers())
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::timeout(e.to_string(), self.timeout.map(|t| t.as_secs_f64()))
                } else if e.is_connect() {
                    Error::connection(e.to_string(), Some(Box::new(e)))
                } else {
                    Error::http_client(e.to_string(), Some(Box::new(e)))
                }
            })?;

        tracing::debug!(status = %response.status(), "chat endpoint answered");
        if !response.status().is_success() {
            return Err(Self::process_error_response(response).await);
        }

        let body = response.text().await.map_err(|e| {
            Error::http_client(
                format!("Failed to read response body: {}", e),
                Some(Box::new(e)),
            )
        })?;
        serde_json::from_str::<ChatReply>(&body).map_err(|e| {
            CLIENT_MALFORMED_REPLIES.click();
            Error::serialization(
                format!("Failed to parse response: {}", e),
                Some(Box::new(e)),
            )
        })
    }
}

#[async_trait::async_trait]
impl ChatTransport for ChatClient {
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply> {
        CLIENT_REQUESTS.click();
        tracing::debug!(endpoint = %self.endpoint, "posting chat message");
        let start = Instant::now();
        let result = self.post(request).await;
        CLIENT_REQUEST_DURATION.add(start.elapsed().as_secs_f64());
        if result.is_err() {
            CLIENT_REQUEST_ERRORS.click();
        }
        result
    }
}

/// Pick the base URL to talk to.
///
/// An explicit URL wins, then `CHATRELAY_URL`, then [`DEFAULT_BASE_URL`].
/// Blank values at either level are skipped.
pub fn resolve_base_url(explicit: Option<String>) -> String {
    pick_base_url(explicit, env::var(BASE_URL_ENV).ok())
}

fn pick_base_url(explicit: Option<String>, from_env: Option<String>) -> String {
    explicit
        .into_iter()
        .chain(from_env)
        .find(|url| !url.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}

/// Resolve the chat endpoint beneath `base_url`.
///
/// The base is treated as a directory, so `http://host/api` and
/// `http://host/api/` both resolve to `http://host/api/chat`.
pub fn chat_endpoint(base_url: &str) -> Result<Url> {
    let mut base = Url::parse(base_url)?;
    if base.cannot_be_a_base() {
        return Err(Error::url(
            format!("{base_url} cannot be used as a base URL"),
            None,
        ));
    }
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base.join(CHAT_PATH)?)
}
