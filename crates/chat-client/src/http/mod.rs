//! HTTP client wrapper
//!
//! All REST calls share one `reqwest::Client` with a cookie store, so the
//! session cookie set by signup/login rides along on every later request.

use std::time::Duration;

use chat_common::ClientConfig;
use reqwest::{Method, Response, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Error body returned by the server
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// Credentialed JSON client rooted at `<origin>/api`
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpClient {
    /// # Errors
    /// Returns `InvalidUrl` if `base_url` is not absolute, or a transport
    /// error if the client cannot be built
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        let base_url: String = base_url.into();
        Url::parse(&base_url).map_err(|e| ClientError::InvalidUrl(format!("{base_url}: {e}")))?;

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// # Errors
    /// See [`HttpClient::new`]
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        Self::new(config.api_base_url())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// # Errors
    /// Transport, server, or decode errors
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send(Method::GET, path, None::<&()>).await
    }

    /// # Errors
    /// Transport, server, or decode errors
    pub async fn post<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(Method::POST, path, Some(body)).await
    }

    /// POST without a body
    ///
    /// # Errors
    /// Transport, server, or decode errors
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send(Method::POST, path, None::<&()>).await
    }

    /// # Errors
    /// Transport, server, or decode errors
    pub async fn put<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(Method::PUT, path, Some(body)).await
    }

    async fn send<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        tracing::debug!(method = %method, url = %url, "HTTP request");

        let mut request = self.client.request(method, &url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        Self::handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
        let status = response.status();
        let bytes = response.bytes().await?;

        if status.is_success() {
            return Ok(serde_json::from_slice(&bytes)?);
        }

        let message = serde_json::from_slice::<ErrorBody>(&bytes)
            .map(|body| body.message)
            .unwrap_or_default();
        tracing::debug!(status = status.as_u16(), message = %message, "HTTP error response");

        Err(ClientError::Server {
            status: status.as_u16(),
            message,
        })
    }
}
