//! Test server and client helpers

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chat_client::{ChannelNotifier, ChatApp, Notification};
use chat_common::{AppConfig, ClientConfig, Environment};
use chat_server::{create_app, create_app_state};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;

pub const TEST_SECRET: &str = "integration-test-secret";

/// In-process server on an ephemeral port, stopped on drop
pub struct TestServer {
    pub addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        Self::start_with_config(AppConfig::for_testing(TEST_SECRET)).await
    }

    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let state = create_app_state(config).await?;
        let app = create_app(state);

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Ok(Self { addr, handle })
    }

    pub fn origin(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/api{path}", self.origin())
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(Environment::Development, self.origin())
    }

    /// A client app against this server plus its notification stream
    pub fn client_app(&self) -> Result<(ChatApp, UnboundedReceiver<Notification>)> {
        let (notifier, rx) = ChannelNotifier::new();
        let app = ChatApp::new(&self.client_config(), Arc::new(notifier))?;
        Ok((app, rx))
    }

    /// Raw HTTP client with its own cookie jar
    pub fn http(&self) -> Result<Client> {
        Ok(Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(10))
            .build()?)
    }

    pub async fn post<B: Serialize>(&self, client: &Client, path: &str, body: &B) -> Result<Response> {
        Ok(client.post(self.url(path)).json(body).send().await?)
    }

    pub async fn get(&self, client: &Client, path: &str) -> Result<Response> {
        Ok(client.get(self.url(path)).send().await?)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Assert the status and decode the JSON body
pub async fn assert_json<T: DeserializeOwned>(response: Response, expected: StatusCode) -> Result<T> {
    let status = response.status();
    if status != expected {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected}, got {status}. Body: {body}");
    }
    Ok(response.json().await?)
}

/// Assert the status and return the error body's `message`
pub async fn assert_error(response: Response, expected: StatusCode) -> Result<String> {
    let body: serde_json::Value = assert_json(response, expected).await?;
    body["message"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("error body without message: {body}"))
}

/// Poll `condition` until it holds or `timeout` passes
pub async fn wait_until<F>(timeout: Duration, mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if condition() {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

/// Upper bound for socket-driven state to settle
pub const SETTLE: Duration = Duration::from_secs(3);
