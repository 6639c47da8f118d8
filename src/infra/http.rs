//! Shared JSON-over-HTTP plumbing for downstream service clients.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::debug;

/// Configuration for a downstream HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Upper bound for a single request, connect included
    pub timeout: Duration,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
        }
    }
}

/// `{"info": ...}` envelope used by the downstream services.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Envelope<T> {
    pub info: T,
}

/// Transport-level failure of a single call, mapped by each client onto its domain error.
#[derive(Debug)]
pub(crate) enum CallError {
    Timeout(String),
    Transport(String),
    Status(String),
    Decode(String),
}

pub(crate) fn build_client(config: &HttpClientConfig) -> Result<Client, reqwest::Error> {
    Client::builder().timeout(config.timeout).build()
}

pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

fn transport_error(e: reqwest::Error) -> CallError {
    if e.is_timeout() {
        CallError::Timeout(e.to_string())
    } else {
        CallError::Transport(e.to_string())
    }
}

async fn read_response<R: DeserializeOwned>(response: reqwest::Response) -> Result<R, CallError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(CallError::Status(format!("{status}: {body}")));
    }

    response
        .json::<R>()
        .await
        .map_err(|e| CallError::Decode(e.to_string()))
}

/// POSTs `body` as JSON and decodes a JSON reply. Single attempt, no retries.
pub(crate) async fn post_json<B: Serialize + ?Sized, R: DeserializeOwned>(
    client: &Client,
    url: &str,
    body: &B,
) -> Result<R, CallError> {
    debug!(url = %url, "POST");
    let response = client
        .post(url)
        .json(body)
        .send()
        .await
        .map_err(transport_error)?;
    read_response(response).await
}

/// GETs `url` and only checks for a 2xx status.
pub(crate) async fn get_ok(client: &Client, url: &str) -> Result<(), CallError> {
    let response = client.get(url).send().await.map_err(transport_error)?;
    let status = response.status();
    if !status.is_success() {
        return Err(CallError::Status(status.to_string()));
    }
    Ok(())
}
