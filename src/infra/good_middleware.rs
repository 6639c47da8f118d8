//! HTTP client for the good middleware, the service of record for goods.

use async_trait::async_trait;
use reqwest::Client;
use tracing::{info, instrument};

use crate::domain::{AppError, BackendError, Good, GoodBackend, ValidatedGood};

use super::http::{CallError, Envelope, HttpClientConfig, build_client, get_ok, join_url, post_json};

const CREATE_GOOD_PATH: &str = "/v1/create/good";
const HEALTH_PATH: &str = "/healthz";

/// Good middleware client speaking JSON over HTTP
pub struct HttpGoodBackend {
    http_client: Client,
    base_url: String,
}

impl HttpGoodBackend {
    /// Create a new good middleware client with custom configuration
    pub fn new(base_url: &str, config: HttpClientConfig) -> Result<Self, AppError> {
        let http_client = build_client(&config)
            .map_err(|e| AppError::Backend(BackendError::Unavailable(e.to_string())))?;
        info!(base_url = %base_url, "Created good middleware client");
        Ok(Self {
            http_client,
            base_url: base_url.to_string(),
        })
    }

    /// Create a new good middleware client with default configuration
    pub fn with_defaults(base_url: &str) -> Result<Self, AppError> {
        Self::new(base_url, HttpClientConfig::default())
    }
}

impl From<CallError> for BackendError {
    fn from(err: CallError) -> Self {
        match err {
            CallError::Timeout(msg) => BackendError::Timeout(msg),
            CallError::Transport(msg) => BackendError::Unavailable(msg),
            CallError::Status(msg) => BackendError::Rejected(msg),
            CallError::Decode(msg) => BackendError::InvalidResponse(msg),
        }
    }
}

#[async_trait]
impl GoodBackend for HttpGoodBackend {
    async fn health_check(&self) -> Result<(), AppError> {
        get_ok(&self.http_client, &join_url(&self.base_url, HEALTH_PATH))
            .await
            .map_err(|e| AppError::Backend(e.into()))
    }

    #[instrument(skip(self, good), fields(title = %good.title))]
    async fn create_good(&self, good: &ValidatedGood) -> Result<Good, AppError> {
        let url = join_url(&self.base_url, CREATE_GOOD_PATH);
        let reply: Envelope<Good> = post_json(&self.http_client, &url, &Envelope { info: good })
            .await
            .map_err(|e| AppError::Backend(e.into()))?;
        Ok(reply.info)
    }
}
