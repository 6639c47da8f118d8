//! HTTP client for the coininfo service.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::{AppError, CoinInfo, CoinInfoClient, CoinInfoError};

use super::http::{CallError, Envelope, HttpClientConfig, build_client, get_ok, join_url, post_json};

const GET_COIN_INFO_PATH: &str = "/v1/get/coininfo";
const HEALTH_PATH: &str = "/healthz";

#[derive(Debug, Serialize)]
struct GetCoinInfoRequest<'a> {
    id: &'a Uuid,
}

/// Coininfo service client speaking JSON over HTTP
pub struct HttpCoinInfoClient {
    http_client: Client,
    base_url: String,
}

impl HttpCoinInfoClient {
    /// Create a new coininfo client with custom configuration
    pub fn new(base_url: &str, config: HttpClientConfig) -> Result<Self, AppError> {
        let http_client = build_client(&config)
            .map_err(|e| AppError::CoinInfo(CoinInfoError::Unavailable(e.to_string())))?;
        info!(base_url = %base_url, "Created coininfo client");
        Ok(Self {
            http_client,
            base_url: base_url.to_string(),
        })
    }

    /// Create a new coininfo client with default configuration
    pub fn with_defaults(base_url: &str) -> Result<Self, AppError> {
        Self::new(base_url, HttpClientConfig::default())
    }
}

impl From<CallError> for CoinInfoError {
    fn from(err: CallError) -> Self {
        match err {
            CallError::Timeout(msg) => CoinInfoError::Timeout(msg),
            CallError::Transport(msg) => CoinInfoError::Unavailable(msg),
            CallError::Status(msg) => CoinInfoError::Rejected(msg),
            CallError::Decode(msg) => CoinInfoError::InvalidResponse(msg),
        }
    }
}

#[async_trait]
impl CoinInfoClient for HttpCoinInfoClient {
    async fn health_check(&self) -> Result<(), AppError> {
        get_ok(&self.http_client, &join_url(&self.base_url, HEALTH_PATH))
            .await
            .map_err(|e| AppError::CoinInfo(e.into()))
    }

    async fn get_coin_info(&self, id: &Uuid) -> Result<CoinInfo, AppError> {
        debug!(coin_type_id = %id, "Looking up coin");
        let url = join_url(&self.base_url, GET_COIN_INFO_PATH);
        let reply: Envelope<Option<CoinInfo>> =
            post_json(&self.http_client, &url, &GetCoinInfoRequest { id })
                .await
                .map_err(|e| AppError::CoinInfo(e.into()))?;

        // The service answers an unknown id with an empty envelope.
        let coin = reply
            .info
            .ok_or_else(|| AppError::CoinInfo(CoinInfoError::NotFound(id.to_string())))?;

        if coin.id != *id {
            return Err(AppError::CoinInfo(CoinInfoError::InvalidResponse(format!(
                "requested coin {id}, got {}",
                coin.id
            ))));
        }
        Ok(coin)
    }
}
