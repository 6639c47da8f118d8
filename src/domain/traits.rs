//! Domain traits defining contracts for external systems.

use async_trait::async_trait;
use uuid::Uuid;

use super::error::AppError;
use super::types::{CoinInfo, Good, ValidatedGood};

/// Record-management backend that persists goods (the good middleware).
#[async_trait]
pub trait GoodBackend: Send + Sync {
    /// Check backend connectivity
    async fn health_check(&self) -> Result<(), AppError>;

    /// Create and persist a good, returning the stored record
    async fn create_good(&self, good: &ValidatedGood) -> Result<Good, AppError>;
}

/// Read-only source of coin display metadata.
#[async_trait]
pub trait CoinInfoClient: Send + Sync {
    /// Check coininfo service connectivity
    async fn health_check(&self) -> Result<(), AppError>;

    /// Look up a single coin by identifier
    async fn get_coin_info(&self, id: &Uuid) -> Result<CoinInfo, AppError>;
}
