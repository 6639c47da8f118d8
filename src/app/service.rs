//! Application service layer.
//!
//! This module contains the core business logic that orchestrates
//! operations between infrastructure components using trait abstractions.

use std::sync::Arc;

use chrono::Utc;
use futures::future::try_join_all;
use tracing::{error, info, instrument, warn};

use crate::domain::{
    AppError, CoinInfo, CoinInfoClient, CreateGoodRequest, Good, GoodBackend, GoodResponse,
    HealthResponse, HealthStatus, ValidatedGood, validate,
};

/// Application service containing core business logic.
///
/// Validates creation requests, delegates persistence to the good middleware
/// and enriches the created good with coin metadata. Holds no per-request
/// state, so one instance serves every request concurrently.
///
/// # Example
///
/// ```ignore
/// let backend = Arc::new(HttpGoodBackend::with_defaults(&middleware_url)?);
/// let coininfo = Arc::new(HttpCoinInfoClient::with_defaults(&coininfo_url)?);
/// let service = AppService::new(backend, coininfo);
///
/// let good = service.create_good(&request).await?;
/// ```
pub struct AppService {
    backend: Arc<dyn GoodBackend>,
    coininfo: Arc<dyn CoinInfoClient>,
}

impl AppService {
    /// Creates a new `AppService` instance.
    ///
    /// # Arguments
    ///
    /// * `backend` - Good middleware that persists goods.
    /// * `coininfo` - Coin metadata lookup.
    #[must_use]
    pub fn new(backend: Arc<dyn GoodBackend>, coininfo: Arc<dyn CoinInfoClient>) -> Self {
        Self { backend, coininfo }
    }

    /// Validates and creates a good, checking timestamps against the current time.
    ///
    /// # Errors
    ///
    /// See [`AppService::create_good_at`].
    pub async fn create_good(&self, request: &CreateGoodRequest) -> Result<GoodResponse, AppError> {
        let now = Utc::now().timestamp().max(0) as u64;
        self.create_good_at(request, now).await
    }

    /// Validates and creates a good, treating `now` (unix seconds) as the current time.
    ///
    /// # Errors
    ///
    /// Returns an `AppError` if:
    /// - Validation fails; the good middleware is not called
    /// - The good middleware fails
    /// - Any coin lookup fails, even though the good was already persisted
    #[instrument(skip(self, request), fields(title = %request.info.title))]
    pub async fn create_good_at(
        &self,
        request: &CreateGoodRequest,
        now: u64,
    ) -> Result<GoodResponse, AppError> {
        let validated = validate(&request.info, now).map_err(|e| {
            warn!(
                field = %e.field(),
                value = %e.value(),
                reason = %e.reason(),
                "Validation failed for create good request"
            );
            record_outcome("invalid_argument");
            AppError::Validation(e)
        })?;

        self.create_validated(&validated).await
    }

    /// Persists an already validated good and resolves its coin metadata.
    ///
    /// This method orchestrates the following workflow:
    /// 1. Creates the good through the good middleware
    /// 2. Resolves the primary coin
    /// 3. Resolves every supported coin concurrently, keeping their order
    /// 4. Inlines the coin metadata into the response
    ///
    /// # Errors
    ///
    /// Returns the first failure; no partial response is produced.
    #[instrument(skip(self, good), fields(coin_type_id = %good.coin_type_id))]
    pub async fn create_validated(&self, good: &ValidatedGood) -> Result<GoodResponse, AppError> {
        info!(
            good_type = %good.good_type,
            support_coins = good.support_coin_type_ids.len(),
            "Creating good"
        );

        let created = self.backend.create_good(good).await.map_err(|e| {
            error!(error = %e, "Good middleware failed to create good");
            record_outcome("backend_error");
            e
        })?;
        info!(good_id = %created.id, "Good created in middleware");

        let response = self.enrich(created).await.map_err(|e| {
            record_outcome("coininfo_error");
            e
        })?;

        record_outcome("created");
        Ok(response)
    }

    /// Resolves coin metadata for a persisted good.
    async fn enrich(&self, good: Good) -> Result<GoodResponse, AppError> {
        let primary = self.lookup_coin(&good, &good.coin_type_id).await?;

        // `try_join_all` keeps input order and drops the remaining lookups on the first error.
        let supported = try_join_all(
            good.support_coin_type_ids
                .iter()
                .map(|id| self.lookup_coin(&good, id)),
        )
        .await?;

        Ok(GoodResponse::assemble(good, primary, supported))
    }

    async fn lookup_coin(&self, good: &Good, id: &uuid::Uuid) -> Result<CoinInfo, AppError> {
        let result = self.coininfo.get_coin_info(id).await;
        let outcome = if result.is_ok() { "ok" } else { "error" };
        metrics::counter!("coin_lookup_total", "outcome" => outcome).increment(1);

        result.map_err(|e| {
            error!(
                good_id = %good.id,
                coin_type_id = %id,
                error = %e,
                "Coin lookup failed after good was created"
            );
            e
        })
    }

    /// Performs a health check on all dependencies.
    ///
    /// Returns the health status of the good middleware and coininfo service.
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> HealthResponse {
        let (backend, coininfo) =
            futures::join!(self.backend.health_check(), self.coininfo.health_check());

        let backend_health = match backend {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => {
                warn!(error = ?e, "Good middleware health check failed");
                HealthStatus::Unhealthy
            }
        };

        let coininfo_health = match coininfo {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => {
                warn!(error = ?e, "Coininfo health check failed");
                HealthStatus::Unhealthy
            }
        };

        HealthResponse::new(backend_health, coininfo_health)
    }
}

fn record_outcome(outcome: &'static str) {
    metrics::counter!("good_create_total", "outcome" => outcome).increment(1);
}
