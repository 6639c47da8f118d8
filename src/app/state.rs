//! Application state management.
//!
//! This module provides the shared application state that is
//! accessible to all request handlers via Axum's State extractor.

use std::sync::Arc;

use crate::domain::{CoinInfoClient, GoodBackend};
use crate::infra::observability::PrometheusHandle;

use super::service::AppService;

/// Shared application state for the Axum web server.
///
/// All contained types are wrapped in `Arc` and implement `Send + Sync`,
/// making `AppState` safe to share across async tasks.
///
/// # Example
///
/// ```ignore
/// let backend = Arc::new(HttpGoodBackend::with_defaults(&middleware_url)?);
/// let coininfo = Arc::new(HttpCoinInfoClient::with_defaults(&coininfo_url)?);
/// let state = AppState::new(backend, coininfo);
///
/// let router = create_router(Arc::new(state));
/// ```
#[derive(Clone)]
pub struct AppState {
    /// The application service containing business logic.
    pub service: Arc<AppService>,

    /// Good middleware client.
    pub backend: Arc<dyn GoodBackend>,

    /// Coin metadata client.
    pub coininfo: Arc<dyn CoinInfoClient>,

    /// Prometheus scrape handle, present when the recorder was installed.
    pub metrics: Option<Arc<PrometheusHandle>>,
}

impl AppState {
    /// Creates a new `AppState` instance with the provided clients.
    ///
    /// This constructor also creates the `AppService` internally,
    /// wiring it to the provided clients.
    #[must_use]
    pub fn new(backend: Arc<dyn GoodBackend>, coininfo: Arc<dyn CoinInfoClient>) -> Self {
        let service = Arc::new(AppService::new(
            Arc::clone(&backend),
            Arc::clone(&coininfo),
        ));

        Self {
            service,
            backend,
            coininfo,
            metrics: None,
        }
    }

    /// Attaches the Prometheus handle rendered by `GET /metrics`.
    #[must_use]
    pub fn with_metrics(mut self, handle: Option<Arc<PrometheusHandle>>) -> Self {
        self.metrics = handle;
        self
    }
}
