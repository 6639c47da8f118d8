//! Mock implementations for testing.
//!
//! These mocks provide in-memory implementations of domain traits
//! that can be configured to simulate various scenarios including
//! success, failure, and edge cases.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

use crate::domain::{
    AppError, BackendError, CoinInfo, CoinInfoClient, CoinInfoError, Good, GoodBackend,
    GoodInfo, ValidatedGood,
};

/// Configuration for mock behavior.
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// If true, operations will fail.
    pub should_fail: bool,
    /// Custom error message for failures.
    pub error_message: Option<String>,
    /// Simulated latency in milliseconds.
    pub latency_ms: Option<u64>,
}

impl MockConfig {
    /// Creates a config that always succeeds.
    #[must_use]
    pub fn success() -> Self {
        Self::default()
    }

    /// Creates a config that always fails.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            should_fail: true,
            error_message: Some(message.into()),
            latency_ms: None,
        }
    }

    /// Adds simulated latency.
    #[must_use]
    pub fn with_latency(mut self, ms: u64) -> Self {
        self.latency_ms = Some(ms);
        self
    }

    async fn simulate_latency(&self) {
        if let Some(ms) = self.latency_ms {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }
    }
}

/// Builds the record a well-behaved good middleware would return for `request`.
pub fn good_from_request(id: Uuid, request: &ValidatedGood) -> Good {
    let now = Utc::now().timestamp().max(0) as u64;
    let total = u32::try_from(request.total).unwrap_or_default();
    Good {
        id,
        device_info_id: request.device_info_id.clone(),
        device_type: "S19 Pro".to_string(),
        device_manufacturer: "Bitmain".to_string(),
        device_power_consumption: 3250,
        device_shipment_at: now,
        device_posters: Vec::new(),
        duration_days: request.duration_days,
        coin_type_id: request.coin_type_id,
        inherit_from_good_id: request.inherit_from_good_id.clone(),
        inherit_from_good_name: None,
        inherit_from_good_type: None,
        inherit_from_good_benefit_type: None,
        vendor_location_id: request.vendor_location_id.clone(),
        vendor_location_country: "Canada".to_string(),
        vendor_location_province: "Quebec".to_string(),
        vendor_location_city: "Montreal".to_string(),
        vendor_location_address: "1 Rue Example".to_string(),
        good_type: request.good_type,
        benefit_type: request.benefit_type,
        price: request.price.to_string(),
        title: request.title.clone(),
        unit: request.unit.clone(),
        unit_amount: request.unit_amount,
        test_only: request.test_only,
        posters: request.posters.clone(),
        labels: request.labels.clone(),
        vote_count: 0,
        rating: 0.0,
        support_coin_type_ids: request.support_coin_type_ids.clone(),
        good_stock_id: Uuid::new_v4().to_string(),
        good_total: total,
        good_locked: 0,
        good_in_service: 0,
        good_sold: 0,
        delivery_at: request.delivery_at,
        start_at: request.start_at,
        created_at: now,
        updated_at: now,
    }
}

/// A creation request that passes validation at `now` (unix seconds).
pub fn valid_good_info(now: u64, coin_type_id: Uuid, support: &[Uuid]) -> GoodInfo {
    GoodInfo {
        device_info_id: Uuid::new_v4().to_string(),
        duration_days: 365,
        coin_type_id: coin_type_id.to_string(),
        inherit_from_good_id: None,
        vendor_location_id: Uuid::new_v4().to_string(),
        price: "1499.99".to_string(),
        benefit_type: "BenefitTypePlatform".to_string(),
        good_type: "GoodTypeClassicMining".to_string(),
        title: "Antminer S19 Pro 110T".to_string(),
        unit: "TiB".to_string(),
        unit_amount: 110,
        support_coin_type_ids: support.iter().map(Uuid::to_string).collect(),
        delivery_at: now + 86_400,
        start_at: now + 2 * 86_400,
        test_only: false,
        total: 1000,
        posters: vec!["https://cdn.example.com/s19.png".to_string()],
        labels: vec!["hot".to_string()],
    }
}

/// Mock good middleware for testing.
///
/// Stores created goods in memory and records every create request it
/// receives, in order.
///
/// # Example
///
/// ```
/// use good_gateway::test_utils::{MockGoodBackend, mocks::MockConfig};
///
/// // Create a mock that succeeds
/// let mock = MockGoodBackend::new();
///
/// // Create a mock that fails
/// let failing_mock = MockGoodBackend::with_config(MockConfig::failure("DB error"));
/// ```
pub struct MockGoodBackend {
    storage: Arc<Mutex<HashMap<Uuid, Good>>>,
    requests: Arc<Mutex<Vec<ValidatedGood>>>,
    config: MockConfig,
    call_count: AtomicU64,
    is_healthy: AtomicBool,
    /// Overrides the stored record's support coins, simulating a backend that
    /// returns something other than what was submitted.
    support_override: Mutex<Option<Vec<Uuid>>>,
}

impl MockGoodBackend {
    /// Creates a new mock with default (success) configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(MockConfig::success())
    }

    /// Creates a new mock with the given configuration.
    #[must_use]
    pub fn with_config(config: MockConfig) -> Self {
        Self {
            storage: Arc::new(Mutex::new(HashMap::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            config,
            call_count: AtomicU64::new(0),
            is_healthy: AtomicBool::new(true),
            support_override: Mutex::new(None),
        }
    }

    /// Creates a mock that always fails.
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_config(MockConfig::failure(message))
    }

    /// Gets the number of times any method was called.
    pub fn call_count(&self) -> u64 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Sets the health status.
    pub fn set_healthy(&self, healthy: bool) {
        self.is_healthy.store(healthy, Ordering::Relaxed);
    }

    /// Makes subsequent creates persist `ids` as the support coins.
    pub fn set_support_override(&self, ids: Vec<Uuid>) {
        *self.support_override.lock().unwrap() = Some(ids);
    }

    /// Gets every create request received, in arrival order.
    pub fn create_requests(&self) -> Vec<ValidatedGood> {
        self.requests.lock().unwrap().clone()
    }

    /// Gets all stored goods.
    pub fn get_all_goods(&self) -> Vec<Good> {
        self.storage.lock().unwrap().values().cloned().collect()
    }

    fn increment_call_count(&self) {
        self.call_count.fetch_add(1, Ordering::Relaxed);
    }

    fn check_should_fail(&self) -> Result<(), AppError> {
        if self.config.should_fail {
            let msg = self
                .config
                .error_message
                .clone()
                .unwrap_or_else(|| "Mock good middleware error".to_string());
            return Err(AppError::Backend(BackendError::Rejected(msg)));
        }
        Ok(())
    }
}

impl Default for MockGoodBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GoodBackend for MockGoodBackend {
    async fn health_check(&self) -> Result<(), AppError> {
        self.increment_call_count();

        if !self.is_healthy.load(Ordering::Relaxed) {
            return Err(AppError::Backend(BackendError::Unavailable(
                "Mock good middleware unhealthy".to_string(),
            )));
        }

        self.check_should_fail()
    }

    async fn create_good(&self, good: &ValidatedGood) -> Result<Good, AppError> {
        self.increment_call_count();
        self.requests.lock().unwrap().push(good.clone());
        self.config.simulate_latency().await;
        self.check_should_fail()?;

        let mut created = good_from_request(Uuid::new_v4(), good);
        if let Some(ids) = self.support_override.lock().unwrap().clone() {
            created.support_coin_type_ids = ids;
        }

        let mut storage = self.storage.lock().unwrap();
        storage.insert(created.id, created.clone());

        Ok(created)
    }
}

/// Mock coininfo service for testing.
///
/// Resolves any identifier to synthesized metadata unless a coin was
/// registered explicitly, and can be told to fail for specific identifiers.
///
/// # Example
///
/// ```
/// use good_gateway::test_utils::{MockCoinInfoClient, mocks::MockConfig};
///
/// let mock = MockCoinInfoClient::new();
/// let failing_mock = MockCoinInfoClient::with_config(MockConfig::failure("RPC error"));
/// ```
pub struct MockCoinInfoClient {
    coins: Mutex<HashMap<Uuid, CoinInfo>>,
    failing_ids: Mutex<HashSet<Uuid>>,
    lookups: Mutex<Vec<Uuid>>,
    config: MockConfig,
    call_count: AtomicU64,
    is_healthy: AtomicBool,
}

impl MockCoinInfoClient {
    /// Creates a new mock with default (success) configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(MockConfig::success())
    }

    /// Creates a new mock with the given configuration.
    #[must_use]
    pub fn with_config(config: MockConfig) -> Self {
        Self {
            coins: Mutex::new(HashMap::new()),
            failing_ids: Mutex::new(HashSet::new()),
            lookups: Mutex::new(Vec::new()),
            config,
            call_count: AtomicU64::new(0),
            is_healthy: AtomicBool::new(true),
        }
    }

    /// Creates a mock that always fails.
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_config(MockConfig::failure(message))
    }

    /// Registers metadata returned for `coin.id`.
    pub fn insert_coin(&self, coin: CoinInfo) {
        self.coins.lock().unwrap().insert(coin.id, coin);
    }

    /// Makes lookups of `id` fail.
    pub fn fail_on(&self, id: Uuid) {
        self.failing_ids.lock().unwrap().insert(id);
    }

    /// Gets the number of times any method was called.
    pub fn call_count(&self) -> u64 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Gets every looked-up identifier, in call order.
    pub fn lookups(&self) -> Vec<Uuid> {
        self.lookups.lock().unwrap().clone()
    }

    /// Sets the health status.
    pub fn set_healthy(&self, healthy: bool) {
        self.is_healthy.store(healthy, Ordering::Relaxed);
    }

    fn increment_call_count(&self) {
        self.call_count.fetch_add(1, Ordering::Relaxed);
    }

    fn check_should_fail(&self) -> Result<(), AppError> {
        if self.config.should_fail {
            let msg = self
                .config
                .error_message
                .clone()
                .unwrap_or_else(|| "Mock coininfo error".to_string());
            return Err(AppError::CoinInfo(CoinInfoError::Unavailable(msg)));
        }
        Ok(())
    }
}

impl Default for MockCoinInfoClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CoinInfoClient for MockCoinInfoClient {
    async fn health_check(&self) -> Result<(), AppError> {
        self.increment_call_count();

        if !self.is_healthy.load(Ordering::Relaxed) {
            return Err(AppError::CoinInfo(CoinInfoError::Unavailable(
                "Mock coininfo unhealthy".to_string(),
            )));
        }

        self.check_should_fail()
    }

    async fn get_coin_info(&self, id: &Uuid) -> Result<CoinInfo, AppError> {
        self.increment_call_count();
        self.lookups.lock().unwrap().push(*id);
        self.config.simulate_latency().await;
        self.check_should_fail()?;

        if self.failing_ids.lock().unwrap().contains(id) {
            return Err(AppError::CoinInfo(CoinInfoError::NotFound(id.to_string())));
        }

        let registered = self.coins.lock().unwrap().get(id).cloned();
        Ok(registered.unwrap_or_else(|| {
            let short = id.simple().to_string()[..8].to_string();
            CoinInfo {
                id: *id,
                name: format!("coin-{short}"),
                logo: format!("https://cdn.example.com/coins/{short}.png"),
                unit: short.to_uppercase(),
                pre_sale: false,
            }
        }))
    }
}
