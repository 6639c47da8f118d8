use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// How a good pays out its benefits.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
pub enum BenefitType {
    #[serde(rename = "BenefitTypePlatform")]
    Platform,
    #[serde(rename = "BenefitTypePool")]
    Pool,
}

impl BenefitType {
    pub const ALL: [BenefitType; 2] = [BenefitType::Platform, BenefitType::Pool];

    pub fn as_str(&self) -> &'static str {
        match self {
            BenefitType::Platform => "BenefitTypePlatform",
            BenefitType::Pool => "BenefitTypePool",
        }
    }

    /// Resolves a wire enum name; unknown names (including the empty default) yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }
}

impl fmt::Display for BenefitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Product classification of a good.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
pub enum GoodType {
    #[serde(rename = "GoodTypeClassicMining")]
    ClassicMining,
    #[serde(rename = "GoodTypeUnionMining")]
    UnionMining,
    #[serde(rename = "GoodTypeTechniqueFee")]
    TechniqueFee,
    #[serde(rename = "GoodTypeElectricityFee")]
    ElectricityFee,
}

impl GoodType {
    pub const ALL: [GoodType; 4] = [
        GoodType::ClassicMining,
        GoodType::UnionMining,
        GoodType::TechniqueFee,
        GoodType::ElectricityFee,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GoodType::ClassicMining => "GoodTypeClassicMining",
            GoodType::UnionMining => "GoodTypeUnionMining",
            GoodType::TechniqueFee => "GoodTypeTechniqueFee",
            GoodType::ElectricityFee => "GoodTypeElectricityFee",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }
}

impl fmt::Display for GoodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Good attributes as submitted by the caller, before validation.
///
/// Every field defaults to its zero value when omitted, so a missing field is
/// reported by the validator under its own name rather than as a decode error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct GoodInfo {
    #[serde(rename = "deviceInfoID")]
    pub device_info_id: String,
    pub duration_days: i32,
    #[serde(rename = "coinTypeID")]
    pub coin_type_id: String,
    #[serde(rename = "inheritFromGoodID", skip_serializing_if = "Option::is_none")]
    pub inherit_from_good_id: Option<String>,
    #[serde(rename = "vendorLocationID")]
    pub vendor_location_id: String,
    /// Decimal string, e.g. `"12.5"`.
    pub price: String,
    /// Enum name, e.g. `"BenefitTypePlatform"`.
    pub benefit_type: String,
    /// Enum name, e.g. `"GoodTypeClassicMining"`.
    pub good_type: String,
    pub title: String,
    pub unit: String,
    pub unit_amount: i32,
    #[serde(rename = "supportCoinTypeIDs")]
    pub support_coin_type_ids: Vec<String>,
    /// Unix seconds.
    pub delivery_at: u64,
    /// Unix seconds.
    pub start_at: u64,
    pub test_only: bool,
    pub total: i32,
    pub posters: Vec<String>,
    pub labels: Vec<String>,
}

/// Request payload for creating a good.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateGoodRequest {
    #[serde(default)]
    pub info: GoodInfo,
}

impl CreateGoodRequest {
    pub fn new(info: GoodInfo) -> Self {
        Self { info }
    }
}

/// A creation request that passed every admissibility check.
///
/// Only [`crate::domain::validation::validate`] builds one, so holding a
/// `ValidatedGood` is proof the checks ran.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedGood {
    #[serde(rename = "deviceInfoID")]
    pub device_info_id: String,
    pub duration_days: i32,
    #[serde(rename = "coinTypeID")]
    pub coin_type_id: Uuid,
    #[serde(rename = "inheritFromGoodID", skip_serializing_if = "Option::is_none")]
    pub inherit_from_good_id: Option<String>,
    #[serde(rename = "vendorLocationID")]
    pub vendor_location_id: String,
    pub price: Decimal,
    pub benefit_type: BenefitType,
    pub good_type: GoodType,
    pub title: String,
    pub unit: String,
    pub unit_amount: i32,
    #[serde(rename = "supportCoinTypeIDs")]
    pub support_coin_type_ids: Vec<Uuid>,
    pub delivery_at: u64,
    pub start_at: u64,
    pub test_only: bool,
    pub total: i32,
    pub posters: Vec<String>,
    pub labels: Vec<String>,
}

/// Good record as persisted and returned by the good middleware.
///
/// Coin references are raw identifiers; display metadata is resolved separately.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Good {
    pub id: Uuid,
    #[serde(rename = "deviceInfoID")]
    pub device_info_id: String,
    #[serde(default)]
    pub device_type: String,
    #[serde(default)]
    pub device_manufacturer: String,
    #[serde(default)]
    pub device_power_consumption: u32,
    #[serde(default)]
    pub device_shipment_at: u64,
    #[serde(default)]
    pub device_posters: Vec<String>,
    pub duration_days: i32,
    #[serde(rename = "coinTypeID")]
    pub coin_type_id: Uuid,
    #[serde(rename = "inheritFromGoodID", default)]
    pub inherit_from_good_id: Option<String>,
    #[serde(default)]
    pub inherit_from_good_name: Option<String>,
    #[serde(default)]
    pub inherit_from_good_type: Option<GoodType>,
    #[serde(default)]
    pub inherit_from_good_benefit_type: Option<BenefitType>,
    #[serde(rename = "vendorLocationID")]
    pub vendor_location_id: String,
    #[serde(default)]
    pub vendor_location_country: String,
    #[serde(default)]
    pub vendor_location_province: String,
    #[serde(default)]
    pub vendor_location_city: String,
    #[serde(default)]
    pub vendor_location_address: String,
    pub good_type: GoodType,
    pub benefit_type: BenefitType,
    pub price: String,
    pub title: String,
    pub unit: String,
    pub unit_amount: i32,
    #[serde(default)]
    pub test_only: bool,
    #[serde(default)]
    pub posters: Vec<String>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub vote_count: u32,
    #[serde(default)]
    pub rating: f32,
    #[serde(rename = "supportCoinTypeIDs", default)]
    pub support_coin_type_ids: Vec<Uuid>,
    #[serde(rename = "goodStockID")]
    pub good_stock_id: String,
    pub good_total: u32,
    #[serde(default)]
    pub good_locked: u32,
    #[serde(default)]
    pub good_in_service: u32,
    #[serde(default)]
    pub good_sold: u32,
    pub delivery_at: u64,
    pub start_at: u64,
    pub created_at: u64,
    pub updated_at: u64,
}

/// Display metadata for a coin, owned by the coininfo service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CoinInfo {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub logo: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub pre_sale: bool,
}

/// Resolved metadata for one supported coin of a good.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SupportCoin {
    #[serde(rename = "coinTypeID")]
    pub coin_type_id: Uuid,
    pub coin_logo: String,
    pub coin_name: String,
    pub coin_unit: String,
    pub coin_pre_sale: bool,
}

impl SupportCoin {
    fn new(coin_type_id: Uuid, info: CoinInfo) -> Self {
        Self {
            coin_type_id,
            coin_logo: info.logo,
            coin_name: info.name,
            coin_unit: info.unit,
            coin_pre_sale: info.pre_sale,
        }
    }
}

/// A created good with coin display fields inlined.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GoodResponse {
    #[serde(flatten)]
    pub good: Good,
    pub coin_logo: String,
    pub coin_name: String,
    pub coin_unit: String,
    pub coin_pre_sale: bool,
    pub support_coins: Vec<SupportCoin>,
}

impl GoodResponse {
    /// Inlines the primary coin and the supported coins into the good.
    ///
    /// `supported` must be in the order of `good.support_coin_type_ids`; each
    /// block takes its identifier from that list.
    pub fn assemble(good: Good, primary: CoinInfo, supported: Vec<CoinInfo>) -> Self {
        debug_assert_eq!(good.support_coin_type_ids.len(), supported.len());

        let support_coins = good
            .support_coin_type_ids
            .iter()
            .zip(supported)
            .map(|(id, info)| SupportCoin::new(*id, info))
            .collect();

        Self {
            good,
            coin_logo: primary.logo,
            coin_name: primary.name,
            coin_unit: primary.unit,
            coin_pre_sale: primary.pre_sale,
            support_coins,
        }
    }
}

/// Response payload for good creation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateGoodResponse {
    pub info: GoodResponse,
}

/// Health check status for services.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Health check response for the application.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub good_middleware: HealthStatus,
    pub coininfo: HealthStatus,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    /// Creation needs the good middleware, so losing it is fatal; losing only
    /// coininfo still lets the service persist goods and is reported as degraded.
    pub fn new(good_middleware: HealthStatus, coininfo: HealthStatus) -> Self {
        let status = match (&good_middleware, &coininfo) {
            (HealthStatus::Healthy, HealthStatus::Healthy) => HealthStatus::Healthy,
            (HealthStatus::Unhealthy, _) => HealthStatus::Unhealthy,
            _ => HealthStatus::Degraded,
        };

        Self {
            status,
            good_middleware,
            coininfo,
            timestamp: Utc::now(),
        }
    }
}

/// Error body returned by every failing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    pub r#type: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RateLimitResponse {
    pub error: ErrorDetail,
    pub retry_after: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coin(name: &str) -> CoinInfo {
        CoinInfo {
            id: Uuid::new_v4(),
            name: name.to_string(),
            logo: format!("https://logo/{name}.png"),
            unit: name.to_uppercase(),
            pre_sale: false,
        }
    }

    fn good(support: Vec<Uuid>) -> Good {
        Good {
            id: Uuid::new_v4(),
            device_info_id: "device".to_string(),
            device_type: String::new(),
            device_manufacturer: String::new(),
            device_power_consumption: 0,
            device_shipment_at: 0,
            device_posters: Vec::new(),
            duration_days: 365,
            coin_type_id: Uuid::new_v4(),
            inherit_from_good_id: None,
            inherit_from_good_name: None,
            inherit_from_good_type: None,
            inherit_from_good_benefit_type: None,
            vendor_location_id: "vendor".to_string(),
            vendor_location_country: String::new(),
            vendor_location_province: String::new(),
            vendor_location_city: String::new(),
            vendor_location_address: String::new(),
            good_type: GoodType::ClassicMining,
            benefit_type: BenefitType::Pool,
            price: "10".to_string(),
            title: "S19".to_string(),
            unit: "TiB".to_string(),
            unit_amount: 1,
            test_only: false,
            posters: Vec::new(),
            labels: Vec::new(),
            vote_count: 0,
            rating: 0.0,
            support_coin_type_ids: support,
            good_stock_id: "stock".to_string(),
            good_total: 100,
            good_locked: 0,
            good_in_service: 0,
            good_sold: 0,
            delivery_at: 1,
            start_at: 1,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_enum_names_round_trip() {
        for t in BenefitType::ALL {
            assert_eq!(BenefitType::from_name(t.as_str()), Some(t));
        }
        for t in GoodType::ALL {
            assert_eq!(GoodType::from_name(t.as_str()), Some(t));
        }
        assert_eq!(BenefitType::from_name(""), None);
        assert_eq!(GoodType::from_name("GoodTypeUnknown"), None);
    }

    #[test]
    fn test_enum_wire_name_matches_display() {
        let json = serde_json::to_string(&GoodType::TechniqueFee).unwrap();
        assert_eq!(json, "\"GoodTypeTechniqueFee\"");
        assert_eq!(GoodType::TechniqueFee.to_string(), "GoodTypeTechniqueFee");
    }

    #[test]
    fn test_good_info_missing_fields_default() {
        let info: GoodInfo = serde_json::from_str(r#"{"title":"S19"}"#).unwrap();
        assert_eq!(info.title, "S19");
        assert_eq!(info.duration_days, 0);
        assert!(info.coin_type_id.is_empty());
        assert!(info.support_coin_type_ids.is_empty());
    }

    #[test]
    fn test_good_info_wire_names() {
        let info = GoodInfo {
            coin_type_id: "c".to_string(),
            support_coin_type_ids: vec!["s".to_string()],
            ..Default::default()
        };
        let value = serde_json::to_value(&info).unwrap();
        assert_eq!(value["coinTypeID"], "c");
        assert_eq!(value["supportCoinTypeIDs"][0], "s");
        assert!(value.get("inheritFromGoodID").is_none());
        assert!(value.get("durationDays").is_some());
    }

    #[test]
    fn test_assemble_inlines_coins_in_order() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let good = good(vec![a, b]);
        let primary = coin("btc");

        let response =
            GoodResponse::assemble(good.clone(), primary.clone(), vec![coin("eth"), coin("usdt")]);

        assert_eq!(response.good, good);
        assert_eq!(response.coin_name, "btc");
        assert_eq!(response.coin_unit, "BTC");
        assert_eq!(response.support_coins.len(), 2);
        assert_eq!(response.support_coins[0].coin_type_id, a);
        assert_eq!(response.support_coins[0].coin_name, "eth");
        assert_eq!(response.support_coins[1].coin_type_id, b);
        assert_eq!(response.support_coins[1].coin_name, "usdt");
    }

    #[test]
    fn test_good_response_flattens_good_fields() {
        let good = good(Vec::new());
        let id = good.id;
        let response = GoodResponse::assemble(good, coin("btc"), Vec::new());

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["id"], id.to_string());
        assert_eq!(value["coinName"], "btc");
        assert_eq!(value["goodType"], "GoodTypeClassicMining");
        assert!(value["supportCoins"].as_array().unwrap().is_empty());

        let decoded: GoodResponse = serde_json::from_value(value).unwrap();
        assert_eq!(decoded, response);
    }

    #[test]
    fn test_health_response_all_healthy() {
        let response = HealthResponse::new(HealthStatus::Healthy, HealthStatus::Healthy);
        assert_eq!(response.status, HealthStatus::Healthy);
    }

    #[test]
    fn test_health_response_coininfo_down_is_degraded() {
        let response = HealthResponse::new(HealthStatus::Healthy, HealthStatus::Unhealthy);
        assert_eq!(response.status, HealthStatus::Degraded);
    }

    #[test]
    fn test_health_response_middleware_down_is_unhealthy() {
        let response = HealthResponse::new(HealthStatus::Unhealthy, HealthStatus::Healthy);
        assert_eq!(response.status, HealthStatus::Unhealthy);
    }
}
