//! Admissibility checks for good creation requests.
//!
//! Checks run in a fixed order and stop at the first failure, so a request
//! violating several rules always reports the same field.

use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::ValidationError;
use super::types::{BenefitType, GoodInfo, GoodType, ValidatedGood};

const INVALID: &str = "invalid";

/// Validates `info` against the clock reading `now` (unix seconds).
///
/// # Errors
///
/// Returns the first failing check as [`ValidationError::InvalidField`].
pub fn validate(info: &GoodInfo, now: u64) -> Result<ValidatedGood, ValidationError> {
    let coin_type_id = check_coin_type_id(info)?;
    let duration_days = check_duration_days(info)?;
    let price = check_price(info)?;
    let benefit_type = check_benefit_type(info)?;
    let good_type = check_good_type(info)?;
    let title = check_title(info)?;
    let unit_amount = check_unit_amount(info)?;
    let support_coin_type_ids = check_support_coin_type_ids(info)?;
    let delivery_at = check_delivery_at(info, now)?;
    let start_at = check_start_at(info, now)?;
    let total = check_total(info)?;

    Ok(ValidatedGood {
        device_info_id: info.device_info_id.clone(),
        duration_days,
        coin_type_id,
        inherit_from_good_id: info.inherit_from_good_id.clone(),
        vendor_location_id: info.vendor_location_id.clone(),
        price,
        benefit_type,
        good_type,
        title,
        unit: info.unit.clone(),
        unit_amount,
        support_coin_type_ids,
        delivery_at,
        start_at,
        test_only: info.test_only,
        total,
        posters: info.posters.clone(),
        labels: info.labels.clone(),
    })
}

fn check_coin_type_id(info: &GoodInfo) -> Result<Uuid, ValidationError> {
    Uuid::parse_str(&info.coin_type_id).map_err(|e| {
        ValidationError::invalid_field("coinTypeID", &info.coin_type_id, e.to_string())
    })
}

fn check_duration_days(info: &GoodInfo) -> Result<i32, ValidationError> {
    positive("durationDays", info.duration_days)
}

fn check_price(info: &GoodInfo) -> Result<Decimal, ValidationError> {
    let price = parse_price(&info.price)
        .map_err(|reason| ValidationError::invalid_field("price", &info.price, reason))?;
    if price <= Decimal::ZERO {
        return Err(ValidationError::invalid_field("price", &info.price, INVALID));
    }
    Ok(price)
}

/// Parses a plain decimal without rounding; digit separators are not accepted.
fn parse_price(raw: &str) -> Result<Decimal, String> {
    if raw.contains('_') {
        return Err("invalid character '_'".to_string());
    }
    Decimal::from_str_exact(raw).map_err(|e| e.to_string())
}

fn check_benefit_type(info: &GoodInfo) -> Result<BenefitType, ValidationError> {
    BenefitType::from_name(&info.benefit_type)
        .ok_or_else(|| ValidationError::invalid_field("benefitType", &info.benefit_type, INVALID))
}

fn check_good_type(info: &GoodInfo) -> Result<GoodType, ValidationError> {
    GoodType::from_name(&info.good_type)
        .ok_or_else(|| ValidationError::invalid_field("goodType", &info.good_type, INVALID))
}

fn check_title(info: &GoodInfo) -> Result<String, ValidationError> {
    if info.title.is_empty() {
        return Err(ValidationError::invalid_field("title", &info.title, INVALID));
    }
    Ok(info.title.clone())
}

fn check_unit_amount(info: &GoodInfo) -> Result<i32, ValidationError> {
    positive("unitAmount", info.unit_amount)
}

fn check_support_coin_type_ids(info: &GoodInfo) -> Result<Vec<Uuid>, ValidationError> {
    info.support_coin_type_ids
        .iter()
        .enumerate()
        .map(|(index, id)| {
            Uuid::parse_str(id).map_err(|e| {
                ValidationError::invalid_field(
                    "supportCoinTypeIDs",
                    id,
                    format!("entry {index}: {e}"),
                )
            })
        })
        .collect()
}

fn check_delivery_at(info: &GoodInfo, now: u64) -> Result<u64, ValidationError> {
    after_now("deliveryAt", info.delivery_at, now)
}

fn check_start_at(info: &GoodInfo, now: u64) -> Result<u64, ValidationError> {
    after_now("startAt", info.start_at, now)
}

fn check_total(info: &GoodInfo) -> Result<i32, ValidationError> {
    positive("total", info.total)
}

fn positive(field: &str, value: i32) -> Result<i32, ValidationError> {
    if value <= 0 {
        return Err(ValidationError::invalid_field(field, value, INVALID));
    }
    Ok(value)
}

fn after_now(field: &str, value: u64, now: u64) -> Result<u64, ValidationError> {
    if value <= now {
        return Err(ValidationError::invalid_field(
            field,
            value,
            format!("must be later than {now}"),
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    const NOW: u64 = 1_700_000_000;
    const BTC: &str = "5f4e9c1a-6b5a-4c1e-9a0e-3f2b1c0d9e8f";
    const ETH: &str = "0b7f2d6e-1c3a-4e5b-8f9d-2a4c6e8f0b1d";
    const USDT: &str = "c3d5e7f9-1a2b-4c3d-9e4f-5a6b7c8d9e0f";

    fn valid_info() -> GoodInfo {
        GoodInfo {
            device_info_id: "device-1".to_string(),
            duration_days: 365,
            coin_type_id: BTC.to_string(),
            inherit_from_good_id: None,
            vendor_location_id: "vendor-1".to_string(),
            price: "1499.99".to_string(),
            benefit_type: "BenefitTypePlatform".to_string(),
            good_type: "GoodTypeClassicMining".to_string(),
            title: "Antminer S19 Pro".to_string(),
            unit: "TiB".to_string(),
            unit_amount: 110,
            support_coin_type_ids: vec![ETH.to_string(), USDT.to_string()],
            delivery_at: NOW + 86_400,
            start_at: NOW + 2 * 86_400,
            test_only: false,
            total: 1000,
            posters: vec!["poster.png".to_string()],
            labels: vec!["hot".to_string()],
        }
    }

    fn field_of(info: &GoodInfo) -> String {
        validate(info, NOW).unwrap_err().field().to_string()
    }

    #[test]
    fn test_valid_request_is_typed() {
        let validated = validate(&valid_info(), NOW).unwrap();

        assert_eq!(validated.coin_type_id, Uuid::parse_str(BTC).unwrap());
        assert_eq!(validated.price, Decimal::from_str("1499.99").unwrap());
        assert_eq!(validated.benefit_type, BenefitType::Platform);
        assert_eq!(validated.good_type, GoodType::ClassicMining);
        assert_eq!(
            validated.support_coin_type_ids,
            vec![Uuid::parse_str(ETH).unwrap(), Uuid::parse_str(USDT).unwrap()]
        );
        assert_eq!(validated.posters, vec!["poster.png".to_string()]);
        assert_eq!(validated.labels, vec!["hot".to_string()]);
    }

    #[test]
    fn test_empty_support_coins_is_valid() {
        let mut info = valid_info();
        info.support_coin_type_ids.clear();
        assert!(validate(&info, NOW).unwrap().support_coin_type_ids.is_empty());
    }

    #[test]
    fn test_invalid_coin_type_id() {
        let mut info = valid_info();
        info.coin_type_id = "not-a-uuid".to_string();

        let err = validate(&info, NOW).unwrap_err();
        assert_eq!(err.field(), "coinTypeID");
        assert_eq!(err.value(), "not-a-uuid");
        assert!(!err.reason().is_empty());
    }

    #[test]
    fn test_zero_duration_days() {
        let mut info = valid_info();
        info.duration_days = 0;

        let err = validate(&info, NOW).unwrap_err();
        assert_eq!(err.field(), "durationDays");
        assert_eq!(err.value(), "0");
        assert_eq!(err.reason(), "invalid");
    }

    #[test]
    fn test_negative_price() {
        let mut info = valid_info();
        info.price = "-5".to_string();

        let err = validate(&info, NOW).unwrap_err();
        assert_eq!(err.field(), "price");
        assert_eq!(err.value(), "-5");
    }

    #[test]
    fn test_zero_and_unparseable_price() {
        let mut info = valid_info();
        info.price = "0.000".to_string();
        assert_eq!(field_of(&info), "price");

        info.price = "ten".to_string();
        assert_eq!(field_of(&info), "price");

        info.price = String::new();
        assert_eq!(field_of(&info), "price");
    }

    #[test]
    fn test_price_beyond_decimal_precision_rejected() {
        let mut info = valid_info();
        info.price = "0.00000000000000000000000000001".to_string();

        let err = validate(&info, NOW).unwrap_err();
        assert_eq!(err.field(), "price");
        assert_ne!(err.reason(), "invalid");
    }

    #[test]
    fn test_price_with_digit_separator_rejected() {
        let mut info = valid_info();
        info.price = "1_000".to_string();

        let err = validate(&info, NOW).unwrap_err();
        assert_eq!(err.field(), "price");
        assert_eq!(err.value(), "1_000");
    }

    #[test]
    fn test_price_at_full_precision_accepted() {
        let mut info = valid_info();
        info.price = "0.0000000000000000000000000001".to_string();

        let validated = validate(&info, NOW).unwrap();
        assert!(validated.price > Decimal::ZERO);
        assert_eq!(validated.price.scale(), 28);
    }

    #[test]
    fn test_unknown_benefit_type() {
        let mut info = valid_info();
        info.benefit_type = "BenefitTypeDefault".to_string();
        assert_eq!(field_of(&info), "benefitType");

        info.benefit_type = "BenefitTypePool".to_string();
        assert!(validate(&info, NOW).is_ok());
    }

    #[test]
    fn test_unknown_good_type() {
        let mut info = valid_info();
        info.good_type = "GoodTypeCloudStorage".to_string();

        let err = validate(&info, NOW).unwrap_err();
        assert_eq!(err.field(), "goodType");
        assert_eq!(err.value(), "GoodTypeCloudStorage");
    }

    #[test]
    fn test_every_good_type_accepted() {
        for good_type in GoodType::ALL {
            let mut info = valid_info();
            info.good_type = good_type.as_str().to_string();
            assert_eq!(validate(&info, NOW).unwrap().good_type, good_type);
        }
    }

    #[test]
    fn test_empty_title() {
        let mut info = valid_info();
        info.title = String::new();
        assert_eq!(field_of(&info), "title");
    }

    #[test]
    fn test_non_positive_unit_amount() {
        let mut info = valid_info();
        info.unit_amount = -1;
        assert_eq!(field_of(&info), "unitAmount");
    }

    #[test]
    fn test_first_invalid_support_coin_reported() {
        let mut info = valid_info();
        info.support_coin_type_ids = vec![
            ETH.to_string(),
            "bad-1".to_string(),
            "bad-2".to_string(),
        ];

        let err = validate(&info, NOW).unwrap_err();
        assert_eq!(err.field(), "supportCoinTypeIDs");
        assert_eq!(err.value(), "bad-1");
        assert!(err.reason().starts_with("entry 1:"));
    }

    #[test]
    fn test_delivery_at_equal_to_now_rejected() {
        let mut info = valid_info();
        info.delivery_at = NOW;
        assert_eq!(field_of(&info), "deliveryAt");

        info.delivery_at = NOW + 1;
        assert!(validate(&info, NOW).is_ok());
    }

    #[test]
    fn test_start_at_in_past_rejected() {
        let mut info = valid_info();
        info.start_at = NOW - 1;
        assert_eq!(field_of(&info), "startAt");
    }

    #[test]
    fn test_start_at_equal_to_now_rejected() {
        let mut info = valid_info();
        info.start_at = NOW;

        let err = validate(&info, NOW).unwrap_err();
        assert_eq!(err.field(), "startAt");
        assert_eq!(err.reason(), format!("must be later than {NOW}"));

        info.start_at = NOW + 1;
        assert!(validate(&info, NOW).is_ok());
    }

    #[test]
    fn test_zero_total() {
        let mut info = valid_info();
        info.total = 0;
        assert_eq!(field_of(&info), "total");
    }

    #[test]
    fn test_empty_request_reports_coin_type_id() {
        assert_eq!(field_of(&GoodInfo::default()), "coinTypeID");
    }

    #[test]
    fn test_coin_type_id_wins_over_title() {
        let mut info = valid_info();
        info.coin_type_id = "bad".to_string();
        info.title = String::new();
        assert_eq!(field_of(&info), "coinTypeID");
    }

    #[test]
    fn test_lowest_numbered_check_wins() {
        // Break checks from last to first; each step must report the newly broken one.
        let mut info = valid_info();
        let breakers: [(&str, fn(&mut GoodInfo)); 11] = [
            ("total", |i: &mut GoodInfo| i.total = 0),
            ("startAt", |i: &mut GoodInfo| i.start_at = 0),
            ("deliveryAt", |i: &mut GoodInfo| i.delivery_at = 0),
            ("supportCoinTypeIDs", |i: &mut GoodInfo| {
                i.support_coin_type_ids = vec!["x".to_string()]
            }),
            ("unitAmount", |i: &mut GoodInfo| i.unit_amount = 0),
            ("title", |i: &mut GoodInfo| i.title.clear()),
            ("goodType", |i: &mut GoodInfo| i.good_type.clear()),
            ("benefitType", |i: &mut GoodInfo| i.benefit_type.clear()),
            ("price", |i: &mut GoodInfo| i.price = "-1".to_string()),
            ("durationDays", |i: &mut GoodInfo| i.duration_days = -3),
            ("coinTypeID", |i: &mut GoodInfo| i.coin_type_id.clear()),
        ];

        for (field, breaker) in breakers {
            breaker(&mut info);
            assert_eq!(field_of(&info), field);
        }
    }

    #[test]
    fn test_validation_is_deterministic() {
        let mut info = valid_info();
        info.price = "abc".to_string();
        info.total = 0;

        let first = validate(&info, NOW).unwrap_err();
        let second = validate(&info, NOW).unwrap_err();
        assert_eq!(first, second);
    }
}
