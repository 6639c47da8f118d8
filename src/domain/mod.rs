//! Domain layer containing core business types, traits, validation and error definitions.

pub mod error;
pub mod traits;
pub mod types;
pub mod validation;

pub use error::{AppError, BackendError, CoinInfoError, ConfigError, ValidationError};
pub use traits::{CoinInfoClient, GoodBackend};
pub use types::{
    BenefitType, CoinInfo, CreateGoodRequest, CreateGoodResponse, ErrorDetail, ErrorResponse,
    Good, GoodInfo, GoodResponse, GoodType, HealthResponse, HealthStatus, RateLimitResponse,
    SupportCoin, ValidatedGood,
};
pub use validation::validate;
