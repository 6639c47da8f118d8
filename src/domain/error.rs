//! Application error types with proper error chaining.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} is invalid: {reason}")]
    InvalidField {
        field: String,
        value: String,
        reason: String,
    },
}

impl ValidationError {
    pub fn invalid_field(
        field: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        ValidationError::InvalidField {
            field: field.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Wire name of the rejected field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::InvalidField { field, .. } => field,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            ValidationError::InvalidField { value, .. } => value,
        }
    }

    pub fn reason(&self) -> &str {
        match self {
            ValidationError::InvalidField { reason, .. } => reason,
        }
    }
}

/// Failures of the good middleware (record-management backend).
#[derive(Error, Debug, Clone)]
pub enum BackendError {
    #[error("Good middleware unavailable: {0}")]
    Unavailable(String),
    #[error("Good middleware timed out: {0}")]
    Timeout(String),
    #[error("Good middleware rejected request: {0}")]
    Rejected(String),
    #[error("Invalid good middleware response: {0}")]
    InvalidResponse(String),
}

/// Failures of the coin metadata lookup.
#[derive(Error, Debug, Clone)]
pub enum CoinInfoError {
    #[error("Coininfo service unavailable: {0}")]
    Unavailable(String),
    #[error("Coininfo service timed out: {0}")]
    Timeout(String),
    #[error("Coininfo service rejected request: {0}")]
    Rejected(String),
    #[error("Invalid coininfo response: {0}")]
    InvalidResponse(String),
    #[error("Coin not found: {0}")]
    NotFound(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

impl From<validator::ValidationErrors> for ConfigError {
    fn from(err: validator::ValidationErrors) -> Self {
        let key = err
            .field_errors()
            .keys()
            .next()
            .map(|k| k.to_string())
            .unwrap_or_default();
        ConfigError::InvalidValue {
            key,
            message: err.to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    CoinInfo(#[from] CoinInfoError),
}

impl AppError {
    /// Caller-supplied data was rejected; resubmitting a corrected request can succeed.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }

    /// A downstream or server-side failure.
    pub fn is_internal(&self) -> bool {
        !self.is_invalid_argument()
    }
}
