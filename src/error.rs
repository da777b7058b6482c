use rust_decimal::Decimal;
use thiserror::Error;

/// Rejections raised when creating or updating stored entities.
///
/// These travel inside `anyhow::Error`; callers that care can
/// `downcast_ref::<ValidationError>()`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Amount must be greater than zero (got {0})")]
    NonPositiveAmount(Decimal),
    #[error("Amount must not be negative (got {0})")]
    NegativeAmount(Decimal),
    #[error("Category not found: {0}")]
    UnknownCategory(String),
    #[error("Category already exists: {0}")]
    DuplicateCategory(String),
    #[error("Category name must not be empty")]
    EmptyCategoryName,
    #[error("A budget already exists for category {0}")]
    DuplicateBudget(i64),
    #[error("Unsupported frequency: {0} (expected weekly, monthly or yearly)")]
    UnsupportedFrequency(String),
    #[error("Interval must be at least 1 (got {0})")]
    InvalidInterval(i64),
    #[error("Unknown transaction type: {0} (expected income or expense)")]
    UnknownKind(String),
}
