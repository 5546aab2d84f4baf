use thiserror::Error;

/// Errors produced by amount parsing and unit conversion.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UnitError {
    #[error("invalid amount {input:?}: {reason}")]
    InvalidAmount { input: String, reason: String },

    #[error("scale {scale} exceeds the maximum of {max} base-unit digits")]
    ScaleTooLarge { scale: u32, max: u32 },

    #[error("unknown unit: {0}")]
    UnknownUnit(String),
}

impl UnitError {
    pub(crate) fn invalid(input: &str, reason: impl Into<String>) -> Self {
        Self::InvalidAmount {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

pub type UnitResult<T> = Result<T, UnitError>;
