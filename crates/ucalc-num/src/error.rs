//! Error handling for scalar operations

use thiserror::Error;
use crate::number::Number;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NumError {
    #[error("Type error: expected {expected}, got {got}")]
    TypeError { expected: &'static str, got: &'static str },
    #[error("Type error: {0}")]
    TypeErrorMsg(String),
    #[error("Unsupported operation: {0}")]
    Unsupported(String),
    #[error("Arithmetic overflow: {0}")]
    Overflow(String),
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Domain error: {0}")]
    Domain(String),
}

pub type NumResult<T> = Result<T, NumError>;

impl NumError {
    pub fn type_error(expected: &'static str, got: &Number) -> Self {
        NumError::TypeError { expected, got: got.type_name() }
    }
    pub fn type_error_msg(msg: impl Into<String>) -> Self { NumError::TypeErrorMsg(msg.into()) }
    pub fn unsupported(what: impl Into<String>) -> Self { NumError::Unsupported(what.into()) }
    pub fn domain(msg: impl Into<String>) -> Self { NumError::Domain(msg.into()) }
}
