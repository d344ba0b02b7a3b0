//! Error handling for array operations

use ndarray::{ErrorKind, ShapeError};
use thiserror::Error;
use ucalc_linalg::LinalgError;
use ucalc_num::NumError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ArrayError {
    #[error("The {0} function has not been implemented")]
    NotImplemented(String),
    #[error("Shape error: {0}")]
    Shape(#[from] ShapeError),
    #[error("Type error: {0}")]
    TypeError(String),
    #[error("{name} takes {expected} input(s), got {got}")]
    ArityMismatch { name: &'static str, expected: usize, got: usize },
    #[error("axis {axis} is out of bounds for array of dimension {ndim}")]
    AxisOutOfBounds { axis: usize, ndim: usize },
    #[error("Value error: {0}")]
    ValueError(String),
    #[error("Internal error: {0}")]
    Internal(String),
    #[error(transparent)]
    Scalar(#[from] NumError),
    #[error(transparent)]
    Linalg(#[from] LinalgError),
}

pub type ArrayResult<T> = Result<T, ArrayError>;

impl ArrayError {
    pub fn not_implemented(name: impl Into<String>) -> Self { ArrayError::NotImplemented(name.into()) }
    pub fn type_error(msg: impl Into<String>) -> Self { ArrayError::TypeError(msg.into()) }
    pub fn value_error(msg: impl Into<String>) -> Self { ArrayError::ValueError(msg.into()) }
    pub fn internal(msg: impl Into<String>) -> Self { ArrayError::Internal(msg.into()) }
    pub fn incompatible_shape() -> Self { ArrayError::Shape(ShapeError::from_kind(ErrorKind::IncompatibleShape)) }
}
