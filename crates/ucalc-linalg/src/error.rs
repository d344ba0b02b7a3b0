//! Error handling for linear algebra

use ndarray::ShapeError;
use thiserror::Error;
use ucalc_num::NumError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LinalgError {
    #[error("matmul: operand {0} is 0-dimensional")]
    ScalarOperand(usize),
    #[error("matmul: {0}-dimensional operands are not supported")]
    Rank(usize),
    #[error("matmul: mismatch in core dimension, shapes {lhs:?} and {rhs:?}")]
    DimensionMismatch { lhs: Vec<usize>, rhs: Vec<usize> },
    #[error(transparent)]
    Shape(#[from] ShapeError),
    #[error(transparent)]
    Scalar(#[from] NumError),
}

pub type LinalgResult<T> = Result<T, LinalgError>;
