//! Shape broadcasting and operand coercion
//!
//! A binary operation takes at least one uncertain array. The other operand
//! may be a single number (filled out to the array's shape) or a foreign
//! sequence (treated as an array of objects). When the two shapes differ
//! they are broadcast to a common shape before any element is touched.

use ndarray::{Array1, ArrayD, ArrayViewD, CowArray, IxDyn};
use tracing::debug;
use ucalc_num::{Number, UncertainComplex, UncertainReal};

use crate::array::UncertainArray;
use crate::error::{ArrayError, ArrayResult};

/// An input to an elementwise operation.
#[derive(Debug, Clone)]
pub enum Operand<'a> {
    Array(&'a UncertainArray),
    Scalar(Number),
    Sequence(ArrayD<Number>),
}

impl Operand<'_> {
    pub fn is_array(&self) -> bool { matches!(self, Operand::Array(_)) }
}

impl<'a> From<&'a UncertainArray> for Operand<'a> {
    fn from(array: &'a UncertainArray) -> Self { Operand::Array(array) }
}

impl From<Number> for Operand<'_> {
    fn from(n: Number) -> Self { Operand::Scalar(n) }
}

impl From<&Number> for Operand<'_> {
    fn from(n: &Number) -> Self { Operand::Scalar(n.clone()) }
}

impl From<f64> for Operand<'_> { fn from(x: f64) -> Self { Operand::Scalar(Number::Real(x)) } }
impl From<i64> for Operand<'_> { fn from(n: i64) -> Self { Operand::Scalar(Number::Int(n)) } }
impl From<UncertainReal> for Operand<'_> { fn from(u: UncertainReal) -> Self { Operand::Scalar(Number::UReal(u)) } }
impl From<UncertainComplex> for Operand<'_> { fn from(u: UncertainComplex) -> Self { Operand::Scalar(Number::UComplex(u)) } }

impl From<ArrayD<Number>> for Operand<'_> {
    fn from(data: ArrayD<Number>) -> Self { Operand::Sequence(data) }
}

impl From<ArrayD<f64>> for Operand<'_> {
    fn from(data: ArrayD<f64>) -> Self { Operand::Sequence(data.mapv(Number::Real)) }
}

impl From<Vec<Number>> for Operand<'_> {
    fn from(elements: Vec<Number>) -> Self { Operand::Sequence(Array1::from_vec(elements).into_dyn()) }
}

impl From<Vec<f64>> for Operand<'_> {
    fn from(elements: Vec<f64>) -> Self { Operand::from(elements.into_iter().map(Number::Real).collect::<Vec<_>>()) }
}

/// Common shape of `lhs` and `rhs`: trailing axes are aligned and each pair
/// of sizes must be equal or contain a 1.
pub fn co_broadcast(lhs: &[usize], rhs: &[usize]) -> ArrayResult<Vec<usize>> {
    let rank = lhs.len().max(rhs.len());
    let (lhs_offset, rhs_offset) = (rank - lhs.len(), rank - rhs.len());
    let mut shape = Vec::with_capacity(rank);
    for i in 0..rank {
        let l = if i < lhs_offset { 1 } else { lhs[i - lhs_offset] };
        let r = if i < rhs_offset { 1 } else { rhs[i - rhs_offset] };
        let size = match (l, r) {
            (_, 1) => l,
            (1, _) => r,
            (a, b) if a == b => a,
            _ => return Err(ArrayError::incompatible_shape()),
        };
        shape.push(size);
    }
    Ok(shape)
}

/// Both operands of a binary operation as host arrays.
pub(crate) struct Coerced<'a> {
    lhs: CowArray<'a, Number, IxDyn>,
    rhs: CowArray<'a, Number, IxDyn>,
}

/// Operands viewed at their common shape.
pub(crate) struct Broadcast<'a> {
    pub shape: Vec<usize>,
    pub lhs: ArrayViewD<'a, Number>,
    pub rhs: ArrayViewD<'a, Number>,
}

fn as_array<'a>(operand: &'a Operand<'_>) -> Option<CowArray<'a, Number, IxDyn>> {
    match operand {
        Operand::Array(a) => Some(CowArray::from(a.view())),
        Operand::Sequence(s) => Some(CowArray::from(s.view())),
        Operand::Scalar(_) => None,
    }
}

impl<'a> Coerced<'a> {
    pub fn new(lhs: &'a Operand<'_>, rhs: &'a Operand<'_>) -> ArrayResult<Self> {
        if !lhs.is_array() && !rhs.is_array() {
            return Err(ArrayError::type_error("at least one input must be an uncertain array"));
        }
        let (lhs, rhs) = match (as_array(lhs), as_array(rhs)) {
            (Some(l), Some(r)) => (l, r),
            (Some(l), None) => {
                let fill = ArrayD::from_elem(l.raw_dim(), scalar_of(rhs)?);
                (l, CowArray::from(fill))
            }
            (None, Some(r)) => {
                let fill = ArrayD::from_elem(r.raw_dim(), scalar_of(lhs)?);
                (CowArray::from(fill), r)
            }
            (None, None) => return Err(ArrayError::internal("no array operand after coercion")),
        };
        Ok(Coerced { lhs, rhs })
    }

    pub fn broadcast(&self) -> ArrayResult<Broadcast<'_>> {
        if self.lhs.shape() == self.rhs.shape() {
            return Ok(Broadcast { shape: self.lhs.shape().to_vec(), lhs: self.lhs.view(), rhs: self.rhs.view() });
        }
        let shape = co_broadcast(self.lhs.shape(), self.rhs.shape())?;
        debug!("broadcasting {:?} and {:?} to {:?}", self.lhs.shape(), self.rhs.shape(), shape);
        let dim = IxDyn(&shape);
        let lhs = self.lhs.broadcast(dim.clone()).ok_or_else(ArrayError::incompatible_shape)?;
        let rhs = self.rhs.broadcast(dim).ok_or_else(ArrayError::incompatible_shape)?;
        Ok(Broadcast { shape, lhs, rhs })
    }
}

fn scalar_of(operand: &Operand<'_>) -> ArrayResult<Number> {
    match operand {
        Operand::Scalar(n) => Ok(n.clone()),
        _ => Err(ArrayError::internal("expected a scalar operand")),
    }
}
