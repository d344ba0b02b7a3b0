//! Elementwise dispatch
//!
//! [`array_ufunc`] is the single entry point for elementwise operations:
//! it looks the operation up in the handler table, coerces and broadcasts the
//! inputs, and applies the handler element by element. A 0-dimensional
//! operation skips the buffer and returns the bare scalar result.

use ndarray::{ArrayD, CowArray, IxDyn};
use tracing::{debug, trace, warn};
use ucalc_num::Number;

use crate::array::{Output, UncertainArray};
use crate::broadcast::{Coerced, Operand};
use crate::error::{ArrayError, ArrayResult};
use crate::materialize::fill;
use crate::ufunc::{CompareFn, Kernel, MapFn, Method, TestFn, Ufunc, UfuncOptions, ZipFn};

/// Apply `ufunc` as invoked by the host. Reductions, accumulations and the
/// other non-call methods are not implemented.
pub fn array_ufunc(ufunc: Ufunc, method: Method, inputs: &[Operand<'_>], options: &UfuncOptions) -> ArrayResult<Output> {
    let kernel = ufunc.kernel().ok_or_else(|| ArrayError::not_implemented(ufunc.name()))?;
    if method != Method::Call {
        return Err(ArrayError::not_implemented(format!("{}.{}", ufunc.name(), method)));
    }

    if !options.is_empty() {
        warn!("options {} are currently not supported by {}, ignoring them", options, ufunc.name());
    }

    if inputs.len() != ufunc.nin() {
        return Err(ArrayError::ArityMismatch { name: ufunc.name(), expected: ufunc.nin(), got: inputs.len() });
    }
    debug!("dispatching {} with {} input(s)", ufunc.name(), inputs.len());

    match (kernel, inputs) {
        (Kernel::Map(f), [input]) => map(array_input(input)?, f),
        (Kernel::Test(f), [input]) => test(array_input(input)?, f),
        (Kernel::Zip(f), [lhs, rhs]) => zip(lhs, rhs, f),
        (Kernel::Compare(f), [lhs, rhs]) => compare(lhs, rhs, f),
        (Kernel::Reject(msg), _) => Err(ArrayError::type_error(msg)),
        _ => Err(ArrayError::internal(format!("handler for {} does not take {} input(s)", ufunc.name(), inputs.len()))),
    }
}

fn array_input<'a>(input: &'a Operand<'_>) -> ArrayResult<&'a UncertainArray> {
    match input {
        Operand::Array(a) => Ok(*a),
        _ => Err(ArrayError::type_error("a unary operation requires an uncertain array")),
    }
}

fn map(array: &UncertainArray, f: MapFn) -> ArrayResult<Output> {
    if let Some(x) = array.item() {
        trace!("0-d short-circuit");
        return Ok(Output::Scalar(f(x)?));
    }
    let data = fill(array.shape(), array.iter(), |x| Ok(f(x)?))?;
    Ok(Output::Array(UncertainArray::new(data)))
}

fn test(array: &UncertainArray, f: TestFn) -> ArrayResult<Output> {
    if let Some(x) = array.item() {
        trace!("0-d short-circuit");
        return Ok(Output::Bool(f(x)?));
    }
    Ok(Output::Mask(fill(array.shape(), array.iter(), |x| Ok(f(x)?))?))
}

pub(crate) enum Applied<T> {
    Scalar(T),
    Array(ArrayD<T>),
}

/// Apply `f` to each broadcast pair. A 0-dimensional broadcast shape
/// returns `f(x, y)` directly.
pub(crate) fn pairwise<T>(lhs: &Operand<'_>, rhs: &Operand<'_>, f: impl Fn(&Number, &Number) -> ArrayResult<T>) -> ArrayResult<Applied<T>> {
    let coerced = Coerced::new(lhs, rhs)?;
    let b = coerced.broadcast()?;
    if b.shape.is_empty() {
        trace!("0-d short-circuit");
        let (x, y) = b.lhs.first().zip(b.rhs.first()).ok_or_else(|| ArrayError::internal("empty 0-d operand"))?;
        return Ok(Applied::Scalar(f(x, y)?));
    }
    Ok(Applied::Array(fill(&b.shape, b.lhs.iter().zip(b.rhs.iter()), |(x, y)| f(x, y))?))
}

fn zip(lhs: &Operand<'_>, rhs: &Operand<'_>, f: ZipFn) -> ArrayResult<Output> {
    Ok(match pairwise(lhs, rhs, |x, y| Ok(f(x, y)?))? {
        Applied::Scalar(n) => Output::Scalar(n),
        Applied::Array(data) => Output::Array(UncertainArray::new(data)),
    })
}

fn compare(lhs: &Operand<'_>, rhs: &Operand<'_>, f: CompareFn) -> ArrayResult<Output> {
    Ok(match pairwise(lhs, rhs, |x, y| Ok(f(x, y)?))? {
        Applied::Scalar(b) => Output::Bool(b),
        Applied::Array(mask) => Output::Mask(mask),
    })
}

macro_rules! unary_ufuncs {
    ($($(#[$doc:meta])* $method:ident => $ufunc:ident),* $(,)?) => {
        $(
            $(#[$doc])*
            pub fn $method(&self) -> ArrayResult<Output> {
                array_ufunc(Ufunc::$ufunc, Method::Call, &[Operand::Array(self)], &UfuncOptions::default())
            }
        )*
    };
}

macro_rules! binary_ufuncs {
    ($($(#[$doc:meta])* $method:ident => $ufunc:ident),* $(,)?) => {
        $(
            $(#[$doc])*
            pub fn $method<'a>(&'a self, other: impl Into<Operand<'a>>) -> ArrayResult<Output> {
                array_ufunc(Ufunc::$ufunc, Method::Call, &[Operand::Array(self), other.into()], &UfuncOptions::default())
            }
        )*
    };
}

impl UncertainArray {
    unary_ufuncs! {
        negative => Negative,
        positive => Positive,
        conjugate => Conjugate,
        absolute => Absolute,
        reciprocal => Reciprocal,
        /// Squared magnitude of each element.
        square => Square,
        exp => Exp,
        log => Log,
        log10 => Log10,
        sqrt => Sqrt,
        sin => Sin,
        cos => Cos,
        tan => Tan,
        arcsin => Arcsin,
        arccos => Arccos,
        arctan => Arctan,
        sinh => Sinh,
        cosh => Cosh,
        tanh => Tanh,
        arcsinh => Arcsinh,
        arccosh => Arccosh,
        arctanh => Arctanh,
        isnan => Isnan,
        isinf => Isinf,
        isfinite => Isfinite,
        logical_not => LogicalNot,
    }

    binary_ufuncs! {
        add => Add,
        subtract => Subtract,
        multiply => Multiply,
        divide => TrueDivide,
        power => Power,
        arctan2 => Arctan2,
        /// Elementwise maximum; a NaN element never wins.
        maximum => Maximum,
        /// Elementwise minimum; a NaN element never wins.
        minimum => Minimum,
        equal => Equal,
        not_equal => NotEqual,
        less => Less,
        less_equal => LessEqual,
        greater => Greater,
        greater_equal => GreaterEqual,
        logical_and => LogicalAnd,
        logical_or => LogicalOr,
        logical_xor => LogicalXor,
    }

    /// `other - self`
    pub fn rsub<'a>(&'a self, other: impl Into<Operand<'a>>) -> ArrayResult<Output> {
        array_ufunc(Ufunc::Subtract, Method::Call, &[other.into(), Operand::Array(self)], &UfuncOptions::default())
    }

    /// `other / self`
    pub fn rdiv<'a>(&'a self, other: impl Into<Operand<'a>>) -> ArrayResult<Output> {
        array_ufunc(Ufunc::TrueDivide, Method::Call, &[other.into(), Operand::Array(self)], &UfuncOptions::default())
    }

    /// `other ** self`
    pub fn rpow<'a>(&'a self, other: impl Into<Operand<'a>>) -> ArrayResult<Output> {
        array_ufunc(Ufunc::Power, Method::Call, &[other.into(), Operand::Array(self)], &UfuncOptions::default())
    }

    /// Matrix product `self @ other`.
    pub fn matmul<'a>(&'a self, other: impl Into<Operand<'a>>) -> ArrayResult<Output> {
        let other = other.into();
        product(Operand::Array(self), other)
    }

    /// Matrix product `other @ self`.
    pub fn rmatmul<'a>(&'a self, other: impl Into<Operand<'a>>) -> ArrayResult<Output> {
        let other = other.into();
        product(other, Operand::Array(self))
    }
}

fn matrix_view<'a>(operand: &'a Operand<'_>) -> ArrayResult<CowArray<'a, Number, IxDyn>> {
    match operand {
        Operand::Array(a) => Ok(CowArray::from(a.view())),
        Operand::Sequence(s) => Ok(CowArray::from(s.view())),
        Operand::Scalar(_) => Err(ArrayError::type_error("matmul: input operand does not have enough dimensions")),
    }
}

fn product(lhs: Operand<'_>, rhs: Operand<'_>) -> ArrayResult<Output> {
    let (a, b) = (matrix_view(&lhs)?, matrix_view(&rhs)?);
    debug!("matmul {:?} @ {:?}", a.shape(), b.shape());
    let data = ucalc_linalg::matmul(a.view(), b.view())?;
    if data.ndim() == 0 {
        let x = data.first().cloned().ok_or_else(|| ArrayError::internal("empty 0-d product"))?;
        return Ok(Output::Scalar(x));
    }
    Ok(Output::Array(UncertainArray::new(data)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use ucalc_num::ureal;

    fn ints(v: &[i64]) -> UncertainArray { UncertainArray::from_vec(v.iter().copied().map(Number::Int).collect()) }
    fn reals(v: &[f64]) -> UncertainArray { UncertainArray::from_vec(v.iter().copied().map(Number::Real).collect()) }
    fn call(ufunc: Ufunc, inputs: &[Operand<'_>]) -> ArrayResult<Output> { array_ufunc(ufunc, Method::Call, inputs, &UfuncOptions::default()) }

    #[test] fn test_unregistered_is_not_implemented() { let a = ints(&[1]); assert_eq!(call(Ufunc::Floor, &[Operand::from(&a)]), Err(ArrayError::NotImplemented("floor".into()))); }
    #[test] fn test_matmul_ufunc_is_not_implemented() { let a = ints(&[1]); assert!(matches!(call(Ufunc::Matmul, &[Operand::from(&a), Operand::from(&a)]), Err(ArrayError::NotImplemented(_)))); }
    #[test] fn test_reduce_method_is_not_implemented() { let a = ints(&[1, 2]); assert_eq!(array_ufunc(Ufunc::Add, Method::Reduce, &[Operand::from(&a)], &UfuncOptions::default()), Err(ArrayError::NotImplemented("add.reduce".into()))); }
    #[test] fn test_non_call_of_unregistered_names_ufunc() { let a = ints(&[1]); assert_eq!(array_ufunc(Ufunc::Floor, Method::Accumulate, &[Operand::from(&a)], &UfuncOptions::default()), Err(ArrayError::NotImplemented("floor".into()))); }
    #[test] fn test_logical_xor_rejected() { let a = ints(&[1]); assert_eq!(a.logical_xor(&a), Err(ArrayError::TypeError("Boolean bitwise operations are not defined".into()))); }
    #[test] fn test_arity_mismatch() { let a = ints(&[1]); assert!(matches!(call(Ufunc::Add, &[Operand::from(&a)]), Err(ArrayError::ArityMismatch { expected: 2, got: 1, .. }))); }
    #[test] fn test_unary_requires_array() { assert!(matches!(call(Ufunc::Negative, &[Operand::from(1.0)]), Err(ArrayError::TypeError(_)))); }
    #[test] fn test_negative() { assert_eq!(ints(&[1, -2]).negative().unwrap().into_array(), Some(ints(&[-1, 2]))); }
    #[test] fn test_add_scalar() { assert_eq!(ints(&[1, 2]).add(10i64).unwrap().into_array(), Some(ints(&[11, 12]))); }
    #[test] fn test_rsub() { assert_eq!(ints(&[1, 2]).rsub(10i64).unwrap().into_array(), Some(ints(&[9, 8]))); }
    #[test] fn test_rdiv() { assert_eq!(reals(&[2.0, 4.0]).rdiv(1.0).unwrap().into_array(), Some(reals(&[0.5, 0.25]))); }
    #[test] fn test_rpow() { assert_eq!(ints(&[1, 2]).rpow(2i64).unwrap().into_array(), Some(ints(&[2, 4]))); }
    #[test] fn test_add_sequence() { assert_eq!(ints(&[1, 2]).add(vec![1.5, 2.5]).unwrap().into_array(), Some(reals(&[2.5, 4.5]))); }
    #[test] fn test_shape_mismatch() { assert!(matches!(ints(&[1, 2]).add(&ints(&[1, 2, 3])), Err(ArrayError::Shape(_)))); }
    #[test] fn test_compare_gives_mask() { let m = ints(&[1, 2, 3]).less(2i64).unwrap().into_mask().unwrap(); assert_eq!(m.iter().copied().collect::<Vec<_>>(), vec![true, false, false]); }
    #[test] fn test_isnan_mask() { let m = reals(&[1.0, f64::NAN]).isnan().unwrap().into_mask().unwrap(); assert_eq!(m.iter().copied().collect::<Vec<_>>(), vec![false, true]); }
    #[test] fn test_zero_dim_unary_is_bare() { let a = UncertainArray::scalar(Number::Int(3)); assert_eq!(a.negative().unwrap(), Output::Scalar(Number::Int(-3))); }
    #[test] fn test_zero_dim_binary_is_bare() { let a = UncertainArray::scalar(Number::Int(3)); assert_eq!(a.add(&a).unwrap(), Output::Scalar(Number::Int(6))); }
    #[test] fn test_zero_dim_predicate_is_bare() { let a = UncertainArray::scalar(Number::Real(f64::INFINITY)); assert_eq!(a.isfinite().unwrap(), Output::Bool(false)); assert_eq!(a.isinf().unwrap(), Output::Bool(true)); }
    #[test] fn test_zero_dim_isfinite_true() { assert_eq!(UncertainArray::scalar(Number::Real(1.0)).isfinite().unwrap(), Output::Bool(true)); }
    #[test] fn test_zero_dim_against_vector_broadcasts() { let a = UncertainArray::scalar(Number::Int(1)); assert_eq!(a.add(&ints(&[1, 2])).unwrap().into_array(), Some(ints(&[2, 3]))); }
    #[test] fn test_result_has_no_label() { let a = ints(&[1]).with_label("a"); assert_eq!(a.positive().unwrap().into_array().unwrap().label(), None); }
    #[test] fn test_matmul_vectors_bare() { assert_eq!(ints(&[1, 2]).matmul(&ints(&[3, 4])).unwrap(), Output::Scalar(Number::Int(11))); }
    #[test] fn test_matmul_scalar_rejected() { assert!(matches!(ints(&[1, 2]).matmul(2i64), Err(ArrayError::TypeError(_)))); }

    #[test]
    fn test_rmatmul_order() {
        let m = UncertainArray::from_shape_vec(&[2, 2], [1, 2, 3, 4].map(Number::Int).to_vec()).unwrap();
        let v = ints(&[1, 0]);
        assert_eq!(m.rmatmul(&v).unwrap().into_array(), Some(ints(&[1, 2])));
        assert_eq!(m.matmul(&v).unwrap().into_array(), Some(ints(&[1, 3])));
    }

    #[test]
    fn test_uncertain_addition_broadcast() {
        let a = UncertainArray::from_vec(vec![ureal(1.0, 0.3).unwrap(), ureal(2.0, 0.4).unwrap()]);
        let s = a.add(&ints(&[10, 20])).unwrap().into_array().unwrap();
        assert_eq!(s.value().unwrap().array().unwrap(), reals(&[11.0, 22.0]));
    }
}
