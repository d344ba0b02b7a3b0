//! # ucalc-linalg - Matrix products for uncertain arrays
//!
//! `matmul` follows the host convention for 1-D and 2-D operands: a 1-D
//! left operand is a row vector, a 1-D right operand is a column vector, and
//! the promoted axis is removed from the result.

pub mod error;

use ndarray::{ArrayD, ArrayView1, ArrayViewD, Axis, Ix2, IxDyn};
use ucalc_num::{ops, Number};

pub use error::{LinalgError, LinalgResult};

/// Sum of elementwise products. An empty sum is integer zero.
pub fn dot(lhs: ArrayView1<'_, Number>, rhs: ArrayView1<'_, Number>) -> LinalgResult<Number> {
    let mut acc: Option<Number> = None;
    for (a, b) in lhs.iter().zip(rhs.iter()) {
        let product = ops::multiply(a, b)?;
        acc = Some(match acc {
            None => product,
            Some(sum) => ops::add(&sum, &product)?,
        });
    }
    Ok(acc.unwrap_or(Number::Int(0)))
}

pub fn matmul(lhs: ArrayViewD<'_, Number>, rhs: ArrayViewD<'_, Number>) -> LinalgResult<ArrayD<Number>> {
    for (i, ndim) in [lhs.ndim(), rhs.ndim()].into_iter().enumerate() {
        match ndim {
            0 => return Err(LinalgError::ScalarOperand(i)),
            1 | 2 => {}
            n => return Err(LinalgError::Rank(n)),
        }
    }
    let (lhs_vector, rhs_vector) = (lhs.ndim() == 1, rhs.ndim() == 1);
    let a = (if lhs_vector { lhs.clone().insert_axis(Axis(0)) } else { lhs.clone() }).into_dimensionality::<Ix2>()?;
    let b = (if rhs_vector { rhs.clone().insert_axis(Axis(1)) } else { rhs.clone() }).into_dimensionality::<Ix2>()?;

    let ((m, k), (k2, p)) = (a.dim(), b.dim());
    if k != k2 {
        return Err(LinalgError::DimensionMismatch { lhs: lhs.shape().to_vec(), rhs: rhs.shape().to_vec() });
    }

    let mut data = Vec::with_capacity(m * p);
    for i in 0..m {
        for j in 0..p {
            data.push(dot(a.row(i), b.column(j))?);
        }
    }

    let shape: Vec<usize> = match (lhs_vector, rhs_vector) {
        (false, false) => vec![m, p],
        (true, false) => vec![p],
        (false, true) => vec![m],
        (true, true) => vec![],
    };
    Ok(ArrayD::from_shape_vec(IxDyn(&shape), data)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, arr2};
    use pretty_assertions::assert_eq;

    fn ints1(v: &[i64]) -> ArrayD<Number> { arr1(v).mapv(Number::Int).into_dyn() }
    fn ints2(v: &[[i64; 2]]) -> ArrayD<Number> { arr2(v).mapv(Number::Int).into_dyn() }

    #[test] fn test_vector_dot() { let r = matmul(ints1(&[1, 2, 3]).view(), ints1(&[4, 5, 6]).view()).unwrap(); assert_eq!(r.ndim(), 0); assert_eq!(r.first(), Some(&Number::Int(32))); }
    #[test] fn test_matrix_product() { let r = matmul(ints2(&[[1, 2], [3, 4]]).view(), ints2(&[[5, 6], [7, 8]]).view()).unwrap(); assert_eq!(r, ints2(&[[19, 22], [43, 50]])); }
    #[test] fn test_vector_matrix() { let r = matmul(ints1(&[1, 1]).view(), ints2(&[[1, 2], [3, 4]]).view()).unwrap(); assert_eq!(r, ints1(&[4, 6])); }
    #[test] fn test_matrix_vector() { let r = matmul(ints2(&[[1, 2], [3, 4]]).view(), ints1(&[1, 1]).view()).unwrap(); assert_eq!(r, ints1(&[3, 7])); }
    #[test] fn test_mismatch() { assert!(matches!(matmul(ints1(&[1, 2, 3]).view(), ints1(&[1, 2]).view()), Err(LinalgError::DimensionMismatch { .. }))); }
    #[test] fn test_scalar_operand() { let s = ArrayD::from_elem(IxDyn(&[]), Number::Int(2)); assert_eq!(matmul(s.view(), ints1(&[1]).view()), Err(LinalgError::ScalarOperand(0))); }
    #[test] fn test_views_with_unrelated_lifetimes() { fn product<'a, 'b>(a: ArrayViewD<'a, Number>, b: ArrayViewD<'b, Number>) -> LinalgResult<ArrayD<Number>> { matmul(a, b) } let m = ints2(&[[1, 0], [0, 1]]); let r = { let v = ints1(&[2, 3]); product(m.view(), v.view()).unwrap() }; assert_eq!(r, ints1(&[2, 3])); }
    #[test] fn test_empty_inner_dimension() { let e = ArrayD::<Number>::from_shape_vec(IxDyn(&[0]), vec![]).unwrap(); assert_eq!(matmul(e.view(), e.view()).unwrap().first(), Some(&Number::Int(0))); }
}
