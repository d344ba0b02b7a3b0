//! Reductions
//!
//! Reductions run over the flattened array (`axis = None`) or along one
//! axis. A result that keeps a non-empty shape is wrapped in a new array;
//! a fully reduced result is returned bare.

use ndarray::{ArrayD, Axis, IxDyn};
use tracing::trace;
use ucalc_num::{ops, Element, NumResult, Number};

use crate::array::{Outcome, UncertainArray};
use crate::error::{ArrayError, ArrayResult};
use crate::materialize::fill;

type Fold = fn(&Number, &Number) -> NumResult<Number>;

// ============ Folds ============

fn fold<'a>(elements: &mut dyn Iterator<Item = &'a Number>, op: Fold, empty: Number) -> ArrayResult<Number> {
    let Some(first) = elements.next() else { return Ok(empty) };
    let mut acc = first.clone();
    for x in elements {
        acc = op(&acc, x)?;
    }
    Ok(acc)
}

fn sum_of<'a>(elements: &mut dyn Iterator<Item = &'a Number>) -> ArrayResult<Number> { fold(elements, ops::add, Number::Int(0)) }
fn prod_of<'a>(elements: &mut dyn Iterator<Item = &'a Number>) -> ArrayResult<Number> { fold(elements, ops::multiply, Number::Int(1)) }

fn mean_of<'a>(elements: &mut dyn Iterator<Item = &'a Number>) -> ArrayResult<Number> {
    let mut count = 0i64;
    let total = sum_of(&mut elements.inspect(|_| count += 1))?;
    if count == 0 {
        return Ok(Number::Real(f64::NAN));
    }
    Ok(ops::divide(&total, &Number::Int(count))?)
}

/// The element no later element beats; ties keep the earliest. The first NaN
/// wherever it sits is the result.
fn extreme_of<'a>(elements: &mut dyn Iterator<Item = &'a Number>, name: &str, better: fn(&Number, &Number) -> NumResult<bool>) -> ArrayResult<Number> {
    let mut best = elements.next()
        .ok_or_else(|| ArrayError::value_error(format!("zero-size array to reduction operation {} which has no identity", name)))?;
    if best.is_nan() {
        return Ok(best.clone());
    }
    for x in elements {
        if x.is_nan() {
            return Ok(x.clone());
        }
        if better(x, best)? {
            best = x;
        }
    }
    Ok(best.clone())
}

fn max_of<'a>(elements: &mut dyn Iterator<Item = &'a Number>) -> ArrayResult<Number> { extreme_of(elements, "maximum", ops::greater) }
fn min_of<'a>(elements: &mut dyn Iterator<Item = &'a Number>) -> ArrayResult<Number> { extreme_of(elements, "minimum", ops::less) }

fn ptp_of<'a>(elements: &mut dyn Iterator<Item = &'a Number>) -> ArrayResult<Number> {
    let elements: Vec<&Number> = elements.collect();
    let hi = max_of(&mut elements.iter().copied())?;
    let lo = min_of(&mut elements.iter().copied())?;
    Ok(ops::subtract(&hi, &lo)?)
}

impl UncertainArray {
    fn reduce<T, F>(&self, name: &str, axis: Option<usize>, f: F) -> ArrayResult<Outcome<T>>
    where
        T: Element,
        F: for<'a> Fn(&mut dyn Iterator<Item = &'a Number>) -> ArrayResult<T>,
    {
        trace!("{} over axis {:?} of shape {:?}", name, axis, self.shape());
        let Some(axis) = axis else {
            return Ok(Outcome::Scalar(f(&mut self.iter())?));
        };
        self.check_axis(axis)?;
        let lanes = self.data().map_axis(Axis(axis), |lane| f(&mut lane.iter()));
        let shape = lanes.raw_dim();
        let elements = lanes.iter().cloned().collect::<ArrayResult<Vec<T>>>()?;
        Outcome::from_data(ArrayD::from_shape_vec(shape, elements)?)
    }

    fn check_axis(&self, axis: usize) -> ArrayResult<()> {
        if axis >= self.ndim() {
            return Err(ArrayError::AxisOutOfBounds { axis, ndim: self.ndim() });
        }
        Ok(())
    }

    // ============ Reductions ============

    pub fn sum(&self, axis: Option<usize>) -> ArrayResult<Outcome> { self.reduce("sum", axis, sum_of) }
    pub fn prod(&self, axis: Option<usize>) -> ArrayResult<Outcome> { self.reduce("prod", axis, prod_of) }
    /// Arithmetic mean; an empty reduction is NaN.
    pub fn mean(&self, axis: Option<usize>) -> ArrayResult<Outcome> { self.reduce("mean", axis, mean_of) }
    pub fn max(&self, axis: Option<usize>) -> ArrayResult<Outcome> { self.reduce("max", axis, max_of) }
    pub fn min(&self, axis: Option<usize>) -> ArrayResult<Outcome> { self.reduce("min", axis, min_of) }
    /// Peak to peak: `max - min`.
    pub fn ptp(&self, axis: Option<usize>) -> ArrayResult<Outcome> { self.reduce("ptp", axis, ptp_of) }

    pub fn any(&self, axis: Option<usize>) -> ArrayResult<Outcome<bool>> {
        self.reduce("any", axis, |elements| Ok(elements.filter(|n| n.truthy()).next().is_some()))
    }

    pub fn all(&self, axis: Option<usize>) -> ArrayResult<Outcome<bool>> {
        self.reduce("all", axis, |elements| Ok(elements.filter(|n| !n.truthy()).next().is_none()))
    }

    pub fn std(&self) -> ArrayResult<Outcome> {
        Err(ArrayError::type_error("`std` is not defined for `UncertainArray`"))
    }

    pub fn var(&self) -> ArrayResult<Outcome> {
        Err(ArrayError::type_error("`var` is not defined for `UncertainArray`"))
    }

    // ============ Accumulations ============

    pub fn cumsum(&self, axis: Option<usize>) -> ArrayResult<Outcome> { self.accumulate("cumsum", axis, ops::add) }
    pub fn cumprod(&self, axis: Option<usize>) -> ArrayResult<Outcome> { self.accumulate("cumprod", axis, ops::multiply) }

    /// Running fold along `axis`. Without an axis the array is flattened
    /// first, so the result is 1-dimensional.
    fn accumulate(&self, name: &str, axis: Option<usize>, op: Fold) -> ArrayResult<Outcome> {
        trace!("{} over axis {:?} of shape {:?}", name, axis, self.shape());
        let (mut data, axis) = match axis {
            None => (ArrayD::from_shape_vec(IxDyn(&[self.len()]), self.iter().cloned().collect())?, 0),
            Some(axis) => {
                self.check_axis(axis)?;
                (self.data().clone(), axis)
            }
        };
        for mut lane in data.lanes_mut(Axis(axis)) {
            let mut acc: Option<Number> = None;
            for x in lane.iter_mut() {
                let next = match &acc {
                    None => x.clone(),
                    Some(a) => op(a, x)?,
                };
                *x = next.clone();
                acc = Some(next);
            }
        }
        Outcome::from_data(data)
    }

    /// Sum along the diagonal at `offset` over the first two axes. The
    /// remaining axes are kept.
    pub fn trace(&self, offset: isize) -> ArrayResult<Outcome> {
        if self.ndim() < 2 {
            return Err(ArrayError::value_error("diag requires an array of at least two dimensions"));
        }
        trace!("trace at offset {} of shape {:?}", offset, self.shape());
        let (rows, cols) = (self.shape()[0], self.shape()[1]);
        let (r0, c0) = if offset >= 0 { (0, offset.unsigned_abs()) } else { (offset.unsigned_abs(), 0) };
        let len = rows.saturating_sub(r0).min(cols.saturating_sub(c0));
        let rest = &self.shape()[2..];

        let mut total = ArrayD::from_elem(IxDyn(rest), Number::Int(0));
        for i in 0..len {
            let entry = self.view().index_axis_move(Axis(0), r0 + i).index_axis_move(Axis(0), c0 + i);
            total = if i == 0 {
                entry.to_owned()
            } else {
                fill(rest, total.iter().zip(entry.iter()), |(a, b)| Ok(ops::add(a, b)?))?
            };
        }
        Outcome::from_data(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ints(shape: &[usize], v: &[i64]) -> UncertainArray { UncertainArray::from_shape_vec(shape, v.iter().copied().map(Number::Int).collect()).unwrap() }
    fn flat(o: Outcome) -> Vec<Number> { o.into_array().iter().cloned().collect() }

    #[test] fn test_sum() { assert_eq!(ints(&[3], &[1, 2, 3]).sum(None), Ok(Outcome::Scalar(Number::Int(6)))); }
    #[test] fn test_sum_empty() { assert_eq!(ints(&[0], &[]).sum(None), Ok(Outcome::Scalar(Number::Int(0)))); }
    #[test] fn test_prod_empty() { assert_eq!(ints(&[0], &[]).prod(None), Ok(Outcome::Scalar(Number::Int(1)))); }
    #[test] fn test_mean() { assert_eq!(ints(&[3], &[1, 2, 3]).mean(None), Ok(Outcome::Scalar(Number::Real(2.0)))); }
    #[test] fn test_mean_empty_is_nan() { assert!(ints(&[0], &[]).mean(None).unwrap().scalar().unwrap().is_nan()); }
    #[test] fn test_max_min() { let a = ints(&[4], &[3, 9, -1, 9]); assert_eq!(a.max(None), Ok(Outcome::Scalar(Number::Int(9)))); assert_eq!(a.min(None), Ok(Outcome::Scalar(Number::Int(-1)))); }
    #[test] fn test_max_min_nan_anywhere() { for v in [[f64::NAN, 1.0, 2.0], [1.0, f64::NAN, 2.0], [1.0, 2.0, f64::NAN]] { let a = UncertainArray::from_vec(v.map(Number::Real).to_vec()); assert!(a.max(None).unwrap().scalar().unwrap().is_nan()); assert!(a.min(None).unwrap().scalar().unwrap().is_nan()); } }
    #[test] fn test_max_empty() { assert!(matches!(ints(&[0], &[]).max(None), Err(ArrayError::ValueError(_)))); }
    #[test] fn test_ptp() { assert_eq!(ints(&[3], &[4, 1, 7]).ptp(None), Ok(Outcome::Scalar(Number::Int(6)))); }
    #[test] fn test_any_all() { let a = ints(&[3], &[0, 1, 2]); assert_eq!(a.any(None), Ok(Outcome::Scalar(true))); assert_eq!(a.all(None), Ok(Outcome::Scalar(false))); }
    #[test] fn test_any_all_empty() { let a = ints(&[0], &[]); assert_eq!(a.any(None), Ok(Outcome::Scalar(false))); assert_eq!(a.all(None), Ok(Outcome::Scalar(true))); }
    #[test] fn test_sum_axis0() { assert_eq!(flat(ints(&[2, 3], &[1, 2, 3, 4, 5, 6]).sum(Some(0)).unwrap()), [5, 7, 9].map(Number::Int).to_vec()); }
    #[test] fn test_sum_axis1() { assert_eq!(flat(ints(&[2, 3], &[1, 2, 3, 4, 5, 6]).sum(Some(1)).unwrap()), [6, 15].map(Number::Int).to_vec()); }
    #[test] fn test_axis_out_of_bounds() { assert_eq!(ints(&[2], &[1, 2]).sum(Some(1)), Err(ArrayError::AxisOutOfBounds { axis: 1, ndim: 1 })); }
    #[test] fn test_reduce_vector_on_axis_is_bare() { assert_eq!(ints(&[2], &[1, 2]).sum(Some(0)), Ok(Outcome::Scalar(Number::Int(3)))); }
    #[test] fn test_std_var_rejected() { let a = ints(&[1], &[1]); assert!(matches!(a.std(), Err(ArrayError::TypeError(_)))); assert!(matches!(a.var(), Err(ArrayError::TypeError(_)))); }
    #[test] fn test_cumsum_flat() { let o = ints(&[2, 2], &[1, 2, 3, 4]).cumsum(None).unwrap(); assert_eq!(o.clone().into_array().shape(), &[4]); assert_eq!(flat(o), [1, 3, 6, 10].map(Number::Int).to_vec()); }
    #[test] fn test_cumprod_axis1() { assert_eq!(flat(ints(&[2, 2], &[1, 2, 3, 4]).cumprod(Some(1)).unwrap()), [1, 2, 3, 12].map(Number::Int).to_vec()); }
    #[test] fn test_cumsum_axis0() { assert_eq!(flat(ints(&[2, 2], &[1, 2, 3, 4]).cumsum(Some(0)).unwrap()), [1, 2, 4, 6].map(Number::Int).to_vec()); }
    #[test] fn test_trace() { assert_eq!(ints(&[3, 3], &[1, 2, 3, 4, 5, 6, 7, 8, 9]).trace(0), Ok(Outcome::Scalar(Number::Int(15)))); }
    #[test] fn test_trace_offsets() { let a = ints(&[3, 3], &[1, 2, 3, 4, 5, 6, 7, 8, 9]); assert_eq!(a.trace(1), Ok(Outcome::Scalar(Number::Int(8)))); assert_eq!(a.trace(-1), Ok(Outcome::Scalar(Number::Int(12)))); }
    #[test] fn test_trace_out_of_range_is_zero() { assert_eq!(ints(&[2, 2], &[1, 2, 3, 4]).trace(5), Ok(Outcome::Scalar(Number::Int(0)))); }
    #[test] fn test_trace_requires_2d() { assert!(matches!(ints(&[2], &[1, 2]).trace(0), Err(ArrayError::ValueError(_)))); }
    #[test] fn test_trace_keeps_trailing_axes() { assert_eq!(flat(ints(&[2, 2, 2], &[1, 2, 3, 4, 5, 6, 7, 8]).trace(0).unwrap()), [8, 10].map(Number::Int).to_vec()); }
}
