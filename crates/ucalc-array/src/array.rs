//! The uncertain array container

use std::fmt;

use ndarray::{Array1, ArrayD, ArrayViewD, IxDyn};
use num_complex::Complex64;
use ucalc_num::{Element, ElementKind, Number};

use crate::error::{ArrayError, ArrayResult};

/// N-dimensional array whose elements are plain or uncertain numbers.
///
/// Arrays are never mutated once built: every operation returns a new array.
/// The label belongs to the array it was given to and is only carried over
/// by [`UncertainArray::copy`].
#[derive(Debug, Clone, PartialEq)]
pub struct UncertainArray<T: Element = Number> {
    data: ArrayD<T>,
    kind: ElementKind,
    label: Option<String>,
}

impl<T: Element> UncertainArray<T> {
    pub fn new(data: ArrayD<T>) -> Self {
        UncertainArray { data, kind: T::KIND, label: None }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn from_vec(elements: Vec<T>) -> Self {
        UncertainArray::new(Array1::from_vec(elements).into_dyn())
    }

    pub fn from_shape_vec(shape: &[usize], elements: Vec<T>) -> ArrayResult<Self> {
        Ok(UncertainArray::new(ArrayD::from_shape_vec(IxDyn(shape), elements)?))
    }

    pub fn from_elem(shape: &[usize], element: T) -> Self {
        UncertainArray::new(ArrayD::from_elem(IxDyn(shape), element))
    }

    /// A 0-dimensional array holding `element`.
    pub fn scalar(element: T) -> Self { UncertainArray::from_elem(&[], element) }

    pub fn shape(&self) -> &[usize] { self.data.shape() }
    pub fn ndim(&self) -> usize { self.data.ndim() }
    pub fn len(&self) -> usize { self.data.len() }
    pub fn is_empty(&self) -> bool { self.data.is_empty() }
    pub fn label(&self) -> Option<&str> { self.label.as_deref() }
    pub fn kind(&self) -> ElementKind { self.kind }
    pub fn data(&self) -> &ArrayD<T> { &self.data }
    pub fn view(&self) -> ArrayViewD<'_, T> { self.data.view() }
    pub fn into_data(self) -> ArrayD<T> { self.data }
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ { self.data.iter() }

    /// The sole element of a 0-dimensional array.
    pub fn item(&self) -> Option<&T> {
        if self.data.ndim() == 0 { self.data.first() } else { None }
    }

    /// A copy with identical elements and the same label.
    pub fn copy(&self) -> Self { self.clone() }
}

impl UncertainArray<Number> {
    /// Build an array from host data. With a kind hint every element is
    /// converted to that kind; without one the array holds objects.
    pub fn from_array(data: ArrayD<Number>, kind: Option<ElementKind>, label: Option<&str>) -> ArrayResult<Self> {
        let kind = kind.unwrap_or_default();
        let data = if kind == ElementKind::Object {
            data
        } else {
            let shape = data.raw_dim();
            let elements = data.iter().map(|n| kind.coerce(n)).collect::<Result<Vec<_>, _>>()?;
            ArrayD::from_shape_vec(shape, elements)?
        };
        Ok(UncertainArray { data, kind, label: label.map(str::to_string) })
    }

    fn from_typed<T: Element>(data: ArrayD<T>, kind: ElementKind, f: impl Fn(T) -> Number) -> Self {
        UncertainArray { data: data.mapv(f), kind, label: None }
    }
}

impl From<ArrayD<Number>> for UncertainArray<Number> {
    fn from(data: ArrayD<Number>) -> Self { UncertainArray::new(data) }
}

impl From<Vec<Number>> for UncertainArray<Number> {
    fn from(elements: Vec<Number>) -> Self { UncertainArray::from_vec(elements) }
}

impl From<ArrayD<f64>> for UncertainArray<Number> {
    fn from(data: ArrayD<f64>) -> Self { UncertainArray::from_typed(data, ElementKind::Float, Number::Real) }
}

impl From<ArrayD<i64>> for UncertainArray<Number> {
    fn from(data: ArrayD<i64>) -> Self { UncertainArray::from_typed(data, ElementKind::Int, Number::Int) }
}

impl From<ArrayD<bool>> for UncertainArray<Number> {
    fn from(data: ArrayD<bool>) -> Self { UncertainArray::from_typed(data, ElementKind::Bool, Number::Bool) }
}

impl From<ArrayD<Complex64>> for UncertainArray<Number> {
    fn from(data: ArrayD<Complex64>) -> Self { UncertainArray::from_typed(data, ElementKind::Complex, Number::Complex) }
}

impl<T: Element> fmt::Display for UncertainArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "uarray({})", self.data)
    }
}

/// Result of an accessor or reduction: a bare element when the result is
/// 0-dimensional, otherwise a new array.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T: Element = Number> {
    Scalar(T),
    Array(UncertainArray<T>),
}

impl<T: Element> Outcome<T> {
    pub(crate) fn from_data(data: ArrayD<T>) -> ArrayResult<Self> {
        if data.ndim() == 0 {
            let element = data.first().cloned().ok_or_else(|| ArrayError::internal("0-dimensional array without an element"))?;
            return Ok(Outcome::Scalar(element));
        }
        Ok(Outcome::Array(UncertainArray::new(data)))
    }

    pub fn is_scalar(&self) -> bool { matches!(self, Outcome::Scalar(_)) }
    pub fn scalar(self) -> Option<T> { match self { Outcome::Scalar(x) => Some(x), Outcome::Array(_) => None } }
    pub fn array(self) -> Option<UncertainArray<T>> { match self { Outcome::Array(a) => Some(a), Outcome::Scalar(_) => None } }

    /// The result as an array, wrapping a bare element as 0-dimensional.
    pub fn into_array(self) -> UncertainArray<T> {
        match self {
            Outcome::Scalar(x) => UncertainArray::scalar(x),
            Outcome::Array(a) => a,
        }
    }
}

/// Result of dispatching an elementwise operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Scalar(Number),
    Bool(bool),
    Array(UncertainArray),
    Mask(ArrayD<bool>),
}

impl Output {
    pub fn into_scalar(self) -> Option<Number> { match self { Output::Scalar(n) => Some(n), _ => None } }
    pub fn into_bool(self) -> Option<bool> { match self { Output::Bool(b) => Some(b), _ => None } }
    pub fn into_array(self) -> Option<UncertainArray> { match self { Output::Array(a) => Some(a), _ => None } }
    pub fn into_mask(self) -> Option<ArrayD<bool>> { match self { Output::Mask(m) => Some(m), _ => None } }

    pub fn shape(&self) -> &[usize] {
        match self {
            Output::Scalar(_) | Output::Bool(_) => &[],
            Output::Array(a) => a.shape(),
            Output::Mask(m) => m.shape(),
        }
    }
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Output::Scalar(n) => write!(f, "{}", n),
            Output::Bool(b) => write!(f, "{}", b),
            Output::Array(a) => write!(f, "{}", a),
            Output::Mask(m) => write!(f, "{}", m),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr1;
    use pretty_assertions::assert_eq;
    use ucalc_num::{ureal, NumError};

    #[test] fn test_from_vec_shape() { let a = UncertainArray::from_vec(vec![Number::Int(1), Number::Int(2)]); assert_eq!(a.shape(), &[2]); assert_eq!(a.kind(), ElementKind::Object); }
    #[test] fn test_scalar_is_zero_dim() { let a = UncertainArray::scalar(Number::Real(1.0)); assert_eq!(a.ndim(), 0); assert_eq!(a.len(), 1); assert_eq!(a.item(), Some(&Number::Real(1.0))); }
    #[test] fn test_item_only_for_zero_dim() { assert_eq!(UncertainArray::from_vec(vec![Number::Int(1)]).item(), None); }
    #[test] fn test_from_shape_vec_mismatch() { assert!(matches!(UncertainArray::from_shape_vec(&[2, 2], vec![Number::Int(1)]), Err(ArrayError::Shape(_)))); }
    #[test] fn test_typed_kind_verbatim() { let a = UncertainArray::from(arr1(&[1.0, 2.0]).into_dyn()); assert_eq!(a.kind(), ElementKind::Float); assert_eq!(a.data()[[0]], Number::Real(1.0)); }
    #[test] fn test_kind_hint_coerces() { let a = UncertainArray::from_array(arr1(&[Number::Int(1)]).into_dyn(), Some(ElementKind::Complex), None).unwrap(); assert_eq!(a.data()[[0]], Number::complex(1.0, 0.0)); }
    #[test] fn test_kind_hint_rejects_uncertain() { assert!(UncertainArray::from_array(arr1(&[ureal(1.0, 0.1).unwrap()]).into_dyn(), Some(ElementKind::Float), None).is_err()); }
    #[test] fn test_int_hint_out_of_range() { assert!(matches!(UncertainArray::from_array(arr1(&[Number::Real(1e300)]).into_dyn(), Some(ElementKind::Int), None), Err(ArrayError::Scalar(NumError::Overflow(_))))); }
    #[test] fn test_label_only_on_request() { let a = UncertainArray::from_vec(vec![Number::Int(1)]).with_label("amps"); assert_eq!(a.label(), Some("amps")); }
    #[test] fn test_outcome_from_zero_dim() { let o = Outcome::from_data(ArrayD::from_elem(IxDyn(&[]), 3.0)).unwrap(); assert_eq!(o, Outcome::Scalar(3.0)); }
    #[test] fn test_display() { let a = UncertainArray::from_vec(vec![Number::Real(1.5), ureal(2.0, 0.5).unwrap()]); assert_eq!(a.to_string(), "uarray([1.5, ureal(2.0,0.5,inf)])"); }

    #[test]
    fn test_copy_keeps_label_and_is_independent() {
        let a = UncertainArray::from_vec(vec![Number::Int(1), Number::Int(2)]).with_label("a");
        let b = a.copy();
        assert_eq!(a, b);
        assert_eq!(b.label(), Some("a"));
        let mut data = b.into_data();
        data[[0]] = Number::Int(9);
        assert_eq!(a.data()[[0]], Number::Int(1));
    }
}
