//! Element kinds
//!
//! An array records the kind of its elements: `Object` holds any [`Number`],
//! the concrete kinds promise every element has that plain representation.

use std::fmt;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{NumError, NumResult};
use crate::number::Number;
use crate::uncertainty::{Uncertainty, Variance};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    #[default]
    Object,
    Bool,
    Int,
    Float,
    Complex,
}

impl ElementKind {
    pub fn name(&self) -> &'static str {
        match self {
            ElementKind::Object => "object",
            ElementKind::Bool => "bool",
            ElementKind::Int => "int",
            ElementKind::Float => "float",
            ElementKind::Complex => "complex",
        }
    }

    /// Convert `n` to this kind's representation.
    pub fn coerce(&self, n: &Number) -> NumResult<Number> {
        match (self, n) {
            (ElementKind::Object, n) => Ok(n.clone()),
            (ElementKind::Bool, n) => Ok(Number::Bool(n.truthy())),
            (_, Number::UReal(_) | Number::UComplex(_)) => Err(NumError::type_error_msg(format!(
                "cannot convert {} to {}",
                n.type_name(),
                self.name()
            ))),
            (ElementKind::Int, Number::Bool(b)) => Ok(Number::Int(*b as i64)),
            (ElementKind::Int, Number::Int(i)) => Ok(Number::Int(*i)),
            (ElementKind::Int, Number::Real(x)) if x.is_finite() => truncate(*x).map(Number::Int),
            (ElementKind::Int, other) => Err(NumError::type_error("int", other)),
            (ElementKind::Float, Number::Complex(_)) => Err(NumError::type_error("float", n)),
            (ElementKind::Float, other) => Ok(Number::Real(f64::try_from(other.clone())?)),
            (ElementKind::Complex, other) => Ok(Number::Complex(Complex64::try_from(other.clone())?)),
        }
    }
}

/// Truncate toward zero, rejecting values outside the `i64` range.
fn truncate(x: f64) -> NumResult<i64> {
    let t = x.trunc();
    // i64::MIN is exactly -2^63; 2^63 itself is out of range.
    if t >= i64::MIN as f64 && t < -(i64::MIN as f64) {
        Ok(t as i64)
    } else {
        Err(NumError::Overflow(format!("{:?} does not fit in int", x)))
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.name()) }
}

/// A type that can be stored in an uncertain array.
pub trait Element: Clone + fmt::Debug + fmt::Display + Send + Sync + 'static {
    const KIND: ElementKind;
}

impl Element for Number { const KIND: ElementKind = ElementKind::Object; }
impl Element for bool { const KIND: ElementKind = ElementKind::Bool; }
impl Element for i64 { const KIND: ElementKind = ElementKind::Int; }
impl Element for f64 { const KIND: ElementKind = ElementKind::Float; }
impl Element for Complex64 { const KIND: ElementKind = ElementKind::Complex; }
impl Element for Uncertainty { const KIND: ElementKind = ElementKind::Object; }
impl Element for Variance { const KIND: ElementKind = ElementKind::Object; }
