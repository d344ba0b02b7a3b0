//! Scalar elements of an uncertain array

use std::fmt;

use num_complex::Complex64;

use crate::error::{NumError, NumResult};
use crate::ucomplex::UncertainComplex;
use crate::uncertainty::{StandardUncertainty, Uncertainty, Variance, VarianceCovariance};
use crate::ureal::{round_at, UncertainReal};

/// A single array element: a plain number or an uncertain value
#[derive(Debug, Clone, PartialEq)]
pub enum Number {
    Bool(bool),
    Int(i64),
    Real(f64),
    Complex(Complex64),
    UReal(UncertainReal),
    UComplex(UncertainComplex),
}

impl Number {
    pub fn complex(re: f64, im: f64) -> Self { Number::Complex(Complex64::new(re, im)) }


    pub fn type_name(&self) -> &'static str {
        match self {
            Number::Bool(_) => "bool",
            Number::Int(_) => "int",
            Number::Real(_) => "float",
            Number::Complex(_) => "complex",
            Number::UReal(_) => "ureal",
            Number::UComplex(_) => "ucomplex",
        }
    }

    /// Truth value: nonzero central value.
    pub fn truthy(&self) -> bool {
        match self {
            Number::Bool(b) => *b,
            Number::Int(n) => *n != 0,
            Number::Real(x) => *x != 0.0,
            Number::Complex(z) => z.re != 0.0 || z.im != 0.0,
            Number::UReal(u) => u.x() != 0.0,
            Number::UComplex(u) => { let z = u.x(); z.re != 0.0 || z.im != 0.0 }
        }
    }

    pub(crate) fn parts(&self) -> (f64, f64) {
        match self {
            Number::Bool(b) => (if *b { 1.0 } else { 0.0 }, 0.0),
            Number::Int(n) => (*n as f64, 0.0),
            Number::Real(x) => (*x, 0.0),
            Number::Complex(z) => (z.re, z.im),
            Number::UReal(u) => (u.x(), 0.0),
            Number::UComplex(u) => { let z = u.x(); (z.re, z.im) }
        }
    }

    pub fn is_nan(&self) -> bool { let (re, im) = self.parts(); re.is_nan() || im.is_nan() }
    pub fn is_inf(&self) -> bool { let (re, im) = self.parts(); re.is_infinite() || im.is_infinite() }
    pub fn is_finite(&self) -> bool { let (re, im) = self.parts(); re.is_finite() && im.is_finite() }

    /// Central value; plain numbers are their own value.
    pub fn value(&self) -> Number {
        match self {
            Number::UReal(u) => Number::Real(u.x()),
            Number::UComplex(u) => Number::Complex(u.x()),
            other => other.clone(),
        }
    }

    pub fn uncertainty(&self) -> Uncertainty {
        match self {
            Number::UReal(u) => Uncertainty::Real(u.u()),
            Number::UComplex(u) => Uncertainty::Complex(u.u()),
            Number::Complex(_) => Uncertainty::Complex(StandardUncertainty { real: 0.0, imag: 0.0 }),
            _ => Uncertainty::Real(0.0),
        }
    }

    pub fn variance(&self) -> Variance {
        match self {
            Number::UReal(u) => Variance::Real(u.v()),
            Number::UComplex(u) => Variance::Complex(u.v()),
            Number::Complex(_) => Variance::Complex(VarianceCovariance { rr: 0.0, ri: 0.0, ir: 0.0, ii: 0.0 }),
            _ => Variance::Real(0.0),
        }
    }

    pub fn dof(&self) -> f64 {
        match self {
            Number::UReal(u) => u.df(),
            Number::UComplex(u) => u.df(),
            _ => f64::INFINITY,
        }
    }

    pub fn real(&self) -> Number {
        match self {
            Number::Bool(b) => Number::Int(*b as i64),
            Number::Complex(z) => Number::Real(z.re),
            Number::UComplex(u) => Number::UReal(u.real().clone()),
            other => other.clone(),
        }
    }

    pub fn imag(&self) -> Number {
        match self {
            Number::Bool(_) | Number::Int(_) => Number::Int(0),
            Number::Real(_) => Number::Real(0.0),
            Number::Complex(z) => Number::Real(z.im),
            Number::UReal(_) => Number::UReal(UncertainReal::constant(0.0)),
            Number::UComplex(u) => Number::UReal(u.imag().clone()),
        }
    }

    /// Correlation coefficient between real and imaginary components.
    pub fn r(&self) -> NumResult<f64> {
        match self {
            Number::UComplex(u) => Ok(u.r()),
            other => Err(NumError::type_error("ucomplex", other)),
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            Number::UReal(u) => u.label(),
            Number::UComplex(u) => u.label(),
            _ => None,
        }
    }

    /// Register an uncertain value as an intermediate result. Plain numbers
    /// have nothing to register and are returned as is.
    pub fn intermediate(&self, label: Option<&str>) -> Number {
        match self {
            Number::UReal(u) => Number::UReal(u.intermediate(label)),
            Number::UComplex(u) => Number::UComplex(u.intermediate(label)),
            other => other.clone(),
        }
    }

    /// Round for presentation.
    ///
    /// Plain reals are rounded to `digits` decimal places (ties to even) and
    /// integers to a multiple of `10^-digits`. Uncertain values keep `digits`
    /// significant figures of their uncertainty, see [`UncertainReal::round`].
    pub fn round(&self, digits: i32, df_decimals: u32) -> NumResult<Number> {
        match self {
            Number::Bool(b) => Number::Int(*b as i64).round(digits, df_decimals),
            Number::Int(n) => round_int(*n, digits).map(Number::Int),
            Number::Real(x) => Ok(Number::Real(round_at(*x, digits.saturating_neg()))),
            Number::Complex(_) => Err(NumError::type_error_msg("complex numbers cannot be rounded")),
            Number::UReal(u) => Ok(Number::UReal(u.round(significant(digits)?, df_decimals)?)),
            Number::UComplex(u) => Ok(Number::UComplex(u.round(significant(digits)?, df_decimals)?)),
        }
    }

    fn elementary(wrt: &Number) -> NumResult<&UncertainReal> {
        match wrt {
            Number::UReal(w) if w.is_elementary() => Ok(w),
            Number::UReal(_) => Err(NumError::unsupported("sensitivity requires an elementary uncertain real")),
            other => Err(NumError::type_error("ureal", other)),
        }
    }

    pub fn sensitivity(&self, wrt: &Number) -> NumResult<f64> {
        let wrt = Number::elementary(wrt)?;
        match self {
            Number::UReal(u) => u.sensitivity(wrt),
            Number::UComplex(_) => Err(NumError::unsupported("sensitivity of an uncertain complex")),
            _ => Ok(0.0),
        }
    }

    pub fn u_component(&self, wrt: &Number) -> NumResult<f64> {
        let wrt = Number::elementary(wrt)?;
        match self {
            Number::UReal(u) => u.u_component(wrt),
            Number::UComplex(_) => Err(NumError::unsupported("u_component of an uncertain complex")),
            _ => Ok(0.0),
        }
    }
}

impl Default for Number {
    fn default() -> Self { Number::Int(0) }
}

impl From<bool> for Number { fn from(b: bool) -> Self { Number::Bool(b) } }
impl From<i32> for Number { fn from(n: i32) -> Self { Number::Int(n as i64) } }
impl From<i64> for Number { fn from(n: i64) -> Self { Number::Int(n) } }
impl From<f64> for Number { fn from(x: f64) -> Self { Number::Real(x) } }
impl From<Complex64> for Number { fn from(z: Complex64) -> Self { Number::Complex(z) } }
impl From<UncertainReal> for Number { fn from(u: UncertainReal) -> Self { Number::UReal(u) } }
impl From<UncertainComplex> for Number { fn from(u: UncertainComplex) -> Self { Number::UComplex(u) } }

impl TryFrom<Number> for bool {
    type Error = NumError;
    fn try_from(n: Number) -> NumResult<bool> {
        match n {
            Number::Bool(b) => Ok(b),
            other => Err(NumError::type_error("bool", &other)),
        }
    }
}

impl TryFrom<Number> for i64 {
    type Error = NumError;
    fn try_from(n: Number) -> NumResult<i64> {
        match n {
            Number::Bool(b) => Ok(b as i64),
            Number::Int(n) => Ok(n),
            other => Err(NumError::type_error("int", &other)),
        }
    }
}

impl TryFrom<Number> for f64 {
    type Error = NumError;
    fn try_from(n: Number) -> NumResult<f64> {
        match n {
            Number::Bool(_) | Number::Int(_) | Number::Real(_) => Ok(n.parts().0),
            other => Err(NumError::type_error("float", &other)),
        }
    }
}

impl TryFrom<Number> for Complex64 {
    type Error = NumError;
    fn try_from(n: Number) -> NumResult<Complex64> {
        match n {
            Number::Bool(_) | Number::Int(_) | Number::Real(_) | Number::Complex(_) => {
                let (re, im) = n.parts();
                Ok(Complex64::new(re, im))
            }
            other => Err(NumError::type_error("complex", &other)),
        }
    }
}

fn significant(digits: i32) -> NumResult<u32> {
    u32::try_from(digits)
        .ok()
        .filter(|d| *d > 0)
        .ok_or_else(|| NumError::domain(format!("uncertain values need at least one significant digit, got {}", digits)))
}

fn round_int(n: i64, digits: i32) -> NumResult<i64> {
    if digits >= 0 { return Ok(n); }
    let Some(step) = 10i64.checked_pow(digits.unsigned_abs()) else { return Ok(0) };
    let (q, r) = (n.div_euclid(step), n.rem_euclid(step));
    let q = if 2 * r > step || (2 * r == step && q % 2 != 0) { q + 1 } else { q };
    q.checked_mul(step).ok_or_else(|| NumError::Overflow(format!("rounding {} to {} digits", n, digits)))
}

pub(crate) fn fmt_complex(f: &mut fmt::Formatter<'_>, z: Complex64) -> fmt::Result {
    let sign = if z.im.is_sign_negative() { '-' } else { '+' };
    write!(f, "({:?}{}{:?}j)", z.re, sign, z.im.abs())
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Bool(b) => write!(f, "{}", b),
            Number::Int(n) => write!(f, "{}", n),
            Number::Real(x) => write!(f, "{:?}", x),
            Number::Complex(z) => fmt_complex(f, *z),
            Number::UReal(u) => write!(f, "{}", u),
            Number::UComplex(u) => write!(f, "{}", u),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ureal(x: f64, u: f64) -> Number { Number::UReal(UncertainReal::new(x, u, f64::INFINITY, None).unwrap()) }

    #[test] fn test_plain_value_is_itself() { assert_eq!(Number::Int(3).value(), Number::Int(3)); }
    #[test] fn test_uncertain_value() { assert_eq!(ureal(1.5, 0.1).value(), Number::Real(1.5)); }
    #[test] fn test_plain_uncertainty_zero() { assert_eq!(Number::Real(2.0).uncertainty(), Uncertainty::Real(0.0)); }
    #[test] fn test_plain_dof_infinite() { assert!(Number::Real(2.0).dof().is_infinite()); }
    #[test] fn test_bool_real_is_int() { assert_eq!(Number::Bool(true).real(), Number::Int(1)); }
    #[test] fn test_complex_parts() { let z = Number::complex(1.0, -2.0); assert_eq!(z.real(), Number::Real(1.0)); assert_eq!(z.imag(), Number::Real(-2.0)); }
    #[test] fn test_r_requires_ucomplex() { assert!(Number::Real(1.0).r().is_err()); }
    #[test] fn test_nan_inf_finite() { let n = Number::Real(f64::NAN); assert!(n.is_nan() && !n.is_inf() && !n.is_finite()); assert!(Number::complex(0.0, f64::INFINITY).is_inf()); }
    #[test] fn test_truthy() { assert!(!Number::Int(0).truthy()); assert!(ureal(0.5, 0.1).truthy()); assert!(Number::Real(f64::NAN).truthy()); }
    #[test] fn test_intermediate_plain_unchanged() { assert_eq!(Number::Real(1.0).intermediate(Some("a")), Number::Real(1.0)); }
    #[test] fn test_intermediate_label() { assert_eq!(ureal(1.0, 0.1).intermediate(Some("a")).label(), Some("a")); }
    #[test] fn test_sensitivity_of_plain_is_zero() { assert_eq!(Number::Real(1.0).sensitivity(&ureal(1.0, 0.1)), Ok(0.0)); }
    #[test] fn test_sensitivity_wrt_plain_fails() { assert!(ureal(1.0, 0.1).sensitivity(&Number::Real(1.0)).is_err()); }
    #[test] fn test_try_from() { assert_eq!(f64::try_from(Number::Int(2)), Ok(2.0)); assert!(f64::try_from(ureal(1.0, 0.1)).is_err()); }
    #[test] fn test_round_real() { assert_eq!(Number::Real(2.675).round(2, 0), Ok(Number::Real(2.67))); assert_eq!(Number::Real(2.5).round(0, 0), Ok(Number::Real(2.0))); }
    #[test] fn test_round_int() { assert_eq!(Number::Int(1234).round(2, 0), Ok(Number::Int(1234))); assert_eq!(Number::Int(1250).round(-2, 0), Ok(Number::Int(1200))); assert_eq!(Number::Int(-1351).round(-2, 0), Ok(Number::Int(-1400))); assert_eq!(Number::Bool(true).round(1, 0), Ok(Number::Int(1))); }
    #[test] fn test_round_int_overflow() { assert!(matches!(Number::Int(i64::MAX).round(-1, 0), Err(NumError::Overflow(_)))); assert_eq!(Number::Int(i64::MAX).round(-19, 0), Ok(Number::Int(0))); }
    #[test] fn test_round_complex_fails() { assert!(Number::complex(1.0, 1.0).round(1, 0).is_err()); }
    #[test] fn test_round_uncertain_needs_digits() { assert!(matches!(ureal(1.0, 0.1).round(0, 0), Err(NumError::Domain(_)))); }
    #[test] fn test_round_uncertain() { let r = ureal(3.14159, 0.0271).round(2, 0).unwrap(); assert_eq!(r.value(), Number::Real(3.142)); }
    #[test] fn test_display() { assert_eq!(Number::complex(1.0, -2.0).to_string(), "(1.0-2.0j)"); assert_eq!(Number::Real(2.0).to_string(), "2.0"); }
}
