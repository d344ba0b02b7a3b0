//! Scalar operations on [`Number`]
//!
//! Binary operations promote both operands to a common representation
//! (int < float < complex < ureal < ucomplex; complex with ureal gives
//! ucomplex) and then apply the operation once.

use std::cmp::Ordering;
use std::f64::consts::LN_10;

use num_complex::Complex64;

use crate::error::{NumError, NumResult};
use crate::number::Number;
use crate::ucomplex::UncertainComplex;
use crate::ureal::UncertainReal;

// ============ Promotion ============

enum Pair {
    Int(i64, i64),
    Real(f64, f64),
    Complex(Complex64, Complex64),
    UReal(UncertainReal, UncertainReal),
    UComplex(UncertainComplex, UncertainComplex),
}

fn tier(n: &Number) -> u8 {
    match n {
        Number::Bool(_) | Number::Int(_) => 0,
        Number::Real(_) => 1,
        Number::Complex(_) => 2,
        Number::UReal(_) => 3,
        Number::UComplex(_) => 4,
    }
}

fn to_i64(n: &Number) -> i64 {
    match n {
        Number::Bool(b) => *b as i64,
        Number::Int(i) => *i,
        other => other.parts().0 as i64,
    }
}

fn to_complex(n: &Number) -> Complex64 {
    let (re, im) = n.parts();
    Complex64::new(re, im)
}

fn to_ureal(n: &Number) -> UncertainReal {
    match n {
        Number::UReal(u) => u.clone(),
        other => UncertainReal::constant(other.parts().0),
    }
}

fn to_ucomplex(n: &Number) -> UncertainComplex {
    match n {
        Number::UComplex(u) => u.clone(),
        Number::UReal(u) => UncertainComplex::from_parts(u.clone(), UncertainReal::constant(0.0)),
        other => UncertainComplex::constant(to_complex(other)),
    }
}

fn promote(a: &Number, b: &Number) -> Pair {
    let level = match (tier(a), tier(b)) {
        (2, 3) | (3, 2) => 4,
        (x, y) => x.max(y),
    };
    match level {
        0 => Pair::Int(to_i64(a), to_i64(b)),
        1 => Pair::Real(a.parts().0, b.parts().0),
        2 => Pair::Complex(to_complex(a), to_complex(b)),
        3 => Pair::UReal(to_ureal(a), to_ureal(b)),
        _ => Pair::UComplex(to_ucomplex(a), to_ucomplex(b)),
    }
}

fn overflow(op: &str) -> NumError { NumError::Overflow(format!("integer overflow in {}", op)) }

// ============ Arithmetic ============

pub fn add(a: &Number, b: &Number) -> NumResult<Number> {
    Ok(match promote(a, b) {
        Pair::Int(x, y) => Number::Int(x.checked_add(y).ok_or_else(|| overflow("add"))?),
        Pair::Real(x, y) => Number::Real(x + y),
        Pair::Complex(x, y) => Number::Complex(x + y),
        Pair::UReal(x, y) => Number::UReal(&x + &y),
        Pair::UComplex(x, y) => Number::UComplex(&x + &y),
    })
}

pub fn subtract(a: &Number, b: &Number) -> NumResult<Number> {
    Ok(match promote(a, b) {
        Pair::Int(x, y) => Number::Int(x.checked_sub(y).ok_or_else(|| overflow("subtract"))?),
        Pair::Real(x, y) => Number::Real(x - y),
        Pair::Complex(x, y) => Number::Complex(x - y),
        Pair::UReal(x, y) => Number::UReal(&x - &y),
        Pair::UComplex(x, y) => Number::UComplex(&x - &y),
    })
}

pub fn multiply(a: &Number, b: &Number) -> NumResult<Number> {
    Ok(match promote(a, b) {
        Pair::Int(x, y) => Number::Int(x.checked_mul(y).ok_or_else(|| overflow("multiply"))?),
        Pair::Real(x, y) => Number::Real(x * y),
        Pair::Complex(x, y) => Number::Complex(x * y),
        Pair::UReal(x, y) => Number::UReal(&x * &y),
        Pair::UComplex(x, y) => Number::UComplex(&x * &y),
    })
}

/// True division: two ints give a float; an int divided by int zero is an error.
pub fn divide(a: &Number, b: &Number) -> NumResult<Number> {
    Ok(match promote(a, b) {
        Pair::Int(_, 0) => return Err(NumError::DivisionByZero),
        Pair::Int(x, y) => Number::Real(x as f64 / y as f64),
        Pair::Real(x, y) => Number::Real(x / y),
        Pair::Complex(x, y) => Number::Complex(x / y),
        Pair::UReal(x, y) => Number::UReal(&x / &y),
        Pair::UComplex(x, y) => Number::UComplex(&x / &y),
    })
}

pub fn power(a: &Number, b: &Number) -> NumResult<Number> {
    Ok(match promote(a, b) {
        Pair::Int(x, y) if y < 0 => Number::Real((x as f64).powf(y as f64)),
        Pair::Int(x, y) => {
            let exp = u32::try_from(y).map_err(|_| overflow("power"))?;
            Number::Int(x.checked_pow(exp).ok_or_else(|| overflow("power"))?)
        }
        Pair::Real(x, y) => Number::Real(x.powf(y)),
        Pair::Complex(x, y) => Number::Complex(x.powc(y)),
        Pair::UReal(x, y) => Number::UReal(x.pow(&y)),
        Pair::UComplex(x, y) => Number::UComplex(x.pow(&y)),
    })
}

pub fn atan2(a: &Number, b: &Number) -> NumResult<Number> {
    Ok(match promote(a, b) {
        Pair::Int(x, y) => Number::Real((x as f64).atan2(y as f64)),
        Pair::Real(x, y) => Number::Real(x.atan2(y)),
        Pair::UReal(x, y) => Number::UReal(x.atan2(&y)),
        Pair::Complex(..) | Pair::UComplex(..) => {
            return Err(NumError::type_error_msg("arctan2 is not defined for complex arguments"))
        }
    })
}

// ============ Unary ============

pub fn negative(a: &Number) -> NumResult<Number> {
    Ok(match a {
        Number::Bool(b) => Number::Int(-(*b as i64)),
        Number::Int(n) => Number::Int(n.checked_neg().ok_or_else(|| overflow("negative"))?),
        Number::Real(x) => Number::Real(-x),
        Number::Complex(z) => Number::Complex(-z),
        Number::UReal(u) => Number::UReal(-u),
        Number::UComplex(u) => Number::UComplex(-u),
    })
}

pub fn positive(a: &Number) -> NumResult<Number> {
    Ok(match a {
        Number::Bool(b) => Number::Int(*b as i64),
        other => other.clone(),
    })
}

pub fn conjugate(a: &Number) -> NumResult<Number> {
    Ok(match a {
        Number::Complex(z) => Number::Complex(z.conj()),
        Number::UComplex(u) => Number::UComplex(u.conjugate()),
        other => other.clone(),
    })
}

/// Absolute value; the modulus for complex values.
pub fn absolute(a: &Number) -> NumResult<Number> {
    Ok(match a {
        Number::Bool(b) => Number::Int(*b as i64),
        Number::Int(n) => Number::Int(n.checked_abs().ok_or_else(|| overflow("absolute"))?),
        Number::Real(x) => Number::Real(x.abs()),
        Number::Complex(z) => Number::Real(z.norm()),
        Number::UReal(u) => Number::UReal(u.abs()),
        Number::UComplex(u) => Number::UReal(u.magnitude()),
    })
}

pub fn magnitude(a: &Number) -> NumResult<Number> { absolute(a) }

pub fn reciprocal(a: &Number) -> NumResult<Number> { divide(&Number::Real(1.0), a) }

pub fn mag_squared(a: &Number) -> NumResult<Number> {
    Ok(match a {
        Number::Bool(b) => Number::Int(*b as i64),
        Number::Int(n) => Number::Int(n.checked_mul(*n).ok_or_else(|| overflow("square"))?),
        Number::Real(x) => Number::Real(x * x),
        Number::Complex(z) => Number::Real(z.norm_sqr()),
        Number::UReal(u) => Number::UReal(u * u),
        Number::UComplex(u) => Number::UReal(u.mag_squared()),
    })
}

pub fn square(a: &Number) -> NumResult<Number> { mag_squared(a) }

pub fn phase(a: &Number) -> NumResult<Number> {
    Ok(match a {
        Number::UComplex(u) => Number::UReal(u.phase()),
        Number::UReal(u) => Number::UReal(UncertainReal::constant(0.0).atan2(u)),
        other => Number::Real(to_complex(other).arg()),
    })
}

// ============ Comparison ============

fn ordering(a: &Number, b: &Number) -> NumResult<Option<Ordering>> {
    match promote(a, b) {
        Pair::Int(x, y) => Ok(Some(x.cmp(&y))),
        Pair::Real(x, y) => Ok(x.partial_cmp(&y)),
        Pair::UReal(x, y) => Ok(x.x().partial_cmp(&y.x())),
        Pair::Complex(..) | Pair::UComplex(..) => {
            Err(NumError::type_error_msg("ordering is not defined for complex numbers"))
        }
    }
}

/// Equality of central values.
pub fn equal(a: &Number, b: &Number) -> NumResult<bool> {
    Ok(match promote(a, b) {
        Pair::Int(x, y) => x == y,
        Pair::Real(x, y) => x == y,
        Pair::Complex(x, y) => x == y,
        Pair::UReal(x, y) => x.x() == y.x(),
        Pair::UComplex(x, y) => x.x() == y.x(),
    })
}

pub fn not_equal(a: &Number, b: &Number) -> NumResult<bool> { equal(a, b).map(|eq| !eq) }
pub fn less(a: &Number, b: &Number) -> NumResult<bool> { Ok(ordering(a, b)? == Some(Ordering::Less)) }
pub fn less_equal(a: &Number, b: &Number) -> NumResult<bool> { Ok(matches!(ordering(a, b)?, Some(Ordering::Less | Ordering::Equal))) }
pub fn greater(a: &Number, b: &Number) -> NumResult<bool> { Ok(ordering(a, b)? == Some(Ordering::Greater)) }
pub fn greater_equal(a: &Number, b: &Number) -> NumResult<bool> { Ok(matches!(ordering(a, b)?, Some(Ordering::Greater | Ordering::Equal))) }

/// Larger of two elements; a NaN operand never wins.
pub fn maximum(a: &Number, b: &Number) -> NumResult<Number> {
    if a.is_nan() { return Ok(b.clone()); }
    if b.is_nan() { return Ok(a.clone()); }
    Ok(if greater(a, b)? { a.clone() } else { b.clone() })
}

/// Smaller of two elements; a NaN operand never wins.
pub fn minimum(a: &Number, b: &Number) -> NumResult<Number> {
    if a.is_nan() { return Ok(b.clone()); }
    if b.is_nan() { return Ok(a.clone()); }
    Ok(if less(a, b)? { a.clone() } else { b.clone() })
}

pub fn logical_and(a: &Number, b: &Number) -> NumResult<bool> { Ok(a.truthy() && b.truthy()) }
pub fn logical_or(a: &Number, b: &Number) -> NumResult<bool> { Ok(a.truthy() || b.truthy()) }
pub fn logical_not(a: &Number) -> NumResult<bool> { Ok(!a.truthy()) }

pub fn isnan(a: &Number) -> NumResult<bool> { Ok(a.is_nan()) }
pub fn isinf(a: &Number) -> NumResult<bool> { Ok(a.is_inf()) }
pub fn isfinite(a: &Number) -> NumResult<bool> { Ok(a.is_finite()) }

// ============ Transcendental ============

/// Differentiable elementary functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Func {
    Exp, Log, Log10, Sqrt,
    Sin, Cos, Tan, Asin, Acos, Atan,
    Sinh, Cosh, Tanh, Asinh, Acosh, Atanh,
}

impl Func {
    /// Value and derivative at a real argument. Outside the domain the
    /// results are NaN, as for plain floats.
    pub fn real(self, x: f64) -> (f64, f64) {
        match self {
            Func::Exp => { let e = x.exp(); (e, e) }
            Func::Log => (x.ln(), 1.0 / x),
            Func::Log10 => (x.ln() / LN_10, 1.0 / (x * LN_10)),
            Func::Sqrt => { let s = x.sqrt(); (s, 0.5 / s) }
            Func::Sin => (x.sin(), x.cos()),
            Func::Cos => (x.cos(), -x.sin()),
            Func::Tan => { let t = x.tan(); (t, 1.0 + t * t) }
            Func::Asin => (x.asin(), 1.0 / (1.0 - x * x).sqrt()),
            Func::Acos => (x.acos(), -1.0 / (1.0 - x * x).sqrt()),
            Func::Atan => (x.atan(), 1.0 / (1.0 + x * x)),
            Func::Sinh => (x.sinh(), x.cosh()),
            Func::Cosh => (x.cosh(), x.sinh()),
            Func::Tanh => { let t = x.tanh(); (t, 1.0 - t * t) }
            Func::Asinh => (x.asinh(), 1.0 / (x * x + 1.0).sqrt()),
            Func::Acosh => (x.acosh(), 1.0 / (x * x - 1.0).sqrt()),
            Func::Atanh => (x.atanh(), 1.0 / (1.0 - x * x)),
        }
    }

    /// Value and derivative at a complex argument (principal branches).
    pub fn complex(self, z: Complex64) -> (Complex64, Complex64) {
        let one = Complex64::new(1.0, 0.0);
        match self {
            Func::Exp => { let e = z.exp(); (e, e) }
            Func::Log => (z.ln(), one / z),
            Func::Log10 => (z.ln() / LN_10, one / (z * LN_10)),
            Func::Sqrt => { let s = z.sqrt(); (s, one / (s * 2.0)) }
            Func::Sin => (z.sin(), z.cos()),
            Func::Cos => (z.cos(), -z.sin()),
            Func::Tan => { let t = z.tan(); (t, one + t * t) }
            Func::Asin => (z.asin(), one / (one - z * z).sqrt()),
            Func::Acos => (z.acos(), -(one / (one - z * z).sqrt())),
            Func::Atan => (z.atan(), one / (one + z * z)),
            Func::Sinh => (z.sinh(), z.cosh()),
            Func::Cosh => (z.cosh(), z.sinh()),
            Func::Tanh => { let t = z.tanh(); (t, one - t * t) }
            Func::Asinh => (z.asinh(), one / (z * z + one).sqrt()),
            Func::Acosh => (z.acosh(), one / ((z - one).sqrt() * (z + one).sqrt())),
            Func::Atanh => (z.atanh(), one / (one - z * z)),
        }
    }
}

impl Number {
    pub fn apply(&self, func: Func) -> Number {
        match self {
            Number::Complex(z) => Number::Complex(func.complex(*z).0),
            Number::UReal(u) => { let (v, d) = func.real(u.x()); Number::UReal(u.apply(v, d)) }
            Number::UComplex(u) => { let (v, d) = func.complex(u.x()); Number::UComplex(u.apply(v, d)) }
            other => Number::Real(func.real(other.parts().0).0),
        }
    }

    pub fn exp(&self) -> Number { self.apply(Func::Exp) }
    pub fn log(&self) -> Number { self.apply(Func::Log) }
    pub fn log10(&self) -> Number { self.apply(Func::Log10) }
    pub fn sqrt(&self) -> Number { self.apply(Func::Sqrt) }
    pub fn sin(&self) -> Number { self.apply(Func::Sin) }
    pub fn cos(&self) -> Number { self.apply(Func::Cos) }
    pub fn tan(&self) -> Number { self.apply(Func::Tan) }
}
