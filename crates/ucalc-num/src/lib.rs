//! # ucalc-num - Scalar elements for uncertain arrays
//!
//! Plain numbers and uncertain numbers behind a single [`Number`] enum, with the
//! arithmetic, comparison, transcendental and accessor operations an array
//! engine applies element by element.

pub mod error;
pub mod kind;
pub mod number;
pub mod ops;
pub mod ucomplex;
pub mod uncertainty;
pub mod ureal;

use num_complex::Complex64;

pub use error::{NumError, NumResult};
pub use kind::{Element, ElementKind};
pub use number::Number;
pub use ops::Func;
pub use ucomplex::UncertainComplex;
pub use uncertainty::{StandardUncertainty, Uncertainty, Variance, VarianceCovariance};
pub use ureal::UncertainReal;

pub mod prelude {
    pub use crate::error::{NumError, NumResult};
    pub use crate::kind::{Element, ElementKind};
    pub use crate::number::Number;
    pub use crate::ops::{self, Func};
    pub use crate::ucomplex::UncertainComplex;
    pub use crate::uncertainty::{StandardUncertainty, Uncertainty, Variance, VarianceCovariance};
    pub use crate::ureal::UncertainReal;
    pub use crate::{ucomplex, ureal};
}

/// Elementary uncertain real with infinite degrees of freedom.
pub fn ureal(x: f64, u: f64) -> NumResult<Number> {
    UncertainReal::new(x, u, f64::INFINITY, None).map(Number::UReal)
}

/// Elementary uncertain complex with uncorrelated components and infinite degrees of freedom.
pub fn ucomplex(z: Complex64, u: (f64, f64)) -> NumResult<Number> {
    UncertainComplex::new(z, u, 0.0, f64::INFINITY, None).map(Number::UComplex)
}

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use num_complex::Complex64;

    #[test] fn test_ureal_helper() { let n = ureal(1.0, 0.5).unwrap(); assert_eq!(n.value(), Number::Real(1.0)); assert_eq!(n.uncertainty(), Uncertainty::Real(0.5)); }
    #[test] fn test_ucomplex_helper() { let n = ucomplex(Complex64::new(1.0, 2.0), (0.5, 0.5)).unwrap(); assert_eq!(n.type_name(), "ucomplex"); assert_eq!(n.r(), Ok(0.0)); }
    #[test] fn test_sum_then_difference() { let a = ureal(1.0, 0.5).unwrap(); let b = ureal(2.0, 0.5).unwrap(); let s = ops::add(&a, &b).unwrap(); let d = ops::subtract(&s, &b).unwrap(); assert_eq!(d.value(), Number::Real(1.0)); assert_eq!(d.uncertainty(), a.uncertainty()); }
    #[test] fn test_dof_of_sum() { let a = ureal(1.0, 0.5).unwrap(); assert!(ops::add(&a, &Number::Int(1)).unwrap().dof().is_infinite()); }
    #[test] fn test_sensitivity_through_ops() { let a = ureal(2.0, 0.1).unwrap(); let y = ops::multiply(&a, &a).unwrap(); assert!((y.sensitivity(&a).unwrap() - 4.0).abs() < 1e-12); }
}
