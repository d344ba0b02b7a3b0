//! Uncertain complex numbers
//!
//! Stored as a pair of [`UncertainReal`] components sharing elementary inputs,
//! so the real-imaginary covariance falls out of the component vectors.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::sync::Arc;

use num_complex::Complex64;

use crate::error::{NumError, NumResult};
use crate::uncertainty::{StandardUncertainty, VarianceCovariance};
use crate::ureal::{floor_dof, last_digit, round_at, welch_satterthwaite, Component, LeafId, UncertainReal};

#[derive(Debug, Clone, PartialEq)]
pub struct UncertainComplex {
    re: UncertainReal,
    im: UncertainReal,
    label: Option<Arc<str>>,
    intermediate: bool,
}

impl UncertainComplex {
    /// Create an elementary uncertain complex number with standard
    /// uncertainties `u = (real, imag)` and real-imaginary correlation `r`.
    pub fn new(z: Complex64, u: (f64, f64), r: f64, dof: f64, label: Option<&str>) -> NumResult<Self> {
        let (ur, ui) = u;
        for value in [ur, ui] {
            if !(value >= 0.0) || value.is_infinite() {
                return Err(NumError::domain(format!("invalid standard uncertainty: {}", value)));
            }
        }
        if !(r.abs() <= 1.0) {
            return Err(NumError::domain(format!("invalid correlation coefficient: {}", r)));
        }
        if !(dof >= 1.0) {
            return Err(NumError::domain(format!("invalid degrees of freedom: {}", dof)));
        }
        // Both leaves are unit-variance inputs, so each sensitivity equals its component.
        let (first, second) = (LeafId::fresh(), LeafId::fresh());
        let leaf = |u: f64| Component { u, sensitivity: u, dof };
        let re = BTreeMap::from([(first, leaf(ur))]);
        let im = BTreeMap::from([(first, leaf(r * ui)), (second, leaf((1.0 - r * r).sqrt() * ui))]);
        Ok(UncertainComplex {
            re: UncertainReal::from_components(z.re, re),
            im: UncertainReal::from_components(z.im, im),
            label: label.map(Arc::from),
            intermediate: false,
        })
    }

    pub fn constant(z: Complex64) -> Self {
        UncertainComplex::from_parts(UncertainReal::constant(z.re), UncertainReal::constant(z.im))
    }

    pub fn from_parts(re: UncertainReal, im: UncertainReal) -> Self {
        UncertainComplex { re, im, label: None, intermediate: false }
    }

    pub fn x(&self) -> Complex64 { Complex64::new(self.re.x(), self.im.x()) }
    pub fn real(&self) -> &UncertainReal { &self.re }
    pub fn imag(&self) -> &UncertainReal { &self.im }
    pub fn u(&self) -> StandardUncertainty { StandardUncertainty { real: self.re.u(), imag: self.im.u() } }
    pub fn label(&self) -> Option<&str> { self.label.as_deref() }
    pub fn is_intermediate(&self) -> bool { self.intermediate }

    pub fn v(&self) -> VarianceCovariance {
        let im: BTreeMap<LeafId, f64> = self.im.components().map(|(leaf, c)| (leaf, c.u)).collect();
        let ri: f64 = self.re.components().map(|(leaf, c)| c.u * im.get(&leaf).copied().unwrap_or(0.0)).sum();
        VarianceCovariance { rr: self.re.v(), ri, ir: ri, ii: self.im.v() }
    }

    /// Correlation coefficient between the real and imaginary components.
    pub fn r(&self) -> f64 {
        let v = self.v();
        let denom = (v.rr * v.ii).sqrt();
        if denom == 0.0 { 0.0 } else { v.ri / denom }
    }

    /// Degrees of freedom using the total variance of both components.
    pub fn df(&self) -> f64 {
        let mut per_leaf: BTreeMap<LeafId, (f64, f64)> = BTreeMap::new();
        for (leaf, c) in self.re.components().chain(self.im.components()) {
            let entry = per_leaf.entry(leaf).or_insert((0.0, c.dof));
            entry.0 += c.u * c.u;
        }
        let total: f64 = per_leaf.values().map(|(v, _)| v).sum();
        welch_satterthwaite(total, per_leaf.into_values())
    }

    pub fn intermediate(&self, label: Option<&str>) -> Self {
        let mut out = self.clone();
        out.intermediate = true;
        if let Some(label) = label { out.label = Some(Arc::from(label)); }
        out
    }

    /// Round both components at the place of the last significant digit of
    /// the smaller nonzero standard uncertainty.
    pub fn round(&self, digits: u32, df_decimals: u32) -> NumResult<Self> {
        let u = self.u();
        let smallest = [u.real, u.imag].into_iter().filter(|v| *v > 0.0 && v.is_finite()).reduce(f64::min);
        let Some(smallest) = smallest else { return Ok(self.clone()) };
        let place = last_digit(smallest, digits);
        let z = self.x();
        UncertainComplex::new(
            Complex64::new(round_at(z.re, place), round_at(z.im, place)),
            (round_at(u.real, place), round_at(u.imag, place)),
            self.r().clamp(-1.0, 1.0),
            floor_dof(self.df(), df_decimals),
            self.label.as_deref(),
        )
    }

    /// Build `z` from a linear combination with complex coefficients.
    pub fn linear(z: Complex64, terms: &[(Complex64, &UncertainComplex)]) -> Self {
        let mut re_terms = Vec::with_capacity(terms.len() * 2);
        let mut im_terms = Vec::with_capacity(terms.len() * 2);
        for (c, w) in terms {
            re_terms.push((c.re, &w.re));
            re_terms.push((-c.im, &w.im));
            im_terms.push((c.im, &w.re));
            im_terms.push((c.re, &w.im));
        }
        UncertainComplex::from_parts(UncertainReal::linear(z.re, &re_terms), UncertainReal::linear(z.im, &im_terms))
    }

    /// Apply an analytic function given its value and derivative at `x`.
    pub fn apply(&self, value: Complex64, derivative: Complex64) -> Self {
        UncertainComplex::linear(value, &[(derivative, self)])
    }

    pub fn pow(&self, exponent: &UncertainComplex) -> Self {
        let (a, b) = (self.x(), exponent.x());
        let value = a.powc(b);
        let one = Complex64::new(1.0, 0.0);
        UncertainComplex::linear(value, &[(b * a.powc(b - one), self), (value * a.ln(), exponent)])
    }

    pub fn conjugate(&self) -> Self { UncertainComplex::from_parts(self.re.clone(), -&self.im) }

    pub fn magnitude(&self) -> UncertainReal {
        let m = self.x().norm();
        if m == 0.0 { return UncertainReal::linear(0.0, &[]); }
        UncertainReal::linear(m, &[(self.re.x() / m, &self.re), (self.im.x() / m, &self.im)])
    }

    pub fn mag_squared(&self) -> UncertainReal {
        let (a, b) = (self.re.x(), self.im.x());
        UncertainReal::linear(a * a + b * b, &[(2.0 * a, &self.re), (2.0 * b, &self.im)])
    }

    pub fn phase(&self) -> UncertainReal { self.im.atan2(&self.re) }
}

impl Add for &UncertainComplex {
    type Output = UncertainComplex;
    fn add(self, rhs: &UncertainComplex) -> UncertainComplex { UncertainComplex::from_parts(&self.re + &rhs.re, &self.im + &rhs.im) }
}

impl Sub for &UncertainComplex {
    type Output = UncertainComplex;
    fn sub(self, rhs: &UncertainComplex) -> UncertainComplex { UncertainComplex::from_parts(&self.re - &rhs.re, &self.im - &rhs.im) }
}

impl Mul for &UncertainComplex {
    type Output = UncertainComplex;
    fn mul(self, rhs: &UncertainComplex) -> UncertainComplex {
        let (a, b) = (self.x(), rhs.x());
        UncertainComplex::linear(a * b, &[(b, self), (a, rhs)])
    }
}

impl Div for &UncertainComplex {
    type Output = UncertainComplex;
    fn div(self, rhs: &UncertainComplex) -> UncertainComplex {
        let (a, b) = (self.x(), rhs.x());
        let one = Complex64::new(1.0, 0.0);
        UncertainComplex::linear(a / b, &[(one / b, self), (-a / (b * b), rhs)])
    }
}

impl Neg for &UncertainComplex {
    type Output = UncertainComplex;
    fn neg(self) -> UncertainComplex { UncertainComplex::from_parts(-&self.re, -&self.im) }
}

impl fmt::Display for UncertainComplex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let z = self.x();
        let u = self.u();
        let sign = if z.im.is_sign_negative() { '-' } else { '+' };
        write!(f, "ucomplex(({:?}{}{:?}j), u=[{:?},{:?}], r={:?}, df={:?})", z.re, sign, z.im.abs(), u.real, u.imag, self.r(), self.df())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ucomplex(re: f64, im: f64, u: f64) -> UncertainComplex {
        UncertainComplex::new(Complex64::new(re, im), (u, u), 0.0, f64::INFINITY, None).unwrap()
    }

    #[test] fn test_components() { let z = ucomplex(1.0, -2.0, 0.5); assert_eq!(z.x(), Complex64::new(1.0, -2.0)); assert_eq!(z.u(), StandardUncertainty { real: 0.5, imag: 0.5 }); assert_eq!(z.r(), 0.0); }
    #[test] fn test_invalid_correlation() { assert!(UncertainComplex::new(Complex64::new(0.0, 0.0), (1.0, 1.0), 1.5, f64::INFINITY, None).is_err()); }
    #[test] fn test_conjugate_flips_imaginary() { let z = ucomplex(1.0, 2.0, 0.1).conjugate(); assert_eq!(z.x(), Complex64::new(1.0, -2.0)); }
    #[test] fn test_round_uses_smaller_uncertainty() { let z = UncertainComplex::new(Complex64::new(1.23456, 2.34567), (0.0123, 0.5), 0.0, 9.5, None).unwrap(); let r = z.round(1, 0).unwrap(); assert_eq!(r.x(), Complex64::new(1.23, 2.35)); assert!((r.u().real - 0.01).abs() < 1e-15); assert!((r.u().imag - 0.5).abs() < 1e-15); }
    #[test] fn test_self_difference_cancels() { let z = ucomplex(1.0, 2.0, 0.3); let d = &z - &z; assert_eq!(d.u(), StandardUncertainty { real: 0.0, imag: 0.0 }); }

    #[test]
    fn test_correlated_input() {
        let z = UncertainComplex::new(Complex64::new(1.0, 1.0), (1.0, 2.0), 0.5, f64::INFINITY, None).unwrap();
        let v = z.v();
        assert!((v.rr - 1.0).abs() < 1e-12);
        assert!((v.ii - 4.0).abs() < 1e-12);
        assert!((v.ri - 1.0).abs() < 1e-12);
        assert!((z.r() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_multiplication_by_i_rotates_uncertainty() {
        let z = UncertainComplex::new(Complex64::new(1.0, 0.0), (0.2, 0.0), 0.0, f64::INFINITY, None).unwrap();
        let i = UncertainComplex::constant(Complex64::new(0.0, 1.0));
        let p = &z * &i;
        assert_eq!(p.x(), Complex64::new(0.0, 1.0));
        assert!(p.u().real.abs() < 1e-15);
        assert!((p.u().imag - 0.2).abs() < 1e-15);
    }

    #[test]
    fn test_magnitude() {
        let z = ucomplex(3.0, 4.0, 0.1);
        let m = z.magnitude();
        assert_eq!(m.x(), 5.0);
        // (3*0.1/5)^2 + (4*0.1/5)^2 = 0.01
        assert!((m.u() - 0.1).abs() < 1e-12);
    }
}
