//! Uncertainty and variance summaries returned by accessors

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::NumError;

/// Standard uncertainties of the real and imaginary components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StandardUncertainty {
    pub real: f64,
    pub imag: f64,
}

/// 2x2 variance-covariance matrix of a complex quantity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VarianceCovariance {
    pub rr: f64,
    pub ri: f64,
    pub ir: f64,
    pub ii: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Uncertainty {
    Real(f64),
    Complex(StandardUncertainty),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Variance {
    Real(f64),
    Complex(VarianceCovariance),
}

impl Uncertainty {
    pub fn is_zero(&self) -> bool {
        match self {
            Uncertainty::Real(u) => *u == 0.0,
            Uncertainty::Complex(u) => u.real == 0.0 && u.imag == 0.0,
        }
    }
}

impl From<f64> for Uncertainty { fn from(u: f64) -> Self { Uncertainty::Real(u) } }
impl From<StandardUncertainty> for Uncertainty { fn from(u: StandardUncertainty) -> Self { Uncertainty::Complex(u) } }
impl From<f64> for Variance { fn from(v: f64) -> Self { Variance::Real(v) } }
impl From<VarianceCovariance> for Variance { fn from(v: VarianceCovariance) -> Self { Variance::Complex(v) } }

impl TryFrom<Uncertainty> for f64 {
    type Error = NumError;
    fn try_from(u: Uncertainty) -> Result<f64, NumError> {
        match u {
            Uncertainty::Real(u) => Ok(u),
            Uncertainty::Complex(_) => Err(NumError::type_error_msg("complex uncertainty has two components")),
        }
    }
}

impl TryFrom<Variance> for f64 {
    type Error = NumError;
    fn try_from(v: Variance) -> Result<f64, NumError> {
        match v {
            Variance::Real(v) => Ok(v),
            Variance::Complex(_) => Err(NumError::type_error_msg("complex variance is a 2x2 matrix")),
        }
    }
}

impl fmt::Display for StandardUncertainty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StandardUncertainty(real={:?}, imag={:?})", self.real, self.imag)
    }
}

impl fmt::Display for VarianceCovariance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VarianceCovariance(rr={:?}, ri={:?}, ir={:?}, ii={:?})", self.rr, self.ri, self.ir, self.ii)
    }
}

impl fmt::Display for Uncertainty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Uncertainty::Real(u) => write!(f, "{:?}", u),
            Uncertainty::Complex(u) => write!(f, "{}", u),
        }
    }
}

impl fmt::Display for Variance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variance::Real(v) => write!(f, "{:?}", v),
            Variance::Complex(v) => write!(f, "{}", v),
        }
    }
}
