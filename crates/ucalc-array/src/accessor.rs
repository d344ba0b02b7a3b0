//! Read-only element accessors
//!
//! Each accessor applies the matching scalar accessor to every element. A
//! 0-dimensional array returns the bare element result.

use ndarray::{Array1, ArrayD, IxDyn};
use tracing::trace;
use ucalc_num::{ops, Element, NumError, Number, Uncertainty, Variance};

use crate::array::{Outcome, UncertainArray};
use crate::broadcast::Operand;
use crate::dispatch::{pairwise, Applied};
use crate::error::{ArrayError, ArrayResult};
use crate::materialize::fill;

/// Labels handed to [`UncertainArray::intermediate`].
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Labels {
    #[default]
    Anonymous,
    /// One label for the whole array; elements are suffixed with their
    /// flat index.
    Shared(String),
    PerElement(ArrayD<String>),
}

impl From<&str> for Labels {
    fn from(label: &str) -> Self { Labels::Shared(label.to_string()) }
}

impl From<String> for Labels {
    fn from(label: String) -> Self { Labels::Shared(label) }
}

impl From<Option<&str>> for Labels {
    fn from(label: Option<&str>) -> Self { label.map_or(Labels::Anonymous, Labels::from) }
}

impl From<Vec<String>> for Labels {
    fn from(labels: Vec<String>) -> Self { Labels::PerElement(Array1::from_vec(labels).into_dyn()) }
}

impl From<Vec<&str>> for Labels {
    fn from(labels: Vec<&str>) -> Self { Labels::from(labels.into_iter().map(str::to_string).collect::<Vec<_>>()) }
}

impl From<ArrayD<String>> for Labels {
    fn from(labels: ArrayD<String>) -> Self { Labels::PerElement(labels) }
}

impl UncertainArray {
    fn elementwise<T: Element>(&self, f: impl Fn(&Number) -> ArrayResult<T>) -> ArrayResult<Outcome<T>> {
        if let Some(x) = self.item() {
            trace!("0-d accessor short-circuit");
            return Ok(Outcome::Scalar(f(x)?));
        }
        Ok(Outcome::Array(UncertainArray::new(fill(self.shape(), self.iter(), f)?)))
    }

    // ============ Value ============

    pub fn value(&self) -> ArrayResult<Outcome> { self.elementwise(|n| Ok(n.value())) }
    pub fn x(&self) -> ArrayResult<Outcome> { self.value() }

    /// Values converted to a concrete element type.
    pub fn value_as<T>(&self) -> ArrayResult<Outcome<T>>
    where
        T: Element + TryFrom<Number, Error = NumError>,
    {
        self.elementwise(|n| Ok(T::try_from(n.value())?))
    }

    // ============ Uncertainty ============

    pub fn uncertainty(&self) -> ArrayResult<Outcome<Uncertainty>> { self.elementwise(|n| Ok(n.uncertainty())) }
    pub fn u(&self) -> ArrayResult<Outcome<Uncertainty>> { self.uncertainty() }

    pub fn uncertainty_as<T>(&self) -> ArrayResult<Outcome<T>>
    where
        T: Element + TryFrom<Uncertainty, Error = NumError>,
    {
        self.elementwise(|n| Ok(T::try_from(n.uncertainty())?))
    }

    pub fn variance(&self) -> ArrayResult<Outcome<Variance>> { self.elementwise(|n| Ok(n.variance())) }
    pub fn v(&self) -> ArrayResult<Outcome<Variance>> { self.variance() }

    pub fn variance_as<T>(&self) -> ArrayResult<Outcome<T>>
    where
        T: Element + TryFrom<Variance, Error = NumError>,
    {
        self.elementwise(|n| Ok(T::try_from(n.variance())?))
    }

    /// Degrees of freedom; plain numbers have infinite degrees of freedom.
    pub fn dof(&self) -> ArrayResult<Outcome<f64>> { self.elementwise(|n| Ok(n.dof())) }
    pub fn df(&self) -> ArrayResult<Outcome<f64>> { self.dof() }

    // ============ Components ============

    pub fn real(&self) -> ArrayResult<Outcome> { self.elementwise(|n| Ok(n.real())) }
    pub fn imag(&self) -> ArrayResult<Outcome> { self.elementwise(|n| Ok(n.imag())) }

    pub fn real_as<T>(&self) -> ArrayResult<Outcome<T>>
    where
        T: Element + TryFrom<Number, Error = NumError>,
    {
        self.elementwise(|n| Ok(T::try_from(n.real().value())?))
    }

    pub fn imag_as<T>(&self) -> ArrayResult<Outcome<T>>
    where
        T: Element + TryFrom<Number, Error = NumError>,
    {
        self.elementwise(|n| Ok(T::try_from(n.imag().value())?))
    }

    /// Correlation coefficient between the real and imaginary components.
    /// Fails unless every element is an uncertain complex.
    pub fn r(&self) -> ArrayResult<Outcome<f64>> { self.elementwise(|n| Ok(n.r()?)) }

    pub fn magnitude(&self) -> ArrayResult<Outcome> { self.elementwise(|n| Ok(ops::magnitude(n)?)) }
    pub fn phase(&self) -> ArrayResult<Outcome> { self.elementwise(|n| Ok(ops::phase(n)?)) }
    pub fn mag_squared(&self) -> ArrayResult<Outcome> { self.elementwise(|n| Ok(ops::mag_squared(n)?)) }

    /// Round every element for presentation, see [`Number::round`]. The
    /// result carries no label.
    pub fn round(&self, digits: i32, df_decimals: u32) -> ArrayResult<Outcome> {
        self.elementwise(|n| Ok(n.round(digits, df_decimals)?))
    }

    // ============ Intermediate results ============

    /// Register every element as an intermediate result.
    ///
    /// A shared label on an array of more than one element becomes
    /// `label[i]`, `i` being the flat index. Per-element labels are matched
    /// in flat order when their count equals the element count and broadcast
    /// against the array shape otherwise.
    pub fn intermediate(&self, labels: impl Into<Labels>) -> ArrayResult<Outcome> {
        match labels.into() {
            Labels::Anonymous => self.elementwise(|n| Ok(n.intermediate(None))),
            Labels::Shared(label) if self.len() > 1 => {
                let data = fill(self.shape(), self.iter().enumerate(), |(i, n)| {
                    Ok(n.intermediate(Some(&format!("{}[{}]", label, i))))
                })?;
                Ok(Outcome::Array(UncertainArray::new(data)))
            }
            Labels::Shared(label) => self.elementwise(|n| Ok(n.intermediate(Some(&label)))),
            Labels::PerElement(labels) => self.labelled(&labels),
        }
    }

    fn labelled(&self, labels: &ArrayD<String>) -> ArrayResult<Outcome> {
        let data = if labels.len() == self.len() {
            fill(self.shape(), self.iter().zip(labels.iter()), |(n, l)| Ok(n.intermediate(Some(l))))?
        } else {
            let labels = labels.broadcast(IxDyn(self.shape())).ok_or_else(ArrayError::incompatible_shape)?;
            fill(self.shape(), self.iter().zip(labels.iter()), |(n, l)| Ok(n.intermediate(Some(l))))?
        };
        Outcome::from_data(data)
    }

    // ============ Sensitivity ============

    /// Sensitivity coefficient of each element with respect to the matching
    /// element of `x`, which must hold elementary uncertain reals.
    pub fn sensitivity<'a>(&'a self, x: impl Into<Operand<'a>>) -> ArrayResult<Outcome<f64>> {
        self.against(x.into(), |n, w| Ok(n.sensitivity(w)?))
    }

    /// Signed component of uncertainty of each element with respect to the
    /// matching element of `x`.
    pub fn u_component<'a>(&'a self, x: impl Into<Operand<'a>>) -> ArrayResult<Outcome<f64>> {
        self.against(x.into(), |n, w| Ok(n.u_component(w)?))
    }

    fn against(&self, x: Operand<'_>, f: impl Fn(&Number, &Number) -> ArrayResult<f64>) -> ArrayResult<Outcome<f64>> {
        Ok(match pairwise(&Operand::Array(self), &x, f)? {
            Applied::Scalar(s) => Outcome::Scalar(s),
            Applied::Array(data) => Outcome::Array(UncertainArray::new(data)),
        })
    }
}
