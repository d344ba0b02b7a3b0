//! Uncertain real numbers
//!
//! An [`UncertainReal`] stores its value together with one signed component
//! of uncertainty per elementary input it depends on. Every operation is a
//! linear combination of those components (first-order propagation), so
//! correlation through shared inputs is tracked: `x - x` has zero uncertainty.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::{NumError, NumResult};

static NEXT_LEAF: AtomicU64 = AtomicU64::new(1);

/// Identity of an elementary uncertain input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LeafId(u64);

impl LeafId {
    pub(crate) fn fresh() -> Self { LeafId(NEXT_LEAF.fetch_add(1, Ordering::Relaxed)) }
}

/// Contribution of one elementary input: `sensitivity` is the partial
/// derivative with respect to the input, signed `u` is that derivative times
/// the input's standard uncertainty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Component {
    pub u: f64,
    pub sensitivity: f64,
    pub dof: f64,
}

pub(crate) type Components = Arc<BTreeMap<LeafId, Component>>;

#[derive(Debug, Clone, PartialEq)]
pub struct UncertainReal {
    x: f64,
    components: Components,
    leaf: Option<LeafId>,
    label: Option<Arc<str>>,
    intermediate: bool,
}

/// Effective degrees of freedom from per-input variances (Welch-Satterthwaite).
pub(crate) fn welch_satterthwaite(total: f64, parts: impl Iterator<Item = (f64, f64)>) -> f64 {
    if total == 0.0 { return f64::INFINITY; }
    let denom: f64 = parts.filter(|(_, dof)| dof.is_finite()).map(|(v, dof)| v * v / dof).sum();
    if denom == 0.0 { f64::INFINITY } else { total * total / denom }
}

/// Round `x` to a multiple of `10^exponent`, ties to even.
pub(crate) fn round_at(x: f64, exponent: i32) -> f64 {
    if !x.is_finite() { return x; }
    let p = 10f64.powi(exponent.saturating_abs().min(400));
    if exponent < 0 {
        let scaled = x * p;
        if scaled.is_finite() { scaled.round_ties_even() / p } else { x }
    } else if p.is_finite() {
        (x / p).round_ties_even() * p
    } else {
        0.0f64.copysign(x)
    }
}

/// Decimal exponent of the last of `digits` significant figures of `u`.
pub(crate) fn last_digit(u: f64, digits: u32) -> i32 {
    u.log10().floor() as i32 + 1 - digits as i32
}

/// Degrees of freedom truncated to `decimals` decimal places.
pub(crate) fn floor_dof(df: f64, decimals: u32) -> f64 {
    let k = 10f64.powi(decimals.min(i32::MAX as u32) as i32);
    let scaled = df * k;
    if scaled.is_finite() { scaled.floor() / k } else { df }
}

impl UncertainReal {
    /// Create an elementary uncertain real with standard uncertainty `u`
    /// and `dof` degrees of freedom (use `f64::INFINITY` for a Type-B input).
    pub fn new(x: f64, u: f64, dof: f64, label: Option<&str>) -> NumResult<Self> {
        if !(u >= 0.0) || u.is_infinite() {
            return Err(NumError::domain(format!("invalid standard uncertainty: {}", u)));
        }
        if !(dof >= 1.0) {
            return Err(NumError::domain(format!("invalid degrees of freedom: {}", dof)));
        }
        let leaf = LeafId::fresh();
        let mut components = BTreeMap::new();
        components.insert(leaf, Component { u, sensitivity: 1.0, dof });
        Ok(UncertainReal {
            x,
            components: Arc::new(components),
            leaf: Some(leaf),
            label: label.map(Arc::from),
            intermediate: false,
        })
    }

    /// A value with no uncertainty.
    pub fn constant(x: f64) -> Self {
        UncertainReal { x, components: Arc::default(), leaf: None, label: None, intermediate: false }
    }

    pub(crate) fn from_components(x: f64, components: BTreeMap<LeafId, Component>) -> Self {
        UncertainReal { x, components: Arc::new(components), leaf: None, label: None, intermediate: false }
    }

    pub fn x(&self) -> f64 { self.x }
    pub fn v(&self) -> f64 { self.components.values().map(|c| c.u * c.u).sum() }
    pub fn u(&self) -> f64 { self.v().sqrt() }
    pub fn df(&self) -> f64 { welch_satterthwaite(self.v(), self.components.values().map(|c| (c.u * c.u, c.dof))) }
    pub fn label(&self) -> Option<&str> { self.label.as_deref() }
    pub fn is_elementary(&self) -> bool { self.leaf.is_some() }
    pub fn is_intermediate(&self) -> bool { self.intermediate }
    pub fn is_constant(&self) -> bool { self.components.is_empty() }

    pub fn components(&self) -> impl Iterator<Item = (LeafId, Component)> + '_ {
        self.components.iter().map(|(leaf, c)| (*leaf, *c))
    }

    /// Register this value as an intermediate result, optionally naming it.
    pub fn intermediate(&self, label: Option<&str>) -> Self {
        let mut out = self.clone();
        out.intermediate = true;
        if let Some(label) = label { out.label = Some(Arc::from(label)); }
        out
    }

    /// Build `x` from a linear combination of the components of `terms`.
    pub fn linear(x: f64, terms: &[(f64, &UncertainReal)]) -> Self {
        let mut components: BTreeMap<LeafId, Component> = BTreeMap::new();
        for (coef, operand) in terms {
            for (leaf, c) in operand.components.iter() {
                let entry = components.entry(*leaf).or_insert(Component { u: 0.0, sensitivity: 0.0, dof: c.dof });
                entry.u += coef * c.u;
                entry.sensitivity += coef * c.sensitivity;
            }
        }
        UncertainReal::from_components(x, components)
    }

    /// Keep `digits` significant figures of the uncertainty, round the value
    /// to the same decimal place and truncate the degrees of freedom. The
    /// result is a new elementary input carrying the same label.
    pub fn round(&self, digits: u32, df_decimals: u32) -> NumResult<Self> {
        let u = self.u();
        if u == 0.0 || !u.is_finite() { return Ok(self.clone()); }
        let place = last_digit(u, digits);
        let label = self.label.as_deref();
        UncertainReal::new(round_at(self.x, place), round_at(u, place), floor_dof(self.df(), df_decimals), label)
    }

    /// Apply a differentiable function given its value and derivative at `x`.
    pub fn apply(&self, value: f64, derivative: f64) -> Self {
        UncertainReal::linear(value, &[(derivative, self)])
    }

    pub fn pow(&self, exponent: &UncertainReal) -> Self {
        let (a, b) = (self.x, exponent.x);
        let value = a.powf(b);
        let mut terms = vec![(b * a.powf(b - 1.0), self)];
        if !exponent.is_constant() { terms.push((value * a.ln(), exponent)); }
        UncertainReal::linear(value, &terms)
    }

    pub fn atan2(&self, x: &UncertainReal) -> Self {
        let (a, b) = (self.x, x.x);
        let r2 = a * a + b * b;
        if r2 == 0.0 { return UncertainReal::linear(a.atan2(b), &[]); }
        UncertainReal::linear(a.atan2(b), &[(b / r2, self), (-a / r2, x)])
    }

    pub fn abs(&self) -> Self {
        let sign = if self.x < 0.0 { -1.0 } else { 1.0 };
        UncertainReal::linear(self.x.abs(), &[(sign, self)])
    }

    fn component_for(&self, wrt: &UncertainReal) -> NumResult<Option<&Component>> {
        let leaf = wrt.leaf.ok_or_else(|| NumError::unsupported("sensitivity requires an elementary uncertain real"))?;
        Ok(self.components.get(&leaf))
    }

    /// Signed component of uncertainty in `self` due to the elementary input `wrt`.
    pub fn u_component(&self, wrt: &UncertainReal) -> NumResult<f64> {
        Ok(self.component_for(wrt)?.map_or(0.0, |c| c.u))
    }

    /// Partial derivative of `self` with respect to the elementary input `wrt`.
    pub fn sensitivity(&self, wrt: &UncertainReal) -> NumResult<f64> {
        Ok(self.component_for(wrt)?.map_or(0.0, |c| c.sensitivity))
    }
}

impl Add for &UncertainReal {
    type Output = UncertainReal;
    fn add(self, rhs: &UncertainReal) -> UncertainReal { UncertainReal::linear(self.x + rhs.x, &[(1.0, self), (1.0, rhs)]) }
}

impl Sub for &UncertainReal {
    type Output = UncertainReal;
    fn sub(self, rhs: &UncertainReal) -> UncertainReal { UncertainReal::linear(self.x - rhs.x, &[(1.0, self), (-1.0, rhs)]) }
}

impl Mul for &UncertainReal {
    type Output = UncertainReal;
    fn mul(self, rhs: &UncertainReal) -> UncertainReal { UncertainReal::linear(self.x * rhs.x, &[(rhs.x, self), (self.x, rhs)]) }
}

impl Div for &UncertainReal {
    type Output = UncertainReal;
    fn div(self, rhs: &UncertainReal) -> UncertainReal {
        let (a, b) = (self.x, rhs.x);
        UncertainReal::linear(a / b, &[(1.0 / b, self), (-a / (b * b), rhs)])
    }
}

impl Neg for &UncertainReal {
    type Output = UncertainReal;
    fn neg(self) -> UncertainReal { UncertainReal::linear(-self.x, &[(-1.0, self)]) }
}

impl fmt::Display for UncertainReal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ureal({:?},{:?},{:?})", self.x, self.u(), self.df())
    }
}
