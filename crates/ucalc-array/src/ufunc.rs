//! Elementwise operation registry
//!
//! Every host operation name maps to a [`Ufunc`]. The handler table in
//! [`Ufunc::kernel`] decides what each one does; operations without an entry
//! are reported as not implemented.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ucalc_num::ops::{self, Func};
use ucalc_num::{ElementKind, NumResult, Number};

use crate::error::{ArrayError, ArrayResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ufunc {
    // unary
    Negative, Positive, Conjugate, Absolute, Reciprocal, Square,
    Exp, Log, Log10, Sqrt,
    Sin, Cos, Tan, Arcsin, Arccos, Arctan,
    Sinh, Cosh, Tanh, Arcsinh, Arccosh, Arctanh,
    Isnan, Isinf, Isfinite, LogicalNot,
    Floor, Ceil, Trunc, Rint, Sign, Exp2, Expm1, Log2, Log1p, Cbrt, Invert,
    // binary
    Add, Subtract, Multiply, Divide, TrueDivide, Power, Arctan2, Maximum, Minimum,
    Equal, NotEqual, Less, LessEqual, Greater, GreaterEqual,
    LogicalAnd, LogicalOr, LogicalXor,
    FloorDivide, Remainder, Fmod, Hypot,
    BitwiseAnd, BitwiseOr, BitwiseXor, LeftShift, RightShift, Matmul,
}

pub(crate) type MapFn = fn(&Number) -> NumResult<Number>;
pub(crate) type ZipFn = fn(&Number, &Number) -> NumResult<Number>;
pub(crate) type TestFn = fn(&Number) -> NumResult<bool>;
pub(crate) type CompareFn = fn(&Number, &Number) -> NumResult<bool>;

/// How an operation is applied to its elements.
#[derive(Clone, Copy)]
pub(crate) enum Kernel {
    /// One element in, one element out.
    Map(MapFn),
    /// Two elements in, one element out.
    Zip(ZipFn),
    /// One element in, a boolean out.
    Test(TestFn),
    /// Two elements in, a boolean out.
    Compare(CompareFn),
    /// Registered but always a type error.
    Reject(&'static str),
}

impl Ufunc {
    pub const ALL: &'static [Ufunc] = &[
        Ufunc::Negative, Ufunc::Positive, Ufunc::Conjugate, Ufunc::Absolute, Ufunc::Reciprocal, Ufunc::Square,
        Ufunc::Exp, Ufunc::Log, Ufunc::Log10, Ufunc::Sqrt,
        Ufunc::Sin, Ufunc::Cos, Ufunc::Tan, Ufunc::Arcsin, Ufunc::Arccos, Ufunc::Arctan,
        Ufunc::Sinh, Ufunc::Cosh, Ufunc::Tanh, Ufunc::Arcsinh, Ufunc::Arccosh, Ufunc::Arctanh,
        Ufunc::Isnan, Ufunc::Isinf, Ufunc::Isfinite, Ufunc::LogicalNot,
        Ufunc::Floor, Ufunc::Ceil, Ufunc::Trunc, Ufunc::Rint, Ufunc::Sign, Ufunc::Exp2, Ufunc::Expm1, Ufunc::Log2, Ufunc::Log1p, Ufunc::Cbrt, Ufunc::Invert,
        Ufunc::Add, Ufunc::Subtract, Ufunc::Multiply, Ufunc::Divide, Ufunc::TrueDivide, Ufunc::Power, Ufunc::Arctan2, Ufunc::Maximum, Ufunc::Minimum,
        Ufunc::Equal, Ufunc::NotEqual, Ufunc::Less, Ufunc::LessEqual, Ufunc::Greater, Ufunc::GreaterEqual,
        Ufunc::LogicalAnd, Ufunc::LogicalOr, Ufunc::LogicalXor,
        Ufunc::FloorDivide, Ufunc::Remainder, Ufunc::Fmod, Ufunc::Hypot,
        Ufunc::BitwiseAnd, Ufunc::BitwiseOr, Ufunc::BitwiseXor, Ufunc::LeftShift, Ufunc::RightShift, Ufunc::Matmul,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Ufunc::Negative => "negative", Ufunc::Positive => "positive", Ufunc::Conjugate => "conjugate",
            Ufunc::Absolute => "absolute", Ufunc::Reciprocal => "reciprocal", Ufunc::Square => "square",
            Ufunc::Exp => "exp", Ufunc::Log => "log", Ufunc::Log10 => "log10", Ufunc::Sqrt => "sqrt",
            Ufunc::Sin => "sin", Ufunc::Cos => "cos", Ufunc::Tan => "tan",
            Ufunc::Arcsin => "arcsin", Ufunc::Arccos => "arccos", Ufunc::Arctan => "arctan",
            Ufunc::Sinh => "sinh", Ufunc::Cosh => "cosh", Ufunc::Tanh => "tanh",
            Ufunc::Arcsinh => "arcsinh", Ufunc::Arccosh => "arccosh", Ufunc::Arctanh => "arctanh",
            Ufunc::Isnan => "isnan", Ufunc::Isinf => "isinf", Ufunc::Isfinite => "isfinite", Ufunc::LogicalNot => "logical_not",
            Ufunc::Floor => "floor", Ufunc::Ceil => "ceil", Ufunc::Trunc => "trunc", Ufunc::Rint => "rint", Ufunc::Sign => "sign",
            Ufunc::Exp2 => "exp2", Ufunc::Expm1 => "expm1", Ufunc::Log2 => "log2", Ufunc::Log1p => "log1p", Ufunc::Cbrt => "cbrt",
            Ufunc::Invert => "invert",
            Ufunc::Add => "add", Ufunc::Subtract => "subtract", Ufunc::Multiply => "multiply",
            Ufunc::Divide => "divide", Ufunc::TrueDivide => "true_divide", Ufunc::Power => "power",
            Ufunc::Arctan2 => "arctan2", Ufunc::Maximum => "maximum", Ufunc::Minimum => "minimum",
            Ufunc::Equal => "equal", Ufunc::NotEqual => "not_equal", Ufunc::Less => "less",
            Ufunc::LessEqual => "less_equal", Ufunc::Greater => "greater", Ufunc::GreaterEqual => "greater_equal",
            Ufunc::LogicalAnd => "logical_and", Ufunc::LogicalOr => "logical_or", Ufunc::LogicalXor => "logical_xor",
            Ufunc::FloorDivide => "floor_divide", Ufunc::Remainder => "remainder", Ufunc::Fmod => "fmod", Ufunc::Hypot => "hypot",
            Ufunc::BitwiseAnd => "bitwise_and", Ufunc::BitwiseOr => "bitwise_or", Ufunc::BitwiseXor => "bitwise_xor",
            Ufunc::LeftShift => "left_shift", Ufunc::RightShift => "right_shift", Ufunc::Matmul => "matmul",
        }
    }

    /// Number of inputs the operation takes.
    pub fn nin(&self) -> usize {
        match self {
            Ufunc::Add | Ufunc::Subtract | Ufunc::Multiply | Ufunc::Divide | Ufunc::TrueDivide | Ufunc::Power
            | Ufunc::Arctan2 | Ufunc::Maximum | Ufunc::Minimum
            | Ufunc::Equal | Ufunc::NotEqual | Ufunc::Less | Ufunc::LessEqual | Ufunc::Greater | Ufunc::GreaterEqual
            | Ufunc::LogicalAnd | Ufunc::LogicalOr | Ufunc::LogicalXor
            | Ufunc::FloorDivide | Ufunc::Remainder | Ufunc::Fmod | Ufunc::Hypot
            | Ufunc::BitwiseAnd | Ufunc::BitwiseOr | Ufunc::BitwiseXor | Ufunc::LeftShift | Ufunc::RightShift
            | Ufunc::Matmul => 2,
            _ => 1,
        }
    }

    pub(crate) fn kernel(&self) -> Option<Kernel> {
        use Kernel::*;
        Some(match self {
            Ufunc::Negative => Map(ops::negative),
            Ufunc::Positive => Map(ops::positive),
            Ufunc::Conjugate => Map(ops::conjugate),
            Ufunc::Absolute => Map(ops::absolute),
            Ufunc::Reciprocal => Map(ops::reciprocal),
            Ufunc::Square => Map(ops::square),
            Ufunc::Exp => Map(|n| Ok(n.apply(Func::Exp))),
            Ufunc::Log => Map(|n| Ok(n.apply(Func::Log))),
            Ufunc::Log10 => Map(|n| Ok(n.apply(Func::Log10))),
            Ufunc::Sqrt => Map(|n| Ok(n.apply(Func::Sqrt))),
            Ufunc::Sin => Map(|n| Ok(n.apply(Func::Sin))),
            Ufunc::Cos => Map(|n| Ok(n.apply(Func::Cos))),
            Ufunc::Tan => Map(|n| Ok(n.apply(Func::Tan))),
            Ufunc::Arcsin => Map(|n| Ok(n.apply(Func::Asin))),
            Ufunc::Arccos => Map(|n| Ok(n.apply(Func::Acos))),
            Ufunc::Arctan => Map(|n| Ok(n.apply(Func::Atan))),
            Ufunc::Sinh => Map(|n| Ok(n.apply(Func::Sinh))),
            Ufunc::Cosh => Map(|n| Ok(n.apply(Func::Cosh))),
            Ufunc::Tanh => Map(|n| Ok(n.apply(Func::Tanh))),
            Ufunc::Arcsinh => Map(|n| Ok(n.apply(Func::Asinh))),
            Ufunc::Arccosh => Map(|n| Ok(n.apply(Func::Acosh))),
            Ufunc::Arctanh => Map(|n| Ok(n.apply(Func::Atanh))),

            Ufunc::Add => Zip(ops::add),
            Ufunc::Subtract => Zip(ops::subtract),
            Ufunc::Multiply => Zip(ops::multiply),
            Ufunc::Divide | Ufunc::TrueDivide => Zip(ops::divide),
            Ufunc::Power => Zip(ops::power),
            Ufunc::Arctan2 => Zip(ops::atan2),
            Ufunc::Maximum => Zip(ops::maximum),
            Ufunc::Minimum => Zip(ops::minimum),

            Ufunc::Isnan => Test(ops::isnan),
            Ufunc::Isinf => Test(ops::isinf),
            Ufunc::Isfinite => Test(ops::isfinite),
            Ufunc::LogicalNot => Test(ops::logical_not),

            Ufunc::Equal => Compare(ops::equal),
            Ufunc::NotEqual => Compare(ops::not_equal),
            Ufunc::Less => Compare(ops::less),
            Ufunc::LessEqual => Compare(ops::less_equal),
            Ufunc::Greater => Compare(ops::greater),
            Ufunc::GreaterEqual => Compare(ops::greater_equal),
            Ufunc::LogicalAnd => Compare(ops::logical_and),
            Ufunc::LogicalOr => Compare(ops::logical_or),

            Ufunc::LogicalXor => Reject("Boolean bitwise operations are not defined"),

            Ufunc::Floor | Ufunc::Ceil | Ufunc::Trunc | Ufunc::Rint | Ufunc::Sign
            | Ufunc::Exp2 | Ufunc::Expm1 | Ufunc::Log2 | Ufunc::Log1p | Ufunc::Cbrt | Ufunc::Invert
            | Ufunc::FloorDivide | Ufunc::Remainder | Ufunc::Fmod | Ufunc::Hypot
            | Ufunc::BitwiseAnd | Ufunc::BitwiseOr | Ufunc::BitwiseXor | Ufunc::LeftShift | Ufunc::RightShift
            | Ufunc::Matmul => return None,
        })
    }
}

impl fmt::Display for Ufunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "<ufunc '{}'>", self.name()) }
}

impl FromStr for Ufunc {
    type Err = ArrayError;
    fn from_str(s: &str) -> ArrayResult<Ufunc> {
        Ufunc::ALL.iter().copied().find(|u| u.name() == s).ok_or_else(|| ArrayError::not_implemented(s))
    }
}

/// How the host invokes an operation. Only an elementwise call is supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    #[default]
    Call,
    Reduce,
    Accumulate,
    Reduceat,
    Outer,
    At,
}

impl Method {
    pub const ALL: &'static [Method] = &[Method::Call, Method::Reduce, Method::Accumulate, Method::Reduceat, Method::Outer, Method::At];

    pub fn name(&self) -> &'static str {
        match self {
            Method::Call => "__call__",
            Method::Reduce => "reduce",
            Method::Accumulate => "accumulate",
            Method::Reduceat => "reduceat",
            Method::Outer => "outer",
            Method::At => "at",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.name()) }
}

impl FromStr for Method {
    type Err = ArrayError;
    fn from_str(s: &str) -> ArrayResult<Method> {
        Method::ALL.iter().copied().find(|m| m.name() == s).ok_or_else(|| ArrayError::value_error(format!("unknown ufunc method {:?}", s)))
    }
}

/// Keyword options of the host protocol. None of them are honoured: any
/// option that is set is reported with a warning and otherwise ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UfuncOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dtype: Option<ElementKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub casting: Option<String>,
    #[serde(rename = "where", skip_serializing_if = "Option::is_none")]
    pub where_mask: Option<Vec<bool>>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl UfuncOptions {
    pub fn from_json(json: &str) -> ArrayResult<Self> {
        serde_json::from_str(json).map_err(|e| ArrayError::value_error(format!("invalid ufunc options: {}", e)))
    }

    pub fn is_empty(&self) -> bool {
        self.dtype.is_none() && self.order.is_none() && self.casting.is_none() && self.where_mask.is_none() && self.extra.is_empty()
    }

    pub fn with_dtype(mut self, dtype: ElementKind) -> Self { self.dtype = Some(dtype); self }

    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

impl fmt::Display for UfuncOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => write!(f, "{}", json),
            Err(_) => write!(f, "{:?}", self),
        }
    }
}
