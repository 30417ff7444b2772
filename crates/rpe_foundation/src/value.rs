//! Typed property and payload values.
//!
//! Entity properties and relation payloads share one closed variant. Reads
//! are typed: callers ask for a concrete Rust type through [`FromValue`] and
//! get `None` when the stored case differs. There is deliberately no
//! implicit conversion between cases (an `Int` is not a `Double`), with the
//! single exception of [`Value::as_number`], which the engine's built-in
//! phases use to accept whichever numeric case a loader chose.

use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A property or payload value.
///
/// Values are cheaply cloneable; text is stored behind an `Arc`.
#[derive(Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Value {
    /// 32-bit signed integer.
    Int(i32),
    /// 32-bit floating point.
    Float(f32),
    /// 64-bit floating point.
    Double(f64),
    /// Boolean value.
    Bool(bool),
    /// Text value.
    Text(Arc<str>),
}

/// The case of a [`Value`], without its contents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ValueKind {
    /// [`Value::Int`]
    Int,
    /// [`Value::Float`]
    Float,
    /// [`Value::Double`]
    Double,
    /// [`Value::Bool`]
    Bool,
    /// [`Value::Text`]
    Text,
}

impl ValueKind {
    /// Returns true for the three numeric cases.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Int | Self::Float | Self::Double)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int => write!(f, "int"),
            Self::Float => write!(f, "float"),
            Self::Double => write!(f, "double"),
            Self::Bool => write!(f, "bool"),
            Self::Text => write!(f, "text"),
        }
    }
}

impl Value {
    /// Returns the case of this value.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Int(_) => ValueKind::Int,
            Self::Float(_) => ValueKind::Float,
            Self::Double(_) => ValueKind::Double,
            Self::Bool(_) => ValueKind::Bool,
            Self::Text(_) => ValueKind::Text,
        }
    }

    /// Extracts the value as `T` if the stored case matches.
    #[must_use]
    pub fn get<T: FromValue>(&self) -> Option<T> {
        T::from_value(self)
    }

    /// Attempts to extract an integer value.
    #[must_use]
    pub const fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to extract a 32-bit float value.
    #[must_use]
    pub const fn as_float(&self) -> Option<f32> {
        match self {
            Self::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to extract a 64-bit float value.
    #[must_use]
    pub const fn as_double(&self) -> Option<f64> {
        match self {
            Self::Double(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to extract a boolean value.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempts to extract a string reference.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Widens any numeric case to `f64`.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Int(n) => Some(f64::from(*n)),
            Self::Float(n) => Some(f64::from(*n)),
            Self::Double(n) => Some(*n),
            Self::Bool(_) | Self::Text(_) => None,
        }
    }

    /// Clamps a numeric value into `[min, max]` without changing its case.
    ///
    /// The bounds are rounded inward to the nearest value the case can hold
    /// (an `Int` against a maximum of `99.5` stops at `99`), so the result is
    /// always inside the interval. When `max < min` the result is `min`. A
    /// NaN bound is ignored. Returns `None` for non-numeric cases.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn clamp_number(&self, min: f64, max: f64) -> Option<Value> {
        match self {
            Self::Int(n) => {
                let bounded = f64::from(*n).min(max.floor()).max(min.ceil());
                Some(Self::Int(bounded as i32))
            }
            Self::Float(n) => Some(Self::Float(
                n.min(f32_at_most(max)).max(f32_at_least(min)),
            )),
            Self::Double(n) => Some(Self::Double(n.min(max).max(min))),
            Self::Bool(_) | Self::Text(_) => None,
        }
    }

    /// Returns true if this value is falsy (`false`, zero, or empty text).
    #[must_use]
    pub fn is_falsy(&self) -> bool {
        match self {
            Self::Int(n) => *n == 0,
            Self::Float(n) => *n == 0.0,
            Self::Double(n) => *n == 0.0,
            Self::Bool(b) => !*b,
            Self::Text(s) => s.is_empty(),
        }
    }
}

/// Largest `f32` not above `x`.
#[allow(clippy::cast_possible_truncation)]
fn f32_at_most(x: f64) -> f32 {
    let y = x as f32;
    if f64::from(y) <= x || y.is_nan() {
        return y;
    }
    if y == 0.0 {
        -f32::from_bits(1)
    } else if y > 0.0 {
        f32::from_bits(y.to_bits() - 1)
    } else {
        f32::from_bits(y.to_bits() + 1)
    }
}

/// Smallest `f32` not below `x`.
fn f32_at_least(x: f64) -> f32 {
    -f32_at_most(-x)
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}i"),
            Self::Float(n) => write!(f, "{n}f"),
            Self::Double(n) => write!(f, "{n}d"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Text(s) => write!(f, "{s:?}"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Double(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

// =============================================================================
// Typed extraction
// =============================================================================

/// Conversion from a stored [`Value`] into a concrete Rust type.
///
/// Implementations accept exactly one case; everything else is `None`.
pub trait FromValue: Sized {
    /// Extracts `Self` from `value` if the case matches.
    fn from_value(value: &Value) -> Option<Self>;
}

impl FromValue for i32 {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_int()
    }
}

impl FromValue for f32 {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_float()
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_double()
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_owned)
    }
}

impl FromValue for Arc<str> {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Text(s) => Some(Arc::clone(s)),
            _ => None,
        }
    }
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

// Convenience From implementations

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Int(n)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Self::Float(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Double(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s.into())
    }
}

impl From<Arc<str>> for Value {
    fn from(s: Arc<str>) -> Self {
        Self::Text(s)
    }
}
