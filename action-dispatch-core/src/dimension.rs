//! Dimension names and values.
//!
//! Callers supply dimension values as [`Value`]s. The normalizer turns them
//! into [`Scalar`]s, the subset of values that can be matched by equality.

use crate::{
    action::{control_position, is_blank},
    error::InvalidDimensionError,
};
use std::{borrow::Borrow, fmt, sync::Arc};

/// A validated dimension name such as `"region"` or `"role"`.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DimensionName(Arc<str>);

impl DimensionName {
    /// Validate and create a dimension name.
    pub fn new(name: impl AsRef<str>) -> Result<Self, InvalidDimensionError> {
        let name = name.as_ref();
        if is_blank(name) {
            return Err(InvalidDimensionError::EmptyName);
        }
        if let Some(position) = control_position(name) {
            return Err(InvalidDimensionError::ControlCharacter {
                name: name.to_owned(),
                position,
            });
        }
        Ok(Self(Arc::from(name)))
    }

    /// The dimension name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DimensionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for DimensionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl AsRef<str> for DimensionName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for DimensionName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A raw dimension value as supplied by a caller.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A string value.
    Str(String),
    /// A signed integer value.
    Int(i64),
    /// A boolean value.
    Bool(bool),
    /// A floating point value. Rejected by the normalizer.
    Float(f64),
}

impl Value {
    /// Human readable kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Str(_) => "string",
            Value::Int(_) => "integer",
            Value::Bool(_) => "boolean",
            Value::Float(_) => "float",
        }
    }

    /// The string payload, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "{s:?}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Float(x) => write!(f, "{x}"),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Value::Str(value.clone())
    }
}

impl From<char> for Value {
    fn from(value: char) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(value.into())
    }
}

macro_rules! int_value_from {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(value: $t) -> Self {
                    Value::Int(value.into())
                }
            }
        )*
    };
}

int_value_from!(i8, i16, i32, i64, u8, u16, u32);

impl From<Scalar> for Value {
    fn from(value: Scalar) -> Self {
        match value {
            Scalar::Str(s) => Value::Str(s.to_string()),
            Scalar::Int(n) => Value::Int(n),
            Scalar::Bool(b) => Value::Bool(b),
        }
    }
}

/// A canonical dimension value that supports equality matching and hashing.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Scalar {
    /// A string value.
    Str(Arc<str>),
    /// A signed integer value.
    Int(i64),
    /// A boolean value.
    Bool(bool),
}

impl Scalar {
    /// Convert a raw value for the named dimension.
    pub fn from_value(name: &DimensionName, value: Value) -> Result<Self, InvalidDimensionError> {
        match value {
            Value::Str(s) => Ok(Scalar::Str(Arc::from(s))),
            Value::Int(n) => Ok(Scalar::Int(n)),
            Value::Bool(b) => Ok(Scalar::Bool(b)),
            other @ Value::Float(_) => Err(InvalidDimensionError::UnsupportedValue {
                name: name.to_string(),
                kind: other.kind(),
            }),
        }
    }

    /// The string payload, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Str(s) => write!(f, "{:?}", &**s),
            Scalar::Int(n) => write!(f, "{n}"),
            Scalar::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl fmt::Debug for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Str(Arc::from(value))
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}
