//! Values a field pair may carry.
//!
//! [`StructuredValue`] is a tree whose dates and binaries are rendered according to
//! the active [`StructuredStrategy`] at any depth, while
//! [`FlatValue`] is the already stringified right hand side of a flat segment.

use crate::strategy::{StrategySerializer, StructuredStrategy};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::SystemTime;

/// A value of a structured body field.
#[derive(Clone, Debug)]
pub enum StructuredValue {
    Null,
    Bool(bool),
    /// An integer, always representable.
    Number(serde_json::Number),
    /// A float, subject to the non-conforming float strategy.
    Float(f64),
    String(String),
    Date(DateTime<Utc>),
    Binary(Bytes),
    Array(Vec<StructuredValue>),
    /// Nested object, entries keep their insertion order.
    Object(Vec<(String, StructuredValue)>),
    Custom(CustomValue),
}

impl StructuredValue {
    /// Wraps any serializable value, its serialization is deferred until the body is encoded.
    ///
    /// Bytes written with `serialize_bytes` and floats follow the active strategy.
    /// Dates are opaque to serde, a custom value writes them in its own form.
    pub fn serialize<T>(value: T) -> Self
    where
        T: Serialize + Send + Sync + 'static,
    {
        Self::Custom(CustomValue::new(value))
    }

    pub fn binary<B: Into<Bytes>>(bytes: B) -> Self {
        Self::Binary(bytes.into())
    }

    pub fn object<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<StructuredValue>,
    {
        Self::Object(entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl PartialEq for StructuredValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Date(a), Self::Date(b)) => a == b,
            (Self::Binary(a), Self::Binary(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a == b,
            (Self::Custom(a), Self::Custom(b)) => a.same_value(b),
            _ => false,
        }
    }
}

/// A type erased [`Serialize`] value.
#[derive(Clone)]
pub struct CustomValue {
    type_name: &'static str,
    render: Arc<RenderFn>,
}

type RenderFn = dyn Fn(&StructuredStrategy) -> Result<serde_json::Value, serde_json::Error> + Send + Sync;

impl CustomValue {
    fn new<T>(value: T) -> Self
    where
        T: Serialize + Send + Sync + 'static,
    {
        Self {
            type_name: std::any::type_name::<T>(),
            render: Arc::new(move |strategy: &StructuredStrategy| value.serialize(StrategySerializer::new(strategy))),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub(crate) fn render(&self, strategy: &StructuredStrategy) -> Result<serde_json::Value, serde_json::Error> {
        (self.render)(strategy)
    }

    fn same_value(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.render, &other.render)
    }
}

impl fmt::Debug for CustomValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CustomValue").field(&self.type_name).finish()
    }
}

macro_rules! structured_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for StructuredValue {
                fn from(value: $ty) -> Self {
                    Self::Number(serde_json::Number::from(value))
                }
            }
        )*
    };
}

structured_from_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl From<f64> for StructuredValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<f32> for StructuredValue {
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

impl From<bool> for StructuredValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<String> for StructuredValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for StructuredValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<DateTime<Utc>> for StructuredValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Date(value)
    }
}

impl From<SystemTime> for StructuredValue {
    fn from(value: SystemTime) -> Self {
        Self::Date(DateTime::<Utc>::from(value))
    }
}

impl From<Bytes> for StructuredValue {
    fn from(value: Bytes) -> Self {
        Self::Binary(value)
    }
}

impl<T: Into<StructuredValue>> From<Vec<T>> for StructuredValue {
    fn from(values: Vec<T>) -> Self {
        Self::Array(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<StructuredValue>> From<Option<T>> for StructuredValue {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => value.into(),
            None => Self::Null,
        }
    }
}

/// A value of a flat body field, in its final string form.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FlatValue(String);

impl FlatValue {
    /// Captures the [`Display`](fmt::Display) form of `value`.
    pub fn display<T: fmt::Display + ?Sized>(value: &T) -> Self {
        Self(value.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for FlatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FlatValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for FlatValue {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for FlatValue {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

macro_rules! flat_from_display {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for FlatValue {
                fn from(value: $ty) -> Self {
                    Self::display(&value)
                }
            }
        )*
    };
}

flat_from_display!(bool, char, f32, f64, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
