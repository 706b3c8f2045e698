use crate::value::StructuredValue;
use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::Error as _;
use serde_json::{Map, Value};
use std::fmt;
use std::fmt::Write;
use std::sync::Arc;

/// Seconds between the unix epoch and 2001-01-01T00:00:00Z.
const REFERENCE_DATE_UNIX_SECONDS: i64 = 978_307_200;

type DateFn = dyn Fn(&DateTime<Utc>) -> Result<Value, serde_json::Error> + Send + Sync;
type BinaryFn = dyn Fn(&[u8]) -> Result<Value, serde_json::Error> + Send + Sync;

/// How dates are written.
#[derive(Clone, Default)]
pub enum DateStrategy {
    /// Seconds since 2001-01-01T00:00:00Z, as a float.
    #[default]
    SecondsSinceReferenceDate,
    /// Seconds since the unix epoch, as a float.
    SecondsSince1970,
    /// Whole milliseconds since the unix epoch, as an integer.
    MillisecondsSince1970,
    /// RFC 3339 in UTC without fractional seconds, e.g. `2001-01-01T00:00:00Z`.
    Iso8601,
    /// A `chrono` format string, rendered in UTC.
    Formatted(String),
    Custom(Arc<DateFn>),
}

impl DateStrategy {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&DateTime<Utc>) -> Result<Value, serde_json::Error> + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    pub fn encode(&self, date: &DateTime<Utc>) -> Result<Value, serde_json::Error> {
        match self {
            Self::SecondsSinceReferenceDate => Ok(Value::from(seconds_since(date, REFERENCE_DATE_UNIX_SECONDS))),
            Self::SecondsSince1970 => Ok(Value::from(seconds_since(date, 0))),
            Self::MillisecondsSince1970 => Ok(Value::from(date.timestamp_millis())),
            Self::Iso8601 => Ok(Value::from(date.to_rfc3339_opts(SecondsFormat::Secs, true))),
            Self::Formatted(format) => {
                let mut formatted = String::new();
                write!(formatted, "{}", date.format(format))
                    .map_err(|fmt::Error| serde_json::Error::custom(format!("invalid date format `{format}`")))?;
                Ok(Value::from(formatted))
            }
            Self::Custom(f) => f(date),
        }
    }
}

#[allow(clippy::cast_precision_loss, reason = "dates are written as float seconds")]
fn seconds_since(date: &DateTime<Utc>, origin: i64) -> f64 {
    (date.timestamp() - origin) as f64 + f64::from(date.timestamp_subsec_nanos()) / 1_000_000_000.0
}

impl fmt::Debug for DateStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SecondsSinceReferenceDate => f.write_str("SecondsSinceReferenceDate"),
            Self::SecondsSince1970 => f.write_str("SecondsSince1970"),
            Self::MillisecondsSince1970 => f.write_str("MillisecondsSince1970"),
            Self::Iso8601 => f.write_str("Iso8601"),
            Self::Formatted(format) => f.debug_tuple("Formatted").field(format).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// How binary data is written.
#[derive(Clone, Default)]
pub enum BinaryStrategy {
    /// Standard base64 alphabet with padding.
    #[default]
    Base64,
    /// URL safe base64 alphabet with padding.
    Base64UrlSafe,
    /// An array of byte values.
    ByteArray,
    Custom(Arc<BinaryFn>),
}

impl BinaryStrategy {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&[u8]) -> Result<Value, serde_json::Error> + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    pub fn encode(&self, bytes: &[u8]) -> Result<Value, serde_json::Error> {
        match self {
            Self::Base64 => Ok(Value::from(STANDARD.encode(bytes))),
            Self::Base64UrlSafe => Ok(Value::from(URL_SAFE.encode(bytes))),
            Self::ByteArray => Ok(Value::Array(bytes.iter().map(|b| Value::from(*b)).collect())),
            Self::Custom(f) => f(bytes),
        }
    }
}

impl fmt::Debug for BinaryStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base64 => f.write_str("Base64"),
            Self::Base64UrlSafe => f.write_str("Base64UrlSafe"),
            Self::ByteArray => f.write_str("ByteArray"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// How NaN and infinities are written, JSON has no representation for them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FloatStrategy {
    #[default]
    Throw,
    ConvertToString { positive_infinity: String, negative_infinity: String, nan: String },
}

impl FloatStrategy {
    pub fn encode(&self, value: f64) -> Result<Value, serde_json::Error> {
        if let Some(number) = serde_json::Number::from_f64(value) {
            return Ok(Value::Number(number));
        }
        match self {
            Self::Throw => Err(serde_json::Error::custom(format!("non-conforming float value {value}"))),
            Self::ConvertToString { positive_infinity, negative_infinity, nan } => {
                let text = if value.is_nan() {
                    nan
                } else if value.is_sign_positive() {
                    positive_infinity
                } else {
                    negative_infinity
                };
                Ok(Value::from(text.as_str()))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormatting {
    #[default]
    Compact,
    Pretty,
}

static DEFAULT_DATE: DateStrategy = DateStrategy::SecondsSinceReferenceDate;
static DEFAULT_BINARY: BinaryStrategy = BinaryStrategy::Base64;
static DEFAULT_FLOATS: FloatStrategy = FloatStrategy::Throw;

/// Strategy of a structured (JSON) body.
///
/// Every knob is independently settable, unset knobs fall back to their defaults
/// when read.
#[derive(Debug, Clone, Default)]
pub struct StructuredStrategy {
    date: Option<DateStrategy>,
    binary: Option<BinaryStrategy>,
    floats: Option<FloatStrategy>,
    formatting: Option<OutputFormatting>,
}

impl StructuredStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_date(mut self, date: DateStrategy) -> Self {
        self.date = Some(date);
        self
    }

    #[must_use]
    pub fn with_binary(mut self, binary: BinaryStrategy) -> Self {
        self.binary = Some(binary);
        self
    }

    #[must_use]
    pub fn with_floats(mut self, floats: FloatStrategy) -> Self {
        self.floats = Some(floats);
        self
    }

    #[must_use]
    pub fn with_formatting(mut self, formatting: OutputFormatting) -> Self {
        self.formatting = Some(formatting);
        self
    }

    /// Defaults to [`DateStrategy::SecondsSinceReferenceDate`].
    pub fn date(&self) -> &DateStrategy {
        self.date.as_ref().unwrap_or(&DEFAULT_DATE)
    }

    /// Defaults to [`BinaryStrategy::Base64`].
    pub fn binary(&self) -> &BinaryStrategy {
        self.binary.as_ref().unwrap_or(&DEFAULT_BINARY)
    }

    /// Defaults to [`FloatStrategy::Throw`].
    pub fn floats(&self) -> &FloatStrategy {
        self.floats.as_ref().unwrap_or(&DEFAULT_FLOATS)
    }

    /// Defaults to [`OutputFormatting::Compact`].
    pub fn formatting(&self) -> OutputFormatting {
        self.formatting.unwrap_or_default()
    }

    /// Renders a value tree, applying the date, binary and float knobs at any depth.
    pub fn render(&self, value: &StructuredValue) -> Result<Value, serde_json::Error> {
        match value {
            StructuredValue::Null => Ok(Value::Null),
            StructuredValue::Bool(b) => Ok(Value::Bool(*b)),
            StructuredValue::Number(n) => Ok(Value::Number(n.clone())),
            StructuredValue::Float(f) => self.floats().encode(*f),
            StructuredValue::String(s) => Ok(Value::String(s.clone())),
            StructuredValue::Date(date) => self.date().encode(date),
            StructuredValue::Binary(bytes) => self.binary().encode(bytes),
            StructuredValue::Array(values) => {
                values.iter().map(|v| self.render(v)).collect::<Result<_, _>>().map(Value::Array)
            }
            StructuredValue::Object(entries) => {
                let mut map = Map::with_capacity(entries.len());
                for (key, value) in entries {
                    map.insert(key.clone(), self.render(value)?);
                }
                Ok(Value::Object(map))
            }
            StructuredValue::Custom(custom) => custom.render(self),
        }
    }
}
