//! Human readable views over declared bodies, for logs and debugging.
//!
//! Views only read the declaration: they never call shared value resolvers and never
//! look at an encoder's strategy, so rendering one has no effect on what gets encoded.
//!
//! ```
//! use micro_body::{StructuredEncoder, StructuredPair};
//!
//! let encoder = StructuredEncoder::new(vec![
//!     StructuredPair::set("name", "micro"),
//!     StructuredPair::shared("token"),
//! ]);
//! assert_eq!(
//!     encoder.describe().to_string(),
//!     "structured body (2 fields)\n  name = \"micro\" [set-always]\n  token = <shared> [use-shared]"
//! );
//! ```

use crate::body::{FlatBody, OpaqueBody, StructuredBody};
use crate::encoder::{FlatEncoder, OpaqueEncoder, StructuredEncoder};
use crate::field::FieldPair;
use crate::key::{FlatKey, StructuredKey};
use crate::policy::EncodingPolicy;
use crate::value::{FlatValue, StructuredValue};
use chrono::SecondsFormat;
use std::fmt;

const PREVIEW_LIMIT: usize = 64;

/// View over a [`StructuredBody`].
pub struct StructuredView<'a, B>(&'a B);

/// View over a [`FlatBody`].
pub struct FlatView<'a, B>(&'a B);

/// View over an [`OpaqueBody`].
pub struct OpaqueView<'a>(&'a OpaqueBody);

impl<B: StructuredBody> StructuredEncoder<B> {
    pub fn describe(&self) -> StructuredView<'_, B> {
        StructuredView(self.body())
    }
}

impl<B: FlatBody> FlatEncoder<B> {
    pub fn describe(&self) -> FlatView<'_, B> {
        FlatView(self.body())
    }
}

impl OpaqueEncoder {
    pub fn describe(&self) -> OpaqueView<'_> {
        OpaqueView(self.body())
    }
}

impl<'a, B: StructuredBody> StructuredView<'a, B> {
    pub fn new(body: &'a B) -> Self {
        Self(body)
    }
}

impl<'a, B: FlatBody> FlatView<'a, B> {
    pub fn new(body: &'a B) -> Self {
        Self(body)
    }
}

impl<'a> OpaqueView<'a> {
    pub fn new(body: &'a OpaqueBody) -> Self {
        Self(body)
    }
}

impl<B: StructuredBody> fmt::Display for StructuredView<'_, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(fields) = self.0.fields() else {
            return f.write_str("structured body: none");
        };
        write!(f, "structured body ({} fields)", fields.len())?;
        for field in &fields {
            write!(f, "\n  {} = ", field.key().name())?;
            write_local(f, field, write_structured)?;
        }
        Ok(())
    }
}

impl<B: FlatBody> fmt::Display for FlatView<'_, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(fields) = self.0.fields() else {
            return f.write_str("flat body: none");
        };
        write!(f, "flat body ({} fields)", fields.len())?;
        for field in &fields {
            write!(f, "\n  {}=", field.key().as_flat_str())?;
            write_local(f, field, |f, value: &FlatValue| f.write_str(value.as_str()))?;
        }
        Ok(())
    }
}

impl fmt::Display for OpaqueView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(bytes) = self.0.bytes() else {
            return f.write_str("opaque body: none");
        };
        write!(f, "opaque body ({} bytes)", bytes.len())?;
        match std::str::from_utf8(bytes) {
            Ok(text) if text.chars().count() > PREVIEW_LIMIT => {
                let preview: String = text.chars().take(PREVIEW_LIMIT).collect();
                write!(f, ": {preview:?}..")
            }
            Ok(text) if !text.is_empty() => write!(f, ": {text:?}"),
            Ok(_) => Ok(()),
            Err(_) => f.write_str(": <binary>"),
        }
    }
}

fn write_local<K, V, F>(f: &mut fmt::Formatter<'_>, field: &FieldPair<K, V>, write_value: F) -> fmt::Result
where
    F: FnOnce(&mut fmt::Formatter<'_>, &V) -> fmt::Result,
{
    match field.value() {
        Some(value) if field.policy() != EncodingPolicy::UseShared => write_value(f, value)?,
        _ if field.policy().uses_shared_value() => f.write_str("<shared>")?,
        _ => f.write_str("<none>")?,
    }
    write!(f, " [{}]", field.policy())
}

fn write_structured(f: &mut fmt::Formatter<'_>, value: &StructuredValue) -> fmt::Result {
    match value {
        StructuredValue::Null => f.write_str("null"),
        StructuredValue::Bool(b) => write!(f, "{b}"),
        StructuredValue::Number(n) => write!(f, "{n}"),
        StructuredValue::Float(n) => write!(f, "{n}"),
        StructuredValue::String(s) => write!(f, "{s:?}"),
        StructuredValue::Date(date) => f.write_str(&date.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
        StructuredValue::Binary(bytes) => write!(f, "<{} bytes>", bytes.len()),
        StructuredValue::Array(values) => {
            f.write_str("[")?;
            for (i, value) in values.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write_structured(f, value)?;
            }
            f.write_str("]")
        }
        StructuredValue::Object(entries) => {
            f.write_str("{")?;
            for (i, (key, value)) in entries.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{key}: ")?;
                write_structured(f, value)?;
            }
            f.write_str("}")
        }
        StructuredValue::Custom(custom) => write!(f, "<{}>", custom.type_name()),
    }
}

impl<B> fmt::Debug for StructuredView<'_, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StructuredView(..)")
    }
}

impl<B> fmt::Debug for FlatView<'_, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FlatView(..)")
    }
}

impl fmt::Debug for OpaqueView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("OpaqueView").field(self.0).finish()
    }
}
