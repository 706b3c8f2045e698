//! Parameter keys: the identifiers of the fields a body declares.
//!
//! Keys are usually plain enums, one per request body type. The two capability sets
//! are independent, a key type implements whichever body flavors it is used in.

use crate::shared::SharedResolver;
use crate::value::{FlatValue, StructuredValue};
use std::borrow::Cow;

/// A key usable in a structured (tree shaped) body.
pub trait StructuredKey {
    /// The name the field is serialized under.
    fn name(&self) -> Cow<'_, str>;

    /// The resolver supplying this field's value when the policy asks for the shared one.
    fn shared_value_resolver(&self) -> Option<SharedResolver<StructuredValue>> {
        None
    }
}

/// A key usable in a flat (`key=value&...`) body.
pub trait FlatKey {
    /// The string written on the left hand side of `=`.
    fn as_flat_str(&self) -> Cow<'_, str>;

    fn shared_value_resolver(&self) -> Option<SharedResolver<FlatValue>> {
        None
    }
}

impl StructuredKey for &'static str {
    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl StructuredKey for String {
    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl FlatKey for &'static str {
    fn as_flat_str(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl FlatKey for String {
    fn as_flat_str(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}
