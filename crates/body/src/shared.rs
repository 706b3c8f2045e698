//! Shared values: field values that live outside of the request being encoded.
//!
//! A key may expose a [`SharedValueResolver`], which is consulted whenever a field's
//! [`EncodingPolicy`](crate::EncodingPolicy) asks for the shared value. The classic
//! example is an authentication token owned by a session store: every request body
//! declares the field, none of them carries the value.
//!
//! Resolution has two distinct "nothing" outcomes that callers must not confuse:
//!
//! - the key has **no resolver**: a configuration defect, encoding fails with
//!   [`EncodingError::MissingSharedValue`](crate::EncodingError::MissingSharedValue)
//! - the resolver **returns nothing** (or a value without a body representation):
//!   the value is shared but intentionally absent, and is encoded as an explicit null

use std::fmt;
use std::sync::Arc;

/// A value handed out by a [`SharedValueResolver`].
///
/// The value may have no representation in a given body flavor, in which case
/// [`body_value`](SharedValue::body_value) returns `None` and the field is treated
/// as intentionally absent.
pub trait SharedValue<V> {
    fn body_value(&self) -> Option<V>;
}

impl<V: Clone> SharedValue<V> for V {
    fn body_value(&self) -> Option<V> {
        Some(self.clone())
    }
}

/// Produces the fallback value of a field from state outside the request.
///
/// Resolvers are shared between requests, so they must be `Send + Sync`; keeping
/// their state consistent across threads is the resolver owner's business.
///
/// Any `Fn() -> Option<V>` closure is a resolver.
pub trait SharedValueResolver<V>: Send + Sync {
    fn resolve(&self) -> Option<Box<dyn SharedValue<V>>>;
}

impl<V, F> SharedValueResolver<V> for F
where
    V: Clone + 'static,
    F: Fn() -> Option<V> + Send + Sync,
{
    fn resolve(&self) -> Option<Box<dyn SharedValue<V>>> {
        (self)().map(|value| Box::new(value) as Box<dyn SharedValue<V>>)
    }
}

/// A cheaply clonable handle to a resolver, the form keys hand out.
pub struct SharedResolver<V> {
    inner: Arc<dyn SharedValueResolver<V>>,
}

impl<V> SharedResolver<V> {
    pub fn new<R>(resolver: R) -> Self
    where
        R: SharedValueResolver<V> + 'static,
    {
        Self { inner: Arc::new(resolver) }
    }

    pub fn from_arc(inner: Arc<dyn SharedValueResolver<V>>) -> Self {
        Self { inner }
    }

    /// Asks the resolver for its current value, flattening both kinds of absence.
    pub fn resolve_body_value(&self) -> Option<V> {
        self.inner.resolve().and_then(|shared| shared.body_value())
    }
}

impl<V> Clone for SharedResolver<V> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<V> fmt::Debug for SharedResolver<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedResolver(..)")
    }
}
