use crate::key::{FlatKey, StructuredKey};
use crate::policy::{EncodingPolicy, MissingResolver, Resolution};
use crate::value::{FlatValue, StructuredValue};
use crate::EncodingError;
use tracing::trace;

/// One declared field of a body: a key, an optional local value and the policy
/// deciding how the two become output.
///
/// Pairs are immutable once built. A pair built with [`EncodingPolicy::UseShared`]
/// never carries a local value, whatever was passed in.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldPair<K, V> {
    key: K,
    value: Option<V>,
    policy: EncodingPolicy,
}

/// A field of a [`StructuredBody`](crate::StructuredBody).
pub type StructuredPair<K> = FieldPair<K, StructuredValue>;

/// A field of a [`FlatBody`](crate::FlatBody).
pub type FlatPair<K> = FieldPair<K, FlatValue>;

impl<K, V> FieldPair<K, V> {
    pub fn new<T: Into<V>>(key: K, value: Option<T>, policy: EncodingPolicy) -> Self {
        let value = match policy {
            EncodingPolicy::UseShared => None,
            _ => value.map(Into::into),
        };
        Self { key, value, policy }
    }

    /// A field whose value always comes from the key's shared value resolver.
    pub fn shared(key: K) -> Self {
        Self { key, value: None, policy: EncodingPolicy::UseShared }
    }

    /// A field with the default [`EncodingPolicy::SetAlways`] policy.
    pub fn set<T: Into<V>>(key: K, value: T) -> Self {
        Self::new(key, Some(value), EncodingPolicy::SetAlways)
    }

    pub fn set_if_present<T: Into<V>>(key: K, value: Option<T>) -> Self {
        Self::new(key, value, EncodingPolicy::SetIfPresent)
    }

    pub fn set_if_present_else_shared<T: Into<V>>(key: K, value: Option<T>) -> Self {
        Self::new(key, value, EncodingPolicy::SetIfPresentElseUseShared)
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    pub fn policy(&self) -> EncodingPolicy {
        self.policy
    }
}

impl<K: StructuredKey> StructuredPair<K> {
    pub(crate) fn resolve(&self) -> Result<Resolution<StructuredValue>, EncodingError> {
        let resolution = self
            .policy
            .resolve(self.value.as_ref(), || StructuredKey::shared_value_resolver(&self.key))
            .map_err(|MissingResolver| EncodingError::missing_shared_value(self.key.name()))?;
        trace!(
            key = %self.key.name(),
            policy = %self.policy,
            outcome = resolution_name(&resolution),
            "resolved structured field"
        );
        Ok(resolution)
    }
}

impl<K: FlatKey> FlatPair<K> {
    /// Flat output has no null, so a null resolution comes back as `None` like an omitted one.
    pub(crate) fn resolve(&self) -> Result<Option<FlatValue>, EncodingError> {
        let resolution = self
            .policy
            .resolve(self.value.as_ref(), || FlatKey::shared_value_resolver(&self.key))
            .map_err(|MissingResolver| EncodingError::missing_shared_value(self.key.as_flat_str()))?;
        trace!(
            key = %self.key.as_flat_str(),
            policy = %self.policy,
            outcome = resolution_name(&resolution),
            "resolved flat field"
        );
        Ok(match resolution {
            Resolution::Value(value) => Some(value),
            Resolution::Null | Resolution::Omit => None,
        })
    }
}

fn resolution_name<V>(resolution: &Resolution<V>) -> &'static str {
    match resolution {
        Resolution::Value(_) => "value",
        Resolution::Null => "null",
        Resolution::Omit => "omit",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_constructor() {
        let pair = StructuredPair::shared("token");
        assert_eq!(pair.policy(), EncodingPolicy::UseShared);
        assert_eq!(pair.value(), None);
    }

    #[test]
    fn test_use_shared_drops_local_value() {
        let pair = StructuredPair::new("token", Some("ignored"), EncodingPolicy::UseShared);
        assert_eq!(pair.value(), None);

        let pair = FlatPair::new("token", Some("ignored"), EncodingPolicy::UseShared);
        assert_eq!(pair.value(), None);
    }

    #[test]
    fn test_set_defaults_to_set_always() {
        let pair = FlatPair::set("a", 1);
        assert_eq!(pair.policy(), EncodingPolicy::SetAlways);
        assert_eq!(pair.value(), Some(&FlatValue::from("1")));
        assert_eq!(*pair.key(), "a");
    }

    #[test]
    fn test_flat_null_is_omitted() {
        let pair = FlatPair::<&str>::new("a", None::<&str>, EncodingPolicy::SetAlways);
        assert_eq!(pair.resolve().unwrap(), None);
    }

    #[test]
    fn test_missing_resolver_names_key() {
        let err = StructuredPair::shared("token").resolve().unwrap_err();
        assert!(matches!(err, EncodingError::MissingSharedValue { ref key } if key == "token"));

        let err = FlatPair::<&str>::set_if_present_else_shared("session", None::<&str>).resolve().unwrap_err();
        assert_eq!(err.key(), Some("session"));
    }
}
