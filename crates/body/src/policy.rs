use crate::shared::SharedResolver;
use std::fmt;

/// How a declared field turns into output.
///
/// | policy | local value present | local value absent |
/// |---|---|---|
/// | `UseShared` | ignored, shared value | shared value |
/// | `SetAlways` | value | null (structured), omitted (flat) |
/// | `SetIfPresent` | value | omitted |
/// | `SetIfPresentElseUseShared` | value | shared value |
///
/// "Shared value" means asking the key's resolver: no resolver is an error, a
/// resolver producing nothing yields null.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EncodingPolicy {
    UseShared,
    #[default]
    SetAlways,
    SetIfPresent,
    SetIfPresentElseUseShared,
}

/// Outcome of evaluating a policy for one field.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<V> {
    Value(V),
    /// Explicit null. Flat bodies have no null and omit the field instead.
    Null,
    Omit,
}

/// The key exposes no resolver but the policy needed one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingResolver;

impl EncodingPolicy {
    /// Evaluates the policy against a field's local value.
    ///
    /// `resolver` is only invoked when the policy actually needs the shared value,
    /// a local value satisfying `SetIfPresentElseUseShared` never reaches it.
    pub fn resolve<V, F>(self, local: Option<&V>, resolver: F) -> Result<Resolution<V>, MissingResolver>
    where
        V: Clone,
        F: FnOnce() -> Option<SharedResolver<V>>,
    {
        match (self, local) {
            (Self::UseShared, _) | (Self::SetIfPresentElseUseShared, None) => {
                let resolver = resolver().ok_or(MissingResolver)?;
                Ok(match resolver.resolve_body_value() {
                    Some(value) => Resolution::Value(value),
                    None => Resolution::Null,
                })
            }
            (Self::SetAlways | Self::SetIfPresent | Self::SetIfPresentElseUseShared, Some(value)) => {
                Ok(Resolution::Value(value.clone()))
            }
            (Self::SetAlways, None) => Ok(Resolution::Null),
            (Self::SetIfPresent, None) => Ok(Resolution::Omit),
        }
    }

    pub fn uses_shared_value(self) -> bool {
        matches!(self, Self::UseShared | Self::SetIfPresentElseUseShared)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::UseShared => "use-shared",
            Self::SetAlways => "set-always",
            Self::SetIfPresent => "set-if-present",
            Self::SetIfPresentElseUseShared => "set-if-present-else-use-shared",
        }
    }
}

impl fmt::Display for EncodingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn resolver(value: Option<&'static str>) -> impl FnOnce() -> Option<SharedResolver<String>> {
        move || Some(SharedResolver::new(move || value.map(str::to_string)))
    }

    fn no_resolver() -> Option<SharedResolver<String>> {
        None
    }

    #[test]
    fn test_default_is_set_always() {
        assert_eq!(EncodingPolicy::default(), EncodingPolicy::SetAlways);
    }

    #[test]
    fn test_use_shared_ignores_local() {
        let local = "local".to_string();
        let resolution = EncodingPolicy::UseShared.resolve(Some(&local), resolver(Some("shared")));
        assert_eq!(resolution, Ok(Resolution::Value("shared".to_string())));
    }

    #[test]
    fn test_use_shared_nothing_resolved_is_null() {
        let resolution = EncodingPolicy::UseShared.resolve(None, resolver(None));
        assert_eq!(resolution, Ok(Resolution::Null));
    }

    #[test]
    fn test_use_shared_without_resolver() {
        assert_eq!(EncodingPolicy::UseShared.resolve(None, no_resolver), Err(MissingResolver));
        assert_eq!(EncodingPolicy::SetIfPresentElseUseShared.resolve(None, no_resolver), Err(MissingResolver));
    }

    #[test]
    fn test_local_value_skips_resolver_lookup() {
        let lookups = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&lookups);
        let local = "local".to_string();

        let resolution = EncodingPolicy::SetIfPresentElseUseShared.resolve(Some(&local), move || {
            counter.fetch_add(1, Ordering::SeqCst);
            no_resolver()
        });

        assert_eq!(resolution, Ok(Resolution::Value(local)));
        assert_eq!(lookups.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_set_policies_without_local() {
        assert_eq!(EncodingPolicy::SetAlways.resolve(None, no_resolver), Ok(Resolution::Null));
        assert_eq!(EncodingPolicy::SetIfPresent.resolve(None, no_resolver), Ok(Resolution::Omit));
    }

    #[test]
    fn test_display() {
        assert_eq!(EncodingPolicy::SetIfPresentElseUseShared.to_string(), "set-if-present-else-use-shared");
        assert!(EncodingPolicy::UseShared.uses_shared_value());
        assert!(!EncodingPolicy::SetIfPresent.uses_shared_value());
    }
}
