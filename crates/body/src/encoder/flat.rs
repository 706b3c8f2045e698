use crate::body::FlatBody;
use crate::encoder::{BodyEncoder, BodyKind};
use crate::key::FlatKey;
use crate::strategy::{EncodingStrategy, FlatStrategy, FormEscaping, StrategySlot};
use crate::EncodingError;
use bytes::Bytes;
use tracing::{debug, trace, warn};

/// Encodes a [`FlatBody`] as `key=value` segments joined with `&`.
///
/// Flat output has no null: a `SetAlways` field without a value, or a shared value
/// resolving to nothing, is omitted rather than written. A declared body whose
/// fields are all omitted still yields a present, empty buffer.
#[derive(Debug)]
pub struct FlatEncoder<B> {
    body: B,
    strategy: StrategySlot<FlatStrategy>,
}

impl<B: FlatBody> FlatEncoder<B> {
    pub fn new(body: B) -> Self {
        Self { body, strategy: StrategySlot::new() }
    }

    #[must_use]
    pub fn with_strategy(mut self, strategy: FlatStrategy) -> Self {
        self.strategy.set_if_needed(&strategy);
        self
    }

    pub fn body(&self) -> &B {
        &self.body
    }

    pub fn strategy(&self) -> Option<&FlatStrategy> {
        self.strategy.get()
    }

    fn encode_fields(&self) -> Result<Option<Bytes>, EncodingError> {
        let Some(fields) = self.body.fields() else {
            trace!("no flat body declared");
            return Ok(None);
        };

        let strategy = self.strategy.active();
        let mut segments = Vec::with_capacity(fields.len());
        for field in &fields {
            if let Some(value) = field.resolve()? {
                segments.push((field.key().as_flat_str().into_owned(), value.into_string()));
            }
        }

        let joined = match strategy.escaping() {
            FormEscaping::None => {
                segments.iter().map(|(key, value)| format!("{key}={value}")).collect::<Vec<_>>().join("&")
            }
            FormEscaping::FormUrlEncoded => serde_urlencoded::to_string(&segments)?,
        };

        let buf = strategy.character_encoding().encode(&joined)?;
        debug!(
            kind = %BodyKind::Flat,
            fields = fields.len(),
            segments = segments.len(),
            encoding = %strategy.character_encoding(),
            len = buf.len(),
            "encoded body"
        );
        Ok(Some(Bytes::from(buf)))
    }
}

impl<B: FlatBody> BodyEncoder for FlatEncoder<B> {
    fn kind(&self) -> BodyKind {
        BodyKind::Flat
    }

    fn set_strategy_if_needed(&mut self, strategy: &EncodingStrategy) {
        match strategy {
            EncodingStrategy::Flat(strategy) => {
                if !self.strategy.set_if_needed(strategy) {
                    trace!("flat strategy already set, keep the first one");
                }
            }
            EncodingStrategy::Structured(_) => trace!("ignore structured strategy offered to flat encoder"),
        }
    }

    fn encode(&self) -> Result<Option<Bytes>, EncodingError> {
        self.encode_fields().inspect_err(|e| warn!(cause = %e, "failed to encode flat body"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FlatPair;
    use crate::policy::EncodingPolicy;
    use crate::shared::SharedResolver;
    use crate::strategy::{CharacterEncoding, StructuredStrategy};
    use crate::value::FlatValue;
    use std::borrow::Cow;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Clone)]
    enum Param {
        Grant,
        Session { lookups: Arc<AtomicUsize>, value: Option<&'static str> },
        Orphan,
    }

    impl FlatKey for Param {
        fn as_flat_str(&self) -> Cow<'_, str> {
            match self {
                Param::Grant => Cow::Borrowed("grant_type"),
                Param::Session { .. } => Cow::Borrowed("session"),
                Param::Orphan => Cow::Borrowed("orphan"),
            }
        }

        fn shared_value_resolver(&self) -> Option<SharedResolver<FlatValue>> {
            match self {
                Param::Grant | Param::Orphan => None,
                Param::Session { lookups, value } => {
                    let lookups = Arc::clone(lookups);
                    let value = *value;
                    Some(SharedResolver::new(move || {
                        lookups.fetch_add(1, Ordering::SeqCst);
                        value.map(FlatValue::from)
                    }))
                }
            }
        }
    }

    fn session(value: Option<&'static str>) -> (Param, Arc<AtomicUsize>) {
        let lookups = Arc::new(AtomicUsize::new(0));
        (Param::Session { lookups: Arc::clone(&lookups), value }, lookups)
    }

    fn encode<B: FlatBody>(body: B) -> Result<Option<Bytes>, EncodingError> {
        FlatEncoder::new(body).encode()
    }

    fn encode_str<B: FlatBody>(body: B) -> String {
        let bytes = encode(body).unwrap().expect("body should be present");
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_joined_pairs() {
        let body = vec![FlatPair::set("a", "1"), FlatPair::set("b", "2")];
        assert_eq!(encode(body).unwrap(), Some(Bytes::from_static(b"a=1&b=2")));
    }

    // the eight policy x local value combinations

    #[test]
    fn test_use_shared_with_local_value() {
        let (key, lookups) = session(Some("shared"));
        let body = vec![FlatPair::new(key, Some("local"), EncodingPolicy::UseShared)];
        assert_eq!(encode_str(body), "session=shared");
        assert_eq!(lookups.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_use_shared_without_local_value() {
        let (key, _) = session(Some("shared"));
        let body = vec![FlatPair::shared(key)];
        assert_eq!(encode_str(body), "session=shared");
    }

    #[test]
    fn test_set_always_with_local_value() {
        let (key, lookups) = session(Some("shared"));
        let body = vec![FlatPair::new(key, Some("local"), EncodingPolicy::SetAlways)];
        assert_eq!(encode_str(body), "session=local");
        assert_eq!(lookups.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_set_always_without_local_value_is_omitted() {
        let (key, lookups) = session(Some("shared"));
        let body = vec![
            FlatPair::set(Param::Grant, "password"),
            FlatPair::new(key, None::<&str>, EncodingPolicy::SetAlways),
        ];
        assert_eq!(encode_str(body), "grant_type=password");
        assert_eq!(lookups.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_set_if_present_with_local_value() {
        let (key, _) = session(Some("shared"));
        let body = vec![FlatPair::set_if_present(key, Some("local"))];
        assert_eq!(encode_str(body), "session=local");
    }

    #[test]
    fn test_set_if_present_without_local_value_is_omitted() {
        let (key, lookups) = session(Some("shared"));
        let body = vec![FlatPair::set_if_present(key, None::<&str>)];
        assert_eq!(encode_str(body), "");
        assert_eq!(lookups.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_set_if_present_else_shared_with_local_value_never_resolves() {
        let (key, lookups) = session(Some("shared"));
        let body = vec![FlatPair::set_if_present_else_shared(key, Some("local"))];
        assert_eq!(encode_str(body), "session=local");
        assert_eq!(lookups.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_set_if_present_else_shared_without_local_value() {
        let (key, lookups) = session(Some("shared"));
        let body = vec![FlatPair::set_if_present_else_shared(key, None::<&str>)];
        assert_eq!(encode_str(body), "session=shared");
        assert_eq!(lookups.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_shared_value_absent_is_omitted() {
        let (key, _) = session(None);
        let body = vec![FlatPair::shared(key), FlatPair::set(Param::Grant, "password")];
        assert_eq!(encode_str(body), "grant_type=password");
    }

    #[test]
    fn test_use_shared_without_resolver_fails() {
        let body = vec![FlatPair::set(Param::Grant, "password"), FlatPair::shared(Param::Orphan)];
        let err = encode(body).unwrap_err();
        assert!(matches!(err, EncodingError::MissingSharedValue { ref key } if key == "orphan"));
    }

    #[test]
    fn test_declaration_order_is_kept() {
        let body = vec![FlatPair::set("z", 1), FlatPair::set("a", 2), FlatPair::set("m", 3)];
        assert_eq!(encode_str(body), "z=1&a=2&m=3");
    }

    #[test]
    fn test_absent_and_empty_bodies() {
        assert_eq!(encode(None::<Vec<FlatPair<&str>>>).unwrap(), None);
        assert_eq!(encode(Vec::<FlatPair<&str>>::new()).unwrap(), Some(Bytes::new()));

        let all_omitted = vec![FlatPair::<&str>::set_if_present("a", None::<&str>)];
        assert_eq!(encode(all_omitted).unwrap(), Some(Bytes::new()));
    }

    #[test]
    fn test_character_encoding_failure_is_surfaced() {
        let encoder = FlatEncoder::new(vec![FlatPair::set("name", "café")])
            .with_strategy(FlatStrategy::new().with_character_encoding(CharacterEncoding::Ascii));
        let err = encoder.encode().unwrap_err();
        assert!(matches!(err, EncodingError::CharacterEncoding { character: 'é', position: 8, .. }));

        let encoder = FlatEncoder::new(vec![FlatPair::set("name", "café")])
            .with_strategy(FlatStrategy::new().with_character_encoding(CharacterEncoding::IsoLatin1));
        assert_eq!(encoder.encode().unwrap().unwrap(), Bytes::from_static(b"name=caf\xe9"));
    }

    #[test]
    fn test_form_url_encoded_escaping() {
        let body = vec![FlatPair::set("q", "a b&c"), FlatPair::set("x", "é")];
        let strategy = FlatStrategy::new().with_escaping(FormEscaping::FormUrlEncoded);
        let encoder = FlatEncoder::new(body).with_strategy(strategy);
        assert_eq!(encoder.encode().unwrap().unwrap(), Bytes::from_static(b"q=a+b%26c&x=%C3%A9"));
    }

    #[test]
    fn test_strategy_first_write_wins() {
        let mut encoder = FlatEncoder::new(vec![FlatPair::set("a", "1")]);

        encoder.set_strategy_if_needed(&StructuredStrategy::new().into());
        assert!(encoder.strategy().is_none());

        let utf16 = FlatStrategy::new().with_character_encoding(CharacterEncoding::Utf16LittleEndian);
        encoder.set_strategy_if_needed(&utf16.into());
        encoder.set_strategy_if_needed(&FlatStrategy::new().with_character_encoding(CharacterEncoding::Ascii).into());

        assert_eq!(encoder.strategy().unwrap().character_encoding(), CharacterEncoding::Utf16LittleEndian);
        assert_eq!(encoder.encode().unwrap().unwrap(), Bytes::from_static(&[b'a', 0, b'=', 0, b'1', 0]));
    }
}
