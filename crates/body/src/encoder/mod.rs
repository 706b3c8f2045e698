//! Body encoders, one per body kind.
//!
//! An encoder borrows nothing beyond one call: it owns the declared body and its
//! strategy slot, and every [`encode`](BodyEncoder::encode) produces a new, independently
//! owned buffer. `Ok(None)` means no body was declared and nothing should be sent.

mod flat;
mod opaque;
mod structured;

pub use flat::FlatEncoder;
pub use opaque::OpaqueEncoder;
pub use structured::StructuredEncoder;

use crate::strategy::EncodingStrategy;
use crate::EncodingError;
use bytes::Bytes;
use std::fmt;

/// The kinds of body an encoder can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Structured,
    Flat,
    Opaque,
}

impl fmt::Display for BodyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structured => f.write_str("structured"),
            Self::Flat => f.write_str("flat"),
            Self::Opaque => f.write_str("opaque"),
        }
    }
}

pub trait BodyEncoder {
    fn kind(&self) -> BodyKind;

    /// Applies `strategy` unless this encoder already holds one.
    ///
    /// Strategies of another body kind are ignored, so a single call site can offer
    /// the same strategy to encoders of every kind.
    fn set_strategy_if_needed(&mut self, strategy: &EncodingStrategy);

    /// Resolves every declared field and serializes the result.
    fn encode(&self) -> Result<Option<Bytes>, EncodingError>;
}

impl<E: BodyEncoder + ?Sized> BodyEncoder for Box<E> {
    fn kind(&self) -> BodyKind {
        (**self).kind()
    }

    fn set_strategy_if_needed(&mut self, strategy: &EncodingStrategy) {
        (**self).set_strategy_if_needed(strategy);
    }

    fn encode(&self) -> Result<Option<Bytes>, EncodingError> {
        (**self).encode()
    }
}

/// Offers `strategy` to `encoder`, then encodes.
pub fn encode_body<E>(encoder: &mut E, strategy: Option<&EncodingStrategy>) -> Result<Option<Bytes>, EncodingError>
where
    E: BodyEncoder + ?Sized,
{
    if let Some(strategy) = strategy {
        encoder.set_strategy_if_needed(strategy);
    }
    encoder.encode()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::OpaqueBody;
    use crate::field::{FlatPair, StructuredPair};
    use crate::strategy::{CharacterEncoding, FlatStrategy, StructuredStrategy};

    #[test]
    fn test_one_strategy_offered_to_every_kind() {
        let flat = FlatStrategy::new().with_character_encoding(CharacterEncoding::Utf16BigEndian);
        let strategy = EncodingStrategy::from(flat);

        let mut encoders: Vec<Box<dyn BodyEncoder>> = vec![
            Box::new(StructuredEncoder::new(vec![StructuredPair::set("a", "1")])),
            Box::new(FlatEncoder::new(vec![FlatPair::set("a", "1")])),
            Box::new(OpaqueEncoder::new(OpaqueBody::new("raw"))),
        ];

        let encoded = encoders
            .iter_mut()
            .map(|encoder| encode_body(encoder, Some(&strategy)).unwrap().unwrap())
            .collect::<Vec<_>>();

        assert_eq!(encoded[0], Bytes::from_static(br#"{"a":"1"}"#));
        assert_eq!(encoded[1], Bytes::from_static(&[0, b'a', 0, b'=', 0, b'1']));
        assert_eq!(encoded[2], Bytes::from_static(b"raw"));
    }

    #[test]
    fn test_encode_body_without_strategy_uses_defaults() {
        let mut encoder = StructuredEncoder::new(vec![StructuredPair::set("a", 1.5)]);
        assert_eq!(encode_body(&mut encoder, None).unwrap().unwrap(), Bytes::from_static(br#"{"a":1.5}"#));

        let strategy = EncodingStrategy::from(StructuredStrategy::new());
        let mut boxed: Box<dyn BodyEncoder> = Box::new(encoder);
        assert_eq!(boxed.kind(), BodyKind::Structured);
        assert!(encode_body(&mut boxed, Some(&strategy)).is_ok());
    }
}
