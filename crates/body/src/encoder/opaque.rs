use crate::body::OpaqueBody;
use crate::encoder::{BodyEncoder, BodyKind};
use crate::strategy::EncodingStrategy;
use crate::EncodingError;
use bytes::Bytes;
use tracing::trace;

/// Identity encoder: hands back the wrapped bytes untouched. Never fails.
#[derive(Debug, Clone)]
pub struct OpaqueEncoder {
    body: OpaqueBody,
}

impl OpaqueEncoder {
    pub fn new<B: Into<OpaqueBody>>(body: B) -> Self {
        Self { body: body.into() }
    }

    pub fn body(&self) -> &OpaqueBody {
        &self.body
    }
}

impl BodyEncoder for OpaqueEncoder {
    fn kind(&self) -> BodyKind {
        BodyKind::Opaque
    }

    fn set_strategy_if_needed(&mut self, strategy: &EncodingStrategy) {
        trace!(strategy = %strategy.kind(), "ignore strategy offered to opaque encoder");
    }

    fn encode(&self) -> Result<Option<Bytes>, EncodingError> {
        Ok(self.body.bytes().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::{FlatStrategy, StructuredStrategy};

    #[test]
    fn test_identity() {
        let payload: Vec<u8> = (0..=255).collect();
        let mut encoder = OpaqueEncoder::new(payload.clone());

        encoder.set_strategy_if_needed(&StructuredStrategy::new().into());
        encoder.set_strategy_if_needed(&FlatStrategy::new().into());

        assert_eq!(encoder.encode().unwrap().unwrap().as_ref(), payload.as_slice());
    }

    #[test]
    fn test_empty_and_absent() {
        assert_eq!(OpaqueEncoder::new(OpaqueBody::empty()).encode().unwrap(), None);
        assert_eq!(OpaqueEncoder::new(Bytes::new()).encode().unwrap(), Some(Bytes::new()));
    }
}
