//! The seam between body encoding and the request building layer.
//!
//! [`RequestEncoder`] carries the default strategy of every body kind. When a
//! request is built it offers all of them to the request's encoder, which keeps the
//! one of its own kind unless the caller already chose a strategy, then attaches the
//! encoded payload to an [`http::Request`].
//!
//! Content type is left to the caller.

use crate::body::RequestBody;
use crate::encoder::BodyEncoder;
use crate::error::RequestError;
use crate::strategy::{EncodingStrategy, FlatStrategy, StructuredStrategy};
use http::Request;
use http::request::Builder;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct RequestEncoder {
    structured: StructuredStrategy,
    flat: FlatStrategy,
}

impl RequestEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn structured(mut self, strategy: StructuredStrategy) -> Self {
        self.structured = strategy;
        self
    }

    #[must_use]
    pub fn flat(mut self, strategy: FlatStrategy) -> Self {
        self.flat = strategy;
        self
    }

    /// The default strategies in the order they are offered.
    pub fn strategies(&self) -> [EncodingStrategy; 2] {
        [EncodingStrategy::Structured(self.structured.clone()), EncodingStrategy::Flat(self.flat.clone())]
    }

    /// Applies the defaults to `encoder` and returns its payload, `None` meaning no body.
    pub fn encode<E>(&self, mut encoder: E) -> Result<RequestBody, RequestError>
    where
        E: BodyEncoder,
    {
        for strategy in &self.strategies() {
            encoder.set_strategy_if_needed(strategy);
        }
        let payload = encoder.encode()?;
        debug!(kind = %encoder.kind(), present = payload.is_some(), "encoded request body");
        Ok(RequestBody::from(payload))
    }

    /// Encodes the body and finishes `builder` with it.
    pub fn build<E>(&self, builder: Builder, encoder: E) -> Result<Request<RequestBody>, RequestError>
    where
        E: BodyEncoder,
    {
        let body = self.encode(encoder)?;
        Ok(builder.body(body)?)
    }
}
