use crate::body::StructuredBody;
use crate::encoder::{BodyEncoder, BodyKind};
use crate::key::StructuredKey;
use crate::policy::Resolution;
use crate::strategy::{EncodingStrategy, OutputFormatting, StrategySlot, StructuredStrategy};
use crate::EncodingError;
use bytes::Bytes;
use serde_json::{Map, Value};
use tracing::{debug, trace, warn};

/// Encodes a [`StructuredBody`] as a JSON object.
///
/// Keys appear in declaration order. A field resolving to null is written as an
/// explicit `null`, an omitted field is left out.
#[derive(Debug)]
pub struct StructuredEncoder<B> {
    body: B,
    strategy: StrategySlot<StructuredStrategy>,
}

impl<B: StructuredBody> StructuredEncoder<B> {
    pub fn new(body: B) -> Self {
        Self { body, strategy: StrategySlot::new() }
    }

    /// Same first-write-wins rule as [`BodyEncoder::set_strategy_if_needed`].
    #[must_use]
    pub fn with_strategy(mut self, strategy: StructuredStrategy) -> Self {
        self.strategy.set_if_needed(&strategy);
        self
    }

    pub fn body(&self) -> &B {
        &self.body
    }

    /// The assigned strategy, `None` until one is set.
    pub fn strategy(&self) -> Option<&StructuredStrategy> {
        self.strategy.get()
    }

    fn encode_fields(&self) -> Result<Option<Bytes>, EncodingError> {
        let Some(fields) = self.body.fields() else {
            trace!("no structured body declared");
            return Ok(None);
        };

        let strategy = self.strategy.active();
        let mut document = Map::with_capacity(fields.len());
        for field in &fields {
            let value = match field.resolve()? {
                Resolution::Value(value) => {
                    strategy.render(&value).map_err(|e| EncodingError::value_encoding(field.key().name(), e))?
                }
                Resolution::Null => Value::Null,
                Resolution::Omit => continue,
            };
            document.insert(field.key().name().into_owned(), value);
        }

        let document = Value::Object(document);
        let buf = match strategy.formatting() {
            OutputFormatting::Compact => serde_json::to_vec(&document)?,
            OutputFormatting::Pretty => serde_json::to_vec_pretty(&document)?,
        };
        debug!(kind = %BodyKind::Structured, fields = fields.len(), len = buf.len(), "encoded body");
        Ok(Some(Bytes::from(buf)))
    }
}

impl<B: StructuredBody> BodyEncoder for StructuredEncoder<B> {
    fn kind(&self) -> BodyKind {
        BodyKind::Structured
    }

    fn set_strategy_if_needed(&mut self, strategy: &EncodingStrategy) {
        match strategy {
            EncodingStrategy::Structured(strategy) => {
                if !self.strategy.set_if_needed(strategy) {
                    trace!("structured strategy already set, keep the first one");
                }
            }
            EncodingStrategy::Flat(_) => trace!("ignore flat strategy offered to structured encoder"),
        }
    }

    fn encode(&self) -> Result<Option<Bytes>, EncodingError> {
        self.encode_fields().inspect_err(|e| warn!(cause = %e, "failed to encode structured body"))
    }
}
