//! Encoding strategies, one per body kind.
//!
//! A strategy is offered to an encoder through
//! [`BodyEncoder::set_strategy_if_needed`](crate::BodyEncoder::set_strategy_if_needed).
//! The encoder keeps the first strategy of its own kind and ignores everything
//! else, so an outer request building layer can offer its defaults to any encoder
//! without overriding what the caller chose.

mod flat;
mod serializer;
mod structured;

pub use flat::{CharacterEncoding, FlatStrategy, FormEscaping};
pub use structured::{BinaryStrategy, DateStrategy, FloatStrategy, OutputFormatting, StructuredStrategy};

pub(crate) use serializer::StrategySerializer;

use once_cell::unsync::OnceCell;
use std::fmt;

/// A strategy tagged with the body kind it applies to.
#[derive(Debug, Clone)]
pub enum EncodingStrategy {
    Structured(StructuredStrategy),
    Flat(FlatStrategy),
}

/// Which body kind a strategy configures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    Structured,
    Flat,
}

impl EncodingStrategy {
    pub fn kind(&self) -> StrategyKind {
        match self {
            Self::Structured(_) => StrategyKind::Structured,
            Self::Flat(_) => StrategyKind::Flat,
        }
    }
}

impl From<StructuredStrategy> for EncodingStrategy {
    fn from(strategy: StructuredStrategy) -> Self {
        Self::Structured(strategy)
    }
}

impl From<FlatStrategy> for EncodingStrategy {
    fn from(strategy: FlatStrategy) -> Self {
        Self::Flat(strategy)
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structured => f.write_str("structured"),
            Self::Flat => f.write_str("flat"),
        }
    }
}

/// A write once strategy slot owned by one encoder.
///
/// The slot is deliberately `!Sync`: strategies must not be shared while they are
/// still being assigned.
pub(crate) struct StrategySlot<S> {
    cell: OnceCell<S>,
}

impl<S: Clone + Default> StrategySlot<S> {
    pub(crate) fn new() -> Self {
        Self { cell: OnceCell::new() }
    }

    /// Stores `strategy` unless a strategy is already stored, returns whether it was stored.
    pub(crate) fn set_if_needed(&mut self, strategy: &S) -> bool {
        if self.cell.get().is_some() {
            return false;
        }
        self.cell.set(strategy.clone()).is_ok()
    }

    pub(crate) fn get(&self) -> Option<&S> {
        self.cell.get()
    }

    /// The stored strategy, or the default one when nothing was ever assigned.
    pub(crate) fn active(&self) -> S {
        self.cell.get().cloned().unwrap_or_default()
    }
}

impl<S: fmt::Debug> fmt::Debug for StrategySlot<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StrategySlot").field(&self.cell.get()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_first_write_wins() {
        let mut slot: StrategySlot<FlatStrategy> = StrategySlot::new();
        assert!(slot.get().is_none());
        assert_eq!(slot.active().character_encoding(), CharacterEncoding::Utf8);

        assert!(slot.set_if_needed(&FlatStrategy::new().with_character_encoding(CharacterEncoding::Ascii)));
        assert!(!slot.set_if_needed(&FlatStrategy::new().with_character_encoding(CharacterEncoding::IsoLatin1)));

        assert_eq!(slot.active().character_encoding(), CharacterEncoding::Ascii);
    }

    #[test]
    fn test_kind() {
        assert_eq!(EncodingStrategy::from(FlatStrategy::new()).kind(), StrategyKind::Flat);
        assert_eq!(EncodingStrategy::from(StructuredStrategy::new()).kind(), StrategyKind::Structured);
        assert_eq!(StrategyKind::Structured.to_string(), "structured");
    }
}
