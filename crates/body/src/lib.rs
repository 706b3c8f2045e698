//! Declarative, policy driven request body encoding for http clients
//!
//! A request type declares *which* fields its body contains, each field carrying a key,
//! an optional local value and an [`EncodingPolicy`]. An encoder resolves every policy,
//! falling back to values shared across requests where asked to, and serializes the
//! result under a pluggable, per body kind [`EncodingStrategy`].
//!
//! # Example
//!
//! ```
//! use micro_body::{
//!     encode_body, DateStrategy, EncodingStrategy, SharedResolver, StructuredBody, StructuredEncoder,
//!     StructuredKey, StructuredPair, StructuredStrategy, StructuredValue,
//! };
//! use std::borrow::Cow;
//!
//! #[derive(Debug, Clone)]
//! enum Param {
//!     Name,
//!     Token,
//! }
//!
//! impl StructuredKey for Param {
//!     fn name(&self) -> Cow<'_, str> {
//!         match self {
//!             Param::Name => Cow::Borrowed("name"),
//!             Param::Token => Cow::Borrowed("token"),
//!         }
//!     }
//!
//!     fn shared_value_resolver(&self) -> Option<SharedResolver<StructuredValue>> {
//!         match self {
//!             Param::Name => None,
//!             // usually backed by a session store
//!             Param::Token => Some(SharedResolver::new(|| Some(StructuredValue::from("s3cr3t")))),
//!         }
//!     }
//! }
//!
//! struct UpdateProfile {
//!     name: Option<String>,
//! }
//!
//! impl StructuredBody for UpdateProfile {
//!     type Key = Param;
//!
//!     fn fields(&self) -> Option<Vec<StructuredPair<Param>>> {
//!         Some(vec![
//!             StructuredPair::set_if_present(Param::Name, self.name.clone()),
//!             StructuredPair::shared(Param::Token),
//!         ])
//!     }
//! }
//!
//! let mut encoder = StructuredEncoder::new(UpdateProfile { name: Some("zava".into()) });
//! let strategy = EncodingStrategy::from(StructuredStrategy::new().with_date(DateStrategy::Iso8601));
//!
//! let bytes = encode_body(&mut encoder, Some(&strategy)).unwrap().unwrap();
//! assert_eq!(&bytes[..], br#"{"name":"zava","token":"s3cr3t"}"#);
//! ```
//!
//! # Architecture
//!
//! - [`StructuredKey`] / [`FlatKey`]: field identifiers, optionally exposing a
//!   [`SharedResolver`] for values living outside the request
//! - [`FieldPair`]: one declared field, see [`StructuredPair`] and [`FlatPair`]
//! - [`StructuredBody`] / [`FlatBody`] / [`OpaqueBody`]: the declarative surface
//! - [`StructuredEncoder`] / [`FlatEncoder`] / [`OpaqueEncoder`]: the [`BodyEncoder`]s
//! - [`RequestEncoder`]: offers default strategies and attaches the payload to an
//!   [`http::Request`]
//! - [`describe`]: read only, human readable views for logging
//!
//! # Null versus omission
//!
//! Structured output writes an explicit `null` for a `SetAlways` field without a value
//! and for a shared value resolving to nothing. Flat output has no null and omits those
//! fields instead.
//!
//! # Error Handling
//!
//! - [`EncodingError`]: failure of a single encode call, never a partial body
//! - [`RequestError`]: encoding or request building failure

mod body;
mod encoder;
mod error;
mod field;
mod key;
mod policy;
mod request;
mod shared;
mod strategy;
mod value;

pub mod describe;

pub use body::{FlatBody, OpaqueBody, RequestBody, StructuredBody};
pub use encoder::{encode_body, BodyEncoder, BodyKind, FlatEncoder, OpaqueEncoder, StructuredEncoder};
pub use error::{EncodingError, RequestError};
pub use field::{FieldPair, FlatPair, StructuredPair};
pub use key::{FlatKey, StructuredKey};
pub use policy::{EncodingPolicy, MissingResolver, Resolution};
pub use request::RequestEncoder;
pub use shared::{SharedResolver, SharedValue, SharedValueResolver};
pub use strategy::{
    BinaryStrategy, CharacterEncoding, DateStrategy, EncodingStrategy, FlatStrategy, FloatStrategy, FormEscaping,
    OutputFormatting, StrategyKind, StructuredStrategy,
};
pub use value::{CustomValue, FlatValue, StructuredValue};
