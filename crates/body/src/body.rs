use crate::field::{FlatPair, StructuredPair};
use crate::key::{FlatKey, StructuredKey};
use bytes::Bytes;
use http_body::Body as HttpBody;
use http_body::{Frame, SizeHint};
use std::convert::Infallible;
use std::pin::Pin;
use std::task::{Context, Poll};

/// A request body declared as a list of structured fields.
///
/// Implemented by request types, `fields` is called once per encode attempt.
/// Returning `None` declares no body at all, which is different from an empty list.
pub trait StructuredBody {
    type Key: StructuredKey;

    fn fields(&self) -> Option<Vec<StructuredPair<Self::Key>>>;
}

/// A request body declared as a list of flat `key=value` fields.
pub trait FlatBody {
    type Key: FlatKey;

    fn fields(&self) -> Option<Vec<FlatPair<Self::Key>>>;
}

impl<K: StructuredKey + Clone> StructuredBody for Vec<StructuredPair<K>> {
    type Key = K;

    fn fields(&self) -> Option<Vec<StructuredPair<K>>> {
        Some(self.clone())
    }
}

impl<K: StructuredKey + Clone> StructuredBody for Option<Vec<StructuredPair<K>>> {
    type Key = K;

    fn fields(&self) -> Option<Vec<StructuredPair<K>>> {
        self.clone()
    }
}

impl<K: FlatKey + Clone> FlatBody for Vec<FlatPair<K>> {
    type Key = K;

    fn fields(&self) -> Option<Vec<FlatPair<K>>> {
        Some(self.clone())
    }
}

impl<K: FlatKey + Clone> FlatBody for Option<Vec<FlatPair<K>>> {
    type Key = K;

    fn fields(&self) -> Option<Vec<FlatPair<K>>> {
        self.clone()
    }
}

/// A body supplied as already formed bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpaqueBody {
    bytes: Option<Bytes>,
}

impl OpaqueBody {
    pub fn empty() -> Self {
        Self { bytes: None }
    }

    pub fn new<B: Into<Bytes>>(bytes: B) -> Self {
        Self { bytes: Some(bytes.into()) }
    }

    pub fn bytes(&self) -> Option<&Bytes> {
        self.bytes.as_ref()
    }
}

impl From<Option<Bytes>> for OpaqueBody {
    fn from(bytes: Option<Bytes>) -> Self {
        Self { bytes }
    }
}

impl From<Bytes> for OpaqueBody {
    fn from(bytes: Bytes) -> Self {
        Self::new(bytes)
    }
}

impl From<Vec<u8>> for OpaqueBody {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl From<&'static [u8]> for OpaqueBody {
    fn from(bytes: &'static [u8]) -> Self {
        Self::new(Bytes::from_static(bytes))
    }
}

/// The encoded payload handed to the transport.
///
/// `None` means "send no body", a present empty buffer is still a body. The
/// transport can tell them apart through [`RequestBody::is_absent`].
#[derive(Debug, Clone)]
pub struct RequestBody {
    inner: Option<Bytes>,
    absent: bool,
}

impl RequestBody {
    pub fn absent() -> Self {
        Self { inner: None, absent: true }
    }

    pub fn once(bytes: Bytes) -> Self {
        Self { inner: Some(bytes), absent: false }
    }

    pub fn is_absent(&self) -> bool {
        self.absent
    }

    /// Returns the payload if it has not been polled yet.
    pub fn into_bytes(self) -> Option<Bytes> {
        self.inner
    }
}

impl Default for RequestBody {
    fn default() -> Self {
        Self::absent()
    }
}

impl From<Option<Bytes>> for RequestBody {
    fn from(option: Option<Bytes>) -> Self {
        match option {
            Some(bytes) => Self::once(bytes),
            None => Self::absent(),
        }
    }
}

impl HttpBody for RequestBody {
    type Data = Bytes;
    type Error = Infallible;

    fn poll_frame(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        Poll::Ready(self.get_mut().inner.take().filter(|bytes| !bytes.is_empty()).map(|bytes| Ok(Frame::data(bytes))))
    }

    fn is_end_stream(&self) -> bool {
        self.inner.as_ref().is_none_or(Bytes::is_empty)
    }

    fn size_hint(&self) -> SizeHint {
        match &self.inner {
            None => SizeHint::with_exact(0),
            Some(bytes) => SizeHint::with_exact(bytes.len() as u64),
        }
    }
}
