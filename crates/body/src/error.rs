use crate::strategy::CharacterEncoding;
use thiserror::Error;

/// Everything that can abort a single encode call.
///
/// Every variant is terminal for the call that produced it: encoding is all or
/// nothing, a failing field never yields a partially encoded body.
#[derive(Error, Debug)]
pub enum EncodingError {
    #[error("field `{key}` requires a shared value, but its key exposes no shared value resolver")]
    MissingSharedValue { key: String },

    #[error("failed to encode value of field `{key}`: {source}")]
    ValueEncoding {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("character {character:?} at byte {position} can't be represented in {encoding}")]
    CharacterEncoding { encoding: CharacterEncoding, character: char, position: usize },

    #[error("failed to escape form body: {source}")]
    FormEscaping {
        #[from]
        source: serde_urlencoded::ser::Error,
    },

    #[error("failed to serialize body: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
}

impl EncodingError {
    pub fn missing_shared_value<S: ToString>(key: S) -> Self {
        Self::MissingSharedValue { key: key.to_string() }
    }

    pub fn value_encoding<S: ToString>(key: S, source: serde_json::Error) -> Self {
        Self::ValueEncoding { key: key.to_string(), source }
    }

    pub fn character_encoding(encoding: CharacterEncoding, character: char, position: usize) -> Self {
        Self::CharacterEncoding { encoding, character, position }
    }

    /// The offending field's key, when the failure is attributable to one field.
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::MissingSharedValue { key } | Self::ValueEncoding { key, .. } => Some(key),
            Self::CharacterEncoding { .. } | Self::FormEscaping { .. } | Self::Serialization { .. } => None,
        }
    }
}

/// Failure of the request building seam, see [`crate::RequestEncoder`].
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("body encoding error: {source}")]
    Encoding {
        #[from]
        source: EncodingError,
    },

    #[error("http error: {source}")]
    Http {
        #[from]
        source: http::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::ser::Error as _;

    #[test]
    fn test_missing_shared_value_names_key() {
        let err = EncodingError::missing_shared_value("token");
        assert_eq!(err.key(), Some("token"));
        assert_eq!(
            err.to_string(),
            "field `token` requires a shared value, but its key exposes no shared value resolver"
        );
    }

    #[test]
    fn test_character_encoding_has_no_key() {
        let err = EncodingError::character_encoding(CharacterEncoding::Ascii, 'é', 3);
        assert_eq!(err.key(), None);
        assert_eq!(err.to_string(), "character 'é' at byte 3 can't be represented in ascii");
    }

    #[test]
    fn test_request_error_from_encoding_error() {
        let source = serde_json::Error::custom("boom");
        let err: RequestError = EncodingError::value_encoding("name", source).into();
        assert!(matches!(err, RequestError::Encoding { source: EncodingError::ValueEncoding { .. } }));
        assert_eq!(err.to_string(), "body encoding error: failed to encode value of field `name`: boom");
    }
}
