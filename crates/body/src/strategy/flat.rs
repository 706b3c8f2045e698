use crate::EncodingError;
use std::fmt;

/// Character encoding of a flat body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CharacterEncoding {
    #[default]
    Utf8,
    /// 7-bit ASCII, anything above `U+007F` fails.
    Ascii,
    /// ISO-8859-1, anything above `U+00FF` fails.
    IsoLatin1,
    /// UTF-16 little endian, preceded by a byte order mark.
    Utf16,
    Utf16BigEndian,
    Utf16LittleEndian,
}

impl CharacterEncoding {
    pub fn name(self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Ascii => "ascii",
            Self::IsoLatin1 => "iso-8859-1",
            Self::Utf16 => "utf-16",
            Self::Utf16BigEndian => "utf-16be",
            Self::Utf16LittleEndian => "utf-16le",
        }
    }

    /// Encodes `text`, failing on the first character the encoding can't represent.
    ///
    /// An empty text always encodes to an empty buffer, the UTF-16 byte order mark included.
    pub fn encode(self, text: &str) -> Result<Vec<u8>, EncodingError> {
        match self {
            Self::Utf8 => Ok(text.as_bytes().to_vec()),
            Self::Ascii => self.encode_single_byte(text, 0x7F),
            Self::IsoLatin1 => self.encode_single_byte(text, 0xFF),
            Self::Utf16 if text.is_empty() => Ok(Vec::new()),
            Self::Utf16 => {
                let mut buf = Vec::with_capacity(2 + text.len() * 2);
                buf.extend_from_slice(&[0xFF, 0xFE]);
                text.encode_utf16().for_each(|unit| buf.extend_from_slice(&unit.to_le_bytes()));
                Ok(buf)
            }
            Self::Utf16BigEndian => Ok(text.encode_utf16().flat_map(u16::to_be_bytes).collect()),
            Self::Utf16LittleEndian => Ok(text.encode_utf16().flat_map(u16::to_le_bytes).collect()),
        }
    }

    fn encode_single_byte(self, text: &str, max: u32) -> Result<Vec<u8>, EncodingError> {
        let mut buf = Vec::with_capacity(text.len());
        for (position, character) in text.char_indices() {
            match u8::try_from(u32::from(character)) {
                Ok(byte) if u32::from(byte) <= max => buf.push(byte),
                _ => return Err(EncodingError::character_encoding(self, character, position)),
            }
        }
        Ok(buf)
    }
}

impl fmt::Display for CharacterEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether keys and values of a flat body are escaped before joining.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormEscaping {
    /// Written as given: `key=value` segments joined with `&`.
    #[default]
    None,
    /// `application/x-www-form-urlencoded` escaping of every key and value.
    FormUrlEncoded,
}

/// Strategy of a flat body. Unset knobs fall back to their defaults when read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatStrategy {
    character_encoding: Option<CharacterEncoding>,
    escaping: Option<FormEscaping>,
}

impl FlatStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_character_encoding(mut self, encoding: CharacterEncoding) -> Self {
        self.character_encoding = Some(encoding);
        self
    }

    #[must_use]
    pub fn with_escaping(mut self, escaping: FormEscaping) -> Self {
        self.escaping = Some(escaping);
        self
    }

    /// Defaults to [`CharacterEncoding::Utf8`].
    pub fn character_encoding(&self) -> CharacterEncoding {
        self.character_encoding.unwrap_or_default()
    }

    /// Defaults to [`FormEscaping::None`].
    pub fn escaping(&self) -> FormEscaping {
        self.escaping.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let strategy = FlatStrategy::new();
        assert_eq!(strategy.character_encoding(), CharacterEncoding::Utf8);
        assert_eq!(strategy.escaping(), FormEscaping::None);
    }

    #[test]
    fn test_single_byte_encodings() {
        assert_eq!(CharacterEncoding::Ascii.encode("a=1").unwrap(), b"a=1");
        assert_eq!(CharacterEncoding::IsoLatin1.encode("é").unwrap(), vec![0xE9]);

        let err = CharacterEncoding::Ascii.encode("a=é").unwrap_err();
        assert!(matches!(
            err,
            EncodingError::CharacterEncoding { encoding: CharacterEncoding::Ascii, character: 'é', position: 2 }
        ));

        let err = CharacterEncoding::IsoLatin1.encode("x€").unwrap_err();
        assert!(matches!(err, EncodingError::CharacterEncoding { character: '€', position: 1, .. }));
    }

    #[test]
    fn test_utf16_encodings() {
        assert_eq!(CharacterEncoding::Utf16.encode("a").unwrap(), vec![0xFF, 0xFE, 0x61, 0x00]);
        assert_eq!(CharacterEncoding::Utf16.encode("").unwrap(), Vec::<u8>::new());
        assert_eq!(CharacterEncoding::Utf16BigEndian.encode("a").unwrap(), vec![0x00, 0x61]);
        assert_eq!(CharacterEncoding::Utf16LittleEndian.encode("a").unwrap(), vec![0x61, 0x00]);
    }
}
