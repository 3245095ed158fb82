//! Text encodings.
//!
//! Encoding is lossy in the same way as the usual platform encoders:
//! characters the target cannot represent become `?`. Decoding never fails;
//! malformed UTF-8/UTF-16 becomes U+FFFD and non-ASCII bytes under ASCII
//! become `?`.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    errors::{CodecError, Result},
    order::Endianness,
};

/// A character encoding for string frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextEncoding {
    /// 7-bit US-ASCII
    Ascii,
    /// ISO-8859-1
    Latin1,
    /// UTF-8
    Utf8,
    /// UTF-16, little-endian code units
    Utf16Le,
    /// UTF-16, big-endian code units
    Utf16Be,
}

impl TextEncoding {
    /// Default encoding for a resolved byte order.
    ///
    /// UTF-16 in the resolved order, or in the host order when nothing was
    /// resolved.
    pub fn default_for(resolved: Option<Endianness>, host: Endianness) -> Self {
        match resolved.unwrap_or(host) {
            Endianness::Big => Self::Utf16Be,
            Endianness::Little => Self::Utf16Le,
        }
    }

    /// Canonical name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ascii => "us-ascii",
            Self::Latin1 => "iso-8859-1",
            Self::Utf8 => "utf-8",
            Self::Utf16Le => "utf-16le",
            Self::Utf16Be => "utf-16be",
        }
    }

    /// Encode a string.
    pub fn encode(self, text: &str) -> Vec<u8> {
        let mut out = Vec::with_capacity(text.len());
        for c in text.chars() {
            self.encode_char(c, &mut out);
        }
        out
    }

    /// Decode bytes to a string.
    pub fn decode(self, bytes: &[u8]) -> String {
        match self {
            Self::Ascii => {
                bytes.iter().map(|&b| if b.is_ascii() { char::from(b) } else { '?' }).collect()
            },
            Self::Latin1 => bytes.iter().map(|&b| char::from(b)).collect(),
            Self::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            Self::Utf16Le | Self::Utf16Be => {
                let units = bytes.chunks_exact(2).map(|pair| {
                    let pair = [pair[0], pair[1]];
                    if self == Self::Utf16Le {
                        u16::from_le_bytes(pair)
                    } else {
                        u16::from_be_bytes(pair)
                    }
                });
                let mut text: String = char::decode_utf16(units)
                    .map(|unit| unit.unwrap_or(char::REPLACEMENT_CHARACTER))
                    .collect();
                if bytes.len() % 2 == 1 {
                    text.push(char::REPLACEMENT_CHARACTER);
                }
                text
            },
        }
    }

    /// The encoded space character used for padding.
    pub fn space(self) -> &'static [u8] {
        match self {
            Self::Ascii | Self::Latin1 | Self::Utf8 => b" ",
            Self::Utf16Le => b" \0",
            Self::Utf16Be => b"\0 ",
        }
    }

    /// Encode into exactly `width` bytes.
    ///
    /// Text that does not fit is cut at the last whole character that does.
    /// The remainder is filled with spaces. Fails with
    /// [`CodecError::EncodingLengthMismatch`] when the gap left over is not a
    /// whole number of encoded spaces (odd widths under UTF-16).
    pub fn encode_fixed(self, text: &str, width: usize) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(width);
        for c in text.chars() {
            let before = out.len();
            self.encode_char(c, &mut out);
            if out.len() > width {
                out.truncate(before);
                break;
            }
        }

        let space = self.space();
        while width - out.len() >= space.len() {
            out.extend_from_slice(space);
        }
        if out.len() != width {
            return Err(CodecError::EncodingLengthMismatch { expected: width, actual: out.len() });
        }
        Ok(out)
    }

    fn encode_char(self, c: char, out: &mut Vec<u8>) {
        match self {
            Self::Ascii => out.push(if c.is_ascii() { c as u8 } else { b'?' }),
            Self::Latin1 => out.push(u8::try_from(u32::from(c)).unwrap_or(b'?')),
            Self::Utf8 => {
                let mut buf = [0u8; 4];
                out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            },
            Self::Utf16Le | Self::Utf16Be => {
                let mut buf = [0u16; 2];
                for unit in c.encode_utf16(&mut buf).iter() {
                    let bytes =
                        if self == Self::Utf16Le { unit.to_le_bytes() } else { unit.to_be_bytes() };
                    out.extend_from_slice(&bytes);
                }
            },
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TextEncoding {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "ascii" | "us-ascii" => Ok(Self::Ascii),
            "latin1" | "latin-1" | "iso-8859-1" => Ok(Self::Latin1),
            "utf8" | "utf-8" => Ok(Self::Utf8),
            "utf-16" | "utf16" | "utf-16le" | "utf16le" | "unicode" => Ok(Self::Utf16Le),
            "utf-16be" | "utf16be" | "unicodefffe" => Ok(Self::Utf16Be),
            _ => Err(CodecError::UnknownEncoding(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf16_variants_differ_in_unit_order() {
        assert_eq!(TextEncoding::Utf16Le.encode("Ab"), b"A\0b\0");
        assert_eq!(TextEncoding::Utf16Be.encode("Ab"), b"\0A\0b");
        assert_eq!(TextEncoding::Utf16Be.decode(b"\0A\0b"), "Ab");
    }

    #[test]
    fn astral_characters_use_surrogate_pairs() {
        let bytes = TextEncoding::Utf16Le.encode("😀");
        assert_eq!(bytes, [0x3D, 0xD8, 0x00, 0xDE]);
        assert_eq!(TextEncoding::Utf16Le.decode(&bytes), "😀");
    }

    #[test]
    fn unmappable_characters_become_question_marks() {
        assert_eq!(TextEncoding::Ascii.encode("naïve"), b"na?ve");
        assert_eq!(TextEncoding::Latin1.encode("naïve€"), b"na\xefve?");
        assert_eq!(TextEncoding::Ascii.decode(b"a\xffb"), "a?b");
    }

    #[test]
    fn malformed_input_decodes_lossily() {
        assert_eq!(TextEncoding::Utf8.decode(b"a\xffb"), "a\u{FFFD}b");
        assert_eq!(TextEncoding::Utf16Le.decode(b"a\0b"), "a\u{FFFD}");
        assert_eq!(TextEncoding::Utf16Le.decode(&[0x00, 0xD8]), "\u{FFFD}");
    }

    #[test]
    fn default_follows_resolved_then_host() {
        assert_eq!(
            TextEncoding::default_for(Some(Endianness::Big), Endianness::Little),
            TextEncoding::Utf16Be
        );
        assert_eq!(TextEncoding::default_for(None, Endianness::Little), TextEncoding::Utf16Le);
        assert_eq!(TextEncoding::default_for(None, Endianness::Big), TextEncoding::Utf16Be);
        assert_eq!(
            TextEncoding::default_for(Some(Endianness::Little), Endianness::Big),
            TextEncoding::Utf16Le
        );
    }

    #[test]
    fn fixed_width_pads_with_spaces() {
        assert_eq!(TextEncoding::Ascii.encode_fixed("ab", 5).unwrap(), b"ab   ");
        assert_eq!(TextEncoding::Utf16Be.encode_fixed("a", 4).unwrap(), b"\0a\0 ");
        assert_eq!(TextEncoding::Ascii.encode_fixed("", 0).unwrap(), b"");
    }

    #[test]
    fn fixed_width_truncates_at_character_boundary() {
        assert_eq!(TextEncoding::Ascii.encode_fixed("abcdef", 3).unwrap(), b"abc");
        // "é" is two bytes in UTF-8 and cannot be split
        assert_eq!(TextEncoding::Utf8.encode_fixed("aé", 2).unwrap(), b"a ");
    }

    #[test]
    fn fixed_width_odd_utf16_gap_is_a_mismatch() {
        let err = TextEncoding::Utf16Le.encode_fixed("ab", 5).unwrap_err();
        assert!(matches!(err, CodecError::EncodingLengthMismatch { expected: 5, actual: 4 }));
    }

    #[test]
    fn names_parse() {
        assert_eq!("UTF-8".parse::<TextEncoding>().unwrap(), TextEncoding::Utf8);
        assert_eq!("unicode".parse::<TextEncoding>().unwrap(), TextEncoding::Utf16Le);
        assert_eq!("unicodeFFFE".parse::<TextEncoding>().unwrap(), TextEncoding::Utf16Be);
        for enc in [
            TextEncoding::Ascii,
            TextEncoding::Latin1,
            TextEncoding::Utf8,
            TextEncoding::Utf16Le,
            TextEncoding::Utf16Be,
        ] {
            assert_eq!(enc.name().parse::<TextEncoding>().unwrap(), enc);
        }
        assert!(matches!("ebcdic".parse::<TextEncoding>(), Err(CodecError::UnknownEncoding(_))));
    }
}
