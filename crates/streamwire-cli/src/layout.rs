//! Field layouts.
//!
//! A layout is the ordered list of fields a frame is made of. Each field is
//! either a single primitive value or one of the framed blob and text forms.

use std::{
    fmt,
    io::{Read, Write},
    str::FromStr,
};

use bytes::Bytes;
use streamwire_codec::{ByteOrder, Codec, PrimitiveKind, Value};
use tracing::debug;

use crate::CliError;

/// One field of a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// A fixed-size primitive value.
    Value(PrimitiveKind),
    /// Blob with a 1-byte length prefix.
    ShortBytes,
    /// Blob with a 4-byte length prefix.
    Bytes,
    /// Text with a 1-byte length prefix.
    ShortText,
    /// Text with a 4-byte length prefix.
    Text,
    /// Text occupying exactly this many bytes.
    FixedText(usize),
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(kind) => write!(f, "{kind}"),
            Self::ShortBytes => f.write_str("short-bytes"),
            Self::Bytes => f.write_str("bytes"),
            Self::ShortText => f.write_str("short-text"),
            Self::Text => f.write_str("text"),
            Self::FixedText(width) => write!(f, "fixed-text:{width}"),
        }
    }
}

impl FromStr for Field {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, CliError> {
        let field = match s.trim() {
            "short-bytes" => Self::ShortBytes,
            "bytes" => Self::Bytes,
            "short-text" => Self::ShortText,
            "text" => Self::Text,
            other => {
                if let Some(width) = other.strip_prefix("fixed-text:") {
                    let width =
                        width.parse().map_err(|_| CliError::InvalidField(s.to_string()))?;
                    Self::FixedText(width)
                } else {
                    Self::Value(other.parse().map_err(|_| CliError::InvalidField(s.to_string()))?)
                }
            },
        };
        Ok(field)
    }
}

/// A field paired with the textual value to write into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    /// Target field.
    pub field: Field,
    /// Value as given on the command line. Blobs are hex.
    pub value: String,
}

impl FromStr for Assignment {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, CliError> {
        let (field, value) =
            s.split_once('=').ok_or_else(|| CliError::InvalidField(s.to_string()))?;
        Ok(Self { field: field.parse()?, value: value.to_string() })
    }
}

/// A decoded field.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    /// A primitive value.
    Value(Value),
    /// Raw bytes, shown as hex.
    Blob(Bytes),
    /// Decoded text, shown quoted.
    Text(String),
}

impl fmt::Display for Decoded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => write!(f, "{value}"),
            Self::Blob(bytes) => f.write_str(&hex::encode(bytes)),
            Self::Text(text) => write!(f, "{text:?}"),
        }
    }
}

/// Read every field of `layout` from `source`, in order.
///
/// Stops at the first field that cannot be read.
pub fn decode_layout<R: Read + ?Sized>(
    codec: &Codec,
    source: &mut R,
    layout: &[Field],
) -> Result<Vec<(Field, Decoded)>, CliError> {
    let order = ByteOrder::Unspecified;
    let mut fields = Vec::with_capacity(layout.len());
    for &field in layout {
        let decoded = match field {
            Field::Value(kind) => Decoded::Value(codec.read_kind(source, kind, order)?),
            Field::ShortBytes => Decoded::Blob(codec.read_short_bytes(source, order)?),
            Field::Bytes => Decoded::Blob(codec.read_bytes(source, order)?),
            Field::ShortText => Decoded::Text(codec.read_short_text(source, None, order)?),
            Field::Text => Decoded::Text(codec.read_text(source, None, order)?),
            Field::FixedText(width) => Decoded::Text(codec.read_fixed_text(source, width, None)?),
        };
        debug!(%field, %decoded, "decoded field");
        fields.push((field, decoded));
    }
    Ok(fields)
}

/// Write every assignment to `sink`, in order.
pub fn encode_fields<W: Write + ?Sized>(
    codec: &Codec,
    sink: &mut W,
    assignments: &[Assignment],
) -> Result<(), CliError> {
    let order = ByteOrder::Unspecified;
    for Assignment { field, value } in assignments {
        match *field {
            Field::Value(kind) => codec.write_kind_value(sink, &Value::parse(kind, value)?, order)?,
            Field::ShortBytes => codec.write_short_bytes(sink, &hex::decode(value)?, order)?,
            Field::Bytes => codec.write_bytes(sink, &hex::decode(value)?, order)?,
            Field::ShortText => codec.write_short_text(sink, value, None, order)?,
            Field::Text => codec.write_text(sink, value, None, order)?,
            Field::FixedText(width) => codec.write_fixed_text(sink, value, width, None)?,
        }
        debug!(%field, value = %value, "encoded field");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use streamwire_codec::{CodecConfig, Endianness, TextEncoding};

    use super::*;

    fn codec(order: ByteOrder) -> Codec {
        Codec::with_host(CodecConfig::default().with_order(order), Endianness::Little)
    }

    #[test]
    fn field_names() {
        for name in ["u32", "guid", "short-bytes", "bytes", "short-text", "text", "fixed-text:8"] {
            assert_eq!(name.parse::<Field>().unwrap().to_string(), name);
        }
        assert!("fixed-text:".parse::<Field>().is_err());
        assert!("fixed-text:-1".parse::<Field>().is_err());
        assert!("string".parse::<Field>().is_err());
    }

    #[test]
    fn assignment_splits_on_first_equals() {
        let a: Assignment = "text=a=b".parse().unwrap();
        assert_eq!(a.field, Field::Text);
        assert_eq!(a.value, "a=b");
        assert!("u8".parse::<Assignment>().is_err());
    }

    #[test]
    fn encode_then_decode_layout() {
        let codec = codec(ByteOrder::BigEndian);
        let assignments: Vec<Assignment> =
            ["u16=0x0102", "short-bytes=cafe", "text=hi", "fixed-text:6=a"]
                .iter()
                .map(|s| s.parse().unwrap())
                .collect();

        let mut sink = Vec::new();
        encode_fields(&codec, &mut sink, &assignments).unwrap();
        assert_eq!(hex::encode(&sink), "010202cafe0000000400680069006100200020");

        let layout: Vec<Field> = assignments.iter().map(|a| a.field).collect();
        let decoded = decode_layout(&codec, &mut Cursor::new(sink), &layout).unwrap();
        let shown: Vec<String> = decoded.iter().map(|(f, d)| format!("{f}: {d}")).collect();
        assert_eq!(shown, ["u16: 258", "short-bytes: cafe", "text: \"hi\"", "fixed-text:6: \"a  \""]);
    }

    #[test]
    fn configured_encoding_applies_to_text() {
        let codec = Codec::with_host(
            CodecConfig::default().with_encoding(TextEncoding::Utf8),
            Endianness::Little,
        );
        let mut sink = Vec::new();
        encode_fields(&codec, &mut sink, &["short-text=hé".parse().unwrap()]).unwrap();
        assert_eq!(sink, [3, b'h', 0xC3, 0xA9]);
    }

    #[test]
    fn bad_hex_is_reported() {
        let codec = codec(ByteOrder::LittleEndian);
        let assignments = ["bytes=xyz".parse().unwrap()];
        let err = encode_fields(&codec, &mut Vec::new(), &assignments).unwrap_err();
        assert!(matches!(err, CliError::InvalidHex(_)));
    }
}
