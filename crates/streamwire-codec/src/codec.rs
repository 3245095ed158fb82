//! Framed I/O over a sequential byte stream.
//!
//! [`Codec`] bundles the defaults from a [`CodecConfig`] with the host byte
//! order and exposes the read/write operations. It holds no stream state:
//! every call takes the stream by reference and performs a single pass over
//! it.
//!
//! # Frames
//!
//! ```text
//! short bytes / short text    [u8 len][len bytes]
//! bytes / text                [i32 len][len bytes]
//! fixed text                  [width bytes, space padded]
//! ```
//!
//! Length prefixes are ordinary values and follow the call's byte order.

use std::io::{Read, Write};

use bytes::Bytes;
use tracing::trace;

use crate::{
    config::CodecConfig,
    errors::{CodecError, Result},
    kind::{PrimitiveKind, Shape},
    order::{self, ByteOrder, Endianness},
    raw,
    text::TextEncoding,
    transcode,
    value::{Primitive, Value, WireEnum},
};

/// Largest payload a short (1-byte prefixed) frame can carry.
pub const MAX_SHORT_LEN: usize = u8::MAX as usize;

/// Largest payload a standard (4-byte signed prefix) frame can carry.
pub const MAX_LEN: usize = i32::MAX as usize;

/// Stream codec bound to a configuration and a host byte order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Codec {
    config: CodecConfig,
    host: Endianness,
}

impl Default for Codec {
    fn default() -> Self {
        Self::new(CodecConfig::default())
    }
}

impl Codec {
    /// Codec for the running architecture.
    pub fn new(config: CodecConfig) -> Self {
        Self::with_host(config, Endianness::native())
    }

    /// Codec that behaves as if running on a `host`-ordered architecture.
    pub fn with_host(config: CodecConfig, host: Endianness) -> Self {
        Self { config, host }
    }

    /// Active configuration.
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Host byte order values are transcoded in.
    pub fn host(&self) -> Endianness {
        self.host
    }

    /// Resolve a call's directive against the configured default.
    pub fn resolve(&self, order: ByteOrder) -> Option<Endianness> {
        order.resolve(self.config.default_order)
    }

    /// Reorder a host-native buffer for `order`, in place.
    pub fn fix_byte_order(&self, bytes: &mut [u8], order: ByteOrder) {
        order::fix_byte_order(bytes, order, self.config.default_order, self.host);
    }

    /// Encoding a text call will use.
    ///
    /// An explicit encoding wins, then the configured one, then UTF-16 in the
    /// resolved byte order.
    pub fn text_encoding(&self, encoding: Option<TextEncoding>, order: ByteOrder) -> TextEncoding {
        encoding
            .or(self.config.default_encoding)
            .unwrap_or_else(|| TextEncoding::default_for(self.resolve(order), self.host))
    }

    /// Interpret host-native bytes at `start` as `kind`.
    pub fn decode(&self, bytes: &[u8], kind: PrimitiveKind, start: usize) -> Result<Value> {
        transcode::decode(bytes, kind, start, self.host)
    }

    /// Host-native bytes of a value.
    pub fn encode(&self, value: &Value) -> Vec<u8> {
        transcode::encode(value, self.host)
    }

    /// Read exactly `length` bytes.
    pub fn read_buffer<R: Read + ?Sized>(&self, source: &mut R, length: usize) -> Result<Bytes> {
        raw::read_exact(source, length)
    }

    /// Read one value of a dynamic kind.
    pub fn read_kind<R: Read + ?Sized>(
        &self,
        source: &mut R,
        kind: PrimitiveKind,
        order: ByteOrder,
    ) -> Result<Value> {
        let mut bytes = raw::read_exact(source, kind.size())?.to_vec();
        self.fix_byte_order(&mut bytes, order);
        let value = self.decode(&bytes, kind, 0)?;
        trace!(%kind, %order, %value, "read value");
        Ok(value)
    }

    /// Read one value of a described shape.
    pub fn read_shape<R: Read + ?Sized>(
        &self,
        source: &mut R,
        shape: &Shape,
        order: ByteOrder,
    ) -> Result<Value> {
        self.read_kind(source, shape.resolve()?, order)
    }

    /// Read one value of a static type.
    pub fn read_value<T: Primitive, R: Read + ?Sized>(
        &self,
        source: &mut R,
        order: ByteOrder,
    ) -> Result<T> {
        let value = self.read_kind(source, T::KIND, order)?;
        T::from_value(value).ok_or_else(|| {
            CodecError::UnsupportedType(format!("{} decoded as {}", T::KIND, value.kind()))
        })
    }

    /// Read an enumeration through its underlying integer.
    pub fn read_enum<E: WireEnum, R: Read + ?Sized>(
        &self,
        source: &mut R,
        order: ByteOrder,
    ) -> Result<E> {
        let repr: E::Repr = self.read_value(source, order)?;
        E::from_repr(repr)
            .ok_or_else(|| CodecError::UnknownDiscriminant { name: E::NAME, value: repr.into() })
    }

    /// Read a blob with a 1-byte length prefix.
    pub fn read_short_bytes<R: Read + ?Sized>(
        &self,
        source: &mut R,
        order: ByteOrder,
    ) -> Result<Bytes> {
        let len: u8 = self.read_value(source, order)?;
        self.read_buffer(source, usize::from(len))
    }

    /// Read a blob with a 4-byte signed length prefix.
    pub fn read_bytes<R: Read + ?Sized>(&self, source: &mut R, order: ByteOrder) -> Result<Bytes> {
        let len: i32 = self.read_value(source, order)?;
        self.read_buffer(source, raw::checked_length(len.into())?)
    }

    /// Read `length` bytes as text. Padding is kept.
    pub fn read_fixed_text<R: Read + ?Sized>(
        &self,
        source: &mut R,
        length: usize,
        encoding: Option<TextEncoding>,
    ) -> Result<String> {
        let encoding = self.text_encoding(encoding, ByteOrder::Unspecified);
        let bytes = self.read_buffer(source, length)?;
        Ok(encoding.decode(&bytes))
    }

    /// Read text with a 1-byte length prefix.
    pub fn read_short_text<R: Read + ?Sized>(
        &self,
        source: &mut R,
        encoding: Option<TextEncoding>,
        order: ByteOrder,
    ) -> Result<String> {
        let encoding = self.text_encoding(encoding, order);
        let len: u8 = self.read_value(source, order)?;
        self.read_fixed_text(source, usize::from(len), Some(encoding))
    }

    /// Read text with a 4-byte signed length prefix.
    pub fn read_text<R: Read + ?Sized>(
        &self,
        source: &mut R,
        encoding: Option<TextEncoding>,
        order: ByteOrder,
    ) -> Result<String> {
        let encoding = self.text_encoding(encoding, order);
        let len: i32 = self.read_value(source, order)?;
        self.read_fixed_text(source, raw::checked_length(len.into())?, Some(encoding))
    }

    /// Write bytes verbatim.
    pub fn write_buffer<W: Write + ?Sized>(&self, sink: &mut W, bytes: &[u8]) -> Result<()> {
        raw::write_exact(sink, bytes)
    }

    /// Write one value of a dynamic kind.
    pub fn write_kind_value<W: Write + ?Sized>(
        &self,
        sink: &mut W,
        value: &Value,
        order: ByteOrder,
    ) -> Result<()> {
        let mut bytes = self.encode(value);
        self.fix_byte_order(&mut bytes, order);
        trace!(kind = %value.kind(), %order, %value, "write value");
        self.write_buffer(sink, &bytes)
    }

    /// Write one value as a described shape.
    ///
    /// Fails with [`CodecError::UnsupportedType`] when the value's kind is not
    /// the one the shape resolves to.
    pub fn write_shape<W: Write + ?Sized>(
        &self,
        sink: &mut W,
        shape: &Shape,
        value: &Value,
        order: ByteOrder,
    ) -> Result<()> {
        let kind = shape.resolve()?;
        if kind != value.kind() {
            return Err(CodecError::UnsupportedType(format!(
                "{} value written as {shape}",
                value.kind()
            )));
        }
        self.write_kind_value(sink, value, order)
    }

    /// Write one value of a static type.
    pub fn write_value<T: Primitive, W: Write + ?Sized>(
        &self,
        sink: &mut W,
        value: T,
        order: ByteOrder,
    ) -> Result<()> {
        self.write_kind_value(sink, &value.into_value(), order)
    }

    /// Write an enumeration as its underlying integer.
    pub fn write_enum<E: WireEnum, W: Write + ?Sized>(
        &self,
        sink: &mut W,
        value: E,
        order: ByteOrder,
    ) -> Result<()> {
        self.write_value(sink, value.to_repr(), order)
    }

    /// Write a blob with a 1-byte length prefix.
    pub fn write_short_bytes<W: Write + ?Sized>(
        &self,
        sink: &mut W,
        bytes: &[u8],
        order: ByteOrder,
    ) -> Result<()> {
        let len = short_len(bytes.len())?;
        self.write_value(sink, len, order)?;
        self.write_buffer(sink, bytes)
    }

    /// Write a blob with a 4-byte signed length prefix.
    pub fn write_bytes<W: Write + ?Sized>(
        &self,
        sink: &mut W,
        bytes: &[u8],
        order: ByteOrder,
    ) -> Result<()> {
        let len = standard_len(bytes.len())?;
        self.write_value(sink, len, order)?;
        self.write_buffer(sink, bytes)
    }

    /// Write text into exactly `length` bytes, space padded.
    ///
    /// See [`TextEncoding::encode_fixed`] for how overlong text and
    /// unreachable widths are handled.
    pub fn write_fixed_text<W: Write + ?Sized>(
        &self,
        sink: &mut W,
        text: &str,
        length: usize,
        encoding: Option<TextEncoding>,
    ) -> Result<()> {
        let encoding = self.text_encoding(encoding, ByteOrder::Unspecified);
        let bytes = encoding.encode_fixed(text, length)?;
        self.write_buffer(sink, &bytes)
    }

    /// Write text with a 1-byte length prefix.
    pub fn write_short_text<W: Write + ?Sized>(
        &self,
        sink: &mut W,
        text: &str,
        encoding: Option<TextEncoding>,
        order: ByteOrder,
    ) -> Result<()> {
        let bytes = self.text_encoding(encoding, order).encode(text);
        let len = short_len(bytes.len())?;
        self.write_value(sink, len, order)?;
        self.write_buffer(sink, &bytes)
    }

    /// Write text with a 4-byte signed length prefix.
    pub fn write_text<W: Write + ?Sized>(
        &self,
        sink: &mut W,
        text: &str,
        encoding: Option<TextEncoding>,
        order: ByteOrder,
    ) -> Result<()> {
        let bytes = self.text_encoding(encoding, order).encode(text);
        let len = standard_len(bytes.len())?;
        self.write_value(sink, len, order)?;
        self.write_buffer(sink, &bytes)
    }
}

fn short_len(len: usize) -> Result<u8> {
    u8::try_from(len).map_err(|_| CodecError::LengthOverflow { len, max: MAX_SHORT_LEN })
}

fn standard_len(len: usize) -> Result<i32> {
    i32::try_from(len).map_err(|_| CodecError::LengthOverflow { len, max: MAX_LEN })
}
