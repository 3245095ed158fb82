//! Command-line front end for the streamwire codec.
//!
//! `streamwire decode` reads a frame described by a comma-separated layout and
//! prints one `name: value` line per field. `streamwire encode` writes the
//! mirror image from `kind=value` assignments.

pub mod layout;

use std::io::{Read, Write};

use streamwire_codec::{ByteOrder, Codec, CodecConfig, CodecError, TextEncoding};
use thiserror::Error;

pub use layout::{Assignment, Decoded, Field, decode_layout, encode_fields};

/// Errors surfaced by the command-line tool.
#[derive(Error, Debug)]
pub enum CliError {
    /// Layout field or assignment could not be parsed.
    #[error("invalid field `{0}`")]
    InvalidField(String),

    /// Blob value is not valid hex.
    #[error("invalid hex value")]
    InvalidHex(#[from] hex::FromHexError),

    /// Codec failure while reading or writing a field.
    #[error("codec error")]
    Codec(#[from] CodecError),

    /// Input or output file failure.
    #[error("I/O error")]
    Io(#[from] std::io::Error),
}

/// Build the codec a command runs with.
///
/// `order` becomes the default directive and every field is read or written
/// with [`ByteOrder::Unspecified`], so the flag governs the whole frame.
pub fn codec_for(order: ByteOrder, encoding: Option<TextEncoding>) -> Codec {
    let mut config = CodecConfig::default().with_order(order);
    config.default_encoding = encoding;
    Codec::new(config)
}

/// Decode `layout` from `source` and print each field to `out`.
pub fn run_decode<R: Read + ?Sized, W: Write + ?Sized>(
    codec: &Codec,
    source: &mut R,
    layout: &[Field],
    out: &mut W,
) -> Result<(), CliError> {
    for (field, decoded) in decode_layout(codec, source, layout)? {
        writeln!(out, "{field}: {decoded}")?;
    }
    Ok(())
}

/// Encode `assignments` into `sink` and flush it.
pub fn run_encode<W: Write + ?Sized>(
    codec: &Codec,
    assignments: &[Assignment],
    sink: &mut W,
) -> Result<(), CliError> {
    encode_fields(codec, sink, assignments)?;
    sink.flush()?;
    Ok(())
}
