//! Binary stream codec with explicit byte-order control.
//!
//! Reads and writes fixed-layout primitive values, length-prefixed byte blobs
//! and length-prefixed strings against any [`std::io::Read`] /
//! [`std::io::Write`]. The codec is layered in three tiers:
//!
//! 1. [`raw`]: read exactly N bytes (tolerating short reads) or fail; write a
//!    buffer verbatim.
//! 2. [`transcode`] and [`order`]: convert a primitive to and from its
//!    host-native bytes, then reverse the buffer when the requested byte order
//!    differs from the host's.
//! 3. [`Codec`]: framed I/O. Short frames carry a 1-byte length prefix,
//!    standard frames a 4-byte one.
//!
//! Byte order is a per-call [`ByteOrder`] directive resolved against the
//! default held by [`CodecConfig`]. `Unspecified` on both resolves to the
//! host's own layout, untouched.
//!
//! # Wire layout
//!
//! ```text
//! value           [size_of(kind) bytes, host-native, order-corrected]
//! short bytes     [u8 len][len bytes]
//! bytes           [i32 len][len bytes]
//! fixed text      [len bytes, space padded]
//! short text      [u8 len][encoded text]
//! text            [i32 len][encoded text]
//! ```
//!
//! GUIDs use the mixed-endian layout (see [`Guid`]) and decimals are four
//! 32-bit components. Neither is a plain reversal of a 16-byte integer.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod codec;
pub mod config;
pub mod errors;
pub mod kind;
pub mod order;
pub mod raw;
pub mod text;
pub mod transcode;
pub mod value;

pub use codec::Codec;
pub use config::CodecConfig;
pub use errors::{CodecError, Result};
pub use kind::{PrimitiveKind, Shape, size_of};
pub use order::{ByteOrder, Endianness};
pub use text::TextEncoding;
pub use value::{DateTime, Decimal, Guid, Primitive, Value, WideChar, WireEnum};
