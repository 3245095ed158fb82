//! Byte order directives and host order detection.
//!
//! Values are always transcoded in the host's own layout. The directive only
//! decides whether the finished buffer is reversed on its way to (or from) the
//! wire:
//!
//! ```text
//! read:  wire bytes -> fix_byte_order -> decode (host-native)
//! write: encode (host-native) -> fix_byte_order -> wire bytes
//! ```

use std::{
    fmt,
    str::FromStr,
    sync::atomic::{AtomicU8, Ordering},
};

use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::errors::CodecError;

/// Requested byte order for multi-byte fields.
///
/// `Unspecified` defers to the configured default; if that is unspecified too
/// the host layout is used as-is.
#[repr(u8)]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize_repr, Deserialize_repr,
)]
pub enum ByteOrder {
    /// Defer to the default directive
    #[default]
    Unspecified = 0,
    /// Most significant byte first
    BigEndian = 1,
    /// Least significant byte first
    LittleEndian = 2,
}

impl ByteOrder {
    /// Decode from the discriminant byte.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Unspecified),
            1 => Some(Self::BigEndian),
            2 => Some(Self::LittleEndian),
            _ => None,
        }
    }

    /// Concrete order named by this directive, if any.
    pub fn endianness(self) -> Option<Endianness> {
        match self {
            Self::Unspecified => None,
            Self::BigEndian => Some(Endianness::Big),
            Self::LittleEndian => Some(Endianness::Little),
        }
    }

    /// Resolve against a default directive.
    ///
    /// The call-site directive wins unless it is `Unspecified`. `None` means no
    /// reordering should happen.
    pub fn resolve(self, default: Self) -> Option<Endianness> {
        match self {
            Self::Unspecified => default.endianness(),
            explicit => explicit.endianness(),
        }
    }
}

impl From<Endianness> for ByteOrder {
    fn from(value: Endianness) -> Self {
        match value {
            Endianness::Big => Self::BigEndian,
            Endianness::Little => Self::LittleEndian,
        }
    }
}

impl fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unspecified => "unspecified",
            Self::BigEndian => "big",
            Self::LittleEndian => "little",
        })
    }
}

impl FromStr for ByteOrder {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "unspecified" | "native" => Ok(Self::Unspecified),
            "big" | "be" | "big-endian" => Ok(Self::BigEndian),
            "little" | "le" | "little-endian" => Ok(Self::LittleEndian),
            other => Err(CodecError::InvalidArgument(format!("unknown byte order `{other}`"))),
        }
    }
}

/// A concrete byte order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endianness {
    /// Most significant byte first
    Big,
    /// Least significant byte first
    Little,
}

impl Endianness {
    /// Byte order of the target architecture.
    pub const fn native() -> Self {
        #[cfg(target_endian = "big")]
        let endian = Self::Big;

        #[cfg(target_endian = "little")]
        let endian = Self::Little;

        endian
    }

    /// The other order.
    #[must_use]
    pub const fn flip(self) -> Self {
        match self {
            Self::Big => Self::Little,
            Self::Little => Self::Big,
        }
    }
}

impl Default for Endianness {
    fn default() -> Self {
        Self::native()
    }
}

/// Reorder a host-native buffer for the requested directive, in place.
///
/// No-op when the directive resolves to nothing or the buffer is shorter than
/// two bytes. Otherwise the whole buffer is reversed iff the resolved order
/// differs from `host`. Applying it twice restores the original bytes.
pub fn fix_byte_order(bytes: &mut [u8], requested: ByteOrder, default: ByteOrder, host: Endianness) {
    let Some(target) = requested.resolve(default) else {
        return;
    };
    if bytes.len() < 2 {
        return;
    }
    if target != host {
        bytes.reverse();
    }
}

static PROCESS_DEFAULT: AtomicU8 = AtomicU8::new(ByteOrder::Unspecified as u8);

/// Set the process-wide default directive.
///
/// The codec never reads this on its own. It is picked up only by
/// [`crate::CodecConfig::from_process_default`]. Changing it while other
/// threads build configurations is a race the caller must avoid: a
/// configuration sees either the old or the new value.
pub fn set_process_default_order(order: ByteOrder) {
    PROCESS_DEFAULT.store(order as u8, Ordering::Relaxed);
}

/// Current process-wide default directive.
pub fn process_default_order() -> ByteOrder {
    ByteOrder::from_u8(PROCESS_DEFAULT.load(Ordering::Relaxed)).unwrap_or_default()
}

/// Restore the process-wide default to `Unspecified`.
pub fn reset_process_default_order() {
    set_process_default_order(ByteOrder::Unspecified);
}
