//! Primitive kind table.
//!
//! Every transcodable value has a [`PrimitiveKind`] with a fixed encoded
//! length. [`Shape`] describes an arbitrary type to the codec so that
//! enumerations can be mapped to their underlying integer and everything else
//! can be refused up front.

use std::{fmt, str::FromStr};

use crate::errors::{CodecError, Result};

/// Fixed-width kinds the codec can transcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// Boolean, one byte
    Bool,
    /// Unsigned 8-bit integer
    U8,
    /// Signed 8-bit integer (sign-flag encoding)
    I8,
    /// UTF-16 code unit
    Char,
    /// Signed 16-bit integer
    I16,
    /// Unsigned 16-bit integer
    U16,
    /// Signed 32-bit integer
    I32,
    /// Unsigned 32-bit integer
    U32,
    /// Signed 64-bit integer
    I64,
    /// Unsigned 64-bit integer
    U64,
    /// Single precision float
    F32,
    /// Double precision float
    F64,
    /// 128-bit decimal, four 32-bit components
    Decimal,
    /// 16-byte mixed-endian unique identifier
    Guid,
    /// Date/time as a 64-bit tick count
    DateTime,
}

impl PrimitiveKind {
    /// Every kind, in table order.
    pub const ALL: [Self; 15] = [
        Self::Bool,
        Self::U8,
        Self::I8,
        Self::Char,
        Self::I16,
        Self::U16,
        Self::I32,
        Self::U32,
        Self::I64,
        Self::U64,
        Self::F32,
        Self::F64,
        Self::Decimal,
        Self::Guid,
        Self::DateTime,
    ];

    /// Encoded length in bytes.
    pub const fn size(self) -> usize {
        match self {
            Self::Bool | Self::U8 | Self::I8 => 1,
            Self::Char | Self::I16 | Self::U16 => 2,
            Self::I32 | Self::U32 | Self::F32 => 4,
            Self::I64 | Self::U64 | Self::F64 | Self::DateTime => 8,
            Self::Decimal | Self::Guid => 16,
        }
    }

    /// Whether the kind can back an enumeration.
    pub const fn is_integer(self) -> bool {
        matches!(
            self,
            Self::U8 | Self::I8 | Self::I16 | Self::U16 | Self::I32 | Self::U32 | Self::I64 | Self::U64
        )
    }

    /// Short lowercase name, as accepted by [`FromStr`].
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::U8 => "u8",
            Self::I8 => "i8",
            Self::Char => "char",
            Self::I16 => "i16",
            Self::U16 => "u16",
            Self::I32 => "i32",
            Self::U32 => "u32",
            Self::I64 => "i64",
            Self::U64 => "u64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Decimal => "decimal",
            Self::Guid => "guid",
            Self::DateTime => "datetime",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PrimitiveKind {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| CodecError::UnsupportedType(s.to_string()))
    }
}

/// Description of a type handed to the codec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    /// A fixed-width primitive
    Primitive(PrimitiveKind),
    /// An enumeration transcoded as its underlying integer
    Enum {
        /// Type name, for diagnostics
        name: String,
        /// Underlying integer kind
        underlying: PrimitiveKind,
    },
    /// Optional wrapper around another shape
    Nullable(Box<Shape>),
    /// Heap-allocated or composite type
    Reference {
        /// Type name, for diagnostics
        name: String,
    },
    /// Trait-object type
    Interface {
        /// Type name, for diagnostics
        name: String,
    },
}

impl Shape {
    /// Primitive kind this shape is transcoded as.
    ///
    /// Absence is never transcoded here: nullable wrappers are refused along
    /// with reference and interface shapes.
    pub fn resolve(&self) -> Result<PrimitiveKind> {
        match self {
            Self::Primitive(kind) => Ok(*kind),
            Self::Enum { underlying, .. } if underlying.is_integer() => Ok(*underlying),
            Self::Enum { name, underlying } => Err(CodecError::UnsupportedType(format!(
                "enumeration {name} backed by non-integer {underlying}"
            ))),
            Self::Nullable(inner) => {
                Err(CodecError::UnsupportedType(format!("nullable wrapper around {inner}")))
            },
            Self::Reference { name } => {
                Err(CodecError::UnsupportedType(format!("reference type {name}")))
            },
            Self::Interface { name } => {
                Err(CodecError::UnsupportedType(format!("interface {name}")))
            },
        }
    }
}

impl From<PrimitiveKind> for Shape {
    fn from(kind: PrimitiveKind) -> Self {
        Self::Primitive(kind)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(kind) => write!(f, "{kind}"),
            Self::Enum { name, .. } | Self::Reference { name } | Self::Interface { name } => {
                f.write_str(name)
            },
            Self::Nullable(inner) => write!(f, "{inner}?"),
        }
    }
}

/// Encoded length of a shape.
pub fn size_of(shape: &Shape) -> Result<usize> {
    shape.resolve().map(PrimitiveKind::size)
}
