//! Value types carried by the codec.
//!
//! [`Value`] is the dynamic, tagged form used when the kind is only known at
//! run time. [`Primitive`] and [`WireEnum`] give the static form used by
//! [`crate::Codec::read_value`] and friends.

use std::{
    fmt,
    str::FromStr,
    time::{Duration, SystemTime},
};

use zerocopy::{
    FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned,
    byteorder::{BigEndian, LittleEndian, U16, U32},
};

use crate::{
    errors::{CodecError, Result},
    kind::PrimitiveKind,
};

/// A decoded primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    /// Boolean
    Bool(bool),
    /// Unsigned byte
    U8(u8),
    /// Signed byte
    I8(i8),
    /// UTF-16 code unit
    Char(WideChar),
    /// Signed 16-bit integer
    I16(i16),
    /// Unsigned 16-bit integer
    U16(u16),
    /// Signed 32-bit integer
    I32(i32),
    /// Unsigned 32-bit integer
    U32(u32),
    /// Signed 64-bit integer
    I64(i64),
    /// Unsigned 64-bit integer
    U64(u64),
    /// Single precision float
    F32(f32),
    /// Double precision float
    F64(f64),
    /// 128-bit decimal
    Decimal(Decimal),
    /// Mixed-endian GUID
    Guid(Guid),
    /// Tick-count date/time
    DateTime(DateTime),
}

impl Value {
    /// Kind tag of this value.
    pub const fn kind(&self) -> PrimitiveKind {
        match self {
            Self::Bool(_) => PrimitiveKind::Bool,
            Self::U8(_) => PrimitiveKind::U8,
            Self::I8(_) => PrimitiveKind::I8,
            Self::Char(_) => PrimitiveKind::Char,
            Self::I16(_) => PrimitiveKind::I16,
            Self::U16(_) => PrimitiveKind::U16,
            Self::I32(_) => PrimitiveKind::I32,
            Self::U32(_) => PrimitiveKind::U32,
            Self::I64(_) => PrimitiveKind::I64,
            Self::U64(_) => PrimitiveKind::U64,
            Self::F32(_) => PrimitiveKind::F32,
            Self::F64(_) => PrimitiveKind::F64,
            Self::Decimal(_) => PrimitiveKind::Decimal,
            Self::Guid(_) => PrimitiveKind::Guid,
            Self::DateTime(_) => PrimitiveKind::DateTime,
        }
    }

    /// Parse the textual form of a value of the given kind.
    ///
    /// Accepts what [`fmt::Display`] produces, plus `0x` prefixed hex for
    /// integers and a single character for `char`.
    pub fn parse(kind: PrimitiveKind, text: &str) -> Result<Self> {
        fn bad(kind: PrimitiveKind, text: &str) -> CodecError {
            CodecError::InvalidArgument(format!("`{text}` is not a valid {kind}"))
        }

        fn int<T>(kind: PrimitiveKind, text: &str) -> Result<T>
        where
            T: FromStr + TryFrom<i128>,
        {
            if let Some(hex) = text.strip_prefix("0x") {
                if hex.starts_with(['+', '-']) {
                    return Err(bad(kind, text));
                }
                let wide = i128::from_str_radix(hex, 16).map_err(|_| bad(kind, text))?;
                return T::try_from(wide).map_err(|_| bad(kind, text));
            }
            text.parse::<T>().map_err(|_| bad(kind, text))
        }

        let value = match kind {
            PrimitiveKind::Bool => Self::Bool(text.parse().map_err(|_| bad(kind, text))?),
            PrimitiveKind::U8 => Self::U8(int(kind, text)?),
            PrimitiveKind::I8 => Self::I8(int(kind, text)?),
            PrimitiveKind::Char => {
                let mut units = text.encode_utf16();
                match (units.next(), units.next()) {
                    (Some(unit), None) => Self::Char(WideChar(unit)),
                    _ => return Err(bad(kind, text)),
                }
            },
            PrimitiveKind::I16 => Self::I16(int(kind, text)?),
            PrimitiveKind::U16 => Self::U16(int(kind, text)?),
            PrimitiveKind::I32 => Self::I32(int(kind, text)?),
            PrimitiveKind::U32 => Self::U32(int(kind, text)?),
            PrimitiveKind::I64 => Self::I64(int(kind, text)?),
            PrimitiveKind::U64 => Self::U64(int(kind, text)?),
            PrimitiveKind::F32 => Self::F32(text.parse().map_err(|_| bad(kind, text))?),
            PrimitiveKind::F64 => Self::F64(text.parse().map_err(|_| bad(kind, text))?),
            PrimitiveKind::Decimal => Self::Decimal(text.parse()?),
            PrimitiveKind::Guid => Self::Guid(text.parse()?),
            PrimitiveKind::DateTime => {
                Self::DateTime(DateTime::from_ticks(int(kind, text)?)?)
            },
        };
        Ok(value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::U8(v) => write!(f, "{v}"),
            Self::I8(v) => write!(f, "{v}"),
            Self::Char(v) => write!(f, "{v}"),
            Self::I16(v) => write!(f, "{v}"),
            Self::U16(v) => write!(f, "{v}"),
            Self::I32(v) => write!(f, "{v}"),
            Self::U32(v) => write!(f, "{v}"),
            Self::I64(v) => write!(f, "{v}"),
            Self::U64(v) => write!(f, "{v}"),
            Self::F32(v) => write!(f, "{v}"),
            Self::F64(v) => write!(f, "{v}"),
            Self::Decimal(v) => write!(f, "{v}"),
            Self::Guid(v) => write!(f, "{v}"),
            Self::DateTime(v) => write!(f, "{v}"),
        }
    }
}

/// A single UTF-16 code unit, the codec's 2-byte character.
///
/// Unpaired surrogates are representable, which `char` cannot express.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct WideChar(pub u16);

impl WideChar {
    /// Convert to a `char`, if this unit is not a surrogate.
    pub fn to_char(self) -> Option<char> {
        char::from_u32(u32::from(self.0))
    }
}

impl fmt::Display for WideChar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_char() {
            Some(c) => write!(f, "{c}"),
            None => write!(f, "\\u{{{:04x}}}", self.0),
        }
    }
}

/// Big-endian (RFC 4122) GUID layout.
#[derive(FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
#[repr(C)]
struct CanonicalGuid {
    data1: U32<BigEndian>,
    data2: U16<BigEndian>,
    data3: U16<BigEndian>,
    data4: [u8; 8],
}

/// Mixed-endian GUID layout: the first three fields little-endian.
#[derive(FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
#[repr(C)]
struct MixedGuid {
    data1: U32<LittleEndian>,
    data2: U16<LittleEndian>,
    data3: U16<LittleEndian>,
    data4: [u8; 8],
}

/// 128-bit globally unique identifier.
///
/// A 4-byte field, two 2-byte fields and 8 opaque bytes. In the mixed form
/// ([`Guid::to_mixed_bytes`]) the three leading fields are little-endian and
/// the trailing 8 bytes keep their order, so the mixed form is *not* a
/// reversal of the canonical big-endian form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Guid {
    /// Leading 32-bit field
    pub data1: u32,
    /// First 16-bit field
    pub data2: u16,
    /// Second 16-bit field
    pub data3: u16,
    /// Trailing opaque bytes (2 + 6)
    pub data4: [u8; 8],
}

impl Guid {
    /// The all-zero GUID.
    pub const NIL: Self = Self { data1: 0, data2: 0, data3: 0, data4: [0; 8] };

    /// Build from the canonical big-endian 16 bytes.
    pub fn from_canonical_bytes(bytes: [u8; 16]) -> Self {
        let layout: CanonicalGuid = zerocopy::transmute!(bytes);
        Self {
            data1: layout.data1.get(),
            data2: layout.data2.get(),
            data3: layout.data3.get(),
            data4: layout.data4,
        }
    }

    /// Canonical big-endian 16 bytes.
    pub fn to_canonical_bytes(self) -> [u8; 16] {
        let layout = CanonicalGuid {
            data1: U32::new(self.data1),
            data2: U16::new(self.data2),
            data3: U16::new(self.data3),
            data4: self.data4,
        };
        zerocopy::transmute!(layout)
    }

    /// Build from the mixed-endian 16 bytes.
    pub fn from_mixed_bytes(bytes: [u8; 16]) -> Self {
        let layout: MixedGuid = zerocopy::transmute!(bytes);
        Self {
            data1: layout.data1.get(),
            data2: layout.data2.get(),
            data3: layout.data3.get(),
            data4: layout.data4,
        }
    }

    /// Mixed-endian 16 bytes.
    pub fn to_mixed_bytes(self) -> [u8; 16] {
        let layout = MixedGuid {
            data1: U32::new(self.data1),
            data2: U16::new(self.data2),
            data3: U16::new(self.data3),
            data4: self.data4,
        };
        zerocopy::transmute!(layout)
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = &self.data4;
        write!(
            f,
            "{:08x}-{:04x}-{:04x}-{:02x}{:02x}-{}",
            self.data1,
            self.data2,
            self.data3,
            d[0],
            d[1],
            hex::encode(&d[2..])
        )
    }
}

impl FromStr for Guid {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.strip_prefix('{').and_then(|t| t.strip_suffix('}')).unwrap_or(s);
        let groups: Vec<&str> = trimmed.split('-').collect();
        if groups.iter().map(|g| g.len()).ne([8, 4, 4, 4, 12]) {
            return Err(CodecError::InvalidGuid(s.to_string()));
        }

        let mut canonical = [0u8; 16];
        hex::decode_to_slice(groups.concat(), &mut canonical)
            .map_err(|_| CodecError::InvalidGuid(s.to_string()))?;
        Ok(Self::from_canonical_bytes(canonical))
    }
}

/// 128-bit decimal: a 96-bit mantissa, a power-of-ten scale and a sign.
///
/// Stored as the four 32-bit components it is transcoded as: `lo`, `mid`, `hi`
/// (mantissa, least significant first) and `flags` (scale in bits 16..24,
/// sign in bit 31).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Decimal {
    lo: u32,
    mid: u32,
    hi: u32,
    flags: u32,
}

impl Decimal {
    /// Largest supported scale.
    pub const MAX_SCALE: u8 = 28;

    const SIGN_MASK: u32 = 0x8000_0000;
    const SCALE_MASK: u32 = 0x00FF_0000;
    const SCALE_SHIFT: u32 = 16;

    /// Build from mantissa, scale and sign.
    pub fn new(mantissa: u128, scale: u8, negative: bool) -> Result<Self> {
        if mantissa >> 96 != 0 {
            return Err(CodecError::InvalidArgument(format!(
                "decimal mantissa {mantissa} exceeds 96 bits"
            )));
        }
        if scale > Self::MAX_SCALE {
            return Err(CodecError::InvalidArgument(format!("decimal scale {scale} exceeds 28")));
        }
        let sign = if negative { Self::SIGN_MASK } else { 0 };
        Ok(Self {
            lo: mantissa as u32,
            mid: (mantissa >> 32) as u32,
            hi: (mantissa >> 64) as u32,
            flags: sign | (u32::from(scale) << Self::SCALE_SHIFT),
        })
    }

    /// Build from the four raw components, validating the flags word.
    pub fn from_parts(parts: [u32; 4]) -> Result<Self> {
        let [lo, mid, hi, flags] = parts;
        let scale = (flags & Self::SCALE_MASK) >> Self::SCALE_SHIFT;
        if flags & !(Self::SIGN_MASK | Self::SCALE_MASK) != 0 || scale > u32::from(Self::MAX_SCALE) {
            return Err(CodecError::InvalidArgument(format!("invalid decimal flags {flags:#010x}")));
        }
        Ok(Self { lo, mid, hi, flags })
    }

    /// The four raw components: lo, mid, hi, flags.
    pub const fn parts(self) -> [u32; 4] {
        [self.lo, self.mid, self.hi, self.flags]
    }

    /// Unsigned 96-bit mantissa.
    pub fn mantissa(self) -> u128 {
        u128::from(self.lo) | (u128::from(self.mid) << 32) | (u128::from(self.hi) << 64)
    }

    /// Power-of-ten divisor exponent.
    pub const fn scale(self) -> u8 {
        ((self.flags & Self::SCALE_MASK) >> Self::SCALE_SHIFT) as u8
    }

    /// Whether the sign bit is set.
    pub const fn is_negative(self) -> bool {
        self.flags & Self::SIGN_MASK != 0
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.mantissa().to_string();
        let scale = usize::from(self.scale());
        let padded = if digits.len() <= scale {
            format!("{}{digits}", "0".repeat(scale + 1 - digits.len()))
        } else {
            digits
        };

        if self.is_negative() {
            f.write_str("-")?;
        }
        let (int, frac) = padded.split_at(padded.len() - scale);
        if frac.is_empty() { f.write_str(int) } else { write!(f, "{int}.{frac}") }
    }
}

impl FromStr for Decimal {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self> {
        let bad = || CodecError::InvalidArgument(format!("`{s}` is not a valid decimal"));

        let (negative, unsigned) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let (int, frac) = unsigned.split_once('.').unwrap_or((unsigned, ""));
        if int.is_empty() && frac.is_empty() {
            return Err(bad());
        }
        if !int.bytes().chain(frac.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(bad());
        }

        let scale = u8::try_from(frac.len()).map_err(|_| bad())?;
        let mantissa = format!("{int}{frac}").parse::<u128>().map_err(|_| bad())?;
        Self::new(mantissa, scale, negative)
    }
}

/// Date/time instant as a count of 100 ns ticks since 0001-01-01T00:00:00.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct DateTime {
    ticks: i64,
}

impl DateTime {
    /// Largest valid tick count (9999-12-31T23:59:59.9999999).
    pub const MAX_TICKS: i64 = 3_155_378_975_999_999_999;

    /// Ticks at 1970-01-01T00:00:00.
    pub const UNIX_EPOCH_TICKS: i64 = 621_355_968_000_000_000;

    /// The Unix epoch.
    pub const UNIX_EPOCH: Self = Self { ticks: Self::UNIX_EPOCH_TICKS };

    const NANOS_PER_TICK: u128 = 100;

    /// Build from a tick count, rejecting values outside `0..=MAX_TICKS`.
    pub fn from_ticks(ticks: i64) -> Result<Self> {
        if (0..=Self::MAX_TICKS).contains(&ticks) {
            Ok(Self { ticks })
        } else {
            Err(CodecError::TicksOutOfRange(ticks))
        }
    }

    /// Tick count.
    pub const fn ticks(self) -> i64 {
        self.ticks
    }

    /// Convert from a system time, truncating to tick precision.
    pub fn from_system_time(time: SystemTime) -> Result<Self> {
        let (before_epoch, offset) = match time.duration_since(SystemTime::UNIX_EPOCH) {
            Ok(after) => (false, after),
            Err(err) => (true, err.duration()),
        };
        let offset_ticks = i64::try_from(offset.as_nanos() / Self::NANOS_PER_TICK)
            .map_err(|_| CodecError::TicksOutOfRange(i64::MAX))?;
        let ticks = if before_epoch {
            Self::UNIX_EPOCH_TICKS.checked_sub(offset_ticks)
        } else {
            Self::UNIX_EPOCH_TICKS.checked_add(offset_ticks)
        };
        Self::from_ticks(ticks.ok_or(CodecError::TicksOutOfRange(i64::MAX))?)
    }

    /// Convert to a system time.
    pub fn to_system_time(self) -> SystemTime {
        const TICKS_PER_SEC: u64 = 10_000_000;

        let delta = self.ticks - Self::UNIX_EPOCH_TICKS;
        let abs = delta.unsigned_abs();
        let offset = Duration::new(abs / TICKS_PER_SEC, ((abs % TICKS_PER_SEC) * 100) as u32);
        if delta >= 0 {
            SystemTime::UNIX_EPOCH + offset
        } else {
            SystemTime::UNIX_EPOCH - offset
        }
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ticks)
    }
}

/// A fixed-width type with a static kind.
pub trait Primitive: Copy + Sized {
    /// Kind this type is transcoded as.
    const KIND: PrimitiveKind;

    /// Wrap into the dynamic form.
    fn into_value(self) -> Value;

    /// Unwrap from the dynamic form; `None` on a kind mismatch.
    fn from_value(value: Value) -> Option<Self>;
}

macro_rules! impl_primitive {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl Primitive for $ty {
                const KIND: PrimitiveKind = PrimitiveKind::$variant;

                fn into_value(self) -> Value {
                    Value::$variant(self)
                }

                fn from_value(value: Value) -> Option<Self> {
                    match value {
                        Value::$variant(v) => Some(v),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_primitive! {
    bool => Bool,
    u8 => U8,
    i8 => I8,
    WideChar => Char,
    i16 => I16,
    u16 => U16,
    i32 => I32,
    u32 => U32,
    i64 => I64,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    Decimal => Decimal,
    Guid => Guid,
    DateTime => DateTime,
}

mod sealed {
    pub trait Sealed {}
}

/// Integer primitives that can back a [`WireEnum`].
pub trait IntegerPrimitive: Primitive + Into<i128> + sealed::Sealed {}

macro_rules! impl_integer {
    ($($ty:ty),*) => {
        $(
            impl sealed::Sealed for $ty {}
            impl IntegerPrimitive for $ty {}
        )*
    };
}

impl_integer!(u8, i8, i16, u16, i32, u32, i64, u64);

/// An enumeration transcoded as its underlying integer.
///
/// ```
/// use streamwire_codec::WireEnum;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// enum Color {
///     Red = 1,
///     Green = 2,
/// }
///
/// impl WireEnum for Color {
///     const NAME: &'static str = "Color";
///     type Repr = u16;
///
///     fn to_repr(self) -> u16 {
///         self as u16
///     }
///
///     fn from_repr(repr: u16) -> Option<Self> {
///         match repr {
///             1 => Some(Self::Red),
///             2 => Some(Self::Green),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait WireEnum: Copy + Sized {
    /// Type name, for diagnostics.
    const NAME: &'static str;

    /// Underlying integer type.
    type Repr: IntegerPrimitive;

    /// Underlying value of this variant.
    fn to_repr(self) -> Self::Repr;

    /// Variant for an underlying value, if any.
    fn from_repr(repr: Self::Repr) -> Option<Self>;
}
