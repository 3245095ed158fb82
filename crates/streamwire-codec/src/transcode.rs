//! Primitive <-> host-native bytes.
//!
//! Both directions work purely in the host's layout; byte order directives
//! are applied afterwards by [`crate::order::fix_byte_order`]. The host order
//! is a parameter so either architecture can be exercised from one machine.

use zerocopy::byteorder::{big_endian, little_endian};

use crate::{
    errors::{CodecError, Result},
    kind::PrimitiveKind,
    order::Endianness,
    value::{DateTime, Decimal, Guid, Value, WideChar},
};

macro_rules! native_int {
    ($read:ident, $write:ident, $ty:ty, $wire:ident) => {
        fn $read(bytes: [u8; size_of::<$ty>()], host: Endianness) -> $ty {
            match host {
                Endianness::Big => big_endian::$wire::from_bytes(bytes).get(),
                Endianness::Little => little_endian::$wire::from_bytes(bytes).get(),
            }
        }

        fn $write(value: $ty, host: Endianness) -> [u8; size_of::<$ty>()] {
            match host {
                Endianness::Big => big_endian::$wire::new(value).to_bytes(),
                Endianness::Little => little_endian::$wire::new(value).to_bytes(),
            }
        }
    };
}

native_int!(read_u16, write_u16, u16, U16);
native_int!(read_i16, write_i16, i16, I16);
native_int!(read_u32, write_u32, u32, U32);
native_int!(read_i32, write_i32, i32, I32);
native_int!(read_u64, write_u64, u64, U64);
native_int!(read_i64, write_i64, i64, I64);

fn window<const N: usize>(bytes: &[u8], start: usize, kind: PrimitiveKind) -> Result<[u8; N]> {
    let too_short =
        || CodecError::BufferTooShort { kind, start, needed: N, available: bytes.len() };
    let end = start.checked_add(N).ok_or_else(too_short)?;
    let slice = bytes.get(start..end).ok_or_else(too_short)?;
    slice.try_into().map_err(|_| too_short())
}

/// Signed byte from its sign-flag encoding.
///
/// The low 7 bits carry a magnitude; bit 7 set means the value is the one's
/// complement of that magnitude. This is not two's complement: `0x80` is -1
/// and `0xFF` is -128.
pub fn decode_i8(byte: u8) -> i8 {
    let magnitude = (byte & 0x7F) as i8;
    if byte & 0x80 == 0 { magnitude } else { !magnitude }
}

/// Sign-flag encoding of a signed byte. Inverse of [`decode_i8`].
pub fn encode_i8(value: i8) -> u8 {
    let input = i32::from(value);
    let (flag, magnitude) = if input < 0 { (0x80, !input) } else { (0, input) };
    (magnitude + flag) as u8
}

/// GUID from its host-native 16 bytes.
///
/// The buffer is first brought to the canonical big-endian form (reversed on
/// a little-endian host). Reading that form field-wise big-endian is the same
/// as reversing its 4-, 2- and 2-byte groups into the mixed layout and keeping
/// the trailing 8 bytes as they are.
pub fn decode_guid(mut bytes: [u8; 16], host: Endianness) -> Guid {
    if host == Endianness::Little {
        bytes.reverse();
    }
    Guid::from_canonical_bytes(bytes)
}

/// Host-native 16 bytes of a GUID. Inverse of [`decode_guid`].
pub fn encode_guid(guid: Guid, host: Endianness) -> [u8; 16] {
    let mut bytes = guid.to_canonical_bytes();
    if host == Endianness::Little {
        bytes.reverse();
    }
    bytes
}

/// Interpret `kind.size()` bytes at `start` as a host-native value.
pub fn decode(bytes: &[u8], kind: PrimitiveKind, start: usize, host: Endianness) -> Result<Value> {
    let value = match kind {
        PrimitiveKind::Bool => Value::Bool(window::<1>(bytes, start, kind)?[0] != 0),
        PrimitiveKind::U8 => Value::U8(window::<1>(bytes, start, kind)?[0]),
        PrimitiveKind::I8 => Value::I8(decode_i8(window::<1>(bytes, start, kind)?[0])),
        PrimitiveKind::Char => Value::Char(WideChar(read_u16(window(bytes, start, kind)?, host))),
        PrimitiveKind::I16 => Value::I16(read_i16(window(bytes, start, kind)?, host)),
        PrimitiveKind::U16 => Value::U16(read_u16(window(bytes, start, kind)?, host)),
        PrimitiveKind::I32 => Value::I32(read_i32(window(bytes, start, kind)?, host)),
        PrimitiveKind::U32 => Value::U32(read_u32(window(bytes, start, kind)?, host)),
        PrimitiveKind::I64 => Value::I64(read_i64(window(bytes, start, kind)?, host)),
        PrimitiveKind::U64 => Value::U64(read_u64(window(bytes, start, kind)?, host)),
        PrimitiveKind::F32 => Value::F32(f32::from_bits(read_u32(window(bytes, start, kind)?, host))),
        PrimitiveKind::F64 => Value::F64(f64::from_bits(read_u64(window(bytes, start, kind)?, host))),
        PrimitiveKind::Decimal => {
            let raw: [u8; 16] = window(bytes, start, kind)?;
            let mut parts = [0u32; 4];
            for (part, chunk) in parts.iter_mut().zip(raw.chunks_exact(4)) {
                *part = read_u32([chunk[0], chunk[1], chunk[2], chunk[3]], host);
            }
            Value::Decimal(Decimal::from_parts(parts)?)
        },
        PrimitiveKind::Guid => Value::Guid(decode_guid(window(bytes, start, kind)?, host)),
        PrimitiveKind::DateTime => {
            Value::DateTime(DateTime::from_ticks(read_i64(window(bytes, start, kind)?, host))?)
        },
    };
    Ok(value)
}

/// Host-native bytes of a value; always `value.kind().size()` long.
pub fn encode(value: &Value, host: Endianness) -> Vec<u8> {
    match *value {
        Value::Bool(v) => vec![u8::from(v)],
        Value::U8(v) => vec![v],
        Value::I8(v) => vec![encode_i8(v)],
        Value::Char(WideChar(v)) | Value::U16(v) => write_u16(v, host).to_vec(),
        Value::I16(v) => write_i16(v, host).to_vec(),
        Value::I32(v) => write_i32(v, host).to_vec(),
        Value::U32(v) => write_u32(v, host).to_vec(),
        Value::I64(v) => write_i64(v, host).to_vec(),
        Value::U64(v) => write_u64(v, host).to_vec(),
        Value::F32(v) => write_u32(v.to_bits(), host).to_vec(),
        Value::F64(v) => write_u64(v.to_bits(), host).to_vec(),
        Value::Decimal(d) => d.parts().iter().flat_map(|&part| write_u32(part, host)).collect(),
        Value::Guid(g) => encode_guid(g, host).to_vec(),
        Value::DateTime(dt) => write_i64(dt.ticks(), host).to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;

    const HOSTS: [Endianness; 2] = [Endianness::Big, Endianness::Little];

    #[test]
    fn integer_helpers_follow_host_layout() {
        assert_eq!(write_u16(0x0102, Endianness::Big), [0x01, 0x02]);
        assert_eq!(write_u16(0x0102, Endianness::Little), [0x02, 0x01]);
        assert_eq!(write_i32(-2, Endianness::Big), (-2i32).to_be_bytes());
        assert_eq!(write_i64(-2, Endianness::Little), (-2i64).to_le_bytes());
        assert_eq!(read_u64(hex!("0102030405060708"), Endianness::Big), 0x0102_0304_0506_0708);
        assert_eq!(read_i16(hex!("feff"), Endianness::Little), -2);
        for host in HOSTS {
            assert_eq!(read_u32(write_u32(0xDEAD_BEEF, host), host), 0xDEAD_BEEF);
        }
    }

    #[test]
    fn signed_byte_uses_sign_flag() {
        assert_eq!(encode_i8(0), 0x00);
        assert_eq!(encode_i8(1), 0x01);
        assert_eq!(encode_i8(127), 0x7F);
        assert_eq!(encode_i8(-1), 0x80);
        assert_eq!(encode_i8(-128), 0xFF);

        assert_eq!(decode_i8(0x80), -1);
        assert_eq!(decode_i8(0xFF), -128);
        assert_eq!(decode_i8(0x81), -2);
    }

    #[test]
    fn signed_byte_round_trips_every_value() {
        for v in i8::MIN..=i8::MAX {
            assert_eq!(decode_i8(encode_i8(v)), v);
        }
    }

    #[test]
    fn integers_follow_host_order() {
        let v = Value::U32(0x0102_0304);
        assert_eq!(encode(&v, Endianness::Big), [1, 2, 3, 4]);
        assert_eq!(encode(&v, Endianness::Little), [4, 3, 2, 1]);
        assert_eq!(decode(&[1, 2, 3, 4], PrimitiveKind::U32, 0, Endianness::Big).unwrap(), v);
    }

    #[test]
    fn decode_honours_start_index() {
        let bytes = [0xEE, 0xEE, 0x12, 0x34];
        let v = decode(&bytes, PrimitiveKind::I16, 2, Endianness::Big).unwrap();
        assert_eq!(v, Value::I16(0x1234));
    }

    #[test]
    fn decode_short_buffer_fails() {
        let err = decode(&[0, 1, 2], PrimitiveKind::I32, 0, Endianness::Little).unwrap_err();
        assert!(matches!(err, CodecError::BufferTooShort { needed: 4, available: 3, .. }));

        let err = decode(&[0; 8], PrimitiveKind::U8, usize::MAX, Endianness::Little).unwrap_err();
        assert!(matches!(err, CodecError::BufferTooShort { .. }));
    }

    #[test]
    fn guid_host_native_layout() {
        let guid = Guid::from_canonical_bytes(hex!("00112233445566778899aabbccddeeff"));
        assert_eq!(encode_guid(guid, Endianness::Big), hex!("00112233445566778899aabbccddeeff"));
        assert_eq!(
            encode_guid(guid, Endianness::Little),
            hex!("ffeeddccbbaa99887766554433221100")
        );
    }

    #[test]
    fn guid_decode_matches_group_reassembly() {
        let native = hex!("0f1e2d3c4b5a69788796a5b4c3d2e1f0");
        for host in HOSTS {
            let mut canonical = native;
            if host == Endianness::Little {
                canonical.reverse();
            }
            let mut mixed = [0u8; 16];
            mixed[..4].copy_from_slice(&canonical[..4]);
            mixed[..4].reverse();
            mixed[4..6].copy_from_slice(&canonical[4..6]);
            mixed[4..6].reverse();
            mixed[6..8].copy_from_slice(&canonical[6..8]);
            mixed[6..8].reverse();
            mixed[8..].copy_from_slice(&canonical[8..]);

            assert_eq!(decode_guid(native, host), Guid::from_mixed_bytes(mixed));
        }
    }

    #[test]
    fn guid_round_trips_on_both_hosts() {
        let guids = [
            Guid::NIL,
            Guid::from_canonical_bytes([0xFF; 16]),
            Guid::from_canonical_bytes(hex!("6ba7b810 9dad 11d1 80b4 00c04fd430c8")),
        ];
        for host in HOSTS {
            for guid in guids {
                let bytes = encode(&Value::Guid(guid), host);
                assert_eq!(decode(&bytes, PrimitiveKind::Guid, 0, host).unwrap(), Value::Guid(guid));
            }
        }
    }

    #[test]
    fn decimal_components_are_host_native() {
        let d = Decimal::new(1, 2, true).unwrap();
        let bytes = encode(&Value::Decimal(d), Endianness::Little);
        assert_eq!(bytes, hex!("01000000 00000000 00000000 00000280"));

        let bytes = encode(&Value::Decimal(d), Endianness::Big);
        assert_eq!(bytes, hex!("00000001 00000000 00000000 80020000"));
    }

    #[test]
    fn decimal_with_bad_flags_is_rejected() {
        let bytes = hex!("01000000 00000000 00000000 01000000");
        assert!(decode(&bytes, PrimitiveKind::Decimal, 0, Endianness::Little).is_err());
    }

    #[test]
    fn datetime_out_of_range_is_rejected() {
        let bytes = (-1i64).to_le_bytes();
        let err = decode(&bytes, PrimitiveKind::DateTime, 0, Endianness::Little).unwrap_err();
        assert!(matches!(err, CodecError::TicksOutOfRange(-1)));
    }

    #[test]
    fn bool_decodes_any_nonzero_as_true() {
        assert_eq!(decode(&[2], PrimitiveKind::Bool, 0, Endianness::Big).unwrap(), Value::Bool(true));
        assert_eq!(encode(&Value::Bool(true), Endianness::Big), [1]);
    }

    #[test]
    fn every_kind_encodes_to_its_size() {
        let samples = [
            Value::Bool(false),
            Value::U8(0),
            Value::I8(0),
            Value::Char(WideChar(0)),
            Value::I16(0),
            Value::U16(0),
            Value::I32(0),
            Value::U32(0),
            Value::I64(0),
            Value::U64(0),
            Value::F32(0.0),
            Value::F64(0.0),
            Value::Decimal(Decimal::default()),
            Value::Guid(Guid::NIL),
            Value::DateTime(DateTime::default()),
        ];
        for value in samples {
            assert_eq!(encode(&value, Endianness::native()).len(), value.kind().size());
        }
    }
}
