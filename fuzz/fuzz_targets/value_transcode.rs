//! Decoding then re-encoding any 16-byte window reproduces the input bytes
//! for every kind that accepts it.

#![no_main]

use libfuzzer_sys::fuzz_target;
use streamwire_codec::{Codec, CodecConfig, Endianness, PrimitiveKind};

fuzz_target!(|data: &[u8]| {
    for host in [Endianness::Big, Endianness::Little] {
        let codec = Codec::with_host(CodecConfig::default(), host);
        for kind in PrimitiveKind::ALL {
            if data.len() < kind.size() {
                continue;
            }
            // Decimal flags and DateTime range are validated, bool folds to 0/1
            let Ok(value) = codec.decode(data, kind, 0) else {
                continue;
            };
            if kind == PrimitiveKind::Bool {
                continue;
            }
            assert_eq!(codec.encode(&value), &data[..kind.size()], "{kind}");
        }
    }
});
