//! Framed reads over arbitrary input must fail cleanly, never panic.
//!
//! The first byte picks the directive, the rest is the stream.

#![no_main]

use std::io::Cursor;

use libfuzzer_sys::fuzz_target;
use streamwire_codec::{ByteOrder, Codec, CodecConfig, CodecError, Endianness, TextEncoding};

fuzz_target!(|data: &[u8]| {
    let Some((&selector, stream)) = data.split_first() else {
        return;
    };
    let order = ByteOrder::from_u8(selector % 3).unwrap_or_default();
    let host = if selector & 0x80 == 0 { Endianness::Little } else { Endianness::Big };
    let codec = Codec::with_host(CodecConfig::default(), host);

    let mut source = Cursor::new(stream);
    loop {
        let before = source.position();
        let result = match before % 4 {
            0 => codec.read_bytes(&mut source, order).map(drop),
            1 => codec.read_short_bytes(&mut source, order).map(drop),
            2 => codec.read_text(&mut source, None, order).map(drop),
            _ => codec.read_short_text(&mut source, Some(TextEncoding::Utf8), order).map(drop),
        };
        match result {
            Ok(()) => assert!(source.position() > before),
            Err(CodecError::IncompleteRead { read, requested }) => {
                assert!(read < requested);
                break;
            },
            // Negative standard length prefix
            Err(CodecError::InvalidArgument(_)) => break,
            Err(other) => panic!("unexpected error: {other}"),
        }
        if source.position() as usize >= stream.len() {
            break;
        }
    }
});
