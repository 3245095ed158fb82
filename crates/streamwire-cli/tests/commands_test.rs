//! End-to-end tests for the `streamwire` binary and its library entry points.

use std::{fs, io::Cursor, process::Command};

use proptest::prelude::*;
use streamwire_cli::{Assignment, Field, codec_for, run_decode, run_encode};
use streamwire_codec::{ByteOrder, TextEncoding};
use tempfile::TempDir;

fn streamwire() -> Command {
    Command::new(env!("CARGO_BIN_EXE_streamwire"))
}

fn assignments(specs: &[&str]) -> Vec<Assignment> {
    specs.iter().map(|s| s.parse().unwrap()).collect()
}

#[test]
fn encode_to_file_then_decode_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("frame.bin");

    let codec = codec_for(ByteOrder::LittleEndian, None);
    let fields = assignments(&["i8=-1", "u32=7", "bytes=00ff", "text=ok"]);
    let mut file = fs::File::create(&path).unwrap();
    run_encode(&codec, &fields, &mut file).unwrap();
    drop(file);

    let wire = fs::read(&path).unwrap();
    assert_eq!(hex::encode(&wire), "80070000000200000000ff040000006f006b00");

    let layout: Vec<Field> = fields.iter().map(|a| a.field).collect();
    let mut out = Vec::new();
    run_decode(&codec, &mut fs::File::open(&path).unwrap(), &layout, &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "i8: -1\nu32: 7\nbytes: 00ff\ntext: \"ok\"\n");
}

#[test]
fn binary_round_trips_through_a_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("frame.bin");

    let status = streamwire()
        .args(["encode", "--order", "big", "--encoding", "utf-8"])
        .args(["--field", "u16=513", "--field", "short-text=héllo", "--field", "fixed-text:4=ab"])
        .arg("-o")
        .arg(&path)
        .status()
        .unwrap();
    assert!(status.success());
    assert_eq!(hex::encode(fs::read(&path).unwrap()), "02010668c3a96c6c6f61622020");

    let output = streamwire()
        .args(["decode", "--order", "big", "--encoding", "utf-8"])
        .args(["--layout", "u16,short-text,fixed-text:4"])
        .arg(&path)
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "u16: 513\nshort-text: \"héllo\"\nfixed-text:4: \"ab  \"\n"
    );
}

#[test]
fn truncated_input_exits_with_error_chain() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("short.bin");
    fs::write(&path, [0x01, 0x02, 0x03]).unwrap();

    let output = streamwire().args(["decode", "--layout", "u32"]).arg(&path).output().unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("read 3 bytes instead of 4"), "{stderr}");
}

#[test]
fn unknown_field_is_rejected_by_argument_parsing() {
    let output = streamwire().args(["decode", "--layout", "u24"]).output().unwrap();
    assert!(!output.status.success());
}

proptest! {
    #[test]
    fn text_fields_round_trip_in_every_encoding(text in "[ -~]{0,40}", order in 0u8..3) {
        let order = ByteOrder::from_u8(order).unwrap();
        for encoding in [None, Some(TextEncoding::Ascii), Some(TextEncoding::Utf16Le)] {
            let codec = codec_for(order, encoding);
            let fields = vec![Assignment { field: Field::Text, value: text.clone() }];
            let mut sink = Vec::new();
            run_encode(&codec, &fields, &mut sink).unwrap();

            let mut out = Vec::new();
            run_decode(&codec, &mut Cursor::new(sink), &[Field::Text], &mut out).unwrap();
            prop_assert_eq!(String::from_utf8(out).unwrap(), format!("text: {text:?}\n"));
        }
    }
}
