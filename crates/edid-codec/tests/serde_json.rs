//! JSON round trips through the `serde` feature.

mod common;

use common::*;
use edid_codec::descriptor::Descriptor;
use edid_codec::{read, write, EdidRecord};

#[test]
fn test_record_json_round_trip() {
    let bytes = sample_edid();
    let edid = read(&bytes).unwrap();
    let json = serde_json::to_string_pretty(&edid).unwrap();
    let back: EdidRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(back, edid);
    assert_eq!(write(&back).unwrap(), bytes);
}

#[test]
fn test_descriptor_variants_by_shape() {
    let cases = [
        (r#"{"product_name":"LCD"}"#, Descriptor::product_name("LCD")),
        (r#"{"serial_number":"123"}"#, Descriptor::serial_number("123")),
        (r#"{"string":"hello"}"#, Descriptor::string("hello")),
        ("{}", Descriptor::dummy()),
    ];
    for (json, expected) in cases {
        let desc: Descriptor = serde_json::from_str(json).unwrap();
        assert_eq!(desc, expected, "{}", json);
    }

    let raw: Descriptor =
        serde_json::from_str("[0,0,0,66,0,1,2,3,4,5,6,7,8,9,10,11,12,13]").unwrap();
    assert!(matches!(raw, Descriptor::Opaque(b) if b[3] == 0x42));
}

#[test]
fn test_unknown_field_is_rejected() {
    let result: Result<Descriptor, _> =
        serde_json::from_str(r#"{"product_name":"LCD","extra":1}"#);
    assert!(result.is_err());
}
