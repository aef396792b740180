//! NDEF message decoding
//!
//! Frames raw ndef bytes into records and decodes the well known text and uri
//! types, mime, external and absolute uri records. A record that can't be
//! decoded is kept as [`payload::NdefPayload::Unknown`] in its original
//! position, it never fails the rest of the message.

uniffi::setup_scaffolding!();

pub mod decode;
pub mod ffi;
pub mod header;
pub mod message;
pub mod message_info;
pub mod ndef_type;
pub mod parser;
pub mod payload;
pub mod reader;
pub mod record;
pub mod resume;

pub use decode::NdefError;
pub use message::NdefMessage;
pub use payload::NdefPayload;
pub use record::{NdefRecord, RawNdefRecord};

/// Decode a complete ndef message, as returned by `NdefMessage.toByteArray()`
pub fn parse_message(data: &[u8]) -> NdefMessage {
    parser::parse_ndef_message(data)
}

/// Decode a message the platform already split into records
pub fn decode_records(records: Vec<RawNdefRecord>) -> NdefMessage {
    parser::decode_raw_records(records)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn records_serialize_with_type_tags() {
        let message = parse_message(&[0xD1, 0x01, 0x06, 0x55, 0x03, b'h', b'e', b'l', b'l', b'o']);
        let value = serde_json::to_value(&message).unwrap();

        let record = &value["records"][0];
        assert_eq!(record["payload"], json!({ "type": "URI", "data": "http://hello" }));
        assert_eq!(record["header"]["type_name_format"], "well_known");
        assert_eq!(record["type"], json!([0x55]));
    }

    #[test]
    fn text_payload_serializes_encoding_name() {
        let raw = RawNdefRecord {
            tnf: 0x01,
            type_: b"T".to_vec(),
            id: vec![],
            payload: vec![0x02, b'e', b'n', b'h', b'i'],
        };

        let message = decode_records(vec![raw]);
        let value = serde_json::to_value(&message.records[0].payload).unwrap();

        assert_eq!(
            value,
            json!({ "type": "TEXT", "data": { "format": "UTF-8", "language": "en", "text": "hi" } })
        );
    }
}
