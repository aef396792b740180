use serde::Serialize;

use crate::ndef_type::NdefType;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, uniffi::Record)]
pub struct NdefHeader {
    pub message_begin: bool,
    pub message_end: bool,
    pub chunked: bool,
    pub short_record: bool,
    pub has_id_length: bool,
    pub type_name_format: NdefType,
    pub type_length: u8,
    pub payload_length: u32,
    pub id_length: Option<u8>,
}

impl NdefHeader {
    /// Header for a record the platform already split out of its message,
    /// `position` and `count` place it inside that message
    pub fn synthesize(
        type_name_format: NdefType,
        type_: &[u8],
        id: Option<&[u8]>,
        payload_length: usize,
        position: usize,
        count: usize,
    ) -> Self {
        let id_length = id.map(|id| id.len().min(u8::MAX as usize) as u8);

        Self {
            message_begin: position == 0,
            message_end: position + 1 == count,
            chunked: false,
            short_record: payload_length <= u8::MAX as usize,
            has_id_length: id_length.is_some(),
            type_name_format,
            type_length: type_.len().min(u8::MAX as usize) as u8,
            payload_length: payload_length.min(u32::MAX as usize) as u32,
            id_length,
        }
    }
}
