use serde::Serialize;

use crate::{payload::NdefPayload, record::NdefRecord};

/// An ordered list of records, in the order they were on the tag
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, uniffi::Record)]
pub struct NdefMessage {
    pub records: Vec<NdefRecord>,
}

impl NdefMessage {
    pub fn new(records: Vec<NdefRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn unknown_count(&self) -> usize {
        self.records.iter().filter(|record| record.payload.is_unknown()).count()
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.records.iter().filter_map(|record| record.payload.as_text())
    }

    /// Concatenated bytes of every mime and external record
    pub fn data(&self) -> Vec<u8> {
        self.records
            .iter()
            .filter_map(|record| match &record.payload {
                NdefPayload::Mime(mime) => Some(mime.data.as_slice()),
                NdefPayload::External(external) => Some(external.data.as_slice()),
                _ => None,
            })
            .flatten()
            .copied()
            .collect()
    }
}

mod ffi {
    use super::*;

    #[uniffi::export]
    fn ndef_message_texts(message: NdefMessage) -> Vec<String> {
        message.texts().map(ToString::to_string).collect()
    }

    #[uniffi::export]
    fn ndef_message_data(message: NdefMessage) -> Vec<u8> {
        message.data()
    }
}
