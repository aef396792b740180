use std::sync::Arc;

use parking_lot::Mutex;

use crate::{
    message::NdefMessage,
    message_info::MessageInfo,
    reader::{BYTES_PER_PAGE, NdefReader, NdefReaderError, PAGES_PER_READ, ParseResult},
    record::RawNdefRecord,
    resume::ResumeError,
};

#[derive(Debug, Clone, uniffi::Object)]
pub struct FfiNdefReader(Arc<Mutex<NdefReader>>);

impl Default for FfiNdefReader {
    fn default() -> Self {
        Self::new()
    }
}

#[uniffi::export]
impl FfiNdefReader {
    #[uniffi::constructor]
    pub fn new() -> Self {
        Self(Arc::new(Mutex::new(NdefReader::new())))
    }

    #[uniffi::method]
    pub fn parse(&self, data: Vec<u8>) -> Result<ParseResult, NdefReaderError> {
        self.0.lock().parse(data)
    }

    #[uniffi::method]
    pub fn is_resumeable(&self, data: Vec<u8>) -> Result<(), ResumeError> {
        self.0.lock().is_resumeable(&data)
    }

    #[uniffi::method]
    pub fn is_started(&self) -> bool {
        self.0.lock().is_started()
    }

    #[uniffi::method]
    pub fn message_info(&self) -> Option<MessageInfo> {
        self.0.lock().message_info().copied()
    }
}

#[uniffi::export]
fn parse_ndef_message(data: Vec<u8>) -> NdefMessage {
    crate::parse_message(&data)
}

#[uniffi::export]
fn decode_ndef_records(records: Vec<RawNdefRecord>) -> NdefMessage {
    crate::decode_records(records)
}

#[uniffi::export]
fn ndef_bytes_per_read() -> u16 {
    PAGES_PER_READ * BYTES_PER_PAGE
}
