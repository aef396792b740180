use serde::Serialize;

use crate::{header::NdefHeader, ndef_type::NdefType, payload::NdefPayload};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, uniffi::Record)]
pub struct NdefRecord {
    pub header: NdefHeader,
    #[serde(rename = "type")]
    pub type_: Vec<u8>,
    pub id: Option<Vec<u8>>,
    pub payload: NdefPayload,
}

/// A record as handed over by a platform that has already split the message
/// (android `NdefRecord`), the payload is still undecoded
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct RawNdefRecord {
    pub tnf: u8,
    pub type_: Vec<u8>,
    pub id: Vec<u8>,
    pub payload: Vec<u8>,
}

impl RawNdefRecord {
    pub fn type_name_format(&self) -> NdefType {
        NdefType::from_bits(self.tnf)
    }

    /// Platforms report a missing id as an empty one
    pub fn id(&self) -> Option<&[u8]> {
        (!self.id.is_empty()).then_some(self.id.as_slice())
    }
}

// only used for uniffi
mod ffi {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq, uniffi::Object)]
    pub struct NdefRecordReader {
        record: NdefRecord,
    }

    #[uniffi::export]
    impl NdefRecordReader {
        #[uniffi::constructor]
        pub fn new(record: NdefRecord) -> Self {
            Self { record }
        }

        pub fn type_(&self) -> Option<String> {
            String::from_utf8(self.record.type_.clone()).ok()
        }

        pub fn id(&self) -> Option<String> {
            let id = self.record.id.as_ref()?;
            String::from_utf8(id.clone()).ok()
        }

        pub fn text(&self) -> Option<String> {
            self.record.payload.as_text().map(ToString::to_string)
        }

        pub fn is_unknown(&self) -> bool {
            self.record.payload.is_unknown()
        }
    }
}
