//! The structured result of one tag discovery

use nfc_macros::new_type;
use nfc_ndef::NdefMessage;
use nfc_tag::TagData;
use serde::Serialize;

new_type!(SerialNumber, String);

/// Default origin reported with every discovery
pub const DEFAULT_ORIGIN: &str = "android";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, uniffi::Record)]
pub struct DiscoveryResult {
    /// Uppercase hex tag id, empty when the platform had no tag object
    #[serde(rename = "id")]
    pub serial_number: SerialNumber,
    pub origin: String,

    /// Serialized as top level `type` and `data` fields
    #[serde(flatten)]
    pub data: NfcData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, uniffi::Enum)]
#[serde(tag = "type", content = "data", rename_all = "UPPERCASE")]
pub enum NfcData {
    Ndef(NdefData),
    Tag(TagData),
}

/// Every ndef message delivered with one discovery, in delivery order
///
/// Serializes as the bare array of messages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, uniffi::Record)]
#[serde(transparent)]
pub struct NdefData {
    pub messages: Vec<NdefMessage>,
}

impl DiscoveryResult {
    pub fn new(serial_number: impl Into<SerialNumber>, origin: impl Into<String>, data: NfcData) -> Self {
        Self {
            serial_number: serial_number.into(),
            origin: origin.into(),
            data,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

mod ffi {
    use super::DiscoveryResult;

    /// JSON for hosts that hand the result straight to a javascript layer
    #[uniffi::export]
    fn discovery_result_to_json(result: DiscoveryResult) -> Option<String> {
        result
            .to_json()
            .inspect_err(|error| tracing::error!("unable to serialize discovery: {error}"))
            .ok()
    }
}
