//! What the platform has to provide for a discovered tag
//!
//! Every read is a query, nothing is ever written to the tag. The platform
//! connects to the technology, reads what it can and closes it again. Values
//! it could not read are left as `None`.

use crate::{error::TagError, technology::Technology};

#[uniffi::export(with_foreign)]
pub trait TagAccess: Send + Sync + std::fmt::Debug + 'static {
    /// Tag identifier (UID), empty if the tag did not report one
    fn id(&self) -> Vec<u8>;

    /// Technology identifiers as reported by the platform
    fn tech_list(&self) -> Vec<String>;

    /// Connect to the technology, read it, close it again
    fn read(&self, technology: Technology) -> Result<TechnologyReadout, TagError>;
}

/// Raw values read from one technology, before any decoding
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Enum)]
pub enum TechnologyReadout {
    IsoDep(IsoDepReadout),
    NfcA(NfcAReadout),
    NfcB(NfcBReadout),
    NfcF(NfcFReadout),
    NfcV(NfcVReadout),
    Ndef(NdefReadout),
    NdefFormatable,
    MifareClassic(MifareClassicReadout),
    MifareUltralight(MifareUltralightReadout),
}

impl TechnologyReadout {
    pub fn technology(&self) -> Technology {
        match self {
            Self::IsoDep(_) => Technology::IsoDep,
            Self::NfcA(_) => Technology::NfcA,
            Self::NfcB(_) => Technology::NfcB,
            Self::NfcF(_) => Technology::NfcF,
            Self::NfcV(_) => Technology::NfcV,
            Self::Ndef(_) => Technology::Ndef,
            Self::NdefFormatable => Technology::NdefFormatable,
            Self::MifareClassic(_) => Technology::MifareClassic,
            Self::MifareUltralight(_) => Technology::MifareUltralight,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, uniffi::Record)]
pub struct IsoDepReadout {
    pub historical_bytes: Option<Vec<u8>>,
    pub hi_layer_response: Option<Vec<u8>>,
    pub extended_length_apdu_supported: Option<bool>,
    pub max_transceive_length: Option<u32>,
    pub timeout: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, uniffi::Record)]
pub struct NfcAReadout {
    /// In transmission order, least significant byte first
    pub atqa: Option<Vec<u8>>,
    pub sak: Option<u16>,
    pub max_transceive_length: Option<u32>,
    pub timeout: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, uniffi::Record)]
pub struct NfcBReadout {
    pub application_data: Option<Vec<u8>>,
    pub protocol_info: Option<Vec<u8>>,
    pub max_transceive_length: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, uniffi::Record)]
pub struct NfcFReadout {
    /// PMm, 8 bytes
    pub manufacturer: Option<Vec<u8>>,
    /// 2 bytes, big endian
    pub system_code: Option<Vec<u8>>,
    pub max_transceive_length: Option<u32>,
    pub timeout: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, uniffi::Record)]
pub struct NfcVReadout {
    pub dsf_id: Option<u8>,
    pub response_flags: Option<u8>,
    pub max_transceive_length: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, uniffi::Record)]
pub struct NdefReadout {
    /// e.g. `org.nfcforum.ndef.type2`
    pub ndef_type: Option<String>,
    pub max_size: Option<u32>,
    pub writable: Option<bool>,
    pub can_make_read_only: Option<bool>,

    /// Message the platform read while discovering the tag, as raw ndef bytes
    pub cached_message: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, uniffi::Record)]
pub struct MifareClassicReadout {
    /// Android `MifareClassic.TYPE_*`: 0 classic, 1 plus, 2 pro, -1 unknown
    pub classic_type: Option<i32>,
    /// Memory size in bytes
    pub size: Option<u32>,
    pub timeout: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, uniffi::Record)]
pub struct MifareUltralightReadout {
    /// Android `MifareUltralight.TYPE_*`: 1 ultralight, 2 ultralight c, -1 unknown
    pub ultralight_type: Option<i32>,
    /// Response to GET_VERSION (0x60), 8 bytes, absent on tags that don't support it
    pub version: Option<Vec<u8>>,
    pub timeout: Option<u32>,
}
