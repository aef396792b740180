use nfc_ndef::NdefMessage;
use serde::Serialize;

use crate::technology::Technology;

/// Decoded parameters of one technology, fields that could not be read are `None`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, uniffi::Enum)]
#[serde(tag = "technology")]
pub enum TechnologyParams {
    IsoDep {
        historical_bytes: Option<String>,
        hi_layer_response: Option<String>,
        extended_length_apdu_supported: Option<bool>,
        max_transceive_length: Option<u32>,
        timeout: Option<u32>,
    },
    NfcA {
        atqa: Option<u16>,
        sak: Option<u8>,
        max_transceive_length: Option<u32>,
        timeout: Option<u32>,
    },
    NfcB {
        application_data: Option<String>,
        protocol_info: Option<String>,
        max_transceive_length: Option<u32>,
    },
    NfcF {
        manufacturer: Option<String>,
        system_code: Option<u16>,
        max_transceive_length: Option<u32>,
        timeout: Option<u32>,
    },
    NfcV {
        dsf_id: Option<u8>,
        response_flags: Option<u8>,
        max_transceive_length: Option<u32>,
    },
    Ndef {
        ndef_type: Option<String>,
        max_size: Option<u32>,
        writable: Option<bool>,
        can_make_read_only: Option<bool>,
        message: Option<NdefMessage>,
    },
    NdefFormatable,
    MifareClassic {
        mifare_type: MifareClassicType,
        size: Option<u32>,
        sector_count: Option<u32>,
        block_count: Option<u32>,
        timeout: Option<u32>,
    },
    MifareUltralight {
        mifare_type: MifareUltralightType,
        timeout: Option<u32>,
    },
}

impl TechnologyParams {
    pub fn technology(&self) -> Technology {
        match self {
            Self::IsoDep { .. } => Technology::IsoDep,
            Self::NfcA { .. } => Technology::NfcA,
            Self::NfcB { .. } => Technology::NfcB,
            Self::NfcF { .. } => Technology::NfcF,
            Self::NfcV { .. } => Technology::NfcV,
            Self::Ndef { .. } => Technology::Ndef,
            Self::NdefFormatable => Technology::NdefFormatable,
            Self::MifareClassic { .. } => Technology::MifareClassic,
            Self::MifareUltralight { .. } => Technology::MifareUltralight,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, uniffi::Enum)]
pub enum MifareClassicType {
    Classic,
    Plus,
    Pro,
    Unknown,
}

impl MifareClassicType {
    pub fn from_android(value: i32) -> Self {
        match value {
            0 => Self::Classic,
            1 => Self::Plus,
            2 => Self::Pro,
            _ => Self::Unknown,
        }
    }
}

/// Sizes a MIFARE Classic can come in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MifareClassicSize {
    Mini,
    OneK,
    TwoK,
    FourK,
}

impl MifareClassicSize {
    pub fn from_bytes(size: u32) -> Option<Self> {
        match size {
            320 => Some(Self::Mini),
            1024 => Some(Self::OneK),
            2048 => Some(Self::TwoK),
            4096 => Some(Self::FourK),
            _ => None,
        }
    }

    /// Infer the size from the SAK byte of the anticollision response
    pub fn from_sak(sak: u8) -> Option<Self> {
        match sak {
            0x09 => Some(Self::Mini),
            0x08 | 0x28 | 0x88 => Some(Self::OneK),
            0x19 => Some(Self::TwoK),
            0x18 | 0x38 | 0x98 | 0xB8 => Some(Self::FourK),
            _ => None,
        }
    }

    pub const fn bytes(self) -> u32 {
        match self {
            Self::Mini => 320,
            Self::OneK => 1024,
            Self::TwoK => 2048,
            Self::FourK => 4096,
        }
    }

    /// The first 32 sectors have 4 blocks, sectors after that have 16
    pub const fn sector_count(self) -> u32 {
        match self {
            Self::Mini => 5,
            Self::OneK => 16,
            Self::TwoK => 32,
            Self::FourK => 40,
        }
    }

    pub const fn block_count(self) -> u32 {
        match self {
            Self::Mini => 20,
            Self::OneK => 64,
            Self::TwoK => 128,
            Self::FourK => 256,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, uniffi::Enum)]
pub enum MifareUltralightType {
    Ultralight,
    UltralightC,
    UltralightEv1,
    Ntag213,
    Ntag215,
    Ntag216,
    Unknown,
}

impl MifareUltralightType {
    pub fn from_android(value: i32) -> Self {
        match value {
            1 => Self::Ultralight,
            2 => Self::UltralightC,
            _ => Self::Unknown,
        }
    }

    /// GET_VERSION response: header, vendor, product type, subtype, major,
    /// minor, storage size, protocol
    pub fn from_version(version: &[u8]) -> Self {
        const NXP: u8 = 0x04;
        const ULTRALIGHT: u8 = 0x03;
        const NTAG: u8 = 0x04;

        match version {
            [_, NXP, ULTRALIGHT, _, _, _, 0x0B | 0x0E, _] => Self::UltralightEv1,
            [_, NXP, NTAG, _, _, _, 0x0F, _] => Self::Ntag213,
            [_, NXP, NTAG, _, _, _, 0x11, _] => Self::Ntag215,
            [_, NXP, NTAG, _, _, _, 0x13, _] => Self::Ntag216,
            _ => Self::Unknown,
        }
    }
}
