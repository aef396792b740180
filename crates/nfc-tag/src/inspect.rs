use nfc_util::{hex_upper, result_ext::ResultExt as _};
use tracing::debug;

use crate::{
    access::{
        IsoDepReadout, MifareClassicReadout, MifareUltralightReadout, NdefReadout, NfcAReadout,
        NfcBReadout, NfcFReadout, NfcVReadout, TagAccess, TechnologyReadout,
    },
    error::{FieldError, TagError},
    params::{MifareClassicSize, MifareClassicType, MifareUltralightType, TechnologyParams},
    technology::Technology,
};

/// Turn what the platform read from one technology into decoded parameters
///
/// Fields that fail to decode are dropped, the rest of the technology is kept
pub trait Inspect {
    fn inspect(self) -> TechnologyParams;
}

/// Read one technology from the tag and decode it
pub fn inspect_technology(
    tag: &dyn TagAccess,
    technology: Technology,
) -> Result<TechnologyParams, TagError> {
    let readout = tag.read(technology)?;

    if readout.technology() != technology {
        return Err(TagError::UnexpectedReadout {
            expected: technology,
            actual: readout.technology(),
        });
    }

    debug!("read {technology}");
    Ok(readout.inspect())
}

impl Inspect for TechnologyReadout {
    fn inspect(self) -> TechnologyParams {
        match self {
            Self::IsoDep(readout) => readout.inspect(),
            Self::NfcA(readout) => readout.inspect(),
            Self::NfcB(readout) => readout.inspect(),
            Self::NfcF(readout) => readout.inspect(),
            Self::NfcV(readout) => readout.inspect(),
            Self::Ndef(readout) => readout.inspect(),
            Self::NdefFormatable => TechnologyParams::NdefFormatable,
            Self::MifareClassic(readout) => readout.inspect(),
            Self::MifareUltralight(readout) => readout.inspect(),
        }
    }
}

impl Inspect for IsoDepReadout {
    fn inspect(self) -> TechnologyParams {
        TechnologyParams::IsoDep {
            historical_bytes: self.historical_bytes.as_deref().map(hex_upper),
            hi_layer_response: self.hi_layer_response.as_deref().map(hex_upper),
            extended_length_apdu_supported: self.extended_length_apdu_supported,
            max_transceive_length: self.max_transceive_length,
            timeout: self.timeout,
        }
    }
}

impl Inspect for NfcAReadout {
    fn inspect(self) -> TechnologyParams {
        let atqa = self
            .atqa
            .map(|atqa| decode_atqa(&atqa))
            .and_then(|atqa| atqa.ok_or_warn("dropping atqa"));

        let sak = self
            .sak
            .map(decode_sak)
            .and_then(|sak| sak.ok_or_warn("dropping sak"));

        TechnologyParams::NfcA {
            atqa,
            sak,
            max_transceive_length: self.max_transceive_length,
            timeout: self.timeout,
        }
    }
}

impl Inspect for NfcBReadout {
    fn inspect(self) -> TechnologyParams {
        TechnologyParams::NfcB {
            application_data: self.application_data.as_deref().map(hex_upper),
            protocol_info: self.protocol_info.as_deref().map(hex_upper),
            max_transceive_length: self.max_transceive_length,
        }
    }
}

impl Inspect for NfcFReadout {
    fn inspect(self) -> TechnologyParams {
        let manufacturer = self
            .manufacturer
            .map(|pmm| expect_length("manufacturer", pmm, 8).map(|pmm| hex_upper(&pmm)))
            .and_then(|pmm| pmm.ok_or_warn("dropping manufacturer"));

        let system_code = self
            .system_code
            .map(|code| expect_length("system code", code, 2).map(|c| u16::from_be_bytes([c[0], c[1]])))
            .and_then(|code| code.ok_or_warn("dropping system code"));

        TechnologyParams::NfcF {
            manufacturer,
            system_code,
            max_transceive_length: self.max_transceive_length,
            timeout: self.timeout,
        }
    }
}

impl Inspect for NfcVReadout {
    fn inspect(self) -> TechnologyParams {
        TechnologyParams::NfcV {
            dsf_id: self.dsf_id,
            response_flags: self.response_flags,
            max_transceive_length: self.max_transceive_length,
        }
    }
}

impl Inspect for NdefReadout {
    fn inspect(self) -> TechnologyParams {
        let message = self.cached_message.map(|bytes| nfc_ndef::parse_message(&bytes));

        TechnologyParams::Ndef {
            ndef_type: self.ndef_type,
            max_size: self.max_size,
            writable: self.writable,
            can_make_read_only: self.can_make_read_only,
            message,
        }
    }
}

impl Inspect for MifareClassicReadout {
    fn inspect(self) -> TechnologyParams {
        let mifare_type =
            self.classic_type.map(MifareClassicType::from_android).unwrap_or(MifareClassicType::Unknown);

        let known_size = self.size.and_then(MifareClassicSize::from_bytes);

        TechnologyParams::MifareClassic {
            mifare_type,
            size: self.size,
            sector_count: known_size.map(MifareClassicSize::sector_count),
            block_count: known_size.map(MifareClassicSize::block_count),
            timeout: self.timeout,
        }
    }
}

impl Inspect for MifareUltralightReadout {
    fn inspect(self) -> TechnologyParams {
        let from_android = self
            .ultralight_type
            .map(MifareUltralightType::from_android)
            .unwrap_or(MifareUltralightType::Unknown);

        // the version response is more specific than what android reports
        let mifare_type = match self.version.as_deref().map(MifareUltralightType::from_version) {
            Some(from_version) if from_version != MifareUltralightType::Unknown => from_version,
            _ => from_android,
        };

        TechnologyParams::MifareUltralight {
            mifare_type,
            timeout: self.timeout,
        }
    }
}

/// Fill in a MIFARE Classic size the platform could not read from the NfcA SAK
pub fn infer_classic_size(params: &mut TechnologyParams, sak: Option<u8>) {
    let TechnologyParams::MifareClassic {
        size,
        sector_count,
        block_count,
        ..
    } = params
    else {
        return;
    };

    if size.is_some() {
        return;
    }

    let Some(inferred) = sak.and_then(MifareClassicSize::from_sak) else {
        return;
    };

    debug!("inferred mifare classic size {inferred:?} from sak");
    *size = Some(inferred.bytes());
    *sector_count = Some(inferred.sector_count());
    *block_count = Some(inferred.block_count());
}

/// ATQA is sent least significant byte first
fn decode_atqa(atqa: &[u8]) -> Result<u16, FieldError> {
    match atqa {
        [low, high] => Ok(u16::from_le_bytes([*low, *high])),
        _ => Err(FieldError::Length {
            field: "atqa",
            expected: 2,
            actual: atqa.len(),
        }),
    }
}

fn decode_sak(sak: u16) -> Result<u8, FieldError> {
    u8::try_from(sak).map_err(|_| FieldError::OutOfRange {
        field: "sak",
        value: sak as i64,
    })
}

fn expect_length(field: &'static str, bytes: Vec<u8>, expected: usize) -> Result<Vec<u8>, FieldError> {
    if bytes.len() != expected {
        return Err(FieldError::Length {
            field,
            expected,
            actual: bytes.len(),
        });
    }

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn nfc_a_decodes_atqa_and_sak() {
        let readout = NfcAReadout {
            atqa: Some(vec![0x44, 0x00]),
            sak: Some(0x00),
            max_transceive_length: Some(253),
            timeout: None,
        };

        assert_eq!(
            readout.inspect(),
            TechnologyParams::NfcA {
                atqa: Some(0x0044),
                sak: Some(0x00),
                max_transceive_length: Some(253),
                timeout: None,
            }
        );
    }

    #[test]
    fn bad_fields_are_omitted() {
        let readout = NfcAReadout {
            atqa: Some(vec![0x44]),
            sak: Some(0x1FF),
            ..Default::default()
        };

        let TechnologyParams::NfcA { atqa, sak, .. } = readout.inspect() else {
            panic!("expected nfc a")
        };
        assert_eq!(atqa, None);
        assert_eq!(sak, None);

        let readout = NfcFReadout {
            manufacturer: Some(vec![0x01; 7]),
            system_code: Some(vec![0x88, 0xB4]),
            ..Default::default()
        };

        let TechnologyParams::NfcF {
            manufacturer,
            system_code,
            ..
        } = readout.inspect()
        else {
            panic!("expected nfc f")
        };
        assert_eq!(manufacturer, None);
        assert_eq!(system_code, Some(0x88B4));
    }

    #[test]
    fn iso_dep_bytes_are_hex() {
        let readout = IsoDepReadout {
            historical_bytes: Some(vec![0x80, 0x73, 0xC8, 0x21]),
            extended_length_apdu_supported: Some(true),
            ..Default::default()
        };

        let TechnologyParams::IsoDep {
            historical_bytes,
            hi_layer_response,
            extended_length_apdu_supported,
            ..
        } = readout.inspect()
        else {
            panic!("expected iso dep")
        };

        assert_eq!(historical_bytes.as_deref(), Some("8073C821"));
        assert_eq!(hi_layer_response, None);
        assert_eq!(extended_length_apdu_supported, Some(true));
    }

    #[test]
    fn ndef_cached_message_is_decoded() {
        let readout = NdefReadout {
            ndef_type: Some("org.nfcforum.ndef.type2".into()),
            max_size: Some(137),
            writable: Some(true),
            can_make_read_only: Some(true),
            cached_message: Some(vec![0xD1, 0x01, 0x06, 0x55, 0x03, b'h', b'e', b'l', b'l', b'o']),
        };

        let TechnologyParams::Ndef { message, max_size, .. } = readout.inspect() else {
            panic!("expected ndef")
        };

        assert_eq!(max_size, Some(137));
        let message = message.unwrap();
        assert_eq!(message.texts().collect::<Vec<_>>(), vec!["http://hello"]);
    }

    #[test]
    fn classic_counts_from_size_or_sak() {
        let readout = MifareClassicReadout {
            classic_type: Some(0),
            size: Some(4096),
            timeout: None,
        };

        let mut params = readout.inspect();
        assert_eq!(
            params,
            TechnologyParams::MifareClassic {
                mifare_type: MifareClassicType::Classic,
                size: Some(4096),
                sector_count: Some(40),
                block_count: Some(256),
                timeout: None,
            }
        );

        // size already known, sak is ignored
        infer_classic_size(&mut params, Some(0x08));
        let TechnologyParams::MifareClassic { block_count, .. } = &params else { unreachable!() };
        assert_eq!(*block_count, Some(256));

        let mut params = MifareClassicReadout::default().inspect();
        infer_classic_size(&mut params, Some(0x08));
        assert_eq!(
            params,
            TechnologyParams::MifareClassic {
                mifare_type: MifareClassicType::Unknown,
                size: Some(1024),
                sector_count: Some(16),
                block_count: Some(64),
                timeout: None,
            }
        );
    }

    #[test]
    fn ultralight_prefers_version() {
        let readout = MifareUltralightReadout {
            ultralight_type: Some(1),
            version: Some(vec![0x00, 0x04, 0x04, 0x02, 0x01, 0x00, 0x0F, 0x03]),
            timeout: None,
        };

        let TechnologyParams::MifareUltralight { mifare_type, .. } = readout.inspect() else {
            panic!("expected ultralight")
        };
        assert_eq!(mifare_type, MifareUltralightType::Ntag213);

        let readout = MifareUltralightReadout {
            ultralight_type: Some(2),
            version: None,
            timeout: None,
        };
        let TechnologyParams::MifareUltralight { mifare_type, .. } = readout.inspect() else {
            panic!("expected ultralight")
        };
        assert_eq!(mifare_type, MifareUltralightType::UltralightC);
    }
}
