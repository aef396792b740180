//! Turns a framed record (type name format, type, payload bytes) into a [`NdefPayload`]
//!
//! Decoding never fails as a whole, anything that can't be decoded comes back as
//! [`NdefPayload::Unknown`] with the reason and the untouched payload

use tracing::debug;

use crate::{
    ndef_type::NdefType,
    payload::{
        ExternalPayload, MimePayload, NdefPayload, TextPayload, TextPayloadFormat, UnknownPayload,
        uri_prefix,
    },
};

/// Well known record types
pub const RTD_TEXT: &[u8] = b"T";
pub const RTD_URI: &[u8] = b"U";

const TEXT_UTF16_FLAG: u8 = 0b1000_0000;
const TEXT_LANGUAGE_LENGTH_MASK: u8 = 0b0011_1111;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NdefError {
    #[error("empty payload for a {0} record")]
    EmptyPayload(&'static str),

    #[error("unknown uri prefix code {0:#04x}")]
    UnknownUriPrefix(u8),

    #[error("language code length {language_length} does not fit in a {payload_length} byte payload")]
    LanguageCodeTooLong {
        language_length: u8,
        payload_length: usize,
    },

    #[error("odd number of bytes ({0}) in utf-16 text")]
    OddUtf16Length(usize),

    #[error("invalid utf-8 in {0}")]
    InvalidUtf8(&'static str),

    #[error("invalid utf-16 text")]
    InvalidUtf16,

    #[error("unsupported well known type {0:?}")]
    UnsupportedWellKnownType(String),

    #[error("unsupported type name format {0:?}")]
    UnsupportedTypeNameFormat(NdefType),

    #[error("chunked record was never terminated")]
    UnterminatedChunk,

    #[error("chunk continuation without a starting chunk")]
    OrphanChunk,

    #[error("unable to frame record: {0}")]
    Malformed(String),
}

type Result<T, E = NdefError> = std::result::Result<T, E>;

impl NdefError {
    pub fn into_payload(self, data: Vec<u8>) -> NdefPayload {
        NdefPayload::Unknown(UnknownPayload {
            reason: self.to_string(),
            data,
        })
    }
}

/// Decode a payload, falling back to an unknown payload on any error
pub fn decode_payload(type_name_format: NdefType, type_: &[u8], payload: Vec<u8>) -> NdefPayload {
    match try_decode_payload(type_name_format, type_, &payload) {
        Ok(decoded) => decoded,
        Err(error) => {
            debug!("record decoded as unknown: {error}");
            error.into_payload(payload)
        }
    }
}

pub fn try_decode_payload(
    type_name_format: NdefType,
    type_: &[u8],
    payload: &[u8],
) -> Result<NdefPayload> {
    match type_name_format {
        NdefType::WellKnown => match type_ {
            RTD_TEXT => decode_text(payload).map(NdefPayload::Text),
            RTD_URI => decode_uri(payload).map(NdefPayload::Uri),
            other => Err(NdefError::UnsupportedWellKnownType(
                String::from_utf8_lossy(other).to_string(),
            )),
        },

        NdefType::Mime => {
            let mime_type = std::str::from_utf8(type_)
                .map_err(|_| NdefError::InvalidUtf8("mime type"))?
                .trim()
                .to_ascii_lowercase();

            Ok(NdefPayload::Mime(MimePayload {
                mime_type,
                data: payload.to_vec(),
                text: nfc_util::text_if_utf8(payload),
            }))
        }

        NdefType::AbsoluteUri => {
            let uri =
                std::str::from_utf8(type_).map_err(|_| NdefError::InvalidUtf8("absolute uri"))?;

            Ok(NdefPayload::Uri(uri.to_string()))
        }

        NdefType::External => {
            let domain_type = std::str::from_utf8(type_)
                .map_err(|_| NdefError::InvalidUtf8("external type"))?
                .to_ascii_lowercase();

            Ok(NdefPayload::External(ExternalPayload {
                domain_type,
                data: payload.to_vec(),
            }))
        }

        other => Err(NdefError::UnsupportedTypeNameFormat(other)),
    }
}

/// Status byte: bit 7 is the utf-16 flag, the low 6 bits the language code length
pub fn decode_text(payload: &[u8]) -> Result<TextPayload> {
    let (&status, rest) = payload.split_first().ok_or(NdefError::EmptyPayload("text"))?;

    let is_utf16 = status & TEXT_UTF16_FLAG != 0;
    let language_length = status & TEXT_LANGUAGE_LENGTH_MASK;

    if language_length as usize > rest.len() {
        return Err(NdefError::LanguageCodeTooLong {
            language_length,
            payload_length: payload.len(),
        });
    }

    let (language, text) = rest.split_at(language_length as usize);
    let language = std::str::from_utf8(language)
        .map_err(|_| NdefError::InvalidUtf8("language code"))?
        .to_string();

    let (format, text) = if is_utf16 {
        (TextPayloadFormat::Utf16, decode_utf16(text)?)
    } else {
        let text = std::str::from_utf8(text).map_err(|_| NdefError::InvalidUtf8("text"))?;
        (TextPayloadFormat::Utf8, text.to_string())
    };

    Ok(TextPayload {
        format,
        language,
        text,
    })
}

/// First byte is an index into the prefix table, the rest is the utf8 suffix
pub fn decode_uri(payload: &[u8]) -> Result<String> {
    let (&code, suffix) = payload.split_first().ok_or(NdefError::EmptyPayload("uri"))?;
    let prefix = uri_prefix(code).ok_or(NdefError::UnknownUriPrefix(code))?;
    let suffix = std::str::from_utf8(suffix).map_err(|_| NdefError::InvalidUtf8("uri"))?;

    Ok(format!("{prefix}{suffix}"))
}

// big endian unless a byte order mark says otherwise
fn decode_utf16(bytes: &[u8]) -> Result<String> {
    if bytes.len() % 2 != 0 {
        return Err(NdefError::OddUtf16Length(bytes.len()));
    }

    let (little_endian, bytes) = match bytes {
        [0xFF, 0xFE, rest @ ..] => (true, rest),
        [0xFE, 0xFF, rest @ ..] => (false, rest),
        _ => (false, bytes),
    };

    let units = bytes.chunks_exact(2).map(|chunk| {
        if little_endian {
            u16::from_le_bytes([chunk[0], chunk[1]])
        } else {
            u16::from_be_bytes([chunk[0], chunk[1]])
        }
    });

    char::decode_utf16(units)
        .collect::<Result<String, _>>()
        .map_err(|_| NdefError::InvalidUtf16)
}
