use serde::Serialize;

/// Decoded record body, one variant per supported record kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, uniffi::Enum)]
#[serde(tag = "type", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NdefPayload {
    Text(TextPayload),
    Uri(String),
    Mime(MimePayload),
    External(ExternalPayload),
    Unknown(UnknownPayload),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, uniffi::Record)]
pub struct TextPayload {
    pub format: TextPayloadFormat,
    pub language: String,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, uniffi::Enum)]
pub enum TextPayloadFormat {
    #[serde(rename = "UTF-8")]
    Utf8,
    #[serde(rename = "UTF-16")]
    Utf16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, uniffi::Record)]
pub struct MimePayload {
    pub mime_type: String,
    pub data: Vec<u8>,

    /// Set when the payload happens to be readable text
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, uniffi::Record)]
pub struct ExternalPayload {
    /// `domain:type`, lowercased
    pub domain_type: String,
    pub data: Vec<u8>,
}

/// A record that could not be decoded, kept in place with its raw payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, uniffi::Record)]
pub struct UnknownPayload {
    pub reason: String,
    pub data: Vec<u8>,
}

impl NdefPayload {
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown(_))
    }

    /// Text content of the payload, if there is any
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(&text.text),
            Self::Uri(uri) => Some(uri),
            Self::Mime(mime) => mime.text.as_deref(),
            Self::External(_) | Self::Unknown(_) => None,
        }
    }

    /// Raw bytes for the binary carrying variants
    pub fn data(&self) -> Option<&[u8]> {
        match self {
            Self::Mime(mime) => Some(&mime.data),
            Self::External(external) => Some(&external.data),
            Self::Unknown(unknown) => Some(&unknown.data),
            Self::Text(_) | Self::Uri(_) => None,
        }
    }
}

/// URI prefix codes as defined in NFC Forum RTD URI specification
pub const URI_PREFIXES: &[&str] = &[
    "",                           // 0x00 - no prepending
    "http://www.",                // 0x01
    "https://www.",               // 0x02
    "http://",                    // 0x03
    "https://",                   // 0x04
    "tel:",                       // 0x05
    "mailto:",                    // 0x06
    "ftp://anonymous:anonymous@", // 0x07
    "ftp://ftp.",                 // 0x08
    "ftps://",                    // 0x09
    "sftp://",                    // 0x0A
    "smb://",                     // 0x0B
    "nfs://",                     // 0x0C
    "ftp://",                     // 0x0D
    "dav://",                     // 0x0E
    "news:",                      // 0x0F
    "telnet://",                  // 0x10
    "imap:",                      // 0x11
    "rtsp://",                    // 0x12
    "urn:",                       // 0x13
    "pop:",                       // 0x14
    "sip:",                       // 0x15
    "sips:",                      // 0x16
    "tftp:",                      // 0x17
    "btspp://",                   // 0x18
    "btl2cap://",                 // 0x19
    "btgoep://",                  // 0x1A
    "tcpobex://",                 // 0x1B
    "irdaobex://",                // 0x1C
    "file://",                    // 0x1D
    "urn:epc:id:",                // 0x1E
    "urn:epc:tag:",               // 0x1F
    "urn:epc:pat:",               // 0x20
    "urn:epc:raw:",               // 0x21
    "urn:epc:",                   // 0x22
    "urn:nfc:",                   // 0x23
];

/// Look up the prefix for a URI identifier code
pub fn uri_prefix(code: u8) -> Option<&'static str> {
    URI_PREFIXES.get(code as usize).copied()
}

/// Pick the longest prefix the uri starts with, returns the code and the rest
pub fn abbreviate_uri(uri: &str) -> (u8, &str) {
    URI_PREFIXES
        .iter()
        .enumerate()
        .skip(1)
        .filter(|(_, prefix)| uri.starts_with(*prefix))
        .max_by_key(|(_, prefix)| prefix.len())
        .map(|(code, prefix)| (code as u8, &uri[prefix.len()..]))
        .unwrap_or((0, uri))
}
