pub mod result_ext;

uniffi::setup_scaffolding!();

/// Render bytes as uppercase hex, the form tag identifiers are reported in
pub fn hex_upper(bytes: &[u8]) -> String {
    hex::encode_upper(bytes)
}

/// Serial number of a discovered tag, empty when the platform had no tag object
pub fn serial_number(id: Option<&[u8]>) -> String {
    id.map(hex_upper).unwrap_or_default()
}

/// Decode text if it is valid utf8, used for payloads that may or may not be text
pub fn text_if_utf8(bytes: &[u8]) -> Option<String> {
    let text = std::str::from_utf8(bytes).ok()?;
    if text.chars().any(|c| c.is_control() && !c.is_whitespace()) {
        return None;
    }

    Some(text.to_string())
}

mod ffi {
    #[uniffi::export]
    fn hex_encode_upper(bytes: Vec<u8>) -> String {
        super::hex_upper(&bytes)
    }

    #[uniffi::export]
    fn hex_decode(hex: &str) -> Option<Vec<u8>> {
        hex::decode(hex).ok()
    }
}
