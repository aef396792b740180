/// Where the ndef message sits in a tag's data area
#[derive(Debug, PartialEq, Eq, Clone, Copy, uniffi::Record)]
pub struct MessageInfo {
    /// Bytes taken up by the tlv blocks before the ndef message, including its own tag and length
    pub header_length: u16,

    /// Length of the ndef message, as reported in the ndef tlv
    pub ndef_length: u16,

    /// Bytes that must be read from the start of the data area to have the whole message
    pub full_message_length: u16,
}

impl MessageInfo {
    pub fn new(header_length: u16, ndef_length: u16) -> Self {
        Self {
            header_length,
            ndef_length,
            full_message_length: header_length.saturating_add(ndef_length),
        }
    }
}
