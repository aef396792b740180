//! Events sent from rust to the platform

use crate::discovery::DiscoveryResult;

pub const EVENT_NFC_DISCOVERED: &str = "__NFC_DISCOVERED";
pub const EVENT_NFC_ERROR: &str = "__NFC_ERROR";
pub const EVENT_NFC_MISSING: &str = "__NFC_MISSING";
pub const EVENT_NFC_UNAVAILABLE: &str = "__NFC_UNAVAILABLE";
pub const EVENT_NFC_ENABLED: &str = "__NFC_ENABLED";

#[derive(Debug, Clone, PartialEq, Eq, uniffi::Enum)]
pub enum NfcEvent {
    Discovered(DiscoveryResult),

    /// Adapter present and turned on, dispatch is running
    Enabled,

    /// Adapter present but turned off by the user
    Missing,

    /// No NFC hardware
    Unavailable,

    Error { message: String },
}

impl NfcEvent {
    /// Name the javascript layer listens on
    pub fn name(&self) -> &'static str {
        match self {
            Self::Discovered(_) => EVENT_NFC_DISCOVERED,
            Self::Enabled => EVENT_NFC_ENABLED,
            Self::Missing => EVENT_NFC_MISSING,
            Self::Unavailable => EVENT_NFC_UNAVAILABLE,
            Self::Error { .. } => EVENT_NFC_ERROR,
        }
    }
}

#[uniffi::export(callback_interface)]
pub trait NfcEventListener: Send + Sync + 'static {
    /// Essentially a callback to the frontend
    fn on_event(&self, event: NfcEvent);
}

mod ffi {
    use super::NfcEvent;

    #[uniffi::export]
    fn nfc_event_name(event: NfcEvent) -> String {
        event.name().to_string()
    }
}
