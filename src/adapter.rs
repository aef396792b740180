//! Module for talking to the platform's NFC adapter

use crate::event::NfcEvent;

#[derive(Debug, Clone, Hash, Eq, PartialEq, uniffi::Error, thiserror::Error)]
#[uniffi::export(Display)]
pub enum DispatchError {
    #[error("no activity to attach foreground dispatch to")]
    NoActivity,

    #[error("missing permission: {0}")]
    Permission(String),

    #[error("platform error: {0}")]
    Platform(String),

    #[error("unexpected callback error: {0}")]
    UnexpectedCallback(String),
}

impl From<uniffi::UnexpectedUniFFICallbackError> for DispatchError {
    fn from(error: uniffi::UnexpectedUniFFICallbackError) -> Self {
        Self::UnexpectedCallback(error.reason)
    }
}

#[uniffi::export(callback_interface)]
pub trait NfcAdapterAccess: Send + Sync + std::fmt::Debug + 'static {
    /// The device has NFC hardware
    fn is_present(&self) -> bool;

    /// The hardware is switched on
    fn is_enabled(&self) -> bool;

    /// Give the app priority over discovered tags
    fn enable_foreground_dispatch(&self) -> Result<(), DispatchError>;

    fn disable_foreground_dispatch(&self) -> Result<(), DispatchError>;
}

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, uniffi::Enum)]
pub enum AdapterState {
    Enabled,
    Missing,
    Unavailable,
}

impl AdapterState {
    pub fn of(adapter: &dyn NfcAdapterAccess) -> Self {
        if !adapter.is_present() {
            return Self::Unavailable;
        }

        match adapter.is_enabled() {
            true => Self::Enabled,
            false => Self::Missing,
        }
    }

    pub fn event(self) -> NfcEvent {
        match self {
            Self::Enabled => NfcEvent::Enabled,
            Self::Missing => NfcEvent::Missing,
            Self::Unavailable => NfcEvent::Unavailable,
        }
    }
}
