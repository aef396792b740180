//! NFC tag discovery bridge
//!
//! The platform layer forwards discovered tags to [`bridge::NfcBridge`], which
//! decodes them with `nfc-ndef` or `nfc-tag` off the calling thread and sends
//! the result back as an [`event::NfcEvent`].

pub(crate) mod logging;

pub mod adapter;
pub mod bridge;
pub mod config;
pub mod discovery;
pub mod event;
pub mod startup;

pub use bridge::NfcBridge;
pub use config::BridgeConfig;
pub use discovery::{DiscoveryResult, NfcData};
pub use event::{NfcEvent, NfcEventListener};

uniffi::setup_scaffolding!();
