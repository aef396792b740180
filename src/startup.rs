//! Hand-off of a discovery made before anything was listening
//!
//! When the app is launched by a tag, the discovery happens before the
//! javascript layer attaches. The result is held here and handed to the first
//! caller that asks for it. After that first ask the slot is closed for good,
//! later startup discoveries are only emitted as events.

use nfc_macros::impl_default_for;
use parking_lot::Mutex;
use tracing::debug;

use crate::discovery::DiscoveryResult;

#[derive(Debug)]
enum SlotState {
    Empty,
    Filled(DiscoveryResult),
    Consumed,
}

#[derive(Debug)]
pub struct StartupSlot(Mutex<SlotState>);

impl_default_for!(StartupSlot);

impl StartupSlot {
    pub fn new() -> Self {
        Self(Mutex::new(SlotState::Empty))
    }

    /// Store a startup discovery, replacing an earlier one
    ///
    /// Returns false if the slot was already consumed
    pub fn fill(&self, result: DiscoveryResult) -> bool {
        let mut state = self.0.lock();

        match &*state {
            SlotState::Consumed => {
                debug!("startup data already retrieved, not caching");
                false
            }
            SlotState::Empty | SlotState::Filled(_) => {
                *state = SlotState::Filled(result);
                true
            }
        }
    }

    /// Take the cached discovery, only the first call can get one
    pub fn take(&self) -> Option<DiscoveryResult> {
        let state = std::mem::replace(&mut *self.0.lock(), SlotState::Consumed);

        match state {
            SlotState::Filled(result) => Some(result),
            SlotState::Empty | SlotState::Consumed => None,
        }
    }
}
