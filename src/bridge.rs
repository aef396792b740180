//! Dispatch and event bridge
//!
//! The platform forwards every discovery signal here. An accepted signal
//! turns foreground dispatch off and is decoded on the blocking pool, the
//! result is sent to the emitter task which hands it to the listener. Only
//! one decode can be pending at a time, signals arriving meanwhile are
//! rejected. Dispatch comes back on the next host resume.
//!
//! ```text
//!  platform thread          blocking pool            emitter task
//!  on_*_discovered  ---->   parse ndef / tag  ---->  startup slot
//!  (disable dispatch)          (flume)               listener.on_event
//! ```

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use arc_swap::ArcSwapOption;
use flume::{Receiver, Sender};
use nfc_ndef::RawNdefRecord;
use nfc_tag::TagAccess;
use nfc_tokio::AbortableTask;
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tracing::{debug, error, info, warn};

use crate::{
    adapter::{AdapterState, NfcAdapterAccess},
    config::{BridgeConfig, ConfigError},
    discovery::{DiscoveryResult, NdefData, NfcData},
    event::{NfcEvent, NfcEventListener},
    startup::StartupSlot,
};

static BRIDGE: ArcSwapOption<NfcBridge> = ArcSwapOption::const_empty();

#[derive(uniffi::Object)]
pub struct NfcBridge {
    state: Arc<BridgeState>,
    runtime: Handle,
    sender: Sender<DecodeOutcome>,
    emitter: Mutex<Option<AbortableTask<()>>>,
}

struct BridgeState {
    config: BridgeConfig,
    adapter: Box<dyn NfcAdapterAccess>,
    listener: Box<dyn NfcEventListener>,
    dispatch: Mutex<Dispatch>,
    startup: StartupSlot,
    busy: AtomicBool,
    torn_down: AtomicBool,
}

#[derive(Debug, Default, Clone, Copy)]
struct Dispatch {
    /// Set by `initialize` once the adapter was found enabled
    wanted: bool,
    active: bool,
}

#[derive(Debug)]
enum DecodeOutcome {
    Decoded { result: DiscoveryResult, startup: bool },
    Failed(String),
}

#[uniffi::export]
impl NfcBridge {
    #[uniffi::constructor]
    pub fn new(
        config: BridgeConfig,
        adapter: Box<dyn NfcAdapterAccess>,
        listener: Box<dyn NfcEventListener>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        crate::logging::init(config.log_filter.as_deref());

        Ok(Self::with_runtime(nfc_tokio::handle(), config, adapter, listener))
    }

    /// Report the adapter state and start foreground dispatch when possible
    pub fn initialize(&self) {
        let state = AdapterState::of(self.state.adapter.as_ref());
        info!("nfc adapter state: {state:?}");

        if state == AdapterState::Enabled {
            self.state.dispatch.lock().wanted = true;
            self.state.enable_dispatch();
        }

        self.state.emit(state.event());
    }

    /// Report the adapter state without touching dispatch
    pub fn is_supported(&self) {
        let state = AdapterState::of(self.state.adapter.as_ref());
        self.state.emit(state.event());
    }

    /// Messages delivered as raw bytes, one entry per message
    ///
    /// Returns false if the signal was rejected
    pub fn on_ndef_discovered(&self, tag_id: Option<Vec<u8>>, messages: Vec<Vec<u8>>, startup: bool) -> bool {
        let origin = self.state.config.origin.clone();

        self.submit(startup, move || {
            let serial_number = nfc_util::serial_number(tag_id.as_deref());
            let messages = messages.iter().map(|bytes| nfc_ndef::parse_message(bytes)).collect();

            DiscoveryResult::new(serial_number, origin, NfcData::Ndef(NdefData { messages }))
        })
    }

    /// Messages the platform already split into records
    pub fn on_ndef_records_discovered(
        &self,
        tag_id: Option<Vec<u8>>,
        messages: Vec<Vec<RawNdefRecord>>,
        startup: bool,
    ) -> bool {
        let origin = self.state.config.origin.clone();

        self.submit(startup, move || {
            let serial_number = nfc_util::serial_number(tag_id.as_deref());
            let messages = messages.into_iter().map(nfc_ndef::decode_records).collect();

            DiscoveryResult::new(serial_number, origin, NfcData::Ndef(NdefData { messages }))
        })
    }

    /// A tag without ndef data, `tags` holds every variant discovered together
    pub fn on_tag_discovered(&self, tags: Vec<Arc<dyn TagAccess>>, startup: bool) -> bool {
        let origin = self.state.config.origin.clone();

        self.submit(startup, move || {
            let id = tags.first().map(|tag| tag.id());
            let serial_number = nfc_util::serial_number(id.as_deref());
            let data = nfc_tag::parse_tags(&tags);

            DiscoveryResult::new(serial_number, origin, NfcData::Tag(data))
        })
    }

    pub fn on_host_resume(&self) {
        let wanted = self.state.dispatch.lock().wanted;
        if !wanted || self.state.is_torn_down() {
            return;
        }

        if !self.state.adapter.is_enabled() {
            debug!("adapter disabled, not resuming dispatch");
            return;
        }

        self.state.enable_dispatch();
    }

    pub fn on_host_pause(&self) {
        self.state.disable_dispatch();
    }

    pub fn on_host_destroy(&self) {
        self.state.disable_dispatch();
    }

    /// The discovery that launched the app, only returned once
    ///
    /// The first call closes the slot, even when it returns `None`. A startup
    /// decode still running at that point is only delivered as a `Discovered`
    /// event, so call this once that event arrived or after `initialize`
    pub fn startup_data(&self) -> Option<DiscoveryResult> {
        self.state.startup.take()
    }

    /// Forward a platform session error, ie. an invalidated reader session
    pub fn report_error(&self, message: String) {
        warn!("nfc session error: {message}");
        self.state.emit(NfcEvent::Error { message });
    }

    pub fn is_busy(&self) -> bool {
        self.state.busy.load(Ordering::Acquire)
    }

    /// Stop emitting, results of decodes still in flight are dropped
    pub fn teardown(&self) {
        if self.state.torn_down.swap(true, Ordering::AcqRel) {
            return;
        }

        info!("tearing down nfc bridge");
        self.emitter.lock().take();
        self.state.disable_dispatch();
    }

    /// Register as the process wide bridge, a previous one is torn down
    pub fn install(self: Arc<Self>) {
        if let Some(previous) = BRIDGE.swap(Some(self)) {
            warn!("replacing installed nfc bridge");
            previous.teardown();
        }
    }
}

impl NfcBridge {
    /// Bridge running its decode work on `runtime`
    pub fn with_runtime(
        runtime: Handle,
        config: BridgeConfig,
        adapter: Box<dyn NfcAdapterAccess>,
        listener: Box<dyn NfcEventListener>,
    ) -> Self {
        let state = Arc::new(BridgeState {
            config,
            adapter,
            listener,
            dispatch: Mutex::new(Dispatch::default()),
            startup: StartupSlot::new(),
            busy: AtomicBool::new(false),
            torn_down: AtomicBool::new(false),
        });

        let (sender, receiver) = flume::unbounded();
        let emitter = AbortableTask::spawn_on(&runtime, run_emitter(state.clone(), receiver));

        Self {
            state,
            runtime,
            sender,
            emitter: Mutex::new(Some(emitter)),
        }
    }

    pub fn global() -> Option<Arc<Self>> {
        BRIDGE.load_full()
    }

    /// Remove and tear down the installed bridge
    pub fn uninstall() -> Option<Arc<Self>> {
        let bridge = BRIDGE.swap(None)?;
        bridge.teardown();
        Some(bridge)
    }

    fn submit<F>(&self, startup: bool, decode: F) -> bool
    where
        F: FnOnce() -> DiscoveryResult + Send + 'static,
    {
        if self.state.is_torn_down() {
            warn!("nfc bridge torn down, ignoring discovery");
            return false;
        }

        if self.state.busy.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire).is_err() {
            warn!("decode already pending, rejecting discovery");
            return false;
        }

        self.state.disable_dispatch();

        let job = self.runtime.spawn_blocking(decode);
        let sender = self.sender.clone();

        self.runtime.spawn(async move {
            let outcome = match job.await {
                Ok(result) => DecodeOutcome::Decoded { result, startup },
                Err(join_error) => DecodeOutcome::Failed(join_error.to_string()),
            };

            if sender.send_async(outcome).await.is_err() {
                debug!("emitter gone, dropping decode result");
            }
        });

        true
    }
}

async fn run_emitter(state: Arc<BridgeState>, receiver: Receiver<DecodeOutcome>) {
    while let Ok(outcome) = receiver.recv_async().await {
        state.publish(outcome);
    }
}

impl BridgeState {
    fn is_torn_down(&self) -> bool {
        self.torn_down.load(Ordering::Acquire)
    }

    fn publish(&self, outcome: DecodeOutcome) {
        self.busy.store(false, Ordering::Release);

        if self.is_torn_down() {
            debug!("nfc bridge torn down, dropping decode result");
            return;
        }

        match outcome {
            DecodeOutcome::Decoded { result, startup } => {
                if startup && self.config.cache_startup_data {
                    self.startup.fill(result.clone());
                }

                self.emit(NfcEvent::Discovered(result));
            }

            DecodeOutcome::Failed(message) => {
                error!("decode task failed: {message}");
                self.emit(NfcEvent::Error { message });
            }
        }
    }

    fn emit(&self, event: NfcEvent) {
        if self.is_torn_down() {
            return;
        }

        debug!("emitting {}", event.name());
        self.listener.on_event(event);
    }

    // the adapter is called without the lock held, it may call back into the bridge
    fn enable_dispatch(&self) {
        {
            let mut dispatch = self.dispatch.lock();
            if dispatch.active {
                return;
            }

            dispatch.active = true;
        }

        if let Err(error) = self.adapter.enable_foreground_dispatch() {
            error!("unable to enable foreground dispatch: {error}");
            self.dispatch.lock().active = false;
        }
    }

    fn disable_dispatch(&self) {
        {
            let mut dispatch = self.dispatch.lock();
            if !dispatch.active {
                return;
            }

            // treat it as off either way, the next resume tries again
            dispatch.active = false;
        }

        if let Err(error) = self.adapter.disable_foreground_dispatch() {
            error!("unable to disable foreground dispatch: {error}");
        }
    }
}

mod ffi {
    use super::*;

    #[uniffi::export]
    fn installed_nfc_bridge() -> Option<Arc<NfcBridge>> {
        NfcBridge::global()
    }

    #[uniffi::export]
    fn uninstall_nfc_bridge() {
        NfcBridge::uninstall();
    }
}
