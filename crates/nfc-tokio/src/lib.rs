mod abortable_task;

use std::sync::OnceLock;

use tokio::runtime::{Builder, Handle, Runtime};

pub use abortable_task::AbortableTask;

static TOKIO: OnceLock<Handle> = OnceLock::new();
static OWNED_RUNTIME: OnceLock<Runtime> = OnceLock::new();

/// Handle to the global runtime, fixed by the first call
///
/// Called from inside a tokio runtime, that runtime is used. Calls coming
/// from a platform thread get a small runtime owned by this crate
pub fn handle() -> Handle {
    TOKIO
        .get_or_init(|| Handle::try_current().unwrap_or_else(|_| owned_runtime().handle().clone()))
        .clone()
}

fn owned_runtime() -> &'static Runtime {
    OWNED_RUNTIME.get_or_init(|| {
        tracing::debug!("no tokio runtime registered, starting one");
        Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("nfc-worker")
            .enable_all()
            .build()
            .expect("failed to build tokio runtime")
    })
}
