use std::sync::Once;

use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_FILTER: &str = "info";

static INIT: Once = Once::new();

/// Install the global subscriber, later calls are no-ops
///
/// `filter` takes precedence over `RUST_LOG`. Records emitted through `log`
/// are forwarded as well.
pub fn init(filter: Option<&str>) {
    INIT.call_once(|| {
        let filter = match filter {
            Some(directives) => EnvFilter::try_new(directives).unwrap_or_else(|error| {
                eprintln!("invalid log filter {directives:?}: {error}");
                EnvFilter::new(DEFAULT_FILTER)
            }),
            None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        };

        // another subscriber may already be installed by the host
        if let Err(error) = fmt().with_env_filter(filter).with_target(true).try_init() {
            eprintln!("logging already initialized: {error}");
        }
    });
}

#[uniffi::export]
fn init_logging(filter: Option<String>) {
    init(filter.as_deref());
}
