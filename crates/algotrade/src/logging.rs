//! Log output for binaries.
//!
//! Libraries in this workspace only emit `tracing` events. A binary calls
//! [`init`] once at startup to print them.

use tracing_subscriber::EnvFilter;

/// Installs a formatted stderr subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_directive` is used
/// (e.g. `"info"` or `"algotrade_session=debug"`). Calling this again
/// after a subscriber is installed does nothing and returns `false`.
pub fn init(default_directive: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}
