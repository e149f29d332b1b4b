//! Unified error type for the AlgoTrade crates.

use algotrade_access::AccessError;
use algotrade_session::SessionError;

/// Top-level error wrapping every crate-specific error.
///
/// The `#[from]` conversions let `?` lift sub-crate errors without a
/// `map_err` at each call site.
#[derive(Debug, thiserror::Error)]
pub enum AlgotradeError {
    /// An unknown role or permission name.
    #[error(transparent)]
    Access(#[from] AccessError),

    /// A session store failure (authentication, storage, restore).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A configuration document that doesn't parse.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
