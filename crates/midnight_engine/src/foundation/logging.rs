//! Logging utilities
//!
//! The engine logs through the `log` facade. Binaries call [`init`] once at
//! startup to install `env_logger`, which honours `RUST_LOG`.

pub use log::{debug, info, warn, error, trace};

/// Default filter used when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "info";

/// Initialize the logging system
///
/// Falls back to [`DEFAULT_FILTER`] so negotiation diagnostics are visible
/// without any environment setup. Calling this twice is harmless.
pub fn init() {
    let env = env_logger::Env::default().default_filter_or(DEFAULT_FILTER);
    let _ = env_logger::Builder::from_env(env).try_init();
}
