use tracing_subscriber::EnvFilter;

use crate::errors::CoreError;

/// Install a compact fmt subscriber filtered by `RUST_LOG`, falling back to
/// `default_directive` (e.g. `"info"` or `"futurefund_core=debug"`).
///
/// Returns an error if a global subscriber is already installed, so hosts
/// that set up their own tracing can ignore the result.
pub fn init_tracing(default_directive: &str) -> Result<(), CoreError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))
        .map_err(|e| CoreError::Config(format!("Invalid log filter '{default_directive}': {e}")))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .compact()
        .try_init()
        .map_err(|e| CoreError::Config(format!("Tracing already initialised: {e}")))
}
