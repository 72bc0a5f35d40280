//! Tracing subscriber setup for binaries embedding the pipeline.
//!
//! The library itself only emits `tracing` events; installing a subscriber
//! is left to the embedding application, which can call [`init`] once at
//! startup.

use tracing_subscriber::EnvFilter;

/// Installs a formatted tracing subscriber driven by `RUST_LOG`.
///
/// Defaults to `info` when the environment variable is unset or invalid.
pub fn try_init() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to install tracing subscriber: {err}"))?;
    Ok(())
}

/// Installs the subscriber, ignoring the error if one is already set.
pub fn init() {
    let _ = try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init();
        // Second install attempt reports the existing subscriber.
        init();
        assert!(try_init().is_err());
    }
}
