//! Logging setup
//!
//! The library only emits through the `log` facade. Binaries call [`init`]
//! to install `env_logger`.

/// Install `env_logger`
///
/// Honors `RUST_LOG`; defaults to `info` when it is unset. Safe to call
/// more than once.
pub fn init() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
