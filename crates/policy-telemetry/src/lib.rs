//! Structured logging setup for binaries that embed `policy-core` and
//! `policy-loader` directly. Neither of those crates installs a global
//! `tracing` subscriber on its own — they only emit events — so a host
//! binary needs something to call at startup. This crate is that something.

#![deny(unsafe_code)]
#![warn(missing_docs)]

use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

/// Install a JSON-formatted, env-filtered `tracing` subscriber as the global
/// default. Controlled by `RUST_LOG`, e.g. `RUST_LOG=info,policy_loader=debug`.
/// Defaults to `info` if the variable is unset or unparseable.
///
/// Idempotent in the sense that a second call is harmless: `tracing` simply
/// reports (and this function ignores) the "already set" error, matching the
/// loose contract binaries rely on when multiple entry points race to set up
/// logging.
pub fn init_json_logging() {
    let fmt_layer = fmt::layer().json().with_current_span(true).with_span_list(true);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = Registry::default().with(filter).with(fmt_layer);
    tracing::subscriber::set_global_default(subscriber).ok();
}
