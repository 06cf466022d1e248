//! Tracing setup for embedders of the analysis framework.
//!
//! The library itself only emits `tracing` events; wiring a subscriber
//! is the embedding application's job. [`init`] offers the standard
//! wiring for binaries and examples: env-filter driven fmt output plus
//! `tracing-error`'s span traces for diagnostics.

use tracing_error::ErrorLayer;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global subscriber: `RUST_LOG`-style filtering, compact
/// fmt output, and an [`ErrorLayer`] capturing span traces.
///
/// # Panics
///
/// Panics if a global subscriber is already installed; use
/// [`try_init`] where that is a legitimate runtime condition.
pub fn init() {
    try_init().expect("global tracing subscriber already installed");
}

/// Fallible variant of [`init`] for embedders that may race another
/// subscriber installation (e.g. test harnesses).
pub fn try_init() -> Result<(), tracing_subscriber::util::TryInitError> {
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_file(false)
        .with_line_number(false);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("error,flowscan=warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(ErrorLayer::default())
        .try_init()
}
