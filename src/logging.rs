//! Tracing setup for the doxytag binary.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Filter used for a given `-v` count when `RUST_LOG` is unset.
pub fn default_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "doxytag=warn",
        1 => "doxytag=info",
        2 => "doxytag=debug",
        _ => "doxytag=trace",
    }
}

/// Install a stderr subscriber. `RUST_LOG` takes precedence over `verbose`.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_filter(filter),
        )
        .try_init();
}
