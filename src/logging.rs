//! Logging bootstrap.
//!
//! Logs go to stderr so stdout stays clean for JSON and digest output.
//! `RUST_LOG` wins when set; otherwise `--verbose` picks between info and debug.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init(verbose: bool) {
    let default = if verbose {
        "ddl=debug"
    } else {
        "ddl=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // A second init (only possible in tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}
