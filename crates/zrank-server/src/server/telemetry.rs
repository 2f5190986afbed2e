//! Console logging for the server.
//!
//! Every event from the server and the `zrank` library is printed through a
//! `tracing_subscriber::fmt` layer. The level is taken from `RUST_LOG` and
//! defaults to `info`; library spans are emitted at `trace`, so
//!
//! ```bash
//! RUST_LOG=zrank=trace cargo run -p zrank-server
//! ```
//!
//! shows every store round-trip of a request.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init_telemetry() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_thread_ids(true)
                .with_line_number(true)
                .with_target(false)
                .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
                .with_file(true)
                .pretty(),
        )
        .try_init()?;

    Ok(())
}
