//! Diagnostic logging for the `mcqbench` binary.
//!
//! The harness has two output channels. Progress lines and the summary table
//! are printed on stdout by the CLI and may be redirected into a results
//! file. Everything emitted through `tracing` (obs events, the metrics flush,
//! gateway debug lines) goes to stderr, so log verbosity never changes what
//! lands in that file.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the stderr subscriber.
///
/// `RUST_LOG` wins over `level` when set. With `json` each event becomes one
/// JSON object per line, which keeps stderr machine-readable while stdout
/// carries the human report. Only the first call in a process takes effect.
pub fn init_tracing(json: bool, level: Level) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));
    let stderr_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);
    let registry = tracing_subscriber::registry().with(filter);

    let installed = if json {
        registry.with(stderr_layer.json()).try_init()
    } else {
        registry.with(stderr_layer).try_init()
    };
    // A subscriber installed earlier (e.g. by a test harness) stays in place.
    installed.ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_initialisation_is_harmless() {
        init_tracing(false, Level::INFO);
        init_tracing(true, Level::DEBUG);
        tracing::info!(event = "telemetry.test", "still logging");
    }
}
