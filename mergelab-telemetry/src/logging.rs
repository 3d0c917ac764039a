//! Structured logging with tracing.
//!
//! One `init` call at process start; log levels are controlled through the
//! standard `RUST_LOG` environment filter and default to `info`.

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Clone)]
pub struct EventLogger;

impl EventLogger {
    pub fn init() {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .with_span_events(FmtSpan::NONE)
            .init()
    }

    /// Logs one simulation-run event with a structured label.
    pub fn log_run_event(event_type: &str, detail: &str) {
        tracing::info!(event_type, detail, "simulation event");
    }
}
