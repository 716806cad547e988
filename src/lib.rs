use std::sync::{Once, OnceLock};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub mod card;
pub mod engine;
pub mod enums;
pub mod exception;
pub mod game;
pub mod server;
pub mod test;
pub mod zone;

static INIT: Once = Once::new();
static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Installs the global tracing subscriber: `RUST_LOG`-style filtering
/// (default `info`) with a non-blocking daily rolling file writer.
pub fn setup_logger() {
    INIT.call_once(|| {
        let file_appender = RollingFileAppender::new(Rotation::DAILY, "logs", "karata.log");
        let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let file_layer = fmt::layer()
            .with_writer(non_blocking_writer)
            .with_ansi(false)
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_file(true)
            .with_line_number(true)
            .with_target(false);

        tracing_subscriber::registry().with(filter).with(file_layer).init();

        let _ = LOG_GUARD.set(guard);

        tracing::info!("logger initialized, writing to logs/karata.log");
    });
}
