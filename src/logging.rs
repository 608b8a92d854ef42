use crate::config::LoggingConfig;
use std::fs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_DIRECTIVE: &str = "ticket_context=info";
const LOG_FILE_PREFIX: &str = "ticket_context.log";

/// Initializes logging: a console layer on stderr, plus a daily JSON file
/// when `config.directory` is set.
///
/// Keep the returned guard alive until exit so buffered file logs are
/// flushed. Calling this twice leaves the first subscriber in place.
pub fn init_logging(config: &LoggingConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    let (file_layer, guard) = match config.directory.as_deref() {
        Some(dir) => match fs::create_dir_all(dir) {
            Ok(()) => {
                let file_appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
                let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);
                (
                    Some(fmt::layer().json().with_writer(non_blocking_writer)),
                    Some(guard),
                )
            }
            Err(e) => {
                eprintln!("[logging] cannot create log directory {}: {}", dir.display(), e);
                (None, None)
            }
        },
        None => (None, None),
    };

    // stdout carries command output
    let console_layer = fmt::layer().with_writer(std::io::stderr);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .try_init();

    guard
}
