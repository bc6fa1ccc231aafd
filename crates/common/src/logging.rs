//! Tracing subscriber setup.
//!
//! Log events go to stderr (or the configured file) so stdout stays free
//! for command output.

use std::fs::File;
use std::sync::Mutex;

use tracing::subscriber::set_global_default;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;

/// Install the global tracing subscriber. `RUST_LOG` overrides
/// `config.level` when set.
///
/// Returns `false` if a subscriber was already installed.
pub fn init_logging(config: &LoggingConfig) -> bool {
    let builder = fmt::Subscriber::builder()
        .with_env_filter(build_filter(&config.level))
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    let installed = match (open_log_file(config), config.json) {
        (Some(file), true) => set_global_default(
            builder
                .json()
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .finish(),
        ),
        (Some(file), false) => set_global_default(
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .finish(),
        ),
        (None, true) => set_global_default(builder.json().with_writer(std::io::stderr).finish()),
        (None, false) => set_global_default(builder.with_writer(std::io::stderr).finish()),
    };
    installed.is_ok()
}

/// Initialize logging with defaults (tests and quick scripts).
pub fn init_default_logging() -> bool {
    init_logging(&LoggingConfig::default())
}

fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|e| {
            eprintln!("Invalid log level {level:?} ({e}), using info");
            EnvFilter::new("info")
        })
}

fn open_log_file(config: &LoggingConfig) -> Option<File> {
    let path = config.file.as_ref()?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = std::fs::create_dir_all(parent) {
            eprintln!("Failed to create log directory {}: {e}", parent.display());
            return None;
        }
    }
    match std::fs::OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => Some(file),
        Err(e) => {
            eprintln!("Failed to open log file {}: {e}", path.display());
            None
        }
    }
}
