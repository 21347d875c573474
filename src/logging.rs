//! `tracing` subscriber setup.
//!
//! Log level is taken from `RUST_LOG` (default `info`). An optional log file
//! receives the same events as JSON lines.

use std::fs::OpenOptions;
use std::path::Path;

use tracing_appender::non_blocking::{NonBlockingBuilder, WorkerGuard};
use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

use crate::error::Result;

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

fn build_and_set_global_subscriber(
    logfile: Option<&Path>,
    is_test: bool,
) -> Result<Option<WorkerGuard>> {
    let stderr_log = if is_test {
        fmt::layer().with_test_writer().boxed()
    } else {
        fmt::layer().with_writer(std::io::stderr).boxed()
    };
    let r = registry().with(env_filter()).with(stderr_log);

    match logfile {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(path)?;
            let (writer, guard) = NonBlockingBuilder::default().lossy(false).finish(file);
            let json = fmt::layer().json().with_writer(writer);
            let r = r.with(json);
            if is_test {
                r.try_init().ok();
            } else {
                r.init();
            }
            Ok(Some(guard))
        }
        None => {
            if is_test {
                r.try_init().ok();
            } else {
                r.init();
            }
            Ok(None)
        }
    }
}

/// Installs the global subscriber. Call once, at the start of a binary.
///
/// Keep the returned guard alive until exit so the log file is flushed.
pub fn init_logging(logfile: Option<&Path>) -> Result<Option<WorkerGuard>> {
    build_and_set_global_subscriber(logfile, false)
}

/// Installs a test subscriber if none is set yet. Safe to call from every test.
pub fn init_test_logging() {
    let _ = build_and_set_global_subscriber(None, true);
}
