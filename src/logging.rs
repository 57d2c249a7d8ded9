//! Tracing subscriber setup for the binary.

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "info,tower_http=warn,hyper=warn";

/// Destination for formatted log events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// Standard error, with ANSI colors.
    Stderr,
    /// Appended to a file. Used while the terminal is owned by the dashboard.
    File(PathBuf),
}

impl LogTarget {
    fn is_terminal(&self) -> bool {
        matches!(self, Self::Stderr)
    }
}

/// Builds the writer for `target`.
///
/// A log file that cannot be opened discards events instead of falling
/// back to the terminal.
pub fn make_writer(target: &LogTarget) -> BoxMakeWriter {
    match target {
        LogTarget::Stderr => BoxMakeWriter::new(io::stderr),
        LogTarget::File(path) => match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => BoxMakeWriter::new(Mutex::new(file)),
            Err(_) => BoxMakeWriter::new(io::sink),
        },
    }
}

/// Installs a formatter writing to `target`, filtered by `RUST_LOG`.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing(target: &LogTarget) {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(make_writer(target))
                .with_ansi(target.is_terminal())
                .with_target(false),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::io::Write;

    use tracing_subscriber::fmt::MakeWriter;

    use super::*;

    #[test]
    fn file_target_appends_to_file() {
        let path = std::env::temp_dir().join(format!("gridmind-log-{}.log", std::process::id()));
        let _ = fs::remove_file(&path);
        let writer = make_writer(&LogTarget::File(path.clone()));
        writer.make_writer().write_all(b"first\n").expect("file is writable");
        writer.make_writer().write_all(b"second\n").expect("file is writable");

        let text = fs::read_to_string(&path).expect("log file exists");
        assert_eq!(text, "first\nsecond\n");
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn unopenable_file_discards_events() {
        let path = std::env::temp_dir().join("gridmind-missing-dir").join("nested").join("x.log");
        let writer = make_writer(&LogTarget::File(path.clone()));
        assert!(writer.make_writer().write_all(b"dropped").is_ok());
        assert!(!path.exists());
    }

    #[test]
    fn only_stderr_is_terminal() {
        assert!(LogTarget::Stderr.is_terminal());
        assert!(!LogTarget::File(PathBuf::from("x.log")).is_terminal());
    }
}
