//! Logging setup.
//!
//! The terminal belongs to the chart while the TUI runs, so logs go to a
//! file there; headless runs log to stderr.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::Level;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Where log lines are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

/// Maps `-v`/`-q` flags to a level. Default is INFO.
pub fn level_for(verbose: u8, quiet: bool) -> Level {
    if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}

/// Builds the filter: `RUST_LOG` directives plus our own crate at `level`.
pub fn build_filter(level: Level) -> EnvFilter {
    EnvFilter::from_default_env().add_directive(
        format!("mqtt_plot={}", level)
            .parse()
            .unwrap_or_else(|_| LevelFilter::from_level(level).into()),
    )
}

/// Opens `path` for appending, creating it if needed.
pub fn open_log_file(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Installs the global subscriber.
pub fn init(verbose: u8, quiet: bool, target: &LogTarget) -> io::Result<()> {
    let filter = build_filter(level_for(verbose, quiet));

    match target {
        LogTarget::Stderr => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(io::stderr)
                .init();
        }
        LogTarget::File(path) => {
            let file = open_log_file(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_level_for_flags() {
        assert_eq!(level_for(0, false), Level::INFO);
        assert_eq!(level_for(1, false), Level::DEBUG);
        assert_eq!(level_for(2, false), Level::TRACE);
        assert_eq!(level_for(5, false), Level::TRACE);
        assert_eq!(level_for(2, true), Level::ERROR);
    }

    #[test]
    fn test_build_filter_includes_crate_directive() {
        let filter = build_filter(Level::DEBUG);
        assert!(filter.to_string().to_lowercase().contains("mqtt_plot=debug"));
    }

    #[test]
    fn test_open_log_file_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mqtt-plot.log");

        {
            let mut file = open_log_file(&path).unwrap();
            writeln!(file, "first").unwrap();
        }
        {
            let mut file = open_log_file(&path).unwrap();
            writeln!(file, "second").unwrap();
        }

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "first\nsecond\n");
    }

    #[test]
    fn test_open_log_file_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no/such/dir/mqtt-plot.log");
        assert!(open_log_file(&path).is_err());
    }
}
