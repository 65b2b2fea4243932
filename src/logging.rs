//! Logger setup
//!
//! `RUST_LOG` overrides the default `warn` level. The TUI owns the terminal,
//! so in that mode records go to `~/.contribgraph/contribgraph.log`.

use std::fs::{self, OpenOptions};
use std::path::Path;

use env_logger::{Builder, Target};
use log::LevelFilter;

use crate::services::settings::app_dir;

const LOG_FILE: &str = "contribgraph.log";

/// Where log records are written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    /// Append to the log file in the app directory
    File,
}

fn builder() -> Builder {
    let mut builder = Builder::new();
    builder.filter_level(LevelFilter::Warn).parse_default_env();
    builder
}

/// Install the global logger. Later calls are no-ops.
pub fn init(target: LogTarget) {
    let mut builder = builder();
    if target == LogTarget::File {
        match app_dir().and_then(|dir| open_log(&dir)) {
            Ok(file) => {
                builder.target(Target::Pipe(Box::new(file)));
            }
            // Nowhere safe to write; stay silent rather than corrupt the screen
            Err(_) => {
                builder.filter_level(LevelFilter::Off);
            }
        }
    }
    let _ = builder.try_init();
}

fn open_log(dir: &Path) -> crate::types::Result<fs::File> {
    fs::create_dir_all(dir)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE))?;
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_log_creates_dir_and_appends() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("nested");

        {
            use std::io::Write;
            let mut file = open_log(&dir).unwrap();
            writeln!(file, "first").unwrap();
        }
        {
            use std::io::Write;
            let mut file = open_log(&dir).unwrap();
            writeln!(file, "second").unwrap();
        }

        let content = fs::read_to_string(dir.join(LOG_FILE)).unwrap();
        assert_eq!(content, "first\nsecond\n");
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        init(LogTarget::Stderr);
        init(LogTarget::Stderr);
    }
}
