use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise the level is `info`, or `debug` with
/// `verbose`. Logs go to stderr, or are appended to `log_file`. Fails when
/// the log file cannot be opened or a global subscriber is already set.
pub fn init(verbose: bool, log_file: Option<&Path>) -> Result<(), String> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));

    let installed = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| format!("cannot open log file {}: {e}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init(),
    };
    installed.map_err(|e| format!("cannot install logger: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_install_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("run.log");
        let _ = init(false, Some(&log));
        let err = init(true, None).unwrap_err();
        assert!(err.starts_with("cannot install logger"));
        assert!(log.exists());
    }

    #[test]
    fn unwritable_log_file_is_an_error() {
        let err = init(false, Some(Path::new("/nonexistent/dir/run.log"))).unwrap_err();
        assert!(err.starts_with("cannot open log file"));
    }
}
