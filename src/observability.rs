//! Logging setup and lightweight trace hooks for the harness.
//!
//! Library code only ever talks to the `log` facade. A binary or test that
//! wants to see the output calls `enable_verbose_logging` once; every later
//! call is a no-op.

use log::LevelFilter;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// Installs an `env_logger` that prints `[LEVEL] message` lines at `Info`.
///
/// With `log_file` set, output is appended to that file instead of stderr. If
/// the file cannot be opened the logger stays on stderr and says so.
pub fn enable_verbose_logging(log_file: Option<&Path>) {
    INIT_LOGGER.call_once(|| {
        let mut builder = env_logger::Builder::new();

        builder.is_test(false);
        builder.filter_level(LevelFilter::Info);

        builder.format(|buf, record| {
            use std::io::Write;
            writeln!(buf, "[{}] {}", record.level(), record.args())?;
            buf.flush()?;
            Ok(())
        });

        let mut open_failure = None;
        if let Some(path) = log_file {
            match OpenOptions::new().append(true).create(true).open(path) {
                Ok(file) => {
                    builder.target(env_logger::Target::Pipe(Box::new(file)));
                }
                Err(e) => open_failure = Some((path.display().to_string(), e)),
            }
        }

        let _ = builder.try_init();

        if let Some((path, e)) = open_failure {
            log::warn!("Could not open log file '{}' ({}), logging to stderr", path, e);
        }
    });
}

/// Emits a `trace`-level `key=value` line, only in debug builds.
///
/// # Example
/// ```
/// use colindex::checkpoint;
/// let table = "t";
/// checkpoint!("event" = "query", "table" = table);
/// ```
#[macro_export]
macro_rules! checkpoint {
    ($($key:literal = $value:expr),+ $(,)?) => {
        #[cfg(debug_assertions)]
        {
            let mut parts: Vec<String> = Vec::new();
            $(
                parts.push(format!("{}={}", $key, $value));
            )+
            log::trace!("COLINDEX {}", parts.join(" "));
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enable_is_idempotent() {
        enable_verbose_logging(None);
        enable_verbose_logging(Some(Path::new("/nonexistent/dir/colindex.log")));
        checkpoint!("event" = "idempotent", "calls" = 2);
    }
}
