//! Utilities for logging.
use std::io;

use tracing::Level;
use tracing::subscriber;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    HumanReadable,
    Json,
}

impl LogFormat {
    /// Parse a format name as accepted on the command line.
    pub fn from_name(name: &str) -> Option<LogFormat> {
        match name.to_ascii_lowercase().as_str() {
            "human" | "text" | "pretty" => Some(LogFormat::HumanReadable),
            "json" => Some(LogFormat::Json),
            _ => None,
        }
    }
}

/// Build the filter used by the global logger.
///
/// `RUST_LOG` takes precedence when set, otherwise everything at `level` and
/// above is emitted.
pub fn env_filter(level: Level) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy()
}

/// Configure the global tracing subscriber.
///
/// Calling this more than once is a no-op for every call after the first.
pub fn configure_global_logger<W>(level: Level, format: LogFormat, writer: W)
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(level))
        .with_writer(writer)
        .with_target(true);

    let result = match format {
        LogFormat::HumanReadable => subscriber::set_global_default(builder.finish()),
        LogFormat::Json => subscriber::set_global_default(builder.json().finish()),
    };

    // Already configured, e.g. by a test harness.
    let _ = result;
}

/// Configure logging for tests, writing to stderr at debug level.
pub fn init_test() {
    configure_global_logger(Level::DEBUG, LogFormat::HumanReadable, io::stderr);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_format_names() {
        assert_eq!(Some(LogFormat::Json), LogFormat::from_name("JSON"));
        assert_eq!(Some(LogFormat::HumanReadable), LogFormat::from_name("text"));
        assert_eq!(None, LogFormat::from_name("xml"));
    }

    #[test]
    fn configure_twice() {
        init_test();
        init_test();
        tracing::debug!("logger configured");
    }
}
