//! Tracing setup for the `ferry` binary.

use is_terminal::IsTerminal;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const DEFAULT_LOG_FILTER: &str = "ferry=warn";

/// Environment variable checked before `RUST_LOG`
pub const LOG_ENV: &str = "FERRY_LOG";

/// Logging configuration for the binary.
#[derive(Debug, Clone, Default)]
pub struct LogConfig<'a> {
    /// Number of `-v` flags given
    pub verbose: u8,
    /// `log_filter` from the config file
    pub config_filter: Option<&'a str>,
}

/// Filter directive chosen from the environment, then `-v`, then the config file.
pub fn filter_directive(config: &LogConfig<'_>, env: impl Fn(&str) -> Option<String>) -> String {
    if let Some(directive) = env(LOG_ENV).or_else(|| env("RUST_LOG")) {
        if !directive.trim().is_empty() {
            return directive;
        }
    }
    match config.verbose {
        0 => config
            .config_filter
            .map(str::to_string)
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        1 => "ferry=info".to_string(),
        2 => "ferry=debug".to_string(),
        _ => "ferry=trace,ssh2=debug".to_string(),
    }
}

/// Initialize tracing with a stderr writer.
///
/// Calling this twice is harmless: the second subscriber is not installed.
pub fn init_logging(config: LogConfig<'_>) {
    let directive = filter_directive(&config, |key| std::env::var(key).ok());
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal())
                .with_target(config.verbose > 1)
                .with_filter(filter),
        )
        .try_init();
}
