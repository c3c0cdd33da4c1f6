use crate::config::Config;
use log::{LevelFilter, SetLoggerError};
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

/// HTTP stack crates whose records only show up at TRACE.
const NOISY_MODULES: &[&str] = &["tower", "tracing", "hyper", "axum"];

pub struct Logger {}

impl Logger {
    /// Installs the global terminal logger at the configured level.
    /// Fails if a global logger has already been installed.
    pub fn init_logger(config: &Config) -> Result<(), SetLoggerError> {
        TermLogger::init(
            config.log_level_filter,
            Self::log_config(config.log_level_filter),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        )
    }

    fn log_config(level: LevelFilter) -> simplelog::Config {
        let mut builder = ConfigBuilder::new();
        builder.set_time_format_rfc3339();

        if level != LevelFilter::Trace {
            for module in NOISY_MODULES {
                builder.add_filter_ignore_str(module);
            }
        }

        builder.build()
    }
}
