use std::sync::Once;

/// Logger configuration.
///
/// Filters follow the `env_logger` syntax (e.g. "info", "warn",
/// "fuchsia_engine=debug,wgpu_core=warn").
///
/// Precedence: `env_filter`, then `RUST_LOG`, then `default_filter`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub default_filter: String,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            default_filter: "info".to_string(),
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

impl LoggingConfig {
    /// Filter string that `init_logging` will apply.
    pub fn effective_filter(&self, rust_log: Option<String>) -> String {
        self.env_filter
            .clone()
            .or(rust_log)
            .unwrap_or_else(|| self.default_filter.clone())
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// Subsequent calls are ignored. Call early in `main`, before the runtime starts.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = config.effective_filter(std::env::var("RUST_LOG").ok());

        env_logger::Builder::new()
            .parse_filters(&filter)
            .write_style(config.write_style)
            .format_timestamp_millis()
            .init();

        log::debug!("logging initialized with filter {filter:?}");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_filter_wins_over_rust_log() {
        let cfg = LoggingConfig {
            env_filter: Some("warn".into()),
            ..Default::default()
        };
        assert_eq!(cfg.effective_filter(Some("trace".into())), "warn");
    }

    #[test]
    fn rust_log_wins_over_default() {
        let cfg = LoggingConfig::default();
        assert_eq!(cfg.effective_filter(Some("debug".into())), "debug");
    }

    #[test]
    fn default_filter_is_the_fallback() {
        let cfg = LoggingConfig {
            default_filter: "info,wgpu_core=warn".into(),
            ..Default::default()
        };
        assert_eq!(cfg.effective_filter(None), "info,wgpu_core=warn");
    }
}
