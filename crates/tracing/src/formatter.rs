use std::{
    fmt::{self, Display},
    io::IsTerminal,
};

use clap::ValueEnum;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::BoxedLayer;

/// The output format of a tracing layer.
#[derive(Debug, Copy, Clone, ValueEnum, Eq, PartialEq)]
pub enum LogFormat {
    /// One JSON object per event.
    Json,
    /// `key=value` pairs, one line per event.
    LogFmt,
    /// Human readable lines, colored when the terminal allows it.
    Terminal,
}

impl LogFormat {
    /// Builds a boxed layer of this format, filtered by `filter`.
    ///
    /// `color` is one of `always`, `auto` or `never`; `None` disables colors.
    pub fn apply(&self, filter: EnvFilter, color: Option<String>) -> BoxedLayer<Registry> {
        let ansi = match color.as_deref() {
            Some("always") => true,
            Some("auto") => std::io::stdout().is_terminal(),
            _ => false,
        };

        match self {
            LogFormat::Json => {
                tracing_subscriber::fmt::layer().json().with_ansi(ansi).with_filter(filter).boxed()
            }
            LogFormat::LogFmt => tracing_logfmt::layer().with_filter(filter).boxed(),
            LogFormat::Terminal => tracing_subscriber::fmt::layer()
                .with_ansi(ansi)
                .with_target(false)
                .with_filter(filter)
                .boxed(),
        }
    }
}

impl Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Json => write!(f, "json"),
            LogFormat::LogFmt => write!(f, "log-fmt"),
            LogFormat::Terminal => write!(f, "terminal"),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::ValueEnum;

    use super::LogFormat;

    #[test]
    fn test_display_matches_value_names() {
        for format in LogFormat::value_variants() {
            let parsed = LogFormat::from_str(&format.to_string(), false).expect("unknown format");
            assert_eq!(&parsed, format);
        }
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        assert!(LogFormat::from_str("yaml", false).is_err());
    }
}
