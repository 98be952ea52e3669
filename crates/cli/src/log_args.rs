//! clap [Args](clap::Args) for logging configuration.
// Mostly taken from [reth](https://github.com/paradigmxyz/reth)

use clap::{ArgAction, Args, ValueEnum};
use evmext_tracing::{
    tracing_subscriber::filter::Directive, EvmextTracer, LayerInfo, LogFormat, Tracer,
};
use std::fmt::{self, Display};
use tracing::{level_filters::LevelFilter, Level};

/// The log configuration.
#[derive(Debug, Args)]
#[clap(next_help_heading = "LOGGING")]
pub(crate) struct LogArgs {
    /// The format to use for logs written to stdout.
    #[clap(long = "log.stdout.format", value_name = "FORMAT", global = true, default_value_t = LogFormat::Terminal)]
    pub(crate) log_stdout_format: LogFormat,

    /// The filter to use for logs written to stdout.
    #[clap(long = "log.stdout.filter", value_name = "FILTER", global = true, default_value = "")]
    pub(crate) log_stdout_filter: String,

    /// Sets whether or not the formatter emits ANSI terminal escape codes for colors and other
    /// text formatting.
    #[clap(
        long,
        value_name = "COLOR",
        global = true,
        default_value_t = ColorMode::Always
    )]
    pub(crate) color: ColorMode,

    /// The verbosity settings for the tracer.
    #[clap(flatten)]
    pub(crate) verbosity: Verbosity,
}

impl LogArgs {
    fn layer(&self) -> LayerInfo {
        LayerInfo::new(
            self.log_stdout_format,
            self.verbosity.directive().to_string(),
            self.log_stdout_filter.clone(),
            Some(self.color.to_string()),
        )
    }

    /// Initializes tracing with the configured options from cli args.
    pub(crate) fn init_tracing(&self) -> eyre::Result<()> {
        EvmextTracer::new().with_stdout(self.layer()).init()
    }
}

/// The color mode for the cli.
#[derive(Debug, Copy, Clone, ValueEnum, Eq, PartialEq)]
pub(crate) enum ColorMode {
    /// Colors on
    Always,
    /// Colors on when stdout is a terminal
    Auto,
    /// Colors off
    Never,
}

impl Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorMode::Always => write!(f, "always"),
            ColorMode::Auto => write!(f, "auto"),
            ColorMode::Never => write!(f, "never"),
        }
    }
}

/// The verbosity settings for the cli.
#[derive(Debug, Copy, Clone, Args)]
#[clap(next_help_heading = "DISPLAY")]
pub(crate) struct Verbosity {
    /// Set the minimum log level.
    ///
    /// -v     Warnings & Errors
    /// -vv    Info
    /// -vvv   Debug
    /// -vvvv  Traces (warning: very verbose!)
    #[clap(short, long, action = ArgAction::Count, global = true, default_value_t = 1, verbatim_doc_comment, help_heading = "DISPLAY")]
    verbosity: u8,

    /// Silence all log output.
    #[clap(long, alias = "silent", short = 'q', global = true, help_heading = "DISPLAY")]
    quiet: bool,
}

impl Verbosity {
    /// Get the corresponding [Directive] for the given verbosity, or `off` if the verbosity
    /// corresponds to silent.
    pub(crate) fn directive(&self) -> Directive {
        if self.quiet {
            LevelFilter::OFF.into()
        } else {
            let level = match self.verbosity.saturating_sub(1) {
                0 => Level::WARN,
                1 => Level::INFO,
                2 => Level::DEBUG,
                _ => Level::TRACE,
            };

            level.into()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Debug, Parser)]
    struct TestArgs {
        #[clap(flatten)]
        logs: LogArgs,
    }

    #[test]
    fn test_default_verbosity_is_warn() {
        let args = TestArgs::parse_from(["evmext"]);
        assert_eq!(args.logs.verbosity.directive().to_string().to_lowercase(), "warn");
        assert_eq!(args.logs.log_stdout_format, LogFormat::Terminal);
    }

    #[test]
    fn test_verbosity_levels() {
        let args = TestArgs::parse_from(["evmext", "-vvv"]);
        assert_eq!(args.logs.verbosity.directive().to_string().to_lowercase(), "debug");

        let args = TestArgs::parse_from(["evmext", "-vvvvvv"]);
        assert_eq!(args.logs.verbosity.directive().to_string().to_lowercase(), "trace");
    }

    #[test]
    fn test_quiet_turns_logging_off() {
        let args = TestArgs::parse_from(["evmext", "-vvv", "-q"]);
        assert_eq!(args.logs.verbosity.directive().to_string().to_lowercase(), "off");
    }

    #[test]
    fn test_format_and_color_flags() {
        let args =
            TestArgs::parse_from(["evmext", "--log.stdout.format", "json", "--color", "never"]);
        assert_eq!(args.logs.log_stdout_format, LogFormat::Json);
        assert_eq!(args.logs.color, ColorMode::Never);
    }
}
