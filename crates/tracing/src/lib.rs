//! Tracing setup for the evmext command line.
//!
//! A [`EvmextTracer`] installs a [`tracing_subscriber`] registry with a single stdout layer,
//! described by a [`LayerInfo`]: the output [`LogFormat`], a default level and extra
//! `EnvFilter` directives. `RUST_LOG` is honored on top of those.

mod formatter;

use tracing_subscriber::{
    filter::Directive, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

pub use formatter::LogFormat;
// re-export so front-ends can name filter types without their own dependency
pub use tracing_subscriber;

/// A boxed tracing [`Layer`].
pub type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync>;

/// Installs a global tracing subscriber.
pub trait Tracer {
    /// Initializes the subscriber. Fails if one is already installed or a filter directive is
    /// invalid.
    fn init(self) -> eyre::Result<()>;
}

/// Configuration of a single tracing layer.
#[derive(Debug, Clone)]
pub struct LayerInfo {
    format: LogFormat,
    default_directive: String,
    filters: String,
    color: Option<String>,
}

impl LayerInfo {
    /// Creates a new [`LayerInfo`].
    ///
    /// `default_directive` is the level used for targets that `filters` does not mention, and
    /// `filters` is a comma-separated list of `EnvFilter` directives.
    pub fn new(
        format: LogFormat,
        default_directive: String,
        filters: String,
        color: Option<String>,
    ) -> Self {
        Self { format, default_directive, filters, color }
    }

    fn layer(&self) -> eyre::Result<BoxedLayer<Registry>> {
        let filter = build_env_filter(Some(self.default_directive.parse()?), &self.filters)?;
        Ok(self.format.apply(filter, self.color.clone()))
    }
}

impl Default for LayerInfo {
    fn default() -> Self {
        Self {
            format: LogFormat::Terminal,
            default_directive: "warn".to_string(),
            filters: String::new(),
            color: Some("always".to_string()),
        }
    }
}

/// The tracer used by the evmext binary.
#[derive(Debug, Clone, Default)]
pub struct EvmextTracer {
    stdout: LayerInfo,
}

impl EvmextTracer {
    /// Creates a tracer with a warn-level terminal layer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the stdout layer configuration.
    pub fn with_stdout(mut self, config: LayerInfo) -> Self {
        self.stdout = config;
        self
    }
}

impl Tracer for EvmextTracer {
    fn init(self) -> eyre::Result<()> {
        let layers = vec![self.stdout.layer()?];
        tracing_subscriber::registry().with(layers).try_init()?;
        Ok(())
    }
}

/// Builds an [`EnvFilter`] from `RUST_LOG`, falling back to `default_directive`, and adds the
/// comma-separated `directives` on top.
pub fn build_env_filter(
    default_directive: Option<Directive>,
    directives: &str,
) -> eyre::Result<EnvFilter> {
    let env_filter = match default_directive {
        Some(directive) => EnvFilter::builder().with_default_directive(directive).from_env_lossy(),
        None => EnvFilter::builder().from_env_lossy(),
    };

    directives
        .split(',')
        .map(str::trim)
        .filter(|directive| !directive.is_empty())
        .try_fold(env_filter, |env_filter, directive| {
            Ok(env_filter.add_directive(directive.parse()?))
        })
}

#[cfg(test)]
mod tests {
    use tracing::level_filters::LevelFilter;

    use super::*;

    #[test]
    fn test_build_env_filter_with_directives() {
        let filter =
            build_env_filter(Some(LevelFilter::INFO.into()), "evmext_vm=trace, evmext_cli=debug");
        assert!(filter.is_ok());
    }

    #[test]
    fn test_build_env_filter_empty_directives() {
        assert!(build_env_filter(None, "").is_ok());
        assert!(build_env_filter(None, ",,").is_ok());
    }

    #[test]
    fn test_build_env_filter_invalid_directive() {
        assert!(build_env_filter(None, "evmext_vm=loudest").is_err());
    }

    #[test]
    fn test_layer_rejects_invalid_default_directive() {
        let info = LayerInfo::new(
            LogFormat::Terminal,
            "evmext=loudest".to_string(),
            String::new(),
            None,
        );
        assert!(info.layer().is_err());
    }

    #[test]
    fn test_layer_for_every_format() {
        for format in [LogFormat::Json, LogFormat::LogFmt, LogFormat::Terminal] {
            let info = LayerInfo::new(format, "info".to_string(), String::new(), None);
            assert!(info.layer().is_ok());
        }
    }
}
