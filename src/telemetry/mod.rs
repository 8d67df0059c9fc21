//! Observability: logging setup, telemetry sinks and the traced embeddings wrapper

pub mod metrics;
pub mod sink;
pub mod traced;

use crate::config::LoggingConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub use metrics::{MetricsCollector, MetricsSnapshot};
pub use sink::{EmbeddingOperation, TelemetrySink, TracingSink};
pub use traced::TracedEmbeddings;

/// Initialize logging and tracing.
///
/// `RUST_LOG` overrides `log_level` when set. Returns false when a global
/// subscriber was already installed.
pub fn init_observability(log_level: &str, format: &str) -> bool {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    let result = match format {
        "json" => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        _ => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init(),
    };

    result.is_ok()
}

/// Initialize logging from the `[logging]` configuration section
pub fn init_from_config(config: &LoggingConfig) -> bool {
    init_observability(&config.level, &config.format)
}
