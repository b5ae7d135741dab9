//! Chart request resolution.
//!
//! [`ChartResolver::resolve`] is synchronous and may block on one outbound
//! HTTP call. From async code, call it inside `spawn_blocking`.

pub mod config;
pub mod models;
pub mod pipeline;

pub use config::GenerativeConfig;
pub use models::{ChartKind, ChartSpecification, Dataset, DisplayOptions, SeriesValues};
pub use pipeline::resolution::{ChartResolver, ResolutionError, ResolverOptions};

use tracing_subscriber::EnvFilter;

/// Install the fmt subscriber. `RUST_LOG` wins over the default filter.
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init();

    tracing::debug!("{} v{} tracing initialised", config::APP_NAME, config::APP_VERSION);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_tracing_is_idempotent() {
        init_tracing();
        init_tracing();
    }

    #[test]
    fn top_level_resolve_without_service() {
        init_tracing();
        let spec = ChartResolver::without_assist().resolve("steps per day as a line chart", None);
        assert_eq!(spec.kind, ChartKind::Line);
        assert_eq!(spec.labels.as_ref().map(Vec::len), Some(7));
    }
}
