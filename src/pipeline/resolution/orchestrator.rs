use serde_json::Value;

use super::assist::GenerativeAssist;
use super::gemini::GeminiClient;
use super::heuristic::HeuristicFallback;
use super::interpret::{LabeledSeriesInterpreter, PassthroughInterpreter, PointSeriesInterpreter};
use super::types::{ChartRequest, GenerativeClient, ResolutionStrategy};
use super::ResolutionError;
use crate::config::GenerativeConfig;
use crate::models::ChartSpecification;

/// Resolver tuning that does not concern the generative service.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolverOptions {
    /// Seed for the heuristic fallback. `None` draws fresh values per call.
    pub fallback_seed: Option<u64>,
}

/// Orchestrates request resolution:
/// passthrough → labeled series → point series → generative assist → heuristic fallback.
///
/// Stateless between calls; one resolver can serve concurrent requests.
pub struct ChartResolver {
    strategies: Vec<Box<dyn ResolutionStrategy>>,
    fallback: HeuristicFallback,
}

impl ChartResolver {
    /// Resolver with the structural interpreters, the generative stage when a
    /// client is given, and the heuristic fallback.
    ///
    /// An injected client must bound its own calls; [`GeminiClient`] does so
    /// with the configured `timeout_secs`.
    pub fn new(
        client: Option<Box<dyn GenerativeClient + Send + Sync>>,
        options: ResolverOptions,
    ) -> Self {
        let mut strategies: Vec<Box<dyn ResolutionStrategy>> = vec![
            Box::new(PassthroughInterpreter),
            Box::new(LabeledSeriesInterpreter),
            Box::new(PointSeriesInterpreter),
        ];
        if let Some(client) = client {
            strategies.push(Box::new(GenerativeAssist::new(client)));
        }

        let fallback = match options.fallback_seed {
            Some(seed) => HeuristicFallback::seeded(seed),
            None => HeuristicFallback::new(),
        };

        Self {
            strategies,
            fallback,
        }
    }

    /// Structural interpreters and heuristic fallback only.
    pub fn without_assist() -> Self {
        Self::new(None, ResolverOptions::default())
    }

    /// Resolver backed by the Gemini client. Fails only on bad configuration.
    pub fn from_config(
        config: &GenerativeConfig,
        options: ResolverOptions,
    ) -> Result<Self, ResolutionError> {
        let client = GeminiClient::new(config)?;
        tracing::info!(model = %client.model(), "Generative assist enabled");
        Ok(Self::new(Some(Box::new(client)), options))
    }

    /// [`from_config`](Self::from_config) over [`GenerativeConfig::from_env`].
    pub fn from_env(options: ResolverOptions) -> Result<Self, ResolutionError> {
        Self::from_config(&GenerativeConfig::from_env()?, options)
    }

    /// Strategy names in evaluation order; the fallback is always last.
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies
            .iter()
            .map(|s| s.name())
            .chain(std::iter::once("heuristic_fallback"))
            .collect()
    }

    /// Resolve a request into a chart specification. Never fails.
    ///
    /// Blocks for the duration of the generative call. Async callers (a tokio
    /// or axum handler) must run it under `tokio::task::spawn_blocking`;
    /// the blocking HTTP client panics when driven from inside a runtime.
    pub fn resolve(&self, text: &str, payload: Option<&Value>) -> ChartSpecification {
        self.resolve_request(&ChartRequest::new(text, payload))
    }

    pub fn resolve_request(&self, request: &ChartRequest) -> ChartSpecification {
        let span = tracing::info_span!(
            "resolve_chart",
            request_id = %request.id,
            kind_hint = %request.kind_hint
        );
        let _enter = span.enter();

        tracing::debug!(
            text_len = request.text.len(),
            has_payload = request.payload.is_some(),
            "Resolving chart request"
        );

        for strategy in &self.strategies {
            match strategy.attempt(request) {
                Ok(Some(spec)) => {
                    tracing::info!(
                        strategy = strategy.name(),
                        kind = %spec.kind,
                        datasets = spec.dataset_count(),
                        "Chart resolved"
                    );
                    return spec;
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(
                        strategy = strategy.name(),
                        error = %e,
                        "Resolution strategy failed, trying next"
                    );
                }
            }
        }

        let spec = self.fallback.generate(request);
        tracing::info!(
            strategy = "heuristic_fallback",
            kind = %spec.kind,
            "Chart resolved"
        );
        spec
    }
}
