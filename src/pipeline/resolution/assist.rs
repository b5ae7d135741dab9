use super::gemini::extract_response_text;
use super::parser::parse_response_text;
use super::prompt::build_chart_prompt;
use super::sanitize::sanitize_request_text;
use super::types::{ChartRequest, GenerativeClient, ResolutionStrategy};
use super::validation::validate_chart_config;
use super::ResolutionError;
use crate::models::{ChartSpecification, TitleText};

/// Asks the generative service for a configuration:
/// sanitize → prompt → submit → envelope → lenient parse → validate → title patch.
///
/// One call per request, no retries. Every failure comes back as an error
/// for the resolver to log and skip.
pub struct GenerativeAssist {
    client: Box<dyn GenerativeClient + Send + Sync>,
}

impl GenerativeAssist {
    pub fn new(client: Box<dyn GenerativeClient + Send + Sync>) -> Self {
        Self { client }
    }
}

impl ResolutionStrategy for GenerativeAssist {
    fn name(&self) -> &'static str {
        "generative_assist"
    }

    fn attempt(
        &self,
        request: &ChartRequest,
    ) -> Result<Option<ChartSpecification>, ResolutionError> {
        let request_id = request.id.to_string();
        let sanitized = sanitize_request_text(&request.text, Some(&request_id));
        let prompt = build_chart_prompt(&sanitized);

        tracing::debug!(
            request_id = %request_id,
            prompt_len = prompt.len(),
            "Submitting chart prompt"
        );

        let envelope = self.client.submit_prompt(&prompt)?;
        let text = extract_response_text(&envelope)?;
        let parsed = parse_response_text(&text)?;
        let mut spec = validate_chart_config(&parsed, None)?;

        if !spec.display_options.has_title() {
            spec.display_options.title = Some(TitleText::from(request.text.as_str()));
        }

        tracing::info!(
            request_id = %request_id,
            kind = %spec.kind,
            datasets = spec.dataset_count(),
            "Generative service proposed a chart"
        );

        Ok(Some(spec))
    }
}
