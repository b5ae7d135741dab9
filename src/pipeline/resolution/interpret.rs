// Structural interpreters: payload shapes that translate directly into a
// specification without any outbound call.

use serde_json::Value;

use super::styling::{style_category_dataset, style_point_dataset};
use super::types::{ChartRequest, ResolutionStrategy};
use super::validation::{dataset_array, has_display_options, validate_chart_config};
use super::ResolutionError;
use crate::models::{label_text, ChartSpecification, Dataset, DisplayOptions, Point, SeriesValues};

/// Payload already is a full specification: a non-empty array of dataset
/// objects under `series`, `datasets` or `data.datasets`.
///
/// Datasets are taken as supplied. Only the kind (guessed from the request
/// text) and display options (titled with the request text) are filled in
/// when missing.
pub struct PassthroughInterpreter;

impl ResolutionStrategy for PassthroughInterpreter {
    fn name(&self) -> &'static str {
        "passthrough"
    }

    fn attempt(
        &self,
        request: &ChartRequest,
    ) -> Result<Option<ChartSpecification>, ResolutionError> {
        let Some(payload) = request.payload_object() else {
            return Ok(None);
        };
        let Some(datasets) = dataset_array(payload) else {
            return Ok(None);
        };
        if datasets.is_empty() || !datasets.iter().all(Value::is_object) {
            return Ok(None);
        }

        let payload_value = Value::Object(payload.clone());
        let mut spec = validate_chart_config(&payload_value, Some(request.kind_hint))?;
        if !has_display_options(payload) {
            spec.display_options = DisplayOptions::titled(request.text.clone());
        }
        Ok(Some(spec))
    }
}

/// Parallel `labels` and `values` arrays become one dataset named "Data".
/// Declines when the arrays differ in length or a value is not numeric.
pub struct LabeledSeriesInterpreter;

impl ResolutionStrategy for LabeledSeriesInterpreter {
    fn name(&self) -> &'static str {
        "labeled_series"
    }

    fn attempt(
        &self,
        request: &ChartRequest,
    ) -> Result<Option<ChartSpecification>, ResolutionError> {
        let (Some(labels), Some(values)) =
            (request.payload_array("labels"), request.payload_array("values"))
        else {
            return Ok(None);
        };

        if labels.len() != values.len() || values.is_empty() {
            tracing::debug!(
                labels = labels.len(),
                values = values.len(),
                "Labeled series lengths differ, declining"
            );
            return Ok(None);
        }

        let Some(numbers) = values.iter().map(Value::as_f64).collect::<Option<Vec<f64>>>() else {
            tracing::debug!("Labeled series holds non-numeric values, declining");
            return Ok(None);
        };

        let kind = request.kind_hint;
        let mut dataset = Dataset::new("Data", SeriesValues::Numbers(numbers));
        style_category_dataset(&mut dataset, kind);

        let labels = if kind.uses_points() {
            None
        } else {
            Some(labels.iter().map(label_text).collect())
        };

        Ok(Some(ChartSpecification {
            kind,
            series: vec![dataset],
            labels,
            display_options: DisplayOptions::titled(request.text.clone()),
        }))
    }
}

/// A scatter request whose payload carries `points: [{x, y}, ...]` becomes
/// one dataset named "Scatter Data" with no labels.
pub struct PointSeriesInterpreter;

impl ResolutionStrategy for PointSeriesInterpreter {
    fn name(&self) -> &'static str {
        "point_series"
    }

    fn attempt(
        &self,
        request: &ChartRequest,
    ) -> Result<Option<ChartSpecification>, ResolutionError> {
        if !request.kind_hint.uses_points() {
            return Ok(None);
        }
        let Some(raw) = request.payload_array("points") else {
            return Ok(None);
        };
        if raw.is_empty() {
            return Ok(None);
        }

        let points: Vec<Point> = serde_json::from_value(Value::Array(raw.clone()))
            .map_err(|e| ResolutionError::Validation(format!("malformed points: {e}")))?;

        let mut dataset = Dataset::new("Scatter Data", SeriesValues::Points(points));
        style_point_dataset(&mut dataset);

        Ok(Some(ChartSpecification {
            kind: request.kind_hint,
            series: vec![dataset],
            labels: None,
            display_options: DisplayOptions::titled(request.text.clone()),
        }))
    }
}
