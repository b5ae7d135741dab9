// Structural validation of chart configuration objects.
// Shared by the passthrough interpreter (caller payloads) and the
// generative-assist stage (parsed service responses). Both accept the flat
// form and the Chart.js form.

use serde_json::{Map, Value};

use super::classify::classify_kind_name;
use super::ResolutionError;
use crate::models::{label_text, ChartKind, ChartSpecification, Dataset, DisplayOptions};

/// Locate the dataset array in a configuration object:
/// `series`, `datasets`, or `data.datasets`.
pub fn dataset_array(config: &Map<String, Value>) -> Option<&Vec<Value>> {
    config
        .get("series")
        .and_then(Value::as_array)
        .or_else(|| config.get("datasets").and_then(Value::as_array))
        .or_else(|| data_object(config)?.get("datasets")?.as_array())
}

/// True when the configuration carries its own display options.
pub fn has_display_options(config: &Map<String, Value>) -> bool {
    config.get("displayOptions").is_some_and(Value::is_object)
        || config.get("options").is_some_and(Value::is_object)
}

/// Build a specification from a configuration object.
///
/// `fallback_kind` is used when the object names no kind; with `None` a
/// missing kind is a validation error. A kind that is present but not in
/// the closed set is always rejected.
pub fn validate_chart_config(
    config: &Value,
    fallback_kind: Option<ChartKind>,
) -> Result<ChartSpecification, ResolutionError> {
    let obj = config
        .as_object()
        .ok_or_else(|| ResolutionError::Validation("configuration is not an object".into()))?;

    let kind = resolve_kind(obj, fallback_kind)?;
    let series = read_datasets(obj, kind)?;
    let labels = read_labels(obj, kind, &series)?;
    let display_options = obj
        .get("displayOptions")
        .or_else(|| obj.get("options"))
        .cloned()
        .map(DisplayOptions::from)
        .unwrap_or_default();

    Ok(ChartSpecification {
        kind,
        series,
        labels,
        display_options,
    })
}

fn data_object(config: &Map<String, Value>) -> Option<&Map<String, Value>> {
    config.get("data").and_then(Value::as_object)
}

fn resolve_kind(
    obj: &Map<String, Value>,
    fallback_kind: Option<ChartKind>,
) -> Result<ChartKind, ResolutionError> {
    match obj.get("kind").or_else(|| obj.get("type")) {
        Some(Value::String(name)) => classify_kind_name(name)
            .ok_or_else(|| ResolutionError::Validation(format!("unsupported chart kind '{name}'"))),
        Some(other) => Err(ResolutionError::Validation(format!(
            "chart kind must be a string, got {other}"
        ))),
        None => fallback_kind
            .ok_or_else(|| ResolutionError::Validation("missing chart kind".into())),
    }
}

fn read_datasets(obj: &Map<String, Value>, kind: ChartKind) -> Result<Vec<Dataset>, ResolutionError> {
    let raw = dataset_array(obj)
        .ok_or_else(|| ResolutionError::Validation("missing datasets".into()))?;
    if raw.is_empty() {
        return Err(ResolutionError::Validation("datasets are empty".into()));
    }

    raw.iter()
        .enumerate()
        .map(|(index, value)| {
            let dataset: Dataset = serde_json::from_value(value.clone()).map_err(|e| {
                ResolutionError::Validation(format!("dataset {index} is malformed: {e}"))
            })?;

            if dataset.values.is_empty() {
                return Err(ResolutionError::Validation(format!(
                    "dataset {index} has no data"
                )));
            }
            if dataset.values.is_points() != kind.uses_points() {
                let expected = if kind.uses_points() { "points" } else { "numbers" };
                return Err(ResolutionError::Validation(format!(
                    "dataset {index} must hold {expected} for a {kind} chart"
                )));
            }
            Ok(dataset)
        })
        .collect()
}

/// Labels from `labels` or `data.labels`. Scatter charts never carry labels;
/// other kinds without labels get positional ones.
fn read_labels(
    obj: &Map<String, Value>,
    kind: ChartKind,
    series: &[Dataset],
) -> Result<Option<Vec<String>>, ResolutionError> {
    if kind.uses_points() {
        return Ok(None);
    }

    let supplied = obj
        .get("labels")
        .or_else(|| data_object(obj).and_then(|data| data.get("labels")));

    let labels: Vec<String> = match supplied {
        Some(Value::Array(items)) => items.iter().map(label_text).collect(),
        Some(Value::Null) | None => {
            let count = series.iter().map(|d| d.values.len()).max().unwrap_or(0);
            (1..=count).map(|n| n.to_string()).collect()
        }
        Some(other) => {
            return Err(ResolutionError::Validation(format!(
                "labels must be an array, got {other}"
            )))
        }
    };

    for (index, dataset) in series.iter().enumerate() {
        if dataset.values.len() != labels.len() {
            return Err(ResolutionError::Validation(format!(
                "dataset {index} has {} values for {} labels",
                dataset.values.len(),
                labels.len()
            )));
        }
    }

    Ok(Some(labels))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ColorSpec, LegendPosition, SeriesValues};
    use serde_json::json;

    #[test]
    fn flat_config_validates() {
        let spec = validate_chart_config(
            &json!({
                "kind": "bar",
                "labels": ["Q1", "Q2", "Q3"],
                "series": [{"label": "x", "values": [1, 2, 3]}]
            }),
            None,
        )
        .unwrap();

        assert_eq!(spec.kind, ChartKind::Bar);
        assert_eq!(spec.dataset_count(), 1);
        assert_eq!(spec.labels.as_deref().map(<[String]>::len), Some(3));
        assert!(spec.title().is_none());
    }

    #[test]
    fn chartjs_config_validates() {
        let spec = validate_chart_config(
            &json!({
                "type": "line",
                "data": {
                    "labels": [2021, 2022],
                    "datasets": [{"label": "Users", "data": [5, 9], "borderColor": "#f00", "tension": 0.3}]
                },
                "options": {"plugins": {"legend": {"position": "bottom"}, "title": {"display": true, "text": "Growth"}}}
            }),
            None,
        )
        .unwrap();

        assert_eq!(spec.kind, ChartKind::Line);
        assert_eq!(spec.labels, Some(vec!["2021".to_string(), "2022".to_string()]));
        assert_eq!(spec.title(), Some("Growth"));
        assert_eq!(spec.display_options.legend_position, LegendPosition::Bottom);
        assert_eq!(spec.series[0].stroke_color, Some(ColorSpec::Single("#f00".into())));
        assert_eq!(spec.series[0].extra.get("tension"), Some(&json!(0.3)));
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let err = validate_chart_config(
            &json!({"kind": "sankey", "series": [{"label": "x", "values": [1]}], "labels": ["a"]}),
            Some(ChartKind::Bar),
        )
        .unwrap_err();
        assert!(matches!(err, ResolutionError::Validation(_)));
    }

    #[test]
    fn missing_kind_needs_fallback() {
        let config = json!({"series": [{"label": "x", "values": [1, 2]}], "labels": ["a", "b"]});
        assert!(validate_chart_config(&config, None).is_err());
        let spec = validate_chart_config(&config, Some(ChartKind::Pie)).unwrap();
        assert_eq!(spec.kind, ChartKind::Pie);
    }

    #[test]
    fn kind_synonyms_are_accepted() {
        let spec = validate_chart_config(
            &json!({"type": "Column", "series": [{"label": "x", "values": [1]}], "labels": ["a"]}),
            None,
        )
        .unwrap();
        assert_eq!(spec.kind, ChartKind::Bar);
    }

    #[test]
    fn empty_or_missing_datasets_rejected() {
        assert!(validate_chart_config(&json!({"kind": "bar"}), None).is_err());
        assert!(validate_chart_config(&json!({"kind": "bar", "series": []}), None).is_err());
        assert!(validate_chart_config(
            &json!({"kind": "bar", "series": [{"label": "x", "values": []}]}),
            None
        )
        .is_err());
    }

    #[test]
    fn label_length_mismatch_rejected() {
        let err = validate_chart_config(
            &json!({"kind": "bar", "labels": ["a", "b"], "series": [{"label": "x", "values": [1, 2, 3]}]}),
            None,
        )
        .unwrap_err();
        assert!(err.to_string().contains("3 values for 2 labels"));
    }

    #[test]
    fn absent_labels_become_positional() {
        let spec = validate_chart_config(
            &json!({"kind": "line", "series": [{"label": "x", "values": [4, 5, 6]}]}),
            None,
        )
        .unwrap();
        assert_eq!(
            spec.labels,
            Some(vec!["1".to_string(), "2".to_string(), "3".to_string()])
        );
    }

    #[test]
    fn scatter_drops_labels_and_requires_points() {
        let spec = validate_chart_config(
            &json!({
                "kind": "scatter",
                "labels": ["ignored"],
                "series": [{"label": "pts", "values": [{"x": 1, "y": 2}]}]
            }),
            None,
        )
        .unwrap();
        assert!(spec.labels.is_none());
        assert!(matches!(spec.series[0].values, SeriesValues::Points(_)));

        assert!(validate_chart_config(
            &json!({"kind": "scatter", "series": [{"label": "n", "values": [1, 2]}]}),
            None
        )
        .is_err());
    }

    #[test]
    fn non_object_rejected() {
        assert!(validate_chart_config(&json!([1, 2, 3]), Some(ChartKind::Bar)).is_err());
    }

    #[test]
    fn detects_dataset_locations_and_options() {
        let flat = json!({"series": [], "displayOptions": {}});
        let chartjs = json!({"data": {"datasets": []}});
        assert!(dataset_array(flat.as_object().unwrap()).is_some());
        assert!(dataset_array(chartjs.as_object().unwrap()).is_some());
        assert!(has_display_options(flat.as_object().unwrap()));
        assert!(!has_display_options(chartjs.as_object().unwrap()));
    }
}
