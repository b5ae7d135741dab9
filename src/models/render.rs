//! Chart.js projection of a resolved specification.
//!
//! The resolver's output is renderer-agnostic; this is the one projection
//! the web front end consumes (`{type, data, options}`).

use serde_json::{json, Map, Value};

use super::chart::{ChartSpecification, Dataset};

impl ChartSpecification {
    /// Build the Chart.js configuration object for this specification.
    pub fn to_chartjs(&self) -> Value {
        let datasets: Vec<Value> = self.series.iter().map(dataset_to_chartjs).collect();

        let mut data = Map::new();
        if let Some(labels) = &self.labels {
            data.insert("labels".into(), json!(labels));
        }
        data.insert("datasets".into(), Value::Array(datasets));

        json!({
            "type": self.kind.as_str(),
            "data": Value::Object(data),
            "options": options_to_chartjs(self),
        })
    }
}

fn dataset_to_chartjs(ds: &Dataset) -> Value {
    let mut out = ds.extra.clone();
    out.insert("label".into(), json!(ds.label));
    out.insert("data".into(), json!(ds.values));
    if let Some(fill) = &ds.fill_color {
        out.insert("backgroundColor".into(), json!(fill));
    }
    if let Some(stroke) = &ds.stroke_color {
        out.insert("borderColor".into(), json!(stroke));
    }
    if let Some(fill_area) = ds.fill_area {
        out.insert("fill".into(), json!(fill_area));
    }
    Value::Object(out)
}

fn options_to_chartjs(spec: &ChartSpecification) -> Value {
    let opts = &spec.display_options;
    let mut out = opts.extra.clone();
    out.insert("responsive".into(), json!(opts.responsive));

    let plugins = out
        .entry("plugins")
        .or_insert_with(|| Value::Object(Map::new()));
    if !plugins.is_object() {
        *plugins = Value::Object(Map::new());
    }
    if let Value::Object(plugins) = plugins {
        plugins.insert(
            "legend".into(),
            json!({ "position": opts.legend_position.as_str() }),
        );
        if let Some(title) = &opts.title {
            plugins.insert(
                "title".into(),
                json!({ "display": opts.title_visible, "text": title }),
            );
        }
    }
    Value::Object(out)
}
