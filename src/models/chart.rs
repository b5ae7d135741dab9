use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::enums::{ChartKind, LegendPosition};

/// Renderer-ready description of one chart. Built once per request and
/// handed to the caller; later edits work on the caller's copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSpecification {
    pub kind: ChartKind,
    pub series: Vec<Dataset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
    #[serde(default)]
    pub display_options: DisplayOptions,
}

/// One named sequence of values plus its styling.
///
/// Accepts both the flat field names and the Chart.js dataset names
/// (`data`, `backgroundColor`, `borderColor`, `fill`). Keys the pipeline
/// does not model (`borderWidth`, `tension`, ...) are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(default)]
    pub label: String,
    #[serde(alias = "data")]
    pub values: SeriesValues,
    #[serde(default, alias = "backgroundColor", skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<ColorSpec>,
    #[serde(default, alias = "borderColor", skip_serializing_if = "Option::is_none")]
    pub stroke_color: Option<ColorSpec>,
    #[serde(
        default,
        alias = "fill",
        deserialize_with = "fill_flag",
        skip_serializing_if = "Option::is_none"
    )]
    pub fill_area: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SeriesValues {
    Numbers(Vec<f64>),
    Points(Vec<Point>),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// A single colour, or one colour per value (needed for per-slice recolouring).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorSpec {
    Single(String),
    PerValue(Vec<String>),
}

/// Chart title: one line, or several (Chart.js accepts `text: string[]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TitleText {
    Line(String),
    Lines(Vec<String>),
}

/// Display configuration bag. Chart.js `options` objects are accepted as
/// well; anything beyond the modelled keys is carried in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "Value")]
pub struct DisplayOptions {
    pub responsive: bool,
    pub legend_position: LegendPosition,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<TitleText>,
    /// `false` keeps a title in the config without drawing it.
    #[serde(skip_serializing_if = "is_true")]
    pub title_visible: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChartSpecification {
    pub fn dataset_count(&self) -> usize {
        self.series.len()
    }

    /// Title text; the first line of a multi-line title.
    pub fn title(&self) -> Option<&str> {
        self.display_options.title.as_ref().and_then(TitleText::first_line)
    }
}

impl Dataset {
    /// Dataset with no styling set yet.
    pub fn new(label: impl Into<String>, values: SeriesValues) -> Self {
        Self {
            label: label.into(),
            values,
            fill_color: None,
            stroke_color: None,
            fill_area: None,
            extra: Map::new(),
        }
    }
}

impl SeriesValues {
    pub fn len(&self) -> usize {
        match self {
            Self::Numbers(v) => v.len(),
            Self::Points(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_points(&self) -> bool {
        matches!(self, Self::Points(_))
    }
}

impl TitleText {
    pub fn first_line(&self) -> Option<&str> {
        match self {
            Self::Line(text) => Some(text.as_str()),
            Self::Lines(lines) => lines.first().map(String::as_str),
        }
    }

    /// A string or an array of strings; anything else is not a title.
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(text) => Some(Self::Line(text.clone())),
            Value::Array(items) => items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
                .map(Self::Lines),
            _ => None,
        }
    }
}

impl From<String> for TitleText {
    fn from(text: String) -> Self {
        Self::Line(text)
    }
}

impl From<&str> for TitleText {
    fn from(text: &str) -> Self {
        Self::Line(text.to_string())
    }
}

impl DisplayOptions {
    /// Responsive, legend on top, titled with `title`.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(TitleText::Line(title.into())),
            ..Self::default()
        }
    }

    /// True when a title is modelled or an unmodelled `plugins.title` /
    /// `title` object is carried in `extra`.
    pub fn has_title(&self) -> bool {
        self.title.is_some()
            || self.extra.contains_key("title")
            || self
                .extra
                .get("plugins")
                .and_then(|p| p.get("title"))
                .is_some()
    }
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            responsive: true,
            legend_position: LegendPosition::Top,
            title: None,
            title_visible: true,
            extra: Map::new(),
        }
    }
}

impl From<Value> for DisplayOptions {
    fn from(value: Value) -> Self {
        let Value::Object(mut obj) = value else {
            return Self::default();
        };

        let responsive = match obj.remove("responsive") {
            Some(Value::Bool(b)) => b,
            // not a flag; dropped so it cannot shadow the field
            _ => true,
        };

        let mut legend_position = obj
            .remove("legendPosition")
            .and_then(|v| v.as_str().and_then(|s| s.parse().ok()));
        let mut title_visible = obj.remove("titleVisible").and_then(|v| v.as_bool());

        // Chart.js 2.x kept the title at options.title
        let mut legacy_title = None;
        let mut title = match obj.remove("title") {
            Some(Value::Object(mut t)) => {
                let (text, display) = take_title_fields(&mut t);
                title_visible = title_visible.or(display);
                if !t.is_empty() {
                    legacy_title = Some(t);
                }
                text
            }
            Some(other) => {
                let text = TitleText::from_value(&other);
                if text.is_none() && !other.is_null() {
                    legacy_title = Some(Map::from_iter([("text".to_string(), other)]));
                }
                text
            }
            None => None,
        };

        if let Some(Value::Object(plugins)) = obj.get_mut("plugins") {
            if let Some(Value::Object(legend)) = plugins.get_mut("legend") {
                if let Some(Value::String(pos)) = legend.remove("position") {
                    legend_position = legend_position.or_else(|| pos.parse().ok());
                }
                if legend.is_empty() {
                    plugins.remove("legend");
                }
            }
            if title.is_none() {
                if let Some(Value::Object(t)) = plugins.get_mut("title") {
                    let (text, display) = take_title_fields(t);
                    title = text;
                    title_visible = title_visible.or(display);
                    if t.is_empty() {
                        plugins.remove("title");
                    }
                }
            }
            if plugins.is_empty() {
                obj.remove("plugins");
            }
        }

        // an unreadable title object stays as given rather than being lost
        if title.is_none() {
            if let Some(t) = legacy_title {
                obj.insert("title".into(), Value::Object(t));
            }
        }

        Self {
            responsive,
            legend_position: legend_position.unwrap_or_default(),
            title,
            title_visible: title_visible.unwrap_or(true),
            extra: obj,
        }
    }
}

/// Take `text` (string or string array) and `display` (bool) out of a
/// title object. Values of any other type are left in place.
fn take_title_fields(t: &mut Map<String, Value>) -> (Option<TitleText>, Option<bool>) {
    let text = t.get("text").and_then(TitleText::from_value);
    if text.is_some() {
        t.remove("text");
    }
    let display = t.get("display").and_then(Value::as_bool);
    if display.is_some() {
        t.remove("display");
    }
    (text, display)
}

fn is_true(flag: &bool) -> bool {
    *flag
}

/// Chart.js allows `fill` to be a boolean, a target name, or an object;
/// anything truthy other than `false` counts as filled.
fn fill_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::Bool(b)) => Some(b),
        Some(Value::String(s)) => Some(!s.is_empty() && s != "false"),
        Some(_) => Some(true),
    })
}

/// Category label text for an arbitrary JSON label (years often arrive as numbers).
pub fn label_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn dataset_accepts_chartjs_names() {
        let ds: Dataset = serde_json::from_value(json!({
            "label": "Revenue",
            "data": [1, 2, 3],
            "backgroundColor": ["#111", "#222", "#333"],
            "borderColor": "#444",
            "fill": "origin",
            "borderWidth": 2
        }))
        .unwrap();

        assert_eq!(ds.label, "Revenue");
        assert_eq!(ds.values, SeriesValues::Numbers(vec![1.0, 2.0, 3.0]));
        assert!(matches!(ds.fill_color, Some(ColorSpec::PerValue(ref c)) if c.len() == 3));
        assert_eq!(ds.stroke_color, Some(ColorSpec::Single("#444".into())));
        assert_eq!(ds.fill_area, Some(true));
        assert_eq!(ds.extra.get("borderWidth"), Some(&json!(2)));
    }

    #[test]
    fn dataset_accepts_point_values() {
        let ds: Dataset = serde_json::from_value(json!({
            "label": "pts",
            "values": [{"x": 1, "y": 2}, {"x": 3.5, "y": 4}]
        }))
        .unwrap();
        assert!(ds.values.is_points());
        assert_eq!(ds.values.len(), 2);
        assert!(ds.fill_area.is_none());
    }

    #[test]
    fn dataset_serializes_flat_names() {
        let mut ds = Dataset::new("Data", SeriesValues::Numbers(vec![5.0]));
        ds.fill_color = Some(ColorSpec::Single("#36a2eb".into()));
        let v = serde_json::to_value(&ds).unwrap();
        assert_eq!(v["fillColor"], json!("#36a2eb"));
        assert!(v.get("strokeColor").is_none());
        assert!(v.get("fillArea").is_none());
    }

    #[test]
    fn display_options_from_chartjs_options() {
        let opts = DisplayOptions::from(json!({
            "responsive": false,
            "plugins": {
                "legend": {"position": "bottom"},
                "title": {"display": true, "text": "Sales"},
                "tooltip": {"enabled": false}
            },
            "scales": {"y": {"beginAtZero": true}}
        }));
        assert!(!opts.responsive);
        assert_eq!(opts.legend_position, LegendPosition::Bottom);
        assert_eq!(opts.title, Some(TitleText::from("Sales")));
        assert!(opts.title_visible);
        assert_eq!(opts.extra["plugins"], json!({"tooltip": {"enabled": false}}));
        assert!(opts.extra.contains_key("scales"));
    }

    #[test]
    fn display_options_from_flat_form() {
        let opts = DisplayOptions::from(json!({
            "legendPosition": "left",
            "title": "Traffic"
        }));
        assert!(opts.responsive);
        assert_eq!(opts.legend_position, LegendPosition::Left);
        assert_eq!(opts.title, Some(TitleText::from("Traffic")));
        assert!(opts.extra.is_empty());
    }

    #[test]
    fn display_options_non_object_is_default() {
        assert_eq!(DisplayOptions::from(json!("nope")), DisplayOptions::default());
    }

    #[test]
    fn multiline_title_is_kept() {
        let opts = DisplayOptions::from(json!({
            "plugins": {"title": {"display": true, "text": ["Revenue", "2024"]}}
        }));
        assert_eq!(
            opts.title,
            Some(TitleText::Lines(vec!["Revenue".into(), "2024".into()]))
        );
        assert!(opts.extra.is_empty());
    }

    #[test]
    fn hidden_title_stays_hidden() {
        let opts = DisplayOptions::from(json!({
            "plugins": {"title": {"display": false, "text": "Hidden"}}
        }));
        assert_eq!(opts.title, Some(TitleText::from("Hidden")));
        assert!(!opts.title_visible);

        let back: DisplayOptions =
            serde_json::from_value(serde_json::to_value(&opts).unwrap()).unwrap();
        assert_eq!(back, opts);
    }

    #[test]
    fn unreadable_title_text_is_left_in_place() {
        let opts = DisplayOptions::from(json!({
            "plugins": {"title": {"display": true, "text": 42}}
        }));
        assert!(opts.title.is_none());
        assert!(opts.has_title());
        assert_eq!(opts.extra["plugins"]["title"], json!({"text": 42}));
    }

    #[test]
    fn non_bool_responsive_is_dropped() {
        let opts = DisplayOptions::from(json!({"responsive": "yes"}));
        assert!(opts.responsive);
        assert!(!opts.extra.contains_key("responsive"));

        let text = serde_json::to_string(&opts).unwrap();
        assert_eq!(text.matches("\"responsive\"").count(), 1);
    }

    #[test]
    fn specification_round_trips_through_serde() {
        let spec = ChartSpecification {
            kind: ChartKind::Line,
            series: vec![Dataset::new("a", SeriesValues::Numbers(vec![1.0, 2.0]))],
            labels: Some(vec!["x".into(), "y".into()]),
            display_options: DisplayOptions::titled("t"),
        };
        let text = serde_json::to_string(&spec).unwrap();
        let back: ChartSpecification = serde_json::from_str(&text).unwrap();
        assert_eq!(back, spec);
    }

    #[test]
    fn label_text_stringifies_numbers() {
        assert_eq!(label_text(&json!(2024)), "2024");
        assert_eq!(label_text(&json!("Q1")), "Q1");
    }
}
