//! Payload normalisation ahead of the strategy cascade.
//!
//! Structured payloads pass through. Raw text payloads are tried first as an
//! object literal (lenient parser) and then as a CSV table, which becomes a
//! `{labels, datasets}` object the passthrough stage understands.

use serde_json::{json, Map, Value};

use super::parser::parse_lenient;
use super::styling::dataset_color;

/// Normalise a caller payload. `None` means "no payload".
pub fn normalize_payload(payload: &Value) -> Option<Value> {
    match payload {
        Value::Null => None,
        Value::String(text) if text.trim().is_empty() => None,
        Value::String(text) => Some(
            parse_lenient(text)
                .filter(Value::is_object)
                .or_else(|| csv_to_payload(text))
                .unwrap_or_else(|| payload.clone()),
        ),
        Value::Array(items) if is_point_array(items) => Some(json!({ "points": items })),
        other => Some(other.clone()),
    }
}

fn is_point_array(items: &[Value]) -> bool {
    !items.is_empty()
        && items.iter().all(|item| {
            item.get("x").is_some_and(Value::is_number) && item.get("y").is_some_and(Value::is_number)
        })
}

/// Convert CSV text into `{labels, datasets}`.
///
/// Header row: first cell ignored, the rest are category labels. Each data
/// row is one dataset named `Dataset {n}` (its first cell is a row key and is
/// skipped); non-numeric cells count as 0.
/// Returns `None` unless there is a header with at least one label, at least
/// one data row, and at least one numeric cell.
pub fn csv_to_payload(text: &str) -> Option<Value> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let rows: Vec<csv::StringRecord> = reader
        .records()
        .collect::<Result<Vec<_>, _>>()
        .ok()?
        .into_iter()
        .filter(|row| row.iter().any(|cell| !cell.is_empty()))
        .collect();

    let (header, data_rows) = rows.split_first()?;
    if header.len() < 2 || data_rows.is_empty() {
        return None;
    }

    let labels: Vec<String> = header.iter().skip(1).map(str::to_string).collect();
    let mut saw_number = false;

    let datasets: Vec<Value> = data_rows
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let values: Vec<f64> = (1..=labels.len())
                .map(|col| {
                    let parsed = row.get(col).and_then(|cell| cell.parse::<f64>().ok());
                    saw_number |= parsed.is_some();
                    parsed.unwrap_or(0.0)
                })
                .collect();

            let name = format!("Dataset {}", index + 1);
            let color = dataset_color(index);

            let mut dataset = Map::new();
            dataset.insert("label".into(), json!(name));
            dataset.insert("data".into(), json!(values));
            dataset.insert("backgroundColor".into(), json!(color));
            dataset.insert("borderColor".into(), json!(color));
            Value::Object(dataset)
        })
        .collect();

    if !saw_number {
        return None;
    }

    tracing::debug!(
        labels = labels.len(),
        datasets = datasets.len(),
        "CSV payload converted to datasets"
    );
    Some(json!({ "labels": labels, "datasets": datasets }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_payload_passes_through() {
        let payload = json!({"labels": ["a"], "values": [1]});
        assert_eq!(normalize_payload(&payload), Some(payload));
    }

    #[test]
    fn null_and_blank_are_absent() {
        assert_eq!(normalize_payload(&Value::Null), None);
        assert_eq!(normalize_payload(&json!("   ")), None);
    }

    #[test]
    fn json_text_payload_is_parsed() {
        let payload = json!(r#"{"labels": ["a", "b"], "values": [1, 2]}"#);
        let normalized = normalize_payload(&payload).unwrap();
        assert_eq!(normalized["values"], json!([1, 2]));
    }

    #[test]
    fn literal_text_payload_is_parsed() {
        let payload = json!("{labels: ['a', 'b'], values: [1, 2,],}");
        let normalized = normalize_payload(&payload).unwrap();
        assert_eq!(normalized["labels"], json!(["a", "b"]));
    }

    #[test]
    fn bare_point_array_becomes_points() {
        let payload = json!([{"x": 1, "y": 2}, {"x": 3, "y": 4}]);
        let normalized = normalize_payload(&payload).unwrap();
        assert_eq!(normalized["points"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn csv_text_becomes_datasets() {
        let table = "Region,Q1,Q2,Q3\nNorth,10,20,30\nSouth,5,,7\n";
        let normalized = normalize_payload(&json!(table)).unwrap();

        assert_eq!(normalized["labels"], json!(["Q1", "Q2", "Q3"]));
        let datasets = normalized["datasets"].as_array().unwrap();
        assert_eq!(datasets.len(), 2);
        assert_eq!(datasets[0]["label"], "Dataset 1");
        assert_eq!(datasets[1]["label"], "Dataset 2");
        assert_eq!(datasets[0]["data"], json!([10.0, 20.0, 30.0]));
        assert_eq!(datasets[1]["data"], json!([5.0, 0.0, 7.0]));
        assert_eq!(datasets[1]["backgroundColor"], dataset_color(1));
        assert_eq!(datasets[1]["borderColor"], dataset_color(1));
    }

    #[test]
    fn csv_rows_are_padded_to_label_count() {
        let normalized = csv_to_payload(",a,b,c\n,1\n").unwrap();
        assert_eq!(normalized["datasets"][0]["label"], "Dataset 1");
        assert_eq!(normalized["datasets"][0]["data"], json!([1.0, 0.0, 0.0]));
    }

    #[test]
    fn prose_is_not_csv() {
        assert!(csv_to_payload("just some words").is_none());
        assert!(csv_to_payload("one, two\nthree, four").is_none());
        let raw = json!("make it pretty");
        assert_eq!(normalize_payload(&raw), Some(raw));
    }
}
