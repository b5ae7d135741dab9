use std::ops::Range;

use crate::models::ChartKind;

/// Guess the chart kind from request text by keyword.
///
/// Keywords are checked in a fixed priority order and the first hit wins,
/// so "bar and line" is a bar chart. No keyword means bar.
pub fn guess_chart_kind(text: &str) -> ChartKind {
    let lower = text.to_lowercase();

    const PRIORITY: [(&str, ChartKind); 4] = [
        ("bar", ChartKind::Bar),
        ("line", ChartKind::Line),
        ("pie", ChartKind::Pie),
        ("scatter", ChartKind::Scatter),
    ];

    PRIORITY
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, kind)| *kind)
        .unwrap_or(ChartKind::Bar)
}

/// Guess category labels from request text by keyword.
pub fn guess_labels(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();

    let labels: &[&str] = if lower.contains("month") {
        &[
            "January", "February", "March", "April", "May", "June", "July", "August",
            "September", "October", "November", "December",
        ]
    } else if lower.contains("week") {
        &["Week 1", "Week 2", "Week 3", "Week 4"]
    } else if lower.contains("day") {
        &["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"]
    } else if lower.contains("demographic") {
        &["18-24", "25-34", "35-44", "45-54", "55+"]
    } else if lower.contains("traffic") {
        &["Jan", "Feb", "Mar", "Apr", "May", "Jun"]
    } else {
        &["A", "B", "C", "D"]
    };

    labels.iter().map(|l| l.to_string()).collect()
}

/// Half-open range synthetic values are drawn from, keyed by request topic.
pub fn guess_value_range(text: &str) -> Range<i64> {
    let lower = text.to_lowercase();

    if lower.contains("sales") {
        1000..3000
    } else if lower.contains("traffic") {
        5000..15000
    } else if lower.contains("demographic") {
        100..1100
    } else {
        10..110
    }
}

/// Map a chart type name proposed by the generative service onto the closed
/// kind set. Unknown names are rejected rather than passed through.
pub fn classify_kind_name(name: &str) -> Option<ChartKind> {
    let normalized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .collect();

    match normalized.as_str() {
        "bar" | "column" | "horizontalbar" | "barchart" => Some(ChartKind::Bar),
        "line" | "area" | "linechart" => Some(ChartKind::Line),
        "pie" | "piechart" => Some(ChartKind::Pie),
        "doughnut" | "donut" => Some(ChartKind::Doughnut),
        "polararea" | "polar" => Some(ChartKind::PolarArea),
        "radar" | "spider" => Some(ChartKind::Radar),
        "scatter" | "scatterplot" | "scatterchart" => Some(ChartKind::Scatter),
        _ => None,
    }
}
