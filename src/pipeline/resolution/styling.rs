use crate::models::{ChartKind, ColorSpec, Dataset};

/// Per-category palette for segmented charts, cycled when categories outnumber it.
pub const PALETTE: [&str; 7] = [
    "#36a2eb", "#ff6384", "#ffcd56", "#4bc0c0", "#9966ff", "#ff9f40", "#c9cbcf",
];

/// Single fill colour for non-segmented charts.
pub const PRIMARY_COLOR: &str = PALETTE[0];

/// Per-dataset colours for multi-series uploads.
pub const DATASET_COLORS: [&str; 15] = [
    "#6366f1", "#f59e0b", "#10b981", "#ef4444", "#3b82f6", "#ec4899", "#14b8a6", "#f97316",
    "#8b5cf6", "#22c55e", "#d946ef", "#06b6d4", "#f43f5e", "#84cc16", "#7c3aed",
];

pub fn dataset_color(index: usize) -> &'static str {
    DATASET_COLORS[index % DATASET_COLORS.len()]
}

pub fn palette_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

/// One palette colour per category, wrapping after the last entry.
pub fn palette_cycle(count: usize) -> Vec<String> {
    (0..count).map(|i| palette_color(i).to_string()).collect()
}

/// Apply the synthesized-dataset colouring rules for `kind`.
///
/// Segmented kinds get one colour per value; everything else one scalar
/// colour. Line charts also get a matching stroke and a filled area.
pub fn style_category_dataset(dataset: &mut Dataset, kind: ChartKind) {
    dataset.fill_color = Some(if kind.is_segmented() {
        ColorSpec::PerValue(palette_cycle(dataset.values.len()))
    } else {
        ColorSpec::Single(PRIMARY_COLOR.to_string())
    });

    if kind == ChartKind::Line {
        dataset.stroke_color = Some(ColorSpec::Single(PRIMARY_COLOR.to_string()));
        dataset.fill_area = Some(true);
    } else {
        dataset.stroke_color = None;
        dataset.fill_area = Some(false);
    }
}

/// Point datasets carry a single fill colour and nothing else.
pub fn style_point_dataset(dataset: &mut Dataset) {
    dataset.fill_color = Some(ColorSpec::Single(PRIMARY_COLOR.to_string()));
    dataset.stroke_color = None;
    dataset.fill_area = None;
}
