//! Terminal fallback: fabricate a plausible chart from keywords alone.
//!
//! Always succeeds. Values are random draws; pass a seed to make the draws
//! repeat across calls.

use std::ops::Range;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::classify::{guess_labels, guess_value_range};
use super::styling::{style_category_dataset, style_point_dataset};
use super::types::ChartRequest;
use crate::models::{ChartSpecification, Dataset, DisplayOptions, Point, SeriesValues};

/// Number of random points in a synthesized scatter chart.
pub const SCATTER_POINT_COUNT: usize = 10;

/// Coordinate range for synthesized scatter points.
const POINT_RANGE: Range<i64> = 0..100;

#[derive(Debug, Clone, Default)]
pub struct HeuristicFallback {
    seed: Option<u64>,
}

impl HeuristicFallback {
    pub fn new() -> Self {
        Self { seed: None }
    }

    /// Fallback whose random draws are identical on every call.
    pub fn seeded(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }

    pub fn generate(&self, request: &ChartRequest) -> ChartSpecification {
        match self.seed {
            Some(seed) => self.generate_with(request, &mut StdRng::seed_from_u64(seed)),
            None => self.generate_with(request, &mut rand::thread_rng()),
        }
    }

    pub fn generate_with<R: Rng>(&self, request: &ChartRequest, rng: &mut R) -> ChartSpecification {
        let kind = request.kind_hint;
        let display_options = DisplayOptions::titled(request.text.clone());

        if kind.uses_points() {
            let mut dataset = Dataset::new(
                "Scatter Data",
                SeriesValues::Points(synthetic_points(SCATTER_POINT_COUNT, rng)),
            );
            style_point_dataset(&mut dataset);
            return ChartSpecification {
                kind,
                series: vec![dataset],
                labels: None,
                display_options,
            };
        }

        let labels = guess_labels(&request.text);
        let values = synthetic_values(labels.len(), guess_value_range(&request.text), rng);
        let mut dataset = Dataset::new("Data", SeriesValues::Numbers(values));
        style_category_dataset(&mut dataset, kind);

        ChartSpecification {
            kind,
            series: vec![dataset],
            labels: Some(labels),
            display_options,
        }
    }
}

/// `count` independent integer draws from `range`.
pub fn synthetic_values<R: Rng>(count: usize, range: Range<i64>, rng: &mut R) -> Vec<f64> {
    (0..count)
        .map(|_| rng.gen_range(range.clone()) as f64)
        .collect()
}

/// `count` points with integer coordinates in [0, 100).
pub fn synthetic_points<R: Rng>(count: usize, rng: &mut R) -> Vec<Point> {
    (0..count)
        .map(|_| Point {
            x: rng.gen_range(POINT_RANGE) as f64,
            y: rng.gen_range(POINT_RANGE) as f64,
        })
        .collect()
}
