//!
//! src/series.rs  Andrew Belles  Oct 16th, 2026
//!
//! Numeric series behind the two regression plots, the genre bar
//! chart and the rt score histogram. Rendering lives elsewhere
//!

use std::collections::BTreeMap;

use serde::Serialize;

use crate::summary::{genre_counts, rt_series};
use crate::types::EnrichedRecord;

pub const HISTOGRAM_BINS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotSeries {
    pub rt_vs_star: Vec<(f64, f64)>,
    pub duration_vs_star: Vec<(u32, f64)>,
    pub genre_counts: BTreeMap<String, usize>,
    pub rt_histogram: Vec<HistogramBin>
}

/// Equal width bins over [min, max], right edge of the last bin closed.
/// A single distinct value is widened to [v - 0.5, v + 0.5]
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }

    let mut lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }

    let width = (hi - lo) / bins as f64;
    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lower: lo + width * i as f64,
            upper: if i + 1 == bins { hi } else { lo + width * (i + 1) as f64 },
            count: 0
        })
        .collect();

    for v in values {
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        out[idx].count += 1;
    }
    out
}

pub fn plot_series(records: &[EnrichedRecord]) -> PlotSeries {
    PlotSeries {
        rt_vs_star: records.iter()
            .filter_map(|r| r.rt_score.map(|rt| (rt, r.star_decimal)))
            .collect(),
        duration_vs_star: records.iter()
            .map(|r| (r.movie.duration, r.star_decimal))
            .collect(),
        genre_counts: genre_counts(records.iter().map(|r| r.movie.genre.as_str())),
        rt_histogram: histogram(&rt_series(records), HISTOGRAM_BINS)
    }
}
