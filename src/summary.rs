//!
//! src/summary.rs  Andrew Belles  Oct 16th, 2026
//!
//! Aggregate statistics over the enriched table. Missing scores are
//! dropped before anything is computed
//!

use std::collections::BTreeMap;

use serde::Serialize;

use crate::types::EnrichedRecord;

pub const TOP_N: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FiveNumberSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatioExtreme {
    pub title: String,
    pub ratio: f64
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub scored: usize,
    pub mean_rt: Option<f64>,
    pub five_number: Option<FiveNumberSummary>,
    pub top_titles: Vec<String>,
    pub top_r_titles: Vec<String>,
    pub max_ratio: Option<RatioExtreme>,
    pub min_ratio: Option<RatioExtreme>,
    pub genre_counts: BTreeMap<String, usize>
}

/// Present rt scores, dataset order
pub fn rt_series(records: &[EnrichedRecord]) -> Vec<f64> {
    records.iter().filter_map(|r| r.rt_score).collect()
}

/// Linear interpolation between closest ranks, p in 0..=100
pub fn percentile(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = (p / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

pub fn five_number_summary(values: &[f64]) -> Option<FiveNumberSummary> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    Some(FiveNumberSummary {
        min: *sorted.first()?,
        q1: percentile(&sorted, 25.0)?,
        median: percentile(&sorted, 50.0)?,
        q3: percentile(&sorted, 75.0)?,
        max: *sorted.last()?
    })
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Descending by rt score, missing last, ties keep dataset order
pub fn rank_by_rt(records: &[EnrichedRecord]) -> Vec<&EnrichedRecord> {
    let mut ranked: Vec<&EnrichedRecord> = records.iter().collect();
    ranked.sort_by(|a, b| match (a.rt_score, b.rt_score) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal
    });
    ranked
}

pub fn top_titles<'a, F>(ranked: &[&'a EnrichedRecord], n: usize, keep: F) -> Vec<String>
where
    F: Fn(&EnrichedRecord) -> bool
{
    ranked.iter()
        .filter(|r| keep(r))
        .take(n)
        .map(|r| r.movie.title.clone())
        .collect()
}

/// Largest and smallest star / rt ratio. Records without a defined ratio
/// never take part, first record in ranking order wins a tie
pub fn ratio_extremes(ranked: &[&EnrichedRecord]) ->
    (Option<RatioExtreme>, Option<RatioExtreme>) {
    let mut max: Option<(&EnrichedRecord, f64)> = None;
    let mut min: Option<(&EnrichedRecord, f64)> = None;

    for &record in ranked {
        let Some(ratio) = record.ratio.filter(|r| r.is_finite()) else {
            continue;
        };
        if max.is_none_or(|(_, m)| ratio > m) {
            max = Some((record, ratio));
        }
        if min.is_none_or(|(_, m)| ratio < m) {
            min = Some((record, ratio));
        }
    }

    let to_extreme = |(r, ratio): (&EnrichedRecord, f64)| RatioExtreme {
        title: r.movie.title.clone(),
        ratio
    };
    (max.map(to_extreme), min.map(to_extreme))
}

pub fn genre_counts<'a>(genres: impl Iterator<Item = &'a str>) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for genre in genres {
        *counts.entry(genre.trim().to_string()).or_insert(0) += 1;
    }
    counts
}

pub fn summarize(records: &[EnrichedRecord]) -> Summary {
    let series = rt_series(records);
    let ranked = rank_by_rt(records);
    let (max_ratio, min_ratio) = ratio_extremes(&ranked);

    Summary {
        scored: series.len(),
        mean_rt: mean(&series),
        five_number: five_number_summary(&series),
        top_titles: top_titles(&ranked, TOP_N, |_| true),
        top_r_titles: top_titles(&ranked, TOP_N, |r| r.movie.content_rating == "R"),
        max_ratio,
        min_ratio,
        genre_counts: genre_counts(records.iter().map(|r| r.movie.genre.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MovieRecord;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn record(title: &str, star: f64, rt: Option<f64>, content_rating: &str) -> EnrichedRecord {
        EnrichedRecord::new(MovieRecord {
            title: title.to_string(),
            genre: "Drama".to_string(),
            content_rating: content_rating.to_string(),
            duration: 110,
            star_rating: star
        }, rt)
    }

    #[test]
    fn five_number_of_simple_series() {
        let s = five_number_summary(&[0.1, 0.2, 0.3, 0.4, 0.5]).unwrap();
        assert!(close(s.min, 0.1));
        assert!(close(s.q1, 0.2));
        assert!(close(s.median, 0.3));
        assert!(close(s.q3, 0.4));
        assert!(close(s.max, 0.5));
    }

    #[test]
    fn five_number_interpolates_and_ignores_order() {
        let s = five_number_summary(&[0.4, 0.1, 0.3, 0.2]).unwrap();
        assert!(close(s.q1, 0.175));
        assert!(close(s.median, 0.25));
        assert!(close(s.q3, 0.325));
    }

    #[test]
    fn missing_values_excluded_before_summary() {
        let records = vec![
            record("a", 8.0, Some(0.1), "R"),
            record("b", 8.0, None, "R"),
            record("c", 8.0, Some(0.2), "R"),
            record("d", 8.0, Some(0.3), "R"),
            record("e", 8.0, None, "R"),
            record("f", 8.0, Some(0.4), "R"),
            record("g", 8.0, Some(0.5), "R"),
        ];
        let s = summarize(&records);
        assert_eq!(s.scored, 5);
        let f = s.five_number.unwrap();
        assert!(close(f.min, 0.1) && close(f.median, 0.3) && close(f.max, 0.5));
        assert!(close(s.mean_rt.unwrap(), 0.3));
    }

    #[test]
    fn empty_series_has_no_summary() {
        assert_eq!(five_number_summary(&[]), None);
        assert_eq!(mean(&[]), None);
        let s = summarize(&[record("a", 8.0, None, "R")]);
        assert_eq!(s.five_number, None);
        assert_eq!(s.max_ratio, None);
        assert_eq!(s.min_ratio, None);
    }

    #[test]
    fn ranking_puts_missing_last_and_filters_r() {
        let records = vec![
            record("Toy Story", 8.3, Some(1.0), "G"),
            record("Unknown", 8.0, None, "R"),
            record("Fight Club", 8.9, Some(0.79), "R"),
            record("Se7en", 8.6, Some(0.81), "R"),
            record("Up", 8.3, Some(0.98), "PG"),
        ];
        let ranked = rank_by_rt(&records);
        let titles: Vec<_> = ranked.iter().map(|r| r.movie.title.as_str()).collect();
        assert_eq!(titles, vec!["Toy Story", "Up", "Se7en", "Fight Club", "Unknown"]);

        assert_eq!(top_titles(&ranked, 2, |_| true), vec!["Toy Story", "Up"]);
        assert_eq!(
            top_titles(&ranked, 5, |r| r.movie.content_rating == "R"),
            vec!["Se7en", "Fight Club", "Unknown"]
        );
    }

    #[test]
    fn ratio_extremes_skip_zero_and_missing() {
        let records = vec![
            record("zero", 5.0, Some(0.0), "R"),
            record("missing", 9.0, None, "R"),
            record("high", 9.0, Some(0.5), "R"),
            record("low", 6.0, Some(1.0), "R"),
        ];
        let ranked = rank_by_rt(&records);
        let (max, min) = ratio_extremes(&ranked);
        let max = max.unwrap();
        let min = min.unwrap();
        assert_eq!(max.title, "high");
        assert!(close(max.ratio, 1.8));
        assert_eq!(min.title, "low");
        assert!(close(min.ratio, 0.6));
    }

    #[test]
    fn lone_zero_score_never_selected() {
        let records = vec![record("zero", 5.0, Some(0.0), "R")];
        let (max, min) = ratio_extremes(&rank_by_rt(&records));
        assert!(max.is_none());
        assert!(min.is_none());
    }

    #[test]
    fn genres_group_after_trim() {
        let counts = genre_counts([" Drama", "Drama ", "Comedy"].into_iter());
        assert_eq!(counts.len(), 2);
        assert_eq!(counts["Drama"], 2);
        assert_eq!(counts["Comedy"], 1);
    }
}
