//!
//! src/report.rs  Andrew Belles  Oct 16th, 2026
//!
//! Human readable summary printed to stdout at the end of a run
//!

use std::fmt;

use crate::dataset::Dataset;
use crate::enrich::EnrichmentStats;
use crate::summary::{RatioExtreme, Summary};

fn fmt_opt(v: Option<f64>) -> String {
    v.map(|x| format!("{x:.4}")).unwrap_or_else(|| "n/a".to_string())
}

fn fmt_extreme(e: &Option<RatioExtreme>) -> String {
    match e {
        Some(e) => format!("{} ({:.4})", e.title, e.ratio),
        None => "n/a".to_string()
    }
}

pub struct Report<'a> {
    pub dataset: &'a Dataset,
    pub summary: &'a Summary,
    pub stats: &'a EnrichmentStats
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Report { dataset, summary, stats } = self;
        let genres = dataset.genres();

        writeln!(f, "Rows: {}", dataset.rows())?;
        writeln!(f, "Columns: {}", dataset.columns.len())?;
        writeln!(f, "Column names: {}", dataset.columns.join(", "))?;
        writeln!(f, "Genres (raw): {:?}", dataset.raw_genres)?;
        writeln!(f, "Genres: {:?}", genres)?;
        writeln!(f, "Number of genres: {}", genres.len())?;
        writeln!(f, "Titles by genre:")?;
        for (genre, count) in &summary.genre_counts {
            writeln!(f, "  {genre:<12} {count}")?;
        }

        writeln!(
            f,
            "Lookups: {} matched, {} without rating, {} failed, {} cancelled",
            stats.matched, stats.no_rating, stats.failed, stats.cancelled
        )?;

        writeln!(f, "Top {} by Rotten Tomatoes score:", summary.top_titles.len())?;
        for title in &summary.top_titles {
            writeln!(f, "  {title}")?;
        }
        writeln!(f, "Top {} R rated:", summary.top_r_titles.len())?;
        for title in &summary.top_r_titles {
            writeln!(f, "  {title}")?;
        }

        writeln!(f, "Avg. Rotten Tomatoes Score: {}", fmt_opt(summary.mean_rt))?;
        match &summary.five_number {
            Some(n) => {
                writeln!(f, "min: {:.4}", n.min)?;
                writeln!(f, "1st Qrt: {:.4}", n.q1)?;
                writeln!(f, "2nd Qrt: {:.4}", n.median)?;
                writeln!(f, "3rd Qrt: {:.4}", n.q3)?;
                writeln!(f, "max: {:.4}", n.max)?;
            }
            None => writeln!(f, "five number summary: n/a (no scores)")?
        }

        writeln!(f, "Highest IMDB / RT ratio: {}", fmt_extreme(&summary.max_ratio))?;
        write!(f, "Lowest IMDB / RT ratio: {}", fmt_extreme(&summary.min_ratio))
    }
}

pub fn render(dataset: &Dataset, summary: &Summary, stats: &EnrichmentStats) -> String {
    Report { dataset, summary, stats }.to_string()
}
