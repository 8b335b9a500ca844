//!
//! src/dataset.rs  Andrew Belles  Oct 16th, 2026
//!
//! Loads the imdb top 100 table once at startup, either from a url
//! or a local csv, and applies the one-time genre trim
//!

use std::io::Read;

use reqwest::Client;
use tracing::{debug, info};

use crate::config::DatasetSource;
use crate::errors::EnricherError;
use crate::types::MovieRecord;

#[derive(Debug, Clone)]
pub struct Dataset {
    pub columns: Vec<String>,
    pub records: Vec<MovieRecord>,
    /// distinct genres as read, before trimming
    pub raw_genres: Vec<String>
}

impl Dataset {
    pub fn rows(&self) -> usize {
        self.records.len()
    }

    /// distinct genres after trimming, first-appearance order
    pub fn genres(&self) -> Vec<String> {
        distinct(self.records.iter().map(|r| r.genre.as_str()))
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for v in values {
        if !seen.iter().any(|s| s == v) {
            seen.push(v.to_string());
        }
    }
    seen
}

/// Strip surrounding whitespace from every genre, e.g. "Drama      "
pub fn normalize_genres(records: &mut [MovieRecord]) {
    for record in records.iter_mut() {
        let trimmed = record.genre.trim();
        if trimmed.len() != record.genre.len() {
            record.genre = trimmed.to_string();
        }
    }
}

/// Parses csv with a header row. Extra columns are kept in `columns` only
pub fn parse_csv<R: Read>(reader: R) -> Result<Dataset, EnricherError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let columns = csv_reader.headers()?
        .iter()
        .map(str::to_string)
        .collect::<Vec<_>>();

    for required in ["title", "genre", "content_rating", "duration", "star_rating"] {
        if !columns.iter().any(|c| c == required) {
            return Err(EnricherError::Dataset(format!("missing column {required}")));
        }
    }

    let mut records = Vec::new();
    for row in csv_reader.deserialize::<MovieRecord>() {
        records.push(row?);
    }

    let raw_genres = distinct(records.iter().map(|r| r.genre.as_str()));
    normalize_genres(&mut records);

    Ok( Dataset { columns, records, raw_genres } )
}

/// Explicit initialization, called once from main
pub async fn load_dataset(source: &DatasetSource, http: &Client) ->
    Result<Dataset, EnricherError> {

    let dataset = match source {
        DatasetSource::Url(url) => {
            debug!(url = %url, "dataset.fetch");
            let body = http.get(url.clone())
                .send()
                .await?
                .error_for_status()?
                .bytes()
                .await?;
            parse_csv(&body[..])?
        }
        DatasetSource::Path(path) => {
            debug!(path = %path.display(), "dataset.read");
            let file = std::fs::File::open(path)?;
            parse_csv(file)?
        }
    };

    info!(
        source = %source,
        rows = dataset.rows(),
        columns = dataset.columns.len(),
        "dataset.loaded"
    );
    Ok(dataset)
}
