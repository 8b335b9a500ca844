use serde::{Deserialize, Serialize};

use crate::errors::EnricherError;
use crate::rating::{imdb_to_decimal, normalize};

/// One row of the imdb top 100 table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub title: String,
    pub genre: String,
    pub content_rating: String,
    pub duration: u32,      // minutes
    pub star_rating: f64    // imdb 0..10
}

/// Rating as it arrives from a source, before normalization
#[derive(Debug, Clone, PartialEq)]
pub enum RatingValue {
    Percentage(String),
    Decimal(f64),
    Missing
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalRating {
    #[serde(rename = "Source")]
    pub source: String,
    #[serde(rename = "Value")]
    pub value: String
}

/// Subset of the OMDb title lookup payload we care about
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OmdbResponse {
    #[serde(rename = "Response")]
    pub response: String,
    #[serde(rename = "Ratings", default)]
    pub ratings: Vec<ExternalRating>,
    #[serde(rename = "Title", default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "Error", default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>
}

impl OmdbResponse {
    pub fn is_match(&self) -> bool {
        self.response == "True"
    }
}

/// star / rt, undefined when rt is missing or zero
pub fn compute_ratio(star_decimal: f64, rt_score: Option<f64>) ->
    Result<f64, EnricherError> {
    match rt_score {
        None => Err(EnricherError::Data("ratio over missing rt_score".to_string())),
        Some(rt) if rt == 0.0 => Err(
            EnricherError::Data("ratio over zero rt_score".to_string())
        ),
        Some(rt) => Ok(star_decimal / rt)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedRecord {
    #[serde(flatten)]
    pub movie: MovieRecord,
    pub rt_score: Option<f64>,
    pub star_decimal: f64,
    pub ratio: Option<f64>
}

impl EnrichedRecord {
    pub fn new(movie: MovieRecord, rt_score: Option<f64>) -> Self {
        // a Decimal always normalizes to Some
        let star = RatingValue::Decimal(imdb_to_decimal(movie.star_rating));
        let star_decimal = normalize(&star).ok().flatten().unwrap_or_default();
        let ratio = compute_ratio(star_decimal, rt_score).ok();
        Self { movie, rt_score, star_decimal, ratio }
    }
}
