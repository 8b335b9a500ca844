//!
//! src/rating.rs  Andrew Belles  Oct 16th, 2026
//!
//! Pulls the Rotten Tomatoes value out of an OMDb payload and maps
//! the different rating scales onto 0.0..=1.0
//!

use crate::errors::EnricherError;
use crate::types::{OmdbResponse, RatingValue};

pub const ROTTEN_TOMATOES: &str = "Rotten Tomatoes";

/// First Rotten Tomatoes entry wins, no match or no entry is Missing
pub fn rotten_tomatoes(response: &OmdbResponse) -> RatingValue {
    if !response.is_match() {
        return RatingValue::Missing;
    }
    response.ratings.iter()
        .find(|r| r.source == ROTTEN_TOMATOES)
        .map(|r| RatingValue::Percentage(r.value.clone()))
        .unwrap_or(RatingValue::Missing)
}

/// "87%" -> 0.87
pub fn parse_percentage(s: &str) -> Result<f64, EnricherError> {
    let digits = s.trim()
        .strip_suffix('%')
        .ok_or_else(|| EnricherError::Format(format!("no trailing '%': {s:?}")))?
        .trim();
    let value = digits.parse::<u32>()
        .map_err(|e| EnricherError::Format(format!("{s:?}: {e}")))?;
    if value > 100 {
        return Err(EnricherError::Format(format!("{s:?} above 100%")));
    }
    Ok(value as f64 / 100.0)
}

pub fn normalize(value: &RatingValue) -> Result<Option<f64>, EnricherError> {
    match value {
        RatingValue::Percentage(s) => parse_percentage(s).map(Some),
        RatingValue::Decimal(d) => Ok(Some(*d)),
        RatingValue::Missing => Ok(None)
    }
}

/// imdb 0..10 -> 0..1
pub fn imdb_to_decimal(star_rating: f64) -> f64 {
    star_rating / 10.0
}
