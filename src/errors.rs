//!
//! src/errors.rs  Andrew Belles  Oct 16th, 2026
//!
//! Defines enums and methods of error conversion
//! for errors the enricher uses
//!
//!

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnricherError {
    #[error("config error: {0}")]
    Config(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("format error: {0}")]
    Format(String),
    #[error("data error: {0}")]
    Data(String),
    #[error("dataset error: {0}")]
    Dataset(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error)
}

impl From<reqwest::Error> for EnricherError {
    fn from(e: reqwest::Error) -> Self {
        // request urls carry the api key in the query string
        let e = e.without_url();
        if e.is_timeout() {
            EnricherError::Transport(format!("timed out: {e}"))
        } else {
            EnricherError::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for EnricherError {
    fn from(e: serde_json::Error) -> Self { EnricherError::Parse(e.to_string()) }
}

impl From<csv::Error> for EnricherError {
    fn from(e: csv::Error) -> Self { EnricherError::Dataset(e.to_string()) }
}
