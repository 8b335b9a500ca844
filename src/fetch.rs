//!
//! src/fetch.rs  Andrew Belles  Oct 16th, 2026
//!
//! Defines the OMDb client and the RatingSource seam the enricher
//! pulls ratings through. No retries, failures go back to the caller
//!

use async_trait::async_trait;
use reqwest::{Client, header, redirect, RequestBuilder};
use url::Url;

use crate::config::{HttpConfig, OmdbConfig};
use crate::types::OmdbResponse;
use crate::EnricherError;

/// Client building functionality
fn client_helper(http: &HttpConfig) -> reqwest::ClientBuilder {
    Client::builder()
        .timeout(http.timeout)
        .connect_timeout(http.connect_timeout)
        .pool_max_idle_per_host(http.pool_max_idle_per_host)
        .pool_idle_timeout(Some(http.pool_idle_timeout))
        .redirect(redirect::Policy::limited(http.max_redirects as usize))
}

fn client_with_headers(http: &HttpConfig, headers: header::HeaderMap) ->
    Result<Client, EnricherError> {
    client_helper(http)
        .default_headers(headers)
        .build()
        .map_err(|e| EnricherError::Transport(format!("build client: {e}")))
}

pub fn base_client(http: &HttpConfig) -> Result<Client, EnricherError> {
    let mut h = header::HeaderMap::new();
    h.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));
    client_with_headers(http, h)
}

/// Anything that can answer a title lookup with an OMDb shaped payload
#[async_trait]
pub trait RatingSource: Send + Sync {
    async fn lookup(&self, title: &str) -> Result<OmdbResponse, EnricherError>;
}

#[derive(Clone, Debug)]
pub struct OmdbClient {
    pub http: Client,
    pub cfg: OmdbConfig
}

impl OmdbClient {
    pub fn new(http_config: &HttpConfig, cfg: &OmdbConfig) ->
        Result<Self, EnricherError> {

        let http = base_client(http_config)?;
        Ok( Self {
            http,
            cfg: cfg.clone()
        })
    }

    /// {base}?apikey=...&t=...  title is already formatted, not escaped
    pub fn title_url(&self, formatted_title: &str) -> String {
        format!(
            "{}?apikey={}&t={}",
            self.cfg.base_url, self.cfg.api_key, formatted_title
        )
    }

    /// GET /?apikey=...&t=...
    pub fn by_title(&self, formatted_title: &str) -> Result<RequestBuilder, EnricherError> {
        let url = Url::parse(&self.title_url(formatted_title))
            .map_err(|e| EnricherError::Transport(
                format!("invalid request url for {formatted_title:?}: {e}")
            ))?;
        Ok(self.http.get(url))
    }
}

#[async_trait]
impl RatingSource for OmdbClient {
    async fn lookup(&self, title: &str) -> Result<OmdbResponse, EnricherError> {
        let formatted = crate::title::format_title(title);
        let response = self.by_title(&formatted)?
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        let parsed = serde_json::from_str::<OmdbResponse>(&body)
            .map_err(|e| EnricherError::Parse(format!("omdb body for {title:?}: {e}")))?;
        Ok(parsed)
    }
}
