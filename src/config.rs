use url::Url;
use std::path::PathBuf;
use std::time;
use crate::EnricherError;

/// Constants for HTTP Config
pub const HTTP_TIMEOUT: u64 = 5000;
pub const HTTP_CONNECT_TIMEOUT: u64 = 2000;
pub const HTTP_POOL_MAX_IDLE: usize = 8;
pub const HTTP_POOL_IDLE_TIMEOUT: u64 = 90000;
pub const HTTP_MAX_REDIRECTS: u8 = 4;

pub const OMDB_BASE_URL: &str = "http://www.omdbapi.com/";
pub const DATASET_URL: &str =
    "https://raw.githubusercontent.com/whsky/imdb_100/master/data/imdb_100.csv";

pub const ENRICH_MAX_INFLIGHT: usize = 4;
pub const OMDB_MIN_INTERVAL: u64 = 0;

/// Wrapper over an env lookup to return an invalid enviroment var error
fn env_check<F>(env: &F, s: &str) -> Result<String, EnricherError>
where
    F: Fn(&str) -> Option<String>
{
    match env(s) {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(EnricherError::Config(format!("{s} was not set"))),
    }
}

/// Unset falls back to default, set but unparsable is an error
fn env_parse<F, T>(env: &F, s: &str, default: T) -> Result<T, EnricherError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr
{
    match env(s) {
        Some(v) if !v.trim().is_empty() => v.trim().parse::<T>()
            .map_err(|_| EnricherError::Config(format!("{s} invalid: {v}"))),
        _ => Ok(default)
    }
}

/// Ensures that url is http(s)
fn ensure_http(url: &Url) -> Result<(), String> {
    match url.scheme() {
        "http" | "https" => Ok(()),
        _ => Err(format!("URL must be http or https: {url}"))
    }
}

fn ensure_trailing_slash(url: &mut Url) {
    if !url.path().ends_with('/') {
        let mut path = url.path().to_string();
        path.push('/');
        url.set_path(&path);
    }
}

///
/// Configuration for the OMDb api
///
#[derive(Clone)]
pub struct OmdbConfig {
    pub api_key: String,
    pub base_url: Url,
    pub min_interval: time::Duration
}

// keep the key out of `Configuration: {:#?}` dumps
impl std::fmt::Debug for OmdbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OmdbConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url.as_str())
            .field("min_interval", &self.min_interval)
            .finish()
    }
}

fn build_omdb<F>(env: &F) -> Result<OmdbConfig, EnricherError>
where
    F: Fn(&str) -> Option<String>
{
    let api_key = env_check(env, "OMDB_KEY")?;

    let base_url = env("OMDB_BASE_URL")
        .unwrap_or_else(|| OMDB_BASE_URL.to_string());
    let mut base_url = Url::parse(&base_url)
        .map_err(|e| EnricherError::Config(
            format!("OMDB_BASE_URL invalid {e}")
        ))?;

    ensure_http(&base_url).map_err(EnricherError::Config)?;
    ensure_trailing_slash(&mut base_url);

    let min_interval = time::Duration::from_millis(
        env_parse(env, "OMDB_MIN_INTERVAL_MS", OMDB_MIN_INTERVAL)?
    );

    Ok( OmdbConfig { api_key, base_url, min_interval } )
}

///
/// Configuration for Http timeouts, pools, etc.
///
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub timeout: time::Duration,
    pub connect_timeout: time::Duration,
    pub pool_max_idle_per_host: usize,
    pub pool_idle_timeout: time::Duration,
    pub max_redirects: u8
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: time::Duration::from_millis(HTTP_TIMEOUT),
            connect_timeout: time::Duration::from_millis(HTTP_CONNECT_TIMEOUT),
            pool_max_idle_per_host: HTTP_POOL_MAX_IDLE,
            pool_idle_timeout: time::Duration::from_millis(HTTP_POOL_IDLE_TIMEOUT),
            max_redirects: HTTP_MAX_REDIRECTS
        }
    }
}

///
/// Where the movie table is read from
///
#[derive(Debug, Clone, PartialEq)]
pub enum DatasetSource {
    Url(Url),
    Path(PathBuf)
}

impl DatasetSource {
    /// http(s) strings are urls, anything else is a local path
    pub fn parse(s: &str) -> Result<Self, EnricherError> {
        let s = s.trim();
        if s.starts_with("http://") || s.starts_with("https://") {
            let url = Url::parse(s).map_err(|e| EnricherError::Config(
                format!("DATASET_SOURCE invalid {e}")
            ))?;
            Ok(DatasetSource::Url(url))
        } else {
            Ok(DatasetSource::Path(PathBuf::from(s)))
        }
    }
}

impl std::fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetSource::Url(url) => write!(f, "{url}"),
            DatasetSource::Path(path) => write!(f, "{}", path.display())
        }
    }
}

#[derive(Debug, Clone)]
pub struct DatasetConfig {
    pub source: DatasetSource
}

fn build_dataset<F>(env: &F) -> Result<DatasetConfig, EnricherError>
where
    F: Fn(&str) -> Option<String>
{
    let source = env("DATASET_SOURCE")
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DATASET_URL.to_string());
    Ok( DatasetConfig { source: DatasetSource::parse(&source)? } )
}

///
/// Bounds on the lookup fan-out. max_inflight of 1 is fully sequential
///
#[derive(Debug, Clone)]
pub struct ConcurrencyConfig {
    pub max_inflight: usize
}

impl Default for ConcurrencyConfig {
    fn default() -> Self {
        Self { max_inflight: ENRICH_MAX_INFLIGHT }
    }
}

fn build_concurrency<F>(env: &F) -> Result<ConcurrencyConfig, EnricherError>
where
    F: Fn(&str) -> Option<String>
{
    let max_inflight = env_parse(env, "ENRICH_MAX_INFLIGHT", ENRICH_MAX_INFLIGHT)?;
    if max_inflight == 0 {
        return Err(EnricherError::Config(
            "ENRICH_MAX_INFLIGHT must be at least 1".to_string()
        ));
    }
    Ok( ConcurrencyConfig { max_inflight } )
}

#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    pub artifact_root: Option<PathBuf>
}

fn build_output<F>(env: &F) -> OutputConfig
where
    F: Fn(&str) -> Option<String>
{
    OutputConfig {
        artifact_root: env("ENRICH_OUTPUT_DIR")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
    }
}

///
/// Configuration for Logger
///

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub filter_directives: String,
    pub format: LogFormat,
    pub with_ansi: bool,
    pub include_file_line: bool,
    pub include_target: bool
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter_directives: "info,rt_enricher=debug,reqwest=warn".to_string(),
            format: LogFormat::Json,
            with_ansi: false,
            include_file_line: true,
            include_target: true
        }
    }
}

fn build_logging<F>(env: &F) -> Result<LoggingConfig, EnricherError>
where
    F: Fn(&str) -> Option<String>
{
    let format = match env("LOG_FORMAT").as_deref().map(str::trim) {
        None | Some("") | Some("json") => LogFormat::Json,
        Some("pretty") => LogFormat::Pretty,
        Some(other) => return Err(EnricherError::Config(
            format!("LOG_FORMAT invalid: {other}")
        ))
    };
    let with_ansi = format == LogFormat::Pretty;
    Ok( LoggingConfig { format, with_ansi, ..LoggingConfig::default() } )
}

///
/// AppConfig which holds everything the pipeline needs
///
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub omdb: OmdbConfig,
    pub http: HttpConfig,
    pub dataset: DatasetConfig,
    pub concurrency: ConcurrencyConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig
}

///
/// Return all environment variables to caller at program start.
///
pub fn load_config() -> Result<AppConfig, EnricherError> {
    dotenvy::dotenv().ok();
    load_config_from(|k| std::env::var(k).ok())
}

pub fn load_config_from<F>(env: F) -> Result<AppConfig, EnricherError>
where
    F: Fn(&str) -> Option<String>
{
    let omdb        = build_omdb(&env)?;
    let http        = HttpConfig::default();
    let dataset     = build_dataset(&env)?;
    let concurrency = build_concurrency(&env)?;
    let output      = build_output(&env);
    let logging     = build_logging(&env)?;

    Ok( AppConfig { omdb, http, dataset, concurrency, output, logging } )
}
