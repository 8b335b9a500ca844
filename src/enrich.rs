//!
//! src/enrich.rs  Andrew Belles  Oct 16th, 2026
//!
//! Drives title -> lookup -> extract -> normalize for every record.
//! Lookups fan out under a semaphore, results come back in input order
//! and a failed lookup only costs that record its rating
//!

use std::{sync::Arc, time::{Duration, Instant}};

use serde::Serialize;
use tokio::{sync::Semaphore, task::JoinHandle, time::sleep};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::fetch::RatingSource;
use crate::rating::{normalize, rotten_tomatoes};
use crate::types::{EnrichedRecord, MovieRecord};

#[derive(Debug)]
struct RateGate {
    min_interval: Duration,
    state: tokio::sync::Mutex<Option<Instant>>
}

impl RateGate {
    fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            state: tokio::sync::Mutex::new(None)
        }
    }
    async fn wait(&self) {
        if self.min_interval.is_zero() {
            return;
        }
        let mut last = self.state.lock().await;
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < self.min_interval {
                sleep(self.min_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}

#[derive(Clone, Debug)]
pub struct EnrichLimits {
    pub max_inflight: usize,
    pub min_interval: Duration
}

impl Default for EnrichLimits {
    fn default() -> Self {
        Self {
            max_inflight: crate::config::ENRICH_MAX_INFLIGHT,
            min_interval: Duration::ZERO
        }
    }
}

/// How a single record's lookup ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Matched,
    NoRating,
    Failed,
    Cancelled
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnrichmentStats {
    pub matched: usize,
    pub no_rating: usize,
    pub failed: usize,
    pub cancelled: usize
}

impl EnrichmentStats {
    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Matched   => self.matched += 1,
            Outcome::NoRating  => self.no_rating += 1,
            Outcome::Failed    => self.failed += 1,
            Outcome::Cancelled => self.cancelled += 1
        }
    }
}

#[derive(Debug, Clone)]
pub struct Enrichment {
    pub records: Vec<EnrichedRecord>,
    pub stats: EnrichmentStats
}

pub struct Enricher {
    source: Arc<dyn RatingSource>,
    limits: EnrichLimits,

    // concurrency handlers
    inflight: Arc<Semaphore>,
    rate: Arc<RateGate>,

    // stops pending lookups
    shutdown: CancellationToken
}

impl Enricher {
    pub fn new(source: Arc<dyn RatingSource>, limits: EnrichLimits) -> Self {
        let inflight = Arc::new(Semaphore::new(limits.max_inflight.max(1)));
        let rate     = Arc::new(RateGate::new(limits.min_interval));

        Self {
            source,
            limits,
            inflight,
            rate,
            shutdown: CancellationToken::new()
        }
    }

    pub fn shutdown(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub async fn run(&self, movies: Vec<MovieRecord>) -> Enrichment {
        info!(
            records = movies.len(),
            max_inflight = self.limits.max_inflight,
            "enrich.start"
        );

        let handles: Vec<_> = movies.iter()
            .enumerate()
            .map(|(index, movie)| self.spawn_lookup(index, movie.title.clone()))
            .collect();

        let mut records = Vec::with_capacity(movies.len());
        let mut stats = EnrichmentStats::default();

        // awaiting in spawn order keeps the input ordering
        for (handle, movie) in handles.into_iter().zip(movies) {
            let (outcome, rt_score) = match handle.await {
                Ok(result) => result,
                Err(e) => {
                    warn!(title = %movie.title, error = %e, "enrich.task.join");
                    (Outcome::Failed, None)
                }
            };
            stats.record(outcome);
            records.push(EnrichedRecord::new(movie, rt_score));
        }

        info!(
            matched = stats.matched,
            no_rating = stats.no_rating,
            failed = stats.failed,
            cancelled = stats.cancelled,
            "enrich.done"
        );
        Enrichment { records, stats }
    }

    fn spawn_lookup(&self, index: usize, title: String) ->
        JoinHandle<(Outcome, Option<f64>)> {
        let source   = self.source.clone();
        let inflight = self.inflight.clone();
        let rate     = self.rate.clone();
        let shutdown = self.shutdown.clone();

        tokio::spawn(async move {
            let permit = tokio::select! {
                biased;
                _ = shutdown.cancelled() => None,
                p = inflight.acquire_owned() => p.ok()
            };
            let Some(_permit) = permit else {
                debug!(index, title = %title, "enrich.cancelled");
                return (Outcome::Cancelled, None);
            };

            tokio::select! {
                biased;
                _ = shutdown.cancelled() => {
                    debug!(index, title = %title, "enrich.cancelled");
                    (Outcome::Cancelled, None)
                }
                r = lookup_one(source.as_ref(), &rate, index, &title) => r
            }
        })
    }
}

async fn lookup_one(
    source: &dyn RatingSource,
    rate: &RateGate,
    index: usize,
    title: &str
) -> (Outcome, Option<f64>) {
    rate.wait().await;
    debug!(index, title = %title, "enrich.lookup");

    match source.lookup(title).await {
        Ok(response) => {
            let value = rotten_tomatoes(&response);
            match normalize(&value) {
                Ok(Some(rt)) => (Outcome::Matched, Some(rt)),
                Ok(None) => {
                    debug!(index, title = %title, matched = response.is_match(),
                        "enrich.no_rating");
                    (Outcome::NoRating, None)
                }
                Err(e) => {
                    warn!(index, title = %title, error = %e, "enrich.format");
                    (Outcome::NoRating, None)
                }
            }
        }
        Err(e) => {
            warn!(index, title = %title, error = %e, "enrich.lookup.failed");
            (Outcome::Failed, None)
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use async_trait::async_trait;

    use crate::errors::EnricherError;

    use crate::types::{ExternalRating, OmdbResponse};

    /// Canned answers per title, unknown titles fail like a dropped connection
    pub(crate) struct MockSource {
        pub answers: HashMap<String, OmdbResponse>,
        pub delays: HashMap<String, Duration>,
        pub calls: AtomicUsize,
        pub peak: AtomicUsize,
        active: AtomicUsize
    }

    impl MockSource {
        pub(crate) fn new() -> Self {
            Self {
                answers: HashMap::new(),
                delays: HashMap::new(),
                calls: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
                active: AtomicUsize::new(0)
            }
        }

        pub(crate) fn rt(mut self, title: &str, value: &str) -> Self {
            self.answers.insert(title.to_string(), OmdbResponse {
                response: "True".to_string(),
                ratings: vec![
                    ExternalRating {
                        source: "Internet Movie Database".to_string(),
                        value: "8.0/10".to_string()
                    },
                    ExternalRating {
                        source: "Rotten Tomatoes".to_string(),
                        value: value.to_string()
                    },
                ],
                title: Some(title.to_string()),
                error: None
            });
            self
        }

        pub(crate) fn no_match(mut self, title: &str) -> Self {
            self.answers.insert(title.to_string(), OmdbResponse {
                response: "False".to_string(),
                ratings: Vec::new(),
                title: None,
                error: Some("Movie not found!".to_string())
            });
            self
        }

        pub(crate) fn delay(mut self, title: &str, ms: u64) -> Self {
            self.delays.insert(title.to_string(), Duration::from_millis(ms));
            self
        }
    }

    #[async_trait]
    impl RatingSource for MockSource {
        async fn lookup(&self, title: &str) -> Result<OmdbResponse, EnricherError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);

            if let Some(d) = self.delays.get(title) {
                sleep(*d).await;
            }
            let result = self.answers.get(title).cloned().ok_or_else(||
                EnricherError::Transport(format!("connection reset: {title}"))
            );

            self.active.fetch_sub(1, Ordering::SeqCst);
            result
        }
    }

    pub(crate) fn movie(title: &str, star: f64, content_rating: &str) -> MovieRecord {
        MovieRecord {
            title: title.to_string(),
            genre: "Drama".to_string(),
            content_rating: content_rating.to_string(),
            duration: 100,
            star_rating: star
        }
    }

    fn limits(max_inflight: usize) -> EnrichLimits {
        EnrichLimits { max_inflight, min_interval: Duration::ZERO }
    }

    #[tokio::test]
    async fn failures_are_isolated_per_record() {
        let source = MockSource::new()
            .rt("Toy Story", "100%")
            .no_match("Nope");
        let enricher = Enricher::new(Arc::new(source), limits(2));

        let out = enricher.run(vec![
            movie("Toy Story", 8.3, "G"),
            movie("Nope", 8.0, "R"),
            movie("Broken", 7.9, "R"),
        ]).await;

        assert_eq!(out.records.len(), 3);
        assert_eq!(out.records[0].rt_score, Some(1.0));
        assert_eq!(out.records[1].rt_score, None);
        assert_eq!(out.records[2].rt_score, None);
        assert_eq!(out.stats, EnrichmentStats {
            matched: 1, no_rating: 1, failed: 1, cancelled: 0
        });
    }

    #[tokio::test]
    async fn output_keeps_input_order_regardless_of_completion() {
        let source = MockSource::new()
            .rt("Slow", "10%").delay("Slow", 80)
            .rt("Medium", "20%").delay("Medium", 40)
            .rt("Fast", "30%");
        let enricher = Enricher::new(Arc::new(source), limits(3));

        let out = enricher.run(vec![
            movie("Slow", 8.0, "R"),
            movie("Medium", 8.0, "R"),
            movie("Fast", 8.0, "R"),
        ]).await;

        let titles: Vec<_> = out.records.iter().map(|r| r.movie.title.as_str()).collect();
        assert_eq!(titles, vec!["Slow", "Medium", "Fast"]);
        let scores: Vec<_> = out.records.iter().map(|r| r.rt_score).collect();
        assert_eq!(scores, vec![Some(0.1), Some(0.2), Some(0.3)]);
    }

    #[tokio::test]
    async fn inflight_is_bounded() {
        let mut source = MockSource::new();
        let mut movies = Vec::new();
        for i in 0..8 {
            let title = format!("Movie {i}");
            source = source.rt(&title, "50%").delay(&title, 20);
            movies.push(movie(&title, 7.5, "PG"));
        }
        let source = Arc::new(source);
        let enricher = Enricher::new(source.clone(), limits(2));

        let out = enricher.run(movies).await;
        assert_eq!(out.stats.matched, 8);
        assert_eq!(source.calls.load(Ordering::SeqCst), 8);
        assert!(source.peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn malformed_percentage_becomes_missing() {
        let source = MockSource::new().rt("Odd", "N/A");
        let enricher = Enricher::new(Arc::new(source), limits(1));

        let out = enricher.run(vec![movie("Odd", 8.0, "R")]).await;
        assert_eq!(out.records[0].rt_score, None);
        assert_eq!(out.records[0].ratio, None);
        assert_eq!(out.stats.no_rating, 1);
    }

    #[tokio::test]
    async fn cancelled_run_still_returns_every_record() {
        let source = MockSource::new().rt("A", "80%").rt("B", "70%");
        let enricher = Enricher::new(Arc::new(source), limits(1));
        enricher.shutdown().cancel();

        let out = enricher.run(vec![movie("A", 8.0, "R"), movie("B", 8.0, "R")]).await;
        assert_eq!(out.records.len(), 2);
        assert!(out.records.iter().all(|r| r.rt_score.is_none()));
        assert_eq!(out.stats.cancelled, 2);
    }

    #[tokio::test]
    async fn rate_gate_spaces_requests() {
        let gate = RateGate::new(Duration::from_millis(30));
        let start = Instant::now();
        gate.wait().await;
        gate.wait().await;
        gate.wait().await;
        assert!(start.elapsed() >= Duration::from_millis(60));
    }
}
