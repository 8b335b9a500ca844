//!
//! src/main.rs  Andrew Belles  Oct 16th, 2026
//!
//! Main source file of the rotten tomatoes enricher, wires config,
//! logging, the dataset load, the lookups and the final report
//!
//!


mod config;
mod errors;
mod logging;

mod types;
mod title;
mod rating;
mod fetch;
mod dataset;
mod enrich;
mod summary;
mod series;
mod sink;
mod report;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::dataset::Dataset;
use crate::enrich::{EnrichLimits, Enricher, Enrichment};
use crate::errors::EnricherError;
use crate::fetch::RatingSource;
use crate::series::PlotSeries;
use crate::sink::{ArtifactKind, JsonSink};
use crate::summary::Summary;

pub struct Analysis {
    pub enrichment: Enrichment,
    pub summary: Summary,
    pub series: PlotSeries
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Interrupt {
    CancelLookups,
    Exit
}

/// First ctrl-c while lookups are pending cancels them, any later one
/// (or one after enrichment finished) ends the process. tokio keeps its
/// handler installed once registered, so a default SIGINT never comes back
fn on_interrupt(shutdown: &CancellationToken, finished: &CancellationToken) -> Interrupt {
    if finished.is_cancelled() || shutdown.is_cancelled() {
        Interrupt::Exit
    } else {
        shutdown.cancel();
        Interrupt::CancelLookups
    }
}

/// Enrich every record then compute the statistics and plot series
pub async fn analyze(
    dataset: &Dataset,
    source: Arc<dyn RatingSource>,
    limits: EnrichLimits
) -> Analysis {
    let enricher = Enricher::new(source, limits);

    let shutdown = enricher.shutdown();
    let finished = CancellationToken::new();
    let done = finished.clone();
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            match on_interrupt(&shutdown, &done) {
                Interrupt::CancelLookups => {
                    warn!(msg = "cancelling pending lookups", "enrich.signal");
                }
                Interrupt::Exit => {
                    warn!(msg = "interrupted", "enrich.signal.exit");
                    std::process::exit(130);
                }
            }
        }
    });

    let enrichment = enricher.run(dataset.records.clone()).await;
    finished.cancel();

    let summary = summary::summarize(&enrichment.records);
    let series  = series::plot_series(&enrichment.records);
    Analysis { enrichment, summary, series }
}

fn write_artifacts(root: &std::path::Path, analysis: &Analysis) -> Result<(), EnricherError> {
    let sink = JsonSink::new(root);
    let key = "imdb_100";

    let enriched = sink.write_json(
        ArtifactKind::EnrichedDataset, key, &analysis.enrichment.records
    )?;
    let summary = sink.write_json(ArtifactKind::Summary, key, &analysis.summary)?;
    let series  = sink.write_json(ArtifactKind::PlotSeries, key, &analysis.series)?;

    info!(
        enriched = %enriched.display(),
        summary = %summary.display(),
        series = %series.display(),
        "artifacts.written"
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), EnricherError> {
    let cfgs = match config::load_config() {
        Ok(cfgs) => cfgs,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };
    let _guard = logging::init_logging(&cfgs.logging)?;

    tracing::info!(
        service="rt-enricher",
        version=%env!("CARGO_PKG_VERSION"),
        config=?cfgs,
        "starting"
    );

    let http    = fetch::base_client(&cfgs.http)?;
    let dataset = dataset::load_dataset(&cfgs.dataset.source, &http).await?;

    let omdb: Arc<dyn RatingSource> = Arc::new(
        fetch::OmdbClient::new(&cfgs.http, &cfgs.omdb)?
    );
    let limits = EnrichLimits {
        max_inflight: cfgs.concurrency.max_inflight,
        min_interval: cfgs.omdb.min_interval
    };

    let analysis = analyze(&dataset, omdb, limits).await;
    println!("{}", report::render(&dataset, &analysis.summary, &analysis.enrichment.stats));

    if let Some(root) = cfgs.output.artifact_root.as_deref() {
        write_artifacts(root, &analysis)?;
    }

    info!("done");
    Ok(())
}
