//! Fax Intake — Binary Entrypoint
//! Runs one pipeline pass: scan the incoming set, extract and parse each
//! document, route every file to its terminal location, then upload record
//! batches to the ingestion endpoint.

use anyhow::Result;
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use fax_intake::config::PipelineConfig;
use fax_intake::extract::PdfTextExtractor;
use fax_intake::pipeline;
use fax_intake::profile::DirectionProfile;
use fax_intake::upload::HttpRecordSink;

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fax_intake=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    init_tracing();

    // Install the Prometheus recorder up front so run counters register.
    let metrics = PrometheusBuilder::new()
        .install_recorder()
        .expect("prometheus: install recorder");

    let cfg = PipelineConfig::load()?;
    cfg.ensure_dirs()?;
    let profile = DirectionProfile::from_name(&cfg.direction)?;

    let extractor = PdfTextExtractor;
    let sink = HttpRecordSink::new(cfg.endpoint_url.clone());

    let report = pipeline::run_once(&cfg, &profile, &extractor, &sink).await?;

    tracing::info!(
        processed = report.processed_count(),
        failed = report.failed_count(),
        swept = report.swept.len(),
        batches_ok = report.batches.iter().filter(|b| b.ok()).count(),
        batches_failed = report.batches.iter().filter(|b| !b.ok()).count(),
        "fax intake finished"
    );
    tracing::debug!(metrics = %metrics.render(), "run counters");
    Ok(())
}
