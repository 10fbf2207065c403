mod color;
mod config;
mod data;
mod output;
mod report;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use tracing::{debug, error, info};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

use crate::data::filter::TaxonMatcher;
use crate::data::loader;

fn main() {
    if let Err(err) = setup_logging() {
        eprintln!("failed to start: {err:?}");
        std::process::exit(1);
    }
    if let Err(err) = run() {
        // Outer tier: everything except the visualizers lands here.
        error!("an error occurred: {err:?}");
        std::process::exit(1);
    }
}

/// Log file at DEBUG plus console echo at INFO. The log lives under
/// `data/`, so both directories are created first.
fn setup_logging() -> Result<()> {
    fs::create_dir_all(config::DATA_DIR).context("creating data directory")?;
    fs::create_dir_all(config::OUTPUT_DIR).context("creating outputs directory")?;

    let stamp = Local::now().format("%Y%m%d_%H%M%S");
    let log_path = format!("{}/{}_{stamp}.log", config::DATA_DIR, config::LOG_PREFIX);
    let log_file =
        fs::File::create(&log_path).with_context(|| format!("creating log file {log_path}"))?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::sync::Arc::new(log_file))
                .with_ansi(false)
                .with_filter(LevelFilter::DEBUG),
        )
        .with(
            fmt::layer()
                .with_writer(std::io::stdout)
                .with_filter(LevelFilter::INFO),
        )
        .init();
    Ok(())
}

fn run() -> Result<()> {
    debug!("attempting to read CSV file");
    let table = loader::load_occurrences(Path::new(config::INPUT_CSV))?;
    info!("successfully loaded CSV with {} records", table.len());

    let query = config::TaxonQuery::tyrannosaurus_rex();
    let matcher = TaxonMatcher::compile(&query)?;

    report::log_column_summaries(&table, &matcher);

    let mask = matcher.match_mask(&table);
    let matched = table.retain_rows(&mask);
    report::log_record_details(&matched, matcher.label());

    if !matched.is_empty() {
        info!("creating visualizations");
        // Inner tier: a failed artifact is logged and the run goes on.
        if let Err(err) = output::map::render_map(&matched, Path::new(config::MAP_HTML)) {
            error!("error creating map: {err:?}");
        }
        if let Err(err) =
            output::timeline::render_timeline(&matched, Path::new(config::TIMELINE_PNG))
        {
            error!("error creating timeline: {err:?}");
        }
    }

    output::export::write_csv(&matched, Path::new(config::FILTERED_CSV))?;
    info!("analysis completed successfully");
    Ok(())
}
