//! # HR News Digest
//!
//! Takes the day's crawled news candidates, removes duplicate coverage of the
//! same event across outlets, and scores every remaining article for HR
//! relevance with an LLM oracle.
//!
//! ## Usage
//!
//! ```sh
//! hr_news_digest -i step1_processed.json -o ./data
//! ```
//!
//! ## Architecture
//!
//! The application is a one-way pipeline:
//! 1. **Normalization**: assign row ids, clean headlines and outlet names
//! 2. **Dedup**: two batched oracle passes, one representative per event
//! 3. **Classification**: five O/X relevance questions per article, with bounded retries
//! 4. **Output**: important articles, sorted, written as dated JSON
//!
//! Oracle failures never abort a run; they only reduce coverage.

use awful_aj::config::load_config as load_oracle_config;
use awful_aj::config_dir;
use chrono::Local;
use clap::Parser;
use std::error::Error;
use std::path::Path;
use tracing::{debug, error, info, instrument, warn};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod classify;
mod cli;
mod config;
mod dedup;
mod error;
mod models;
mod normalize;
mod outputs;
mod pipeline;
mod prompts;
mod utils;

#[cfg(test)]
mod test_support;

use api::AwfulOracle;
use cli::Cli;
use config::PipelineConfig;
use outputs::json;
use pipeline::{load_candidates, run_pipeline};
use utils::ensure_writable_dir;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Cli::parse();
    let _log_guard = init_tracing(args.log_dir.as_deref());

    let start_time = std::time::Instant::now();
    info!("hr_news_digest starting up");
    debug!(input = %args.input.display(), output_dir = %args.output_dir.display(), "Parsed CLI arguments");

    // ---- Pipeline policy ----
    let mut pipeline_config = match &args.pipeline_config {
        Some(path) => PipelineConfig::load(path).await?,
        None => PipelineConfig::default(),
    };
    args.apply_overrides(&mut pipeline_config);
    pipeline_config.validate()?;

    // Early check: fail before spending any oracle calls
    if let Err(e) = ensure_writable_dir(&args.output_dir).await {
        error!(
            path = %args.output_dir.display(),
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    // ---- Oracle ----
    let conf_file = match &args.config {
        Some(path) => path.clone(),
        None => config_dir()?.join("config.yaml"),
    };
    let config_path = conf_file.to_str().ok_or("Not a valid config filename")?;
    let oracle_config =
        load_oracle_config(config_path).map_err(|e| format!("failed to load oracle config {config_path}: {e}"))?;
    info!(config_path, template = %args.template, "Loaded oracle configuration");
    let oracle = AwfulOracle::new(oracle_config, args.template.clone());

    // ---- Run ----
    let raws = load_candidates(&args.input).await?;
    let outcome = run_pipeline(&oracle, raws, &pipeline_config).await;

    let path = match json::write_digest(&outcome.articles, &args.output_dir, Local::now().date_naive()).await {
        Ok(path) => path,
        Err(e) => {
            error!(error = %e, "Failed to write digest JSON");
            return Err(e);
        }
    };

    if outcome.stats.permanently_failed > 0 {
        warn!(
            failed = outcome.stats.permanently_failed,
            "Digest contains articles without a relevance verdict"
        );
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        raw = outcome.stats.raw,
        emitted = outcome.stats.emitted,
        path = %path.display(),
        "Execution complete"
    );

    Ok(())
}

/// Console logging by default; a daily-rolling file when `log_dir` is given.
///
/// The returned guard must live until exit so buffered file output is flushed.
fn init_tracing(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339());

    let Some(dir) = log_dir else {
        builder.init();
        return None;
    };
    match daily_log_writer(dir) {
        Ok((writer, guard)) => {
            builder.with_ansi(false).with_writer(writer).init();
            Some(guard)
        }
        Err(e) => {
            builder.init();
            warn!(
                log_dir = %dir.display(),
                error = %e,
                "Cannot create log directory; logging to console instead"
            );
            None
        }
    }
}

/// Non-blocking writer onto `{dir}/hr_news_digest.log.YYYY-MM-DD`, creating `dir` first.
fn daily_log_writer(dir: &Path) -> std::io::Result<(NonBlocking, WorkerGuard)> {
    std::fs::create_dir_all(dir)?;
    let appender = tracing_appender::rolling::daily(dir, "hr_news_digest.log");
    Ok(tracing_appender::non_blocking(appender))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daily_log_writer_creates_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("logs/nested");
        let (_writer, _guard) = daily_log_writer(&dir).unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn test_daily_log_writer_reports_unusable_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("not_a_dir");
        std::fs::write(&file, "x").unwrap();
        assert!(daily_log_writer(&file.join("logs")).is_err());
    }
}
