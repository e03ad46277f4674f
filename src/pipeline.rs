//! Pipeline driver: normalize, dedup, classify, sort, filter.
//!
//! Data flows one way and each stage takes the article list by value, so
//! only the stage currently running can touch it.

use serde::Serialize;
use std::cmp::Ordering;
use std::error::Error;
use std::path::Path;
use tracing::{info, instrument, warn};

use crate::api::Oracle;
use crate::classify::classify_articles;
use crate::config::PipelineConfig;
use crate::dedup::two_pass_dedup;
use crate::models::{Article, RawArticle};
use crate::normalize::normalize_articles;

/// Counts gathered along the way, for the run summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PipelineStats {
    pub raw: usize,
    pub normalized: usize,
    pub after_first_pass: usize,
    pub after_second_pass: usize,
    pub committed: usize,
    pub permanently_failed: usize,
    pub retry_rounds: usize,
    pub important: usize,
    pub emitted: usize,
}

#[derive(Debug)]
pub struct PipelineOutcome {
    pub articles: Vec<Article>,
    pub stats: PipelineStats,
}

/// Read the candidate list handed over by the article source.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn load_candidates(path: &Path) -> Result<Vec<RawArticle>, Box<dyn Error>> {
    let text = tokio::fs::read_to_string(path).await?;
    let raws: Vec<RawArticle> = serde_json::from_str(&text)?;
    info!(count = raws.len(), "Loaded candidate articles");
    Ok(raws)
}

/// Run every stage over `raws`.
///
/// Never fails: oracle trouble only lowers classification coverage.
#[instrument(level = "info", skip_all, fields(raw = raws.len()))]
pub async fn run_pipeline<O: Oracle>(oracle: &O, raws: Vec<RawArticle>, config: &PipelineConfig) -> PipelineOutcome {
    let mut stats = PipelineStats {
        raw: raws.len(),
        ..PipelineStats::default()
    };

    let articles = normalize_articles(raws, config);
    stats.normalized = articles.len();

    let dedup = two_pass_dedup(oracle, articles, config).await;
    stats.after_first_pass = dedup.after_first_pass;
    stats.after_second_pass = dedup.articles.len();

    let classified = classify_articles(oracle, dedup.articles, config).await;
    stats.committed = classified.report.committed;
    stats.permanently_failed = classified.report.permanently_failed.len();
    stats.retry_rounds = classified.report.rounds_used;
    if stats.permanently_failed > 0 {
        warn!(
            failed = stats.permanently_failed,
            "Some articles were never classified and carry default values"
        );
    }

    let mut articles = classified.articles;
    sort_for_report(&mut articles);
    stats.important = articles.iter().filter(|a| a.is_important == Some(true)).count();

    if !config.keep_all {
        articles.retain(|a| a.is_important == Some(true));
    }
    stats.emitted = articles.len();

    info!(?stats, "Pipeline complete");
    PipelineOutcome { articles, stats }
}

/// Score descending, keyword ascending, date descending, headline descending.
pub fn sort_for_report(articles: &mut [Article]) {
    articles.sort_by(report_order);
}

fn report_order(a: &Article, b: &Article) -> Ordering {
    b.relevance_score
        .cmp(&a.relevance_score)
        .then_with(|| a.keyword.cmp(&b.keyword))
        .then_with(|| b.published_at.cmp(&a.published_at))
        .then_with(|| b.headline.cmp(&a.headline))
}
