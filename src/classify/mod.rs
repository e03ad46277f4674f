//! Batched relevance classification with bounded retries.
//!
//! Articles are sent to the oracle in fixed-size batches, enumerated from 1.
//! Each batch keeps an index map from enumeration number to [`RowId`], so a
//! reply line can only ever touch the article it was asked about, including
//! in retry rounds that run over scattered subsets of the list.
//!
//! An article whose line is missing or malformed, or whose batch failed at
//! the transport level, goes into the pending set. Pending articles are
//! re-batched and re-asked for at most `max_retry_rounds` rounds. Articles
//! still pending after that keep their default values and are reported.

pub mod lines;

use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, info, instrument, warn};

use crate::api::Oracle;
use crate::config::PipelineConfig;
use crate::error::FormatFailure;
use crate::models::{Article, ClassificationOutcome, ClassificationResult, RowId};
use crate::prompts::{CLASSIFY_SYSTEM_PROMPT, classify_user_prompt};
use crate::utils::truncate_for_log;
use lines::parse_reply;

/// Retry bookkeeping threaded through the retry loop.
#[derive(Debug, Default)]
pub struct RetryState {
    pub rounds_used: usize,
    pub pending: BTreeSet<RowId>,
}

/// What a classification run achieved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassificationReport {
    pub committed: usize,
    /// Articles left at default values after the last retry round.
    pub permanently_failed: Vec<RowId>,
    pub rounds_used: usize,
}

#[derive(Debug)]
pub struct Classified {
    pub articles: Vec<Article>,
    pub report: ClassificationReport,
}

/// Outcome of one oracle batch.
#[derive(Debug, Default)]
struct BatchResult {
    committed: usize,
    failed: Vec<RowId>,
}

/// Classify every article, retrying only the ones that failed.
///
/// Article order is preserved and no article is ever dropped.
#[instrument(level = "info", skip_all, fields(articles = articles.len()))]
pub async fn classify_articles<O: Oracle>(
    oracle: &O,
    mut articles: Vec<Article>,
    config: &PipelineConfig,
) -> Classified {
    let batch_size = config.classify_batch_size.max(1);
    let positions: HashMap<RowId, usize> = articles
        .iter()
        .enumerate()
        .map(|(i, a)| (a.row_id, i))
        .collect();

    let mut state = RetryState::default();
    let mut committed = 0;

    let all: Vec<RowId> = articles.iter().map(|a| a.row_id).collect();
    info!(batch_size, "Starting relevance classification");
    committed += sweep(oracle, &mut articles, &positions, &all, batch_size, config, &mut state.pending).await;

    while !state.pending.is_empty() && state.rounds_used < config.max_retry_rounds {
        state.rounds_used += 1;
        let retry: Vec<RowId> = std::mem::take(&mut state.pending).into_iter().collect();
        info!(
            round = state.rounds_used,
            max_rounds = config.max_retry_rounds,
            pending = retry.len(),
            "Retrying unclassified articles"
        );
        committed += sweep(oracle, &mut articles, &positions, &retry, batch_size, config, &mut state.pending).await;
    }

    let permanently_failed: Vec<RowId> = state.pending.into_iter().collect();
    if permanently_failed.is_empty() {
        info!(committed, rounds_used = state.rounds_used, "Classification complete");
    } else {
        warn!(
            committed,
            failed = permanently_failed.len(),
            rounds_used = state.rounds_used,
            row_ids = ?permanently_failed,
            "Classification retries exhausted; articles keep default values"
        );
    }

    Classified {
        articles,
        report: ClassificationReport {
            committed,
            permanently_failed,
            rounds_used: state.rounds_used,
        },
    }
}

/// Run `ids` through the oracle batch by batch; failures land in `pending`.
async fn sweep<O: Oracle>(
    oracle: &O,
    articles: &mut [Article],
    positions: &HashMap<RowId, usize>,
    ids: &[RowId],
    batch_size: usize,
    config: &PipelineConfig,
    pending: &mut BTreeSet<RowId>,
) -> usize {
    let total_batches = ids.len().div_ceil(batch_size);
    let mut committed = 0;

    for (batch_no, batch_ids) in ids.chunks(batch_size).enumerate() {
        let result = run_batch(oracle, articles, positions, batch_ids, config.importance_threshold).await;
        info!(
            batch = batch_no + 1,
            total_batches,
            committed = result.committed,
            failed = result.failed.len(),
            "Classification batch done"
        );
        committed += result.committed;
        pending.extend(result.failed);
    }

    committed
}

async fn run_batch<O: Oracle>(
    oracle: &O,
    articles: &mut [Article],
    positions: &HashMap<RowId, usize>,
    batch_ids: &[RowId],
    threshold: u8,
) -> BatchResult {
    // 1-based enumeration number -> (row id, slot in `articles`)
    let index_map: BTreeMap<usize, (RowId, usize)> = batch_ids
        .iter()
        .filter_map(|id| positions.get(id).map(|&slot| (*id, slot)))
        .enumerate()
        .map(|(i, entry)| (i + 1, entry))
        .collect();
    if index_map.is_empty() {
        return BatchResult::default();
    }

    let prompt = classify_user_prompt(index_map.values().map(|&(_, slot)| articles[slot].headline.as_str()));
    let reply = match oracle.call(CLASSIFY_SYSTEM_PROMPT, &prompt).await {
        Ok(reply) => reply,
        Err(e) => {
            warn!(error = %e, articles = index_map.len(), "Classification oracle call failed; batch queued for retry");
            return BatchResult {
                committed: 0,
                failed: index_map.values().map(|&(id, _)| id).collect(),
            };
        }
    };

    let outcomes = parse_reply(&reply);
    for number in outcomes.keys().filter(|n| !index_map.contains_key(*n)) {
        debug!(reason = %FormatFailure::UnknownEnumeration(*number), "Ignoring reply line");
    }

    let mut result = BatchResult::default();
    for (number, &(row_id, slot)) in &index_map {
        match outcomes.get(number) {
            Some(ClassificationOutcome::Committed(classification)) => {
                commit(&mut articles[slot], classification, threshold);
                result.committed += 1;
            }
            Some(ClassificationOutcome::Failed(reason)) => {
                debug!(row_id, %reason, "Unparseable classification line");
                result.failed.push(row_id);
            }
            None => {
                debug!(row_id, number, "Oracle omitted article");
                result.failed.push(row_id);
            }
        }
    }

    if !result.failed.is_empty() {
        debug!(reply_preview = %truncate_for_log(&reply, 300), "Partial classification reply");
    }
    result
}

/// The only place classification fields are written.
fn commit(article: &mut Article, classification: &ClassificationResult, threshold: u8) {
    article.relevance = classification.flags;
    article.relevance_score = classification.score();
    article.is_important = Some(article.relevance_score >= threshold);
}
