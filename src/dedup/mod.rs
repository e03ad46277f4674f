//! Oracle-assisted removal of duplicate coverage.
//!
//! A pass partitions the article list into fixed-size, order-preserving
//! batches. For each batch the oracle groups headlines that cover the same
//! event, and each group is collapsed to one representative chosen by outlet
//! priority. Two passes run back to back: a fine one (small batches) and a
//! coarse one over the survivors (large batches), because a batch can never
//! see duplicates that landed in a different batch.
//!
//! # Failure policy
//!
//! - oracle call fails: every article of the batch is its own group
//! - reply has no usable group: same singleton fallback
//! - positions outside the batch are ignored; a group left empty is skipped
//! - an article named by several groups belongs to the first one
//! - articles no group names are kept as singletons
//!
//! No article is ever lost to a bad reply.

pub mod groups;
pub mod selector;

use itertools::Itertools;
use tracing::{debug, info, instrument, warn};

use crate::api::Oracle;
use crate::config::PipelineConfig;
use crate::models::Article;
use crate::prompts::{DEDUP_SYSTEM_PROMPT, dedup_user_prompt};
use crate::utils::truncate_for_log;
use groups::{DuplicateGroup, parse_groups, singleton_groups};
use selector::select_representative;

/// Result of [`two_pass_dedup`].
#[derive(Debug)]
pub struct DedupOutcome {
    pub articles: Vec<Article>,
    /// Survivors of the first pass, for reporting.
    pub after_first_pass: usize,
}

/// Run the fine pass then the cross-batch pass.
///
/// Articles sharing a URL are collapsed to their first occurrence before
/// the oracle is consulted.
#[instrument(level = "info", skip_all, fields(input = articles.len()))]
pub async fn two_pass_dedup<O: Oracle>(
    oracle: &O,
    articles: Vec<Article>,
    config: &PipelineConfig,
) -> DedupOutcome {
    let input = articles.len();
    let articles: Vec<Article> = articles.into_iter().unique_by(|a| a.url.clone()).collect();
    if articles.len() < input {
        info!(dropped = input - articles.len(), "Collapsed repeated URLs");
    }

    info!("Starting first dedup pass");
    let first = dedup_pass(oracle, articles, config.first_pass_batch_size, &config.media_priority).await;
    let after_first_pass = first.len();

    info!("Starting cross-batch dedup pass");
    let second = dedup_pass(oracle, first, config.second_pass_batch_size, &config.media_priority).await;

    info!(
        input,
        after_first_pass,
        output = second.len(),
        "Dedup complete"
    );
    DedupOutcome {
        articles: second,
        after_first_pass,
    }
}

/// One batched dedup sweep over `articles`.
///
/// Representatives come out batch by batch, in the order of the groups the
/// oracle returned, followed by the batch's ungrouped articles in input order.
#[instrument(level = "info", skip_all, fields(batch_size = batch_size, input = articles.len()))]
pub async fn dedup_pass<O: Oracle, S: AsRef<str>>(
    oracle: &O,
    articles: Vec<Article>,
    batch_size: usize,
    priority: &[S],
) -> Vec<Article> {
    if articles.is_empty() {
        return articles;
    }
    let batch_size = batch_size.max(1);
    let total_batches = articles.len().div_ceil(batch_size);

    let mut chosen: Vec<usize> = Vec::with_capacity(articles.len());
    for (batch_no, batch) in articles.chunks(batch_size).enumerate() {
        let start = batch_no * batch_size;
        let groups = ask_groups(oracle, batch).await;
        let picks = resolve_batch(batch, &groups, priority);
        info!(
            batch = batch_no + 1,
            total_batches,
            groups = groups.len(),
            articles = batch.len(),
            kept = picks.len(),
            "Dedup batch resolved"
        );
        chosen.extend(picks.into_iter().map(|offset| start + offset));
    }

    let mut slots: Vec<Option<Article>> = articles.into_iter().map(Some).collect();
    chosen
        .into_iter()
        .filter_map(|i| slots.get_mut(i).and_then(Option::take))
        .collect()
}

/// Ask the oracle to group one batch, falling back to singletons.
async fn ask_groups<O: Oracle>(oracle: &O, batch: &[Article]) -> Vec<DuplicateGroup> {
    let prompt = dedup_user_prompt(batch.iter().map(|a| a.headline.as_str()));

    match oracle.call(DEDUP_SYSTEM_PROMPT, &prompt).await {
        Ok(reply) => {
            let groups = parse_groups(&reply);
            if groups.is_empty() {
                warn!(
                    reply_preview = %truncate_for_log(&reply, 200),
                    "No duplicate groups in oracle reply; keeping batch as singletons"
                );
                singleton_groups(batch.len())
            } else {
                groups
            }
        }
        Err(e) => {
            warn!(error = %e, articles = batch.len(), "Dedup oracle call failed; keeping batch as singletons");
            singleton_groups(batch.len())
        }
    }
}

/// Offsets into `batch` of the articles that survive.
fn resolve_batch<S: AsRef<str>>(batch: &[Article], groups: &[DuplicateGroup], priority: &[S]) -> Vec<usize> {
    let mut claimed = vec![false; batch.len()];
    let mut picks = Vec::new();

    for group in groups {
        let members: Vec<usize> = group
            .positions
            .iter()
            .copied()
            .filter(|&p| p < batch.len() && !claimed[p])
            .unique()
            .collect();
        if members.is_empty() {
            debug!(positions = ?group.positions, "Skipping group with no usable positions");
            continue;
        }

        let candidates: Vec<&Article> = members.iter().map(|&p| &batch[p]).collect();
        let Some(representative) = select_representative(&candidates, priority) else {
            continue;
        };
        let Some(pick) = members
            .iter()
            .copied()
            .find(|&p| batch[p].row_id == representative.row_id)
        else {
            continue;
        };

        if members.len() > 1 {
            debug!(
                kept = %representative.headline,
                outlet = %representative.outlet,
                dropped = members.len() - 1,
                "Collapsed duplicate group"
            );
        }
        for &p in &members {
            claimed[p] = true;
        }
        picks.push(pick);
    }

    picks.extend((0..batch.len()).filter(|&p| !claimed[p]));
    picks
}
