//! Ingestion cleanup applied before any oracle call.
//!
//! Raw crawler records carry HTML entities and `[단독]`-style tags in their
//! headlines, and outlets as raw hosts. This module assigns each record its
//! stable [`RowId`], cleans those fields and drops records that cannot take
//! part in dedup (no URL, no headline, repeated URL, disallowed media code).

use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;
use std::collections::BTreeMap;
use tracing::{info, instrument};
use url::Url;

use crate::config::PipelineConfig;
use crate::models::{Article, RawArticle, RowId};

static BRACKET_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[.*?\]").expect("valid regex"));
static BOLD_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)</?b>").expect("valid regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));
static MEDIA_CODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"article/(\d{3})/").expect("valid regex"));

/// Turn raw records into articles ready for dedup.
///
/// Row ids follow input order and are assigned before anything is dropped,
/// so they stay meaningful against the source file.
#[instrument(level = "info", skip_all, fields(raw = raws.len()))]
pub fn normalize_articles(raws: Vec<RawArticle>, config: &PipelineConfig) -> Vec<Article> {
    let raw_count = raws.len();

    let articles: Vec<Article> = raws
        .into_iter()
        .enumerate()
        .map(|(i, raw)| {
            let mut article = Article::from_raw(i as RowId, raw);
            article.url = article.url.trim().to_string();
            article.headline = clean_headline(&article.headline);
            article.outlet = display_outlet(&article.outlet, &config.outlet_names);
            article
        })
        .filter(|a| !a.url.is_empty() && !a.headline.is_empty())
        .unique_by(|a| a.url.clone())
        .filter(|a| media_code_allowed(&a.url, &config.allowed_media_codes))
        .collect();

    info!(raw = raw_count, kept = articles.len(), "Normalized candidate articles");
    articles
}

/// Strip search-highlight `<b>` tags, decode HTML entities, drop bracketed
/// tags and collapse whitespace to single spaces.
///
/// Any other `<` is literal text: it is escaped before the fragment parse so
/// that `삼성<LG` can never open an element and swallow the rest.
pub fn clean_headline(raw: &str) -> String {
    let unbolded = BOLD_TAG_RE.replace_all(raw, "");
    let decoded = if unbolded.contains('&') || unbolded.contains('<') {
        let escaped = unbolded.replace('<', "&lt;");
        Html::parse_fragment(&escaped).root_element().text().collect::<String>()
    } else {
        unbolded.into_owned()
    };
    let untagged = BRACKET_TAG_RE.replace_all(&decoded, "");
    WHITESPACE_RE.replace_all(untagged.trim(), " ").into_owned()
}

/// Map a raw host (or full URL) to the outlet's display name.
///
/// Unknown outlets are returned trimmed but otherwise verbatim.
pub fn display_outlet(raw: &str, names: &BTreeMap<String, String>) -> String {
    let raw = raw.trim();
    if let Some(name) = names.get(raw) {
        return name.clone();
    }
    Url::parse(raw)
        .ok()
        .and_then(|url| url.host_str().and_then(|host| names.get(host)).cloned())
        .unwrap_or_else(|| raw.to_string())
}

/// Three-digit Naver media code embedded in an article URL.
pub fn media_code(url: &str) -> Option<&str> {
    MEDIA_CODE_RE.captures(url).and_then(|c| c.get(1)).map(|m| m.as_str())
}

fn media_code_allowed(url: &str, allowed: &[String]) -> bool {
    allowed.is_empty() || media_code(url).is_some_and(|code| allowed.iter().any(|a| a == code))
}
