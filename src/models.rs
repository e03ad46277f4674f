//! Data models for candidate articles and their classification.
//!
//! - [`RawArticle`]: a record as handed over by the article source
//! - [`Article`]: the unit of work carried through dedup and classification
//! - [`Mark`] / [`RelevanceFlags`]: the five O/X relevance answers
//! - [`ClassificationResult`] / [`ClassificationOutcome`]: one oracle answer for one article
//!
//! Raw records accept the Korean column names of the upstream crawler export
//! (`헤드라인`, `본문`, `매체명`, ...) as serde aliases.

use serde::{Deserialize, Serialize};

use crate::error::FormatFailure;

/// Stable identifier assigned once at ingestion and never reassigned.
pub type RowId = u64;

/// A raw candidate article as supplied by the article source.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawArticle {
    /// Keyword group the crawler filed the article under (e.g. "HR").
    #[serde(default, alias = "구분")]
    pub category: String,
    /// Search keyword that surfaced the article.
    #[serde(default, alias = "키워드")]
    pub keyword: String,
    #[serde(default, alias = "헤드라인")]
    pub headline: String,
    #[serde(default, alias = "본문", alias = "body", alias = "summary")]
    pub summary_or_body: String,
    /// Raw domain or display name of the publishing outlet.
    #[serde(default, alias = "매체명")]
    pub outlet: String,
    #[serde(default, alias = "URL")]
    pub url: String,
    #[serde(default, alias = "일자")]
    pub published_at: String,
}

/// One O/X answer to a relevance question.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mark {
    O,
    #[default]
    X,
}

impl Mark {
    /// Only an exact `O` counts as affirmative; anything else the oracle writes is `X`.
    pub fn from_answer(answer: &str) -> Self {
        if answer.trim() == "O" { Mark::O } else { Mark::X }
    }

    pub fn is_affirmative(self) -> bool {
        matches!(self, Mark::O)
    }
}

/// The five relevance dimensions, in the order the oracle is asked about them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelevanceFlags {
    pub corp_related: Mark,
    pub hr_related: Mark,
    pub policy_related: Mark,
    pub economy_related: Mark,
    pub finance_related: Mark,
}

impl RelevanceFlags {
    pub fn marks(&self) -> [Mark; 5] {
        [
            self.corp_related,
            self.hr_related,
            self.policy_related,
            self.economy_related,
            self.finance_related,
        ]
    }
}

/// The unit of work.
///
/// Dedup only selects among articles; the classification fields are written
/// by the relevance classifier's commit step and nowhere else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub row_id: RowId,
    pub category: String,
    pub keyword: String,
    pub headline: String,
    pub summary_or_body: String,
    pub outlet: String,
    /// Identity key only.
    pub url: String,
    pub published_at: String,
    #[serde(flatten)]
    pub relevance: RelevanceFlags,
    /// Count of `O` among the five flags, 0 to 5.
    pub relevance_score: u8,
    /// `None` until the classifier commits a result for this article.
    pub is_important: Option<bool>,
}

impl Article {
    pub fn from_raw(row_id: RowId, raw: RawArticle) -> Self {
        Self {
            row_id,
            category: raw.category,
            keyword: raw.keyword,
            headline: raw.headline,
            summary_or_body: raw.summary_or_body,
            outlet: raw.outlet,
            url: raw.url,
            published_at: raw.published_at,
            relevance: RelevanceFlags::default(),
            relevance_score: 0,
            is_important: None,
        }
    }
}

/// Five O/X values recovered from one parseable oracle line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassificationResult {
    pub flags: RelevanceFlags,
}

impl ClassificationResult {
    pub fn from_marks(marks: [Mark; 5]) -> Self {
        let [corp_related, hr_related, policy_related, economy_related, finance_related] = marks;
        Self {
            flags: RelevanceFlags {
                corp_related,
                hr_related,
                policy_related,
                economy_related,
                finance_related,
            },
        }
    }

    pub fn score(&self) -> u8 {
        self.flags
            .marks()
            .iter()
            .filter(|m| m.is_affirmative())
            .count() as u8
    }
}

/// What a single oracle line yielded for a single article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassificationOutcome {
    Committed(ClassificationResult),
    Failed(FormatFailure),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_article_accepts_korean_columns() {
        let json = r#"{
            "구분": "HR",
            "키워드": "조직개편",
            "일자": "05.06(화)",
            "헤드라인": "A기업 조직개편 발표",
            "본문": "본문",
            "매체명": "조선일보",
            "URL": "https://n.news.naver.com/mnews/article/023/0000000001"
        }"#;

        let raw: RawArticle = serde_json::from_str(json).unwrap();
        assert_eq!(raw.category, "HR");
        assert_eq!(raw.headline, "A기업 조직개편 발표");
        assert_eq!(raw.outlet, "조선일보");
        assert!(raw.url.ends_with("0000000001"));
    }

    #[test]
    fn test_raw_article_accepts_english_keys() {
        let json = r#"{"headline": "h", "outlet": "o", "url": "u", "body": "b"}"#;
        let raw: RawArticle = serde_json::from_str(json).unwrap();
        assert_eq!(raw.summary_or_body, "b");
        assert!(raw.keyword.is_empty());
    }

    #[test]
    fn test_article_defaults_from_raw() {
        let article = Article::from_raw(7, RawArticle::default());
        assert_eq!(article.row_id, 7);
        assert_eq!(article.relevance.marks(), [Mark::X; 5]);
        assert_eq!(article.relevance_score, 0);
        assert_eq!(article.is_important, None);
    }

    #[test]
    fn test_mark_from_answer() {
        assert_eq!(Mark::from_answer(" O "), Mark::O);
        assert_eq!(Mark::from_answer("X"), Mark::X);
        assert_eq!(Mark::from_answer("예"), Mark::X);
        assert_eq!(Mark::from_answer(""), Mark::X);
    }

    #[test]
    fn test_score_counts_affirmatives() {
        let result = ClassificationResult::from_marks([Mark::O, Mark::O, Mark::X, Mark::O, Mark::X]);
        assert_eq!(result.score(), 3);
        assert_eq!(result.flags.policy_related, Mark::X);
        assert_eq!(ClassificationResult::from_marks([Mark::O; 5]).score(), 5);
        assert_eq!(ClassificationResult::from_marks([Mark::X; 5]).score(), 0);
    }

    #[test]
    fn test_article_serializes_flat_flags() {
        let article = Article::from_raw(1, RawArticle::default());
        let json = serde_json::to_string(&article).unwrap();
        assert!(json.contains(r#""hr_related":"X""#));
        assert!(json.contains(r#""is_important":null"#));
    }
}
