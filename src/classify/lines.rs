//! Parsing the oracle's one-line-per-article relevance reply.
//!
//! Expected shape, one line per enumerated article:
//!
//! ```text
//! 1. 대기업 관련: O, HR 관심: O, 정책/법안/판례 관련: X, 경제/산업 관련: O, 보험/금융 관련: X
//! ```
//!
//! Lines without a leading number are ignored. A numbered line that does not
//! carry exactly five comma-separated fields becomes a [`FormatFailure`].

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

use crate::error::FormatFailure;
use crate::models::{ClassificationOutcome, ClassificationResult, Mark};

static LINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*(\d+)\s*[.)]\s*(.*)$").expect("valid regex"));

/// Parse one line into its 1-based enumeration number and outcome.
pub fn parse_line(line: &str) -> Option<(usize, ClassificationOutcome)> {
    let caps = LINE_RE.captures(line)?;
    let number = caps[1].parse::<usize>().ok()?;
    let rest = caps.get(2).map_or("", |m| m.as_str());

    // Trailing commas are common; empty fields are not answers.
    let marks: Vec<Mark> = rest
        .split(',')
        .map(str::trim)
        .filter(|field| !field.is_empty())
        .map(|field| match field.split(':').nth(1) {
            Some(answer) => Mark::from_answer(answer),
            None => Mark::X,
        })
        .collect();

    let outcome = match <[Mark; 5]>::try_from(marks) {
        Ok(marks) => ClassificationOutcome::Committed(ClassificationResult::from_marks(marks)),
        Err(marks) => ClassificationOutcome::Failed(FormatFailure::FieldCount { found: marks.len() }),
    };
    Some((number, outcome))
}

/// Parse a whole reply, keyed by enumeration number.
///
/// When the oracle repeats a number, the first committed line wins.
pub fn parse_reply(reply: &str) -> BTreeMap<usize, ClassificationOutcome> {
    let mut outcomes = BTreeMap::new();
    for (number, outcome) in reply.lines().filter_map(parse_line) {
        match outcomes.get(&number) {
            Some(ClassificationOutcome::Committed(_)) => {}
            _ => {
                outcomes.insert(number, outcome);
            }
        }
    }
    outcomes
}
