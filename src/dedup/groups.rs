//! Parsing the oracle's duplicate-group reply.
//!
//! The oracle is asked for `[[1, 2], [3], [4, 5]]` but may wrap it in prose,
//! code fences or half-broken brackets. Every bracketed run of digits,
//! commas and whitespace is read as one group of 1-based article numbers.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static GROUP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([0-9,\s]+)\]").expect("valid regex"));

/// Zero-based positions into one batch that the oracle believes cover the same event.
///
/// Positions are not range-checked here; the deduplicator drops those that
/// fall outside its batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    pub positions: Vec<usize>,
}

/// Extract every well-formed group from `reply`.
///
/// A group with any token that is not an integer is dropped as a whole. A
/// `0` (which has no zero-based position) is dropped on its own. An empty
/// result means the caller must fall back to singleton groups.
pub fn parse_groups(reply: &str) -> Vec<DuplicateGroup> {
    let mut groups = Vec::new();

    for caps in GROUP_RE.captures_iter(reply) {
        let body = &caps[1];
        let numbers: Result<Vec<usize>, _> = body.split(',').map(|t| t.trim().parse::<usize>()).collect();
        match numbers {
            Ok(numbers) => groups.push(DuplicateGroup {
                positions: numbers.into_iter().filter_map(|n| n.checked_sub(1)).collect(),
            }),
            Err(e) => debug!(group = body, error = %e, "Dropping unparseable group"),
        }
    }

    groups
}

/// One group per position, used when the oracle gave nothing usable.
pub fn singleton_groups(len: usize) -> Vec<DuplicateGroup> {
    (0..len).map(|i| DuplicateGroup { positions: vec![i] }).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions(groups: &[DuplicateGroup]) -> Vec<Vec<usize>> {
        groups.iter().map(|g| g.positions.clone()).collect()
    }

    #[test]
    fn test_nested_list() {
        assert_eq!(positions(&parse_groups("[[1,2],[3]]")), vec![vec![0, 1], vec![2]]);
    }

    #[test]
    fn test_whitespace_and_prose() {
        let reply = "중복 그룹은 다음과 같습니다:\n```\n[[1, 4], [2], [3 , 5]]\n```";
        assert_eq!(
            positions(&parse_groups(reply)),
            vec![vec![0, 3], vec![1], vec![2, 4]]
        );
    }

    #[test]
    fn test_garbage_token_drops_only_that_group() {
        // "1,,2" has an empty token.
        assert_eq!(positions(&parse_groups("[[1,,2],[3]]")), vec![vec![2]]);
        // "[x]" never matches the bracket pattern at all.
        assert_eq!(positions(&parse_groups("[[x],[2]]")), vec![vec![1]]);
    }

    #[test]
    fn test_no_brackets() {
        assert!(parse_groups("모두 다른 기사입니다").is_empty());
        assert!(parse_groups("").is_empty());
    }

    #[test]
    fn test_blank_group_is_dropped() {
        assert!(parse_groups("[ ]").is_empty());
    }

    #[test]
    fn test_zero_is_dropped_not_underflowed() {
        assert_eq!(positions(&parse_groups("[0, 2]")), vec![vec![1]]);
    }

    #[test]
    fn test_out_of_range_is_kept_for_caller() {
        assert_eq!(positions(&parse_groups("[99]")), vec![vec![98]]);
    }

    #[test]
    fn test_singleton_groups() {
        assert_eq!(positions(&singleton_groups(3)), vec![vec![0], vec![1], vec![2]]);
        assert!(singleton_groups(0).is_empty());
    }
}
