//! Choosing one representative from a duplicate group by outlet priority.

use crate::models::Article;

/// Pick the representative of a duplicate group.
///
/// Walks `priority` in order and returns the first article whose outlet
/// matches the current entry exactly. If no outlet is listed, the first
/// article in input order wins. Returns `None` only for an empty group.
pub fn select_representative<'a, S: AsRef<str>>(
    group: &[&'a Article],
    priority: &[S],
) -> Option<&'a Article> {
    priority
        .iter()
        .find_map(|outlet| group.iter().find(|a| a.outlet == outlet.as_ref()))
        .or_else(|| group.first())
        .copied()
}
