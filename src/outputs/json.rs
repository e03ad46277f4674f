//! JSON output of the final digest.
//!
//! One file per day. A later run on the same day overwrites the earlier one.

use chrono::NaiveDate;
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

use crate::models::Article;
use crate::utils::dated_folder;

pub const DIGEST_FILENAME: &str = "step2_final.json";

/// Write `articles` to `{output_dir}/{date}/step2_final.json`.
///
/// # Returns
///
/// The path written, or an error if directory creation, serialization or the
/// write fails.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir.display(), %date))]
pub async fn write_digest(
    articles: &[Article],
    output_dir: &Path,
    date: NaiveDate,
) -> Result<PathBuf, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(articles)?;

    let day_dir = dated_folder(output_dir, date);
    if let Err(e) = fs::create_dir_all(&day_dir).await {
        error!(dir = %day_dir.display(), error = %e, "Failed to create output dir");
        return Err(e.into());
    }

    let path = day_dir.join(DIGEST_FILENAME);
    fs::write(&path, json).await?;
    info!(path = %path.display(), count = articles.len(), "Wrote digest JSON");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::article;

    #[tokio::test]
    async fn test_write_digest() {
        let tmp = tempfile::tempdir().unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 5, 6).unwrap();
        let mut a = article(3, "A기업 조직개편 발표", "조선일보");
        a.relevance_score = 4;
        a.is_important = Some(true);

        let path = write_digest(&[a.clone()], tmp.path(), date).await.unwrap();

        assert_eq!(path, tmp.path().join("2025-05-06").join(DIGEST_FILENAME));
        let text = std::fs::read_to_string(&path).unwrap();
        let back: Vec<Article> = serde_json::from_str(&text).unwrap();
        assert_eq!(back, vec![a]);
    }

    #[tokio::test]
    async fn test_write_empty_digest() {
        let tmp = tempfile::tempdir().unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let path = write_digest(&[], tmp.path(), date).await.unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap().trim(), "[]");
    }
}
