//! Command-line interface definitions for HR News Digest.
//!
//! Pipeline policy comes from defaults, then an optional YAML file, then the
//! individual override flags below, in that order.

use clap::Parser;
use std::path::PathBuf;

use crate::config::PipelineConfig;

/// Command-line arguments for the HR News Digest application.
///
/// # Examples
///
/// ```sh
/// # Crawler output in, dated digest under ./data
/// hr_news_digest -i step1_processed.json
///
/// # Tighter batches, every article kept, logs to a daily file
/// hr_news_digest -i in.json -o out --classify-batch-size 3 --keep-all --log-dir logs
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// JSON array of candidate articles
    #[arg(short, long)]
    pub input: PathBuf,

    /// Base directory for the dated digest output
    #[arg(short, long, default_value = "data")]
    pub output_dir: PathBuf,

    /// Path to the oracle config.yaml (defaults to the awful_aj config directory)
    #[arg(short, long, env = "HR_NEWS_ORACLE_CONFIG")]
    pub config: Option<PathBuf>,

    /// awful_aj chat template used for oracle calls
    #[arg(long, default_value = "hr_news_digest")]
    pub template: String,

    /// YAML file with pipeline policy (batch sizes, retries, outlet tables)
    #[arg(short, long)]
    pub pipeline_config: Option<PathBuf>,

    #[arg(long)]
    pub first_pass_batch_size: Option<usize>,

    #[arg(long)]
    pub second_pass_batch_size: Option<usize>,

    #[arg(long)]
    pub classify_batch_size: Option<usize>,

    #[arg(long)]
    pub max_retry_rounds: Option<usize>,

    /// Minimum relevance score (0-5) for an article to be kept
    #[arg(long)]
    pub importance_threshold: Option<u8>,

    /// Emit every article, not only the important ones
    #[arg(long)]
    pub keep_all: bool,

    /// Write logs to a daily-rolling file in this directory instead of stdout
    #[arg(long, env = "HR_NEWS_LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

impl Cli {
    /// Apply flag overrides on top of `config`.
    pub fn apply_overrides(&self, config: &mut PipelineConfig) {
        if let Some(n) = self.first_pass_batch_size {
            config.first_pass_batch_size = n;
        }
        if let Some(n) = self.second_pass_batch_size {
            config.second_pass_batch_size = n;
        }
        if let Some(n) = self.classify_batch_size {
            config.classify_batch_size = n;
        }
        if let Some(n) = self.max_retry_rounds {
            config.max_retry_rounds = n;
        }
        if let Some(t) = self.importance_threshold {
            config.importance_threshold = t;
        }
        if self.keep_all {
            config.keep_all = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from(["hr_news_digest", "--input", "in.json", "--output-dir", "./out"]);

        assert_eq!(cli.input, PathBuf::from("in.json"));
        assert_eq!(cli.output_dir, PathBuf::from("./out"));
        assert_eq!(cli.template, "hr_news_digest");
        assert!(!cli.keep_all);
    }

    #[test]
    fn test_cli_short_flags_and_defaults() {
        let cli = Cli::parse_from(["hr_news_digest", "-i", "/tmp/in.json", "-p", "policy.yaml"]);

        assert_eq!(cli.input, PathBuf::from("/tmp/in.json"));
        assert_eq!(cli.output_dir, PathBuf::from("data"));
        assert_eq!(cli.pipeline_config, Some(PathBuf::from("policy.yaml")));
    }

    #[test]
    fn test_overrides_apply() {
        let cli = Cli::parse_from([
            "hr_news_digest",
            "-i",
            "in.json",
            "--classify-batch-size",
            "3",
            "--max-retry-rounds",
            "1",
            "--importance-threshold",
            "4",
            "--keep-all",
        ]);
        let mut config = PipelineConfig::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.classify_batch_size, 3);
        assert_eq!(config.max_retry_rounds, 1);
        assert_eq!(config.importance_threshold, 4);
        assert!(config.keep_all);
        assert_eq!(config.first_pass_batch_size, 20);
    }

    #[test]
    fn test_missing_input_is_rejected() {
        assert!(Cli::try_parse_from(["hr_news_digest"]).is_err());
    }
}
