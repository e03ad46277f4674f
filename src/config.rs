//! Pipeline policy: batch sizes, retry bound, relevance cutoff and outlet tables.
//!
//! Every value has a default, so a YAML file only needs the keys it changes:
//!
//! ```yaml
//! classify_batch_size: 8
//! importance_threshold: 4
//! media_priority: ["중앙일보", "조선일보"]
//! ```

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, instrument};

use crate::error::ConfigError;

/// Outlets preferred as the representative of a duplicate group, highest first.
pub const DEFAULT_MEDIA_PRIORITY: &[&str] = &[
    "조선일보",
    "중앙일보",
    "동아일보",
    "서울신문",
    "경향신문",
    "한겨레",
    "한국경제",
    "머니투데이",
];

/// Domain to display-name table for outlets that arrive as raw hosts.
const DEFAULT_OUTLET_NAMES: &[(&str, &str)] = &[
    ("shindonga.donga.com", "월간 신동아"),
    ("magazine.hankyung.com", "매거진 한경"),
    ("www.chosun.com", "조선일보"),
    ("biz.chosun.com", "조선비즈"),
    ("weekly.chosun.com", "주간조선"),
    ("www.joins.com", "중앙일보"),
    ("www.donga.com", "동아일보"),
    ("weekly.donga.com", "주간동아"),
    ("www.khan.co.kr", "경향신문"),
    ("weekly.khan.co.kr", "주간경향"),
    ("www.hani.co.kr", "한겨레"),
    ("www.hankyung.com", "한국경제"),
    ("www.mk.co.kr", "매일경제"),
    ("www.magazine.mk.co.kr", "매경이코노미"),
    ("www.hankookilbo.com", "한국일보"),
    ("view.asiae.co.kr", "아시아경제"),
    ("www.edaily.co.kr", "이데일리"),
    ("news.heraldcorp.com", "헤럴드경제"),
    ("www.fnnews.com", "파이낸셜뉴스"),
    ("news.mt.co.kr", "머니투데이"),
    ("www.sisain.co.kr", "시사IN"),
];

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Batch size of the first, batch-local dedup pass.
    pub first_pass_batch_size: usize,
    /// Batch size of the second, cross-batch dedup pass.
    pub second_pass_batch_size: usize,
    pub classify_batch_size: usize,
    /// Retry rounds after the initial classification sweep.
    pub max_retry_rounds: usize,
    /// Minimum relevance score (out of 5) for an article to count as important.
    pub importance_threshold: u8,
    pub media_priority: Vec<String>,
    pub outlet_names: BTreeMap<String, String>,
    /// Three-digit Naver media codes to keep; empty keeps everything.
    pub allowed_media_codes: Vec<String>,
    /// Emit every classified article instead of only the important ones.
    pub keep_all: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            first_pass_batch_size: 20,
            second_pass_batch_size: 50,
            classify_batch_size: 5,
            max_retry_rounds: 5,
            importance_threshold: 3,
            media_priority: DEFAULT_MEDIA_PRIORITY.iter().map(|s| s.to_string()).collect(),
            outlet_names: DEFAULT_OUTLET_NAMES
                .iter()
                .map(|(domain, name)| (domain.to_string(), name.to_string()))
                .collect(),
            allowed_media_codes: Vec::new(),
            keep_all: false,
        }
    }
}

impl PipelineConfig {
    /// Load from a YAML file and validate.
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.display().to_string(),
                source,
            })?;
        let config = Self::from_yaml(&text)?;
        info!(?config, "Loaded pipeline config");
        Ok(config)
    }

    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.first_pass_batch_size == 0 {
            return Err(ConfigError::Zero { field: "first_pass_batch_size" });
        }
        if self.second_pass_batch_size == 0 {
            return Err(ConfigError::Zero { field: "second_pass_batch_size" });
        }
        if self.classify_batch_size == 0 {
            return Err(ConfigError::Zero { field: "classify_batch_size" });
        }
        if self.importance_threshold > 5 {
            return Err(ConfigError::Threshold(self.importance_threshold));
        }
        Ok(())
    }
}
