//! Classification oracle adapter.
//!
//! The oracle is an OpenAI-compatible chat completion endpoint reached
//! through `awful_aj`. Every call is a single request/response: there is no
//! retry or backoff in here. Recovery policy belongs to the callers (dedup
//! falls back to singleton groups, classification re-queues the batch).
//!
//! # Architecture
//!
//! - [`Oracle`]: the seam the core depends on; test doubles implement it too
//! - [`AwfulOracle`]: production implementation over `awful_aj::api::ask`

use awful_aj::api::ask;
use awful_aj::config::AwfulJadeConfig;
use awful_aj::template;
use std::time::Instant;
use tracing::{debug, instrument, warn};

use crate::error::OracleFailure;
use crate::utils::truncate_for_log;

/// A free-form text oracle.
///
/// Implementors send one system prompt plus one user message and return the
/// raw reply text. Nothing about the reply's structure is guaranteed.
pub trait Oracle {
    /// Perform exactly one oracle request.
    ///
    /// # Errors
    ///
    /// Returns [`OracleFailure`] when no reply text could be obtained.
    async fn call(&self, system_prompt: &str, user_prompt: &str) -> Result<String, OracleFailure>;
}

/// [`Oracle`] backed by `awful_aj`.
///
/// The named chat template supplies model-side settings (response format,
/// pre/post user content); its system prompt is replaced on every call.
#[derive(Debug)]
pub struct AwfulOracle {
    /// LLM configuration (API key, endpoint, model settings).
    config: AwfulJadeConfig,
    /// Template name as understood by `awful_aj::template::load_template`.
    template_name: String,
}

impl AwfulOracle {
    pub fn new(config: AwfulJadeConfig, template_name: impl Into<String>) -> Self {
        Self {
            config,
            template_name: template_name.into(),
        }
    }
}

impl Oracle for AwfulOracle {
    #[instrument(level = "debug", skip_all, fields(template = %self.template_name))]
    async fn call(&self, system_prompt: &str, user_prompt: &str) -> Result<String, OracleFailure> {
        let mut chat_template = template::load_template(&self.template_name)
            .await
            .map_err(|e| OracleFailure::Template {
                name: self.template_name.clone(),
                reason: e.to_string(),
            })?;
        chat_template.system_prompt = system_prompt.to_string();

        let t0 = Instant::now();
        let res = ask(&self.config, user_prompt.to_string(), &chat_template, None, None).await;
        let dt = t0.elapsed();

        match res {
            Ok(reply) => {
                debug!(
                    elapsed_ms = dt.as_millis() as u64,
                    reply_preview = %truncate_for_log(&reply, 200),
                    "Oracle call succeeded"
                );
                Ok(reply)
            }
            Err(e) => {
                warn!(elapsed_ms = dt.as_millis() as u64, error = %e, "Oracle call failed");
                Err(OracleFailure::Transport(e.to_string()))
            }
        }
    }
}
