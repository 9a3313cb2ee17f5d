pub mod extract;
pub mod source;

use anyhow::{Context, Result};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::LookupConfig;
use crate::dictionary::source::{HttpSource, Source, SourceOutcome};

/// Returned when no source yields a candidate.
pub const NOT_FOUND: &str = "معنی‌ای در منابع قابل‌دسترسی پیدا نشد.";

/// Returned for a blank word; no source is contacted.
pub const EMPTY_WORD: &str = "کلمه‌ای برای جستجو داده نشده.";

/// Looks words up across an ordered list of sources.
pub struct Dictionary {
    sources: Vec<Box<dyn Source>>,
    max_chars: usize,
    deadline: Duration,
}

impl Dictionary {
    pub fn new(sources: Vec<Box<dyn Source>>, max_chars: usize, deadline: Duration) -> Self {
        Self {
            sources,
            max_chars,
            deadline,
        }
    }

    /// Build HTTP sources sharing one client with the configured timeout and User-Agent.
    pub fn from_config(config: &LookupConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .context("Failed to build HTTP client")?;

        let sources = config
            .sources
            .iter()
            .map(|template| Box::new(HttpSource::new(client.clone(), template)) as Box<dyn Source>)
            .collect();

        Ok(Self::new(
            sources,
            config.max_chars,
            Duration::from_secs(config.deadline_secs),
        ))
    }

    /// Best-guess definition for `word`, or [`NOT_FOUND`]. Never fails.
    pub async fn define(&self, word: &str) -> String {
        let word = word.trim();
        if word.is_empty() {
            return EMPTY_WORD.to_string();
        }

        match tokio::time::timeout(self.deadline, self.first_match(word)).await {
            Ok(Some(meaning)) => meaning,
            Ok(None) => {
                info!("No source had a meaning for '{}'", word);
                NOT_FOUND.to_string()
            }
            Err(_) => {
                warn!(
                    "Lookup for '{}' exceeded {}s across all sources",
                    word,
                    self.deadline.as_secs_f32()
                );
                NOT_FOUND.to_string()
            }
        }
    }

    /// Try sources in order; the first one with any candidate decides the result.
    async fn first_match(&self, word: &str) -> Option<String> {
        for source in &self.sources {
            match source.fetch(word).await {
                SourceOutcome::Found(candidates) => {
                    let count = candidates.len();
                    if let Some(best) = extract::pick_longest(candidates) {
                        debug!("{} gave {} candidate(s) for '{}'", source.name(), count, word);
                        return Some(extract::truncate_chars(&best, self.max_chars));
                    }
                }
                SourceOutcome::NoMatch => {
                    debug!("{}: no meaning-like text for '{}'", source.name(), word);
                }
                SourceOutcome::Failed(reason) => {
                    debug!("{}: skipped ({})", source.name(), reason);
                }
            }
        }
        None
    }
}
