use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub lookup: LookupConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TelegramConfig {
    /// Usually supplied through `TELEGRAM_TOKEN` rather than the file
    #[serde(default)]
    pub bot_token: String,
    #[serde(default = "default_group_tag")]
    pub group_tag: String,
    #[serde(default = "default_trigger")]
    pub trigger: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            group_tag: default_group_tag(),
            trigger: default_trigger(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LookupConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Bound on one whole lookup across all sources
    #[serde(default = "default_deadline_secs")]
    pub deadline_secs: u64,
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
    /// URL templates tried in order; `{word}` is replaced by the encoded query
    #[serde(default = "default_sources")]
    pub sources: Vec<String>,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            deadline_secs: default_deadline_secs(),
            max_chars: default_max_chars(),
            sources: default_sources(),
        }
    }
}

fn default_group_tag() -> String {
    "@iran9897".to_string()
}

fn default_trigger() -> String {
    "دهخدا".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (compatible)".to_string()
}

fn default_timeout_secs() -> u64 {
    8
}

fn default_deadline_secs() -> u64 {
    30
}

fn default_max_chars() -> usize {
    3000
}

fn default_sources() -> Vec<String> {
    vec![
        "https://www.vajehyab.com/dehkhoda/{word}".to_string(),
        "https://www.vajehyab.com/?q={word}&pv=dehkhoda".to_string(),
        "https://www.loghatnameh.org/{word}".to_string(),
    ]
}

impl Config {
    /// Load configuration for the process.
    ///
    /// Reads the TOML file at `path` when it exists (a missing file is only an
    /// error when `required` is set), then applies environment overrides and
    /// validates the result.
    pub fn load(path: &Path, required: bool) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            Self::parse(&content)?
        } else if required {
            bail!("Config file not found: {}", path.display());
        } else {
            Config::default()
        };

        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config file")
    }

    /// Apply `TELEGRAM_TOKEN`, `GROUP_TAG` and `USER_AGENT` on top of file values.
    pub fn apply_env<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        if let Some(token) = non_empty("TELEGRAM_TOKEN") {
            self.telegram.bot_token = token;
        }
        if let Some(tag) = non_empty("GROUP_TAG") {
            self.telegram.group_tag = tag;
        }
        if let Some(agent) = non_empty("USER_AGENT") {
            self.lookup.user_agent = agent;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.telegram.bot_token.trim().is_empty() {
            bail!("TELEGRAM_TOKEN environment variable is not set");
        }
        if self.telegram.trigger.trim().is_empty() {
            bail!("telegram.trigger must not be empty");
        }
        if self.lookup.timeout_secs == 0 || self.lookup.deadline_secs == 0 {
            bail!("lookup.timeout_secs and lookup.deadline_secs must be positive");
        }
        if self.lookup.sources.is_empty() {
            bail!("lookup.sources must list at least one URL template");
        }
        if let Some(bad) = self.lookup.sources.iter().find(|s| !s.contains("{word}")) {
            bail!("Source template is missing the {{word}} placeholder: {}", bad);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.telegram.group_tag, "@iran9897");
        assert_eq!(config.telegram.trigger, "دهخدا");
        assert_eq!(config.lookup.user_agent, "Mozilla/5.0 (compatible)");
        assert_eq!(config.lookup.timeout_secs, 8);
        assert_eq!(config.lookup.max_chars, 3000);
        assert_eq!(config.lookup.sources.len(), 3);
        assert!(config.lookup.sources[0].starts_with("https://www.vajehyab.com/dehkhoda/"));
    }

    #[test]
    fn test_missing_token_fails_validation() {
        let mut config = Config::default();
        config.apply_env(env(&[]));
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("TELEGRAM_TOKEN"));
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config = Config::parse(
            r#"
[telegram]
bot_token = "from-file"
group_tag = "@file_tag"

[lookup]
timeout_secs = 5
"#,
        )
        .unwrap();
        config.apply_env(env(&[
            ("TELEGRAM_TOKEN", "from-env"),
            ("USER_AGENT", "test-agent/1.0"),
        ]));

        assert_eq!(config.telegram.bot_token, "from-env");
        assert_eq!(config.telegram.group_tag, "@file_tag");
        assert_eq!(config.lookup.user_agent, "test-agent/1.0");
        assert_eq!(config.lookup.timeout_secs, 5);
        assert_eq!(config.lookup.deadline_secs, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_blank_env_value_is_ignored() {
        let mut config = Config::default();
        config.apply_env(env(&[("TELEGRAM_TOKEN", "t"), ("GROUP_TAG", "  ")]));
        assert_eq!(config.telegram.group_tag, "@iran9897");
    }

    #[test]
    fn test_source_without_placeholder_rejected() {
        let mut config = Config::parse(
            r#"
[lookup]
sources = ["https://example.com/static"]
"#,
        )
        .unwrap();
        config.apply_env(env(&[("TELEGRAM_TOKEN", "t")]));
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("{word}"));
    }

    #[test]
    fn test_missing_required_file_is_error() {
        let path = Path::new("/nonexistent/dehkhoda-bot/config.toml");
        assert!(Config::load(path, true).is_err());
    }
}
