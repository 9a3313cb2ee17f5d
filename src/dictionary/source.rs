use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;

use super::extract;

/// What one source produced for a word
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOutcome {
    /// One or more definition candidates, deduplicated
    Found(Vec<String>),
    /// The page loaded but nothing on it looked like a meaning
    NoMatch,
    /// Network error, timeout, non-200 status or unreadable body
    Failed(String),
}

/// A dictionary site that can be asked for a word.
#[async_trait]
pub trait Source: Send + Sync {
    /// Short label for logs
    fn name(&self) -> &str;

    async fn fetch(&self, word: &str) -> SourceOutcome;
}

/// A source backed by a URL template with a `{word}` placeholder.
pub struct HttpSource {
    client: Client,
    template: String,
}

impl HttpSource {
    /// `client` carries the timeout and User-Agent for every request.
    pub fn new(client: Client, template: impl Into<String>) -> Self {
        Self {
            client,
            template: template.into(),
        }
    }

    /// The page URL for `word`, form-urlencoded (space becomes `+`).
    pub fn url_for(&self, word: &str) -> String {
        let encoded: String = url::form_urlencoded::byte_serialize(word.as_bytes()).collect();
        self.template.replace("{word}", &encoded)
    }

    async fn get_html(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Request to {} failed", url))?;

        let status = response.status();
        if status != StatusCode::OK {
            bail!("{} returned {}", url, status);
        }

        response
            .text()
            .await
            .with_context(|| format!("Failed to read body from {}", url))
    }
}

#[async_trait]
impl Source for HttpSource {
    fn name(&self) -> &str {
        &self.template
    }

    async fn fetch(&self, word: &str) -> SourceOutcome {
        let url = self.url_for(word);
        debug!("Fetching {}", url);

        let html = match self.get_html(&url).await {
            Ok(html) => html,
            Err(e) => return SourceOutcome::Failed(format!("{:#}", e)),
        };

        let candidates = extract::collect_candidates(&html);
        if candidates.is_empty() {
            SourceOutcome::NoMatch
        } else {
            SourceOutcome::Found(candidates)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use std::time::Duration;

    fn client() -> Client {
        Client::builder()
            .timeout(Duration::from_secs(2))
            .user_agent("test-agent")
            .build()
            .unwrap()
    }

    #[test]
    fn test_url_for_percent_encodes_word() {
        let source = HttpSource::new(client(), "https://www.vajehyab.com/dehkhoda/{word}");
        assert_eq!(
            source.url_for("آسمان"),
            "https://www.vajehyab.com/dehkhoda/%D8%A2%D8%B3%D9%85%D8%A7%D9%86"
        );
    }

    #[test]
    fn test_url_for_encodes_spaces_and_reserved_chars() {
        let source = HttpSource::new(client(), "https://example.com/?q={word}&pv=dehkhoda");
        assert_eq!(
            source.url_for("a b&c"),
            "https://example.com/?q=a+b%26c&pv=dehkhoda"
        );
    }

    #[tokio::test]
    async fn test_fetch_found_sends_user_agent() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", Matcher::Regex(r"^/dehkhoda/".to_string()))
            .match_header("user-agent", "test-agent")
            .with_status(200)
            .with_header("content-type", "text/html; charset=utf-8")
            .with_body(r#"<div class="meaning"><p>کتاب: نوشته‌ای که صحافی شده باشد.</p></div>"#)
            .create_async()
            .await;

        let source = HttpSource::new(client(), format!("{}/dehkhoda/{{word}}", server.url()));
        let outcome = source.fetch("کتاب").await;

        mock.assert_async().await;
        match outcome {
            SourceOutcome::Found(candidates) => {
                assert_eq!(candidates[0], "کتاب: نوشته‌ای که صحافی شده باشد.");
            }
            other => panic!("expected Found, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_non_200_is_failure() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", Matcher::Any)
            .with_status(500)
            .with_body(r#"<p>خطای داخلی سرور رخ داده است</p>"#)
            .create_async()
            .await;

        let source = HttpSource::new(client(), format!("{}/{{word}}", server.url()));
        match source.fetch("کتاب").await {
            SourceOutcome::Failed(reason) => assert!(reason.contains("500")),
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_page_without_meaning_is_no_match() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", Matcher::Any)
            .with_status(200)
            .with_body("<html><body><p>Nothing to see here at all.</p></body></html>")
            .create_async()
            .await;

        let source = HttpSource::new(client(), format!("{}/{{word}}", server.url()));
        assert_eq!(source.fetch("کتاب").await, SourceOutcome::NoMatch);
    }

    #[tokio::test]
    async fn test_fetch_connection_error_is_failure() {
        // Nothing listens on port 9 (discard) on test machines
        let source = HttpSource::new(client(), "http://127.0.0.1:9/{word}");
        assert!(matches!(source.fetch("کتاب").await, SourceOutcome::Failed(_)));
    }
}
