use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use regex::Regex;
use reqwest::header::{HeaderValue, CONTENT_TYPE, USER_AGENT};
use webwords_crawler::{PageContent, PageParser};
use webwords_profiler::ProfiledTarget;

use crate::config::PageConfig;
use crate::extract::extract_content;

/// Fetches pages over HTTP and extracts their words and outbound links.
///
/// Unreachable pages, error statuses and non-HTML bodies are reported as
/// empty content so a dead link never aborts a crawl.
pub struct HttpParser {
    client: reqwest::Client,
    user_agent: String,
    ignored_words: Vec<Regex>,
}

impl HttpParser {
    pub fn new(config: &PageConfig) -> Result<Self> {
        let client = reqwest::ClientBuilder::new()
            .gzip(true)
            .deflate(true)
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()?;
        let ignored_words = config
            .ignored_words
            .iter()
            .map(|pattern| {
                Regex::new(&format!("^(?:{pattern})$"))
                    .with_context(|| format!("Invalid ignored word pattern: {pattern}"))
            })
            .collect::<Result<_>>()?;

        Ok(Self {
            client,
            user_agent: config.user_agent.clone(),
            ignored_words,
        })
    }
}

#[async_trait]
impl PageParser for HttpParser {
    async fn parse(&self, url: &str) -> Result<PageContent> {
        let resp = match self
            .client
            .get(url)
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                log::warn!("Skipping {url}: {e}");
                return Ok(PageContent::default());
            }
        };
        if !resp.status().is_success() {
            log::debug!("Skipping {url}: HTTP {}", resp.status());
            return Ok(PageContent::default());
        }
        if !is_html(resp.headers().get(CONTENT_TYPE)) {
            log::debug!("Skipping {url}: not an HTML page");
            return Ok(PageContent::default());
        }
        let html = match resp.text().await {
            Ok(html) => html,
            Err(e) => {
                log::warn!("Skipping {url}: {e}");
                return Ok(PageContent::default());
            }
        };

        Ok(extract_content(url, &html, &self.ignored_words))
    }
}

fn is_html(content_type: Option<&HeaderValue>) -> bool {
    match content_type {
        Some(value) => value.to_str().map(|v| v.contains("html")).unwrap_or(false),
        None => true,
    }
}

impl ProfiledTarget for HttpParser {
    const TARGET: &'static str = "HttpParser";
    const PROFILED_METHODS: &'static [&'static str] = &["parse"];
}
