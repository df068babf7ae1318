use std::collections::HashMap;

use async_trait::async_trait;

/// Words and outbound links extracted from a single page.
#[derive(Debug, Clone, Default)]
pub struct PageContent {
    pub word_counts: HashMap<String, usize>,
    pub links: Vec<String>,
}

/// The crawl engine's view of page fetching and dissection.
///
/// Ordinary fetch failures (timeouts, error statuses, unparsable bodies)
/// must come back as an empty [`PageContent`], not as an error; an `Err`
/// aborts the whole crawl. The engine calls [`parse`](Self::parse) at most
/// once per distinct URL of one crawl.
#[async_trait]
pub trait PageParser: Send + Sync + 'static {
    async fn parse(&self, url: &str) -> anyhow::Result<PageContent>;
}
