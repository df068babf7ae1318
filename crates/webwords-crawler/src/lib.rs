mod config;
mod crawler;
mod page;
mod state;

pub use config::CrawlerConfig;
pub use crawler::{crawl, CrawlResult};
pub use page::{PageContent, PageParser};
pub use state::{VisitedSet, WordTally};

pub use anyhow;
pub use async_trait::async_trait;
