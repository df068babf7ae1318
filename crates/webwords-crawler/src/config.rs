use std::cmp;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlerConfig {
    /// Wall-clock budget for one crawl, in seconds.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: f64,

    /// Link-hops allowed from a starting URL.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Number of entries kept in the most-frequent-words report.
    #[serde(default = "default_popular_word_count")]
    pub popular_word_count: usize,

    /// Full-match regular expressions for URLs that must not be crawled.
    #[serde(default)]
    pub ignored_urls: Vec<String>,

    /// Cap on concurrently processed pages, 0 meaning all available cores.
    #[serde(default)]
    pub parallelism: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
            max_depth: default_max_depth(),
            popular_word_count: default_popular_word_count(),
            ignored_urls: Vec::new(),
            parallelism: 0,
        }
    }
}

fn default_timeout_seconds() -> f64 {
    2.0
}

fn default_max_depth() -> usize {
    10
}

fn default_popular_word_count() -> usize {
    10
}

impl CrawlerConfig {
    /// Pool width actually used: the configured cap bounded by the number
    /// of available cores, neither limit ever exceeded.
    pub fn effective_parallelism(&self) -> usize {
        let cap = match self.parallelism {
            0 => usize::MAX,
            n => n,
        };
        cmp::max(1, cmp::min(cap, num_cpus::get()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_missing_fields() {
        let conf: CrawlerConfig = serde_json::from_str(r#"{"maxDepth": 3}"#).unwrap();
        assert_eq!(conf.max_depth, 3);
        assert_eq!(conf.timeout_seconds, default_timeout_seconds());
        assert_eq!(conf.popular_word_count, default_popular_word_count());
        assert!(conf.ignored_urls.is_empty());
        assert_eq!(conf.parallelism, 0);
    }

    #[test]
    fn parallelism_never_exceeds_either_bound() {
        let cores = num_cpus::get();

        let conf = CrawlerConfig {
            parallelism: 1,
            ..Default::default()
        };
        assert_eq!(conf.effective_parallelism(), 1);

        let conf = CrawlerConfig {
            parallelism: cores + 100,
            ..Default::default()
        };
        assert_eq!(conf.effective_parallelism(), cores);

        let conf = CrawlerConfig::default();
        assert_eq!(conf.effective_parallelism(), cores);
    }
}
