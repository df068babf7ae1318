use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use futures::future::BoxFuture;
use regex::Regex;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::config::CrawlerConfig;
use crate::page::PageParser;
use crate::state::{VisitedSet, WordTally};

/// Aggregate outcome of one crawl.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlResult {
    /// Most frequent words in rank order: count descending, then word
    /// ascending. Serializes as a JSON object in that order.
    #[serde(serialize_with = "ser_ranked_counts")]
    pub word_counts: Vec<(String, usize)>,
    pub urls_visited: usize,
}

fn ser_ranked_counts<S>(counts: &[(String, usize)], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut map = serializer.serialize_map(Some(counts.len()))?;
    for (word, count) in counts {
        map.serialize_entry(word, count)?;
    }
    map.end()
}

/// State shared by every task of one crawl invocation. A fresh instance is
/// built per [`crawl`] call, so concurrent crawls never interfere.
struct CrawlState<P> {
    deadline: Instant,
    ignored: Vec<Regex>,
    visited: VisitedSet,
    tally: WordTally,
    permits: Semaphore,
    parser: Arc<P>,
}

/// Crawls `starting_urls` down to `config.max_depth` link-hops within the
/// configured wall-clock budget and reduces the accumulated word counts to
/// the `config.popular_word_count` most frequent ones.
///
/// Must run inside a tokio runtime: page tasks are spawned onto it and
/// fan out up to [`CrawlerConfig::effective_parallelism`] concurrent
/// parses. An error from the parser aborts the crawl and is returned
/// unchanged.
pub async fn crawl<P>(
    starting_urls: &[String],
    config: &CrawlerConfig,
    parser: Arc<P>,
) -> Result<CrawlResult>
where
    P: PageParser,
{
    let ignored = compile_full_match(&config.ignored_urls)?;
    let deadline = Instant::now() + Duration::from_secs_f64(config.timeout_seconds);

    let state = Arc::new(CrawlState {
        deadline,
        ignored,
        visited: VisitedSet::default(),
        tally: WordTally::default(),
        permits: Semaphore::new(config.effective_parallelism()),
        parser,
    });

    let mut roots = JoinSet::new();
    for url in starting_urls {
        roots.spawn(crawl_task(state.clone(), url.clone(), config.max_depth));
    }
    while let Some(finished) = roots.join_next().await {
        finished??;
    }

    let word_counts = if state.tally.is_empty() {
        Vec::new()
    } else {
        state.tally.top(config.popular_word_count)
    };

    Ok(CrawlResult {
        word_counts,
        urls_visited: state.visited.len(),
    })
}

/// One unit of work: crawl `url` with `depth` hops remaining, then the
/// subtree reachable from it. Completes only once every transitively
/// spawned child has completed.
fn crawl_task<P>(
    state: Arc<CrawlState<P>>,
    url: String,
    depth: usize,
) -> BoxFuture<'static, Result<()>>
where
    P: PageParser,
{
    Box::pin(async move {
        if depth == 0 || Instant::now() >= state.deadline {
            return Ok(());
        }
        if state.ignored.iter().any(|re| re.is_match(&url)) {
            log::debug!("Ignoring {url}");
            return Ok(());
        }
        if !state.visited.claim(&url) {
            return Ok(());
        }

        // The permit bounds in-flight parses; it is not held over the
        // tally merge or the child spawns.
        let content = {
            let _permit = state.permits.acquire().await?;
            state.parser.parse(&url).await?
        };

        for (word, count) in &content.word_counts {
            state.tally.add(word, *count);
        }

        let mut children = JoinSet::new();
        for link in content.links {
            children.spawn(crawl_task(state.clone(), link, depth - 1));
        }
        while let Some(finished) = children.join_next().await {
            finished??;
        }

        Ok(())
    })
}

/// Ignored-URL patterns exclude a page only when they match the whole URL,
/// so each one is anchored before use.
fn compile_full_match(patterns: &[String]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(&format!("^(?:{pattern})$"))
                .with_context(|| format!("Invalid ignored URL pattern: {pattern}"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignored_patterns_match_the_whole_url_only() {
        let patterns = compile_full_match(&[r"https://example\.com/skip.*".to_string()]).unwrap();
        assert!(patterns[0].is_match("https://example.com/skip/me"));
        assert!(!patterns[0].is_match("prefix https://example.com/skip/me"));

        let patterns = compile_full_match(&["skip".to_string()]).unwrap();
        assert!(!patterns[0].is_match("https://example.com/skip/me"));
        assert!(patterns[0].is_match("skip"));
    }

    #[test]
    fn bad_pattern_is_a_setup_error() {
        assert!(compile_full_match(&["(".to_string()]).is_err());
    }

    #[test]
    fn result_serializes_counts_as_ordered_map() {
        let result = CrawlResult {
            word_counts: vec![("the".to_string(), 12), ("and".to_string(), 7)],
            urls_visited: 3,
        };
        assert_eq!(
            serde_json::to_string(&result).unwrap(),
            r#"{"wordCounts":{"the":12,"and":7},"urlsVisited":3}"#
        );
    }
}
