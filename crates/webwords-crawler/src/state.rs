use dashmap::{DashMap, DashSet};

/// URLs already claimed by some task of the current crawl.
#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: DashSet<String>,
}

impl VisitedSet {
    /// Claims `url` for the caller, granting it the exclusive right to
    /// fetch the page. Returns `false` when another task got there first;
    /// the membership check and the insertion are a single atomic step.
    pub fn claim(&self, url: &str) -> bool {
        self.urls.insert(url.to_string())
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

/// Crawl-wide word counts merged from every parsed page.
#[derive(Debug, Default)]
pub struct WordTally {
    counts: DashMap<String, usize>,
}

impl WordTally {
    /// Adds `n` occurrences of `word`. The read-modify-write happens under
    /// the word's shard lock, so concurrent contributions never get lost.
    pub fn add(&self, word: &str, n: usize) {
        *self.counts.entry(word.to_string()).or_insert(0) += n;
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// The `n` most frequent words, counts descending, ties broken by the
    /// word ascending. Pure function of the accumulated state.
    pub fn top(&self, n: usize) -> Vec<(String, usize)> {
        let mut entries: Vec<(String, usize)> = self
            .counts
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect();
        entries.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        entries.truncate(n);
        entries
    }
}
