use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;
use select::document::Document;
use select::node::Node;
use select::predicate::{Name, Text};
use url::Url;
use webwords_crawler::PageContent;

lazy_static! {
    static ref WORD_RE: Regex = Regex::new(r"[\p{L}\p{N}]+").unwrap();
}

/// Dissects a fetched page into lowercased word counts and absolute
/// outbound links.
pub(crate) fn extract_content(page_url: &str, html: &str, ignored_words: &[Regex]) -> PageContent {
    let document = Document::from(html);
    let base = Url::parse(page_url).ok();

    PageContent {
        word_counts: count_words(&document, ignored_words),
        links: extract_links(base.as_ref(), &document),
    }
}

fn count_words(document: &Document, ignored_words: &[Regex]) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for node in document.find(Text) {
        if in_non_content_element(&node) {
            continue;
        }
        let Some(text) = node.as_text() else { continue };
        for token in WORD_RE.find_iter(&text.to_lowercase()) {
            let word = token.as_str();
            if ignored_words.iter().any(|re| re.is_match(word)) {
                continue;
            }
            *counts.entry(word.to_string()).or_insert(0) += 1;
        }
    }
    counts
}

fn in_non_content_element(node: &Node) -> bool {
    node.parent()
        .and_then(|parent| parent.name().map(|name| matches!(name, "script" | "style")))
        .unwrap_or(false)
}

fn extract_links(base: Option<&Url>, document: &Document) -> Vec<String> {
    document
        .find(Name("a"))
        .filter_map(|node| node.attr("href"))
        .filter_map(|href| resolve(base, href))
        .collect()
}

fn resolve(base: Option<&Url>, href: &str) -> Option<String> {
    let mut resolved = match base {
        Some(base) => base.join(href).ok()?,
        None => Url::parse(href).ok()?,
    };
    if !matches!(resolved.scheme(), "http" | "https") {
        return None;
    }
    resolved.set_fragment(None);
    Some(resolved.to_string())
}
