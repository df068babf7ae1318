use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use webwords_crawler::CrawlerConfig;
use webwords_page::PageConfig;

/// One crawl job as described by a JSON configuration file. Engine and
/// page-parser settings are flattened, so a file reads as one flat object:
///
/// ```json
/// {
///   "startPages": ["https://example.com/"],
///   "ignoredUrls": ["https://example\\.com/private/.*"],
///   "ignoredWords": ["^.{1,3}$"],
///   "maxDepth": 10,
///   "timeoutSeconds": 2.0,
///   "popularWordCount": 3,
///   "parallelism": 4,
///   "resultPath": "crawlResults.json",
///   "profileOutputPath": "profileData.txt"
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobConfig {
    #[serde(default)]
    pub start_pages: Vec<String>,

    #[serde(flatten)]
    pub crawler: CrawlerConfig,

    #[serde(flatten)]
    pub page: PageConfig,

    /// Crawl report destination; stdout when unset.
    #[serde(default)]
    pub result_path: Option<PathBuf>,

    /// Profiling report destination (appended to); stdout when unset.
    #[serde(default)]
    pub profile_output_path: Option<PathBuf>,
}
