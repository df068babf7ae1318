use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageConfig {
    /// User agent sent with every page request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Full-match regular expressions for words dropped from the counts.
    #[serde(default)]
    pub ignored_words: Vec<String>,

    /// Per-request timeout, in seconds.
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            ignored_words: Vec::new(),
            request_timeout_seconds: default_request_timeout_seconds(),
        }
    }
}

fn default_user_agent() -> String {
    String::from("WebwordsBot")
}

fn default_request_timeout_seconds() -> u64 {
    30
}
