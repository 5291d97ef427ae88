use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{debug, info};
use url::Url;

use crate::error::{AmplifyError, Result};
use crate::models::InputKind;

pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);
pub const MAX_CONTENT_CHARS: usize = 8000;
pub const TRUNCATION_MARKER: &str = "...";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Elements that never hold article text.
const BOILERPLATE_TAGS: &[&str] = &["script", "style", "nav", "header", "footer", "aside"];

/// Content containers, tried in order.
const CONTENT_SELECTORS: &[&str] = &[
    "article",
    "main",
    "[role=\"main\"]",
    ".post-content",
    ".article-body",
];

static EXCESS_NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());
static EXCESS_SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r" {2,}").unwrap());

/// True if the trimmed input is an absolute http(s) URL with a host.
pub fn is_url(input: &str) -> bool {
    match Url::parse(input.trim()) {
        Ok(url) => {
            matches!(url.scheme(), "http" | "https")
                && url.host_str().is_some_and(|h| !h.is_empty())
        }
        Err(_) => false,
    }
}

pub fn classify(input: &str) -> InputKind {
    if is_url(input) {
        InputKind::Url
    } else {
        InputKind::Text
    }
}

pub struct ContentExtractor {
    client: Client,
}

impl ContentExtractor {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AmplifyError::Fetch(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Classify the input and produce the content to generate from.
    ///
    /// Text is returned trimmed. A URL is fetched once and reduced to its main text;
    /// fetch failures are returned as-is, without retrying.
    pub async fn classify_and_extract(&self, raw_input: &str) -> Result<(InputKind, String)> {
        let input = raw_input.trim();

        match classify(input) {
            InputKind::Url => {
                let content = self.fetch_page_content(input).await?;
                Ok((InputKind::Url, content))
            }
            InputKind::Text => Ok((InputKind::Text, input.to_string())),
        }
    }

    pub async fn fetch_page_content(&self, url: &str) -> Result<String> {
        info!("Fetching {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AmplifyError::Fetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AmplifyError::Fetch(format!("HTTP error {} for {}", status, url)));
        }

        let html = response
            .text()
            .await
            .map_err(|e| AmplifyError::Fetch(format!("Failed to read response body: {}", e)))?;

        let text = extract_main_text(&html);
        debug!("Extracted {} characters from {}", text.chars().count(), url);

        Ok(text)
    }
}

/// Strip boilerplate from an HTML document and return its main text.
pub fn extract_main_text(html: &str) -> String {
    let mut document = Html::parse_document(html);

    for tag in BOILERPLATE_TAGS {
        let Some(selector) = selector(tag) else {
            continue;
        };
        let ids: Vec<_> = document.select(&selector).map(|el| el.id()).collect();
        for id in ids {
            if let Some(mut node) = document.tree.get_mut(id) {
                node.detach();
            }
        }
    }

    let container = CONTENT_SELECTORS
        .iter()
        .chain(std::iter::once(&"body"))
        .filter_map(|css| selector(css))
        .find_map(|sel| document.select(&sel).next())
        .unwrap_or_else(|| document.root_element());

    let text = container
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    truncate(&collapse_whitespace(&text), MAX_CONTENT_CHARS)
}

fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

fn collapse_whitespace(text: &str) -> String {
    let text = EXCESS_NEWLINES.replace_all(text.trim(), "\n\n");
    EXCESS_SPACES.replace_all(&text, " ").into_owned()
}

/// Cut to at most `max_chars` characters, marking the cut.
fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => format!("{}{}", &text[..end], TRUNCATION_MARKER),
        None => text.to_string(),
    }
}
