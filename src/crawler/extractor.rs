//! Per-URL fetch, parse, classify and link extraction

use crate::crawler::classify::Classifier;
use crate::crawler::fetcher::fetch_page;
use crate::crawler::parser::parse_html;
use crate::url::SiteScope;
use reqwest::Client;

/// Everything a worker learns from one page
///
/// An empty title means no record should be produced; soft failures return
/// `Extracted::default()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extracted {
    pub title: String,
    pub category: String,
    pub links: Vec<String>,
}

impl Extracted {
    pub fn has_record(&self) -> bool {
        !self.title.is_empty()
    }
}

/// Fetcher/extractor shared by all workers
#[derive(Debug, Clone)]
pub struct Extractor {
    client: Client,
    scope: SiteScope,
    classifier: Classifier,
    title_suffix: String,
}

impl Extractor {
    pub fn new(
        client: Client,
        scope: SiteScope,
        classifier: Classifier,
        title_suffix: impl Into<String>,
    ) -> Self {
        Self {
            client,
            scope,
            classifier,
            title_suffix: title_suffix.into(),
        }
    }

    /// Fetches `url` and extracts its title, category and outbound links
    ///
    /// Never fails: any fetch error is logged and yields an empty result.
    pub async fn process(&self, url: &str) -> Extracted {
        let body = match fetch_page(&self.client, url).await {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!("Fetch failed for {}: {}", url, e);
                return Extracted::default();
            }
        };

        let parsed = parse_html(&body, &self.scope, &self.title_suffix);
        if parsed.title.is_empty() {
            tracing::debug!("No title on {}, skipping", url);
            return Extracted::default();
        }

        Extracted {
            title: parsed.title,
            category: self.classifier.classify(url).to_string(),
            links: parsed.links,
        }
    }
}
