use crate::url::normalize_url;
use crate::{UrlError, UrlResult};
use url::Url;

/// The single site a crawl is confined to
///
/// Holds the canonical base URL and the path prefix that marks an article
/// link. An href is followed only if it is a path-rooted reference under
/// that prefix with no namespace colon and no fragment marker.
#[derive(Debug, Clone)]
pub struct SiteScope {
    base: Url,
    host: String,
    article_prefix: String,
}

impl SiteScope {
    /// Builds a scope from the canonical base URL (scheme + host) and the
    /// article path prefix
    pub fn new(base_url: &str, article_prefix: &str) -> UrlResult<Self> {
        let base = normalize_url(base_url)?;
        let host = base.host_str().ok_or(UrlError::MissingHost)?.to_string();

        Ok(Self {
            base,
            host,
            article_prefix: article_prefix.to_string(),
        })
    }

    /// The canonical host links are resolved against
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Resolves an href found on a page to the absolute URL to crawl
    ///
    /// Returns `None` for anything outside the scope:
    /// - absolute or protocol-relative URLs (foreign or not)
    /// - paths outside the article prefix, checked again after dot
    ///   segments are resolved
    /// - namespace pages (any `:` in the href)
    /// - hrefs carrying a fragment (`#`)
    pub fn resolve_link(&self, href: &str) -> Option<String> {
        let href = href.trim();

        if !href.starts_with(&self.article_prefix) || href.starts_with("//") {
            return None;
        }

        if href.contains(':') || href.contains('#') {
            return None;
        }

        let joined = self.base.join(href).ok()?;
        let normalized = normalize_url(joined.as_str()).ok()?;

        if !normalized.path().starts_with(&self.article_prefix) {
            return None;
        }

        self.contains(&normalized).then(|| normalized.to_string())
    }

    /// Returns true if an absolute URL lies on the crawled host
    pub fn contains(&self, url: &Url) -> bool {
        url.host_str() == Some(self.host.as_str()) && url.port() == self.base.port()
    }
}
