use serde::Deserialize;

/// Main configuration structure for Lantern Crawl
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    pub site: SiteConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
}

/// Worker pool, frontier and stop-condition settings
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CrawlerConfig {
    /// Number of concurrent workers
    pub workers: usize,

    /// Maximum number of URLs waiting in the frontier queue
    pub queue_capacity: usize,

    /// Timeout for a single page fetch (seconds)
    pub request_timeout_secs: u64,

    /// Wall-clock limit for the whole run (seconds)
    pub run_timeout_secs: u64,

    /// Stop once this many records have been persisted
    pub max_records: u64,

    /// Interval between throughput reports (seconds)
    pub monitor_interval_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            workers: 100,
            queue_capacity: 100_000,
            request_timeout_secs: 5,
            run_timeout_secs: 600,
            max_records: 1_000_000,
            monitor_interval_secs: 5,
        }
    }
}

/// The single site being crawled
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SiteConfig {
    /// Canonical scheme + host that relative links are resolved against
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Only hrefs starting with this path are followed
    #[serde(default = "default_article_prefix")]
    pub article_prefix: String,

    /// Suffix removed from page titles when present
    #[serde(default = "default_title_suffix")]
    pub title_suffix: String,

    /// Pages the crawl starts from
    pub seeds: Vec<String>,
}

fn default_base_url() -> String {
    "https://en.wikipedia.org".to_string()
}

fn default_article_prefix() -> String {
    "/wiki/".to_string()
}

fn default_title_suffix() -> String {
    " - Wikipedia".to_string()
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    pub crawler_name: String,

    /// Version of the crawler
    pub crawler_version: String,

    /// URL with information about the crawler
    pub contact_url: String,

    /// Email address for crawler-related contact
    pub contact_email: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "LanternCrawl".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://example.com/lantern".to_string(),
            contact_email: "crawler@example.com".to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the `User-Agent` header value
    ///
    /// Format: `CrawlerName/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    pub database_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            database_path: "./lantern.db".to_string(),
        }
    }
}

/// Category rules applied to every crawled URL
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ClassifierConfig {
    /// Label used when no rule matches
    #[serde(default = "default_category")]
    pub default: String,

    /// Ordered rules; the first one with a matching keyword wins
    #[serde(default = "default_rules")]
    pub rules: Vec<CategoryRule>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            default: default_category(),
            rules: default_rules(),
        }
    }
}

/// One classification rule: any keyword found in the lower-cased URL selects `label`
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CategoryRule {
    pub label: String,
    pub keywords: Vec<String>,
}

impl CategoryRule {
    pub fn new(label: &str, keywords: &[&str]) -> Self {
        Self {
            label: label.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

fn default_category() -> String {
    "Programming".to_string()
}

fn default_rules() -> Vec<CategoryRule> {
    vec![
        CategoryRule::new("Programming Languages", &["programming", "language"]),
        CategoryRule::new("Algorithms", &["algorithm", "data_structure"]),
        CategoryRule::new("Databases", &["database", "sql"]),
        CategoryRule::new("Web Development", &["web", "framework"]),
        CategoryRule::new("AI/ML", &["machine_learning", "ai"]),
    ]
}
