//! URL-based page classification
//!
//! An ordered list of keyword rules checked against the lower-cased URL.
//! The first rule with any matching keyword names the category; otherwise
//! the default label applies. The result depends on the URL alone.

use crate::config::{CategoryRule, ClassifierConfig};

/// Stateless, total mapping from URL to category label
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<CategoryRule>,
    default: String,
}

impl Classifier {
    pub fn new(rules: Vec<CategoryRule>, default: impl Into<String>) -> Self {
        let rules = rules
            .into_iter()
            .map(|rule| CategoryRule {
                label: rule.label,
                keywords: rule.keywords.iter().map(|k| k.to_lowercase()).collect(),
            })
            .collect();

        Self {
            rules,
            default: default.into(),
        }
    }

    pub fn from_config(config: &ClassifierConfig) -> Self {
        Self::new(config.rules.clone(), config.default.clone())
    }

    pub fn classify(&self, url: &str) -> &str {
        let lower = url.to_lowercase();

        self.rules
            .iter()
            .find(|rule| rule.keywords.iter().any(|k| lower.contains(k.as_str())))
            .map(|rule| rule.label.as_str())
            .unwrap_or(&self.default)
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::from_config(&ClassifierConfig::default())
    }
}
