// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Keyword and link-density content policy for contact submissions.
//!
//! Runs on sanitized text. Keywords are matched case-insensitively as plain
//! substrings anywhere in the subject or message; links are counted in the
//! message only.

use crate::config::SpamConfig;
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::debug;

fn url_pattern() -> &'static Regex {
    static URL: OnceLock<Regex> = OnceLock::new();
    URL.get_or_init(|| Regex::new(r"https?://\S+").expect("url pattern is valid"))
}

/// Why a submission was flagged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContentPolicyError {
    #[error("Your message contains prohibited content")]
    ProhibitedContent { keyword: String },

    #[error("Your message contains too many links")]
    ExcessiveLinks { found: usize, allowed: usize },
}

/// Result of classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Clean,
    Flagged(ContentPolicyError),
}

impl Classification {
    pub fn is_clean(&self) -> bool {
        matches!(self, Classification::Clean)
    }
}

/// Spam classifier with adjustable keyword list and link threshold.
pub struct SpamClassifier {
    keywords: Vec<String>,
    max_links: usize,
}

impl SpamClassifier {
    pub fn new(config: SpamConfig) -> Self {
        let keywords = config
            .keywords
            .into_iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();

        Self {
            keywords,
            max_links: config.max_links,
        }
    }

    /// First prohibited keyword contained in `text`, if any.
    pub fn find_keyword(&self, text: &str) -> Option<&str> {
        let lower = text.to_lowercase();
        self.keywords
            .iter()
            .find(|k| lower.contains(k.as_str()))
            .map(String::as_str)
    }

    pub fn count_links(text: &str) -> usize {
        url_pattern().find_iter(text).count()
    }

    /// Classify a sanitized subject and message.
    pub fn classify(&self, subject: &str, message: &str) -> Classification {
        if let Some(keyword) = self
            .find_keyword(message)
            .or_else(|| self.find_keyword(subject))
        {
            debug!(keyword, "Prohibited keyword found");
            return Classification::Flagged(ContentPolicyError::ProhibitedContent {
                keyword: keyword.to_string(),
            });
        }

        let found = Self::count_links(message);
        if found > self.max_links {
            debug!(found, allowed = self.max_links, "Too many links");
            return Classification::Flagged(ContentPolicyError::ExcessiveLinks {
                found,
                allowed: self.max_links,
            });
        }

        Classification::Clean
    }
}
