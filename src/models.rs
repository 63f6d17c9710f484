// SPDX-License-Identifier: PMPL-1.0-or-later
//! Data models for blog posts and testimonials

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;

/// A record type stored in its own table.
pub trait Record: Serialize + DeserializeOwned + Send + Sync {
    /// Table name in the document store
    const TABLE: &'static str;

    fn created_at(&self) -> DateTime<Utc>;
}

/// Blog post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    /// Unique post identifier
    pub id: String,
    pub title: String,
    pub content: String,
    pub author: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl BlogPost {
    /// Create a new post with a fresh id and timestamps
    pub fn new(title: String, content: String, author: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title,
            content,
            author,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Record for BlogPost {
    const TABLE: &'static str = "portfolio-blog-posts";

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Body of `POST /blog`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewBlogPost {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
}

/// Updatable blog post fields
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPostPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

/// Testimonial. New testimonials start unapproved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Testimonial {
    pub id: String,
    pub author: String,
    pub content: String,
    #[serde(default)]
    pub title: String,
    pub approved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Testimonial {
    pub fn new(author: String, content: String, title: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            author,
            content,
            title,
            approved: false,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Record for Testimonial {
    const TABLE: &'static str = "portfolio-testimonials";

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Body of `POST /testimonials`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewTestimonial {
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

/// Updatable testimonial fields
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestimonialPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved: Option<bool>,
}
