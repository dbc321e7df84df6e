//! The generic storage row every content instance is persisted in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Publication status of a content row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentStatus {
    #[default]
    Draft,
    Published,
}

/// One stored content instance. The field data is opaque text produced by
/// the serializer and replaced wholesale on every update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRow {
    pub id: Ulid,
    pub slug: String,
    pub title: String,
    /// Identifier of the content type the row conforms to.
    pub content_type: String,
    pub json_content: String,
    #[serde(default)]
    pub status: ContentStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}

impl ContentRow {
    /// A new draft with a generated id and a slug derived from the title.
    pub fn new_draft(
        title: impl Into<String>,
        content_type: impl Into<String>,
        json_content: impl Into<String>,
    ) -> Self {
        let id = Ulid::new();
        let title = title.into();
        let mut slug = slugify(&title);
        if slug.is_empty() {
            slug = id.to_string().to_lowercase();
        }
        Self {
            id,
            slug,
            title,
            content_type: content_type.into(),
            json_content: json_content.into(),
            status: ContentStatus::Draft,
            created_at: Utc::now(),
            updated_at: None,
            published_at: None,
        }
    }

    /// Replace the serialized field data.
    pub fn replace_content(&mut self, json_content: impl Into<String>) {
        self.json_content = json_content.into();
        self.updated_at = Some(Utc::now());
    }

    pub fn publish(&mut self) {
        self.status = ContentStatus::Published;
        self.published_at = Some(Utc::now());
    }

    pub fn unpublish(&mut self) {
        self.status = ContentStatus::Draft;
    }

    pub fn is_published(&self) -> bool {
        self.status == ContentStatus::Published
    }
}

/// Lowercase ASCII letters and digits joined by single dashes.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}
