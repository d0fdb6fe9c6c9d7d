use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::category::Category;
use super::source::Source;

/// Publication status of an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    Draft,
    Pending,
    Approved,
    /// Shown as "archived" in the moderation UI.
    #[serde(alias = "archived")]
    Rejected,
}

impl ArticleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArticleStatus::Draft => "draft",
            ArticleStatus::Pending => "pending",
            ArticleStatus::Approved => "approved",
            ArticleStatus::Rejected => "rejected",
        }
    }

    /// Label used by the read-facing UI.
    pub fn label(&self) -> &'static str {
        match self {
            ArticleStatus::Rejected => "archived",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for ArticleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown article status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for ArticleStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(ArticleStatus::Draft),
            "pending" => Ok(ArticleStatus::Pending),
            "approved" => Ok(ArticleStatus::Approved),
            "rejected" | "archived" => Ok(ArticleStatus::Rejected),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

/// Article entity - a piece of content moving through moderation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub status: ArticleStatus,
    pub cover_image_path: Option<String>,
    pub cover_image_alt: Option<String>,
    pub reading_time: Option<i32>,
    pub author_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Field values for a not-yet-persisted article.
#[derive(Debug, Clone)]
pub struct NewArticle {
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub status: ArticleStatus,
    pub cover_image_path: Option<String>,
    pub cover_image_alt: Option<String>,
    pub reading_time: Option<i32>,
    pub author_id: Option<Uuid>,
}

impl Article {
    /// Create a new article with generated ID and timestamps.
    pub fn new(fields: NewArticle) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: fields.title,
            slug: fields.slug,
            excerpt: fields.excerpt,
            content: fields.content,
            status: fields.status,
            cover_image_path: fields.cover_image_path,
            cover_image_alt: fields.cover_image_alt,
            reading_time: fields.reading_time,
            author_id: fields.author_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// First field that blocks approval, checked in title, content, excerpt order.
    pub fn missing_for_approval(&self) -> Option<&'static str> {
        if self.title.trim().is_empty() {
            Some("title")
        } else if self.content.trim().is_empty() {
            Some("content")
        } else if self.excerpt.as_deref().is_none_or(|e| e.trim().is_empty()) {
            Some("excerpt")
        } else {
            None
        }
    }
}

/// Full overwrite of the editable columns of an article.
#[derive(Debug, Clone)]
pub struct ArticleChanges {
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub cover_image_path: Option<String>,
    pub cover_image_alt: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// An article with its resolved associations.
#[derive(Debug, Clone, Serialize)]
pub struct ArticleDetail {
    #[serde(flatten)]
    pub article: Article,
    pub categories: Vec<Category>,
    pub sources: Vec<Source>,
}

/// An article as it appears in listings and search results.
#[derive(Debug, Clone, Serialize)]
pub struct ArticleListing {
    #[serde(flatten)]
    pub article: Article,
    pub categories: Vec<Category>,
}

impl ArticleListing {
    pub fn primary_category(&self) -> Option<&Category> {
        self.categories.first()
    }

    /// Public URL path: `/{category}/{slug}`, or `/{slug}` for uncategorised articles.
    pub fn public_path(&self) -> String {
        match self.primary_category() {
            Some(category) => format!("/{}/{}", category.slug, self.article.slug),
            None => format!("/{}", self.article.slug),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(title: &str, content: &str, excerpt: Option<&str>) -> Article {
        Article::new(NewArticle {
            title: title.to_string(),
            slug: "slug".to_string(),
            excerpt: excerpt.map(str::to_string),
            content: content.to_string(),
            status: ArticleStatus::Pending,
            cover_image_path: None,
            cover_image_alt: None,
            reading_time: None,
            author_id: None,
        })
    }

    #[test]
    fn test_status_parses_archived_alias() {
        assert_eq!("archived".parse::<ArticleStatus>(), Ok(ArticleStatus::Rejected));
        assert_eq!("Approved".parse::<ArticleStatus>(), Ok(ArticleStatus::Approved));
        assert!("published".parse::<ArticleStatus>().is_err());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&ArticleStatus::Rejected).unwrap();
        assert_eq!(json, "\"rejected\"");
        assert_eq!(ArticleStatus::Rejected.label(), "archived");
    }

    #[test]
    fn test_missing_for_approval_order() {
        assert_eq!(article("  ", "", None).missing_for_approval(), Some("title"));
        assert_eq!(article("T", " \n", None).missing_for_approval(), Some("content"));
        assert_eq!(article("T", "C", Some("   ")).missing_for_approval(), Some("excerpt"));
        assert_eq!(article("T", "C", None).missing_for_approval(), Some("excerpt"));
        assert_eq!(article("T", "C", Some("E")).missing_for_approval(), None);
    }

    #[test]
    fn test_public_path_uses_first_category() {
        let mut listing = ArticleListing {
            article: article("T", "C", Some("E")),
            categories: vec![],
        };
        assert_eq!(listing.public_path(), "/slug");

        listing.categories.push(Category {
            id: 1,
            name: "Mobile".to_string(),
            slug: "mobile".to_string(),
            description: None,
        });
        assert_eq!(listing.public_path(), "/mobile/slug");
    }
}
