use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Source entity - a reference attached to exactly one article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub id: i32,
    pub article_id: Uuid,
    pub name: Option<String>,
    pub url: Option<String>,
    #[serde(rename = "type")]
    pub source_type: String,
}

/// A source waiting to be attached to an article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSource {
    pub name: Option<String>,
    pub url: Option<String>,
    pub source_type: String,
}

impl NewSource {
    pub const DEFAULT_TYPE: &'static str = "web";

    /// Build a source from raw form values, trimming and dropping blanks.
    pub fn from_raw(name: Option<&str>, url: Option<&str>, source_type: Option<&str>) -> Self {
        fn clean(value: Option<&str>) -> Option<String> {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        }

        Self {
            name: clean(name),
            url: clean(url),
            source_type: clean(source_type).unwrap_or_else(|| Self::DEFAULT_TYPE.to_string()),
        }
    }
}
