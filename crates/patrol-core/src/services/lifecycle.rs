//! Moderation actions an admin can apply to an article.

use std::str::FromStr;

use crate::domain::{Article, ArticleStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleAction {
    Approve,
    Reject,
    Unpublish,
    Delete,
}

impl LifecycleAction {
    /// Status the action moves an article to. `None` for `Delete`.
    pub fn target_status(&self) -> Option<ArticleStatus> {
        match self {
            LifecycleAction::Approve => Some(ArticleStatus::Approved),
            LifecycleAction::Reject => Some(ArticleStatus::Rejected),
            LifecycleAction::Unpublish => Some(ArticleStatus::Pending),
            LifecycleAction::Delete => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid action: {0}")]
pub struct UnknownAction(pub String);

impl FromStr for LifecycleAction {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approve" => Ok(LifecycleAction::Approve),
            "reject" => Ok(LifecycleAction::Reject),
            "unpublish" => Ok(LifecycleAction::Unpublish),
            "delete" => Ok(LifecycleAction::Delete),
            other => Err(UnknownAction(other.to_string())),
        }
    }
}

/// Result of applying a [`LifecycleAction`].
#[derive(Debug, Clone)]
pub enum TransitionOutcome {
    Updated(Article),
    Deleted,
}
