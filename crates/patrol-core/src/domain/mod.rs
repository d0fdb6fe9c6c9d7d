//! Domain entities - the core business objects.

mod admin;
mod article;
mod author;
mod category;
mod source;
pub mod text;

pub use admin::Admin;
pub use article::{
    Article, ArticleChanges, ArticleDetail, ArticleListing, ArticleStatus, NewArticle,
    UnknownStatus,
};
pub use author::Author;
pub use category::{Category, DEFAULT_CATEGORIES};
pub use source::{NewSource, Source};
