//! SeaORM entities for the content tables.

pub mod admin;
pub mod article;
pub mod article_category;
pub mod author;
pub mod category;
pub mod source;
