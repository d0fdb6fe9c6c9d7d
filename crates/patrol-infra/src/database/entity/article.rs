//! Article entity for SeaORM.

use std::str::FromStr;

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use patrol_core::domain::ArticleStatus;
use patrol_core::error::RepoError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "articles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub excerpt: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub status: String,
    pub cover_image_path: Option<String>,
    pub cover_image_alt: Option<String>,
    pub reading_time: Option<i32>,
    pub author_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::article_category::Entity")]
    ArticleCategory,
    #[sea_orm(has_many = "super::source::Entity")]
    Source,
}

impl Related<super::article_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ArticleCategory.def()
    }
}

impl Related<super::source::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Source.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        super::article_category::Relation::Category.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::article_category::Relation::Article.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Article.
impl TryFrom<Model> for patrol_core::domain::Article {
    type Error = RepoError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let status =
            ArticleStatus::from_str(&model.status).map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(Self {
            id: model.id,
            title: model.title,
            slug: model.slug,
            excerpt: model.excerpt,
            content: model.content,
            status,
            cover_image_path: model.cover_image_path,
            cover_image_alt: model.cover_image_alt,
            reading_time: model.reading_time,
            author_id: model.author_id,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        })
    }
}

/// Conversion from Domain Article to SeaORM ActiveModel.
impl From<patrol_core::domain::Article> for ActiveModel {
    fn from(article: patrol_core::domain::Article) -> Self {
        Self {
            id: Set(article.id),
            title: Set(article.title),
            slug: Set(article.slug),
            excerpt: Set(article.excerpt),
            content: Set(article.content),
            status: Set(article.status.as_str().to_string()),
            cover_image_path: Set(article.cover_image_path),
            cover_image_alt: Set(article.cover_image_alt),
            reading_time: Set(article.reading_time),
            author_id: Set(article.author_id),
            created_at: Set(article.created_at.into()),
            updated_at: Set(article.updated_at.into()),
        }
    }
}
