//! Source entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use patrol_core::domain::NewSource;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "sources")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub article_id: Uuid,
    pub name: Option<String>,
    pub url: Option<String>,
    #[sea_orm(column_name = "type")]
    pub source_type: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::article::Entity",
        from = "Column::ArticleId",
        to = "super::article::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Article,
}

impl Related<super::article::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Article.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for patrol_core::domain::Source {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            article_id: model.article_id,
            name: model.name,
            url: model.url,
            source_type: model.source_type,
        }
    }
}

/// Insert model for a source; the id comes from the sequence.
pub fn new_active_model(article_id: Uuid, source: NewSource) -> ActiveModel {
    ActiveModel {
        article_id: Set(article_id),
        name: Set(source.name),
        url: Set(source.url),
        source_type: Set(source.source_type),
        ..Default::default()
    }
}
