use patrol_core::domain::DEFAULT_CATEGORIES;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Categories {
    Table,
    Name,
    Slug,
    Description,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut insert = Query::insert();
        insert
            .into_table(Categories::Table)
            .columns([Categories::Name, Categories::Slug, Categories::Description])
            .on_conflict(
                OnConflict::column(Categories::Slug)
                    .do_nothing()
                    .to_owned(),
            );

        for (name, slug, description) in DEFAULT_CATEGORIES {
            insert
                .values([name.into(), slug.into(), description.into()])
                .map_err(|e| DbErr::Custom(e.to_string()))?;
        }

        manager.exec_stmt(insert).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let slugs = DEFAULT_CATEGORIES.map(|(_, slug, _)| slug);
        manager
            .exec_stmt(
                Query::delete()
                    .from_table(Categories::Table)
                    .and_where(Expr::col(Categories::Slug).is_in(slugs))
                    .to_owned(),
            )
            .await
    }
}
