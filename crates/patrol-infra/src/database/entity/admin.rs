//! Admin entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "admins")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
    pub is_super_admin: bool,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Admin.
impl From<Model> for patrol_core::domain::Admin {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            full_name: model.full_name,
            password_hash: model.password_hash,
            is_super_admin: model.is_super_admin,
            is_active: model.is_active,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

/// Conversion from Domain Admin to SeaORM ActiveModel.
impl From<patrol_core::domain::Admin> for ActiveModel {
    fn from(admin: patrol_core::domain::Admin) -> Self {
        Self {
            id: Set(admin.id),
            email: Set(admin.email),
            full_name: Set(admin.full_name),
            password_hash: Set(admin.password_hash),
            is_super_admin: Set(admin.is_super_admin),
            is_active: Set(admin.is_active),
            created_at: Set(admin.created_at.into()),
            updated_at: Set(admin.updated_at.into()),
        }
    }
}
