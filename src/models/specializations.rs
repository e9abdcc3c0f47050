use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// SeaORM entity for the `specializations` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "specializations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub craftsman_id: Uuid,
    pub name: String,
    pub years_experience: Option<i32>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::profiles::Entity",
        from = "Column::CraftsmanId",
        to = "super::profiles::Column::Id"
    )]
    Craftsman,
}

impl Related<super::profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Craftsman.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSpecialization {
    pub name: String,
    pub years_experience: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateSpecialization {
    pub name: Option<String>,
    pub years_experience: Option<i32>,
}
