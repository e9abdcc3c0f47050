use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// SeaORM entity for the `qualifications` table (certificates, licences).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "qualifications")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub craftsman_id: Uuid,
    pub title: String,
    pub issuer: Option<String>,
    pub issued_at: Option<Date>,
    #[sea_orm(column_type = "Text", nullable)]
    pub document_url: Option<String>,
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
pub struct CreateQualification {
    pub title: String,
    pub issuer: Option<String>,
    pub issued_at: Option<chrono::NaiveDate>,
    pub document_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateQualification {
    pub title: Option<String>,
    pub issuer: Option<String>,
    pub issued_at: Option<chrono::NaiveDate>,
    pub document_url: Option<String>,
}
