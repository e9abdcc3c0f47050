use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::profiles::CraftsmanType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    #[sea_orm(string_value = "open")]
    Open,
    #[sea_orm(string_value = "closed")]
    Closed,
}

/// SeaORM entity for the `job_listings` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "job_listings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub client_id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub craftsman_type: CraftsmanType,
    pub city: Option<String>,
    pub county: Option<String>,
    pub address: Option<String>,
    #[sea_orm(column_type = "Double", nullable)]
    pub budget: Option<f64>,
    /// JSON array of public image URLs.
    #[sea_orm(column_type = "JsonBinary")]
    pub images: Json,
    pub status: JobStatus,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::profiles::Entity",
        from = "Column::ClientId",
        to = "super::profiles::Column::Id"
    )]
    Client,
}

impl Related<super::profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

#[derive(Debug, Clone, Deserialize)]
pub struct CreateJobListing {
    pub title: String,
    pub description: String,
    pub craftsman_type: CraftsmanType,
    pub city: Option<String>,
    pub county: Option<String>,
    pub address: Option<String>,
    pub budget: Option<f64>,
    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateJobListing {
    pub title: Option<String>,
    pub description: Option<String>,
    pub craftsman_type: Option<CraftsmanType>,
    pub city: Option<String>,
    pub county: Option<String>,
    pub address: Option<String>,
    pub budget: Option<f64>,
    pub images: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobListQuery {
    pub craftsman_type: Option<CraftsmanType>,
    pub status: Option<JobStatus>,
    pub city: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl JobListQuery {
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> u64 {
        self.limit.unwrap_or(20).clamp(1, 100)
    }
}
