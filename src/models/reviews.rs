use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// SeaORM entity for the `reviews` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reviews")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub client_id: Uuid,
    pub craftsman_id: Uuid,
    /// 1 to 5 inclusive.
    pub rating: i32,
    #[sea_orm(column_type = "Text", nullable)]
    pub comment: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub craftsman_response: Option<String>,
    pub response_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::profiles::Entity",
        from = "Column::ClientId",
        to = "super::profiles::Column::Id"
    )]
    Client,
    #[sea_orm(
        belongs_to = "super::profiles::Entity",
        from = "Column::CraftsmanId",
        to = "super::profiles::Column::Id"
    )]
    Craftsman,
}

impl ActiveModelBehavior for ActiveModel {}

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

// ── DTOs ──

#[derive(Debug, Clone, Deserialize)]
pub struct CreateReview {
    pub craftsman_id: Uuid,
    pub rating: i32,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RespondToReview {
    pub response: String,
}

/// Review enriched with the author's display name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewResponse {
    pub id: Uuid,
    pub client_id: Uuid,
    pub client_name: Option<String>,
    pub craftsman_id: Uuid,
    pub rating: i32,
    pub comment: Option<String>,
    pub craftsman_response: Option<String>,
    pub response_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
}

impl ReviewResponse {
    pub fn new(m: Model, client_name: Option<String>) -> Self {
        Self {
            id: m.id,
            client_id: m.client_id,
            client_name,
            craftsman_id: m.craftsman_id,
            rating: m.rating,
            comment: m.comment,
            craftsman_response: m.craftsman_response,
            response_at: m.response_at,
            created_at: m.created_at,
        }
    }
}
