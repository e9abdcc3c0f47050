use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// SeaORM entity for the `messages` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "messages")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub attachment_url: Option<String>,
    pub is_read: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::profiles::Entity",
        from = "Column::SenderId",
        to = "super::profiles::Column::Id"
    )]
    Sender,
    #[sea_orm(
        belongs_to = "super::profiles::Entity",
        from = "Column::ReceiverId",
        to = "super::profiles::Column::Id"
    )]
    Receiver,
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// The participant that is not `user_id`.
    pub fn counterpart(&self, user_id: Uuid) -> Uuid {
        if self.sender_id == user_id {
            self.receiver_id
        } else {
            self.sender_id
        }
    }
}

// ── DTOs ──

/// Body of `POST /api/messages`.
#[derive(Debug, Clone, Deserialize)]
pub struct SendMessage {
    pub receiver_id: Uuid,
    pub content: String,
    pub attachment_url: Option<String>,
}

/// Internal insert input; the sender always comes from the authenticated user.
#[derive(Debug, Clone)]
pub struct CreateMessage {
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub content: String,
    pub attachment_url: Option<String>,
}

/// Response DTO for messages sent over WebSocket and REST.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub content: String,
    pub attachment_url: Option<String>,
    pub is_read: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Model> for MessageResponse {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            sender_id: m.sender_id,
            receiver_id: m.receiver_id,
            content: m.content,
            attachment_url: m.attachment_url,
            is_read: m.is_read,
            created_at: m.created_at,
        }
    }
}

/// Cursor pagination for a conversation's history.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageQuery {
    pub limit: Option<u64>,
    pub cursor_created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub cursor_id: Option<Uuid>,
}

impl MessageQuery {
    pub fn limit(&self) -> u64 {
        self.limit.unwrap_or(50).clamp(1, 200)
    }
}

/// Response for the conversations list endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationSummary {
    pub other_user_id: Uuid,
    pub other_user_name: Option<String>,
    pub other_user_avatar: Option<String>,
    pub last_message: String,
    pub last_message_at: chrono::DateTime<chrono::Utc>,
    pub unread_count: u64,
}
