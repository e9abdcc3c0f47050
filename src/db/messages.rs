use sea_orm::prelude::Expr;
use sea_orm::*;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use crate::models::messages::{self, CreateMessage};

/// Insert a new message.
pub async fn insert_message(
    db: &DatabaseConnection,
    input: CreateMessage,
) -> Result<messages::Model, DbErr> {
    let new_message = messages::ActiveModel {
        id: Set(Uuid::new_v4()),
        sender_id: Set(input.sender_id),
        receiver_id: Set(input.receiver_id),
        content: Set(input.content),
        attachment_url: Set(input.attachment_url),
        is_read: Set(false),
        created_at: Set(chrono::Utc::now()),
    };

    new_message.insert(db).await
}

/// Condition matching every message exchanged between two users, either direction.
fn between(user_a: Uuid, user_b: Uuid) -> Condition {
    Condition::any()
        .add(
            Condition::all()
                .add(messages::Column::SenderId.eq(user_a))
                .add(messages::Column::ReceiverId.eq(user_b)),
        )
        .add(
            Condition::all()
                .add(messages::Column::SenderId.eq(user_b))
                .add(messages::Column::ReceiverId.eq(user_a)),
        )
}

/// Fetch the conversation between two users, newest first, with cursor pagination.
pub async fn get_conversation(
    db: &DatabaseConnection,
    user_a: Uuid,
    user_b: Uuid,
    limit: u64,
    cursor_created_at: Option<chrono::DateTime<chrono::Utc>>,
    cursor_id: Option<Uuid>,
) -> Result<Vec<messages::Model>, DbErr> {
    let mut query = messages::Entity::find().filter(between(user_a, user_b));

    if let (Some(cursor_created_at), Some(cursor_id)) = (cursor_created_at, cursor_id) {
        query = query.filter(
            Condition::any()
                .add(messages::Column::CreatedAt.lt(cursor_created_at))
                .add(
                    Condition::all()
                        .add(messages::Column::CreatedAt.eq(cursor_created_at))
                        .add(messages::Column::Id.lt(cursor_id)),
                ),
        );
    }

    query
        .order_by_desc(messages::Column::CreatedAt)
        .order_by_desc(messages::Column::Id)
        .limit(limit)
        .all(db)
        .await
}

/// Fetch a single message by ID.
pub async fn get_message_by_id(
    db: &DatabaseConnection,
    message_id: Uuid,
) -> Result<Option<messages::Model>, DbErr> {
    messages::Entity::find_by_id(message_id).one(db).await
}

/// Mark a single message as read.
pub async fn mark_message_as_read(
    db: &DatabaseConnection,
    message_id: Uuid,
) -> Result<messages::Model, DbErr> {
    let message = messages::Entity::find_by_id(message_id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("Message not found".to_string()))?;

    let mut active: messages::ActiveModel = message.into();
    active.is_read = Set(true);

    active.update(db).await
}

/// Mark everything `sender_id` sent to `reader_id` as read. Returns the ids that changed.
pub async fn mark_all_read_from(
    db: &DatabaseConnection,
    reader_id: Uuid,
    sender_id: Uuid,
) -> Result<Vec<Uuid>, DbErr> {
    let unread: Vec<Uuid> = messages::Entity::find()
        .select_only()
        .column(messages::Column::Id)
        .filter(messages::Column::ReceiverId.eq(reader_id))
        .filter(messages::Column::SenderId.eq(sender_id))
        .filter(messages::Column::IsRead.eq(false))
        .into_tuple()
        .all(db)
        .await?;

    if unread.is_empty() {
        return Ok(unread);
    }

    messages::Entity::update_many()
        .col_expr(messages::Column::IsRead, Expr::value(true))
        .filter(messages::Column::Id.is_in(unread.clone()))
        .exec(db)
        .await?;

    Ok(unread)
}

/// Total unread messages addressed to a user.
pub async fn count_unread_for_user(db: &DatabaseConnection, user_id: Uuid) -> Result<u64, DbErr> {
    messages::Entity::find()
        .filter(messages::Column::ReceiverId.eq(user_id))
        .filter(messages::Column::IsRead.eq(false))
        .count(db)
        .await
}

/// Unread messages addressed to `user_id`, grouped by sender.
pub async fn count_unread_by_sender(
    db: &DatabaseConnection,
    user_id: Uuid,
) -> Result<HashMap<Uuid, u64>, DbErr> {
    let unread_messages = messages::Entity::find()
        .filter(messages::Column::ReceiverId.eq(user_id))
        .filter(messages::Column::IsRead.eq(false))
        .all(db)
        .await?;

    let mut counts: HashMap<Uuid, u64> = HashMap::new();
    for message in unread_messages {
        *counts.entry(message.sender_id).or_insert(0) += 1;
    }

    Ok(counts)
}

/// Latest message per counterpart for a user's inbox, newest conversation first.
pub async fn get_latest_per_counterpart(
    db: &DatabaseConnection,
    user_id: Uuid,
) -> Result<Vec<messages::Model>, DbErr> {
    let rows = messages::Entity::find()
        .filter(
            Condition::any()
                .add(messages::Column::SenderId.eq(user_id))
                .add(messages::Column::ReceiverId.eq(user_id)),
        )
        .order_by_desc(messages::Column::CreatedAt)
        .order_by_desc(messages::Column::Id)
        .all(db)
        .await?;

    let mut seen: HashSet<Uuid> = HashSet::new();
    Ok(rows
        .into_iter()
        .filter(|m| seen.insert(m.counterpart(user_id)))
        .collect())
}

/// Paginated list of all messages, newest first (admin).
pub async fn get_messages_paginated(
    db: &DatabaseConnection,
    page: u64,
    limit: u64,
) -> Result<(Vec<messages::Model>, u64), DbErr> {
    let paginator = messages::Entity::find()
        .order_by_desc(messages::Column::CreatedAt)
        .paginate(db, limit);
    let total = paginator.num_items().await?;
    let items = paginator.fetch_page(page - 1).await?;
    Ok((items, total))
}

pub async fn count_all(db: &DatabaseConnection) -> Result<u64, DbErr> {
    messages::Entity::find().count(db).await
}

/// Delete a message by ID.
pub async fn delete_message(db: &DatabaseConnection, id: Uuid) -> Result<DeleteResult, DbErr> {
    messages::Entity::delete_by_id(id).exec(db).await
}
