//! Direct messages between two profiles, shared by the REST routes and the
//! realtime socket. Every state change is pushed to the affected users.

use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::db::messages as message_db;
use crate::db::profiles as profile_db;
use crate::error::{ApiError, ApiResult};
use crate::models::messages::{self, CreateMessage, MessageResponse, SendMessage};
use crate::models::profiles;
use crate::realtime::{RealtimeHub, ServerEvent};

pub const MAX_MESSAGE_LENGTH: usize = 5000;

/// Checks that do not need the database.
pub fn validate_outgoing(sender_id: Uuid, input: &SendMessage) -> ApiResult<()> {
    if input.receiver_id == sender_id {
        return Err(ApiError::bad_request("You cannot message yourself"));
    }

    let has_attachment = input
        .attachment_url
        .as_deref()
        .is_some_and(|url| !url.trim().is_empty());
    if input.content.trim().is_empty() && !has_attachment {
        return Err(ApiError::bad_request("Message content cannot be empty"));
    }
    if input.content.chars().count() > MAX_MESSAGE_LENGTH {
        return Err(ApiError::bad_request(format!(
            "Message content exceeds {MAX_MESSAGE_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Store a message and push it to both parties.
pub async fn send(
    db: &DatabaseConnection,
    hub: &RealtimeHub,
    sender: &profiles::Model,
    input: SendMessage,
) -> ApiResult<messages::Model> {
    validate_outgoing(sender.id, &input)?;

    if profile_db::get_profile_by_id(db, input.receiver_id)
        .await?
        .is_none()
    {
        return Err(ApiError::not_found(format!(
            "User {} not found",
            input.receiver_id
        )));
    }

    let saved = message_db::insert_message(
        db,
        CreateMessage {
            sender_id: sender.id,
            receiver_id: input.receiver_id,
            content: input.content.trim().to_string(),
            attachment_url: input.attachment_url,
        },
    )
    .await?;

    let event = ServerEvent::MessageInserted {
        message: MessageResponse::from(saved.clone()),
    };
    hub.publish(saved.receiver_id, event.clone());
    hub.publish(saved.sender_id, event);

    Ok(saved)
}

/// Only the receiver may mark a message as read.
pub async fn mark_read(
    db: &DatabaseConnection,
    hub: &RealtimeHub,
    reader: &profiles::Model,
    message_id: Uuid,
) -> ApiResult<messages::Model> {
    let message = message_db::get_message_by_id(db, message_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Message {message_id} not found")))?;

    if message.receiver_id != reader.id {
        return Err(ApiError::forbidden(
            "Only the receiver can mark a message as read",
        ));
    }
    if message.is_read {
        return Ok(message);
    }

    let updated = message_db::mark_message_as_read(db, message_id)
        .await
        .map_err(ApiError::from_db)?;

    hub.publish(
        updated.sender_id,
        ServerEvent::MessageRead {
            reader_id: reader.id,
            message_ids: vec![updated.id],
        },
    );

    Ok(updated)
}

/// Mark everything `other_id` sent to `reader` as read.
pub async fn mark_conversation_read(
    db: &DatabaseConnection,
    hub: &RealtimeHub,
    reader: &profiles::Model,
    other_id: Uuid,
) -> ApiResult<Vec<Uuid>> {
    let ids = message_db::mark_all_read_from(db, reader.id, other_id).await?;

    if !ids.is_empty() {
        hub.publish(
            other_id,
            ServerEvent::MessageRead {
                reader_id: reader.id,
                message_ids: ids.clone(),
            },
        );
    }

    Ok(ids)
}

/// The sender or an admin may delete a message.
pub async fn delete(
    db: &DatabaseConnection,
    hub: &RealtimeHub,
    user: &profiles::Model,
    message_id: Uuid,
) -> ApiResult<()> {
    let message = message_db::get_message_by_id(db, message_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Message {message_id} not found")))?;

    if message.sender_id != user.id && !user.is_admin() {
        return Err(ApiError::forbidden("Only the sender can delete this message"));
    }

    message_db::delete_message(db, message_id).await?;

    let event = ServerEvent::MessageDeleted { message_id };
    hub.publish(message.sender_id, event.clone());
    hub.publish(message.receiver_id, event);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outgoing(receiver_id: Uuid, content: &str, attachment: Option<&str>) -> SendMessage {
        SendMessage {
            receiver_id,
            content: content.to_string(),
            attachment_url: attachment.map(str::to_string),
        }
    }

    #[test]
    fn rejects_messages_to_self() {
        let me = Uuid::new_v4();
        let err = validate_outgoing(me, &outgoing(me, "hello", None)).unwrap_err();
        assert_eq!(err.to_string(), "You cannot message yourself");
    }

    #[test]
    fn blank_content_needs_an_attachment() {
        let me = Uuid::new_v4();
        let them = Uuid::new_v4();

        assert!(validate_outgoing(me, &outgoing(them, "   ", None)).is_err());
        assert!(validate_outgoing(me, &outgoing(them, "", Some("https://x/y.png"))).is_ok());
        assert!(validate_outgoing(me, &outgoing(them, "Salut!", None)).is_ok());
    }

    #[test]
    fn rejects_oversized_content() {
        let long = "a".repeat(MAX_MESSAGE_LENGTH + 1);
        let result = validate_outgoing(Uuid::new_v4(), &outgoing(Uuid::new_v4(), &long, None));
        assert!(result.is_err());
    }
}
