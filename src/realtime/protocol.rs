use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::messages::MessageResponse;
use crate::models::reviews::ReviewResponse;

/// Frames the client sends over the realtime socket.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientFrame {
    SendMessage { receiver_id: Uuid, content: String },
    MarkRead { message_id: Uuid },
    Typing { receiver_id: Uuid },
    Ping,
}

/// Events pushed to a user's live connections.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// A message where the user is sender or receiver was stored.
    MessageInserted { message: MessageResponse },
    MessageRead { reader_id: Uuid, message_ids: Vec<Uuid> },
    MessageDeleted { message_id: Uuid },
    ReviewReceived { review: ReviewResponse },
    SubscriptionUpdated {
        active: bool,
        end_date: Option<DateTime<Utc>>,
    },
    Typing { user_id: Uuid },
    Presence { user_id: Uuid, online: bool },
    Pong,
    Error { message: String },
}

impl ServerEvent {
    pub fn error(message: impl Into<String>) -> Self {
        ServerEvent::Error {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_client_frames() {
        let id = Uuid::new_v4();
        let frame: ClientFrame = serde_json::from_value(serde_json::json!({
            "type": "send_message",
            "receiver_id": id,
            "content": "Buna ziua",
        }))
        .unwrap();
        assert!(matches!(
            frame,
            ClientFrame::SendMessage { receiver_id, ref content }
                if receiver_id == id && content == "Buna ziua"
        ));

        let frame: ClientFrame = serde_json::from_str(r#"{"type":"ping"}"#).unwrap();
        assert!(matches!(frame, ClientFrame::Ping));
    }

    #[test]
    fn unknown_frame_type_is_rejected() {
        assert!(serde_json::from_str::<ClientFrame>(r#"{"type":"shout"}"#).is_err());
    }

    #[test]
    fn events_are_tagged_snake_case() {
        let user_id = Uuid::nil();
        let json = serde_json::to_value(ServerEvent::Presence {
            user_id,
            online: true,
        })
        .unwrap();
        assert_eq!(json["type"], "presence");
        assert_eq!(json["online"], true);

        let json = serde_json::to_value(ServerEvent::SubscriptionUpdated {
            active: false,
            end_date: None,
        })
        .unwrap();
        assert_eq!(json["type"], "subscription_updated");
    }
}
