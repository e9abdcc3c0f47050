use actix_web::{HttpRequest, HttpResponse, web};
use actix_ws::Message;
use futures_util::StreamExt;
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use tokio::sync::mpsc;

use super::hub::{FeedSubscription, RealtimeHub};
use super::protocol::{ClientFrame, ServerEvent};
use crate::auth::middleware::authenticate;
use crate::error::ApiError;
use crate::messaging;
use crate::models::messages::SendMessage;
use crate::models::profiles;

/// Browsers cannot set headers on the WebSocket handshake, so the token rides in the query.
#[derive(Debug, Deserialize)]
pub struct WsQuery {
    pub token: String,
}

/// GET /api/realtime/ws?token=<jwt>
pub async fn ws_connect(
    req: HttpRequest,
    stream: web::Payload,
    query: web::Query<WsQuery>,
    db: web::Data<DatabaseConnection>,
    hub: web::Data<RealtimeHub>,
) -> Result<HttpResponse, actix_web::Error> {
    let user = authenticate(&req, &query.token).await?;

    let (response, session, msg_stream) = actix_ws::handle(&req, stream)?;
    let (subscription, events) = hub.subscribe(user.id);
    tracing::debug!(user_id = %user.id, "realtime connection opened");

    actix_web::rt::spawn(run_session(
        session,
        msg_stream,
        events,
        subscription,
        user,
        db.get_ref().clone(),
        hub.get_ref().clone(),
    ));

    Ok(response)
}

/// Pump frames both ways until either side closes. The subscription is
/// released when this task ends.
async fn run_session(
    mut session: actix_ws::Session,
    mut msg_stream: actix_ws::MessageStream,
    mut events: mpsc::UnboundedReceiver<ServerEvent>,
    subscription: FeedSubscription,
    user: profiles::Model,
    db: DatabaseConnection,
    hub: RealtimeHub,
) {
    loop {
        tokio::select! {
            Some(msg) = msg_stream.next() => {
                match msg {
                    Ok(Message::Text(text)) => {
                        if let Some(reply) = handle_frame(&text, &user, &db, &hub).await {
                            if send_event(&mut session, &reply).await.is_err() {
                                break;
                            }
                        }
                    }
                    Ok(Message::Ping(bytes)) => {
                        if session.pong(&bytes).await.is_err() {
                            break;
                        }
                    }
                    Ok(Message::Close(_)) | Err(_) => break,
                    _ => {}
                }
            }
            Some(event) = events.recv() => {
                if send_event(&mut session, &event).await.is_err() {
                    break;
                }
            }
            else => break,
        }
    }

    tracing::debug!(user_id = %subscription.user_id(), "realtime connection closed");
    drop(subscription);
    let _ = session.close(None).await;
}

async fn send_event(
    session: &mut actix_ws::Session,
    event: &ServerEvent,
) -> Result<(), actix_ws::Closed> {
    match serde_json::to_string(event) {
        Ok(json) => session.text(json).await,
        Err(e) => {
            tracing::error!("Failed to serialize realtime event: {e}");
            Ok(())
        }
    }
}

/// Apply one client frame. Returns a direct reply for this connection, if any.
async fn handle_frame(
    text: &str,
    user: &profiles::Model,
    db: &DatabaseConnection,
    hub: &RealtimeHub,
) -> Option<ServerEvent> {
    let frame: ClientFrame = match serde_json::from_str(text) {
        Ok(frame) => frame,
        Err(e) => return Some(ServerEvent::error(format!("Invalid message format: {e}"))),
    };

    let result: Result<(), ApiError> = match frame {
        ClientFrame::SendMessage {
            receiver_id,
            content,
        } => messaging::send(
            db,
            hub,
            user,
            SendMessage {
                receiver_id,
                content,
                attachment_url: None,
            },
        )
        .await
        .map(|_| ()),
        ClientFrame::MarkRead { message_id } => messaging::mark_read(db, hub, user, message_id)
            .await
            .map(|_| ()),
        ClientFrame::Typing { receiver_id } => {
            if receiver_id != user.id {
                hub.publish(receiver_id, ServerEvent::Typing { user_id: user.id });
            }
            Ok(())
        }
        ClientFrame::Ping => return Some(ServerEvent::Pong),
    };

    result.err().map(|e| ServerEvent::error(e.to_string()))
}
