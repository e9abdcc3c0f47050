use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tokio::sync::mpsc;
use uuid::Uuid;

use super::protocol::ServerEvent;

struct Connection {
    id: u64,
    sender: mpsc::UnboundedSender<ServerEvent>,
}

#[derive(Default)]
struct HubState {
    /// user_id -> that user's live connections
    users: RwLock<HashMap<Uuid, Vec<Connection>>>,
    next_connection: AtomicU64,
}

impl HubState {
    fn broadcast_except(
        users: &HashMap<Uuid, Vec<Connection>>,
        skip: Uuid,
        event: &ServerEvent,
    ) {
        for (user_id, connections) in users {
            if *user_id == skip {
                continue;
            }
            for connection in connections {
                let _ = connection.sender.send(event.clone());
            }
        }
    }
}

/// Routes events to the live WebSocket connections of each user.
///
/// The lock is never held across an await, so it is a plain `std` lock and a
/// subscription can release itself from `Drop`.
#[derive(Clone, Default)]
pub struct RealtimeHub {
    state: Arc<HubState>,
}

/// A live per-user subscription. Dropping it unsubscribes the connection.
pub struct FeedSubscription {
    state: Arc<HubState>,
    user_id: Uuid,
    connection_id: u64,
}

impl FeedSubscription {
    pub fn user_id(&self) -> Uuid {
        self.user_id
    }
}

impl RealtimeHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection for `user_id`.
    ///
    /// The user's first connection announces them online to everyone else.
    pub fn subscribe(
        &self,
        user_id: Uuid,
    ) -> (FeedSubscription, mpsc::UnboundedReceiver<ServerEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let connection_id = self.state.next_connection.fetch_add(1, Ordering::Relaxed);

        let mut users = self
            .state
            .users
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let connections = users.entry(user_id).or_default();
        let first = connections.is_empty();
        connections.push(Connection {
            id: connection_id,
            sender,
        });

        if first {
            HubState::broadcast_except(
                &users,
                user_id,
                &ServerEvent::Presence {
                    user_id,
                    online: true,
                },
            );
        }

        let subscription = FeedSubscription {
            state: self.state.clone(),
            user_id,
            connection_id,
        };
        (subscription, receiver)
    }

    /// Deliver `event` to every live connection of `user_id`. Returns how many got it.
    pub fn publish(&self, user_id: Uuid, event: ServerEvent) -> usize {
        let users = self
            .state
            .users
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        users
            .get(&user_id)
            .map(|connections| {
                connections
                    .iter()
                    .filter(|c| c.sender.send(event.clone()).is_ok())
                    .count()
            })
            .unwrap_or(0)
    }

    pub fn is_online(&self, user_id: Uuid) -> bool {
        self.state
            .users
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .contains_key(&user_id)
    }

    pub fn connection_count(&self) -> usize {
        self.state
            .users
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .values()
            .map(Vec::len)
            .sum()
    }
}

impl Drop for FeedSubscription {
    fn drop(&mut self) {
        let mut users = self
            .state
            .users
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let Some(connections) = users.get_mut(&self.user_id) else {
            return;
        };
        connections.retain(|c| c.id != self.connection_id);

        if connections.is_empty() {
            users.remove(&self.user_id);
            HubState::broadcast_except(
                &users,
                self.user_id,
                &ServerEvent::Presence {
                    user_id: self.user_id,
                    online: false,
                },
            );
        }
    }
}
