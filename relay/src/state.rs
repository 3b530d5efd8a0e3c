//! Shared relay state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. Rooms
//! are created on first use and evicted when the last client leaves, except
//! that a room with a stored snapshot survives so late joiners still get the
//! board back. Everything is in-memory; there is no persistence layer.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::{RwLock, mpsc};
use tracing::{debug, warn};
use uuid::Uuid;

/// Per-room live state.
pub struct RoomState {
    /// Connected clients: `client_id` -> sender for outgoing raw frames.
    pub clients: HashMap<Uuid, mpsc::Sender<String>>,
    /// Latest whole-document snapshot, replayed to joiners. `None` until the
    /// first sync; `Some(vec![])` after a clear.
    pub snapshot: Option<Vec<Value>>,
}

impl RoomState {
    #[must_use]
    pub fn new() -> Self {
        Self { clients: HashMap::new(), snapshot: None }
    }
}

impl Default for RoomState {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared application state. Clone is required by Axum — the room map is
/// Arc-wrapped.
#[derive(Clone, Default)]
pub struct AppState {
    pub rooms: Arc<RwLock<HashMap<String, RoomState>>>,
}

impl AppState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Register a client in a room (creating the room if needed) and return the
/// stored snapshot for replay.
pub async fn join_room(
    state: &AppState,
    room_id: &str,
    client_id: Uuid,
    tx: mpsc::Sender<String>,
) -> Option<Vec<Value>> {
    let mut rooms = state.rooms.write().await;
    let room = rooms.entry(room_id.to_string()).or_default();
    room.clients.insert(client_id, tx);
    debug!(%client_id, room_id, clients = room.clients.len(), "room: join");
    room.snapshot.clone()
}

/// Remove a client from a room. Rooms with no clients and no snapshot are
/// evicted.
pub async fn leave_room(state: &AppState, room_id: &str, client_id: Uuid) {
    let mut rooms = state.rooms.write().await;
    let Some(room) = rooms.get_mut(room_id) else { return };
    room.clients.remove(&client_id);
    debug!(%client_id, room_id, clients = room.clients.len(), "room: leave");
    if room.clients.is_empty() && room.snapshot.is_none() {
        rooms.remove(room_id);
    }
}

/// The room's stored snapshot, if any.
pub async fn room_snapshot(state: &AppState, room_id: &str) -> Option<Vec<Value>> {
    let rooms = state.rooms.read().await;
    rooms.get(room_id).and_then(|room| room.snapshot.clone())
}

/// Overwrite the room's stored snapshot. Last write wins.
pub async fn store_snapshot(state: &AppState, room_id: &str, objects: Vec<Value>) {
    let mut rooms = state.rooms.write().await;
    let room = rooms.entry(room_id.to_string()).or_default();
    room.snapshot = Some(objects);
}

/// Forward a raw frame to every client in the room except `exclude`.
///
/// Senders are cloned out under the read lock, then the sends happen without
/// holding it. Sends never block: a full or closed channel drops the frame
/// for that client, and the disconnect path cleans the entry up.
pub async fn broadcast(state: &AppState, room_id: &str, text: &str, exclude: Option<Uuid>) {
    let targets: Vec<(Uuid, mpsc::Sender<String>)> = {
        let rooms = state.rooms.read().await;
        let Some(room) = rooms.get(room_id) else { return };
        room.clients
            .iter()
            .filter(|(id, _)| Some(**id) != exclude)
            .map(|(id, tx)| (*id, tx.clone()))
            .collect()
    };
    for (client_id, tx) in targets {
        if let Err(mpsc::error::TrySendError::Full(_)) = tx.try_send(text.to_string()) {
            warn!(%client_id, room_id, "room: dropping frame for saturated client");
        }
    }
}
