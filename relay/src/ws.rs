//! WebSocket handler — room-scoped frame relay.
//!
//! DESIGN
//! ======
//! On upgrade, generates a client ID and enters a `select!` loop:
//! - Incoming client frames → parse envelope + dispatch by `event`
//! - Forwarded frames from room peers → send to client
//!
//! The relay trusts payloads: `object-sync` and `clear` frames are stored and
//! forwarded verbatim, never re-encoded. Membership is implicit — any frame
//! naming a room the client is not in moves it there — so clients that skip
//! the explicit `join` still receive peer traffic.
//!
//! LIFECYCLE
//! =========
//! 1. Upgrade → enter loop
//! 2. `join` → register in room, replay stored snapshot to sender
//! 3. `object-sync` / `clear` → store latest state, forward to peers
//! 4. Close → deregister from current room

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::event::{Inbound, Outbound};
use crate::state::{self, AppState};

#[derive(Debug, Error)]
pub enum RelayError {
    /// Frame was not valid JSON or named an unknown event.
    #[error("invalid frame: {0}")]
    Decode(#[from] serde_json::Error),
}

// =============================================================================
// UPGRADE
// =============================================================================

pub async fn handle_ws(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| run_ws(socket, state))
}

// =============================================================================
// CONNECTION
// =============================================================================

async fn run_ws(mut socket: WebSocket, state: AppState) {
    let client_id = Uuid::new_v4();

    // Per-connection channel for frames forwarded from room peers.
    let (client_tx, mut client_rx) = mpsc::channel::<String>(256);

    info!(%client_id, "ws: client connected");

    let mut current_room: Option<String> = None;

    loop {
        tokio::select! {
            msg = socket.recv() => {
                let Some(Ok(msg)) = msg else { break };
                match msg {
                    Message::Text(text) => {
                        let replies = match process_inbound_text(
                            &state, &mut current_room, client_id, &client_tx, &text,
                        ).await {
                            Ok(replies) => replies,
                            Err(e) => {
                                warn!(%client_id, error = %e, "ws: dropping inbound frame");
                                continue;
                            }
                        };
                        for reply in replies {
                            if socket.send(Message::Text(reply.into())).await.is_err() {
                                return;
                            }
                        }
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            Some(frame) = client_rx.recv() => {
                if socket.send(Message::Text(frame.into())).await.is_err() {
                    break;
                }
            }
        }
    }

    if let Some(room_id) = current_room {
        state::leave_room(&state, &room_id, client_id).await;
    }
    info!(%client_id, "ws: client disconnected");
}

// =============================================================================
// FRAME DISPATCH
// =============================================================================

/// Parse and process one inbound text frame and return frames for the sender.
///
/// Transport concerns stay in the socket loop so tests can exercise dispatch
/// with plain channels.
///
/// # Errors
///
/// Returns [`RelayError::Decode`] for frames that are not whiteboard events.
async fn process_inbound_text(
    state: &AppState,
    current_room: &mut Option<String>,
    client_id: Uuid,
    client_tx: &mpsc::Sender<String>,
    text: &str,
) -> Result<Vec<String>, RelayError> {
    let frame: Inbound = serde_json::from_str(text)?;
    let replay = ensure_member(state, current_room, client_id, client_tx, frame.room_id()).await;

    match frame {
        Inbound::Join { room_id } => {
            info!(%client_id, room_id, "ws: join");
            // Replay the stored board so the joiner starts in sync. Covers
            // re-joins from clients already in the room; a fresh room has
            // nothing to say.
            let objects = match replay {
                Some(objects) => objects,
                None => match state::room_snapshot(state, &room_id).await {
                    Some(objects) => objects,
                    None => return Ok(vec![]),
                },
            };
            let frame = Outbound::ObjectSync { room_id: &room_id, objects: &objects };
            Ok(vec![serde_json::to_string(&frame)?])
        }
        Inbound::ObjectSync { room_id, objects } => {
            debug!(%client_id, room_id, objects = objects.len(), "ws: sync");
            state::store_snapshot(state, &room_id, objects).await;
            state::broadcast(state, &room_id, text, Some(client_id)).await;
            Ok(vec![])
        }
        Inbound::Clear { room_id } => {
            info!(%client_id, room_id, "ws: clear");
            // An empty snapshot, not `None`: late joiners must see the wipe.
            state::store_snapshot(state, &room_id, Vec::new()).await;
            state::broadcast(state, &room_id, text, Some(client_id)).await;
            Ok(vec![])
        }
    }
}

/// Make sure the client is registered in `room_id`, switching rooms if it was
/// somewhere else. Returns the stored snapshot when this call newly joined
/// the room.
async fn ensure_member(
    state: &AppState,
    current_room: &mut Option<String>,
    client_id: Uuid,
    client_tx: &mpsc::Sender<String>,
    room_id: &str,
) -> Option<Vec<serde_json::Value>> {
    if current_room.as_deref() == Some(room_id) {
        return None;
    }
    if let Some(old_room) = current_room.take() {
        state::leave_room(state, &old_room, client_id).await;
    }
    let replay = state::join_room(state, room_id, client_id, client_tx.clone()).await;
    *current_room = Some(room_id.to_string());
    replay
}

#[cfg(test)]
#[path = "ws_test.rs"]
mod tests;
