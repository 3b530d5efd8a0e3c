//! Sync gateway: wire schema and lenient decoding for the room channel.
//!
//! Synchronization is whole-document last-write-wins: on every *completed*
//! mutation the full object list is serialized and sent, tagged with the
//! room id. Intermediate per-frame move/resize updates never hit the wire.
//! There is no acknowledgement, retry, or conflict resolution — the channel
//! is a cooperative low-concurrency surface, and a remote snapshot arriving
//! mid-gesture simply replaces the local store.
//!
//! Decoding never fails the caller: a malformed or missing payload decodes
//! to an empty object list, and individually malformed or unknown-`type`
//! array elements are skipped so future object kinds pass through quietly.

#[cfg(test)]
#[path = "sync_test.rs"]
mod sync_test;

use serde::Serialize;

use crate::doc::{BoardObject, DocStore};

/// Events emitted to the room channel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event")]
pub enum Outbound<'a> {
    /// Full-document snapshot.
    #[serde(rename = "object-sync")]
    ObjectSync {
        #[serde(rename = "roomId")]
        room_id: &'a str,
        objects: &'a [BoardObject],
    },
    /// Distinct clear signal (no snapshot payload) so peers reset atomically.
    #[serde(rename = "clear")]
    Clear {
        #[serde(rename = "roomId")]
        room_id: &'a str,
    },
}

/// Events received from the room channel.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    /// Replace the local store with this list, redraw, clear selection.
    ObjectSync(Vec<BoardObject>),
    /// Empty the store and redraw.
    Clear,
}

/// Serializes completed store mutations for one room.
#[derive(Debug, Clone)]
pub struct SyncGateway {
    room_id: String,
}

impl SyncGateway {
    #[must_use]
    pub fn new(room_id: impl Into<String>) -> Self {
        Self { room_id: room_id.into() }
    }

    /// The room this gateway is bound to.
    #[must_use]
    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    /// Serialize the full object list as an `object-sync` event.
    #[must_use]
    pub fn snapshot(&self, doc: &DocStore) -> String {
        let event = Outbound::ObjectSync { room_id: &self.room_id, objects: doc.objects() };
        serde_json::to_string(&event).unwrap_or_default()
    }

    /// Serialize the distinct `clear` event.
    #[must_use]
    pub fn clear(&self) -> String {
        let event = Outbound::Clear { room_id: &self.room_id };
        serde_json::to_string(&event).unwrap_or_default()
    }
}

/// Decode one inbound channel message. Returns `None` for frames that are
/// not whiteboard events (unknown event names, invalid JSON).
#[must_use]
pub fn decode_inbound(text: &str) -> Option<Inbound> {
    let value: serde_json::Value = serde_json::from_str(text).ok()?;
    match value.get("event").and_then(|v| v.as_str())? {
        "object-sync" => Some(Inbound::ObjectSync(parse_objects(value.get("objects")))),
        "clear" => Some(Inbound::Clear),
        _ => None,
    }
}

/// Parse a snapshot payload, skipping elements that fail to deserialize.
///
/// A missing or non-array payload yields an empty list.
#[must_use]
pub fn parse_objects(value: Option<&serde_json::Value>) -> Vec<BoardObject> {
    let Some(items) = value.and_then(|v| v.as_array()) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| serde_json::from_value(item.clone()).ok())
        .collect()
}
