//! Wire schema for the room channel.
//!
//! The relay is payload-opaque: board objects travel as raw
//! [`serde_json::Value`]s so clients can introduce new object kinds without a
//! relay deploy. Only the envelope — `event` name and `roomId` — is
//! interpreted here.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One inbound client frame, dispatched on the `event` tag.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event")]
pub enum Inbound {
    /// Subscribe to a room and request a replay of its latest snapshot.
    #[serde(rename = "join")]
    Join {
        #[serde(rename = "roomId")]
        room_id: String,
    },
    /// Whole-document snapshot. Last write wins; the relay keeps only the
    /// newest list per room.
    #[serde(rename = "object-sync")]
    ObjectSync {
        #[serde(rename = "roomId")]
        room_id: String,
        #[serde(default)]
        objects: Vec<Value>,
    },
    /// Board wipe. Distinct from an empty snapshot so peers reset atomically.
    #[serde(rename = "clear")]
    Clear {
        #[serde(rename = "roomId")]
        room_id: String,
    },
}

impl Inbound {
    /// The room this frame addresses.
    #[must_use]
    pub fn room_id(&self) -> &str {
        match self {
            Self::Join { room_id }
            | Self::ObjectSync { room_id, .. }
            | Self::Clear { room_id } => room_id,
        }
    }
}

/// Frames the relay originates itself (snapshot replay on join).
/// Peer-to-peer traffic is forwarded verbatim and never re-encoded.
#[derive(Debug, Serialize)]
#[serde(tag = "event")]
pub enum Outbound<'a> {
    #[serde(rename = "object-sync")]
    ObjectSync {
        #[serde(rename = "roomId")]
        room_id: &'a str,
        objects: &'a [Value],
    },
}
