//! Document model: drawable objects and the ordered in-memory store.
//!
//! This module defines the closed family of drawable object types
//! (`BoardObject` and its per-kind payloads) and the runtime store that owns
//! all live objects (`DocStore`). The store is an ordered list: insertion
//! order is z-order, later objects draw on top.
//!
//! Data flows into this layer from the network (snapshot deserialization in
//! [`crate::sync`]) and from the input engine (gesture commits and in-gesture
//! edits). The renderer reads the list front to back; hit-testing walks it
//! back to front.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a drawable object.
///
/// Generated with [`Uuid::now_v7`] so ids are both unique and time-ordered.
pub type ObjectId = Uuid;

/// Allocate a fresh, time-ordered object id.
#[must_use]
pub fn new_object_id() -> ObjectId {
    Uuid::now_v7()
}

/// A point in CSS-pixel canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Freehand pen or eraser stroke. Committed strokes always carry at least
/// two points; shorter gestures are discarded before they reach the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub id: ObjectId,
    /// Ordered polyline the stroke passes through.
    pub points: Vec<Point>,
    pub color: String,
    pub width: f64,
    /// Eraser strokes render with destination-out compositing.
    pub eraser: bool,
}

/// Shared geometry for the two-corner object kinds: line, arrow, rect,
/// circle. The corners are stored as dragged and may be unordered; bounds
/// and rendering normalize them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxGeom {
    pub id: ObjectId,
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
    pub color: String,
    pub width: f64,
}

/// A text label anchored at its baseline start point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextObject {
    pub id: ObjectId,
    pub x: f64,
    pub y: f64,
    pub text: String,
    #[serde(rename = "fontSize")]
    pub font_size: f64,
    pub color: String,
}

/// A drawable object as stored in the document and on the wire.
///
/// Closed sum type, internally tagged with `type` in JSON:
/// `{"type": "stroke", ...}`, `{"type": "rect", ...}`, and so on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BoardObject {
    Stroke(Stroke),
    Line(BoxGeom),
    Arrow(BoxGeom),
    Rect(BoxGeom),
    Circle(BoxGeom),
    Text(TextObject),
}

impl BoardObject {
    /// This object's unique id.
    #[must_use]
    pub fn id(&self) -> ObjectId {
        match self {
            Self::Stroke(s) => s.id,
            Self::Line(g) | Self::Arrow(g) | Self::Rect(g) | Self::Circle(g) => g.id,
            Self::Text(t) => t.id,
        }
    }

    /// Whether this is a freehand stroke. Strokes get no resize handles.
    #[must_use]
    pub fn is_stroke(&self) -> bool {
        matches!(self, Self::Stroke(_))
    }

    /// Two-corner geometry, if this kind has one.
    #[must_use]
    pub fn box_geom(&self) -> Option<&BoxGeom> {
        match self {
            Self::Line(g) | Self::Arrow(g) | Self::Rect(g) | Self::Circle(g) => Some(g),
            _ => None,
        }
    }

    /// Mutable two-corner geometry, if this kind has one.
    pub fn box_geom_mut(&mut self) -> Option<&mut BoxGeom> {
        match self {
            Self::Line(g) | Self::Arrow(g) | Self::Rect(g) | Self::Circle(g) => Some(g),
            _ => None,
        }
    }

    /// Shift every coordinate-bearing field by `(dx, dy)`: all points for a
    /// stroke, the anchor for text, both corners for the box kinds.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        match self {
            Self::Stroke(s) => {
                for p in &mut s.points {
                    p.x += dx;
                    p.y += dy;
                }
            }
            Self::Line(g) | Self::Arrow(g) | Self::Rect(g) | Self::Circle(g) => {
                g.x0 += dx;
                g.y0 += dy;
                g.x1 += dx;
                g.y1 += dy;
            }
            Self::Text(t) => {
                t.x += dx;
                t.y += dy;
            }
        }
    }
}

/// Ordered in-memory store of drawable objects plus nothing else.
///
/// List position is z-order. There is no command history: undo removes the
/// most recently appended object only.
#[derive(Debug, Default)]
pub struct DocStore {
    objects: Vec<BoardObject>,
}

impl DocStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an object on top of the z-order.
    pub fn push(&mut self, obj: BoardObject) {
        self.objects.push(obj);
    }

    /// Replace the object with the same id in place, keeping its z-order
    /// slot. Returns false if no object with that id exists.
    pub fn replace(&mut self, obj: BoardObject) -> bool {
        let id = obj.id();
        match self.objects.iter_mut().find(|o| o.id() == id) {
            Some(slot) => {
                *slot = obj;
                true
            }
            None => false,
        }
    }

    /// Remove an object by id, returning it if it was present.
    pub fn remove(&mut self, id: ObjectId) -> Option<BoardObject> {
        let idx = self.objects.iter().position(|o| o.id() == id)?;
        Some(self.objects.remove(idx))
    }

    /// Remove the most recently appended object (undo).
    pub fn remove_last(&mut self) -> Option<BoardObject> {
        self.objects.pop()
    }

    /// Remove every object.
    pub fn clear(&mut self) {
        self.objects.clear();
    }

    /// Replace the whole list with a snapshot, preserving its order.
    pub fn load_snapshot(&mut self, objects: Vec<BoardObject>) {
        self.objects = objects;
    }

    /// Return a reference to an object by id.
    #[must_use]
    pub fn get(&self, id: ObjectId) -> Option<&BoardObject> {
        self.objects.iter().find(|o| o.id() == id)
    }

    /// Whether an object with this id is in the store.
    #[must_use]
    pub fn contains(&self, id: ObjectId) -> bool {
        self.get(id).is_some()
    }

    /// All objects in z-order (bottom first).
    #[must_use]
    pub fn objects(&self) -> &[BoardObject] {
        &self.objects
    }

    /// Number of objects currently in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns `true` if the store contains no objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
