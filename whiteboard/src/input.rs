//! Input model: tools, style state, keys, and the gesture state machine.
//!
//! This module defines the types consumed by the input engine. `Tool` and
//! `UiState` capture the user's intent at the time of a pointer event.
//! `Gesture` is the active pointer-down-to-pointer-up interaction being
//! tracked, carrying all context needed to compute deltas and emit final
//! document mutations on release. Exactly one gesture is active at a time;
//! starting a new tool action discards any in-flight gesture.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::consts::{DEFAULT_COLOR, DEFAULT_FONT_SIZE, DEFAULT_WIDTH};
use crate::doc::{BoardObject, ObjectId, Point};
use crate::geom::Handle;

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Selection / move / resize tool.
    Select,
    /// Freehand drawing (default).
    #[default]
    Pen,
    /// Freehand erasing.
    Eraser,
    /// Straight line segment.
    Line,
    /// Line with an arrowhead.
    Arrow,
    /// Axis-aligned rectangle.
    Rect,
    /// Ellipse inscribed in the dragged box.
    Circle,
    /// Text label placed with an inline editor.
    Text,
}

impl Tool {
    /// Map a single-letter keyboard shortcut to its tool.
    #[must_use]
    pub fn from_shortcut(key: &str) -> Option<Self> {
        match key {
            "v" | "V" => Some(Self::Select),
            "p" | "P" => Some(Self::Pen),
            "e" | "E" => Some(Self::Eraser),
            "l" | "L" => Some(Self::Line),
            "a" | "A" => Some(Self::Arrow),
            "r" | "R" => Some(Self::Rect),
            "c" | "C" => Some(Self::Circle),
            "t" | "T" => Some(Self::Text),
            _ => None,
        }
    }
}

/// Keyboard modifier keys held during an event.
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

/// A keyboard key as reported by the browser (e.g. `"Delete"`, `"z"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

/// Persistent tool and style state visible to the renderer.
#[derive(Debug, Clone)]
pub struct UiState {
    /// Currently active tool.
    pub tool: Tool,
    /// Stroke/fill color applied to new objects.
    pub color: String,
    /// Stroke width applied to new objects.
    pub width: f64,
    /// Font size applied to new text objects.
    pub font_size: f64,
    /// The id of the currently selected object, if any.
    pub selected_id: Option<ObjectId>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            tool: Tool::default(),
            color: DEFAULT_COLOR.to_owned(),
            width: DEFAULT_WIDTH,
            font_size: DEFAULT_FONT_SIZE,
            selected_id: None,
        }
    }
}

/// The active gesture being tracked between pointer-down and pointer-up.
///
/// Each variant carries the context needed to compute incremental updates
/// and the final commit on release, so the state machine is testable
/// without a live rendering surface.
#[derive(Debug, Clone, Default)]
pub enum Gesture {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// Pen or eraser down; points accumulate until release.
    Drawing {
        /// Points gathered so far, seeded with the pointer-down position.
        points: Vec<Point>,
    },
    /// A two-corner shape is being dragged out over a raster snapshot.
    ShapeDragging {
        /// The corner where the drag started.
        start: Point,
    },
    /// The inline text editor is open; no store mutation until commit.
    TextPlacing {
        /// Where the editor was opened.
        anchor: Point,
    },
    /// The selected object is being moved.
    Moving {
        /// Id of the object being moved.
        id: ObjectId,
        /// Pointer position at the previous event, for delta computation.
        last: Point,
    },
    /// The selected object is being resized by one corner handle.
    Resizing {
        /// Id of the object being resized.
        id: ObjectId,
        /// Which corner handle is being dragged.
        handle: Handle,
        /// Snapshot of the object at gesture start, so handle coordinates
        /// are applied against a stable origin rather than an
        /// already-mutated object.
        original: BoardObject,
    },
}
