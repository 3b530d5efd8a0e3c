//! Geometry engine: bounding boxes, hit-testing, and resize handles.
//!
//! Pure functions over plain document data — nothing in here touches a
//! canvas handle, so every path is unit-testable. Hit-testing is a
//! deliberate bounding-box approximation for every object kind, including
//! circles and lines: the rectangular hit region keeps thin and hollow
//! shapes easy to grab.

#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use crate::consts::{
    BOUNDS_MARGIN, HANDLE_RADIUS_PX, TEXT_ASCENT_FACTOR, TEXT_CHAR_WIDTH_FACTOR,
    TEXT_HEIGHT_FACTOR, TEXT_MIN_BOUNDS_WIDTH,
};
use crate::doc::{BoardObject, DocStore, ObjectId, Point};

/// Axis-aligned bounding box in CSS-pixel canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Bounds {
    /// Whether `(x, y)` lies inside the box (edges inclusive).
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.w && y >= self.y && y <= self.y + self.h
    }
}

/// One of the four corner resize handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    Nw,
    Ne,
    Sw,
    Se,
}

/// All handles in drawing order.
pub const HANDLES: [Handle; 4] = [Handle::Nw, Handle::Ne, Handle::Sw, Handle::Se];

/// Bounding box for an object, padded so thin objects remain selectable.
///
/// Stroke and box kinds pad by half the stroke width plus a fixed margin.
/// Text bounds come from a character-count heuristic, not glyph metrics.
#[must_use]
pub fn bounds(obj: &BoardObject) -> Bounds {
    match obj {
        BoardObject::Stroke(s) => {
            let pad = s.width / 2.0 + BOUNDS_MARGIN;
            let first = s.points.first().copied().unwrap_or(Point::new(0.0, 0.0));
            let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
            for p in &s.points {
                min_x = min_x.min(p.x);
                min_y = min_y.min(p.y);
                max_x = max_x.max(p.x);
                max_y = max_y.max(p.y);
            }
            Bounds {
                x: min_x - pad,
                y: min_y - pad,
                w: max_x - min_x + pad * 2.0,
                h: max_y - min_y + pad * 2.0,
            }
        }
        BoardObject::Line(g) | BoardObject::Arrow(g) | BoardObject::Rect(g) | BoardObject::Circle(g) => {
            let pad = g.width / 2.0 + BOUNDS_MARGIN;
            let x0 = g.x0.min(g.x1);
            let y0 = g.y0.min(g.y1);
            let x1 = g.x0.max(g.x1);
            let y1 = g.y0.max(g.y1);
            Bounds {
                x: x0 - pad,
                y: y0 - pad,
                w: x1 - x0 + pad * 2.0,
                h: y1 - y0 + pad * 2.0,
            }
        }
        BoardObject::Text(t) => {
            let h = t.font_size * TEXT_HEIGHT_FACTOR;
            let chars = t.text.chars().count().max(1) as f64;
            let w = (chars * t.font_size * TEXT_CHAR_WIDTH_FACTOR).max(TEXT_MIN_BOUNDS_WIDTH);
            Bounds { x: t.x, y: t.y - h * TEXT_ASCENT_FACTOR, w, h }
        }
    }
}

/// Point-in-bounding-box test for every object kind.
#[must_use]
pub fn hit_test(obj: &BoardObject, x: f64, y: f64) -> bool {
    bounds(obj).contains(x, y)
}

/// Position of a corner handle on a bounding box.
#[must_use]
pub fn handle_pos(b: Bounds, handle: Handle) -> Point {
    match handle {
        Handle::Nw => Point::new(b.x, b.y),
        Handle::Ne => Point::new(b.x + b.w, b.y),
        Handle::Sw => Point::new(b.x, b.y + b.h),
        Handle::Se => Point::new(b.x + b.w, b.y + b.h),
    }
}

/// Which corner handle (if any) lies within [`HANDLE_RADIUS_PX`] of `(x, y)`.
#[must_use]
pub fn near_handle(b: Bounds, x: f64, y: f64) -> Option<Handle> {
    HANDLES
        .into_iter()
        .find(|&h| {
            let p = handle_pos(b, h);
            (x - p.x).hypot(y - p.y) < HANDLE_RADIUS_PX
        })
}

/// Topmost object under `(x, y)`, scanning in reverse z-order.
#[must_use]
pub fn top_hit(doc: &DocStore, x: f64, y: f64) -> Option<ObjectId> {
    doc.objects()
        .iter()
        .rev()
        .find(|o| hit_test(o, x, y))
        .map(BoardObject::id)
}
