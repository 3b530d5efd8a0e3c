#![allow(clippy::float_cmp)]

use super::*;
use crate::doc::{BoxGeom, Stroke, TextObject, new_object_id};

fn stroke(points: &[(f64, f64)], width: f64) -> BoardObject {
    BoardObject::Stroke(Stroke {
        id: new_object_id(),
        points: points.iter().map(|&(x, y)| Point::new(x, y)).collect(),
        color: "#fff".into(),
        width,
        eraser: false,
    })
}

fn rect(x0: f64, y0: f64, x1: f64, y1: f64, width: f64) -> BoardObject {
    BoardObject::Rect(BoxGeom { id: new_object_id(), x0, y0, x1, y1, color: "#fff".into(), width })
}

fn text(x: f64, y: f64, content: &str, font_size: f64) -> BoardObject {
    BoardObject::Text(TextObject {
        id: new_object_id(),
        x,
        y,
        text: content.into(),
        font_size,
        color: "#fff".into(),
    })
}

// =============================================================
// bounds
// =============================================================

#[test]
fn stroke_bounds_cover_all_points_plus_padding() {
    let obj = stroke(&[(10.0, 20.0), (30.0, 5.0), (15.0, 40.0)], 4.0);
    let b = bounds(&obj);
    let pad = 4.0 / 2.0 + 6.0;
    assert_eq!(b.x, 10.0 - pad);
    assert_eq!(b.y, 5.0 - pad);
    assert_eq!(b.w, 20.0 + pad * 2.0);
    assert_eq!(b.h, 35.0 + pad * 2.0);
}

#[test]
fn box_bounds_normalize_unordered_corners() {
    // Dragged right-to-left, bottom-to-top.
    let obj = rect(50.0, 40.0, 10.0, 8.0, 2.0);
    let b = bounds(&obj);
    let pad = 2.0 / 2.0 + 6.0;
    assert_eq!(b.x, 10.0 - pad);
    assert_eq!(b.y, 8.0 - pad);
    assert_eq!(b.w, 40.0 + pad * 2.0);
    assert_eq!(b.h, 32.0 + pad * 2.0);
}

#[test]
fn text_bounds_scale_with_length_and_font_size() {
    let short = text(100.0, 100.0, "ab", 30.0);
    let long = text(100.0, 100.0, "a much longer label", 30.0);
    assert!(bounds(&long).w > bounds(&short).w);

    let b = bounds(&short);
    assert_eq!(b.h, 30.0 * 1.3);
    assert_eq!(b.y, 100.0 - 30.0 * 1.3 * 0.82);
}

#[test]
fn text_bounds_have_minimum_width() {
    let b = bounds(&text(0.0, 0.0, "i", 10.0));
    assert!(b.w >= 40.0);
}

#[test]
fn bounds_are_never_negative() {
    let objects = [
        stroke(&[(5.0, 5.0), (5.0, 5.0)], 1.0), // degenerate dot
        rect(7.0, 7.0, 7.0, 7.0, 0.0),          // zero-size box
        text(0.0, 0.0, "", 12.0),
    ];
    for obj in &objects {
        let b = bounds(obj);
        assert!(b.w >= 0.0, "{obj:?}");
        assert!(b.h >= 0.0, "{obj:?}");
    }
}

#[test]
fn bounds_contain_defining_coordinates() {
    let obj = rect(10.0, 10.0, 50.0, 50.0, 2.0);
    let b = bounds(&obj);
    assert!(b.contains(10.0, 10.0));
    assert!(b.contains(50.0, 50.0));
    assert!(b.contains(30.0, 30.0));
}

// =============================================================
// hit_test
// =============================================================

#[test]
fn hit_at_bounds_center_for_every_kind() {
    let objects = [
        stroke(&[(0.0, 0.0), (20.0, 20.0)], 3.0),
        rect(0.0, 0.0, 20.0, 20.0, 3.0),
        BoardObject::Line(BoxGeom {
            id: new_object_id(),
            x0: 0.0,
            y0: 0.0,
            x1: 20.0,
            y1: 20.0,
            color: "#fff".into(),
            width: 3.0,
        }),
        text(0.0, 20.0, "hello", 20.0),
    ];
    for obj in &objects {
        let b = bounds(obj);
        assert!(hit_test(obj, b.x + b.w / 2.0, b.y + b.h / 2.0), "{obj:?}");
    }
}

#[test]
fn miss_far_outside_bounds() {
    let obj = rect(0.0, 0.0, 20.0, 20.0, 3.0);
    let b = bounds(&obj);
    assert!(!hit_test(&obj, b.x + b.w + 1000.0, b.y + b.h + 1000.0));
}

#[test]
fn line_hit_region_is_rectangular() {
    // Deliberate approximation: a point near the box corner but far from
    // the diagonal still hits.
    let obj = BoardObject::Line(BoxGeom {
        id: new_object_id(),
        x0: 0.0,
        y0: 0.0,
        x1: 100.0,
        y1: 100.0,
        color: "#fff".into(),
        width: 2.0,
    });
    assert!(hit_test(&obj, 95.0, 5.0));
}

// =============================================================
// Handles
// =============================================================

#[test]
fn handle_positions_are_the_four_corners() {
    let b = Bounds { x: 0.0, y: 0.0, w: 10.0, h: 20.0 };
    assert_eq!(handle_pos(b, Handle::Nw), Point::new(0.0, 0.0));
    assert_eq!(handle_pos(b, Handle::Ne), Point::new(10.0, 0.0));
    assert_eq!(handle_pos(b, Handle::Sw), Point::new(0.0, 20.0));
    assert_eq!(handle_pos(b, Handle::Se), Point::new(10.0, 20.0));
}

#[test]
fn near_handle_within_radius() {
    let b = Bounds { x: 0.0, y: 0.0, w: 100.0, h: 100.0 };
    assert_eq!(near_handle(b, 3.0, 3.0), Some(Handle::Nw));
    assert_eq!(near_handle(b, 104.0, 97.0), Some(Handle::Se));
}

#[test]
fn near_handle_misses_outside_radius() {
    let b = Bounds { x: 0.0, y: 0.0, w: 100.0, h: 100.0 };
    assert_eq!(near_handle(b, 50.0, 50.0), None);
    assert_eq!(near_handle(b, 0.0, 20.0), None);
}

#[test]
fn near_handle_boundary_is_exclusive() {
    let b = Bounds { x: 0.0, y: 0.0, w: 100.0, h: 100.0 };
    assert_eq!(near_handle(b, 9.0, 0.0), None); // exactly 9px away
    assert_eq!(near_handle(b, 8.9, 0.0), Some(Handle::Nw));
}

// =============================================================
// top_hit
// =============================================================

#[test]
fn top_hit_prefers_topmost_overlapping_object() {
    let mut doc = DocStore::new();
    let under = rect(0.0, 0.0, 50.0, 50.0, 2.0);
    let over = rect(10.0, 10.0, 60.0, 60.0, 2.0);
    let over_id = over.id();
    doc.push(under);
    doc.push(over);

    assert_eq!(top_hit(&doc, 30.0, 30.0), Some(over_id));
}

#[test]
fn top_hit_falls_through_to_lower_objects() {
    let mut doc = DocStore::new();
    let under = rect(0.0, 0.0, 50.0, 50.0, 2.0);
    let over = rect(100.0, 100.0, 150.0, 150.0, 2.0);
    let under_id = under.id();
    doc.push(under);
    doc.push(over);

    assert_eq!(top_hit(&doc, 25.0, 25.0), Some(under_id));
}

#[test]
fn top_hit_none_on_empty_canvas() {
    let doc = DocStore::new();
    assert_eq!(top_hit(&doc, 0.0, 0.0), None);
}
