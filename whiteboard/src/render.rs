//! Rendering: full clear-and-redraw of the scene plus live gesture previews.
//!
//! This module is the only place that touches
//! [`web_sys::CanvasRenderingContext2d`]. It receives read-only views of the
//! document and UI state and produces pixels — it never mutates application
//! state. The backing store is sized at CSS size × device pixel ratio with
//! the transform pre-scaled, so all coordinates here are CSS pixels.
//!
//! All fallible Canvas2D calls propagate errors via `Result<(), JsValue>`;
//! the top-level caller ([`crate::engine::Engine`]) handles the result.

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::consts::{
    ARROW_HEAD_ANGLE, ARROW_HEAD_BASE, ARROW_HEAD_WIDTH_FACTOR, ERASER_WIDTH_FACTOR,
    HANDLE_MARKER_RADIUS, HANDWRITING_FONT, SELECTION_COLOR, SELECTION_DASH, SELECTION_INFLATE_PX,
};
use crate::doc::{BoardObject, BoxGeom, DocStore, Point, Stroke, TextObject};
use crate::geom::{self, HANDLES};
use crate::input::{Tool, UiState};

/// Draw the full scene: objects in z-order, then selection decoration.
///
/// # Errors
///
/// Returns `Err` if any Canvas2D call fails.
pub fn draw(
    ctx: &CanvasRenderingContext2d,
    doc: &DocStore,
    ui: &UiState,
    viewport_w: f64,
    viewport_h: f64,
    dpr: f64,
) -> Result<(), JsValue> {
    ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;
    ctx.clear_rect(0.0, 0.0, viewport_w, viewport_h);

    for obj in doc.objects() {
        draw_object(ctx, obj)?;
    }

    if let Some(sel) = ui.selected_id.and_then(|id| doc.get(id)) {
        draw_selection(ctx, sel)?;
    }
    Ok(())
}

fn draw_object(ctx: &CanvasRenderingContext2d, obj: &BoardObject) -> Result<(), JsValue> {
    ctx.save();
    let result = match obj {
        BoardObject::Stroke(s) => draw_stroke(ctx, s),
        BoardObject::Line(g) => {
            apply_line_style(ctx, &g.color, g.width);
            draw_line_path(ctx, g);
            Ok(())
        }
        BoardObject::Arrow(g) => {
            apply_line_style(ctx, &g.color, g.width);
            draw_line_path(ctx, g);
            draw_arrowhead(ctx, Point::new(g.x0, g.y0), Point::new(g.x1, g.y1), g.width);
            Ok(())
        }
        BoardObject::Rect(g) => {
            apply_line_style(ctx, &g.color, g.width);
            ctx.stroke_rect(g.x0, g.y0, g.x1 - g.x0, g.y1 - g.y0);
            Ok(())
        }
        BoardObject::Circle(g) => {
            apply_line_style(ctx, &g.color, g.width);
            draw_ellipse(ctx, g)
        }
        BoardObject::Text(t) => draw_text(ctx, t),
    };
    ctx.restore();
    result
}

// =============================================================
// Object renderers
// =============================================================

/// Smooth the polyline with quadratic curves through the midpoints of
/// consecutive points. Eraser strokes punch through the raster with
/// destination-out compositing at 3× nominal width.
fn draw_stroke(ctx: &CanvasRenderingContext2d, s: &Stroke) -> Result<(), JsValue> {
    if s.points.is_empty() {
        return Ok(());
    }
    set_round_line(ctx);
    if s.eraser {
        ctx.set_global_composite_operation("destination-out")?;
        ctx.set_stroke_style_str("rgba(0,0,0,1)");
        ctx.set_line_width(s.width * ERASER_WIDTH_FACTOR);
    } else {
        ctx.set_stroke_style_str(&s.color);
        ctx.set_line_width(s.width);
    }

    let pts = &s.points;
    ctx.begin_path();
    ctx.move_to(pts[0].x, pts[0].y);
    for i in 1..pts.len().saturating_sub(1) {
        let mx = (pts[i].x + pts[i + 1].x) / 2.0;
        let my = (pts[i].y + pts[i + 1].y) / 2.0;
        ctx.quadratic_curve_to(pts[i].x, pts[i].y, mx, my);
    }
    if pts.len() > 1 {
        let last = pts[pts.len() - 1];
        ctx.line_to(last.x, last.y);
    }
    ctx.stroke();
    ctx.set_global_composite_operation("source-over")?;
    Ok(())
}

fn draw_line_path(ctx: &CanvasRenderingContext2d, g: &BoxGeom) {
    ctx.begin_path();
    ctx.move_to(g.x0, g.y0);
    ctx.line_to(g.x1, g.y1);
    ctx.stroke();
}

/// Filled triangular arrowhead at the shaft tip, sized with the stroke
/// width and oriented along the shaft angle.
fn draw_arrowhead(ctx: &CanvasRenderingContext2d, from: Point, tip: Point, width: f64) {
    let angle = (tip.y - from.y).atan2(tip.x - from.x);
    let size = ARROW_HEAD_BASE + width * ARROW_HEAD_WIDTH_FACTOR;

    ctx.begin_path();
    ctx.move_to(tip.x, tip.y);
    ctx.line_to(
        tip.x - size * (angle - ARROW_HEAD_ANGLE).cos(),
        tip.y - size * (angle - ARROW_HEAD_ANGLE).sin(),
    );
    ctx.line_to(
        tip.x - size * (angle + ARROW_HEAD_ANGLE).cos(),
        tip.y - size * (angle + ARROW_HEAD_ANGLE).sin(),
    );
    ctx.close_path();
    ctx.fill();
}

/// Ellipse inscribed in the (possibly unordered) corner box.
fn draw_ellipse(ctx: &CanvasRenderingContext2d, g: &BoxGeom) -> Result<(), JsValue> {
    let rx = (g.x1 - g.x0).abs() / 2.0;
    let ry = (g.y1 - g.y0).abs() / 2.0;
    let cx = g.x0 + (g.x1 - g.x0) / 2.0;
    let cy = g.y0 + (g.y1 - g.y0) / 2.0;
    ctx.begin_path();
    ctx.ellipse(cx, cy, rx, ry, 0.0, 0.0, 2.0 * PI)?;
    ctx.stroke();
    Ok(())
}

fn draw_text(ctx: &CanvasRenderingContext2d, t: &TextObject) -> Result<(), JsValue> {
    ctx.set_fill_style_str(&t.color);
    ctx.set_font(&format!("{}px {HANDWRITING_FONT}", t.font_size));
    ctx.fill_text(&t.text, t.x, t.y)?;
    Ok(())
}

// =============================================================
// Selection decoration
// =============================================================

fn draw_selection(ctx: &CanvasRenderingContext2d, obj: &BoardObject) -> Result<(), JsValue> {
    let b = geom::bounds(obj);

    ctx.save();
    ctx.set_stroke_style_str(SELECTION_COLOR);
    ctx.set_line_width(1.5);

    let dash = js_sys::Array::new();
    for d in SELECTION_DASH {
        dash.push(&d.into());
    }
    ctx.set_line_dash(&dash)?;
    ctx.stroke_rect(
        b.x - SELECTION_INFLATE_PX,
        b.y - SELECTION_INFLATE_PX,
        b.w + SELECTION_INFLATE_PX * 2.0,
        b.h + SELECTION_INFLATE_PX * 2.0,
    );
    ctx.set_line_dash(&js_sys::Array::new())?;

    // Corner handles for everything except strokes.
    if !obj.is_stroke() {
        ctx.set_fill_style_str("#fff");
        for h in HANDLES {
            let p = geom::handle_pos(b, h);
            ctx.begin_path();
            ctx.arc(p.x, p.y, HANDLE_MARKER_RADIUS, 0.0, 2.0 * PI)?;
            ctx.fill();
            ctx.stroke();
        }
    }

    ctx.restore();
    Ok(())
}

// =============================================================
// Live gesture previews
// =============================================================

/// Draw only the newest pen/eraser segment. The committed stroke is rebuilt
/// from the full point list at pointer-up, which also smooths it.
///
/// # Errors
///
/// Returns `Err` if a Canvas2D call fails.
pub fn draw_stroke_segment(
    ctx: &CanvasRenderingContext2d,
    ui: &UiState,
    from: Point,
    to: Point,
) -> Result<(), JsValue> {
    ctx.save();
    set_round_line(ctx);
    if ui.tool == Tool::Eraser {
        ctx.set_global_composite_operation("destination-out")?;
        ctx.set_stroke_style_str("rgba(0,0,0,1)");
        ctx.set_line_width(ui.width * ERASER_WIDTH_FACTOR);
    } else {
        ctx.set_stroke_style_str(&ui.color);
        ctx.set_line_width(ui.width);
    }
    ctx.begin_path();
    ctx.move_to(from.x, from.y);
    ctx.line_to(to.x, to.y);
    ctx.stroke();
    ctx.restore();
    Ok(())
}

/// Draw the live preview of a shape drag from `start` to `current`. The
/// caller restores the pre-drag raster first; the store is untouched.
///
/// # Errors
///
/// Returns `Err` if a Canvas2D call fails.
pub fn draw_shape_preview(
    ctx: &CanvasRenderingContext2d,
    ui: &UiState,
    start: Point,
    current: Point,
) -> Result<(), JsValue> {
    ctx.save();
    set_round_line(ctx);
    ctx.set_stroke_style_str(&ui.color);
    ctx.set_fill_style_str(&ui.color);
    ctx.set_line_width(ui.width);

    let g = BoxGeom {
        id: uuid::Uuid::nil(),
        x0: start.x,
        y0: start.y,
        x1: current.x,
        y1: current.y,
        color: ui.color.clone(),
        width: ui.width,
    };
    let result = match ui.tool {
        Tool::Line => {
            draw_line_path(ctx, &g);
            Ok(())
        }
        Tool::Arrow => {
            draw_line_path(ctx, &g);
            draw_arrowhead(ctx, start, current, ui.width);
            Ok(())
        }
        Tool::Rect => {
            ctx.stroke_rect(g.x0, g.y0, g.x1 - g.x0, g.y1 - g.y0);
            Ok(())
        }
        Tool::Circle => draw_ellipse(ctx, &g),
        _ => Ok(()),
    };

    ctx.restore();
    result
}

// =============================================================
// Helpers
// =============================================================

fn apply_line_style(ctx: &CanvasRenderingContext2d, color: &str, width: f64) {
    set_round_line(ctx);
    ctx.set_stroke_style_str(color);
    ctx.set_fill_style_str(color);
    ctx.set_line_width(width);
}

fn set_round_line(ctx: &CanvasRenderingContext2d) {
    ctx.set_line_cap("round");
    ctx.set_line_join("round");
}
