//! Top-level engine: the gesture state machine and the canvas wrapper.
//!
//! [`EngineCore`] holds all logic that doesn't depend on the canvas element:
//! the document store, tool/style state, and the active gesture. Handlers
//! return [`Action`]s describing the side effects the caller must perform,
//! so the whole state machine is testable without WASM or a browser.
//!
//! [`Engine`] wraps the core with the browser canvas, executes the drawing
//! side effects (full redraws, incremental stroke segments, raster-snapshot
//! shape previews), and turns completed mutations into serialized channel
//! payloads via [`crate::sync::SyncGateway`].

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageData};

use crate::doc::{BoardObject, BoxGeom, DocStore, ObjectId, Point, Stroke, TextObject, new_object_id};
use crate::geom::{self, Handle};
use crate::input::{Gesture, Key, Modifiers, Tool, UiState};
use crate::render;
use crate::sync::{self, Inbound, SyncGateway};

/// Side effects requested by the input handlers. The caller performs them
/// in order; handlers never draw or send anything directly.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Clear and redraw the full scene.
    Redraw,
    /// Draw only the newest pen/eraser segment for responsiveness.
    StrokeSegment { from: Point, to: Point },
    /// Snapshot the current raster before a shape drag begins.
    CaptureRaster,
    /// Restore the pre-drag raster and draw a live shape preview.
    ShapePreview { start: Point, current: Point },
    /// Open the inline text editor at this position.
    TextEditRequested { at: Point },
    /// A mutation completed; broadcast the full object list.
    Broadcast,
    /// The board was cleared; broadcast the distinct clear signal.
    BroadcastClear,
}

/// Core engine state — all logic that doesn't depend on the canvas element.
#[derive(Debug, Default)]
pub struct EngineCore {
    pub doc: DocStore,
    pub ui: UiState,
    pub gesture: Gesture,
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Tool / style ---

    pub fn set_tool(&mut self, tool: Tool) {
        self.ui.tool = tool;
    }

    pub fn set_color(&mut self, color: impl Into<String>) {
        self.ui.color = color.into();
    }

    pub fn set_width(&mut self, width: f64) {
        self.ui.width = width;
    }

    pub fn set_font_size(&mut self, font_size: f64) {
        self.ui.font_size = font_size;
    }

    // --- Queries ---

    /// The currently selected object id, if any.
    #[must_use]
    pub fn selection(&self) -> Option<ObjectId> {
        self.ui.selected_id
    }

    /// Look up an object by id.
    #[must_use]
    pub fn object(&self, id: ObjectId) -> Option<&BoardObject> {
        self.doc.get(id)
    }

    // --- Pointer events ---

    /// Pointer-down starts a gesture according to the active tool. Any
    /// in-flight gesture is discarded.
    pub fn on_pointer_down(&mut self, p: Point) -> Vec<Action> {
        match self.ui.tool {
            Tool::Text => {
                self.gesture = Gesture::TextPlacing { anchor: p };
                vec![Action::TextEditRequested { at: p }]
            }
            Tool::Select => self.select_down(p),
            Tool::Pen | Tool::Eraser => {
                self.gesture = Gesture::Drawing { points: vec![p] };
                Vec::new()
            }
            Tool::Line | Tool::Arrow | Tool::Rect | Tool::Circle => {
                self.gesture = Gesture::ShapeDragging { start: p };
                vec![Action::CaptureRaster]
            }
        }
    }

    fn select_down(&mut self, p: Point) -> Vec<Action> {
        // Handle grab on the current selection wins over hit-testing,
        // so a handle overlapping another object still resizes.
        if let Some(sel_id) = self.ui.selected_id {
            if let Some(obj) = self.doc.get(sel_id) {
                if !obj.is_stroke() {
                    if let Some(handle) = geom::near_handle(geom::bounds(obj), p.x, p.y) {
                        self.gesture = Gesture::Resizing { id: sel_id, handle, original: obj.clone() };
                        return Vec::new();
                    }
                }
            }
        }

        // Reverse z-order: topmost object first.
        match geom::top_hit(&self.doc, p.x, p.y) {
            Some(id) => {
                self.ui.selected_id = Some(id);
                self.gesture = Gesture::Moving { id, last: p };
            }
            None => {
                self.ui.selected_id = None;
                self.gesture = Gesture::Idle;
            }
        }
        vec![Action::Redraw]
    }

    pub fn on_pointer_move(&mut self, p: Point) -> Vec<Action> {
        match &mut self.gesture {
            Gesture::Drawing { points } => {
                points.push(p);
                let n = points.len();
                if n >= 2 {
                    vec![Action::StrokeSegment { from: points[n - 2], to: p }]
                } else {
                    Vec::new()
                }
            }
            Gesture::ShapeDragging { start } => {
                vec![Action::ShapePreview { start: *start, current: p }]
            }
            Gesture::Moving { id, last } => {
                let (dx, dy) = (p.x - last.x, p.y - last.y);
                *last = p;
                let id = *id;
                let Some(mut obj) = self.doc.get(id).cloned() else {
                    // Selection vanished (e.g. remote snapshot mid-gesture).
                    return Vec::new();
                };
                obj.translate(dx, dy);
                self.doc.replace(obj);
                vec![Action::Redraw]
            }
            Gesture::Resizing { handle, original, .. } => {
                // Start from the gesture-start snapshot and write only the
                // coordinates this handle owns.
                let mut updated = original.clone();
                let Some(g) = updated.box_geom_mut() else {
                    // Text has no corner fields; resizing it changes nothing.
                    return Vec::new();
                };
                apply_handle(g, *handle, p);
                if self.doc.replace(updated) {
                    vec![Action::Redraw]
                } else {
                    Vec::new()
                }
            }
            Gesture::Idle | Gesture::TextPlacing { .. } => Vec::new(),
        }
    }

    pub fn on_pointer_up(&mut self, p: Point) -> Vec<Action> {
        match std::mem::take(&mut self.gesture) {
            Gesture::Drawing { mut points } => {
                points.push(p);
                if points.len() >= 2 {
                    let stroke = Stroke {
                        id: new_object_id(),
                        points,
                        color: self.ui.color.clone(),
                        width: self.ui.width,
                        eraser: self.ui.tool == Tool::Eraser,
                    };
                    self.doc.push(BoardObject::Stroke(stroke));
                    vec![Action::Redraw, Action::Broadcast]
                } else {
                    vec![Action::Redraw]
                }
            }
            Gesture::ShapeDragging { start } => {
                // Corner order is immaterial; bounds/render normalize it.
                let geom = BoxGeom {
                    id: new_object_id(),
                    x0: start.x,
                    y0: start.y,
                    x1: p.x,
                    y1: p.y,
                    color: self.ui.color.clone(),
                    width: self.ui.width,
                };
                let obj = match self.ui.tool {
                    Tool::Line => Some(BoardObject::Line(geom)),
                    Tool::Arrow => Some(BoardObject::Arrow(geom)),
                    Tool::Rect => Some(BoardObject::Rect(geom)),
                    Tool::Circle => Some(BoardObject::Circle(geom)),
                    // Tool changed mid-drag: drop the preview.
                    _ => None,
                };
                match obj {
                    Some(obj) => {
                        self.doc.push(obj);
                        vec![Action::Redraw, Action::Broadcast]
                    }
                    None => vec![Action::Redraw],
                }
            }
            Gesture::Moving { .. } | Gesture::Resizing { .. } => {
                // Back to Idle-with-selection; broadcast the final state.
                vec![Action::Broadcast]
            }
            Gesture::TextPlacing { anchor } => {
                // The release that follows the opening click; the editor
                // stays open until commit or cancel.
                self.gesture = Gesture::TextPlacing { anchor };
                Vec::new()
            }
            Gesture::Idle => Vec::new(),
        }
    }

    // --- Text editor ---

    /// Commit the inline editor's value. Non-empty trimmed text becomes a
    /// text object anchored one line-height below the click point; empty
    /// text is silently discarded.
    pub fn commit_text(&mut self, value: &str) -> Vec<Action> {
        let Gesture::TextPlacing { anchor } = std::mem::take(&mut self.gesture) else {
            return Vec::new();
        };
        if value.trim().is_empty() {
            return Vec::new();
        }
        let text = TextObject {
            id: new_object_id(),
            x: anchor.x,
            y: anchor.y + self.ui.font_size,
            text: value.to_owned(),
            font_size: self.ui.font_size,
            color: self.ui.color.clone(),
        };
        self.doc.push(BoardObject::Text(text));
        vec![Action::Redraw, Action::Broadcast]
    }

    /// Close the inline editor without committing.
    pub fn cancel_text(&mut self) -> Vec<Action> {
        if matches!(self.gesture, Gesture::TextPlacing { .. }) {
            self.gesture = Gesture::Idle;
        }
        Vec::new()
    }

    // --- Keyboard ---

    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        // While the inline editor is open, keys belong to the text field.
        if matches!(self.gesture, Gesture::TextPlacing { .. }) {
            if key.0 == "Escape" {
                return self.cancel_text();
            }
            return Vec::new();
        }

        if (key.0 == "Delete" || key.0 == "Backspace") && self.ui.selected_id.is_some() {
            return self.delete_selection();
        }

        if (modifiers.ctrl || modifiers.meta) && (key.0 == "z" || key.0 == "Z") {
            return self.undo();
        }

        if let Some(tool) = Tool::from_shortcut(&key.0) {
            self.set_tool(tool);
        }
        Vec::new()
    }

    /// Remove the selected object. No-op without a selection.
    pub fn delete_selection(&mut self) -> Vec<Action> {
        let Some(id) = self.ui.selected_id.take() else {
            return Vec::new();
        };
        self.doc.remove(id);
        vec![Action::Redraw, Action::Broadcast]
    }

    /// Remove the most recently appended object, regardless of what the
    /// last user action was. Deliberately weak: moves, resizes, and deletes
    /// are not undone.
    pub fn undo(&mut self) -> Vec<Action> {
        self.doc.remove_last();
        self.ui.selected_id = None;
        vec![Action::Redraw, Action::Broadcast]
    }

    /// Empty the store. The host asks for confirmation first; the distinct
    /// clear signal is emitted exactly once so all peers reset atomically.
    pub fn clear_all(&mut self) -> Vec<Action> {
        self.doc.clear();
        self.ui.selected_id = None;
        self.gesture = Gesture::Idle;
        vec![Action::Redraw, Action::BroadcastClear]
    }

    // --- Channel inputs ---

    /// Unconditionally replace the store with a remote snapshot. Selection
    /// is local-only and is cleared; an in-flight gesture keeps running
    /// against the new store (accepted last-write-wins race).
    pub fn apply_snapshot(&mut self, objects: Vec<BoardObject>) -> Vec<Action> {
        self.doc.load_snapshot(objects);
        self.ui.selected_id = None;
        vec![Action::Redraw]
    }

    /// A peer cleared the board.
    pub fn apply_clear(&mut self) -> Vec<Action> {
        self.doc.clear();
        self.ui.selected_id = None;
        vec![Action::Redraw]
    }
}

/// Write the pointer position into the one or two coordinates a corner
/// handle owns.
fn apply_handle(g: &mut BoxGeom, handle: Handle, p: Point) {
    match handle {
        Handle::Nw => {
            g.x0 = p.x;
            g.y0 = p.y;
        }
        Handle::Ne => {
            g.x1 = p.x;
            g.y0 = p.y;
        }
        Handle::Sw => {
            g.x0 = p.x;
            g.y1 = p.y;
        }
        Handle::Se => {
            g.x1 = p.x;
            g.y1 = p.y;
        }
    }
}

/// What the host must do after an engine call: emit a channel payload or
/// open the inline text editor. Drawing side effects are already done.
#[derive(Debug, Clone, PartialEq)]
pub enum HostCommand {
    /// Serialized event to emit on the room channel (fire-and-forget).
    Send(String),
    /// Open the inline text editor at this CSS-pixel position.
    OpenTextEditor(Point),
}

/// The full whiteboard engine. Wraps [`EngineCore`] with the browser canvas
/// element and owns the raster snapshots used for shape previews and
/// viewport resizes.
pub struct Engine {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    gateway: SyncGateway,
    /// Raster captured at shape-drag start, restored before each preview.
    drag_raster: Option<ImageData>,
    css_width: f64,
    css_height: f64,
    dpr: f64,
    pub core: EngineCore,
}

impl Engine {
    /// Create an engine bound to a canvas element and a room.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the canvas cannot produce a 2D context.
    pub fn new(canvas: HtmlCanvasElement, room_id: &str) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self {
            canvas,
            ctx,
            gateway: SyncGateway::new(room_id),
            drag_raster: None,
            css_width: 0.0,
            css_height: 0.0,
            dpr: 1.0,
            core: EngineCore::new(),
        })
    }

    /// Resize the backing store to CSS size × device pixel ratio.
    ///
    /// Scoped capture/restore: the current raster is grabbed before the
    /// backing store is rebuilt and painted back afterwards, so nothing on
    /// screen is lost. Must complete before further draws are accepted.
    ///
    /// # Errors
    ///
    /// Returns `Err` if a Canvas2D call fails.
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) -> Result<(), JsValue> {
        let old = self.capture_raster().ok();

        self.css_width = width_css;
        self.css_height = height_css;
        self.dpr = dpr;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        {
            self.canvas.set_width((width_css * dpr).floor() as u32);
            self.canvas.set_height((height_css * dpr).floor() as u32);
        }
        self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;

        self.redraw()?;
        if let Some(img) = old {
            // put_image_data works in device pixels and ignores the transform.
            self.ctx.put_image_data(&img, 0.0, 0.0)?;
        }
        Ok(())
    }

    fn capture_raster(&self) -> Result<ImageData, JsValue> {
        self.ctx
            .get_image_data(0.0, 0.0, f64::from(self.canvas.width()), f64::from(self.canvas.height()))
    }

    fn redraw(&self) -> Result<(), JsValue> {
        render::draw(&self.ctx, &self.core.doc, &self.core.ui, self.css_width, self.css_height, self.dpr)
    }

    /// Execute the drawing side effects of a batch of actions and collect
    /// the commands the host still has to handle.
    fn apply(&mut self, actions: Vec<Action>) -> Result<Vec<HostCommand>, JsValue> {
        let mut out = Vec::new();
        for action in actions {
            match action {
                Action::Redraw => self.redraw()?,
                Action::StrokeSegment { from, to } => {
                    render::draw_stroke_segment(&self.ctx, &self.core.ui, from, to)?;
                }
                Action::CaptureRaster => {
                    self.drag_raster = Some(self.capture_raster()?);
                }
                Action::ShapePreview { start, current } => {
                    if let Some(img) = &self.drag_raster {
                        self.ctx.put_image_data(img, 0.0, 0.0)?;
                    }
                    render::draw_shape_preview(&self.ctx, &self.core.ui, start, current)?;
                }
                Action::TextEditRequested { at } => out.push(HostCommand::OpenTextEditor(at)),
                Action::Broadcast => {
                    out.push(HostCommand::Send(self.gateway.snapshot(&self.core.doc)));
                }
                Action::BroadcastClear => out.push(HostCommand::Send(self.gateway.clear())),
            }
        }
        Ok(out)
    }

    // --- Input events (touch maps 1:1 onto these via the primary contact) ---

    /// # Errors
    ///
    /// Returns `Err` if a Canvas2D call fails.
    pub fn on_pointer_down(&mut self, p: Point) -> Result<Vec<HostCommand>, JsValue> {
        let actions = self.core.on_pointer_down(p);
        self.apply(actions)
    }

    /// # Errors
    ///
    /// Returns `Err` if a Canvas2D call fails.
    pub fn on_pointer_move(&mut self, p: Point) -> Result<Vec<HostCommand>, JsValue> {
        let actions = self.core.on_pointer_move(p);
        self.apply(actions)
    }

    /// # Errors
    ///
    /// Returns `Err` if a Canvas2D call fails.
    pub fn on_pointer_up(&mut self, p: Point) -> Result<Vec<HostCommand>, JsValue> {
        let actions = self.core.on_pointer_up(p);
        self.drag_raster = None;
        self.apply(actions)
    }

    /// # Errors
    ///
    /// Returns `Err` if a Canvas2D call fails.
    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) -> Result<Vec<HostCommand>, JsValue> {
        let actions = self.core.on_key_down(key, modifiers);
        self.apply(actions)
    }

    /// # Errors
    ///
    /// Returns `Err` if a Canvas2D call fails.
    pub fn commit_text(&mut self, value: &str) -> Result<Vec<HostCommand>, JsValue> {
        let actions = self.core.commit_text(value);
        self.apply(actions)
    }

    pub fn cancel_text(&mut self) {
        self.core.cancel_text();
    }

    /// # Errors
    ///
    /// Returns `Err` if a Canvas2D call fails.
    pub fn delete_selection(&mut self) -> Result<Vec<HostCommand>, JsValue> {
        let actions = self.core.delete_selection();
        self.apply(actions)
    }

    /// # Errors
    ///
    /// Returns `Err` if a Canvas2D call fails.
    pub fn undo(&mut self) -> Result<Vec<HostCommand>, JsValue> {
        let actions = self.core.undo();
        self.apply(actions)
    }

    /// Empty the board. The host confirms with the user before calling.
    ///
    /// # Errors
    ///
    /// Returns `Err` if a Canvas2D call fails.
    pub fn clear_all(&mut self) -> Result<Vec<HostCommand>, JsValue> {
        let actions = self.core.clear_all();
        self.apply(actions)
    }

    /// Feed one message from the room channel into the engine.
    ///
    /// # Errors
    ///
    /// Returns `Err` if a Canvas2D call fails during the redraw.
    pub fn on_channel_message(&mut self, text: &str) -> Result<(), JsValue> {
        let actions = match sync::decode_inbound(text) {
            Some(Inbound::ObjectSync(objects)) => self.core.apply_snapshot(objects),
            Some(Inbound::Clear) => self.core.apply_clear(),
            None => Vec::new(),
        };
        self.apply(actions)?;
        Ok(())
    }

    // --- Delegated tool / style setters ---

    pub fn set_tool(&mut self, tool: Tool) {
        self.core.set_tool(tool);
    }

    pub fn set_color(&mut self, color: &str) {
        self.core.set_color(color);
    }

    pub fn set_width(&mut self, width: f64) {
        self.core.set_width(width);
    }

    pub fn set_font_size(&mut self, font_size: f64) {
        self.core.set_font_size(font_size);
    }

    // --- Delegated queries ---

    #[must_use]
    pub fn selection(&self) -> Option<ObjectId> {
        self.core.selection()
    }

    #[must_use]
    pub fn room_id(&self) -> &str {
        self.gateway.room_id()
    }
}
