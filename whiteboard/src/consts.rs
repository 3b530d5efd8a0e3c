//! Shared numeric constants for the whiteboard crate.

// ── Geometry ────────────────────────────────────────────────────

/// Fixed margin added around an object's geometry when computing its
/// bounding box, on top of half the stroke width. Keeps thin objects
/// selectable.
pub const BOUNDS_MARGIN: f64 = 6.0;

/// Radius in CSS pixels within which a pointer grabs a corner handle.
pub const HANDLE_RADIUS_PX: f64 = 9.0;

/// Heuristic per-character width as a fraction of the font size, used for
/// text bounds without real glyph metrics.
pub const TEXT_CHAR_WIDTH_FACTOR: f64 = 0.56;

/// Line height as a fraction of the font size.
pub const TEXT_HEIGHT_FACTOR: f64 = 1.3;

/// Fraction of the line height that sits above the text baseline.
pub const TEXT_ASCENT_FACTOR: f64 = 0.82;

/// Minimum width of a text bounding box, so short labels stay grabbable.
pub const TEXT_MIN_BOUNDS_WIDTH: f64 = 40.0;

// ── Rendering ───────────────────────────────────────────────────

/// Eraser strokes composite at this multiple of their nominal width.
pub const ERASER_WIDTH_FACTOR: f64 = 3.0;

/// Base arrowhead length in CSS pixels; grows with stroke width.
pub const ARROW_HEAD_BASE: f64 = 12.0;

/// Additional arrowhead length per unit of stroke width.
pub const ARROW_HEAD_WIDTH_FACTOR: f64 = 1.5;

/// Arrowhead half-angle in radians (30°).
pub const ARROW_HEAD_ANGLE: f64 = std::f64::consts::FRAC_PI_6;

/// Selection decoration color.
pub const SELECTION_COLOR: &str = "#1313ec";

/// The dashed selection box is inflated by this many pixels on each side.
pub const SELECTION_INFLATE_PX: f64 = 3.0;

/// Dash pattern for the selection box (on, off).
pub const SELECTION_DASH: [f64; 2] = [5.0, 3.0];

/// Radius of the circular corner handle markers.
pub const HANDLE_MARKER_RADIUS: f64 = 5.5;

/// Font family for text objects.
pub const HANDWRITING_FONT: &str = "'Caveat', cursive";

// ── Defaults ────────────────────────────────────────────────────

/// Default stroke/fill color for new objects.
pub const DEFAULT_COLOR: &str = "#ffffff";

/// Default stroke width for new objects.
pub const DEFAULT_WIDTH: f64 = 3.0;

/// Default font size for new text objects.
pub const DEFAULT_FONT_SIZE: f64 = 30.0;
