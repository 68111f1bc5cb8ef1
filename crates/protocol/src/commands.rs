use serde::{Deserialize, Serialize};

use crate::theme::ThemeToken;
use crate::types::{Point, Rect};

/// A single, stateless render instruction.
///
/// The core emits a `Vec<RenderCommand>` for the timeline section. Renderers
/// (SVG, terminal) consume the list in order; each command carries all the
/// data it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderCommand {
    /// Draw a filled rectangle, optionally with a text label and the index
    /// of the timeline entry it belongs to.
    DrawRect {
        rect: Rect,
        color: ThemeToken,
        border_color: Option<ThemeToken>,
        label: Option<String>,
        entry_index: Option<usize>,
    },

    /// Draw a text string at a position.
    DrawText {
        position: Point,
        text: String,
        color: ThemeToken,
        font_size: f64,
        align: TextAlign,
    },

    /// Draw a line segment.
    DrawLine {
        from: Point,
        to: Point,
        color: ThemeToken,
        width: f64,
    },

    /// Stroke a curved path. `d` is SVG path data for vector renderers;
    /// `polyline` is the same path flattened for raster/cell renderers.
    DrawPath {
        d: String,
        polyline: Vec<Point>,
        color: ThemeToken,
        width: f64,
        dashed: bool,
    },

    /// Draw the ship marker centred on `center`, rotated by `heading_deg`
    /// (0 points down the page).
    DrawShip {
        center: Point,
        heading_deg: f64,
        size: f64,
        color: ThemeToken,
    },

    /// Push a translation (applied to all subsequent commands until the
    /// matching `PopTransform`).
    PushTransform { translate: Point },

    /// Pop the most recent transform.
    PopTransform,

    /// Begin a logical group (e.g. one timeline card).
    BeginGroup { id: String, label: Option<String> },

    /// End the current group.
    EndGroup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}
