use deck_core::{EdgeBorders, Rect, WindowId};
use serde_json::Value;

use crate::node::PartNode;

// ──────────────────────────────────────────────
// Cells
// ──────────────────────────────────────────────

/// The component mounted in a cell, with its per-instance state blobs.
#[derive(Debug, Clone, PartialEq)]
pub struct CellComponent {
    /// Catalog name of the component kind.
    pub name: String,
    /// Per-kind instance number, from the engine's ordinal pools.
    pub ordinal: u32,
    /// Whether the kind exposes a config surface at all.
    pub has_config: bool,
    pub data: Value,
    pub config: Value,
}

/// One leaf of a window's partition tree: a rectangle that can host a
/// component. All pixel fields are derived; the tree is the source of truth.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub window: WindowId,
    pub component: Option<CellComponent>,

    pub width: f32,
    pub height: f32,
    pub top: f32,
    pub left: f32,
    /// Largest extent this cell may be dragged out to along each axis.
    pub max_width: f32,
    pub max_height: f32,

    // Distances to the owning window's four edges.
    pub top_offset: f32,
    pub bottom_offset: f32,
    pub left_offset: f32,
    pub right_offset: f32,

    pub min_width: f32,
    pub min_height: f32,

    pub borders: EdgeBorders,
    pub has_right_handle: bool,
    pub has_bottom_handle: bool,

    /// Set while this cell is being dragged out of a multi-cell window.
    pub dragging: bool,
}

impl Cell {
    pub fn new(window: WindowId) -> Self {
        Self {
            window,
            component: None,
            width: 0.0,
            height: 0.0,
            top: 0.0,
            left: 0.0,
            max_width: 0.0,
            max_height: 0.0,
            top_offset: 0.0,
            bottom_offset: 0.0,
            left_offset: 0.0,
            right_offset: 0.0,
            min_width: crate::MIN_CELL_WIDTH,
            min_height: crate::MIN_CELL_HEIGHT,
            borders: EdgeBorders::all(),
            has_right_handle: false,
            has_bottom_handle: false,
            dragging: false,
        }
    }
}

// ──────────────────────────────────────────────
// Windows
// ──────────────────────────────────────────────

/// A top-level frame on the canvas. Position and size are stored as
/// fractions of the canvas so the window survives canvas resizes; the
/// pixel fields are recomputed from them on every adapt pass.
#[derive(Debug, Clone)]
pub struct Window {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,

    pub left_px: f32,
    pub top_px: f32,
    pub width_px: f32,
    pub height_px: f32,

    pub min_width: f32,
    pub min_height: f32,

    /// Display number for multi-cell windows ("Window 3"); single-cell
    /// windows are labelled after their component instead.
    pub ordinal: Option<u32>,
    pub is_single_cell: bool,
    pub fullscreen: bool,
    pub hidden: bool,
    pub temp_show: bool,
    pub pinned: bool,
    pub dragging: bool,

    pub root: PartNode,
}

impl Window {
    pub fn rect_px(&self) -> Rect {
        Rect::new(self.left_px, self.top_px, self.width_px, self.height_px)
    }
}

// ──────────────────────────────────────────────
// Canvas
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasSize {
    pub width: f32,
    pub height: f32,
    pub min_width: f32,
    pub min_height: f32,
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self {
            width: crate::DEFAULT_CANVAS_WIDTH,
            height: crate::DEFAULT_CANVAS_HEIGHT,
            min_width: crate::CANVAS_FLOOR_WIDTH,
            min_height: crate::CANVAS_FLOOR_HEIGHT,
        }
    }
}
