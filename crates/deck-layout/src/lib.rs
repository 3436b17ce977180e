//! Partition-tree layout engine for a dashboard canvas.
//!
//! Every top-level window owns a binary partition tree whose leaves are
//! cells. Cutting a cell splits its leaf into a two-child node; deleting a
//! cell promotes its sibling subtree. Window placement is stored as
//! canvas fractions and projected to pixels on every adapt pass, so the
//! arrangement survives canvas resizes without drift.

use std::collections::HashMap;

use serde_json::Value;

use deck_core::{CellId, CutDirection, EdgeBorders, Event, EventBus, Size, WindowId};

pub mod model;
pub mod node;
pub mod numbering;
pub mod snapshot;


pub use model::{CanvasSize, Cell, CellComponent, Window};
pub use node::{LevelRect, NodeMeta, PartNode};
pub use numbering::OrdinalPool;
pub use snapshot::{
    check_matching, CleanCell, CleanComponent, CleanWindow, ComponentMeta, IntegrityError,
    TreeSnapshot,
};

/// Minimum pixel extent of a single cell along each axis. A window's
/// minimum size is this times its row/column count.
pub const MIN_CELL_WIDTH: f32 = 100.0;
pub const MIN_CELL_HEIGHT: f32 = 100.0;

pub const DEFAULT_CANVAS_WIDTH: f32 = 700.0;
pub const DEFAULT_CANVAS_HEIGHT: f32 = 500.0;

/// Hard floor for the canvas minimum: one cell plus a border on each side.
pub const CANVAS_FLOOR_WIDTH: f32 = 102.0;
pub const CANVAS_FLOOR_HEIGHT: f32 = 102.0;

/// Slack added when a window's minimum raises the canvas minimum.
pub const CANVAS_MIN_MARGIN: f32 = 2.0;

/// New windows cascade down-right from the canvas midline by this fraction
/// per window created since the last reset.
pub const CASCADE_STEP: f32 = 0.03;
pub const CASCADE_WINDOW_FRACTION: f32 = 0.3;

// ──────────────────────────────────────────────
// Tree summaries
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct CellSummary {
    pub cell: CellId,
    /// "{component}-{ordinal}", or "Not Selected" for an empty cell.
    pub label: String,
    pub has_config: bool,
    pub component_selected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WindowSummary {
    pub label: String,
    pub hide: bool,
    pub is_single_cell: bool,
    /// Leaf cells in tree order, left before right.
    pub cells: Vec<CellSummary>,
}

// ──────────────────────────────────────────────
// Engine
// ──────────────────────────────────────────────

/// Owns all cells, windows and the canvas, and keeps every derived field
/// (counts, minimums, pixel rectangles, borders, handles) consistent after
/// each mutation. Stacking order lives elsewhere; the engine only stores
/// the `pinned` flag windows are saved with.
pub struct LayoutEngine {
    cells: HashMap<CellId, Cell>,
    windows: HashMap<WindowId, Window>,
    canvas: CanvasSize,
    catalog: HashMap<String, ComponentMeta>,
    window_ordinals: OrdinalPool,
    component_ordinals: HashMap<String, OrdinalPool>,
    dragging_single_cell: Option<(WindowId, CellId)>,
    windows_created: u32,
    next_id: u64,
    events: EventBus,
}

impl LayoutEngine {
    pub fn new(catalog: Vec<ComponentMeta>) -> Self {
        Self {
            cells: HashMap::new(),
            windows: HashMap::new(),
            canvas: CanvasSize::default(),
            catalog: catalog
                .into_iter()
                .map(|meta| (meta.name.clone(), meta))
                .collect(),
            window_ordinals: OrdinalPool::new(),
            component_ordinals: HashMap::new(),
            dragging_single_cell: None,
            windows_created: 0,
            next_id: 1,
            events: EventBus::new(),
        }
    }

    /// Rebuild an engine from saved records. Fails if the cell/window
    /// cross-references do not line up or a tree carries a bad cut. Saved
    /// components whose kind is no longer in the catalog revive as empty
    /// cells. Pixel geometry is left for the first adapt pass.
    pub fn load(
        catalog: Vec<ComponentMeta>,
        saved_cells: &HashMap<CellId, CleanCell>,
        saved_windows: &HashMap<WindowId, CleanWindow>,
    ) -> Result<Self, IntegrityError> {
        check_matching(saved_cells, saved_windows)?;
        let mut engine = Self::new(catalog);
        let mut max_id = 0;

        let mut cell_ids: Vec<CellId> = saved_cells.keys().copied().collect();
        cell_ids.sort_unstable();
        for cell_id in cell_ids {
            let clean = &saved_cells[&cell_id];
            max_id = max_id.max(cell_id);
            let mut cell = Cell::new(clean.window);
            if let Some(saved) = &clean.component {
                cell.component = engine.revive_component(saved);
            }
            engine.cells.insert(cell_id, cell);
        }

        let mut window_ids: Vec<WindowId> = saved_windows.keys().copied().collect();
        window_ids.sort_unstable();
        for window_id in window_ids {
            let clean = &saved_windows[&window_id];
            max_id = max_id.max(window_id);
            let root = clean.tree.to_node()?;
            let ordinal = if clean.is_single_cell {
                None
            } else {
                Some(engine.window_ordinals.acquire())
            };
            engine.windows.insert(
                window_id,
                Window {
                    left: clean.left,
                    top: clean.top,
                    width: clean.width,
                    height: clean.height,
                    left_px: 0.0,
                    top_px: 0.0,
                    width_px: 0.0,
                    height_px: 0.0,
                    min_width: MIN_CELL_WIDTH,
                    min_height: MIN_CELL_HEIGHT,
                    ordinal,
                    is_single_cell: clean.is_single_cell,
                    fullscreen: clean.is_fullscreen,
                    hidden: clean.hide,
                    temp_show: false,
                    pinned: false,
                    dragging: false,
                    root,
                },
            );
        }
        engine.next_id = max_id + 1;

        let ids: Vec<WindowId> = engine.windows.keys().copied().collect();
        for id in ids {
            if let Some(window) = engine.windows.get_mut(&id) {
                Self::refresh_borders(window, &mut engine.cells);
                Self::refresh_tree(window, &mut engine.cells, &mut engine.canvas);
            }
        }
        Ok(engine)
    }

    // ──────────────────────────────────────────
    // Accessors
    // ──────────────────────────────────────────

    pub fn cells(&self) -> &HashMap<CellId, Cell> {
        &self.cells
    }

    pub fn windows(&self) -> &HashMap<WindowId, Window> {
        &self.windows
    }

    pub fn cell(&self, cell: CellId) -> Option<&Cell> {
        self.cells.get(&cell)
    }

    pub fn window(&self, window: WindowId) -> Option<&Window> {
        self.windows.get(&window)
    }

    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    pub fn cell_size(&self, cell: CellId) -> Option<Size> {
        self.cells
            .get(&cell)
            .map(|record| Size::new(record.width, record.height))
    }

    pub fn dragging_single_cell(&self) -> Option<(WindowId, CellId)> {
        self.dragging_single_cell
    }

    pub fn has_component(&self, name: &str) -> bool {
        self.cells
            .values()
            .any(|cell| cell.component.as_ref().map(|c| c.name.as_str()) == Some(name))
    }

    pub fn events(&mut self) -> &mut EventBus {
        &mut self.events
    }

    /// Per-window cell listing for tree-style navigation panels.
    /// Multi-cell windows are labelled by their ordinal; single-cell
    /// windows borrow their only cell's label.
    pub fn window_tree_summary(&self) -> HashMap<WindowId, WindowSummary> {
        let mut out = HashMap::new();
        for (window_id, window) in &self.windows {
            let mut cells = Vec::new();
            window.root.for_each_leaf(&mut |cell_id| {
                let component = self
                    .cells
                    .get(&cell_id)
                    .and_then(|record| record.component.as_ref());
                cells.push(CellSummary {
                    cell: cell_id,
                    label: component
                        .map(|c| format!("{}-{}", c.name, c.ordinal))
                        .unwrap_or_else(|| "Not Selected".to_string()),
                    has_config: component.map(|c| c.has_config).unwrap_or(false),
                    component_selected: component.is_some(),
                });
            });
            let label = match window.ordinal {
                Some(n) => format!("Window {n}"),
                None => cells
                    .first()
                    .map(|c| c.label.clone())
                    .unwrap_or_else(|| "Not Selected".to_string()),
            };
            out.insert(
                *window_id,
                WindowSummary {
                    label,
                    hide: window.hidden,
                    is_single_cell: window.is_single_cell,
                    cells,
                },
            );
        }
        out
    }

    // ──────────────────────────────────────────
    // Window lifecycle
    // ──────────────────────────────────────────

    /// Create a new single-cell window at the next cascade position,
    /// optionally mounting a catalog component in its cell. Unknown
    /// component names produce an empty cell.
    pub fn create_window(&mut self, component: Option<&str>) -> (WindowId, CellId) {
        let cell_id = self.alloc_id();
        let window_id = self.alloc_id();

        let mut cell = Cell::new(window_id);
        if let Some(name) = component {
            cell.component = self.instantiate_component(name);
        }

        let step = self.windows_created as f32;
        let window = Window {
            left: 0.5 - step * CASCADE_STEP,
            top: step * CASCADE_STEP,
            width: CASCADE_WINDOW_FRACTION,
            height: CASCADE_WINDOW_FRACTION,
            left_px: 0.0,
            top_px: 0.0,
            width_px: 0.0,
            height_px: 0.0,
            min_width: MIN_CELL_WIDTH,
            min_height: MIN_CELL_HEIGHT,
            ordinal: None,
            is_single_cell: true,
            fullscreen: false,
            hidden: false,
            temp_show: false,
            pinned: false,
            dragging: false,
            root: PartNode::leaf(cell_id),
        };

        self.cells.insert(cell_id, cell);
        self.windows.insert(window_id, window);
        self.windows_created += 1;
        self.adapt_to_canvas(window_id);
        self.events.emit(Event::PanelChanged);
        (window_id, cell_id)
    }

    /// Restart the cascade from the canvas midline.
    pub fn reset_cascade(&mut self) {
        self.windows_created = 0;
    }

    /// Delete a window, all its cells, and every ordinal they held, then
    /// relax the canvas minimum.
    pub fn delete_window(&mut self, window_id: WindowId) {
        let Some(window) = self.windows.remove(&window_id) else {
            return;
        };
        let mut leaves = Vec::new();
        window.root.for_each_leaf(&mut |cell| leaves.push(cell));
        for cell_id in leaves {
            if let Some(cell) = self.cells.remove(&cell_id) {
                if let Some(component) = cell.component {
                    if let Some(pool) = self.component_ordinals.get_mut(&component.name) {
                        pool.release(component.ordinal);
                    }
                }
            }
            self.events.emit(Event::ComponentRemoved { cell: cell_id });
        }
        if let Some(ordinal) = window.ordinal {
            self.window_ordinals.release(ordinal);
        }
        if self.dragging_single_cell.map(|(w, _)| w) == Some(window_id) {
            self.dragging_single_cell = None;
        }
        self.events.emit(Event::PanelChanged);
        self.update_canvas_min();
    }

    // ──────────────────────────────────────────
    // Cell lifecycle
    // ──────────────────────────────────────────

    /// Cut a cell in two. The original cell keeps the left/top half at a
    /// 0.5 ratio; the new empty cell takes the other half. A single-cell
    /// window becomes multi-cell and picks up a window ordinal.
    pub fn split_cell(&mut self, cell: CellId, direction: CutDirection) -> Option<CellId> {
        let window_id = self.cells.get(&cell)?.window;
        let new_cell = self.alloc_id();
        let window = self.windows.get_mut(&window_id)?;
        let path = window.root.find_cell(cell)?;

        let node = window.root.node_at_mut(&path);
        *node = PartNode::split(
            direction,
            0.5,
            PartNode::leaf(cell),
            PartNode::leaf(new_cell),
        );
        self.cells.insert(new_cell, Cell::new(window_id));

        Self::refresh_borders(window, &mut self.cells);
        if window.is_single_cell {
            window.is_single_cell = false;
            window.ordinal = Some(self.window_ordinals.acquire());
        }
        Self::refresh_tree(window, &mut self.cells, &mut self.canvas);
        Self::recompute_geometry(window, &mut self.cells);
        self.events.emit(Event::PanelChanged);
        Some(new_cell)
    }

    /// Delete one cell of a multi-cell window; its sibling subtree takes
    /// the freed space. The last cell of a window cannot be deleted this
    /// way, delete the window instead.
    pub fn delete_cell(&mut self, cell: CellId) {
        let Some(record) = self.cells.get(&cell) else {
            return;
        };
        let window_id = record.window;
        let removed_component = record.component.clone();
        let Some(window) = self.windows.get_mut(&window_id) else {
            return;
        };
        let Some(path) = window.root.find_cell(cell) else {
            return;
        };
        let Some(parent_path) = path.parent() else {
            return;
        };

        let parent = window.root.node_at_mut(&parent_path);
        if let PartNode::Split { left, right, .. } = parent {
            let survivor = if left.leaf_cell() == Some(cell) {
                (**right).clone()
            } else {
                (**left).clone()
            };
            *parent = survivor;
        }

        Self::refresh_borders(window, &mut self.cells);
        if window.root.is_leaf() {
            window.is_single_cell = true;
            if let Some(ordinal) = window.ordinal.take() {
                self.window_ordinals.release(ordinal);
            }
        }
        if let Some(component) = &removed_component {
            if let Some(pool) = self.component_ordinals.get_mut(&component.name) {
                pool.release(component.ordinal);
            }
        }
        Self::refresh_tree(window, &mut self.cells, &mut self.canvas);
        Self::recompute_geometry(window, &mut self.cells);
        self.cells.remove(&cell);
        self.events.emit(Event::ComponentRemoved { cell });
        self.events.emit(Event::PanelChanged);
    }

    // ──────────────────────────────────────────
    // Single-cell window drag and drop
    // ──────────────────────────────────────────

    pub fn mark_single_cell_dragging(&mut self, window_id: WindowId, cell: CellId) {
        if let Some(window) = self.windows.get_mut(&window_id) {
            window.dragging = true;
        }
        if let Some(record) = self.cells.get_mut(&cell) {
            record.dragging = true;
        }
        self.dragging_single_cell = Some((window_id, cell));
    }

    pub fn unmark_single_cell_dragging(&mut self, window_id: WindowId, cell: CellId) {
        if let Some(window) = self.windows.get_mut(&window_id) {
            window.dragging = false;
            if let Some(record) = self.cells.get_mut(&cell) {
                record.dragging = false;
            }
        }
        self.dragging_single_cell = None;
    }

    /// Drop the dragged single-cell window onto a cell of another window.
    /// The dragged cell takes over the target's slot and geometry while
    /// keeping its own component; the target cell leaves with the dragged
    /// window, which is then deleted.
    pub fn replace_cell_with_dragged_window(
        &mut self,
        target_cell: CellId,
        target_window: WindowId,
    ) {
        let Some((source_window, source_cell)) = self.dragging_single_cell else {
            return;
        };
        let Some(target_record) = self.cells.get(&target_cell) else {
            return;
        };
        let mut new_record = target_record.clone();
        let source_component = match self.cells.get(&source_cell) {
            Some(record) => record.component.clone(),
            None => return,
        };
        new_record.component = source_component;
        new_record.dragging = false;

        if let Some(window) = self.windows.get_mut(&target_window) {
            window.root.replace_cell_id(target_cell, source_cell);
        }
        self.cells.insert(source_cell, new_record);
        if let Some(window) = self.windows.get_mut(&source_window) {
            window.root = PartNode::leaf(target_cell);
        }
        // Deleting the dragged window now takes the displaced cell with it.
        self.delete_window(source_window);
    }

    // ──────────────────────────────────────────
    // Geometry
    // ──────────────────────────────────────────

    /// Store a window's pixel rectangle (from a direct move/resize) and
    /// rebuild the cell geometry beneath it.
    pub fn resize_window_rect(
        &mut self,
        window_id: WindowId,
        width: f32,
        height: f32,
        left: f32,
        top: f32,
    ) {
        let Some(window) = self.windows.get_mut(&window_id) else {
            return;
        };
        window.left_px = left.round();
        window.top_px = top.round();
        window.width_px = width.round();
        window.height_px = height.round();
        Self::recompute_geometry(window, &mut self.cells);
    }

    /// Project a window's canvas fractions to pixels. Size floors at the
    /// window minimum; position is pulled back so at least the minimum
    /// extent stays on canvas. Fullscreen windows cover the whole canvas.
    pub fn adapt_to_canvas(&mut self, window_id: WindowId) {
        let canvas = self.canvas;
        let Some(window) = self.windows.get_mut(&window_id) else {
            return;
        };
        if window.fullscreen {
            window.left_px = 0.0;
            window.top_px = 0.0;
            window.width_px = canvas.width.round();
            window.height_px = canvas.height.round();
        } else {
            let height = (window.height * canvas.height).floor().max(window.min_height);
            let width = (window.width * canvas.width).floor().max(window.min_width);
            let mut top = (window.top * canvas.height).ceil();
            let mut left = (window.left * canvas.width).ceil();
            let bottom = top + window.min_height;
            let right = left + window.min_width;
            if bottom > canvas.height {
                top -= bottom - canvas.height;
            }
            if right > canvas.width {
                left -= right - canvas.width;
            }
            window.left_px = left.round();
            window.top_px = top.round();
            window.width_px = width.round();
            window.height_px = height.round();
        }
        Self::recompute_geometry(window, &mut self.cells);
    }

    pub fn adapt_all(&mut self) {
        let ids: Vec<WindowId> = self.windows.keys().copied().collect();
        for id in ids {
            self.adapt_to_canvas(id);
        }
    }

    /// Resize the canvas (floored at its minimum) and re-project every
    /// window.
    pub fn set_canvas_size(&mut self, width: f32, height: f32) {
        self.canvas.width = width.max(self.canvas.min_width);
        self.canvas.height = height.max(self.canvas.min_height);
        self.adapt_all();
    }

    /// Recompute the canvas minimum from the surviving windows.
    pub fn update_canvas_min(&mut self) {
        self.canvas.min_width = CANVAS_FLOOR_WIDTH;
        self.canvas.min_height = CANVAS_FLOOR_HEIGHT;
        for window in self.windows.values() {
            if window.min_height > self.canvas.min_height {
                self.canvas.min_height = window.min_height;
            }
            if window.min_width > self.canvas.min_width {
                self.canvas.min_width = window.min_width;
            }
        }
    }

    /// Apply a live drag on a cell's resize handle: the deepest ancestor
    /// cut along the drag axis with the cell in its left subtree takes the
    /// new ratio, then the window's geometry is rebuilt.
    pub fn propagate_handle_drag(
        &mut self,
        cell: CellId,
        delta_width: f32,
        delta_height: f32,
        axis: CutDirection,
    ) {
        let Some(record) = self.cells.get(&cell) else {
            return;
        };
        let window_id = record.window;
        let Some(window) = self.windows.get_mut(&window_id) else {
            return;
        };
        window
            .root
            .adjust_for_handle_drag(cell, delta_width, delta_height, axis);
        Self::recompute_geometry(window, &mut self.cells);
    }

    // ──────────────────────────────────────────
    // Cell state
    // ──────────────────────────────────────────

    /// Mount a catalog component in a cell (`Some`) or clear the cell
    /// (`None`). Clearing returns the instance ordinal to its pool.
    pub fn set_cell_component(&mut self, cell: CellId, component: Option<&str>) {
        if !self.cells.contains_key(&cell) {
            return;
        }
        match component {
            Some(name) => {
                let instance = self.instantiate_component(name);
                if let Some(record) = self.cells.get_mut(&cell) {
                    record.component = instance;
                }
            }
            None => {
                if let Some(record) = self.cells.get_mut(&cell) {
                    if let Some(component) = record.component.take() {
                        if let Some(pool) = self.component_ordinals.get_mut(&component.name) {
                            pool.release(component.ordinal);
                        }
                    }
                }
            }
        }
        self.events.emit(Event::PanelChanged);
        self.events.emit(Event::ComponentRemoved { cell });
    }

    pub fn set_cell_config(&mut self, cell: CellId, config: Value) {
        if let Some(component) = self
            .cells
            .get_mut(&cell)
            .and_then(|record| record.component.as_mut())
        {
            component.config = config;
        }
    }

    pub fn set_cell_data(&mut self, cell: CellId, data: Value) {
        if let Some(component) = self
            .cells
            .get_mut(&cell)
            .and_then(|record| record.component.as_mut())
        {
            component.data = data;
        }
    }

    // ──────────────────────────────────────────
    // Window state
    // ──────────────────────────────────────────

    /// Store a window's canvas-fraction position (from a completed drag).
    pub fn set_window_position(&mut self, window_id: WindowId, left: f32, top: f32) {
        if let Some(window) = self.windows.get_mut(&window_id) {
            window.left = left;
            window.top = top;
        }
    }

    /// Store a window's canvas-fraction size (from a completed resize).
    pub fn set_window_size(&mut self, window_id: WindowId, width: f32, height: f32) {
        if let Some(window) = self.windows.get_mut(&window_id) {
            window.width = width;
            window.height = height;
        }
    }

    pub fn set_window_not_fullscreen(&mut self, window_id: WindowId) {
        if let Some(window) = self.windows.get_mut(&window_id) {
            window.fullscreen = false;
        }
    }

    pub fn toggle_fullscreen(&mut self, window_id: WindowId) {
        match self.windows.get_mut(&window_id) {
            Some(window) => window.fullscreen = !window.fullscreen,
            None => return,
        }
        self.adapt_to_canvas(window_id);
    }

    pub fn set_window_hidden(&mut self, window_id: WindowId, hidden: bool) {
        if let Some(window) = self.windows.get_mut(&window_id) {
            window.hidden = hidden;
            self.events.emit(Event::PanelChanged);
        }
    }

    pub fn set_window_temp_show(&mut self, window_id: WindowId, temp_show: bool) {
        if let Some(window) = self.windows.get_mut(&window_id) {
            window.temp_show = temp_show;
        }
    }

    pub fn set_window_pinned(&mut self, window_id: WindowId, pinned: bool) {
        if let Some(window) = self.windows.get_mut(&window_id) {
            window.pinned = pinned;
        }
    }

    // ──────────────────────────────────────────
    // Persistence
    // ──────────────────────────────────────────

    pub fn clean_cells(&self) -> HashMap<CellId, CleanCell> {
        self.cells
            .iter()
            .map(|(id, cell)| (*id, CleanCell::from_cell(cell)))
            .collect()
    }

    pub fn clean_windows(&self) -> HashMap<WindowId, CleanWindow> {
        self.windows
            .iter()
            .map(|(id, window)| (*id, CleanWindow::from_window(window)))
            .collect()
    }

    // ──────────────────────────────────────────
    // Notifications relayed for cell content
    // ──────────────────────────────────────────

    pub fn emit_config_toggled(&mut self, cell: CellId) {
        self.events.emit(Event::ConfigToggled { cell });
    }

    pub fn emit_ready_mount_config(&mut self, cell: CellId) {
        self.events.emit(Event::ReadyMountConfig { cell });
    }

    pub fn emit_window_highlight(&mut self, window: WindowId, on: bool) {
        self.events.emit(Event::WindowHighlight { window, on });
    }

    pub fn emit_cell_highlight(&mut self, cell: CellId, on: bool) {
        self.events.emit(Event::CellHighlight { cell, on });
    }

    pub fn emit_content_overflow(&mut self, cell: CellId, on: bool) {
        self.events.emit(Event::ContentOverflow { cell, on });
    }

    // ──────────────────────────────────────────
    // Internals
    // ──────────────────────────────────────────

    fn alloc_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn instantiate_component(&mut self, name: &str) -> Option<CellComponent> {
        let (has_config, data, config) = {
            let meta = self.catalog.get(name)?;
            (
                meta.has_config,
                default_or_empty(&meta.default_data),
                default_or_empty(&meta.default_config),
            )
        };
        let ordinal = self
            .component_ordinals
            .entry(name.to_string())
            .or_default()
            .acquire();
        Some(CellComponent {
            name: name.to_string(),
            ordinal,
            has_config,
            data,
            config,
        })
    }

    fn revive_component(&mut self, saved: &CleanComponent) -> Option<CellComponent> {
        let has_config = self.catalog.get(&saved.name)?.has_config;
        let ordinal = self
            .component_ordinals
            .entry(saved.name.clone())
            .or_default()
            .acquire();
        Some(CellComponent {
            name: saved.name.clone(),
            ordinal,
            has_config,
            data: saved.data.clone(),
            config: saved.config.clone(),
        })
    }

    /// Counts, window minimum, canvas minimum and per-cell minimums for
    /// one window. Geometry is a separate pass.
    fn refresh_tree(window: &mut Window, cells: &mut HashMap<CellId, Cell>, canvas: &mut CanvasSize) {
        let (rows, cols) = window.root.refresh_counts();
        window.min_height = rows as f32 * MIN_CELL_HEIGHT;
        window.min_width = cols as f32 * MIN_CELL_WIDTH;
        if window.min_height > canvas.min_height {
            canvas.min_height = window.min_height + CANVAS_MIN_MARGIN;
        }
        if window.min_width > canvas.min_width {
            canvas.min_width = window.min_width + CANVAS_MIN_MARGIN;
        }
        window
            .root
            .apply_min_sizes(cells, window.min_height, window.min_width);
    }

    fn refresh_borders(window: &mut Window, cells: &mut HashMap<CellId, Cell>) {
        window
            .root
            .assign_borders(EdgeBorders::all(), false, false, cells);
    }

    fn recompute_geometry(window: &mut Window, cells: &mut HashMap<CellId, Cell>) {
        let rect = window.rect_px();
        window.root.compute_geometry(
            LevelRect {
                rect,
                max_width: rect.width,
                max_height: rect.height,
            },
            rect,
            cells,
        );
    }
}

fn default_or_empty(value: &Value) -> Value {
    if value.is_null() {
        Value::Object(serde_json::Map::new())
    } else {
        value.clone()
    }
}
