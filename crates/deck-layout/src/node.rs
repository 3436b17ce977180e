use std::collections::HashMap;

use deck_core::{Branch, CellId, CutDirection, EdgeBorders, Rect, TreePath};

use crate::model::Cell;
use crate::{MIN_CELL_HEIGHT, MIN_CELL_WIDTH};

// ──────────────────────────────────────────────
// PartNode: binary partition tree of one window
// ──────────────────────────────────────────────

/// Cached per-node layout facts, refreshed by `refresh_counts` and
/// `compute_geometry`. `rows` counts cells stacked along the vertical axis
/// of this subtree, `cols` counts cells laid side by side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeMeta {
    pub rows: u32,
    pub cols: u32,
    pub width: f32,
    pub height: f32,
}

impl Default for NodeMeta {
    fn default() -> Self {
        Self {
            rows: 1,
            cols: 1,
            width: 0.0,
            height: 0.0,
        }
    }
}

/// Rectangle allotted to a node during a geometry pass, plus the largest
/// extent the node could grow into (drag-handle range hints).
#[derive(Debug, Clone, Copy)]
pub struct LevelRect {
    pub rect: Rect,
    pub max_width: f32,
    pub max_height: f32,
}

#[derive(Debug, Clone)]
pub enum PartNode {
    Leaf {
        cell: CellId,
        meta: NodeMeta,
    },
    Split {
        direction: CutDirection,
        /// Fraction of the cut axis given to the left/top child, in (0, 1).
        ratio: f32,
        meta: NodeMeta,
        left: Box<PartNode>,
        right: Box<PartNode>,
    },
}

impl PartNode {
    pub fn leaf(cell: CellId) -> Self {
        PartNode::Leaf {
            cell,
            meta: NodeMeta::default(),
        }
    }

    pub fn split(direction: CutDirection, ratio: f32, left: PartNode, right: PartNode) -> Self {
        PartNode::Split {
            direction,
            ratio,
            meta: NodeMeta::default(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, PartNode::Leaf { .. })
    }

    /// The cell held by this node, if it is a leaf.
    pub fn leaf_cell(&self) -> Option<CellId> {
        match self {
            PartNode::Leaf { cell, .. } => Some(*cell),
            PartNode::Split { .. } => None,
        }
    }

    pub fn meta(&self) -> &NodeMeta {
        match self {
            PartNode::Leaf { meta, .. } => meta,
            PartNode::Split { meta, .. } => meta,
        }
    }

    pub fn meta_mut(&mut self) -> &mut NodeMeta {
        match self {
            PartNode::Leaf { meta, .. } => meta,
            PartNode::Split { meta, .. } => meta,
        }
    }

    /// Visit every leaf cell id, depth-first, left before right.
    pub fn for_each_leaf(&self, f: &mut impl FnMut(CellId)) {
        match self {
            PartNode::Leaf { cell, .. } => f(*cell),
            PartNode::Split { left, right, .. } => {
                left.for_each_leaf(f);
                right.for_each_leaf(f);
            }
        }
    }

    pub fn contains(&self, target: CellId) -> bool {
        match self {
            PartNode::Leaf { cell, .. } => *cell == target,
            PartNode::Split { left, right, .. } => left.contains(target) || right.contains(target),
        }
    }

    /// Root-relative path to the leaf holding `target`, or `None`.
    pub fn find_cell(&self, target: CellId) -> Option<TreePath> {
        fn walk(node: &PartNode, target: CellId, path: &mut Vec<Branch>) -> bool {
            match node {
                PartNode::Leaf { cell, .. } => *cell == target,
                PartNode::Split { left, right, .. } => {
                    path.push(Branch::Left);
                    if walk(left, target, path) {
                        return true;
                    }
                    path.pop();

                    path.push(Branch::Right);
                    if walk(right, target, path) {
                        return true;
                    }
                    path.pop();
                    false
                }
            }
        }

        let mut steps = Vec::new();
        if walk(self, target, &mut steps) {
            Some(TreePath::from(steps))
        } else {
            None
        }
    }

    pub fn node_at(&self, path: &TreePath) -> &PartNode {
        let mut node = self;
        for step in path.steps() {
            node = match node {
                PartNode::Split { left, right, .. } => match step {
                    Branch::Left => left,
                    Branch::Right => right,
                },
                PartNode::Leaf { .. } => return node,
            };
        }
        node
    }

    pub fn node_at_mut(&mut self, path: &TreePath) -> &mut PartNode {
        let mut node = self;
        for step in path.steps() {
            node = match node {
                PartNode::Split { left, right, .. } => match step {
                    Branch::Left => left,
                    Branch::Right => right,
                },
                PartNode::Leaf { .. } => return node,
            };
        }
        node
    }

    /// Rewrite every leaf holding `from` to hold `to` instead.
    pub fn replace_cell_id(&mut self, from: CellId, to: CellId) {
        match self {
            PartNode::Leaf { cell, .. } => {
                if *cell == from {
                    *cell = to;
                }
            }
            PartNode::Split { left, right, .. } => {
                left.replace_cell_id(from, to);
                right.replace_cell_id(from, to);
            }
        }
    }

    // ──────────────────────────────────────────
    // Cell counting
    // ──────────────────────────────────────────

    /// Recompute and cache (rows, cols) for the whole subtree. A vertical
    /// cut adds columns and takes the deeper of the two row counts; a
    /// horizontal cut is the mirror image.
    pub fn refresh_counts(&mut self) -> (u32, u32) {
        let (rows, cols) = match self {
            PartNode::Leaf { .. } => (1, 1),
            PartNode::Split {
                direction,
                left,
                right,
                ..
            } => {
                let (left_rows, left_cols) = left.refresh_counts();
                let (right_rows, right_cols) = right.refresh_counts();
                match direction {
                    CutDirection::Vertical => {
                        (left_rows.max(right_rows), left_cols + right_cols)
                    }
                    CutDirection::Horizontal => {
                        (left_rows + right_rows, left_cols.max(right_cols))
                    }
                }
            }
        };
        let meta = self.meta_mut();
        meta.rows = rows;
        meta.cols = cols;
        (rows, cols)
    }

    // ──────────────────────────────────────────
    // Minimum-size propagation
    // ──────────────────────────────────────────

    /// Push minimum sizes down to the leaf cells. Requires counts to be
    /// fresh. At a split, the cut-axis dimension of each child comes from
    /// that child's own subtree; the cross dimension takes the larger of
    /// the two subtrees.
    pub fn apply_min_sizes(
        &self,
        cells: &mut HashMap<CellId, Cell>,
        level_min_height: f32,
        level_min_width: f32,
    ) {
        match self {
            PartNode::Leaf { cell, .. } => {
                if let Some(record) = cells.get_mut(cell) {
                    record.min_height = level_min_height;
                    record.min_width = level_min_width;
                }
            }
            PartNode::Split {
                direction,
                left,
                right,
                ..
            } => {
                let vertical = *direction == CutDirection::Vertical;
                let left_sub_w = left.meta().cols as f32 * MIN_CELL_WIDTH;
                let left_sub_h = left.meta().rows as f32 * MIN_CELL_HEIGHT;
                let right_sub_w = right.meta().cols as f32 * MIN_CELL_WIDTH;
                let right_sub_h = right.meta().rows as f32 * MIN_CELL_HEIGHT;

                let left_min_w = if vertical {
                    left_sub_w
                } else {
                    left_sub_w.max(right_sub_w)
                };
                let left_min_h = if vertical {
                    left_sub_h.max(right_sub_h)
                } else {
                    left_sub_h
                };
                let right_min_w = if vertical {
                    right_sub_w
                } else {
                    left_sub_w.max(right_sub_w)
                };
                let right_min_h = if vertical {
                    left_sub_h.max(right_sub_h)
                } else {
                    right_sub_h
                };

                left.apply_min_sizes(cells, left_min_h, left_min_w);
                right.apply_min_sizes(cells, right_min_h, right_min_w);
            }
        }
    }

    // ──────────────────────────────────────────
    // Pixel geometry
    // ──────────────────────────────────────────

    /// Derive pixel rectangles for the whole subtree from the rectangle
    /// allotted to this node. The cut ratio is applied then clamped so that
    /// neither child drops below its subtree's minimum floor; the other
    /// child absorbs the remainder. The non-cut dimension is inherited
    /// unchanged by both children. Leaves also record their offsets to the
    /// owning window's four edges.
    pub fn compute_geometry(
        &mut self,
        level: LevelRect,
        window_rect: Rect,
        cells: &mut HashMap<CellId, Cell>,
    ) {
        {
            let meta = self.meta_mut();
            meta.width = level.rect.width;
            meta.height = level.rect.height;
        }

        match self {
            PartNode::Leaf { cell, .. } => {
                if let Some(record) = cells.get_mut(cell) {
                    record.width = level.rect.width;
                    record.height = level.rect.height;
                    record.top = level.rect.top;
                    record.left = level.rect.left;
                    record.max_width = level.max_width;
                    record.max_height = level.max_height;
                    record.top_offset = level.rect.top - window_rect.top;
                    record.bottom_offset = window_rect.bottom() - level.rect.bottom();
                    record.left_offset = level.rect.left - window_rect.left;
                    record.right_offset = window_rect.right() - level.rect.right();
                }
            }
            PartNode::Split {
                direction,
                ratio,
                left,
                right,
                ..
            } => {
                let vertical = *direction == CutDirection::Vertical;
                let left_meta = *left.meta();
                let right_meta = *right.meta();
                let width = level.rect.width;
                let height = level.rect.height;

                let left_floor_w = left_meta.cols as f32 * MIN_CELL_WIDTH;
                let left_floor_h = left_meta.rows as f32 * MIN_CELL_HEIGHT;
                let right_floor_w = right_meta.cols as f32 * MIN_CELL_WIDTH;
                let right_floor_h = right_meta.rows as f32 * MIN_CELL_HEIGHT;

                let raw_left_w = if vertical { *ratio * width } else { width };
                let raw_left_h = if vertical { height } else { *ratio * height };
                let mut left_w = raw_left_w.max(left_floor_w).round();
                let mut left_h = raw_left_h.max(left_floor_h).round();
                let left_max_w = if vertical {
                    width - right_floor_w
                } else {
                    level.max_width
                };
                let left_max_h = if vertical {
                    level.max_height
                } else {
                    height - right_floor_h
                };

                let raw_right_w = if vertical { width - left_w } else { width };
                let raw_right_h = if vertical { height } else { height - left_h };
                let right_w = raw_right_w.max(right_floor_w);
                let right_h = raw_right_h.max(right_floor_h);

                // The left child takes whatever the clamped right child left over.
                left_w = if vertical { width - right_w } else { width };
                left_h = if vertical { height } else { height - right_h };

                let right_top = if vertical {
                    level.rect.top
                } else {
                    level.rect.top + left_h
                };
                let right_left = if vertical {
                    level.rect.left + left_w
                } else {
                    level.rect.left
                };
                let raw_right_max_w = if vertical {
                    level.max_width - left_w
                } else {
                    level.max_width
                };
                let raw_right_max_h = if vertical {
                    level.max_height
                } else {
                    level.max_height - left_h
                };
                let right_max_w = raw_right_max_w.max(right_w);
                let right_max_h = raw_right_max_h.max(right_h);

                left.compute_geometry(
                    LevelRect {
                        rect: Rect::new(level.rect.left, level.rect.top, left_w, left_h),
                        max_width: left_max_w,
                        max_height: left_max_h,
                    },
                    window_rect,
                    cells,
                );
                right.compute_geometry(
                    LevelRect {
                        rect: Rect::new(right_left, right_top, right_w, right_h),
                        max_width: right_max_w,
                        max_height: right_max_h,
                    },
                    window_rect,
                    cells,
                );
            }
        }
    }

    // ──────────────────────────────────────────
    // Borders and resize handles
    // ──────────────────────────────────────────

    /// Split the accumulated edge/radius flags between children and assign
    /// them to the leaves. The cut boundary is never drawn on either side.
    /// The left/top child of a cut always carries the handle for that cut;
    /// the right/bottom child inherits the ancestor's handle flags, so only
    /// the rightmost/bottommost member of a run ends up with one.
    pub fn assign_borders(
        &self,
        style: EdgeBorders,
        has_right_handle: bool,
        has_bottom_handle: bool,
        cells: &mut HashMap<CellId, Cell>,
    ) {
        match self {
            PartNode::Leaf { cell, .. } => {
                if let Some(record) = cells.get_mut(cell) {
                    record.borders = style;
                    record.has_right_handle = has_right_handle;
                    record.has_bottom_handle = has_bottom_handle;
                }
            }
            PartNode::Split {
                direction,
                left,
                right,
                ..
            } => {
                let vertical = *direction == CutDirection::Vertical;

                let left_style = EdgeBorders {
                    top: style.top,
                    bottom: if vertical { style.bottom } else { false },
                    left: style.left,
                    right: if vertical { false } else { style.right },
                    radius_tl: style.radius_tl,
                    radius_tr: if vertical { false } else { style.radius_tr },
                    radius_bl: if vertical { style.radius_bl } else { false },
                    radius_br: false,
                };
                let right_style = EdgeBorders {
                    top: if vertical { style.top } else { false },
                    bottom: style.bottom,
                    left: if vertical { false } else { style.left },
                    right: style.right,
                    radius_tl: false,
                    radius_tr: if vertical { style.radius_tr } else { false },
                    radius_bl: if vertical { false } else { style.radius_bl },
                    radius_br: style.radius_br,
                };

                left.assign_borders(
                    left_style,
                    if vertical { true } else { has_right_handle },
                    if vertical { has_bottom_handle } else { true },
                    cells,
                );
                right.assign_borders(right_style, has_right_handle, has_bottom_handle, cells);
            }
        }
    }

    // ──────────────────────────────────────────
    // Handle drag
    // ──────────────────────────────────────────

    /// Apply a live drag delta from a cell's resize handle. The deepest
    /// ancestor whose cut direction matches `axis` and whose left subtree
    /// holds the target takes the ratio adjustment. Returns true while the
    /// target is in this subtree and no ancestor has handled it yet.
    pub fn adjust_for_handle_drag(
        &mut self,
        target: CellId,
        delta_width: f32,
        delta_height: f32,
        axis: CutDirection,
    ) -> bool {
        match self {
            PartNode::Leaf { cell, .. } => *cell == target,
            PartNode::Split {
                direction,
                ratio,
                meta,
                left,
                right,
            } => {
                if left.adjust_for_handle_drag(target, delta_width, delta_height, axis) {
                    if *direction == axis {
                        *ratio = clamped_ratio(
                            *direction,
                            meta,
                            left.meta(),
                            delta_width,
                            delta_height,
                        );
                        return false;
                    }
                    return true;
                }
                right.adjust_for_handle_drag(target, delta_width, delta_height, axis)
            }
        }
    }
}

/// New cut ratio after moving the boundary by a pixel delta. The left size
/// is clamped to at least one minimum cell, and to leave the right child at
/// least one minimum cell.
fn clamped_ratio(
    direction: CutDirection,
    level: &NodeMeta,
    left: &NodeMeta,
    delta_width: f32,
    delta_height: f32,
) -> f32 {
    match direction {
        CutDirection::Vertical => {
            let level_width = level.width;
            let mut left_width = (left.width + delta_width).max(MIN_CELL_WIDTH);
            if level_width - left_width < MIN_CELL_WIDTH {
                left_width = level_width - MIN_CELL_WIDTH;
            }
            left_width / level_width
        }
        CutDirection::Horizontal => {
            let level_height = level.height;
            let mut left_height = (left.height + delta_height).max(MIN_CELL_HEIGHT);
            if level_height - left_height < MIN_CELL_HEIGHT {
                left_height = level_height - MIN_CELL_HEIGHT;
            }
            left_height / level_height
        }
    }
}
