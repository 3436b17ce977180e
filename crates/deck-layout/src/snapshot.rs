use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use deck_core::{CellId, CutDirection, WindowId};

use crate::model::{Cell, Window};
use crate::node::PartNode;

// ──────────────────────────────────────────────
// Component catalog
// ──────────────────────────────────────────────

/// Catalog entry for a mountable component kind: its name and the defaults
/// stamped onto every new instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentMeta {
    pub name: String,
    #[serde(rename = "hasConfig", default)]
    pub has_config: bool,
    #[serde(rename = "defaultData", default)]
    pub default_data: Value,
    #[serde(rename = "defaultConfig", default)]
    pub default_config: Value,
}

// ──────────────────────────────────────────────
// Clean (persisted) records
// ──────────────────────────────────────────────

/// Persisted form of a mounted component. Defaults that were absent in the
/// catalog persist as JSON null and are revived as empty objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanComponent {
    pub name: String,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub config: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanCell {
    #[serde(rename = "windowID")]
    pub window: WindowId,
    #[serde(default)]
    pub component: Option<CleanComponent>,
}

/// Wire form of a partition tree: leaves carry only the cell id, splits
/// carry the cut and both children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeSnapshot {
    Split {
        #[serde(rename = "cutDirection")]
        cut_direction: String,
        #[serde(rename = "cutRatio")]
        cut_ratio: f32,
        #[serde(rename = "leftNode")]
        left: Box<TreeSnapshot>,
        #[serde(rename = "rightNode")]
        right: Box<TreeSnapshot>,
    },
    Leaf {
        #[serde(rename = "ID")]
        cell: CellId,
    },
}

impl TreeSnapshot {
    pub fn from_node(node: &PartNode) -> Self {
        match node {
            PartNode::Leaf { cell, .. } => TreeSnapshot::Leaf { cell: *cell },
            PartNode::Split {
                direction,
                ratio,
                left,
                right,
                ..
            } => TreeSnapshot::Split {
                cut_direction: direction.as_str().to_string(),
                cut_ratio: *ratio,
                left: Box::new(TreeSnapshot::from_node(left)),
                right: Box::new(TreeSnapshot::from_node(right)),
            },
        }
    }

    pub fn to_node(&self) -> Result<PartNode, IntegrityError> {
        match self {
            TreeSnapshot::Leaf { cell } => Ok(PartNode::leaf(*cell)),
            TreeSnapshot::Split {
                cut_direction,
                cut_ratio,
                left,
                right,
            } => {
                let direction = CutDirection::parse(cut_direction).ok_or_else(|| {
                    IntegrityError::BadCutDirection {
                        direction: cut_direction.clone(),
                    }
                })?;
                Ok(PartNode::split(
                    direction,
                    *cut_ratio,
                    left.to_node()?,
                    right.to_node()?,
                ))
            }
        }
    }

    pub fn leaf_cells(&self) -> Vec<CellId> {
        fn walk(node: &TreeSnapshot, out: &mut Vec<CellId>) {
            match node {
                TreeSnapshot::Leaf { cell } => out.push(*cell),
                TreeSnapshot::Split { left, right, .. } => {
                    walk(left, out);
                    walk(right, out);
                }
            }
        }
        let mut out = Vec::new();
        walk(self, &mut out);
        out
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanWindow {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
    pub hide: bool,
    #[serde(rename = "isSingleCell")]
    pub is_single_cell: bool,
    #[serde(rename = "isFullscreen", default)]
    pub is_fullscreen: bool,
    #[serde(rename = "pileTree")]
    pub tree: TreeSnapshot,
}

// ──────────────────────────────────────────────
// Integrity
// ──────────────────────────────────────────────

#[derive(Debug, Error, PartialEq)]
pub enum IntegrityError {
    #[error("cell {cell} belongs to window {window}, but window {expected} claims it")]
    WrongWindow {
        cell: CellId,
        window: WindowId,
        expected: WindowId,
    },
    #[error("window {window} references unknown cell {cell}")]
    UnknownCell { window: WindowId, cell: CellId },
    #[error("cells {0:?} are not referenced by any window tree")]
    OrphanCells(Vec<CellId>),
    #[error("unknown cut direction {direction:?}")]
    BadCutDirection { direction: String },
}

/// Cross-check a saved workspace: every tree leaf must name a saved cell
/// that points back at the same window, and every saved cell must appear in
/// exactly one tree.
pub fn check_matching(
    cells: &HashMap<CellId, CleanCell>,
    windows: &HashMap<WindowId, CleanWindow>,
) -> Result<(), IntegrityError> {
    let mut unclaimed: HashMap<CellId, WindowId> =
        cells.iter().map(|(id, cell)| (*id, cell.window)).collect();

    for (window_id, window) in windows {
        for cell_id in window.tree.leaf_cells() {
            match unclaimed.remove(&cell_id) {
                None => {
                    return Err(IntegrityError::UnknownCell {
                        window: *window_id,
                        cell: cell_id,
                    });
                }
                Some(owner) if owner != *window_id => {
                    return Err(IntegrityError::WrongWindow {
                        cell: cell_id,
                        window: owner,
                        expected: *window_id,
                    });
                }
                Some(_) => {}
            }
        }
    }

    if !unclaimed.is_empty() {
        let mut orphans: Vec<CellId> = unclaimed.into_keys().collect();
        orphans.sort_unstable();
        return Err(IntegrityError::OrphanCells(orphans));
    }
    Ok(())
}

// ──────────────────────────────────────────────
// Conversions from live records
// ──────────────────────────────────────────────

impl CleanCell {
    pub fn from_cell(cell: &Cell) -> Self {
        Self {
            window: cell.window,
            component: cell.component.as_ref().map(|component| CleanComponent {
                name: component.name.clone(),
                data: component.data.clone(),
                config: component.config.clone(),
            }),
        }
    }
}

impl CleanWindow {
    pub fn from_window(window: &Window) -> Self {
        Self {
            left: window.left,
            top: window.top,
            width: window.width,
            height: window.height,
            hide: window.hidden,
            is_single_cell: window.is_single_cell,
            is_fullscreen: window.fullscreen,
            tree: TreeSnapshot::from_node(&window.root),
        }
    }
}
