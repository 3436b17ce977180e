//! Z-order stacking for canvas windows.
//!
//! Windows live in two bands: pinned windows stack from rank 1 and always
//! sit under unpinned ones, which stack from rank 200. Ranks step by 4 so
//! a window can be lifted between neighbours without renumbering, and both
//! bands stay dense: removing a window shifts everything above it down one
//! step. Rank 500 and up is reserved for the selected window's chrome.

use std::collections::HashMap;

use deck_core::{Event, EventBus, WindowId};

#[cfg(test)]
mod tests;

pub const PINNED_BASE: i32 = 1;
pub const UNPINNED_BASE: i32 = 200;
pub const RANK_STRIDE: i32 = 4;

/// Floor of the floating layer: selection chrome and the temporary-top
/// override live just around this rank.
pub const FLOATING_BASE: i32 = 500;
pub const SELECTED_OFFSET: i32 = 1;

#[derive(Debug, Clone, Copy)]
struct TempTop {
    window: WindowId,
    original_rank: i32,
}

/// Rank assignment for every window, split into the pinned and unpinned
/// bands, plus the two transient layers on top: a temporary "peek" override
/// and the selected window.
pub struct ZOrderStack {
    pinned: HashMap<WindowId, i32>,
    unpinned: HashMap<WindowId, i32>,
    temp_top: Option<TempTop>,
    selected: Option<WindowId>,
    events: EventBus,
}

impl ZOrderStack {
    pub fn new() -> Self {
        Self {
            pinned: HashMap::new(),
            unpinned: HashMap::new(),
            temp_top: None,
            selected: None,
            events: EventBus::new(),
        }
    }

    /// Restore saved ranks. Whatever the saved numbers were, each band is
    /// renumbered densely from its base, keeping the saved order.
    pub fn load(pinned: HashMap<WindowId, i32>, unpinned: HashMap<WindowId, i32>) -> Self {
        let mut stack = Self::new();
        stack.pinned = pinned;
        stack.unpinned = unpinned;
        stack.normalize();
        stack
    }

    // ──────────────────────────────────────────
    // Accessors
    // ──────────────────────────────────────────

    pub fn pinned(&self) -> &HashMap<WindowId, i32> {
        &self.pinned
    }

    pub fn unpinned(&self) -> &HashMap<WindowId, i32> {
        &self.unpinned
    }

    pub fn rank(&self, window: WindowId) -> Option<i32> {
        self.unpinned
            .get(&window)
            .or_else(|| self.pinned.get(&window))
            .copied()
    }

    pub fn is_pinned(&self, window: WindowId) -> bool {
        self.pinned.contains_key(&window)
    }

    pub fn contains(&self, window: WindowId) -> bool {
        self.unpinned.contains_key(&window) || self.pinned.contains_key(&window)
    }

    pub fn temporary_top(&self) -> Option<WindowId> {
        self.temp_top.map(|t| t.window)
    }

    pub fn selected(&self) -> Option<WindowId> {
        self.selected
    }

    pub fn events(&mut self) -> &mut EventBus {
        &mut self.events
    }

    /// Band contents with any temporary-top override undone, the shape
    /// that gets persisted.
    pub fn snapshot(&self) -> (HashMap<WindowId, i32>, HashMap<WindowId, i32>) {
        let mut pinned = self.pinned.clone();
        let mut unpinned = self.unpinned.clone();
        if let Some(temp) = self.temp_top {
            if let Some(rank) = unpinned.get_mut(&temp.window) {
                *rank = temp.original_rank;
            } else if let Some(rank) = pinned.get_mut(&temp.window) {
                *rank = temp.original_rank;
            }
        }
        (pinned, unpinned)
    }

    // ──────────────────────────────────────────
    // Membership
    // ──────────────────────────────────────────

    /// New windows always enter at the top of the unpinned band.
    pub fn add_window(&mut self, window: WindowId) {
        self.unpinned.insert(window, self.next_unpinned_rank());
    }

    pub fn remove_window(&mut self, window: WindowId) {
        if self.temporary_top() == Some(window) {
            self.temp_top = None;
        }
        if let Some(rank) = self.pinned.remove(&window) {
            fill_gap(&mut self.pinned, rank);
        } else if let Some(rank) = self.unpinned.remove(&window) {
            fill_gap(&mut self.unpinned, rank);
        }
    }

    // ──────────────────────────────────────────
    // Pinning
    // ──────────────────────────────────────────

    /// Move a window to the top of the pinned band; the unpinned band
    /// closes up behind it.
    pub fn pin(&mut self, window: WindowId) {
        self.restore_temp_top();
        let new_rank = PINNED_BASE + self.pinned.len() as i32 * RANK_STRIDE;
        self.pinned.insert(window, new_rank);
        if let Some(removed) = self.unpinned.remove(&window) {
            fill_gap(&mut self.unpinned, removed);
        }
    }

    /// Move a window to the top of the unpinned band; the pinned band
    /// closes up behind it.
    pub fn unpin(&mut self, window: WindowId) {
        self.restore_temp_top();
        let new_rank = self.next_unpinned_rank();
        self.unpinned.insert(window, new_rank);
        if let Some(removed) = self.pinned.remove(&window) {
            fill_gap(&mut self.pinned, removed);
        }
    }

    // ──────────────────────────────────────────
    // Raising
    // ──────────────────────────────────────────

    /// Swap a window's rank with the current top of the unpinned band.
    /// Everything else keeps its place, so the displaced window drops to
    /// exactly where the raised one was.
    pub fn bring_unpinned_to_top(&mut self, window: WindowId) {
        let mut top: Option<(WindowId, i32)> = None;
        for (&id, &rank) in &self.unpinned {
            if rank > top.map(|(_, r)| r).unwrap_or(UNPINNED_BASE) {
                top = Some((id, rank));
            }
        }
        let Some((top_id, top_rank)) = top else {
            return;
        };
        if top_id == window {
            return;
        }
        let Some(own_rank) = self.unpinned.get(&window).copied() else {
            return;
        };
        self.unpinned.insert(window, top_rank);
        self.unpinned.insert(top_id, own_rank);
    }

    /// Lift one window just under the floating layer, above both bands,
    /// without reordering anything. Replaces any previous override, whose
    /// window falls back to its remembered rank.
    pub fn set_temporary_top(&mut self, window: WindowId) {
        self.restore_temp_top();
        let override_rank = FLOATING_BASE - RANK_STRIDE;
        if let Some(rank) = self.unpinned.get_mut(&window) {
            self.temp_top = Some(TempTop {
                window,
                original_rank: *rank,
            });
            *rank = override_rank;
        } else if let Some(rank) = self.pinned.get_mut(&window) {
            self.temp_top = Some(TempTop {
                window,
                original_rank: *rank,
            });
            *rank = override_rank;
        }
    }

    /// Drop the temporary-top override, if any.
    pub fn clear_temporary_top(&mut self) {
        self.restore_temp_top();
    }

    /// Route the selection highlight: the previous selection falls back to
    /// the floating base, the new one sits one step above it. Subscribers
    /// scoped to each window get told their new rank.
    pub fn select_window(&mut self, window: WindowId) {
        if let Some(previous) = self.selected {
            self.events.emit(Event::WindowRankChanged {
                window: previous,
                rank: FLOATING_BASE,
            });
        }
        self.events.emit(Event::WindowRankChanged {
            window,
            rank: FLOATING_BASE + SELECTED_OFFSET,
        });
        self.selected = Some(window);
    }

    // ──────────────────────────────────────────
    // Reordering
    // ──────────────────────────────────────────

    /// Rebuild the pinned band in the given bottom-to-top order.
    pub fn reorder_pinned(&mut self, order: &[WindowId]) {
        self.pinned.clear();
        let mut rank = PINNED_BASE;
        for &window in order {
            self.pinned.insert(window, rank);
            rank += RANK_STRIDE;
        }
    }

    /// Rebuild the unpinned band in the given bottom-to-top order.
    pub fn reorder_unpinned(&mut self, order: &[WindowId]) {
        self.unpinned.clear();
        let mut rank = UNPINNED_BASE;
        for &window in order {
            self.unpinned.insert(window, rank);
            rank += RANK_STRIDE;
        }
    }

    // ──────────────────────────────────────────
    // Internals
    // ──────────────────────────────────────────

    fn next_unpinned_rank(&self) -> i32 {
        UNPINNED_BASE + self.unpinned.len() as i32 * RANK_STRIDE
    }

    fn restore_temp_top(&mut self) {
        if let Some(temp) = self.temp_top.take() {
            if let Some(rank) = self.unpinned.get_mut(&temp.window) {
                *rank = temp.original_rank;
            } else if let Some(rank) = self.pinned.get_mut(&temp.window) {
                *rank = temp.original_rank;
            }
        }
    }

    fn normalize(&mut self) {
        for (map, base) in [
            (&mut self.pinned, PINNED_BASE),
            (&mut self.unpinned, UNPINNED_BASE),
        ] {
            let mut ordered: Vec<(WindowId, i32)> = map.iter().map(|(&id, &r)| (id, r)).collect();
            ordered.sort_by_key(|&(id, rank)| (rank, id));
            let mut rank = base;
            for (id, _) in ordered {
                map.insert(id, rank);
                rank += RANK_STRIDE;
            }
        }
    }
}

impl Default for ZOrderStack {
    fn default() -> Self {
        Self::new()
    }
}

/// Close the hole left by a removed rank: everything above it steps down.
fn fill_gap(map: &mut HashMap<WindowId, i32>, removed: i32) {
    for rank in map.values_mut() {
        if *rank > removed {
            *rank -= RANK_STRIDE;
        }
    }
}
