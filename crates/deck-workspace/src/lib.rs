//! Ties the layout engine and the z-order stack together into one
//! workspace, and persists the pair as a single config document.
//!
//! The engine does not know about stacking and the stack does not know
//! about geometry; every operation that touches both (creating or deleting
//! a window, pinning, peeking) goes through [`Workspace`] so the two stay
//! consistent.

use deck_core::{CellId, WindowId};
use deck_layout::{ComponentMeta, IntegrityError, LayoutEngine};
use deck_stack::ZOrderStack;

pub mod config;


pub use config::WorkspaceConfig;

pub struct Workspace {
    pub engine: LayoutEngine,
    pub stack: ZOrderStack,
}

impl Workspace {
    pub fn new(catalog: Vec<ComponentMeta>) -> Self {
        Self {
            engine: LayoutEngine::new(catalog),
            stack: ZOrderStack::new(),
        }
    }

    /// Rebuild a workspace from a saved config. Windows the rank maps do
    /// not mention enter the unpinned band in id order; ranks referring to
    /// deleted windows are carried along harmlessly and dropped on the
    /// next save of that band.
    pub fn from_config(
        catalog: Vec<ComponentMeta>,
        config: WorkspaceConfig,
    ) -> Result<Self, IntegrityError> {
        let mut engine = LayoutEngine::load(catalog, &config.cells, &config.windows)?;
        let mut stack = ZOrderStack::load(config.pinned_ranks, config.unpinned_ranks);

        let mut ids: Vec<WindowId> = engine.windows().keys().copied().collect();
        ids.sort_unstable();
        for id in ids {
            if !stack.contains(id) {
                stack.add_window(id);
            }
        }
        let pinned: Vec<WindowId> = stack.pinned().keys().copied().collect();
        for id in pinned {
            engine.set_window_pinned(id, true);
        }
        engine.adapt_all();
        Ok(Self { engine, stack })
    }

    /// Load the saved workspace from disk, falling back to an empty one
    /// if there is no config or it fails its integrity checks.
    pub fn restore(catalog: Vec<ComponentMeta>) -> Self {
        match config::load_config() {
            Some(saved) => match Self::from_config(catalog.clone(), saved) {
                Ok(workspace) => workspace,
                Err(e) => {
                    log::warn!("Discarding saved workspace: {}", e);
                    Self::new(catalog)
                }
            },
            None => Self::new(catalog),
        }
    }

    /// The persisted shape of the current state.
    pub fn capture(&self) -> WorkspaceConfig {
        let (pinned_ranks, unpinned_ranks) = self.stack.snapshot();
        WorkspaceConfig {
            cells: self.engine.clean_cells(),
            windows: self.engine.clean_windows(),
            pinned_ranks,
            unpinned_ranks,
        }
    }

    pub fn save(&self) {
        config::save_config(&self.capture());
    }

    // ──────────────────────────────────────────
    // Operations spanning both halves
    // ──────────────────────────────────────────

    pub fn create_window(&mut self, component: Option<&str>) -> (WindowId, CellId) {
        let (window, cell) = self.engine.create_window(component);
        self.stack.add_window(window);
        (window, cell)
    }

    pub fn delete_window(&mut self, window: WindowId) {
        self.engine.delete_window(window);
        self.stack.remove_window(window);
    }

    pub fn pin_window(&mut self, window: WindowId) {
        self.stack.pin(window);
        self.engine.set_window_pinned(window, true);
    }

    pub fn unpin_window(&mut self, window: WindowId) {
        self.stack.unpin(window);
        self.engine.set_window_pinned(window, false);
    }

    pub fn bring_to_top(&mut self, window: WindowId) {
        self.stack.bring_unpinned_to_top(window);
    }

    pub fn select_window(&mut self, window: WindowId) {
        self.stack.select_window(window);
    }

    /// Peek at a window: lift it just under the floating layer and flag it
    /// so a hidden window still renders while peeked.
    pub fn set_temporary_top(&mut self, window: WindowId) {
        if let Some(previous) = self.stack.temporary_top() {
            self.engine.set_window_temp_show(previous, false);
        }
        self.stack.set_temporary_top(window);
        if self.stack.temporary_top() == Some(window) {
            self.engine.set_window_temp_show(window, true);
        }
    }

    pub fn clear_temporary_top(&mut self) {
        if let Some(previous) = self.stack.temporary_top() {
            self.engine.set_window_temp_show(previous, false);
        }
        self.stack.clear_temporary_top();
    }

    pub fn set_canvas_size(&mut self, width: f32, height: f32) {
        self.engine.set_canvas_size(width, height);
    }
}
