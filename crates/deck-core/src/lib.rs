use std::collections::HashMap;

// ──────────────────────────────────────────────
// Geometry
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

// ──────────────────────────────────────────────
// Identity
// ──────────────────────────────────────────────

pub type CellId = u64;
pub type WindowId = u64;

// ──────────────────────────────────────────────
// Cuts
// ──────────────────────────────────────────────

/// Direction of a binary cut. A vertical cut places the children side by
/// side (it splits the width); a horizontal cut stacks them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CutDirection {
    Horizontal,
    Vertical,
}

impl CutDirection {
    /// Persisted wire form ("h" / "v").
    pub fn as_str(self) -> &'static str {
        match self {
            CutDirection::Horizontal => "h",
            CutDirection::Vertical => "v",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "h" => Some(CutDirection::Horizontal),
            "v" => Some(CutDirection::Vertical),
            _ => None,
        }
    }
}

// ──────────────────────────────────────────────
// Tree paths
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Branch {
    Left,
    Right,
}

/// A root-relative address of a node in a partition tree: the sequence of
/// left/right steps to walk from the root. An empty path addresses the root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreePath(Vec<Branch>);

impl TreePath {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, branch: Branch) {
        self.0.push(branch);
    }

    pub fn pop(&mut self) -> Option<Branch> {
        self.0.pop()
    }

    pub fn last(&self) -> Option<Branch> {
        self.0.last().copied()
    }

    /// Path to the parent node, or `None` for the root path.
    pub fn parent(&self) -> Option<TreePath> {
        if self.0.is_empty() {
            None
        } else {
            Some(TreePath(self.0[..self.0.len() - 1].to_vec()))
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn steps(&self) -> &[Branch] {
        &self.0
    }
}

impl From<Vec<Branch>> for TreePath {
    fn from(steps: Vec<Branch>) -> Self {
        Self(steps)
    }
}

// ──────────────────────────────────────────────
// Borders
// ──────────────────────────────────────────────

/// Per-edge border visibility and per-corner radius flags for one cell.
/// Interior edges created by a cut are never drawn; radii only survive on a
/// window's true outer corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeBorders {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
    pub radius_tl: bool,
    pub radius_tr: bool,
    pub radius_bl: bool,
    pub radius_br: bool,
}

impl EdgeBorders {
    pub const fn all() -> Self {
        Self {
            top: true,
            bottom: true,
            left: true,
            right: true,
            radius_tl: true,
            radius_tr: true,
            radius_bl: true,
            radius_br: true,
        }
    }
}

impl Default for EdgeBorders {
    fn default() -> Self {
        Self::all()
    }
}

// ──────────────────────────────────────────────
// Event registry
// ──────────────────────────────────────────────

/// What kind of change a notification reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TopicKind {
    PanelChanged,
    ConfigToggled,
    ReadyMountConfig,
    ComponentRemoved,
    WindowHighlight,
    CellHighlight,
    ContentOverflow,
    WindowRankChanged,
}

/// Subscription key: a topic kind, optionally scoped to a single entity id.
/// Global topics subscribe with `entity: None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TopicKey {
    pub kind: TopicKind,
    pub entity: Option<u64>,
}

impl TopicKey {
    pub fn global(kind: TopicKind) -> Self {
        Self { kind, entity: None }
    }

    pub fn scoped(kind: TopicKind, entity: u64) -> Self {
        Self {
            kind,
            entity: Some(entity),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    PanelChanged,
    ConfigToggled { cell: CellId },
    ReadyMountConfig { cell: CellId },
    ComponentRemoved { cell: CellId },
    WindowHighlight { window: WindowId, on: bool },
    CellHighlight { cell: CellId, on: bool },
    ContentOverflow { cell: CellId, on: bool },
    WindowRankChanged { window: WindowId, rank: i32 },
}

impl Event {
    /// The key this event is delivered under.
    pub fn key(&self) -> TopicKey {
        match *self {
            Event::PanelChanged => TopicKey::global(TopicKind::PanelChanged),
            Event::ConfigToggled { .. } => TopicKey::global(TopicKind::ConfigToggled),
            Event::ReadyMountConfig { cell } => {
                TopicKey::scoped(TopicKind::ReadyMountConfig, cell)
            }
            Event::ComponentRemoved { cell } => {
                TopicKey::scoped(TopicKind::ComponentRemoved, cell)
            }
            Event::WindowHighlight { window, .. } => {
                TopicKey::scoped(TopicKind::WindowHighlight, window)
            }
            Event::CellHighlight { cell, .. } => TopicKey::scoped(TopicKind::CellHighlight, cell),
            Event::ContentOverflow { cell, .. } => {
                TopicKey::scoped(TopicKind::ContentOverflow, cell)
            }
            Event::WindowRankChanged { window, .. } => {
                TopicKey::scoped(TopicKind::WindowRankChanged, window)
            }
        }
    }
}

pub type SubscriptionId = u64;

type Callback = Box<dyn FnMut(&Event)>;

/// Typed subscription registry: callbacks are keyed by (topic kind, entity)
/// tuples instead of interpolated topic strings. Single-threaded; `emit`
/// runs every matching callback to completion before returning.
pub struct EventBus {
    subscribers: HashMap<TopicKey, Vec<(SubscriptionId, Callback)>>,
    next_id: SubscriptionId,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            subscribers: HashMap::new(),
            next_id: 1,
        }
    }

    pub fn subscribe(
        &mut self,
        key: TopicKey,
        callback: impl FnMut(&Event) + 'static,
    ) -> SubscriptionId {
        let id = self.next_id;
        self.next_id += 1;
        self.subscribers
            .entry(key)
            .or_default()
            .push((id, Box::new(callback)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        for list in self.subscribers.values_mut() {
            list.retain(|(sub_id, _)| *sub_id != id);
        }
    }

    pub fn emit(&mut self, event: Event) {
        if let Some(list) = self.subscribers.get_mut(&event.key()) {
            for (_, callback) in list.iter_mut() {
                callback(&event);
            }
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell as StdCell;
    use std::rc::Rc;

    #[test]
    fn test_tree_path_parent_and_last() {
        let mut path = TreePath::new();
        assert!(path.parent().is_none());

        path.push(Branch::Left);
        path.push(Branch::Right);
        assert_eq!(path.last(), Some(Branch::Right));

        let parent = path.parent().unwrap();
        assert_eq!(parent.steps(), &[Branch::Left]);
        assert_eq!(parent.parent().unwrap(), TreePath::new());
    }

    #[test]
    fn test_event_bus_scoped_delivery() {
        let mut bus = EventBus::new();
        let hits = Rc::new(StdCell::new(0));

        let hits_a = Rc::clone(&hits);
        bus.subscribe(TopicKey::scoped(TopicKind::CellHighlight, 7), move |_| {
            hits_a.set(hits_a.get() + 1);
        });

        bus.emit(Event::CellHighlight { cell: 7, on: true });
        bus.emit(Event::CellHighlight { cell: 8, on: true });
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_event_bus_unsubscribe() {
        let mut bus = EventBus::new();
        let hits = Rc::new(StdCell::new(0));

        let hits_a = Rc::clone(&hits);
        let id = bus.subscribe(TopicKey::global(TopicKind::PanelChanged), move |_| {
            hits_a.set(hits_a.get() + 1);
        });

        bus.emit(Event::PanelChanged);
        bus.unsubscribe(id);
        bus.emit(Event::PanelChanged);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_cut_direction_wire_form() {
        assert_eq!(CutDirection::Vertical.as_str(), "v");
        assert_eq!(CutDirection::parse("h"), Some(CutDirection::Horizontal));
        assert_eq!(CutDirection::parse("x"), None);
    }
}
