// ──────────────────────────────────────────────
// Ordinal pools
// ──────────────────────────────────────────────

/// Hands out display ordinals (1, 2, 3, ...) for window labels and component
/// instances. The pool keeps every ordinal still in use, seeded with a zero
/// sentinel, and always issues one past the highest outstanding value, so
/// released ordinals in the middle are not reused until the tail drains.
#[derive(Debug, Clone)]
pub struct OrdinalPool {
    slots: Vec<u32>,
}

impl OrdinalPool {
    pub fn new() -> Self {
        Self { slots: vec![0] }
    }

    pub fn acquire(&mut self) -> u32 {
        let next = self.slots.last().copied().unwrap_or(0) + 1;
        self.slots.push(next);
        next
    }

    pub fn release(&mut self, ordinal: u32) {
        self.slots.retain(|&slot| slot != ordinal);
    }
}

impl Default for OrdinalPool {
    fn default() -> Self {
        Self::new()
    }
}
