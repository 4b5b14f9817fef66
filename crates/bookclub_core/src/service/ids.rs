//! Monotonic id allocation.

use crate::model::EntityId;

/// Hands out ids that are never reused within one store.
///
/// Once `EntityId::MAX` has been issued or observed the sequence is
/// exhausted and `next_id` returns `None` instead of repeating an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdSequence {
    next: Option<EntityId>,
}

impl Default for IdSequence {
    fn default() -> Self {
        Self { next: Some(1) }
    }
}

impl IdSequence {
    pub fn next_id(&mut self) -> Option<EntityId> {
        let id = self.next?;
        self.next = id.checked_add(1);
        Some(id)
    }

    /// Moves the sequence past an id already in use.
    pub fn observe(&mut self, used: EntityId) {
        if let Some(next) = self.next {
            if used >= next {
                self.next = used.checked_add(1);
            }
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.next.is_none()
    }
}
