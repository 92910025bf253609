//! Single-value handoff between the generation flow and the details view.

use std::sync::{PoisonError, RwLock};

/// Holds at most one value. Every `set` replaces the previous value.
///
/// Owned by the service rather than a global; clone the value out with
/// [`get`](Self::get) or move it out with [`take`](Self::take).
#[derive(Debug)]
pub struct HandoffSlot<T> {
    value: RwLock<Option<T>>,
}

impl<T> Default for HandoffSlot<T> {
    fn default() -> Self {
        Self {
            value: RwLock::new(None),
        }
    }
}

impl<T: Clone> HandoffSlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the slot.
    pub fn set(&self, value: T) {
        *self.value.write().unwrap_or_else(PoisonError::into_inner) = Some(value);
    }

    /// Current value, left in place.
    pub fn get(&self) -> Option<T> {
        self.value
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn clear(&self) {
        self.take();
    }

    /// Current value, leaving the slot empty.
    pub fn take(&self) -> Option<T> {
        self.value
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}
