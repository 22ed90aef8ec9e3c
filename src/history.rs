use std::collections::VecDeque;

/// Snapshot-based undo/redo history.
///
/// Every entry is a complete value of `T`. Cheap commits rely on `T` being a
/// shared immutable handle (e.g. `Arc<[_]>`) so clones never deep-copy.
#[derive(Debug, Clone)]
pub struct History<T> {
    /// Snapshots that can be restored by `undo`, oldest first
    past: Vec<T>,
    present: T,
    /// Snapshots that can be restored by `redo`, next first
    future: VecDeque<T>,
}

impl<T: Default> Default for History<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> History<T> {
    /// Creates a new history with nothing to undo or redo
    pub fn new(initial: T) -> Self {
        Self {
            past: Vec::new(),
            present: initial,
            future: VecDeque::new(),
        }
    }

    pub fn present(&self) -> &T {
        &self.present
    }

    pub fn past(&self) -> &[T] {
        &self.past
    }

    pub fn future(&self) -> &VecDeque<T> {
        &self.future
    }

    /// Make `new_present` current. Anything that could be redone is dropped.
    pub fn commit(&mut self, new_present: T) {
        let old = std::mem::replace(&mut self.present, new_present);
        self.past.push(old);
        self.future.clear();
    }

    /// Step back one snapshot. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.past.pop() else {
            return false;
        };
        let old = std::mem::replace(&mut self.present, previous);
        self.future.push_front(old);
        true
    }

    /// Step forward one snapshot. Returns false when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.future.pop_front() else {
            return false;
        };
        let old = std::mem::replace(&mut self.present, next);
        self.past.push(old);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Replace the present and forget all history
    pub fn clear(&mut self, present: T) {
        self.past.clear();
        self.future.clear();
        self.present = present;
    }
}
