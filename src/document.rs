use crate::history::History;
use crate::stroke::StrokeRef;
use std::sync::Arc;

/// Shared immutable list of committed strokes, in commit order
pub type StrokeList = Arc<[StrokeRef]>;

/// The stroke model: every committed stroke, with undo/redo over commits.
#[derive(Debug, Clone)]
pub struct Document {
    history: History<StrokeList>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            history: History::new(Arc::from(Vec::new())),
        }
    }

    /// The currently visible strokes
    pub fn strokes(&self) -> &[StrokeRef] {
        self.history.present()
    }

    /// A cheap handle to the present list that stays valid across later commits
    pub fn snapshot(&self) -> StrokeList {
        Arc::clone(self.history.present())
    }

    pub fn len(&self) -> usize {
        self.strokes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes().is_empty()
    }

    /// Commit `present + [stroke]` as a new undoable state
    pub fn commit_stroke(&mut self, stroke: StrokeRef) {
        let mut next = Vec::with_capacity(self.len() + 1);
        next.extend(self.strokes().iter().cloned());
        next.push(stroke);
        self.history.commit(Arc::from(next));
    }

    pub fn undo(&mut self) -> bool {
        self.history.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.history.redo()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history(&self) -> &History<StrokeList> {
        &self.history
    }

    /// Drop every stroke and all history, e.g. when a new image pair is loaded
    pub fn clear(&mut self) {
        self.history.clear(Arc::from(Vec::new()));
    }
}
