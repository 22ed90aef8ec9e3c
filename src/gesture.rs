use crate::active_path::SharedActivePath;
use crate::document::Document;
use crate::input::GestureEvent;
use crate::state::EditorState;
use crate::stroke::{ActiveStroke, Brush, StrokeRef};
use log::{debug, info, trace};

/// What a single event did to the editor
#[derive(Debug, Clone, PartialEq)]
pub enum GestureOutcome {
    /// The event did not apply in the current state
    Ignored,
    /// The live path changed; only a redraw is needed
    Updated,
    /// A stroke was folded into the document
    Committed(StrokeRef),
    /// The in-progress stroke was dropped without committing
    Discarded,
}

/// Turns tap and pan callbacks into live path updates and stroke commits.
///
/// A physical touch may be reported both as a tap and as a pan. The pan
/// wins if it produced any move sample; otherwise the tap does.
#[derive(Debug)]
pub struct GestureInterpreter {
    state: EditorState,
    path: SharedActivePath,
    /// Set when a moved pan ends; the tap for that same touch is dropped.
    /// Cleared by the next `PanBegin`.
    pan_claimed_touch: bool,
}

impl GestureInterpreter {
    pub fn new(path: SharedActivePath) -> Self {
        Self {
            state: EditorState::Idle,
            path,
            pan_claimed_touch: false,
        }
    }

    pub fn state(&self) -> EditorState {
        self.state
    }

    pub fn is_drawing(&self) -> bool {
        self.state.is_drawing()
    }

    pub fn active_path(&self) -> &SharedActivePath {
        &self.path
    }

    /// Handle one event. `brush` is only read when a stroke is committed.
    pub fn handle(
        &mut self,
        event: GestureEvent,
        brush: &Brush,
        document: &mut Document,
    ) -> GestureOutcome {
        match event {
            GestureEvent::Tap { pos } => {
                if self.state.has_moved() || std::mem::take(&mut self.pan_claimed_touch) {
                    debug!("Tap ignored: pan already owns this touch");
                    return GestureOutcome::Ignored;
                }
                // A stationary pan may be open for the same touch; the tap replaces it
                self.path.clear();
                self.state = EditorState::Idle;
                self.commit(ActiveStroke::begin(pos), brush, document)
            }
            GestureEvent::PanBegin { pos } => {
                if self.path.begin(pos) {
                    debug!("Discarded uncommitted stroke from a previous gesture");
                }
                self.pan_claimed_touch = false;
                self.state = EditorState::Drawing { moved: false };
                GestureOutcome::Updated
            }
            GestureEvent::PanChange { pos } => {
                if !self.state.is_drawing() {
                    debug!("PanChange ignored in state {}", self.state.name());
                    return GestureOutcome::Ignored;
                }
                trace!("Pan sample at ({:.1}, {:.1})", pos.x, pos.y);
                self.path.extend(pos);
                self.state = EditorState::Drawing { moved: true };
                GestureOutcome::Updated
            }
            GestureEvent::PanEnd { .. } => {
                let moved = self.state.has_moved();
                let was_drawing = self.state.is_drawing();
                self.state = EditorState::Idle;
                let stroke = self.path.take();

                if !was_drawing {
                    debug!("PanEnd ignored: no gesture in progress");
                    return GestureOutcome::Ignored;
                }
                match stroke {
                    Some(stroke) if moved => {
                        self.pan_claimed_touch = true;
                        self.commit(stroke, brush, document)
                    }
                    // Stationary touches are committed by the tap
                    _ => GestureOutcome::Discarded,
                }
            }
            GestureEvent::PanCancel => {
                let was_drawing = self.state.is_drawing();
                self.state = EditorState::Idle;
                self.pan_claimed_touch = false;
                self.path.clear();
                if was_drawing {
                    info!("Gesture cancelled, stroke discarded");
                    GestureOutcome::Discarded
                } else {
                    GestureOutcome::Ignored
                }
            }
        }
    }

    fn commit(
        &mut self,
        stroke: ActiveStroke,
        brush: &Brush,
        document: &mut Document,
    ) -> GestureOutcome {
        let stroke = stroke.commit(brush);
        info!(
            "Committed {} stroke {} ({} points, width {})",
            stroke.mode().label(),
            stroke.id(),
            stroke.points().len(),
            stroke.width()
        );
        document.commit_stroke(stroke.clone());
        GestureOutcome::Committed(stroke)
    }
}
