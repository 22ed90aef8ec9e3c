use crate::stroke::Point;
use egui::{Pos2, Rect, Response, TouchId, TouchPhase};
use std::collections::BTreeMap;

/// Gesture callbacks delivered to the interpreter, in canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    /// A press and release without movement
    Tap { pos: Point },
    /// First contact of a pan
    PanBegin { pos: Point },
    /// A pointer-move sample during a pan
    PanChange { pos: Point },
    /// Pointer lifted at the end of a pan
    PanEnd { pos: Point },
    /// The input layer aborted the gesture
    PanCancel,
}

/// All pointers touching the surface at one instant
#[derive(Debug, Clone, Default)]
pub struct TouchSample {
    pub pointers: Vec<Pos2>,
}

impl TouchSample {
    pub fn single(pos: Pos2) -> Self {
        Self {
            pointers: vec![pos],
        }
    }

    /// Multi-pointer pans collapse into one touch point at the centroid
    pub fn average(&self) -> Option<Pos2> {
        if self.pointers.is_empty() {
            return None;
        }
        let sum = self
            .pointers
            .iter()
            .fold(egui::Vec2::ZERO, |acc, p| acc + p.to_vec2());
        Some((sum / self.pointers.len() as f32).to_pos2())
    }
}

/// What egui reported about the canvas widget during one frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerFrame {
    pub clicked: bool,
    pub drag_started: bool,
    pub dragged: bool,
    pub drag_stopped: bool,
    /// Current pointer in screen space; the finger centroid on touch screens
    pub pointer: Option<Pos2>,
    /// Where the press began, used to anchor the first stroke point
    pub origin: Option<Pos2>,
}

/// Converts egui pointer interaction on the canvas into gesture events
#[derive(Debug, Default)]
pub struct InputHandler {
    panning: bool,
    /// Whether the open pan has produced a move sample
    moved: bool,
    last_pos: Option<Point>,
    /// Fingers currently down
    touches: BTreeMap<TouchId, Pos2>,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a screen position into canvas space
    fn to_canvas(canvas_rect: Rect, pos: Pos2) -> Point {
        (pos - canvas_rect.min).to_pos2()
    }

    /// Fold this frame's touch events into the set of fingers that are down
    /// and return their centroid
    pub fn track_touches(&mut self, events: &[egui::Event]) -> Option<Pos2> {
        for event in events {
            if let egui::Event::Touch { id, phase, pos, .. } = event {
                match phase {
                    TouchPhase::Start | TouchPhase::Move => {
                        self.touches.insert(*id, *pos);
                    }
                    TouchPhase::End | TouchPhase::Cancel => {
                        self.touches.remove(id);
                    }
                }
            }
        }
        TouchSample {
            pointers: self.touches.values().copied().collect(),
        }
        .average()
    }

    /// Process this frame's interaction with the canvas widget
    pub fn process(&mut self, ctx: &egui::Context, response: &Response) -> Vec<GestureEvent> {
        let (touch_pos, press_origin) =
            ctx.input(|i| (self.track_touches(&i.events), i.pointer.press_origin()));
        let frame = PointerFrame {
            clicked: response.clicked(),
            drag_started: response.drag_started(),
            dragged: response.dragged(),
            drag_stopped: response.drag_stopped(),
            pointer: touch_pos.or_else(|| response.interact_pointer_pos()),
            // egui only reports the drag once it passes the click threshold,
            // so the stroke starts where the press began.
            origin: touch_pos.or(press_origin),
        };
        self.step(frame, response.rect)
    }

    /// Turn one frame of widget state into gesture events
    pub fn step(&mut self, frame: PointerFrame, rect: Rect) -> Vec<GestureEvent> {
        let mut events = Vec::new();
        let to_canvas = |p: Pos2| Self::to_canvas(rect, p);

        if frame.clicked {
            // egui never reports a click and a drag for the same press.
            // The begin marks a new touch so its tap is not taken for the
            // tail of an earlier pan.
            if let Some(pos) = frame.pointer.or(frame.origin).map(to_canvas) {
                events.push(GestureEvent::PanBegin { pos });
                events.push(GestureEvent::Tap { pos });
            }
            self.reset();
            return events;
        }

        if frame.drag_started {
            if let Some(pos) = frame.origin.or(frame.pointer).map(to_canvas) {
                self.panning = true;
                self.moved = false;
                self.last_pos = Some(pos);
                events.push(GestureEvent::PanBegin { pos });
            }
        }

        if self.panning && (frame.dragged || frame.drag_stopped) {
            if let Some(pos) = frame.pointer.map(to_canvas) {
                if self.last_pos != Some(pos) {
                    self.last_pos = Some(pos);
                    self.moved = true;
                    events.push(GestureEvent::PanChange { pos });
                }
            }
        }

        if self.panning && frame.drag_stopped {
            let pos = self.last_pos.unwrap_or_default();
            if self.moved {
                events.push(GestureEvent::PanEnd { pos });
            } else {
                // A press held past the click window without moving
                events.push(GestureEvent::Tap { pos });
            }
            self.reset();
        } else if self.panning && !frame.dragged && !frame.drag_started {
            // The drag vanished without a release, e.g. focus was lost
            events.push(GestureEvent::PanCancel);
            self.reset();
        }

        events
    }

    fn reset(&mut self) {
        self.panning = false;
        self.moved = false;
        self.last_pos = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn test_average_of_two_pointers() {
        let sample = TouchSample {
            pointers: vec![pos2(0.0, 0.0), pos2(10.0, 20.0)],
        };
        assert_eq!(sample.average(), Some(pos2(5.0, 10.0)));
    }

    #[test]
    fn test_average_of_nothing() {
        assert_eq!(TouchSample::default().average(), None);
        assert_eq!(TouchSample::single(pos2(3.0, 4.0)).average(), Some(pos2(3.0, 4.0)));
    }

    fn touch(id: u64, phase: TouchPhase, x: f32, y: f32) -> egui::Event {
        egui::Event::Touch {
            device_id: egui::TouchDeviceId(0),
            id: TouchId(id),
            phase,
            pos: pos2(x, y),
            force: None,
        }
    }

    fn canvas_rect() -> Rect {
        Rect::from_min_size(pos2(100.0, 50.0), egui::vec2(200.0, 200.0))
    }

    #[test]
    fn test_touch_centroid_uses_fingers_that_are_down() {
        let mut input = InputHandler::new();
        let start = [
            touch(1, TouchPhase::Start, 0.0, 0.0),
            touch(2, TouchPhase::Start, 10.0, 0.0),
        ];
        assert_eq!(input.track_touches(&start), Some(pos2(5.0, 0.0)));

        // Only the second finger moves, several times in one frame
        let moves = [
            touch(2, TouchPhase::Move, 14.0, 0.0),
            touch(2, TouchPhase::Move, 20.0, 0.0),
        ];
        assert_eq!(input.track_touches(&moves), Some(pos2(10.0, 0.0)));

        // A frame without touch events keeps the last centroid
        assert_eq!(input.track_touches(&[]), Some(pos2(10.0, 0.0)));

        assert_eq!(
            input.track_touches(&[touch(1, TouchPhase::End, 0.0, 0.0)]),
            Some(pos2(20.0, 0.0))
        );
        assert_eq!(input.track_touches(&[touch(2, TouchPhase::Cancel, 20.0, 0.0)]), None);
    }

    #[test]
    fn test_click_begins_a_touch_before_tapping() {
        let mut input = InputHandler::new();
        let events = input.step(
            PointerFrame {
                clicked: true,
                pointer: Some(pos2(110.0, 60.0)),
                ..Default::default()
            },
            canvas_rect(),
        );
        let pos = pos2(10.0, 10.0);
        assert_eq!(events, vec![GestureEvent::PanBegin { pos }, GestureEvent::Tap { pos }]);
    }

    #[test]
    fn test_drag_maps_to_pan_events() {
        let mut input = InputHandler::new();
        let rect = canvas_rect();

        let first = input.step(
            PointerFrame {
                drag_started: true,
                dragged: true,
                pointer: Some(pos2(130.0, 80.0)),
                origin: Some(pos2(120.0, 80.0)),
                ..Default::default()
            },
            rect,
        );
        assert_eq!(
            first,
            vec![
                GestureEvent::PanBegin { pos: pos2(20.0, 30.0) },
                GestureEvent::PanChange { pos: pos2(30.0, 30.0) },
            ]
        );

        let last = input.step(
            PointerFrame {
                drag_stopped: true,
                pointer: Some(pos2(140.0, 80.0)),
                ..Default::default()
            },
            rect,
        );
        assert_eq!(
            last,
            vec![
                GestureEvent::PanChange { pos: pos2(40.0, 30.0) },
                GestureEvent::PanEnd { pos: pos2(40.0, 30.0) },
            ]
        );
    }

    #[test]
    fn test_long_stationary_press_becomes_tap() {
        let mut input = InputHandler::new();
        let rect = canvas_rect();
        let held = Some(pos2(150.0, 150.0));

        let begin = input.step(
            PointerFrame {
                drag_started: true,
                dragged: true,
                pointer: held,
                origin: held,
                ..Default::default()
            },
            rect,
        );
        assert_eq!(begin, vec![GestureEvent::PanBegin { pos: pos2(50.0, 100.0) }]);

        let release = input.step(
            PointerFrame {
                drag_stopped: true,
                pointer: held,
                ..Default::default()
            },
            rect,
        );
        assert_eq!(release, vec![GestureEvent::Tap { pos: pos2(50.0, 100.0) }]);
    }

    #[test]
    fn test_vanished_drag_cancels() {
        let mut input = InputHandler::new();
        let rect = canvas_rect();
        input.step(
            PointerFrame {
                drag_started: true,
                dragged: true,
                pointer: Some(pos2(120.0, 60.0)),
                origin: Some(pos2(120.0, 60.0)),
                ..Default::default()
            },
            rect,
        );
        let events = input.step(PointerFrame::default(), rect);
        assert_eq!(events, vec![GestureEvent::PanCancel]);
        assert!(input.step(PointerFrame::default(), rect).is_empty());
    }
}
