use crate::canvas::Viewport;
use crate::stroke::Point;
use serde::{Deserialize, Serialize};
use tiny_skia::Transform;

/// Magnifier geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MagnifierConfig {
    /// Side length of the square loupe, in logical pixels
    pub size: u32,
    pub zoom: f32,
}

impl Default for MagnifierConfig {
    fn default() -> Self {
        Self {
            size: 128,
            zoom: 2.0,
        }
    }
}

/// A zoomed view of the canvas centered on the pointer.
///
/// Holds no stroke state of its own; it only decides where to look and
/// whether to show. Rendering goes through the shared compositor.
#[derive(Debug, Clone, PartialEq)]
pub struct Magnifier {
    config: MagnifierConfig,
    focal: Option<Point>,
    drawing: bool,
    adjusting_brush: bool,
}

impl Magnifier {
    pub fn new(config: MagnifierConfig) -> Self {
        Self {
            config: MagnifierConfig {
                size: config.size.max(1),
                zoom: if config.zoom.is_finite() && config.zoom > 0.0 {
                    config.zoom
                } else {
                    1.0
                },
            },
            focal: None,
            drawing: false,
            adjusting_brush: false,
        }
    }

    pub fn config(&self) -> &MagnifierConfig {
        &self.config
    }

    /// Follow the latest pointer position
    pub fn track(&mut self, pointer: Point) {
        self.focal = Some(pointer);
    }

    pub fn focal(&self) -> Option<Point> {
        self.focal
    }

    pub fn set_drawing(&mut self, drawing: bool) {
        self.drawing = drawing;
    }

    pub fn set_adjusting_brush(&mut self, adjusting: bool) {
        self.adjusting_brush = adjusting;
    }

    pub fn is_visible(&self) -> bool {
        self.drawing || self.adjusting_brush
    }

    pub fn opacity(&self) -> f32 {
        if self.is_visible() { 1.0 } else { 0.0 }
    }

    /// Canvas-to-loupe transform: the focal point lands in the loupe center
    pub fn transform(&self, focal: Point) -> Transform {
        let half = self.config.size as f32 / 2.0;
        Transform::from_translate(half, half)
            .pre_scale(self.config.zoom, self.config.zoom)
            .pre_translate(-focal.x, -focal.y)
    }

    /// Where to render, or `None` while hidden or before any pointer is seen
    pub fn viewport(&self) -> Option<Viewport> {
        if !self.is_visible() {
            return None;
        }
        let focal = self.focal?;
        Some(Viewport {
            width: self.config.size,
            height: self.config.size,
            transform: self.transform(focal),
        })
    }
}

impl Default for Magnifier {
    fn default() -> Self {
        Self::new(MagnifierConfig::default())
    }
}
