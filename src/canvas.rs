use serde::{Deserialize, Serialize};
use tiny_skia::Transform;

/// Size of the drawing surface, shared by the main canvas and the magnifier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasConfig {
    pub width: f32,
    pub height: f32,
}

impl CanvasConfig {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: clamp_extent(width),
            height: clamp_extent(height),
        }
    }

    /// A square canvas as wide as the viewport
    pub fn square(viewport_width: f32) -> Self {
        Self::new(viewport_width, viewport_width)
    }

    /// Pixel dimensions of a render target for this canvas
    pub fn pixel_size(&self) -> (u32, u32) {
        (self.width.round() as u32, self.height.round() as u32)
    }

    /// Full-canvas viewport with no zoom
    pub fn viewport(&self) -> Viewport {
        let (width, height) = self.pixel_size();
        Viewport {
            width,
            height,
            transform: Transform::identity(),
        }
    }
}

fn clamp_extent(value: f32) -> f32 {
    if value.is_finite() { value.max(1.0) } else { 1.0 }
}

/// What unmasked pixels show
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Backdrop {
    #[default]
    Transparent,
    /// Straight (non-premultiplied) RGBA
    Solid([u8; 4]),
}

impl Backdrop {
    pub const WHITE: Self = Self::Solid([255, 255, 255, 255]);

    pub(crate) fn color(&self) -> tiny_skia::Color {
        match self {
            Self::Transparent => tiny_skia::Color::TRANSPARENT,
            Self::Solid([r, g, b, a]) => tiny_skia::Color::from_rgba8(*r, *g, *b, *a),
        }
    }
}

/// An output raster and the canvas-to-output transform used to fill it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub transform: Transform,
}

/// Transform that fits an image inside the canvas, preserving aspect ratio
/// and centering it (CSS `object-fit: contain`)
pub fn contain_transform(image_width: u32, image_height: u32, canvas: &CanvasConfig) -> Transform {
    if image_width == 0 || image_height == 0 {
        return Transform::identity();
    }
    let (iw, ih) = (image_width as f32, image_height as f32);
    let scale = (canvas.width / iw).min(canvas.height / ih);
    let tx = (canvas.width - iw * scale) / 2.0;
    let ty = (canvas.height - ih * scale) / 2.0;
    Transform::from_row(scale, 0.0, 0.0, scale, tx, ty)
}
