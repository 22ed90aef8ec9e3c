//! Software compositing of the cutout mask.
//!
//! The mask starts as the cutout's alpha channel. Strokes are then drawn into
//! it in commit order: paint strokes add coverage, erase strokes clear it.
//! Finally the original photo is drawn through the mask over the backdrop.

use crate::bitmap::{Bitmap, SourceImages};
use crate::canvas::{Backdrop, CanvasConfig, Viewport, contain_transform};
use crate::stroke::{Brush, Point, StrokeMode, StrokeRef, is_dot};
use log::{debug, warn};
use tiny_skia::{
    BlendMode, FillRule, FilterQuality, LineCap, LineJoin, Mask, MaskType, Paint, PathBuilder,
    Pixmap, PixmapPaint, Stroke as SkiaStroke, Transform,
};

/// The in-progress stroke, drawn with whatever brush is current
#[derive(Debug, Clone, Copy)]
pub struct ActivePreview<'a> {
    pub points: &'a [Point],
    pub brush: Brush,
}

/// Renders sources plus strokes into a single masked image.
///
/// Rendering is a pure function of its inputs; the same inputs always give
/// byte-identical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaskCompositor {
    canvas: CanvasConfig,
    backdrop: Backdrop,
}

impl MaskCompositor {
    pub fn new(canvas: CanvasConfig, backdrop: Backdrop) -> Self {
        Self { canvas, backdrop }
    }

    pub fn canvas(&self) -> &CanvasConfig {
        &self.canvas
    }

    pub fn backdrop(&self) -> Backdrop {
        self.backdrop
    }

    /// Same canvas, different backdrop. Used for exports.
    pub fn with_backdrop(&self, backdrop: Backdrop) -> Self {
        Self {
            canvas: self.canvas,
            backdrop,
        }
    }

    /// Render the whole canvas at 1:1
    pub fn render_canvas(
        &self,
        sources: &SourceImages,
        strokes: &[StrokeRef],
        active: Option<ActivePreview<'_>>,
    ) -> Option<Pixmap> {
        self.render(sources, strokes, active, &self.canvas.viewport())
    }

    /// Render into `viewport`. Returns `None` until both bitmaps are available.
    pub fn render(
        &self,
        sources: &SourceImages,
        strokes: &[StrokeRef],
        active: Option<ActivePreview<'_>>,
        viewport: &Viewport,
    ) -> Option<Pixmap> {
        let Some((original, cutout)) = sources.pair() else {
            debug!("Skipping render: source images incomplete");
            return None;
        };

        let mask = self.render_mask(cutout, strokes, active, viewport)?;
        let mask = Mask::from_pixmap(mask.as_ref(), MaskType::Alpha);

        let mut output = Pixmap::new(viewport.width, viewport.height)?;
        output.fill(self.backdrop.color());
        self.draw_fitted(&mut output, original, viewport, Some(&mask));
        Some(output)
    }

    /// The accumulated mask: cutout alpha, then every stroke in order
    pub fn render_mask(
        &self,
        cutout: &Bitmap,
        strokes: &[StrokeRef],
        active: Option<ActivePreview<'_>>,
        viewport: &Viewport,
    ) -> Option<Pixmap> {
        let mut mask = Pixmap::new(viewport.width, viewport.height)?;
        self.draw_fitted(&mut mask, cutout, viewport, None);

        for stroke in strokes {
            draw_stroke(
                &mut mask,
                stroke.points(),
                stroke.width(),
                stroke.mode(),
                viewport.transform,
            );
        }
        if let Some(active) = active {
            draw_stroke(
                &mut mask,
                active.points,
                active.brush.width,
                active.brush.mode,
                viewport.transform,
            );
        }
        Some(mask)
    }

    fn draw_fitted(&self, target: &mut Pixmap, bitmap: &Bitmap, viewport: &Viewport, mask: Option<&Mask>) {
        let fit = contain_transform(bitmap.width(), bitmap.height(), &self.canvas);
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };
        target.draw_pixmap(
            0,
            0,
            bitmap.pixmap().as_ref(),
            &paint,
            viewport.transform.pre_concat(fit),
            mask,
        );
    }
}

fn stroke_paint(mode: StrokeMode) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(255, 255, 255, 255);
    paint.anti_alias = true;
    paint.blend_mode = match mode {
        StrokeMode::Paint => BlendMode::SourceOver,
        StrokeMode::Erase => BlendMode::Clear,
    };
    paint
}

/// Draw one polyline into the mask with round caps and joins
fn draw_stroke(mask: &mut Pixmap, points: &[Point], width: f32, mode: StrokeMode, transform: Transform) {
    let Some(first) = points.first() else {
        warn!("Skipping stroke with no points");
        return;
    };
    let paint = stroke_paint(mode);

    // Zero-length paths have no direction for the stroker; draw the cap as a dot
    if is_dot(points) {
        if let Some(dot) = PathBuilder::from_circle(first.x, first.y, width / 2.0) {
            mask.fill_path(&dot, &paint, FillRule::Winding, transform, None);
        }
        return;
    }

    let mut pb = PathBuilder::new();
    pb.move_to(first.x, first.y);
    for p in &points[1..] {
        pb.line_to(p.x, p.y);
    }
    let Some(path) = pb.finish() else {
        return;
    };

    let stroke = SkiaStroke {
        width,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..SkiaStroke::default()
    };
    mask.stroke_path(&path, &paint, &stroke, transform, None);
}
