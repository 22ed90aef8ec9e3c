use eframe::egui::{self, Color32, ColorImage, Painter, Rect, Stroke, TextureHandle, TextureOptions};
use tiny_skia::Pixmap;

const FULL_UV: Rect = Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));

/// Premultiplied pixmap to an egui image, without demultiplying
pub fn pixmap_to_color_image(pixmap: &Pixmap) -> ColorImage {
    ColorImage::from_rgba_premultiplied(
        [pixmap.width() as usize, pixmap.height() as usize],
        pixmap.data(),
    )
}

/// Uploads composited frames as GPU textures and paints them
pub struct Renderer {
    ctx: egui::Context,
    canvas_texture: Option<TextureHandle>,
    magnifier_texture: Option<TextureHandle>,
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("canvas_texture", &self.canvas_texture.as_ref().map(|t| t.id()))
            .field("magnifier_texture", &self.magnifier_texture.as_ref().map(|t| t.id()))
            .finish()
    }
}

impl Renderer {
    pub fn new(ctx: &egui::Context) -> Self {
        Self {
            ctx: ctx.clone(),
            canvas_texture: None,
            magnifier_texture: None,
        }
    }

    fn upload(ctx: &egui::Context, slot: &mut Option<TextureHandle>, name: &str, pixmap: &Pixmap) {
        let image = pixmap_to_color_image(pixmap);
        match slot {
            Some(texture) => texture.set(image, TextureOptions::LINEAR),
            None => *slot = Some(ctx.load_texture(name, image, TextureOptions::LINEAR)),
        }
    }

    pub fn update_canvas(&mut self, pixmap: &Pixmap) {
        Self::upload(&self.ctx, &mut self.canvas_texture, "canvas", pixmap);
    }

    pub fn update_magnifier(&mut self, pixmap: &Pixmap) {
        Self::upload(&self.ctx, &mut self.magnifier_texture, "magnifier", pixmap);
    }

    /// Forget the canvas texture, e.g. when the sources changed
    pub fn clear_canvas(&mut self) {
        self.canvas_texture = None;
    }

    pub fn paint_canvas(&self, painter: &Painter, rect: Rect) {
        if let Some(texture) = &self.canvas_texture {
            painter.image(texture.id(), rect, FULL_UV, Color32::WHITE);
        } else {
            painter.rect_filled(rect, 0.0, Color32::from_gray(230));
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                "Waiting for both images",
                egui::FontId::proportional(16.0),
                Color32::DARK_GRAY,
            );
        }
    }

    /// Paint the loupe at `rect` with a ring showing the brush footprint
    pub fn paint_magnifier(&self, painter: &Painter, rect: Rect, opacity: f32, brush_radius: f32) {
        let Some(texture) = &self.magnifier_texture else {
            return;
        };
        if opacity <= 0.0 {
            return;
        }
        let tint = Color32::from_white_alpha((opacity.clamp(0.0, 1.0) * 255.0) as u8);
        painter.image(texture.id(), rect, FULL_UV, tint);
        painter.rect_stroke(rect, 4.0, Stroke::new(2.0, Color32::DARK_GRAY));
        painter.circle_stroke(rect.center(), brush_radius, Stroke::new(1.0, Color32::RED));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_image_matches_pixmap_size() {
        let mut pixmap = Pixmap::new(4, 3).unwrap();
        pixmap.fill(tiny_skia::Color::from_rgba8(0, 0, 255, 255));

        let image = pixmap_to_color_image(&pixmap);
        assert_eq!(image.size, [4, 3]);
        assert_eq!(image.pixels[0], Color32::from_rgb(0, 0, 255));
    }

    #[test]
    fn test_canvas_texture_lifecycle() {
        let ctx = egui::Context::default();
        let mut renderer = Renderer::new(&ctx);
        assert!(renderer.canvas_texture.is_none());

        let pixmap = Pixmap::new(2, 2).unwrap();
        renderer.update_canvas(&pixmap);
        assert!(renderer.canvas_texture.is_some());

        renderer.clear_canvas();
        assert!(renderer.canvas_texture.is_none());
    }
}
