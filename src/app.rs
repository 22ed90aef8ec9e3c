use crate::active_path::RedrawSignal;
use crate::bitmap::SourceImages;
use crate::canvas::CanvasConfig;
use crate::config::EditorConfig;
use crate::export::{LocalImageStore, ShareTarget};
use crate::input::InputHandler;
use crate::renderer::Renderer;
use crate::session::EditorSession;
use crate::stroke::{Brush, StrokeMode};
use eframe::egui::{self, Key, KeyboardShortcut, Modifiers, Sense};
use std::path::PathBuf;
use std::sync::Arc;

const BRUSH_KEY: &str = "cutout_editor_brush";
const DEFAULT_CANVAS: f32 = 512.0;

/// Puts the saved file's uri on the clipboard
struct ClipboardShare {
    ctx: egui::Context,
}

impl ShareTarget for ClipboardShare {
    fn share(&self, uri: &str) {
        self.ctx.copy_text(uri.to_owned());
    }
}

/// The editor screen
pub struct EditorApp {
    session: EditorSession,
    renderer: Renderer,
    input: InputHandler,
    store: LocalImageStore,
    share: ClipboardShare,
    /// The canvas size is derived from the first frame's viewport
    canvas_sized: bool,
    status: String,
}

impl EditorApp {
    /// Called once before the first frame.
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        mut config: EditorConfig,
        original: PathBuf,
        cutout: PathBuf,
    ) -> Self {
        // Brush settings survive restarts; strokes do not
        if let Some(brush) = cc
            .storage
            .and_then(|storage| eframe::get_value::<Brush>(storage, BRUSH_KEY))
        {
            config.brush = brush;
        }

        let redraw: Arc<dyn RedrawSignal> = Arc::new(cc.egui_ctx.clone());
        let store = LocalImageStore::new(&config.cache_dir);
        let mut session = EditorSession::new(config, CanvasConfig::square(DEFAULT_CANVAS), redraw);
        session.set_sources(SourceImages::load(&original, &cutout));

        Self {
            session,
            renderer: Renderer::new(&cc.egui_ctx),
            input: InputHandler::new(),
            store,
            share: ClipboardShare {
                ctx: cc.egui_ctx.clone(),
            },
            canvas_sized: false,
            status: String::new(),
        }
    }

    fn tools_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Brush");
        ui.separator();

        let brush = self.session.brush();
        ui.horizontal(|ui| {
            for mode in [StrokeMode::Paint, StrokeMode::Erase] {
                if ui.selectable_label(brush.mode == mode, mode.label()).clicked() {
                    self.session.set_brush_mode(mode);
                }
            }
        });

        let mut width = brush.width;
        let response = ui.add(egui::Slider::new(&mut width, 1.0..=100.0).text("Width"));
        if response.drag_started() {
            self.session.begin_brush_adjust();
        }
        if response.changed() {
            self.session.set_brush_width(width);
        }
        if response.drag_stopped() {
            self.session.end_brush_adjust();
        }

        ui.separator();
        ui.horizontal(|ui| {
            if ui.add_enabled(self.session.can_undo(), egui::Button::new("⟲ Undo")).clicked() {
                self.session.undo();
            }
            if ui.add_enabled(self.session.can_redo(), egui::Button::new("⟳ Redo")).clicked() {
                self.session.redo();
            }
        });

        ui.separator();
        if ui.button("Export").clicked() {
            self.export();
        }
        if !self.status.is_empty() {
            ui.label(&self.status);
        }
        ui.label(format!("Strokes: {}", self.session.document().len()));
    }

    fn export(&mut self) {
        self.status = match self.session.export_to(&self.store) {
            Some(uri) => {
                self.share.share(&uri);
                format!("Saved {uri} (copied)")
            }
            None => "Export skipped".to_owned(),
        };
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        let redo = KeyboardShortcut::new(Modifiers::COMMAND | Modifiers::SHIFT, Key::Z);
        let undo = KeyboardShortcut::new(Modifiers::COMMAND, Key::Z);
        if ctx.input_mut(|i| i.consume_shortcut(&redo)) {
            self.session.redo();
        } else if ctx.input_mut(|i| i.consume_shortcut(&undo)) {
            self.session.undo();
        }
    }

    fn canvas(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        if !self.canvas_sized {
            let available = ui.available_size();
            let side = available.x.min(available.y).max(1.0);
            self.session.set_canvas(CanvasConfig::square(side));
            self.canvas_sized = true;
        }

        let canvas = *self.session.canvas();
        let (response, painter) =
            ui.allocate_painter(egui::vec2(canvas.width, canvas.height), Sense::click_and_drag());

        for event in self.input.process(ctx, &response) {
            self.session.handle(event);
        }

        if self.session.needs_render() {
            match self.session.render_canvas() {
                Some(pixmap) => self.renderer.update_canvas(pixmap),
                None => self.renderer.clear_canvas(),
            }
        }
        self.renderer.paint_canvas(&painter, response.rect);

        if let Some(loupe) = self.session.render_magnifier() {
            let magnifier = self.session.magnifier();
            let size = magnifier.config().size as f32;
            let rect = egui::Rect::from_min_size(
                response.rect.min + egui::vec2(8.0, 8.0),
                egui::vec2(size, size),
            );
            let radius = self.session.brush().width / 2.0 * magnifier.config().zoom;
            let opacity = magnifier.opacity();
            self.renderer.update_magnifier(&loupe);
            self.renderer.paint_magnifier(&painter, rect, opacity, radius);
        }
    }
}

impl eframe::App for EditorApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, BRUSH_KEY, &self.session.brush());
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_shortcuts(ctx);

        egui::SidePanel::left("tools").show(ctx, |ui| {
            self.tools_panel(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.canvas(ui, ctx);
        });
    }
}
